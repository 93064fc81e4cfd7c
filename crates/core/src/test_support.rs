//! Fixtures shared by unit tests in this crate.

use carenet_types::{BedState, Coordinate, Department, Hospital, NonEmptyText};

pub(crate) fn coord(lat: f64, lng: f64) -> Coordinate {
    Coordinate::new(lat, lng).expect("valid test coordinate")
}

pub(crate) fn hospital(id: &str, lat: f64, lng: f64) -> Hospital {
    Hospital {
        id: NonEmptyText::new(id).unwrap(),
        name: NonEmptyText::new(format!("Hospital {id}")).unwrap(),
        address: format!("{id} Main Road"),
        phone: "555-0100".into(),
        location: coord(lat, lng),
        departments: vec![Department {
            id: NonEmptyText::new(format!("{id}-er")).unwrap(),
            name: "Emergency".into(),
            beds: vec![BedState::Free, BedState::Occupied],
        }],
    }
}
