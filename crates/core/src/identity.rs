//! User identity as delivered by the identity resolver.
//!
//! CareNet does not authenticate anyone. It receives a [`Resolution`] from whatever resolves the
//! session and only decides what that identity is allowed to see.

use carenet_types::NonEmptyText;

/// Role classification, ordered by ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Patient = 0,
    Doctor = 1,
    HospitalStaff = 2,
    HospitalAdmin = 3,
    SystemAdmin = 4,
}

impl Tier {
    pub const ALL: [Tier; 5] = [
        Tier::Patient,
        Tier::Doctor,
        Tier::HospitalStaff,
        Tier::HospitalAdmin,
        Tier::SystemAdmin,
    ];

    /// Maps a resolver ordinal onto a tier. Anything outside `0..=4` is unknown.
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(usize::from(ordinal)).copied()
    }

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Tiers that belong to a hospital and must carry its id.
    pub fn requires_hospital(self) -> bool {
        matches!(self, Tier::Doctor | Tier::HospitalStaff | Tier::HospitalAdmin)
    }

    /// The route section this tier is confined to.
    pub fn section(self) -> Section {
        match self {
            Tier::Patient => Section::User,
            Tier::Doctor => Section::Doctor,
            Tier::HospitalStaff | Tier::HospitalAdmin => Section::Hospital,
            Tier::SystemAdmin => Section::Admin,
        }
    }
}

/// Top-level path segment owned by one or more tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    User,
    Doctor,
    Hospital,
    Admin,
}

impl Section {
    pub fn as_str(self) -> &'static str {
        match self {
            Section::User => "user",
            Section::Doctor => "doctor",
            Section::Hospital => "hospital",
            Section::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("{0:?} users must belong to a hospital")]
    MissingHospital(Tier),
}

/// A resolved user.
///
/// The tier is kept as the raw ordinal the resolver supplied so that an out-of-range value
/// reaches the access guard (which sends it to the login page) instead of failing earlier.
/// Doctors and hospital staff/admins always carry a `hospital_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    id: NonEmptyText,
    tier: u8,
    hospital_id: Option<NonEmptyText>,
}

impl UserIdentity {
    pub fn new(
        id: NonEmptyText,
        tier: u8,
        hospital_id: Option<NonEmptyText>,
    ) -> Result<Self, IdentityError> {
        if let Some(known) = Tier::from_ordinal(tier) {
            if known.requires_hospital() && hospital_id.is_none() {
                return Err(IdentityError::MissingHospital(known));
            }
        }
        Ok(Self {
            id,
            tier,
            hospital_id,
        })
    }

    pub fn id(&self) -> &NonEmptyText {
        &self.id
    }

    pub fn tier_ordinal(&self) -> u8 {
        self.tier
    }

    /// `None` when the resolver supplied an unknown ordinal.
    pub fn tier(&self) -> Option<Tier> {
        Tier::from_ordinal(self.tier)
    }

    /// Always `Some` for doctors and hospital staff/admins.
    pub fn hospital_id(&self) -> Option<&NonEmptyText> {
        self.hospital_id.as_ref()
    }
}

/// Outcome of identity resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The resolver has not answered yet.
    Pending,
    Unauthenticated,
    Resolved(UserIdentity),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_round_trip() {
        for tier in Tier::ALL {
            assert_eq!(Tier::from_ordinal(tier.ordinal()), Some(tier));
        }
        assert_eq!(Tier::from_ordinal(5), None);
        assert_eq!(Tier::from_ordinal(u8::MAX), None);
    }

    #[test]
    fn staff_and_admin_share_the_hospital_section() {
        assert_eq!(Tier::HospitalStaff.section(), Section::Hospital);
        assert_eq!(Tier::HospitalAdmin.section(), Section::Hospital);
        assert_eq!(Tier::Patient.section().as_str(), "user");
        assert_eq!(Tier::SystemAdmin.section().as_str(), "admin");
    }

    #[test]
    fn unknown_ordinal_is_kept_but_has_no_tier() {
        let user = UserIdentity::new(NonEmptyText::new("u1").unwrap(), 9, None).unwrap();
        assert_eq!(user.tier_ordinal(), 9);
        assert!(user.tier().is_none());
    }

    #[test]
    fn hospital_tiers_need_a_hospital_id() {
        for tier in [Tier::Doctor, Tier::HospitalStaff, Tier::HospitalAdmin] {
            let err = UserIdentity::new(NonEmptyText::new("u1").unwrap(), tier.ordinal(), None)
                .expect_err("hospital tier without hospital");
            assert_eq!(err, IdentityError::MissingHospital(tier));
        }

        let doctor = UserIdentity::new(
            NonEmptyText::new("u1").unwrap(),
            1,
            Some(NonEmptyText::new("H1").unwrap()),
        )
        .unwrap();
        assert_eq!(doctor.hospital_id().map(|h| h.as_str()), Some("H1"));
    }

    #[test]
    fn patients_and_system_admins_need_no_hospital() {
        for tier in [Tier::Patient, Tier::SystemAdmin] {
            let user = UserIdentity::new(NonEmptyText::new("u1").unwrap(), tier.ordinal(), None);
            assert!(user.is_ok(), "{tier:?}");
        }
    }
}
