//! Tier-based route authorization.
//!
//! [`decide`] is a pure function of the identity resolution and the current path. It never
//! navigates; [`RouteGuard`] is the reactive point that calls it whenever either input changes
//! and hands redirects to a [`Navigator`].

use crate::constants::{ADMIN_HOME_PATH, LOGIN_PATH, PATIENT_HOME_PATH};
use crate::identity::{Resolution, Section, Tier, UserIdentity};

/// What the caller should do after a guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    NoOp,
    RedirectTo(String),
}

/// Section of a resolved user, or `None` for an unknown tier.
pub fn section_of(user: &UserIdentity) -> Option<Section> {
    user.tier().map(Tier::section)
}

/// Landing page for `user`.
///
/// Doctors land on their hospital (`hospital_id`), hospital staff and admins on their own id.
/// Unknown tiers go to the login page. Every known tier lands inside its own section.
pub fn home_path_for(user: &UserIdentity) -> String {
    match user.tier() {
        Some(Tier::Patient) => PATIENT_HOME_PATH.to_string(),
        Some(Tier::Doctor) => match user.hospital_id() {
            Some(hospital_id) => format!("/{}/{}", Section::Doctor, hospital_id),
            None => format!("/{}", Section::Doctor),
        },
        Some(Tier::HospitalStaff | Tier::HospitalAdmin) => {
            format!("/{}/{}", Section::Hospital, user.id())
        }
        Some(Tier::SystemAdmin) => ADMIN_HOME_PATH.to_string(),
        None => LOGIN_PATH.to_string(),
    }
}

/// First segment of a route path, ignoring query string and fragment.
///
/// `"/doctor/H1?tab=beds"` yields `"doctor"`, `"/"` yields `""`.
pub fn first_segment(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.trim_start_matches('/')
        .split('/')
        .next()
        .unwrap_or_default()
}

/// Decide whether the current user may stay on `current_path`.
pub fn decide(resolution: &Resolution, current_path: &str) -> Action {
    match resolution {
        Resolution::Pending => Action::NoOp,
        Resolution::Unauthenticated => Action::RedirectTo(LOGIN_PATH.to_string()),
        Resolution::Resolved(user) => match section_of(user) {
            Some(expected) if first_segment(current_path) == expected.as_str() => Action::NoOp,
            Some(_) => Action::RedirectTo(home_path_for(user)),
            None => Action::RedirectTo(LOGIN_PATH.to_string()),
        },
    }
}

/// Client-side route replacement.
pub trait Navigator {
    /// Replace the current route with `path` without reloading the page.
    fn replace(&mut self, path: &str);
}

/// Re-evaluates [`decide`] on every `(resolution, path)` change and performs the redirect.
///
/// Re-observing the inputs that were evaluated last is a no-op, and a redirect whose target is
/// already the current path is not issued, so repeated renders cannot loop.
pub struct RouteGuard<N> {
    navigator: N,
    last: Option<(Resolution, String)>,
}

impl<N: Navigator> RouteGuard<N> {
    pub fn new(navigator: N) -> Self {
        Self {
            navigator,
            last: None,
        }
    }

    pub fn observe(&mut self, resolution: &Resolution, current_path: &str) -> Action {
        if let Some((last_resolution, last_path)) = &self.last {
            if last_resolution == resolution && last_path == current_path {
                return Action::NoOp;
            }
        }
        self.last = Some((resolution.clone(), current_path.to_string()));

        let action = decide(resolution, current_path);
        if let Action::RedirectTo(target) = &action {
            if target != current_path {
                tracing::debug!(from = current_path, to = %target, "route guard redirect");
                self.navigator.replace(target);
            }
        }
        action
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }
}
