//! At most one authenticated user per process, mirrored into the store so a
//! restart picks the session back up. The holder is constructed explicitly
//! and passed to collaborators rather than living in a global.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::identity::SessionUser;
use crate::store::{StorageBackend, Store, StoreError};

pub const SESSION_KEY: &str = "session-user";

#[derive(Clone, Debug, Default)]
pub struct Session {
    current: Option<SessionUser>,
}

impl Session {
    /// A corrupt stored value is treated as no session and the entry is
    /// purged, so the next load starts clean.
    pub fn load<B: StorageBackend>(store: &mut Store<B>) -> Self {
        match store.get::<SessionUser>(SESSION_KEY) {
            Ok(current) => Self { current },
            Err(_) => {
                warn!("SESSION: Discarding corrupt stored session");
                store.remove(SESSION_KEY);
                Self { current: None }
            }
        }
    }

    pub fn current(&self) -> Option<&SessionUser> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.current.as_ref().is_some_and(|u| u.is_admin)
    }

    pub fn start<B: StorageBackend>(
        &mut self,
        store: &mut Store<B>,
        user: SessionUser,
    ) -> Result<(), StoreError> {
        store.set(SESSION_KEY, &user)?;
        info!("SESSION: Started for {}", user.email);
        self.current = Some(user);
        Ok(())
    }

    pub fn clear<B: StorageBackend>(&mut self, store: &mut Store<B>) {
        store.remove(SESSION_KEY);
        self.current = None;
    }
}

/// The navigable views of the front end. Kept here so the access rules live
/// beside the session they are checked against.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Home,
    Login,
    Register,
    Dashboard,
    Exchange,
    History,
    Admin,
    Database,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessCheck {
    Granted,
    Redirect(View),
}

const PROTECTED: [View; 5] = [
    View::Dashboard,
    View::Exchange,
    View::History,
    View::Admin,
    View::Database,
];

const ADMIN_ONLY: [View; 2] = [View::Admin, View::Database];

/// Violations redirect rather than error: unauthenticated visitors land on
/// the login view, authenticated non-admins on their dashboard.
pub fn check_access(view: View, session: &Session) -> AccessCheck {
    if PROTECTED.contains(&view) && !session.is_authenticated() {
        return AccessCheck::Redirect(View::Login);
    }
    if ADMIN_ONLY.contains(&view) && !session.is_admin() {
        return AccessCheck::Redirect(View::Dashboard);
    }
    AccessCheck::Granted
}

#[cfg(test)]
mod tests {
    use super::{check_access, AccessCheck, Session, View, SESSION_KEY};
    use crate::identity::{IdentityStore, RegisterRequest, SessionUser};
    use crate::store::{MemoryStorage, StorageBackend, Store};

    fn logged_in(email: &str, admin: bool) -> (Store<MemoryStorage>, Session) {
        let mut store = Store::new(MemoryStorage::new());
        IdentityStore::bootstrap(&mut store).unwrap();

        let user = if admin {
            IdentityStore::login(&store, "admin@dolarasia.com", "admin123").unwrap()
        } else {
            IdentityStore::register(
                &mut store,
                &RegisterRequest {
                    full_name: "Budi Santoso".to_string(),
                    email: email.to_string(),
                    phone: "081234567890".to_string(),
                    address: "Jl. Sudirman 1".to_string(),
                    id_number: "3174012345678901".to_string(),
                    credential: "rahasia1".to_string(),
                },
            )
            .unwrap()
        };

        let mut session = Session::load(&mut store);
        session.start(&mut store, user).unwrap();
        (store, session)
    }

    #[test]
    fn test_that_session_survives_reload_through_the_store() {
        let (mut store, _session) = logged_in("budi@example.com", false);

        let reloaded = Session::load(&mut store);
        assert!(reloaded.is_authenticated());
        assert_eq!(reloaded.current().unwrap().email, "budi@example.com");
    }

    #[test]
    fn test_that_corrupt_session_value_is_purged_on_load() {
        let mut backend = MemoryStorage::new();
        backend.write(SESSION_KEY, "{definitely not a user").unwrap();
        let mut store = Store::new(backend);

        let session = Session::load(&mut store);
        assert!(session.current().is_none());

        // The corrupt entry is gone, not just ignored.
        let raw: Option<SessionUser> = store.get(SESSION_KEY).unwrap();
        assert_eq!(raw, None);
    }

    #[test]
    fn test_that_clear_removes_the_persisted_mirror() {
        let (mut store, mut session) = logged_in("budi@example.com", false);
        session.clear(&mut store);

        assert!(!session.is_authenticated());
        let reloaded = Session::load(&mut store);
        assert!(!reloaded.is_authenticated());
    }

    #[test]
    fn test_that_protected_views_redirect_to_login_when_logged_out() {
        let session = Session::default();
        for view in [View::Dashboard, View::Exchange, View::History, View::Admin] {
            assert_eq!(
                check_access(view, &session),
                AccessCheck::Redirect(View::Login)
            );
        }
        assert_eq!(check_access(View::Home, &session), AccessCheck::Granted);
    }

    #[test]
    fn test_that_admin_views_redirect_non_admins_to_dashboard() {
        let (_store, session) = logged_in("budi@example.com", false);
        assert_eq!(check_access(View::History, &session), AccessCheck::Granted);
        assert_eq!(
            check_access(View::Admin, &session),
            AccessCheck::Redirect(View::Dashboard)
        );
        assert_eq!(
            check_access(View::Database, &session),
            AccessCheck::Redirect(View::Dashboard)
        );
    }

    #[test]
    fn test_that_admin_reaches_admin_views() {
        let (_store, session) = logged_in("admin@dolarasia.com", true);
        assert_eq!(check_access(View::Admin, &session), AccessCheck::Granted);
        assert_eq!(check_access(View::Database, &session), AccessCheck::Granted);
    }
}
