use web_sys::{window, Storage};

use crate::config::TOKEN_KEY;
use crate::logging::warn_on_err;

/// Holder of the single bearer token for this browser.
pub trait SessionStore {
    fn token(&self) -> Option<String>;
    fn set_token(&self, token: &str);
    fn clear(&self);
}

/// Token persisted in `localStorage` so it survives page loads.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorageSession;

fn storage() -> Option<Storage> {
    window()?.local_storage().ok()?
}

impl SessionStore for LocalStorageSession {
    fn token(&self) -> Option<String> {
        storage()?
            .get_item(TOKEN_KEY)
            .ok()?
            .filter(|t| !t.is_empty())
    }

    fn set_token(&self, token: &str) {
        match storage() {
            Some(storage) => {
                warn_on_err(storage.set_item(TOKEN_KEY, token), "could not persist session token")
            }
            None => tracing::warn!("localStorage unavailable, session not persisted"),
        }
    }

    fn clear(&self) {
        if let Some(storage) = storage() {
            warn_on_err(storage.remove_item(TOKEN_KEY), "could not clear session token");
        }
    }
}

#[cfg(test)]
pub use memory::MemorySession;

#[cfg(test)]
mod memory {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::SessionStore;

    /// In-memory session for tests.
    #[derive(Clone, Debug, Default)]
    pub struct MemorySession {
        token: Rc<RefCell<Option<String>>>,
    }

    impl MemorySession {
        pub fn with_token(token: &str) -> Self {
            let session = Self::default();
            session.set_token(token);
            session
        }
    }

    impl SessionStore for MemorySession {
        fn token(&self) -> Option<String> {
            self.token.borrow().clone()
        }

        fn set_token(&self, token: &str) {
            *self.token.borrow_mut() = Some(token.to_string());
        }

        fn clear(&self) {
            self.token.borrow_mut().take();
        }
    }
}
