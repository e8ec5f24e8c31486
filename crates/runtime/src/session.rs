//! Who is playing.

use serde::{Deserialize, Serialize};

/// Identity of the player a runtime serves.
///
/// Created once at sign-in (or as a guest) and handed to the
/// [`RuntimeBuilder`](crate::RuntimeBuilder). The id keys the save; nothing
/// else in the runtime holds identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub session_id: String,
    pub is_guest: bool,
}

impl SessionContext {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            is_guest: false,
        }
    }

    /// A fresh guest identity, `guest_<unix millis>`.
    pub fn guest() -> Self {
        Self {
            session_id: format!("guest_{}", chrono::Utc::now().timestamp_millis()),
            is_guest: true,
        }
    }

    pub fn save_key(&self) -> String {
        crate::repository::save_key(&self.session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guest_ids_are_prefixed() {
        let guest = SessionContext::guest();
        assert!(guest.is_guest);
        assert!(guest.session_id.starts_with("guest_"));
        assert_eq!(guest.save_key(), format!("save_{}", guest.session_id));
    }
}
