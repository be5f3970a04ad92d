//! Storage repository traits
//!
//! Lets the auth layer persist its session without knowing the backing store.

use crate::error::Result;
use crate::models::Session;

/// Persistence of the single active session and its bearer token
pub trait SessionRepository {
    /// Store the session, replacing any previous one
    fn save_session(&self, session: &Session) -> Result<()>;

    /// Load the stored session, if any
    fn load_session(&self) -> Result<Option<Session>>;

    /// Forget the stored session
    fn clear_session(&self) -> Result<()>;
}
