use crate::error::Result;
use crate::models::Session;

/// Port for durable client-side session storage
///
/// Reads and writes are synchronous; the last write wins.
pub trait SessionStore: Send + Sync {
    /// Load the stored session, if any
    fn load(&self) -> Result<Option<Session>>;

    /// Persist a session, replacing any previous one
    fn save(&self, session: &Session) -> Result<()>;

    /// Remove the stored session
    fn clear(&self) -> Result<()>;
}
