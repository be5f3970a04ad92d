//! Persisted session storage

use rusqlite::{params, Connection};
use tracing::instrument;

use super::parse::{parse_datetime, parse_uuid, OptionalExt};
use crate::error::Result;
use crate::models::{Session, UserId, UserProfile};

/// The session table holds at most one row (slot = 1)
pub struct SessionStore<'a> {
    conn: &'a Connection,
}

impl<'a> SessionStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Save the active session, replacing any previous one
    #[instrument(skip(self, session), fields(user_id = %session.user.id))]
    pub fn save(&self, session: &Session) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO session
                (slot, session_id, user_id, name, email, phone, token, created_at)
             VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                session.id.to_string(),
                session.user.id.as_str(),
                session.user.name,
                session.user.email,
                session.user.phone,
                session.token,
                session.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Load the stored session
    #[instrument(skip(self))]
    pub fn load(&self) -> Result<Option<Session>> {
        let mut stmt = self.conn.prepare(
            "SELECT session_id, user_id, name, email, phone, token, created_at
             FROM session WHERE slot = 1",
        )?;

        let session = stmt
            .query_row([], |row| {
                Ok(Session {
                    id: parse_uuid(&row.get::<_, String>(0)?)?,
                    user: UserProfile {
                        id: UserId::new(row.get::<_, String>(1)?),
                        name: row.get(2)?,
                        email: row.get(3)?,
                        phone: row.get(4)?,
                    },
                    token: row.get(5)?,
                    created_at: parse_datetime(&row.get::<_, String>(6)?)?,
                })
            })
            .optional()?;

        Ok(session)
    }

    /// Delete the stored session
    pub fn clear(&self) -> Result<()> {
        self.conn.execute("DELETE FROM session", [])?;
        Ok(())
    }
}
