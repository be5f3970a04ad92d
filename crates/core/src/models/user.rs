//! User and session models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Profile of the authenticated user as returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Active session for a logged-in user
///
/// `id` is generated locally on every login so two sessions for the same
/// user are still distinguishable when a late response arrives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub user: UserProfile,
    pub token: String,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user: UserProfile, token: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user,
            token,
            created_at: Utc::now(),
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user.id
    }
}
