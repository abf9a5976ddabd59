//! Request-scoped authenticated user context.
//!
//! A `Session` is produced by a successful login and handed explicitly to
//! whatever needs to know who is acting. Nothing here is global.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::storage::AccountStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: i64,
    pub username: String,
}

impl Session {
    /// Authenticate against `store`.
    ///
    /// Returns `Ok(None)` for bad credentials, without saying which part
    /// was wrong.
    pub fn login<S>(store: &S, username: &str, password: &str) -> Result<Option<Self>>
    where
        S: AccountStore + ?Sized,
    {
        Ok(store
            .check_user(username, password)?
            .map(|user_id| Self {
                user_id,
                username: username.to_string(),
            }))
    }
}
