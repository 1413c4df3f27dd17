//! User list repository over a key/value store.
//!
//! # Responsibility
//! - Load and persist the full user list as one JSON array.
//! - Keep the storage key and wire shape in one place.
//!
//! # Invariants
//! - `save_users` validates every record before writing.
//! - A stored value that is not a valid user list loads as an empty list and
//!   is reported through logging, never as an error.

use crate::db::DbError;
use crate::model::user::{User, UserValidationError};
use crate::store::KeyValueStore;
use log::{debug, error};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key holding the serialized user list.
pub const USERS_STORAGE_KEY: &str = "ums-users";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for user list persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(UserValidationError),
    Db(DbError),
    Serialization(serde_json::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "failed to serialize user list: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
        }
    }
}

impl From<UserValidationError> for RepoError {
    fn from(value: UserValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Repository interface for the user list.
pub trait UserRepository {
    fn load_users(&self) -> RepoResult<Vec<User>>;
    fn save_users(&self, users: &[User]) -> RepoResult<()>;
}

/// User repository storing the list as JSON under [`USERS_STORAGE_KEY`].
pub struct KvUserRepository<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> KvUserRepository<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, USERS_STORAGE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> UserRepository for KvUserRepository<S> {
    fn load_users(&self) -> RepoResult<Vec<User>> {
        let Some(raw) = self.store.get_item(&self.key)? else {
            return Ok(Vec::new());
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str::<Vec<User>>(&raw) {
            Ok(users) => {
                debug!(
                    "event=users_load module=repo status=ok count={}",
                    users.len()
                );
                Ok(users)
            }
            Err(err) => {
                error!(
                    "event=users_load module=repo status=error error_code=users_parse_failed key={} line={} column={}",
                    self.key,
                    err.line(),
                    err.column()
                );
                Ok(Vec::new())
            }
        }
    }

    fn save_users(&self, users: &[User]) -> RepoResult<()> {
        for user in users {
            user.validate()?;
        }
        let raw = serde_json::to_string(users)?;
        self.store.set_item(&self.key, &raw)?;
        debug!(
            "event=users_save module=repo status=ok count={}",
            users.len()
        );
        Ok(())
    }
}
