//! User use-case service.
//!
//! # Responsibility
//! - Provide list/create/update/delete entry points over the user list.
//! - Run the form submit flow, including national id uniqueness.
//!
//! # Invariants
//! - Every mutation reloads the list, applies the change, and persists the
//!   whole list back.
//! - National ids are unique across stored users.

use crate::calendar::JalaliDateAdapter;
use crate::model::user::{User, UserDraft, UserValidationError};
use crate::repo::user_repo::{RepoError, RepoResult, UserRepository};
use crate::service::user_form::{FormMode, UserForm};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for user use-cases.
#[derive(Debug)]
pub enum UserServiceError {
    Validation(UserValidationError),
    /// Another stored user already has this national id.
    NationalIdNotUnique(String),
    Repo(RepoError),
}

impl Display for UserServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NationalIdNotUnique(value) => {
                write!(f, "national id `{value}` is already registered")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for UserServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NationalIdNotUnique(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<UserValidationError> for UserServiceError {
    fn from(value: UserValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for UserServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

/// Texts for the delete confirmation dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub title: String,
    pub description: String,
    pub confirm_text: String,
    pub cancel_text: String,
}

/// Builds the confirmation shown before deleting `user`.
pub fn delete_confirmation(user: &User) -> ConfirmPrompt {
    ConfirmPrompt {
        title: "حذف کاربر".to_string(),
        description: format!("آیا از حذف {} مطمئن هستید؟", user.full_name()),
        confirm_text: "حذف کاربر".to_string(),
        cancel_text: "انصراف".to_string(),
    }
}

/// Use-case service over a user repository.
pub struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Returns the stored users in insertion order.
    pub fn get_users(&self) -> RepoResult<Vec<User>> {
        self.repo.load_users()
    }

    /// Validates `draft`, assigns a new id and appends it.
    pub fn add_user(&self, draft: UserDraft) -> Result<User, UserServiceError> {
        draft.validate()?;
        let mut users = self.repo.load_users()?;
        let user = draft.into_user();
        users.push(user.clone());
        self.repo.save_users(&users)?;

        info!(
            "event=user_add module=service status=ok count={}",
            users.len()
        );
        Ok(user)
    }

    /// Replaces the user stored under `id`, keeping `id` as the record id.
    ///
    /// Returns `Ok(false)` when no user has that id; nothing is written then.
    pub fn update_user(&self, id: &str, user: User) -> Result<bool, UserServiceError> {
        let mut users = self.repo.load_users()?;
        let Some(slot) = users.iter_mut().find(|item| item.id == id) else {
            warn!("event=user_update module=service status=skipped reason=not_found");
            return Ok(false);
        };
        *slot = User {
            id: id.to_string(),
            ..user
        };
        self.repo.save_users(&users)?;

        info!("event=user_update module=service status=ok");
        Ok(true)
    }

    /// Removes every user with `id`. Unknown ids are a no-op.
    pub fn delete_user(&self, id: &str) -> RepoResult<()> {
        let mut users = self.repo.load_users()?;
        let before = users.len();
        users.retain(|item| item.id != id);
        self.repo.save_users(&users)?;

        info!(
            "event=user_delete module=service status=ok removed={}",
            before - users.len()
        );
        Ok(())
    }

    /// Whether a user other than `exclude_id` already uses `national_id`.
    pub fn national_id_exists(
        &self,
        national_id: &str,
        exclude_id: Option<&str>,
    ) -> RepoResult<bool> {
        Ok(self.repo.load_users()?.iter().any(|user| {
            user.national_id == national_id && Some(user.id.as_str()) != exclude_id
        }))
    }

    /// Case-insensitive substring search over names, national id and
    /// education. A blank query returns every user.
    pub fn filter_users(&self, query: &str) -> RepoResult<Vec<User>> {
        let users = self.repo.load_users()?;
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(users);
        }

        Ok(users
            .into_iter()
            .filter(|user| {
                [
                    user.first_name.as_str(),
                    user.last_name.as_str(),
                    user.national_id.as_str(),
                    user.education.as_str(),
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
            })
            .collect())
    }

    /// Runs the form submit flow and persists the result.
    ///
    /// Create mode appends a new user; edit mode overwrites the edited one.
    pub fn submit(
        &self,
        form: &UserForm,
        adapter: &JalaliDateAdapter,
    ) -> Result<User, UserServiceError> {
        let draft = form.to_draft(adapter)?;
        let existing_id = form.existing_id().map(String::as_str);
        if self.national_id_exists(&draft.national_id, existing_id)? {
            return Err(UserServiceError::NationalIdNotUnique(draft.national_id));
        }

        match &form.mode {
            FormMode::Create => self.add_user(draft),
            FormMode::Edit(original) => {
                let user = draft.into_user_with_id(original.id.clone());
                self.update_user(&original.id, user.clone())?;
                Ok(user)
            }
        }
    }
}
