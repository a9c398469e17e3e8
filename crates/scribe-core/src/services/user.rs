use std::sync::Arc;

use uuid::Uuid;

use super::CrudService;
use crate::domain::{NewUser, User, UserChanges};
use crate::error::DomainError;
use crate::pagination::{DeletedFilter, Page, PageRequest};
use crate::patch::Patch;
use crate::permissions::{self, Actor};
use crate::ports::{AuthError, PasswordService, UserRepository};

/// A user created by a superuser.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub is_superuser: bool,
}

/// Superuser-side update of any account.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Patch<String>,
    pub is_superuser: Option<bool>,
}

/// Self-service profile update.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    pub email: Option<String>,
    pub full_name: Patch<String>,
}

impl From<UpdateProfile> for UpdateUser {
    fn from(profile: UpdateProfile) -> Self {
        Self {
            email: profile.email,
            full_name: profile.full_name,
            ..Default::default()
        }
    }
}

/// Accounts, credentials and self-service profile management.
#[derive(Clone)]
pub struct UserService {
    base: CrudService<User, dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        Self {
            base: CrudService::new(repo),
            passwords,
        }
    }

    fn repo(&self) -> &dyn UserRepository {
        self.base.repository()
    }

    fn hash(&self, password: &str) -> Result<String, DomainError> {
        self.passwords
            .hash(password)
            .map_err(|e| DomainError::Internal(e.to_string()))
    }

    /// Active user by id, as used when resolving the caller of a request.
    pub async fn get_user_by_id(&self, id: Uuid) -> Result<User, DomainError> {
        self.base.get_by_id(id, None, false).await
    }

    /// A user may read their own record; anyone else needs superuser rights.
    pub async fn get_user(&self, actor: &Actor, id: Uuid) -> Result<User, DomainError> {
        if actor.id != id {
            permissions::require_superuser(actor)?;
        }
        self.base.get_by_id(id, Some(actor), false).await
    }

    pub async fn list_users(
        &self,
        actor: &Actor,
        request: PageRequest,
        filter: DeletedFilter,
    ) -> Result<Page<User>, DomainError> {
        permissions::require_superuser(actor)?;
        self.base.get_list_paginated(actor, request, filter).await
    }

    /// Create an account. Emails stay reserved while an account is soft-deleted.
    pub async fn create_user(&self, input: CreateUser) -> Result<User, DomainError> {
        if self.repo().find_by_email(&input.email, true).await?.is_some() {
            return Err(DomainError::Conflict("Email already registered".to_string()));
        }

        let password_hash = self.hash(&input.password)?;
        let user = self
            .base
            .create(NewUser {
                email: input.email,
                password_hash,
                full_name: input.full_name,
                is_superuser: input.is_superuser,
            })
            .await?;

        tracing::info!(user_id = %user.id, is_superuser = user.is_superuser, "User created");
        Ok(user)
    }

    /// Public signup; never grants superuser rights.
    pub async fn register(
        &self,
        email: String,
        password: String,
        full_name: Option<String>,
    ) -> Result<User, DomainError> {
        self.create_user(CreateUser {
            email,
            password,
            full_name,
            is_superuser: false,
        })
        .await
    }

    /// Check credentials. Deleted accounts authenticate but are refused as inactive.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let invalid = || DomainError::Unauthorized("Incorrect email or password".to_string());

        let user = self
            .repo()
            .find_by_email(email, true)
            .await?
            .ok_or_else(invalid)?;

        let valid = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(|e| match e {
                AuthError::HashingError(msg) => DomainError::Internal(msg),
                other => DomainError::Unauthorized(other.to_string()),
            })?;
        if !valid {
            return Err(invalid());
        }

        if user.lifecycle.is_deleted {
            return Err(DomainError::Forbidden("Inactive user".to_string()));
        }

        Ok(user)
    }

    /// Update any account (superuser only).
    pub async fn update_user(
        &self,
        actor: &Actor,
        id: Uuid,
        input: UpdateUser,
    ) -> Result<User, DomainError> {
        permissions::require_superuser(actor)?;
        let target = self.base.get_by_id(id, None, false).await?;
        self.apply_update(target, input).await
    }

    /// Update the caller's own name and email.
    pub async fn update_me(&self, actor: &Actor, input: UpdateProfile) -> Result<User, DomainError> {
        let me = self.base.get_by_id(actor.id, None, false).await?;
        self.apply_update(me, input.into()).await
    }

    pub async fn change_password(
        &self,
        actor: &Actor,
        current_password: &str,
        new_password: &str,
    ) -> Result<User, DomainError> {
        let me = self.base.get_by_id(actor.id, None, false).await?;

        let matches = self
            .passwords
            .verify(current_password, &me.password_hash)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        if !matches {
            return Err(DomainError::Validation("Incorrect password".to_string()));
        }
        if current_password == new_password {
            return Err(DomainError::Validation(
                "New password cannot be the same as the current one".to_string(),
            ));
        }

        self.apply_update(
            me,
            UpdateUser {
                password: Some(new_password.to_string()),
                ..Default::default()
            },
        )
        .await
    }

    async fn apply_update(&self, target: User, input: UpdateUser) -> Result<User, DomainError> {
        if let Some(email) = input.email.as_deref() {
            if email != target.email && self.repo().find_by_email(email, true).await?.is_some() {
                return Err(DomainError::Conflict("Email already registered".to_string()));
            }
        }

        let password_hash = input.password.as_deref().map(|p| self.hash(p)).transpose()?;

        self.base
            .apply_update(
                target,
                UserChanges {
                    email: input.email,
                    password_hash,
                    full_name: input.full_name,
                    is_superuser: input.is_superuser,
                },
            )
            .await
    }

    /// Soft-delete an account. Users may delete themselves unless they are
    /// superusers; deleting others needs superuser rights.
    pub async fn delete_user(&self, actor: &Actor, id: Uuid) -> Result<bool, DomainError> {
        if actor.id == id {
            if actor.is_superuser {
                return Err(DomainError::Forbidden(
                    "Super users are not allowed to delete themselves".to_string(),
                ));
            }
        } else {
            permissions::require_superuser(actor)?;
        }
        self.base.delete(id).await
    }

    pub async fn restore_user(&self, actor: &Actor, id: Uuid) -> Result<User, DomainError> {
        permissions::require_superuser(actor)?;
        self.base.restore(id).await
    }

    /// Make sure a superuser with this email exists; returns it either way.
    pub async fn ensure_superuser(&self, email: &str, password: &str) -> Result<User, DomainError> {
        if let Some(existing) = self.repo().find_by_email(email, true).await? {
            tracing::debug!(user_id = %existing.id, "First superuser already present");
            return Ok(existing);
        }

        self.create_user(CreateUser {
            email: email.to_string(),
            password: password.to_string(),
            full_name: None,
            is_superuser: true,
        })
        .await
    }
}
