use model::entities::user;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};

use crate::email::normalize_email;
use crate::error::{AuthError, Result, ValidationError};
use crate::password::{CredentialHasher, set_password};

/// Optional user attributes merged into a new account.
///
/// Unset fields fall back to the entity defaults: empty name, active,
/// neither staff nor superuser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtraFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_staff: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_superuser: Option<bool>,
}

impl ExtraFields {
    /// Builds the fields from an arbitrary JSON object, rejecting unknown keys.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| AuthError::InvalidFields(e.to_string()))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    pub fn with_staff(mut self, is_staff: bool) -> Self {
        self.is_staff = Some(is_staff);
        self
    }

    pub fn with_superuser(mut self, is_superuser: bool) -> Self {
        self.is_superuser = Some(is_superuser);
        self
    }
}

/// Creates and looks up user accounts.
///
/// The manager holds no state of its own; the connection and the hasher are
/// passed in by the caller.
pub struct UserManager<'a, C: ConnectionTrait> {
    db: &'a C,
    hasher: &'a dyn CredentialHasher,
}

impl<'a, C: ConnectionTrait> UserManager<'a, C> {
    pub fn new(db: &'a C, hasher: &'a dyn CredentialHasher) -> Self {
        Self { db, hasher }
    }

    /// Creates and saves a regular user.
    ///
    /// Fails with [`ValidationError::EmailRequired`] before touching storage
    /// when `email` is empty. Without a password the account gets an
    /// unusable one. A duplicate email comes back as the storage error, see
    /// [`AuthError::is_conflict`].
    #[instrument(skip(self, password, extra_fields))]
    pub async fn create_user(
        &self,
        email: &str,
        password: Option<&str>,
        extra_fields: ExtraFields,
    ) -> Result<user::Model> {
        trace!("Entering create_user");

        if email.is_empty() {
            warn!("Rejected user creation without an email");
            return Err(ValidationError::EmailRequired.into());
        }

        let email = normalize_email(email);
        debug!("Normalized email to {}", email);

        let mut new_user = user::ActiveModel {
            email: Set(email),
            name: Set(extra_fields.name.unwrap_or_default()),
            is_active: Set(extra_fields.is_active.unwrap_or(true)),
            is_staff: Set(extra_fields.is_staff.unwrap_or(false)),
            is_superuser: Set(extra_fields.is_superuser.unwrap_or(false)),
            last_login: Set(None),
            ..Default::default()
        };
        set_password(&mut new_user, self.hasher, password)?;

        trace!("Inserting new user into database");
        let created = new_user.insert(self.db).await?;
        info!(
            "User created with ID: {}, email: {}, staff: {}, superuser: {}",
            created.id, created.email, created.is_staff, created.is_superuser
        );

        Ok(created)
    }

    /// Creates and saves a superuser.
    ///
    /// `is_staff` and `is_superuser` default to true; an explicit `false`
    /// for either is rejected.
    #[instrument(skip(self, password, extra_fields))]
    pub async fn create_superuser(
        &self,
        email: &str,
        password: Option<&str>,
        mut extra_fields: ExtraFields,
    ) -> Result<user::Model> {
        trace!("Entering create_superuser");

        extra_fields.is_staff.get_or_insert(true);
        extra_fields.is_superuser.get_or_insert(true);

        if extra_fields.is_staff != Some(true) {
            warn!("Rejected superuser creation with is_staff=false");
            return Err(ValidationError::SuperuserNotStaff.into());
        }
        if extra_fields.is_superuser != Some(true) {
            warn!("Rejected superuser creation with is_superuser=false");
            return Err(ValidationError::SuperuserNotSuperuser.into());
        }

        self.create_user(email, password, extra_fields).await
    }

    pub async fn get(&self, id: i32) -> Result<Option<user::Model>> {
        Ok(user::Entity::find_by_id(id).one(self.db).await?)
    }

    /// Looks a user up by login identifier, normalizing it first.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<user::Model>> {
        let email = normalize_email(email);
        Ok(user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db)
            .await?)
    }
}
