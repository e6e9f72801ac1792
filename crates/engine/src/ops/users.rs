//! Account management: registration, password change, password reset.
//!
//! Sign-in itself happens at the HTTP layer (Basic auth resolved per
//! request); the engine only owns the credential rows.

use sea_orm::{ActiveValue, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine,
    users::{self, password_digest},
    util::{normalize_optional_text, normalize_required_name},
};

use super::Engine;

const MIN_PASSWORD_LEN: usize = 8;

fn check_password_policy(password: &str) -> ResultEngine<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(EngineError::PasswordPolicy(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

impl Engine {
    /// Creates an account. Usernames are unique; only the password digest is
    /// stored.
    pub async fn register_user(
        &self,
        username: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> ResultEngine<()> {
        let username = normalize_required_name(username, "username")?;
        check_password_policy(password)?;

        let existing = users::Entity::find_by_id(username.clone())
            .one(&self.database)
            .await?;
        if existing.is_some() {
            return Err(EngineError::ExistingKey(username));
        }

        let entry = users::ActiveModel {
            username: ActiveValue::Set(username),
            password_digest: ActiveValue::Set(password_digest(password)),
            display_name: ActiveValue::Set(normalize_optional_text(display_name)),
            reset_code: ActiveValue::Set(None),
        };
        entry.insert(&self.database).await?;
        Ok(())
    }

    /// Changes a password after verifying the current one.
    pub async fn update_password(
        &self,
        username: &str,
        current: &str,
        new: &str,
    ) -> ResultEngine<()> {
        check_password_policy(new)?;

        let user = users::Entity::find_by_id(username.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;

        if user.password_digest != password_digest(current) {
            return Err(EngineError::InvalidCredentials(
                "current password does not match".to_string(),
            ));
        }

        let mut entry: users::ActiveModel = user.into();
        entry.password_digest = ActiveValue::Set(password_digest(new));
        entry.update(&self.database).await?;
        Ok(())
    }

    /// Issues a single-use reset code for the account.
    ///
    /// Delivery of the code is out of band; the caller decides how to hand
    /// it to the user.
    pub async fn request_password_reset(&self, username: &str) -> ResultEngine<String> {
        let user = users::Entity::find_by_id(username.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;

        let code = Uuid::new_v4().simple().to_string();
        let mut entry: users::ActiveModel = user.into();
        entry.reset_code = ActiveValue::Set(Some(code.clone()));
        entry.update(&self.database).await?;

        Ok(code)
    }

    /// Consumes a reset code and sets a new password.
    pub async fn reset_password(&self, code: &str, new_password: &str) -> ResultEngine<()> {
        check_password_policy(new_password)?;
        let code = normalize_required_name(code, "reset code")?;

        let user = users::Entity::find()
            .filter(users::Column::ResetCode.eq(code))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("reset code not valid".to_string()))?;

        let mut entry: users::ActiveModel = user.into();
        entry.password_digest = ActiveValue::Set(password_digest(new_password));
        entry.reset_code = ActiveValue::Set(None);
        entry.update(&self.database).await?;
        Ok(())
    }
}
