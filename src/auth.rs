// src/auth.rs
//! Login and signup screens. Credentials are validated locally only; any
//! well-formed submission is accepted after a short simulated round trip.

use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::context::{AppContext, Route};

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Please fill in all fields")]
    MissingFields,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Password must be at least 8 characters long")]
    PasswordTooShort,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(AuthError::MissingFields);
        }
        Ok(())
    }
}

impl SignupForm {
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.full_name.is_empty()
            || self.email.is_empty()
            || self.password.is_empty()
            || self.confirm_password.is_empty()
        {
            return Err(AuthError::MissingFields);
        }
        if self.password != self.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }
        // Length in UTF-16 code units, as browsers measure it
        if self.password.encode_utf16().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::PasswordTooShort);
        }
        Ok(())
    }
}

/// Stand-in for a real identity provider
pub struct Authenticator {
    delay: Duration,
}

impl Authenticator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub async fn login(&self, ctx: &mut AppContext, form: &LoginForm) -> Result<Route, AuthError> {
        if let Err(e) = form.validate() {
            warn!("Login rejected: {}", e);
            return Err(e);
        }

        tokio::time::sleep(self.delay).await;
        ctx.set_authenticated()?;
        info!("Login accepted for {}", form.email);
        Ok(Route::Home)
    }

    pub async fn signup(
        &self,
        ctx: &mut AppContext,
        form: &SignupForm,
    ) -> Result<Route, AuthError> {
        if let Err(e) = form.validate() {
            warn!("Signup rejected: {}", e);
            return Err(e);
        }

        tokio::time::sleep(self.delay).await;
        ctx.set_authenticated()?;
        info!("Signup accepted for {}", form.email);
        Ok(Route::Home)
    }

    pub fn logout(&self, ctx: &mut AppContext) -> Result<Route, AuthError> {
        ctx.clear_session()?;
        info!("Logged out");
        Ok(Route::Login)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn ctx() -> AppContext {
        AppContext::new(Box::new(MemoryStore::new())).unwrap()
    }

    fn signup(password: &str, confirm: &str) -> SignupForm {
        SignupForm {
            full_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn test_signup_validation_order() {
        let missing = SignupForm {
            full_name: String::new(),
            ..signup("short", "other")
        };
        assert!(matches!(missing.validate(), Err(AuthError::MissingFields)));
        assert!(matches!(
            signup("short", "other").validate(),
            Err(AuthError::PasswordMismatch)
        ));
        assert!(matches!(
            signup("short", "short").validate(),
            Err(AuthError::PasswordTooShort)
        ));
        assert!(signup("longenough", "longenough").validate().is_ok());
    }

    #[test]
    fn test_password_length_counts_utf16_units() {
        let emoji = "🔒🔑🗝🛡";
        assert!(signup(emoji, emoji).validate().is_ok());

        let accented = "ééééééé";
        assert!(matches!(
            signup(accented, accented).validate(),
            Err(AuthError::PasswordTooShort)
        ));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(AuthError::MissingFields.to_string(), "Please fill in all fields");
        assert_eq!(
            AuthError::PasswordTooShort.to_string(),
            "Password must be at least 8 characters long"
        );
    }

    #[tokio::test]
    async fn test_login_sets_session_and_goes_home() {
        let mut ctx = ctx();
        let auth = Authenticator::new(Duration::ZERO);
        let form = LoginForm {
            email: "anyone@example.com".to_string(),
            password: "x".to_string(),
        };

        let route = auth.login(&mut ctx, &form).await.unwrap();

        assert_eq!(route, Route::Home);
        assert!(ctx.is_authenticated());
    }

    #[tokio::test]
    async fn test_rejected_attempts_leave_session_unset() {
        let mut ctx = ctx();
        let auth = Authenticator::new(Duration::ZERO);

        let login = LoginForm {
            email: "jane@example.com".to_string(),
            password: String::new(),
        };
        assert!(auth.login(&mut ctx, &login).await.is_err());
        assert!(auth.signup(&mut ctx, &signup("abc", "abc")).await.is_err());
        assert!(!ctx.is_authenticated());
    }

    #[tokio::test]
    async fn test_signup_then_logout() {
        let mut ctx = ctx();
        let auth = Authenticator::new(Duration::ZERO);

        let route = auth
            .signup(&mut ctx, &signup("password1", "password1"))
            .await
            .unwrap();
        assert_eq!(route, Route::Home);
        assert!(ctx.is_authenticated());

        assert_eq!(auth.logout(&mut ctx).unwrap(), Route::Login);
        assert!(!ctx.is_authenticated());
    }
}
