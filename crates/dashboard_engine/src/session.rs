use std::sync::{PoisonError, RwLock};

use engine_logging::{engine_info, engine_warn};

use crate::client::AuthApi;
use crate::{ApiError, FailureKind, UserProfile};

/// Signed-in identity shared between the HTTP client and the front end.
///
/// Anonymous sessions are valid; analysis calls then go out without an
/// `Authorization` header.
#[derive(Debug, Default)]
pub struct Session {
    token: RwLock<Option<String>>,
    user: RwLock<Option<UserProfile>>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let session = Self::default();
        session.set_token(token);
        session
    }

    pub fn bearer(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.bearer().is_some()
    }

    /// Replaces the token. The cached user is dropped until the next refresh.
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.into());
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn invalidate(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Reloads the user behind the current token; any failure signs the
    /// session out.
    pub async fn refresh(&self, auth: &dyn AuthApi) -> Result<UserProfile, ApiError> {
        let Some(token) = self.bearer() else {
            return Err(ApiError::new(FailureKind::NotSignedIn, "Not signed in"));
        };
        match auth.current_user(&token).await {
            Ok(user) => {
                engine_info!("Session refreshed for {}", user.email);
                *self.user.write().unwrap_or_else(PoisonError::into_inner) = Some(user.clone());
                Ok(user)
            }
            Err(err) => {
                engine_warn!("Session refresh failed, signing out: {}", err);
                self.invalidate();
                Err(err)
            }
        }
    }

    pub async fn login(
        &self,
        auth: &dyn AuthApi,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, ApiError> {
        let token = auth.login(email, password).await?;
        self.set_token(token.access_token);
        self.refresh(auth).await
    }

    /// Registers the account and signs straight in with it.
    pub async fn register(
        &self,
        auth: &dyn AuthApi,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, ApiError> {
        auth.register(email, password).await?;
        self.login(auth, email, password).await
    }
}
