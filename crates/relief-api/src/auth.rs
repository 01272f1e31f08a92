//! # Authentication & Authorization Middleware
//!
//! Bearer token middleware with role-based access control.
//!
//! ## Token Format
//!
//! ```text
//! Bearer {role}:{subject}:{secret}   role-bound token, subject may be empty
//! Bearer {secret}                     bare shared secret, treated as Admin
//! ```
//!
//! Every authenticated request gets a [`CallerIdentity`] injected into the
//! request extensions. [`require_admin`] then gates the back-office routes.

use axum::extract::Request;
use axum::http::header;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use utoipa::ToSchema;

use crate::error::AppError;

// -- Role ---------------------------------------------------------------------

/// Caller roles, ordered by privilege level.
///
/// `Volunteer < Coordinator < Admin`, so access checks are a single `>=`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Field volunteer. No back-office access.
    Volunteer,
    /// Crisis coordinator. No back-office access.
    Coordinator,
    /// Administrator. Full access.
    Admin,
}

impl Role {
    /// Return the string representation of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Volunteer => "volunteer",
            Self::Coordinator => "coordinator",
            Self::Admin => "admin",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "coordinator" => Some(Self::Coordinator),
            "volunteer" => Some(Self::Volunteer),
            _ => None,
        }
    }
}

// -- CallerIdentity -----------------------------------------------------------

/// Identity of the authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    /// The caller's role.
    pub role: Role,
    /// Free-form subject from a role-bound token, if one was given.
    pub subject: Option<String>,
}

impl CallerIdentity {
    /// Identity used for bare-secret tokens and when auth is disabled.
    pub fn admin() -> Self {
        Self {
            role: Role::Admin,
            subject: None,
        }
    }

    /// Check if the caller has at least the given minimum role.
    pub fn has_role(&self, minimum: Role) -> bool {
        self.role >= minimum
    }
}

/// Extracts the identity that [`auth_middleware`] injected into extensions.
/// Returns 401 if no identity is present.
#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("no caller identity in request context".into()))
    }
}

/// Check that the caller has at least the required role (403 otherwise).
pub fn require_role(caller: &CallerIdentity, minimum: Role) -> Result<(), AppError> {
    if caller.has_role(minimum) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "role '{}' required, caller has '{}'",
            minimum.as_str(),
            caller.role.as_str()
        )))
    }
}

// -- Auth Configuration -------------------------------------------------------

/// Auth configuration injected into request extensions.
///
/// `Debug` redacts the token value.
#[derive(Clone)]
pub struct AuthConfig {
    /// Expected shared secret. `None` disables authentication.
    pub token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

// -- Token Validation ---------------------------------------------------------

/// Constant-time comparison of bearer secrets.
fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Parse a bearer token in the form `{role}:{subject}:{secret}` or `{secret}`.
pub fn parse_bearer_token(provided: &str, expected_secret: &str) -> Result<CallerIdentity, String> {
    let parts: Vec<&str> = provided.splitn(3, ':').collect();

    match parts.as_slice() {
        [secret] => {
            if constant_time_token_eq(secret, expected_secret) {
                Ok(CallerIdentity::admin())
            } else {
                Err("invalid bearer token".into())
            }
        }
        [role, subject, secret] => {
            if !constant_time_token_eq(secret, expected_secret) {
                return Err("invalid bearer token".into());
            }
            let role = Role::parse(role).ok_or_else(|| format!("unknown role: {role}"))?;
            let subject = (!subject.is_empty()).then(|| subject.to_string());
            Ok(CallerIdentity { role, subject })
        }
        _ => Err("invalid token format, expected {role}:{subject}:{secret} or {secret}".into()),
    }
}

// -- Middleware ---------------------------------------------------------------

/// Validate the bearer token and inject the caller's [`CallerIdentity`].
///
/// When `AuthConfig.token` is `None` every request is treated as Admin.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let expected = request
        .extensions()
        .get::<AuthConfig>()
        .and_then(|config| config.token.clone());

    let Some(expected) = expected else {
        request.extensions_mut().insert(CallerIdentity::admin());
        return next.run(request).await;
    };

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let identity = match auth_header {
        Some(value) => match value.strip_prefix("Bearer ") {
            Some(provided) => parse_bearer_token(provided, &expected),
            None => Err("authorization header must use Bearer scheme".to_string()),
        },
        None => Err("missing authorization header".to_string()),
    };

    match identity {
        Ok(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(reason) => {
            tracing::warn!(reason = %reason, "authentication failed");
            AppError::Unauthorized(reason).into_response()
        }
    }
}

/// Reject callers below [`Role::Admin`] with 403.
///
/// Must run after [`auth_middleware`].
pub async fn require_admin(caller: CallerIdentity, request: Request, next: Next) -> Response {
    match require_role(&caller, Role::Admin) {
        Ok(()) => next.run(request).await,
        Err(err) => {
            tracing::warn!(role = caller.role.as_str(), "authorization failed");
            err.into_response()
        }
    }
}
