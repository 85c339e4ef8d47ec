//! Caller identity extractors.
//!
//! Sign-in is handled by an upstream identity provider. For every request it
//! forwards the caller's user id together with an HMAC-SHA256 signature of
//! that id, keyed with the secret shared with Shopdesk:
//!
//! ```text
//! x-shopdesk-user:      user_2abcDEF
//! x-shopdesk-signature: hex(hmac_sha256(SHOPDESK_IDENTITY_SECRET, "user_2abcDEF"))
//! ```
//!
//! A request without both headers, or with a signature that does not verify,
//! has no caller identity.

use axum::{extract::FromRequestParts, http::request::Parts};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use thiserror::Error;

use shopdesk_core::UserId;

use crate::error::{AppError, set_sentry_user};
use crate::state::AppState;

/// Header carrying the caller's user id.
pub const USER_HEADER: &str = "x-shopdesk-user";

/// Header carrying the hex HMAC-SHA256 signature of the user id.
pub const SIGNATURE_HEADER: &str = "x-shopdesk-signature";

/// Reasons an identity assertion is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("missing identity headers")]
    Missing,
    #[error("invalid user id: {0}")]
    InvalidUser(#[from] shopdesk_core::UserIdError),
    #[error("malformed signature")]
    MalformedSignature,
    #[error("signature mismatch")]
    SignatureMismatch,
}

/// Signs and verifies caller identities with the shared identity secret.
#[derive(Clone)]
pub struct IdentityVerifier {
    secret: SecretString,
}

impl std::fmt::Debug for IdentityVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityVerifier")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl IdentityVerifier {
    /// Create a verifier for the given shared secret.
    #[must_use]
    pub const fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    fn mac(&self) -> Hmac<Sha256> {
        // HMAC accepts keys of any length
        #[allow(clippy::expect_used)]
        Hmac::<Sha256>::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC accepts keys of any length")
    }

    /// Compute the signature header value for a user id.
    #[must_use]
    pub fn sign(&self, user: &UserId) -> String {
        let mut mac = self.mac();
        mac.update(user.as_str().as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Verify an identity assertion and return the caller's user id.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError` if the user id is blank, the signature is not
    /// hex, or the signature does not match.
    pub fn verify(&self, user: &str, signature: &str) -> Result<UserId, IdentityError> {
        let user = UserId::parse(user)?;
        let signature =
            hex::decode(signature.trim()).map_err(|_| IdentityError::MalformedSignature)?;

        let mut mac = self.mac();
        mac.update(user.as_str().as_bytes());
        // Constant-time comparison
        mac.verify_slice(&signature)
            .map_err(|_| IdentityError::SignatureMismatch)?;

        Ok(user)
    }

    /// Resolve the caller identity from request headers, if any.
    fn resolve(&self, parts: &Parts) -> Result<UserId, IdentityError> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.trim().is_empty())
        };

        let user = header(USER_HEADER).ok_or(IdentityError::Missing)?;
        let signature = header(SIGNATURE_HEADER).ok_or(IdentityError::Missing)?;
        self.verify(user, signature)
    }
}

/// Extractor that requires a verified caller identity.
///
/// Rejects with `401 Unauthorized` when the identity headers are missing or
/// do not verify.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireUser(user): RequireUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {user}!")
/// }
/// ```
pub struct RequireUser(pub UserId);

/// Resolve the caller and attach it to the current span and Sentry scope.
fn identify(parts: &Parts, state: &AppState) -> Result<UserId, IdentityError> {
    let user = state.identity().resolve(parts)?;
    tracing::Span::current().record("user_id", user.as_str());
    set_sentry_user(&user);
    Ok(user)
}

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match identify(parts, state) {
            Ok(user) => Ok(Self(user)),
            Err(IdentityError::Missing) => Err(AppError::Unauthorized),
            Err(e) => {
                tracing::debug!(error = %e, "Rejected identity assertion");
                Err(AppError::Unauthorized)
            }
        }
    }
}

/// Extractor that optionally gets the caller identity.
///
/// Unlike `RequireUser`, this does not reject the request when no verified
/// identity is present. A verified caller is still recorded for error
/// reports.
pub struct OptionalUser(pub Option<UserId>);

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(identify(parts, state).ok()))
    }
}
