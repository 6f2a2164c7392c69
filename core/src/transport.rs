use core::fmt;

use gamehub_protocol::{ApiRequest, ApiResponse, ErrorBody};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::*;

/// Normalized name of the bearer header sent with every request.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

const BEARER_PREFIX: &str = "Bearer ";

/// Whatever the login flow left behind, handed to the session explicitly.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    stored: Option<String>,
}

impl Credentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            stored: Some(token.into()),
        }
    }

    pub fn from_stored(stored: Option<String>) -> Self {
        Self { stored }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Header value for authenticated calls; refused when no usable token exists.
    pub fn authorization(&self) -> Result<AuthToken> {
        let token = self
            .stored
            .as_deref()
            .map(str::trim)
            .map(|raw| raw.strip_prefix(BEARER_PREFIX).unwrap_or(raw).trim())
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingToken)?;

        Ok(AuthToken(format!("{BEARER_PREFIX}{token}")))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("present", &self.stored.is_some())
            .finish()
    }
}

/// A validated `Bearer <token>` header value.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn header_value(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(Bearer ***)")
    }
}

/// Correlates a response with the request that produced it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(pub(crate) u64);

/// A request the host must perform on the session's behalf.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outbound {
    pub ticket: Ticket,
    pub request: ApiRequest,
    pub authorization: AuthToken,
}

impl Outbound {
    pub fn header(&self) -> (&'static str, &str) {
        (AUTHORIZATION_HEADER, self.authorization.header_value())
    }
}

/// The request never produced an HTTP response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Maps a raw transport result onto the error taxonomy, yielding the body of
/// a successful response.
pub(crate) fn classify(result: core::result::Result<ApiResponse, TransportError>) -> Result<String> {
    let response = result.map_err(|err| SyncError::Network(err.0))?;

    if response.is_success() {
        return Ok(response.body);
    }

    let status = response.status;
    match status {
        401 | 403 => Err(AuthError::Rejected(status).into()),
        400..=499 => Err(SyncError::Validation(error_messages(status, &response.body))),
        _ => Err(SyncError::Network(format!(
            "server error {status}: {}",
            error_messages(status, &response.body).join("; ")
        ))),
    }
}

fn error_messages(status: u16, body: &str) -> Vec<String> {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(error_body) => error_body.into_messages(),
        Err(_) if !body.trim().is_empty() => vec![body.trim().to_string()],
        Err(_) => vec![format!("Request failed with status {status}")],
    }
}

pub(crate) fn decode_json<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|err| SyncError::malformed(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_blank_token_is_refused() {
        assert_eq!(
            Credentials::anonymous().authorization(),
            Err(SyncError::Auth(AuthError::MissingToken))
        );
        assert!(Credentials::new("   ").authorization().is_err());
        assert!(Credentials::new("Bearer ").authorization().is_err());
    }

    #[test]
    fn bearer_prefix_is_added_once() {
        let plain = Credentials::new("abc").authorization().unwrap();
        let prefixed = Credentials::new("Bearer abc").authorization().unwrap();

        assert_eq!(plain.header_value(), "Bearer abc");
        assert_eq!(plain, prefixed);
    }

    #[test]
    fn debug_output_never_contains_the_token() {
        let credentials = Credentials::new("secret-token");
        let token = credentials.authorization().unwrap();

        assert!(!format!("{credentials:?}").contains("secret"));
        assert!(!format!("{token:?}").contains("secret"));
    }

    #[test]
    fn classify_maps_statuses_onto_the_taxonomy() {
        assert_eq!(classify(Ok(ApiResponse::ok("{}"))), Ok("{}".to_string()));
        assert_eq!(
            classify(Ok(ApiResponse::new(401, ""))),
            Err(SyncError::Auth(AuthError::Rejected(401)))
        );
        assert_eq!(
            classify(Ok(ApiResponse::new(400, r#"{"message":["bad row"]}"#))),
            Err(SyncError::Validation(vec!["bad row".into()]))
        );
        assert!(matches!(
            classify(Ok(ApiResponse::new(502, ""))),
            Err(SyncError::Network(_))
        ));
        assert_eq!(
            classify(Err(TransportError::new("offline"))),
            Err(SyncError::Network("offline".into()))
        );
    }
}
