use reqwest::StatusCode;
use thiserror::Error;

/// Every failure the client can surface, from local validation to HTTP errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Rejected locally before any network call
    #[error("{0}")]
    Validation(String),

    /// No session, or the backend answered 401
    #[error("not logged in or session expired, please log in again")]
    Unauthenticated,

    /// The backend answered 403, or the role guard refused the route
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Any other non-2xx answer
    #[error("request failed with status {status}: {}", message.as_deref().unwrap_or("no message"))]
    Http {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response shape: {0}")]
    Decode(String),

    /// Booking attempted without a fresh positive availability check
    #[error("{0}")]
    BookingNotAllowed(String),

    #[error("session store error: {0}")]
    Session(String),
}

impl ClientError {
    /// Builds the error for a non-2xx response, keeping the backend's `message` if any.
    pub fn from_status(status: StatusCode, message: Option<String>) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthenticated,
            StatusCode::FORBIDDEN => ClientError::Forbidden(
                message.unwrap_or_else(|| "access denied".to_string()),
            ),
            _ => ClientError::Http { status, message },
        }
    }

    /// The message shown to the user. Server-provided text wins, then the error's own text.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Http {
                message: Some(message),
                ..
            } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Replaces opaque failures with an operation-specific fallback message.
    ///
    /// Validation, auth and server-messaged errors keep their own text.
    pub fn or_fallback(self, fallback: &str) -> Self {
        match self {
            ClientError::Http { message: None, status } => ClientError::Http {
                status,
                message: Some(fallback.to_string()),
            },
            ClientError::Transport(err) => {
                tracing::debug!(error = %err, "replacing transport error with fallback");
                ClientError::Http {
                    status: StatusCode::SERVICE_UNAVAILABLE,
                    message: Some(fallback.to_string()),
                }
            }
            ClientError::Decode(detail) => {
                tracing::debug!(%detail, "replacing decode error with fallback");
                ClientError::Http {
                    status: StatusCode::BAD_GATEWAY,
                    message: Some(fallback.to_string()),
                }
            }
            other => other,
        }
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, ClientError::Unauthenticated)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_401_maps_to_unauthenticated() {
        let err = ClientError::from_status(StatusCode::UNAUTHORIZED, Some("jwt expired".into()));
        assert!(err.is_unauthenticated());
        assert!(err.user_message().contains("log in again"));
    }

    #[test]
    fn server_message_is_preferred() {
        let err = ClientError::from_status(
            StatusCode::BAD_REQUEST,
            Some("Property already booked".into()),
        );
        assert_eq!(err.user_message(), "Property already booked");
    }

    #[test]
    fn fallback_only_fills_missing_messages() {
        let bare = ClientError::from_status(StatusCode::INTERNAL_SERVER_ERROR, None)
            .or_fallback("Booking failed");
        assert_eq!(bare.user_message(), "Booking failed");

        let messaged = ClientError::from_status(StatusCode::CONFLICT, Some("Dates taken".into()))
            .or_fallback("Booking failed");
        assert_eq!(messaged.user_message(), "Dates taken");

        let validation = ClientError::Validation("End date must be after start date".into())
            .or_fallback("Booking failed");
        assert_eq!(validation.user_message(), "End date must be after start date");
    }
}
