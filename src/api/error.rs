//! API error types
use reqwest::StatusCode;
use thiserror::Error;

const SERVER_MESSAGE: &str = "Error de servidor. Inténtalo de nuevo más tarde.";
const GENERIC_MESSAGE: &str = "Hubo un error. Inténtalo de nuevo más tarde.";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure or undecodable body
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Not found: {resource}")]
    NotFound { resource: &'static str },

    #[error("Server error ({0})")]
    Server(StatusCode),

    #[error("Unexpected status {0}")]
    Status(StatusCode),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Maps a non-success status to its error.
    pub fn from_status(status: StatusCode, resource: &'static str) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
            StatusCode::NOT_FOUND => ApiError::NotFound { resource },
            StatusCode::INTERNAL_SERVER_ERROR => ApiError::Server(status),
            _ => ApiError::Status(status),
        }
    }

    /// The single line shown to users.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::NotFound { resource } => format!("No se encontraron datos de {resource}"),
            ApiError::Server(_) => SERVER_MESSAGE.to_string(),
            ApiError::Unauthorized => format!("{GENERIC_MESSAGE} (inicia sesión de nuevo)"),
            _ => GENERIC_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, "ventas"),
            ApiError::NotFound { resource: "ventas" }
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "ventas"),
            ApiError::Server(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, "pantallas"),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, "pantallas"),
            ApiError::Status(_)
        ));
    }

    #[test]
    fn three_canned_messages() {
        assert_eq!(
            ApiError::from_status(StatusCode::NOT_FOUND, "ventas").user_message(),
            "No se encontraron datos de ventas"
        );
        assert_eq!(
            ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "ventas").user_message(),
            SERVER_MESSAGE
        );
        assert_eq!(
            ApiError::from_status(StatusCode::SERVICE_UNAVAILABLE, "ventas").user_message(),
            GENERIC_MESSAGE
        );
    }
}
