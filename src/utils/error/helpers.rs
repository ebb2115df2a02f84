//! Helper functions for creating and classifying errors

use super::types::DeskError;

impl DeskError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network(message.into())
    }

    pub fn api<S: Into<String>>(status: u16, message: S) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    pub fn shape<S: Into<String>>(message: S) -> Self {
        Self::Shape(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage(message.into())
    }

    /// Errors raised locally, before any request leaves the process
    pub fn is_client_side(&self) -> bool {
        matches!(
            self,
            DeskError::Validation(_)
                | DeskError::InvalidTransition { .. }
                | DeskError::MutationInFlight(_)
                | DeskError::Closed
        )
    }

    /// Errors caused by the transport or the remote server
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            DeskError::Network(_) | DeskError::Api { .. } | DeskError::HttpClient(_)
        )
    }

    /// HTTP status carried by the error, when there is one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            DeskError::Api { status, .. } => Some(*status),
            DeskError::HttpClient(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
