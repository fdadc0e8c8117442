//! Classified failures returned by the lookups.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    /// Transport failure or the request did not settle within its budget.
    #[error("Network error: {message}")]
    Network { message: String, timed_out: bool },

    /// A response arrived but its status is not 2xx.
    #[error("Provider returned status {status}: {message}")]
    Provider { status: u16, message: String },

    /// Geocoding succeeded but returned no candidates.
    #[error("Place not found: {query}")]
    NotFound { query: String },

    #[error("Failed to parse provider response: {0}")]
    Parse(String),

    #[error("Place query must not be empty")]
    InvalidQuery,
}

impl FetchError {
    pub(crate) fn timeout(budget: Duration) -> Self {
        Self::Network {
            message: format!("request timed out after {} ms", budget.as_millis()),
            timed_out: true,
        }
    }

    pub(crate) fn transport(err: &reqwest::Error) -> Self {
        Self::Network {
            message: err.to_string(),
            timed_out: false,
        }
    }

    /// HTTP status code, when the failure came from a received response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Provider { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Network { timed_out, .. } => *timed_out,
            _ => false,
        }
    }

    /// Short text suitable for a "try again" prompt.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network { .. } if self.is_timeout() => {
                "The weather service took too long to respond.".to_string()
            }
            Self::Network { .. } => "Network error. Check your connection.".to_string(),
            Self::Provider { status: 401, .. } => {
                "The weather service rejected the API key.".to_string()
            }
            Self::Provider { status: 404, .. } => "No weather data for that place.".to_string(),
            Self::Provider { status, .. } => format!("Weather service error ({status})."),
            Self::NotFound { query } => format!("Could not find a place called \"{query}\"."),
            Self::Parse(_) => "The weather service sent an unexpected response.".to_string(),
            Self::InvalidQuery => "Enter a place name.".to_string(),
        }
    }
}
