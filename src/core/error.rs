//! Error types for query validation and rate fetching

use reqwest::StatusCode;
use thiserror::Error;

/// Validation errors. Any of these aborts the run before a request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("The required parameter <number_of_days> is missing")]
    MissingArgument,

    #[error("Invalid input: Please enter a digit for days")]
    InvalidInput,

    #[error("Invalid number of days. Enter value between 1 and 10")]
    InvalidRange,
}

/// Failure of a single date request. Never propagated past the fetcher.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("An error occurred. Error status: {status} for URL: {url}")]
    Remote { status: StatusCode, url: String },

    #[error("Connection error occurred: {url} {source}")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to parse rates response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_error_messages() {
        assert_eq!(
            QueryError::MissingArgument.to_string(),
            "The required parameter <number_of_days> is missing"
        );
        assert_eq!(
            QueryError::InvalidInput.to_string(),
            "Invalid input: Please enter a digit for days"
        );
        assert_eq!(
            QueryError::InvalidRange.to_string(),
            "Invalid number of days. Enter value between 1 and 10"
        );
    }

    #[test]
    fn test_remote_error_message() {
        let err = FetchError::Remote {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            url: "http://localhost/rates?json&date=01.12.2014".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "An error occurred. Error status: 500 Internal Server Error for URL: http://localhost/rates?json&date=01.12.2014"
        );
    }
}
