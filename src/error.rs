// SPDX-License-Identifier: MPL-2.0
use crate::application::port::ApiError;
use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Config(String),
    Api(ApiError),
}

impl ApiError {
    /// Returns the i18n key describing this failure to the user.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            ApiError::Transport(_) => "error-api-unreachable",
            ApiError::Status { code, .. } if *code == 404 => "error-api-not-found",
            ApiError::Status { .. } => "error-api-status",
            ApiError::Rejected(_) => "error-api-rejected",
            ApiError::Decode(_) => "error-api-decode",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Api(e) => write!(f, "API Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        Error::Api(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
