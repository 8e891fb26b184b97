// Domain errors
use serde::Serialize;
use thiserror::Error;

/// Why a single fetch from the metrics source failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("network failure: {0}")]
    NetworkFailure(String),
    #[error("metrics source responded with status {0}")]
    NonSuccessStatus(u16),
    #[error("malformed metrics payload: {0}")]
    MalformedPayload(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FetchErrorKind {
    NetworkFailure,
    NonSuccessStatus,
    MalformedPayload,
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::NetworkFailure(_) => FetchErrorKind::NetworkFailure,
            FetchError::NonSuccessStatus(_) => FetchErrorKind::NonSuccessStatus,
            FetchError::MalformedPayload(_) => FetchErrorKind::MalformedPayload,
        }
    }

    pub fn malformed(detail: impl Into<String>) -> Self {
        FetchError::MalformedPayload(detail.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("sample is missing a value for series '{0}'")]
    MissingSeries(String),
}
