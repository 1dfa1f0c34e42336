use serde::Serialize;
use thiserror::Error;

/// A value that was present in the source text but lies outside cricket's domain.
///
/// These are kept apart from "absent" values: a missing score just means a team
/// has not batted yet, while an out-of-domain one means the upstream format changed.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DataQualityIssue {
    /// Ball digit after the overs point was 6-9
    #[error("ball digit {digit} out of range in overs value {raw:?}")]
    BallDigitOutOfRange { raw: String, digit: u8 },

    /// Overs fraction had more than one digit, or was not numeric
    #[error("malformed overs value {raw:?}")]
    MalformedOvers { raw: String },

    /// More than ten wickets reported
    #[error("wickets {wickets} exceed 10 in {raw:?}")]
    WicketsOutOfRange { raw: String, wickets: u32 },

    /// A numeric token that does not fit the expected range
    #[error("numeric value {raw:?} out of range")]
    NumberOutOfRange { raw: String },

    /// More players of one kind than can be on the field at once
    #[error("found {found} current {role}, expected at most {limit}")]
    UnexpectedPlayerCount {
        role: &'static str,
        found: usize,
        limit: usize,
    },
}

/// Failure to resolve a listing ordinal or locator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("no match found for {query:?}")]
    NotFound { query: String },
}

impl LookupError {
    pub fn not_found(query: impl Into<String>) -> Self {
        LookupError::NotFound {
            query: query.into(),
        }
    }
}

/// Failure of a service entry point
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The requested match is not in the current listing
    #[error(transparent)]
    NotFound(#[from] LookupError),

    /// An upstream fetch or decode failed
    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}
