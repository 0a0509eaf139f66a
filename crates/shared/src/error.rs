use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{MemberId, ReportId, ReportStatus};

/// Input field names reported back to the form layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Site,
    WorkCompleted,
    ProgressPercent,
    WorkRemaining,
    Content,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Site => "site",
            Field::WorkCompleted => "work_completed",
            Field::ProgressPercent => "progress_percent",
            Field::WorkRemaining => "work_remaining",
            Field::Content => "content",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn join_fields(fields: &BTreeSet<Field>) -> String {
    fields
        .iter()
        .map(|field| field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Every field that failed validation, not only the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid fields: {}", join_fields(.fields))]
pub struct ValidationError {
    pub fields: BTreeSet<Field>,
}

impl ValidationError {
    pub fn single(field: Field) -> Self {
        Self {
            fields: BTreeSet::from([field]),
        }
    }

    pub fn contains(&self, field: Field) -> bool {
        self.fields.contains(&field)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("report {id} not found")]
pub struct NotFoundError {
    pub id: ReportId,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("team member {id} not found")]
pub struct MemberNotFoundError {
    pub id: MemberId,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatusError {
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
    #[error("report {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: ReportId,
        from: ReportStatus,
        to: ReportStatus,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} id `{raw}`")]
pub struct ParseIdError {
    pub kind: &'static str,
    pub raw: String,
}

impl ParseIdError {
    pub fn new(kind: &'static str, raw: impl Into<String>) -> Self {
        Self {
            kind,
            raw: raw.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} `{raw}`")]
pub struct UnknownValueError {
    pub kind: &'static str,
    pub raw: String,
}

impl UnknownValueError {
    pub fn new(kind: &'static str, raw: impl Into<String>) -> Self {
        Self {
            kind,
            raw: raw.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    Validation,
    Conflict,
    Internal,
}

/// Error envelope handed to the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            fields: Vec::new(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<ValidationError> for ApiError {
    fn from(value: ValidationError) -> Self {
        Self {
            code: ErrorCode::Validation,
            message: value.to_string(),
            fields: value.fields.into_iter().collect(),
        }
    }
}

impl From<NotFoundError> for ApiError {
    fn from(value: NotFoundError) -> Self {
        Self::new(ErrorCode::NotFound, value.to_string())
    }
}

impl From<MemberNotFoundError> for ApiError {
    fn from(value: MemberNotFoundError) -> Self {
        Self::new(ErrorCode::NotFound, value.to_string())
    }
}

impl From<StatusError> for ApiError {
    fn from(value: StatusError) -> Self {
        match value {
            StatusError::NotFound(err) => err.into(),
            other @ StatusError::InvalidTransition { .. } => {
                Self::new(ErrorCode::Conflict, other.to_string())
            }
        }
    }
}
