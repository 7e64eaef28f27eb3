//! Search validation errors

use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// All strict-field failures found while normalizing one request
#[derive(Debug, Error)]
#[error("{}", summary(.issues))]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn new<I>(issues: I) -> Self
    where
        I: IntoIterator<Item = ValidationIssue>,
    {
        Self {
            issues: issues.into_iter().collect(),
        }
    }

    pub fn single(field: &str, code: &'static str, message: impl Into<String>) -> Self {
        Self::new([ValidationIssue::query(field, code, message)])
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

/// One offending query parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ValidationIssue {
    /// Path of the parameter, e.g. `query.budgetMin`
    pub field: String,
    pub code: &'static str,
    pub message: String,
}

impl ValidationIssue {
    /// Issue on a query-string parameter
    pub fn query(param: &str, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            field: format!("query.{}", param),
            code,
            message: message.into(),
        }
    }
}

fn summary(issues: &[ValidationIssue]) -> String {
    match issues {
        [] => "Validation failed".to_string(),
        [only] => only.message.clone(),
        _ => issues
            .iter()
            .map(|i| i.message.as_str())
            .collect::<Vec<_>>()
            .join("; "),
    }
}
