//! Deletion request and response models.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::services::cascade::CascadeReport;

/// Response for a single cascading deletion.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
    pub report: CascadeReport,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BulkDeleteRequest {
    #[serde(default)]
    pub ids: Vec<i32>,
}

/// Outcome of a bulk deletion: how many roots went, and why others did not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkDeleteSummary {
    pub deleted_count: u64,
    pub errors: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BulkDeleteResponse {
    pub success: bool,
    pub deleted_count: u64,
    pub errors: Vec<String>,
    pub message: String,
}

impl BulkDeleteResponse {
    pub fn from_summary(summary: BulkDeleteSummary, noun: &str) -> Self {
        let message = if summary.errors.is_empty() {
            format!("Deleted {} {}", summary.deleted_count, noun)
        } else {
            format!(
                "Deleted {} {} with {} error(s)",
                summary.deleted_count,
                noun,
                summary.errors.len()
            )
        };
        Self {
            success: true,
            deleted_count: summary.deleted_count,
            errors: summary.errors,
            message,
        }
    }
}
