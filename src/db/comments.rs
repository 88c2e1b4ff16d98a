//! Database operations for comments.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set};

use crate::entity::comment::{self, ActiveModel, Entity as Comment};
use crate::error::{AppError, AppResult};
use crate::models::CommentTarget;

use super::ensure_exists;

pub async fn get<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<comment::Model> {
    Comment::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get comment: {}", e)))?
        .ok_or_else(|| AppError::NotFound(format!("Comment {}", id)))
}

/// Attach a comment to exactly one target, which must exist.
pub async fn create<C: ConnectionTrait>(
    db: &C,
    target: CommentTarget,
    content: &str,
    created_by: i32,
) -> AppResult<comment::Model> {
    if content.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Comment content is required".to_string(),
        ));
    }
    ensure_exists(db, target.kind(), target.id()).await?;

    let (test_case_id, bug_id, test_execution_id) = match target {
        CommentTarget::TestCase(id) => (Some(id), None, None),
        CommentTarget::Bug(id) => (None, Some(id), None),
        CommentTarget::TestExecution(id) => (None, None, Some(id)),
    };

    let model = ActiveModel {
        content: Set(content.to_string()),
        test_case_id: Set(test_case_id),
        bug_id: Set(bug_id),
        test_execution_id: Set(test_execution_id),
        created_by: Set(Some(created_by)),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    Ok(model.insert(db).await?)
}
