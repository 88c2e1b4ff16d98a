//! Database operations for notifications.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entity::notification::{self, ActiveModel, Entity as Notification};
use crate::error::{AppError, AppResult};
use crate::models::{NotificationQuery, NotificationType};

pub async fn get<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<notification::Model> {
    Notification::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get notification: {}", e)))?
        .ok_or_else(|| AppError::NotFound(format!("Notification {}", id)))
}

/// Notifications for one user, newest first.
pub async fn list_for_user<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    query: &NotificationQuery,
) -> AppResult<Vec<notification::Model>> {
    let mut select = Notification::find().filter(notification::Column::UserId.eq(user_id));

    if query.unread_only {
        select = select.filter(notification::Column::IsRead.eq(false));
    }

    let notifications = select
        .order_by_desc(notification::Column::CreatedAt)
        .order_by_desc(notification::Column::Id)
        .all(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to list notifications: {}", e)))?;

    Ok(notifications)
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    title: &str,
    message: &str,
    notification_type: NotificationType,
) -> AppResult<notification::Model> {
    let model = ActiveModel {
        title: Set(title.to_string()),
        message: Set(Some(message.to_string())),
        notification_type: Set(notification_type.as_str().to_string()),
        user_id: Set(user_id),
        is_read: Set(false),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    Ok(model.insert(db).await?)
}

/// Mark one notification read.
pub async fn mark_read<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<notification::Model> {
    let existing = get(db, id).await?;

    let mut active: ActiveModel = existing.into();
    active.is_read = Set(true);

    Ok(active.update(db).await?)
}

/// Mark every unread notification of a user read. Returns how many changed.
pub async fn mark_all_read<C: ConnectionTrait>(db: &C, user_id: i32) -> AppResult<u64> {
    let result = Notification::update_many()
        .col_expr(notification::Column::IsRead, Expr::value(true))
        .filter(notification::Column::UserId.eq(user_id))
        .filter(notification::Column::IsRead.eq(false))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}
