use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Serialize, FromRow)]
pub struct CommentWithAuthor {
    pub id: i32,
    pub survey_id: i32,
    pub user_id: i32,
    pub username: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}
