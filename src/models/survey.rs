use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Serialize, FromRow)]
pub struct SurveyWithOwner {
    pub id: i32,
    pub name: String,
    pub owner_id: i32,
    pub owner_username: String,
    pub created_at: DateTime<Utc>,
}
