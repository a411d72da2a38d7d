use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Question {
    pub id: i32,
    pub survey_id: i32,
    pub description: String,
}
