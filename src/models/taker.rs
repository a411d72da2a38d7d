use serde::Serialize;
use sqlx::FromRow;

/// An assignment joined with the survey it points at, for the inbox view.
#[derive(Debug, Serialize, FromRow)]
pub struct TakerWithSurvey {
    pub id: i32,
    pub survey_id: i32,
    pub is_read: bool,
    pub is_starred: bool,
    pub survey_name: String,
    pub owner_id: i32,
    pub owner_username: String,
}
