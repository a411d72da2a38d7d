use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Response {
    pub id: i32,
    pub question_id: i32,
    pub choice_id: i32,
    pub user_id: i32,
}
