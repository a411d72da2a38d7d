use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password: String,
    pub salt: String,
    pub allow_notifications: bool,
}

#[derive(Debug, Serialize, FromRow)]
pub struct Profile {
    pub id: i32,
    pub username: String,
    pub email: String,
}
