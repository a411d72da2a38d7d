use actix_web::web::{Data, Json, Query};
use serde::Serialize;
use sqlx::{query_as, query_scalar, FromRow, PgPool};

use crate::error::Error;
use crate::request::Pagination;
use crate::response::List;

#[derive(Debug, Serialize, FromRow)]
pub struct UserItem {
    pub id: i32,
    pub username: String,
}

// Backs the authoring UI's "assign users" picker.
pub async fn list(Query(pagination): Query<Pagination>, db: Data<PgPool>) -> Result<Json<List<UserItem>>, Error> {
    let offset = pagination.offset()?;
    let mut conn = db.acquire().await?;
    let total: i64 = query_scalar("SELECT COUNT(*) FROM users").fetch_one(&mut conn).await?;
    let users: Vec<UserItem> = query_as(
        "SELECT id, username
        FROM users
        ORDER BY username
        LIMIT $1
        OFFSET $2",
    )
    .bind(pagination.size)
    .bind(offset)
    .fetch_all(&mut conn)
    .await?;
    Ok(Json(List::new(users, total)))
}
