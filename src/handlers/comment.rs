use actix_web::web::{Data, Json, Path};
use serde::Deserialize;
use sqlx::{query_as, query_scalar, PgPool};

use crate::context::UserInfo;
use crate::error::Error;
use crate::models::comment::CommentWithAuthor;
use crate::response::{CreateResponse, List};

pub async fn list(survey_id: Path<(i32,)>, db: Data<PgPool>) -> Result<Json<List<CommentWithAuthor>>, Error> {
    let survey_id = survey_id.into_inner().0;
    let mut conn = db.acquire().await?;
    let comments: Vec<CommentWithAuthor> = query_as(
        "SELECT c.id, c.survey_id, c.user_id, u.username, c.body, c.created_at
        FROM comments AS c
        JOIN users AS u ON c.user_id = u.id
        WHERE c.survey_id = $1
        ORDER BY c.created_at",
    )
    .bind(survey_id)
    .fetch_all(&mut conn)
    .await?;
    let total = comments.len() as i64;
    Ok(Json(List::new(comments, total)))
}

#[derive(Debug, Deserialize)]
pub struct CommentCreation {
    pub body: String,
}

pub async fn create(user_info: UserInfo, survey_id: Path<(i32,)>, Json(req): Json<CommentCreation>, db: Data<PgPool>) -> Result<Json<CreateResponse>, Error> {
    let survey_id = survey_id.into_inner().0;
    let body = req.body.trim().to_owned();
    if body.is_empty() {
        return Err(Error::BusinessError("comment must not be blank".into()));
    }
    let mut conn = db.acquire().await?;
    let id: i32 = query_scalar("INSERT INTO comments (survey_id, user_id, body) VALUES ($1, $2, $3) RETURNING id")
        .bind(survey_id)
        .bind(user_info.id)
        .bind(&body)
        .fetch_one(&mut conn)
        .await?;
    Ok(Json(CreateResponse { id }))
}
