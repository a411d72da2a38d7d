use actix_web::web::{Data, Json, Path, Query};
use serde::Deserialize;
use sqlx::{query, query_as, query_scalar, PgPool};

use crate::context::UserInfo;
use crate::error::Error;
use crate::models::taker::TakerWithSurvey;
use crate::request::Pagination;
use crate::response::{DeleteResponse, List, UpdateResponse};

// The "my surveys" inbox: every survey the user was assigned to, with the
// survey's name and owner attached.
pub async fn list(user_info: UserInfo, Query(pagination): Query<Pagination>, db: Data<PgPool>) -> Result<Json<List<TakerWithSurvey>>, Error> {
    let offset = pagination.offset()?;
    let mut tx = db.begin().await?;
    let total: i64 = query_scalar("SELECT COUNT(*) FROM survey_takers WHERE user_id = $1")
        .bind(user_info.id)
        .fetch_one(&mut tx)
        .await?;
    let takers: Vec<TakerWithSurvey> = query_as(
        "SELECT st.id, st.survey_id, st.is_read, st.is_starred, s.name AS survey_name, s.owner_id, u.username AS owner_username
        FROM survey_takers AS st
        JOIN surveys AS s ON st.survey_id = s.id
        JOIN users AS u ON s.owner_id = u.id
        WHERE st.user_id = $1
        ORDER BY st.id DESC
        LIMIT $2
        OFFSET $3",
    )
    .bind(user_info.id)
    .bind(pagination.size)
    .bind(offset)
    .fetch_all(&mut tx)
    .await?;
    tx.commit().await?;
    Ok(Json(List::new(takers, total)))
}

pub async fn delete(user_info: UserInfo, taker_id: Path<(i32,)>, db: Data<PgPool>) -> Result<Json<DeleteResponse>, Error> {
    let taker_id = taker_id.into_inner().0;
    let mut conn = db.acquire().await?;
    let deleted = query("DELETE FROM survey_takers WHERE id = $1 AND user_id = $2")
        .bind(taker_id)
        .bind(user_info.id)
        .execute(&mut conn)
        .await?
        .rows_affected();
    Ok(Json(DeleteResponse::new(deleted)))
}

pub async fn mark_read(user_info: UserInfo, taker_id: Path<(i32,)>, db: Data<PgPool>) -> Result<Json<UpdateResponse>, Error> {
    let taker_id = taker_id.into_inner().0;
    let mut conn = db.acquire().await?;
    let updated = query("UPDATE survey_takers SET is_read = TRUE WHERE id = $1 AND user_id = $2")
        .bind(taker_id)
        .bind(user_info.id)
        .execute(&mut conn)
        .await?
        .rows_affected();
    Ok(Json(UpdateResponse::new(updated)))
}

#[derive(Debug, Deserialize)]
pub struct StarRequest {
    pub starred: bool,
}

pub async fn star(user_info: UserInfo, taker_id: Path<(i32,)>, Json(req): Json<StarRequest>, db: Data<PgPool>) -> Result<Json<UpdateResponse>, Error> {
    let taker_id = taker_id.into_inner().0;
    let mut conn = db.acquire().await?;
    let updated = query("UPDATE survey_takers SET is_starred = $1 WHERE id = $2 AND user_id = $3")
        .bind(req.starred)
        .bind(taker_id)
        .bind(user_info.id)
        .execute(&mut conn)
        .await?
        .rows_affected();
    Ok(Json(UpdateResponse::new(updated)))
}
