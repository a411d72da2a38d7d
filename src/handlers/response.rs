use actix_web::{
    http::StatusCode,
    web::{Data, Json, Path},
    HttpResponse,
};
use itertools::Itertools;
use serde::Deserialize;
use sqlx::{query, query_as, query_scalar, PgPool, QueryBuilder};

use crate::context::UserInfo;
use crate::error::Error;
use crate::models::response::Response;
use crate::response::List;

pub async fn list(survey_id: Path<(i32,)>, db: Data<PgPool>) -> Result<Json<List<Response>>, Error> {
    let survey_id = survey_id.into_inner().0;
    let mut conn = db.acquire().await?;
    let responses: Vec<Response> = query_as(
        "SELECT r.*
        FROM questions AS q
        JOIN responses AS r ON q.id = r.question_id
        WHERE q.survey_id = $1
        ORDER BY r.id",
    )
    .bind(survey_id)
    .fetch_all(&mut conn)
    .await?;
    let total = responses.len() as i64;
    Ok(Json(List::new(responses, total)))
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAnswer {
    pub question_id: i32,
    pub choice_id: i32,
}

// One choice per question; the per-choice survey membership check runs
// against the database inside the transaction.
fn validate_answers(answers: &[SubmitAnswer]) -> Result<(), Error> {
    if answers.is_empty() {
        return Err(Error::BusinessError("no answers submitted".into()));
    }
    if answers.iter().duplicates_by(|a| a.question_id).next().is_some() {
        return Err(Error::BusinessError("more than one answer for the same question".into()));
    }
    Ok(())
}

// Resubmission replaces the user's previous answers for the survey.
pub async fn submit(user_info: UserInfo, survey_id: Path<(i32,)>, Json(answers): Json<Vec<SubmitAnswer>>, db: Data<PgPool>) -> Result<HttpResponse, Error> {
    let survey_id = survey_id.into_inner().0;
    validate_answers(&answers)?;
    let mut tx = db.begin().await?;
    for answer in &answers {
        let is_valid: bool = query_scalar(
            "SELECT EXISTS(
                SELECT c.id
                FROM questions AS q
                JOIN choices AS c ON q.id = c.question_id
                WHERE q.survey_id = $1 AND q.id = $2 AND c.id = $3)",
        )
        .bind(survey_id)
        .bind(answer.question_id)
        .bind(answer.choice_id)
        .fetch_one(&mut tx)
        .await?;
        if !is_valid {
            return Err(Error::BusinessError("choice does not belong to this survey".into()));
        }
    }
    query(
        "DELETE FROM responses WHERE user_id = $1 AND question_id IN (
            SELECT id FROM questions WHERE survey_id = $2)",
    )
    .bind(user_info.id)
    .bind(survey_id)
    .execute(&mut tx)
    .await?;
    QueryBuilder::new("INSERT INTO responses (question_id, choice_id, user_id)")
        .push_values(answers.iter(), |mut b, a| {
            b.push_bind(a.question_id);
            b.push_bind(a.choice_id);
            b.push_bind(user_info.id);
        })
        .build()
        .execute(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(HttpResponse::build(StatusCode::OK).finish())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_empty_submission_rejected() {
        assert!(validate_answers(&[]).is_err());
    }

    #[test]
    fn test_two_answers_for_one_question_rejected() {
        let answers = vec![
            SubmitAnswer { question_id: 1, choice_id: 10 },
            SubmitAnswer { question_id: 1, choice_id: 11 },
        ];
        assert!(validate_answers(&answers).is_err());
    }

    #[test]
    fn test_one_answer_per_question_accepted() {
        let answers = vec![
            SubmitAnswer { question_id: 1, choice_id: 10 },
            SubmitAnswer { question_id: 2, choice_id: 20 },
        ];
        assert!(validate_answers(&answers).is_ok());
    }
}
