use actix_web::web::{Data, Json, Path};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use sqlx::{query, query_as, query_scalar, PgPool, QueryBuilder};

use crate::context::UserInfo;
use crate::error::Error;
use crate::models::choice::Choice;
use crate::models::comment::CommentWithAuthor;
use crate::models::question::Question;
use crate::models::response::Response;
use crate::models::survey::SurveyWithOwner;
use crate::response::{CreateResponse, DeleteResponse};

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceDraft {
    pub label: String,
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    #[serde(default)]
    pub is_place: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionDraft {
    pub description: String,
    pub choices: Vec<ChoiceDraft>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SurveyDraft {
    pub name: String,
    pub takers: Vec<i32>,
    pub questions: Vec<QuestionDraft>,
}

// The authoring UI staged all of this in arrays before a single submit:
// repeated takers and repeated choice labels were ignored by a membership
// check, while a repeated question name meant the author lost work, so that
// one is an error here.
fn normalize(mut draft: SurveyDraft) -> Result<SurveyDraft, Error> {
    draft.name = draft.name.trim().to_owned();
    if draft.name.is_empty() {
        return Err(Error::BusinessError("survey name must not be blank".into()));
    }
    if draft.questions.is_empty() {
        return Err(Error::BusinessError("a survey needs at least one question".into()));
    }
    draft.takers = draft.takers.into_iter().unique().collect();
    for question in draft.questions.iter_mut() {
        question.description = question.description.trim().to_owned();
        if question.description.is_empty() {
            return Err(Error::BusinessError("question description must not be blank".into()));
        }
        for choice in question.choices.iter_mut() {
            choice.label = choice.label.trim().to_owned();
            if choice.label.is_empty() {
                return Err(Error::BusinessError("choice label must not be blank".into()));
            }
        }
        question.choices = std::mem::take(&mut question.choices).into_iter().unique_by(|c| c.label.clone()).collect();
        if question.choices.is_empty() {
            return Err(Error::BusinessError(format!("question \"{}\" has no choices", question.description)));
        }
    }
    if draft.questions.iter().duplicates_by(|q| q.description.clone()).next().is_some() {
        return Err(Error::BusinessError("duplicate question description".into()));
    }
    Ok(draft)
}

pub async fn create(user_info: UserInfo, Json(draft): Json<SurveyDraft>, db: Data<PgPool>) -> Result<Json<CreateResponse>, Error> {
    let draft = normalize(draft)?;
    let mut tx = db.begin().await?;
    if !draft.takers.is_empty() {
        let known: i64 = query_scalar("SELECT COUNT(*) FROM users WHERE id = ANY($1)")
            .bind(&draft.takers)
            .fetch_one(&mut tx)
            .await?;
        if known != draft.takers.len() as i64 {
            return Err(Error::BusinessError("unknown user in taker list".into()));
        }
    }
    let survey_id: i32 = query_scalar("INSERT INTO surveys (name, owner_id) VALUES ($1, $2) RETURNING id")
        .bind(&draft.name)
        .bind(user_info.id)
        .fetch_one(&mut tx)
        .await?;
    for question in &draft.questions {
        let question_id: i32 = query_scalar("INSERT INTO questions (survey_id, description) VALUES ($1, $2) RETURNING id")
            .bind(survey_id)
            .bind(&question.description)
            .fetch_one(&mut tx)
            .await?;
        QueryBuilder::new("INSERT INTO choices (question_id, label, address, lat, lng, is_place)")
            .push_values(question.choices.iter(), |mut b, c| {
                b.push_bind(question_id);
                b.push_bind(&c.label);
                b.push_bind(&c.address);
                b.push_bind(c.lat);
                b.push_bind(c.lng);
                b.push_bind(c.is_place);
            })
            .build()
            .execute(&mut tx)
            .await?;
    }
    if !draft.takers.is_empty() {
        QueryBuilder::new("INSERT INTO survey_takers (survey_id, user_id)")
            .push_values(draft.takers.iter(), |mut b, uid| {
                b.push_bind(survey_id);
                b.push_bind(uid);
            })
            .build()
            .execute(&mut tx)
            .await?;
    }
    tx.commit().await?;
    Ok(Json(CreateResponse { id: survey_id }))
}

pub async fn detail(survey_id: Path<(i32,)>, db: Data<PgPool>) -> Result<Json<SurveyWithOwner>, Error> {
    let survey_id = survey_id.into_inner().0;
    let mut conn = db.acquire().await?;
    let survey: SurveyWithOwner = query_as(
        "SELECT s.id, s.name, s.owner_id, u.username AS owner_username, s.created_at
        FROM surveys AS s
        JOIN users AS u ON s.owner_id = u.id
        WHERE s.id = $1",
    )
    .bind(survey_id)
    .fetch_one(&mut conn)
    .await?;
    Ok(Json(survey))
}

pub async fn delete(user_info: UserInfo, survey_id: Path<(i32,)>, db: Data<PgPool>) -> Result<Json<DeleteResponse>, Error> {
    let survey_id = survey_id.into_inner().0;
    let mut conn = db.acquire().await?;
    let deleted = query("DELETE FROM surveys WHERE id = $1 AND owner_id = $2")
        .bind(survey_id)
        .bind(user_info.id)
        .execute(&mut conn)
        .await?
        .rows_affected();
    Ok(Json(DeleteResponse::new(deleted)))
}

/// Everything the survey view renders on first load.
#[derive(Debug, Serialize)]
pub struct SurveyData {
    pub questions: Vec<Question>,
    pub choices: Vec<Choice>,
    pub responses: Vec<Response>,
    pub comments: Vec<CommentWithAuthor>,
}

pub async fn data(survey_id: Path<(i32,)>, db: Data<PgPool>) -> Result<Json<SurveyData>, Error> {
    let survey_id = survey_id.into_inner().0;
    let mut tx = db.begin().await?;
    let questions: Vec<Question> = query_as("SELECT * FROM questions WHERE survey_id = $1 ORDER BY id")
        .bind(survey_id)
        .fetch_all(&mut tx)
        .await?;
    let choices: Vec<Choice> = query_as(
        "SELECT c.*
        FROM questions AS q
        JOIN choices AS c ON q.id = c.question_id
        WHERE q.survey_id = $1
        ORDER BY c.id",
    )
    .bind(survey_id)
    .fetch_all(&mut tx)
    .await?;
    let responses: Vec<Response> = query_as(
        "SELECT r.*
        FROM questions AS q
        JOIN responses AS r ON q.id = r.question_id
        WHERE q.survey_id = $1",
    )
    .bind(survey_id)
    .fetch_all(&mut tx)
    .await?;
    let comments: Vec<CommentWithAuthor> = query_as(
        "SELECT c.id, c.survey_id, c.user_id, u.username, c.body, c.created_at
        FROM comments AS c
        JOIN users AS u ON c.user_id = u.id
        WHERE c.survey_id = $1
        ORDER BY c.created_at",
    )
    .bind(survey_id)
    .fetch_all(&mut tx)
    .await?;
    tx.commit().await?;
    Ok(Json(SurveyData {
        questions,
        choices,
        responses,
        comments,
    }))
}

#[cfg(test)]
mod test {
    use super::*;

    fn choice(label: &str) -> ChoiceDraft {
        ChoiceDraft {
            label: label.into(),
            address: None,
            lat: None,
            lng: None,
            is_place: false,
        }
    }

    fn draft() -> SurveyDraft {
        SurveyDraft {
            name: "lunch spots".into(),
            takers: vec![2, 3],
            questions: vec![QuestionDraft {
                description: "where to?".into(),
                choices: vec![choice("tacos"), choice("ramen")],
            }],
        }
    }

    #[test]
    fn test_normalize_trims_and_keeps_valid_draft() {
        let mut d = draft();
        d.name = "  lunch spots  ".into();
        d.questions[0].description = " where to? ".into();
        let d = normalize(d).unwrap();
        assert_eq!(d.name, "lunch spots");
        assert_eq!(d.questions[0].description, "where to?");
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut d = draft();
        d.name = "   ".into();
        assert!(normalize(d).is_err());
    }

    #[test]
    fn test_question_without_choices_rejected() {
        let mut d = draft();
        d.questions[0].choices.clear();
        assert!(normalize(d).is_err());
    }

    #[test]
    fn test_duplicate_question_rejected() {
        let mut d = draft();
        let dup = d.questions[0].clone();
        d.questions.push(dup);
        assert!(normalize(d).is_err());
    }

    #[test]
    fn test_duplicate_choices_and_takers_deduped() {
        let mut d = draft();
        d.takers = vec![2, 2, 3];
        d.questions[0].choices.push(choice("tacos"));
        let d = normalize(d).unwrap();
        assert_eq!(d.takers, vec![2, 3]);
        assert_eq!(d.questions[0].choices.len(), 2);
    }

    #[test]
    fn test_blank_choice_rejected() {
        let mut d = draft();
        d.questions[0].choices.push(choice("  "));
        assert!(normalize(d).is_err());
    }
}
