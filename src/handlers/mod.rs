pub mod comment;
pub mod place;
pub mod response;
pub mod survey;
pub mod taker;
pub mod user;

use actix_web::{
    cookie::{time::OffsetDateTime, Cookie, CookieBuilder},
    http::StatusCode,
    web::{Data, Json},
    HttpResponse, HttpResponseBuilder,
};
use hex::ToHex;
use rand::{thread_rng, Rng};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use sqlx::{query, query_as, PgPool};
use std::ops::Add;

use crate::context::UserInfo;
use crate::error::Error;
use crate::middlewares::jwt::{Claim, JWT_SECRET, JWT_TOKEN};
use crate::models::user::{Profile, User};
use crate::tokener::{Jwt, Tokener};

fn hash_password(pass: &str, slt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pass);
    hasher.update(slt);
    hasher.finalize().encode_hex()
}

fn random_salt() -> String {
    let chars: Vec<char> = ('0'..='9').chain('a'..='z').chain('A'..='Z').collect();
    let mut rng = thread_rng();
    (0..32).map(|_| chars[rng.gen_range(0..chars.len())]).collect()
}

#[derive(Deserialize)]
pub struct Login {
    pub username: String,
    pub password: String,
}

pub async fn login(Json(Login { username, password }): Json<Login>, db: Data<PgPool>) -> Result<HttpResponse, Error> {
    let mut conn = db.acquire().await?;
    if let Some(user) = query_as::<_, User>("SELECT * FROM users WHERE username = $1 OR email = $1")
        .bind(&username)
        .fetch_optional(&mut conn)
        .await?
    {
        if hash_password(&password, &user.salt) != user.password {
            return Ok(HttpResponse::build(StatusCode::FORBIDDEN).finish());
        }
        let claim = Claim {
            user: user.id.to_string(),
            exp: chrono::Utc::now().add(chrono::Duration::days(30)).timestamp(),
        };
        let secret = dotenv::var(JWT_SECRET)?;
        let tokener = Jwt::new(secret.as_bytes().to_owned());
        let token = tokener.gen_token(&claim)?;
        return Ok(HttpResponse::build(StatusCode::OK).cookie(Cookie::new(JWT_TOKEN, token)).finish());
    }
    Err(Error::BusinessError("invalid username or password".into()))
}

#[derive(Debug, Clone, Deserialize)]
pub struct Signup {
    username: String,
    email: String,
    password: String,
}

pub async fn signup(Json(Signup { username, email, password }): Json<Signup>, db: Data<PgPool>) -> Result<HttpResponse, Error> {
    let username = username.trim().to_owned();
    let email = email.trim().to_owned();
    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err(Error::BusinessError("username, email and password are required".into()));
    }
    let mut tx = db.begin().await?;
    let taken: bool = sqlx::query_scalar("SELECT EXISTS(SELECT id FROM users WHERE username = $1 OR email = $2)")
        .bind(&username)
        .bind(&email)
        .fetch_one(&mut tx)
        .await?;
    if taken {
        return Err(Error::BusinessError("username or email already taken".into()));
    }
    let slt = random_salt();
    query("INSERT INTO users (username, email, password, salt, allow_notifications) VALUES ($1, $2, $3, $4, TRUE)")
        .bind(&username)
        .bind(&email)
        .bind(hash_password(&password, &slt))
        .bind(&slt)
        .execute(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(HttpResponse::build(StatusCode::OK).finish())
}

pub async fn logout() -> HttpResponse {
    HttpResponseBuilder::new(StatusCode::OK)
        .cookie(CookieBuilder::new(JWT_TOKEN, "").expires(OffsetDateTime::now_utc()).finish())
        .finish()
}

pub async fn me(user_info: UserInfo, db: Data<PgPool>) -> Result<Json<Profile>, Error> {
    let mut conn = db.acquire().await?;
    let profile: Profile = query_as("SELECT id, username, email FROM users WHERE id = $1")
        .bind(user_info.id)
        .fetch_one(&mut conn)
        .await?;
    Ok(Json(profile))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_hash_password_is_deterministic() {
        assert_eq!(hash_password("hunter2", "salt"), hash_password("hunter2", "salt"));
    }

    #[test]
    fn test_salt_changes_hash() {
        assert_ne!(hash_password("hunter2", "a"), hash_password("hunter2", "b"));
    }

    #[test]
    fn test_random_salt_shape() {
        let slt = random_salt();
        assert_eq!(slt.len(), 32);
        assert!(slt.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
