use serde::Serialize;
use sqlx::FromRow;

/// An answer choice. Places-derived choices carry the address and
/// coordinates of the search result they came from.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Choice {
    pub id: i32,
    pub question_id: i32,
    pub label: String,
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub is_place: bool,
}
