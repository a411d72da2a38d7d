use actix_web::web::{Data, Json, Query};
use serde::Deserialize;

use crate::error::Error;
use crate::places::{Place, PlaceFinder};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: String,
    pub radius: i32,
}

// Proxies the geographic text search the authoring UI uses to build
// Places-derived choices. The API key never reaches the client.
pub async fn search<F: PlaceFinder + 'static>(Query(SearchParams { query, radius }): Query<SearchParams>, finder: Data<F>) -> Result<Json<Vec<Place>>, Error> {
    let query = query.trim().to_owned();
    if query.is_empty() {
        return Err(Error::BusinessError("query must not be blank".into()));
    }
    if radius <= 0 {
        return Err(Error::BusinessError("radius must be a positive integer".into()));
    }
    let places = finder.search(&query, radius).await?;
    Ok(Json(places))
}
