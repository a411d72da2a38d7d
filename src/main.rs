mod context;
mod error;
mod handlers;
mod middlewares;
pub mod models;
mod places;
pub mod request;
pub mod response;
mod tokener;

use actix_web::web::{delete, get, post, put, resource, scope, Data};
use actix_web::HttpServer;
use middlewares::guard::SurveyGuard;
use middlewares::jwt::{Auth, JWT_SECRET};
use places::GooglePlaces;
use sqlx::postgres::PgPoolOptions;

#[actix_web::main]
async fn main() -> Result<(), std::io::Error> {
    dotenv::dotenv().ok();
    std::env::set_var("RUST_LOG", "actix_web=info");
    env_logger::init();
    let database_url = dotenv::var("DATABASE_URL").expect("environment variable DATABASE_URL not been set");
    let jwt_secret = dotenv::var(JWT_SECRET).expect("environment variable JWT_SECRET not been set");
    let places_key = dotenv::var("GOOGLE_PLACES_KEY").expect("environment variable GOOGLE_PLACES_KEY not been set");
    let bind_addr = dotenv::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".into());
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("failed to connect to database");
    HttpServer::new(move || {
        actix_web::App::new()
            .wrap(actix_web::middleware::Logger::default())
            .app_data(Data::new(pool.clone()))
            .app_data(Data::new(GooglePlaces::new(places_key.clone())))
            .service(
                scope("")
                    .service(resource("login").route(post().to(handlers::login)))
                    .service(resource("signup").route(post().to(handlers::signup)))
                    .service(resource("logout").route(get().to(handlers::logout)))
                    .service(
                        scope("")
                            .wrap(Auth::new(jwt_secret.as_bytes().to_owned()))
                            .service(resource("me").route(get().to(handlers::me)))
                            .service(scope("users").route("", get().to(handlers::user::list)))
                            .service(scope("places").route("", get().to(handlers::place::search::<GooglePlaces>)))
                            .service(
                                scope("takers")
                                    .route("", get().to(handlers::taker::list))
                                    .service(
                                        scope("{taker_id}")
                                            .route("", delete().to(handlers::taker::delete))
                                            .route("read", put().to(handlers::taker::mark_read))
                                            .route("star", put().to(handlers::taker::star)),
                                    ),
                            )
                            .service(
                                scope("surveys").route("", post().to(handlers::survey::create)).service(
                                    scope("{survey_id}")
                                        .wrap(SurveyGuard::new(pool.clone()))
                                        .route("", get().to(handlers::survey::detail))
                                        .route("", delete().to(handlers::survey::delete))
                                        .route("data", get().to(handlers::survey::data))
                                        .service(
                                            scope("comments")
                                                .route("", get().to(handlers::comment::list))
                                                .route("", post().to(handlers::comment::create)),
                                        )
                                        .service(
                                            scope("responses")
                                                .route("", get().to(handlers::response::list))
                                                .route("", put().to(handlers::response::submit)),
                                        ),
                                ),
                            ),
                    ),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
