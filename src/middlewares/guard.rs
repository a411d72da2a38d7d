use crate::context::UserInfo;
use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    HttpMessage,
};
use sqlx::{query_scalar, PgPool};
use std::future::Future;
use std::future::{ready, Ready};
use std::pin::Pin;
use std::task::Poll;

static MEMBER_STMT: &str = "SELECT EXISTS(
    SELECT s.id
    FROM surveys AS s
    LEFT JOIN survey_takers AS st ON s.id = st.survey_id
    WHERE (s.owner_id = $1 OR st.user_id = $1) AND s.id = $2)";

/// Rejects requests whose `survey_id` path segment names a survey the
/// authenticated user neither owns nor was assigned to. Ownership-only
/// operations additionally constrain `owner_id` in their SQL.
pub struct SurveyGuard {
    db: PgPool,
}

impl SurveyGuard {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

impl<S> Transform<S, ServiceRequest> for SurveyGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse, Error = actix_web::Error>,
    S::Future: 'static,
{
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type Response = S::Response;
    type Error = S::Error;
    type InitError = ();
    type Transform = SurveyGuardMiddleware<S>;
    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SurveyGuardMiddleware { db: self.db.clone(), service }))
    }
}

pub struct SurveyGuardMiddleware<S> {
    db: PgPool,
    service: S,
}

impl<S> Service<ServiceRequest> for SurveyGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse, Error = actix_web::Error>,
    S::Future: 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<ServiceResponse, Self::Error>>>>;
    fn poll_ready(&self, _: &mut core::task::Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let user_info = req.extensions_mut().remove::<UserInfo>();
        let path = req.match_info().clone();
        if let Some(user_info) = user_info {
            req.extensions_mut().insert(user_info.clone());
            let uid = user_info.id;
            let next = self.service.call(req);
            if let Some(sid) = path.get("survey_id") {
                if let Ok(sid) = sid.parse::<i32>() {
                    let db = self.db.clone();
                    return Box::pin(async move {
                        match db.acquire().await {
                            Ok(mut conn) => match query_scalar::<_, bool>(MEMBER_STMT).bind(uid).bind(sid).fetch_one(&mut conn).await {
                                Ok(is_member) => {
                                    if !is_member {
                                        return Err(actix_web::error::ErrorForbidden("forbidden"));
                                    }
                                    next.await
                                }
                                Err(err) => Err(actix_web::error::ErrorInternalServerError(err)),
                            },
                            Err(err) => Err(actix_web::error::ErrorInternalServerError(err)),
                        }
                    });
                }
                return Box::pin(async move { Err(actix_web::error::ErrorBadRequest("invalid survey id")) });
            }
            return Box::pin(async move { Err(actix_web::error::ErrorInternalServerError("survey guard mounted outside a survey scope")) });
        }
        Box::pin(async move { Err(actix_web::error::ErrorUnauthorized("unauthorized")) })
    }
}
