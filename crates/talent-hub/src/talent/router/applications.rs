use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Extension, Json, Router};

use super::validated_json::ValidatedJson;
use super::{blocking, TalentApi};
use crate::identity::Session;
use crate::store::Store;
use crate::talent::domain::{
    Application, ApplicationDraft, ApplicationId, JobOfferId, RecruitApplication, StatusUpdate,
    UserId,
};
use crate::talent::ServiceError;

pub(super) fn routes<S: Store>() -> Router<TalentApi<S>> {
    Router::new()
        .route("/api/applications", get(list_all::<S>).post(create::<S>))
        .route("/api/applications/recruit/:userId", get(list_for_recruit::<S>))
        .route(
            "/api/applications/jobOffer/:jobOfferId",
            get(list_for_job_offer::<S>),
        )
        .route(
            "/api/applications/:id",
            get(fetch::<S>).put(update_status::<S>).delete(remove::<S>),
        )
}

async fn create<S: Store>(
    State(api): State<TalentApi<S>>,
    Extension(session): Extension<Session>,
    ValidatedJson(draft): ValidatedJson<ApplicationDraft>,
) -> Result<(StatusCode, Json<Application>), ServiceError> {
    let application = blocking(move || api.applications.create(&session, &draft)).await?;
    Ok((StatusCode::CREATED, Json(application)))
}

async fn list_all<S: Store>(
    State(api): State<TalentApi<S>>,
    Extension(session): Extension<Session>,
) -> Result<Json<Vec<Application>>, ServiceError> {
    let applications = blocking(move || api.applications.list_all(&session)).await?;
    Ok(Json(applications))
}

async fn list_for_recruit<S: Store>(
    State(api): State<TalentApi<S>>,
    Extension(session): Extension<Session>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<RecruitApplication>>, ServiceError> {
    let applications =
        blocking(move || api.applications.list_for_recruit(&session, user_id)).await?;
    Ok(Json(applications))
}

async fn list_for_job_offer<S: Store>(
    State(api): State<TalentApi<S>>,
    Extension(session): Extension<Session>,
    Path(job_offer_id): Path<JobOfferId>,
) -> Result<Json<Vec<Application>>, ServiceError> {
    let applications =
        blocking(move || api.applications.list_for_job_offer(&session, job_offer_id)).await?;
    Ok(Json(applications))
}

async fn fetch<S: Store>(
    State(api): State<TalentApi<S>>,
    Extension(session): Extension<Session>,
    Path(id): Path<ApplicationId>,
) -> Result<Json<Application>, ServiceError> {
    let application = blocking(move || api.applications.get(&session, id)).await?;
    Ok(Json(application))
}

async fn update_status<S: Store>(
    State(api): State<TalentApi<S>>,
    Extension(session): Extension<Session>,
    Path(id): Path<ApplicationId>,
    ValidatedJson(update): ValidatedJson<StatusUpdate>,
) -> Result<Json<Application>, ServiceError> {
    let application =
        blocking(move || api.applications.update_status(&session, id, update.status)).await?;
    Ok(Json(application))
}

async fn remove<S: Store>(
    State(api): State<TalentApi<S>>,
    Extension(session): Extension<Session>,
    Path(id): Path<ApplicationId>,
) -> Result<StatusCode, ServiceError> {
    blocking(move || api.applications.delete(&session, id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
