use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Extension, Json, Router};

use super::validated_json::ValidatedJson;
use super::{blocking, TalentApi};
use crate::identity::Session;
use crate::store::Store;
use crate::talent::domain::{
    Interview, InterviewDraft, InterviewId, InterviewUpdate, InterviewView, JobOfferId,
    RecruitId, RecruitInterviewView,
};
use crate::talent::ServiceError;

pub(super) fn routes<S: Store>() -> Router<TalentApi<S>> {
    Router::new()
        .route("/api/interviews", get(list_all::<S>).post(create::<S>))
        .route(
            "/api/interviews/recruit/:recruitId",
            get(list_for_recruit::<S>),
        )
        .route(
            "/api/interviews/job-offer/:jobOfferId",
            get(list_for_job_offer::<S>),
        )
        .route(
            "/api/interviews/:id",
            get(fetch::<S>).put(update::<S>).delete(remove::<S>),
        )
}

async fn create<S: Store>(
    State(api): State<TalentApi<S>>,
    Extension(session): Extension<Session>,
    ValidatedJson(draft): ValidatedJson<InterviewDraft>,
) -> Result<(StatusCode, Json<Interview>), ServiceError> {
    let interview = blocking(move || api.interviews.create(&session, &draft)).await?;
    Ok((StatusCode::CREATED, Json(interview)))
}

async fn list_all<S: Store>(
    State(api): State<TalentApi<S>>,
    Extension(session): Extension<Session>,
) -> Result<Json<Vec<Interview>>, ServiceError> {
    let interviews = blocking(move || api.interviews.list_all(&session)).await?;
    Ok(Json(interviews))
}

async fn list_for_recruit<S: Store>(
    State(api): State<TalentApi<S>>,
    Extension(session): Extension<Session>,
    Path(recruit_id): Path<RecruitId>,
) -> Result<Json<Vec<RecruitInterviewView>>, ServiceError> {
    let interviews =
        blocking(move || api.interviews.list_for_recruit(&session, recruit_id)).await?;
    Ok(Json(interviews))
}

async fn list_for_job_offer<S: Store>(
    State(api): State<TalentApi<S>>,
    Extension(session): Extension<Session>,
    Path(job_offer_id): Path<JobOfferId>,
) -> Result<Json<Vec<Interview>>, ServiceError> {
    let interviews =
        blocking(move || api.interviews.list_for_job_offer(&session, job_offer_id)).await?;
    Ok(Json(interviews))
}

async fn fetch<S: Store>(
    State(api): State<TalentApi<S>>,
    Extension(session): Extension<Session>,
    Path(id): Path<InterviewId>,
) -> Result<Json<InterviewView>, ServiceError> {
    let interview = blocking(move || api.interviews.get(&session, id)).await?;
    Ok(Json(interview))
}

async fn update<S: Store>(
    State(api): State<TalentApi<S>>,
    Extension(session): Extension<Session>,
    Path(id): Path<InterviewId>,
    ValidatedJson(changes): ValidatedJson<InterviewUpdate>,
) -> Result<Json<Interview>, ServiceError> {
    let interview = blocking(move || api.interviews.update(&session, id, &changes)).await?;
    Ok(Json(interview))
}

async fn remove<S: Store>(
    State(api): State<TalentApi<S>>,
    Extension(session): Extension<Session>,
    Path(id): Path<InterviewId>,
) -> Result<StatusCode, ServiceError> {
    blocking(move || api.interviews.delete(&session, id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
