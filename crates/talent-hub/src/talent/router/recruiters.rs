use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Extension, Json, Router};

use super::validated_json::ValidatedJson;
use super::{blocking, TalentApi};
use crate::identity::Session;
use crate::store::Store;
use crate::talent::domain::{ProfileRegistration, ProfileUpdate, Recruiter, RecruiterId};
use crate::talent::ServiceError;

pub(super) fn public_routes<S: Store>() -> Router<TalentApi<S>> {
    Router::new().route("/api/recruiter/addRecruiter", post(register::<S>))
}

pub(super) fn routes<S: Store>() -> Router<TalentApi<S>> {
    Router::new()
        .route(
            "/api/recruiter/:recruiterId/profile",
            get(profile::<S>).put(update::<S>),
        )
        .route("/api/recruiter/:recruiterId", delete(remove::<S>))
}

async fn register<S: Store>(
    State(api): State<TalentApi<S>>,
    ValidatedJson(registration): ValidatedJson<ProfileRegistration>,
) -> Result<(StatusCode, Json<Recruiter>), ServiceError> {
    let recruiter = blocking(move || api.profiles.register_recruiter(&registration)).await?;
    Ok((StatusCode::CREATED, Json(recruiter)))
}

async fn profile<S: Store>(
    State(api): State<TalentApi<S>>,
    Path(recruiter_id): Path<RecruiterId>,
) -> Result<Json<Recruiter>, ServiceError> {
    let recruiter = blocking(move || api.profiles.recruiter(recruiter_id)).await?;
    Ok(Json(recruiter))
}

async fn update<S: Store>(
    State(api): State<TalentApi<S>>,
    Extension(session): Extension<Session>,
    Path(recruiter_id): Path<RecruiterId>,
    ValidatedJson(changes): ValidatedJson<ProfileUpdate>,
) -> Result<Json<Recruiter>, ServiceError> {
    let recruiter =
        blocking(move || api.profiles.update_recruiter(&session, recruiter_id, &changes)).await?;
    Ok(Json(recruiter))
}

async fn remove<S: Store>(
    State(api): State<TalentApi<S>>,
    Extension(session): Extension<Session>,
    Path(recruiter_id): Path<RecruiterId>,
) -> Result<StatusCode, ServiceError> {
    blocking(move || api.profiles.delete_recruiter(&session, recruiter_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
