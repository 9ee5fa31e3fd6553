use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Extension, Json, Router};

use super::validated_json::ValidatedJson;
use super::{blocking, TalentApi};
use crate::identity::Session;
use crate::store::Store;
use crate::talent::domain::{ProfileRegistration, ProfileUpdate, Recruit, RecruitId};
use crate::talent::ServiceError;

pub(super) fn public_routes<S: Store>() -> Router<TalentApi<S>> {
    Router::new().route("/api/recruits/addRecruit", post(register::<S>))
}

pub(super) fn routes<S: Store>() -> Router<TalentApi<S>> {
    Router::new()
        .route(
            "/api/recruits/:recruitId/profile",
            get(profile::<S>).put(update::<S>),
        )
        .route("/api/recruits/:recruitId", delete(remove::<S>))
}

async fn register<S: Store>(
    State(api): State<TalentApi<S>>,
    ValidatedJson(registration): ValidatedJson<ProfileRegistration>,
) -> Result<(StatusCode, Json<Recruit>), ServiceError> {
    let recruit = blocking(move || api.profiles.register_recruit(&registration)).await?;
    Ok((StatusCode::CREATED, Json(recruit)))
}

async fn profile<S: Store>(
    State(api): State<TalentApi<S>>,
    Path(recruit_id): Path<RecruitId>,
) -> Result<Json<Recruit>, ServiceError> {
    let recruit = blocking(move || api.profiles.recruit(recruit_id)).await?;
    Ok(Json(recruit))
}

async fn update<S: Store>(
    State(api): State<TalentApi<S>>,
    Extension(session): Extension<Session>,
    Path(recruit_id): Path<RecruitId>,
    ValidatedJson(changes): ValidatedJson<ProfileUpdate>,
) -> Result<Json<Recruit>, ServiceError> {
    let recruit =
        blocking(move || api.profiles.update_recruit(&session, recruit_id, &changes)).await?;
    Ok(Json(recruit))
}

async fn remove<S: Store>(
    State(api): State<TalentApi<S>>,
    Extension(session): Extension<Session>,
    Path(recruit_id): Path<RecruitId>,
) -> Result<StatusCode, ServiceError> {
    blocking(move || api.profiles.delete_recruit(&session, recruit_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
