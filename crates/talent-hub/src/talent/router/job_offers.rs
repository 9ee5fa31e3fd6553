use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};

use super::validated_json::ValidatedJson;
use super::{blocking, TalentApi};
use crate::identity::Session;
use crate::store::Store;
use crate::talent::domain::{
    JobOffer, JobOfferDraft, JobOfferFilter, JobOfferId, JobOfferListing, JobOfferUpdate,
};
use crate::talent::job_offers::JobOfferRemoval;
use crate::talent::ServiceError;

pub(super) fn public_routes<S: Store>() -> Router<TalentApi<S>> {
    Router::new().route("/api/joboffers", get(search::<S>))
}

pub(super) fn routes<S: Store>() -> Router<TalentApi<S>> {
    Router::new()
        .route("/api/joboffers/company", get(list_for_company::<S>))
        .route("/api/joboffers/newJobOffer", post(create::<S>))
        .route(
            "/api/joboffers/:id",
            get(fetch::<S>).put(update::<S>).delete(remove::<S>),
        )
}

async fn search<S: Store>(
    State(api): State<TalentApi<S>>,
    Query(filter): Query<JobOfferFilter>,
) -> Result<Json<Vec<JobOfferListing>>, ServiceError> {
    let hits = blocking(move || api.job_offers.search(&filter)).await?;
    Ok(Json(hits))
}

async fn list_for_company<S: Store>(
    State(api): State<TalentApi<S>>,
    Extension(session): Extension<Session>,
) -> Result<Json<Vec<JobOffer>>, ServiceError> {
    let offers = blocking(move || api.job_offers.list_for_company(&session)).await?;
    Ok(Json(offers))
}

async fn create<S: Store>(
    State(api): State<TalentApi<S>>,
    Extension(session): Extension<Session>,
    ValidatedJson(draft): ValidatedJson<JobOfferDraft>,
) -> Result<(StatusCode, Json<JobOffer>), ServiceError> {
    let offer = blocking(move || api.job_offers.create(&session, &draft)).await?;
    Ok((StatusCode::CREATED, Json(offer)))
}

async fn fetch<S: Store>(
    State(api): State<TalentApi<S>>,
    Extension(session): Extension<Session>,
    Path(id): Path<JobOfferId>,
) -> Result<Json<JobOffer>, ServiceError> {
    let offer = blocking(move || api.job_offers.get(&session, id)).await?;
    Ok(Json(offer))
}

async fn update<S: Store>(
    State(api): State<TalentApi<S>>,
    Extension(session): Extension<Session>,
    Path(id): Path<JobOfferId>,
    ValidatedJson(changes): ValidatedJson<JobOfferUpdate>,
) -> Result<Json<JobOffer>, ServiceError> {
    let offer = blocking(move || api.job_offers.update(&session, id, &changes)).await?;
    Ok(Json(offer))
}

async fn remove<S: Store>(
    State(api): State<TalentApi<S>>,
    Extension(session): Extension<Session>,
    Path(id): Path<JobOfferId>,
) -> Result<Json<JobOfferRemoval>, ServiceError> {
    let removal = blocking(move || api.job_offers.delete(&session, id)).await?;
    Ok(Json(removal))
}
