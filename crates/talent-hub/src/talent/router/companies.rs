use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Extension, Json, Router};

use super::validated_json::ValidatedJson;
use super::{blocking, TalentApi};
use crate::identity::Session;
use crate::store::Store;
use crate::talent::domain::{Company, CompanyDraft, CompanyId, CompanyUpdate, MemberInvite, Recruiter};
use crate::talent::ServiceError;

pub(super) fn routes<S: Store>() -> Router<TalentApi<S>> {
    Router::new()
        .route("/api/companies", get(list::<S>))
        .route("/api/companies/addCompany", post(create::<S>))
        .route("/api/companies/updateCompany/:id", put(update::<S>))
        .route("/api/companies/:id", get(fetch::<S>).delete(remove::<S>))
        .route("/api/companies/:id/recruiters", post(add_member::<S>))
}

async fn create<S: Store>(
    State(api): State<TalentApi<S>>,
    Extension(session): Extension<Session>,
    ValidatedJson(draft): ValidatedJson<CompanyDraft>,
) -> Result<(StatusCode, Json<Company>), ServiceError> {
    let company = blocking(move || api.companies.create(&session, &draft)).await?;
    Ok((StatusCode::CREATED, Json(company)))
}

async fn list<S: Store>(
    State(api): State<TalentApi<S>>,
    Extension(session): Extension<Session>,
) -> Result<Json<Vec<Company>>, ServiceError> {
    let companies = blocking(move || api.companies.list_all(&session)).await?;
    Ok(Json(companies))
}

async fn fetch<S: Store>(
    State(api): State<TalentApi<S>>,
    Extension(session): Extension<Session>,
    Path(id): Path<CompanyId>,
) -> Result<Json<Company>, ServiceError> {
    let company = blocking(move || api.companies.get(&session, id)).await?;
    Ok(Json(company))
}

async fn update<S: Store>(
    State(api): State<TalentApi<S>>,
    Extension(session): Extension<Session>,
    Path(id): Path<CompanyId>,
    ValidatedJson(changes): ValidatedJson<CompanyUpdate>,
) -> Result<Json<Company>, ServiceError> {
    let company = blocking(move || api.companies.update(&session, id, &changes)).await?;
    Ok(Json(company))
}

async fn remove<S: Store>(
    State(api): State<TalentApi<S>>,
    Extension(session): Extension<Session>,
    Path(id): Path<CompanyId>,
) -> Result<StatusCode, ServiceError> {
    blocking(move || api.companies.delete(&session, id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_member<S: Store>(
    State(api): State<TalentApi<S>>,
    Extension(session): Extension<Session>,
    Path(id): Path<CompanyId>,
    ValidatedJson(invite): ValidatedJson<MemberInvite>,
) -> Result<Json<Recruiter>, ServiceError> {
    let recruiter =
        blocking(move || api.companies.add_member(&session, id, invite.recruiter_id)).await?;
    Ok(Json(recruiter))
}
