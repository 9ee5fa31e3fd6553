use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post};
use axum::{Extension, Json, Router};
use serde_json::{json, Value};

use super::validated_json::ValidatedJson;
use super::{blocking, TalentApi};
use crate::identity::{clear_session_cookie, session_cookie, Session};
use crate::store::Store;
use crate::talent::domain::{
    Credentials, PasswordReset, Registration, RoleChange, User, UserId, UserProfile, UserUpdate,
};
use crate::talent::ServiceError;

pub(super) fn public_routes<S: Store>() -> Router<TalentApi<S>> {
    Router::new()
        .route("/api/users/register", post(register::<S>))
        .route("/api/users/login", post(login::<S>))
}

pub(super) fn routes<S: Store>() -> Router<TalentApi<S>> {
    Router::new()
        .route("/api/users", get(list_users::<S>))
        .route("/api/users/logout", post(logout::<S>))
        .route("/api/users/reset-password", post(reset_password::<S>))
        .route(
            "/api/users/profile/:userId",
            get(profile::<S>).put(update_user::<S>),
        )
        .route("/api/users/:userId", delete(delete_user::<S>))
        .route("/api/users/:userId/role", patch(change_role::<S>))
}

async fn register<S: Store>(
    State(api): State<TalentApi<S>>,
    ValidatedJson(registration): ValidatedJson<Registration>,
) -> Result<(StatusCode, Json<User>), ServiceError> {
    let user = blocking(move || api.identity.register(&registration)).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn login<S: Store>(
    State(api): State<TalentApi<S>>,
    ValidatedJson(credentials): ValidatedJson<Credentials>,
) -> Result<Response, ServiceError> {
    let identity = Arc::clone(&api.identity);
    let outcome = blocking(move || identity.authenticate(&credentials)).await?;
    let cookie = session_cookie(
        &outcome.token,
        api.identity.tokens().ttl(),
        api.secure_cookies,
    );
    Ok(([(SET_COOKIE, cookie)], Json(outcome.user)).into_response())
}

async fn logout<S: Store>(
    State(api): State<TalentApi<S>>,
    Extension(session): Extension<Session>,
) -> Result<Response, ServiceError> {
    let identity = Arc::clone(&api.identity);
    blocking(move || identity.logout(&session)).await?;
    let cookie = clear_session_cookie(api.secure_cookies);
    Ok(([(SET_COOKIE, cookie)], Json(json!({ "message": "logged out" }))).into_response())
}

async fn reset_password<S: Store>(
    State(api): State<TalentApi<S>>,
    Extension(session): Extension<Session>,
    ValidatedJson(reset): ValidatedJson<PasswordReset>,
) -> Result<Json<Value>, ServiceError> {
    blocking(move || api.identity.reset_password(&session, &reset)).await?;
    Ok(Json(json!({ "message": "password updated" })))
}

async fn list_users<S: Store>(
    State(api): State<TalentApi<S>>,
    Extension(session): Extension<Session>,
) -> Result<Json<Vec<User>>, ServiceError> {
    let users = blocking(move || api.users.list_all(&session)).await?;
    Ok(Json(users))
}

async fn profile<S: Store>(
    State(api): State<TalentApi<S>>,
    Extension(session): Extension<Session>,
    Path(user_id): Path<UserId>,
) -> Result<Json<UserProfile>, ServiceError> {
    let profile = blocking(move || api.users.profile(&session, user_id)).await?;
    Ok(Json(profile))
}

async fn update_user<S: Store>(
    State(api): State<TalentApi<S>>,
    Extension(session): Extension<Session>,
    Path(user_id): Path<UserId>,
    ValidatedJson(changes): ValidatedJson<UserUpdate>,
) -> Result<Json<User>, ServiceError> {
    let user = blocking(move || api.users.update(&session, user_id, &changes)).await?;
    Ok(Json(user))
}

async fn delete_user<S: Store>(
    State(api): State<TalentApi<S>>,
    Extension(session): Extension<Session>,
    Path(user_id): Path<UserId>,
) -> Result<StatusCode, ServiceError> {
    blocking(move || api.users.delete(&session, user_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn change_role<S: Store>(
    State(api): State<TalentApi<S>>,
    Extension(session): Extension<Session>,
    Path(user_id): Path<UserId>,
    ValidatedJson(change): ValidatedJson<RoleChange>,
) -> Result<Json<User>, ServiceError> {
    let user = blocking(move || api.users.change_role(&session, user_id, &change)).await?;
    Ok(Json(user))
}
