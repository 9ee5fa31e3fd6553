//! HTTP surface for the talent services.
//!
//! Routes are split into a public set and a session-guarded set. The guarded
//! set runs [`require_session`] as a route layer, so unmatched paths still 404
//! instead of 401.
//!
//! Services are synchronous: they hash passwords and wait on SQLite locks.
//! Handlers hand every call to [`blocking`] so the async workers stay free.

mod applications;
mod companies;
mod interviews;
mod job_offers;
mod recruiters;
mod recruits;
mod users;
mod validated_json;

use std::sync::Arc;

use axum::middleware;
use axum::Router;

use super::activity::ActivityService;
use super::applications::ApplicationService;
use super::companies::CompanyService;
use super::interviews::InterviewService;
use super::job_offers::JobOfferService;
use super::meeting::MeetingLinkFactory;
use super::profiles::ProfileService;
use super::users::UserService;
use super::ServiceError;
use crate::config::AppConfig;
use crate::identity::{require_session, IdentityService, Passwords, TokenIssuer};
use crate::store::Store;

/// Shared handler state: one instance of every service over the same store.
pub struct TalentApi<S> {
    pub identity: Arc<IdentityService<S>>,
    pub users: Arc<UserService<S>>,
    pub profiles: Arc<ProfileService<S>>,
    pub companies: Arc<CompanyService<S>>,
    pub job_offers: Arc<JobOfferService<S>>,
    pub applications: Arc<ApplicationService<S>>,
    pub interviews: Arc<InterviewService<S>>,
    pub activity: Arc<ActivityService<S>>,
    pub secure_cookies: bool,
}

impl<S: Store> TalentApi<S> {
    pub fn new(
        store: Arc<S>,
        passwords: Passwords,
        tokens: TokenIssuer,
        meetings: MeetingLinkFactory,
        secure_cookies: bool,
    ) -> Self {
        let passwords = Arc::new(passwords);
        let tokens = Arc::new(tokens);
        Self {
            identity: Arc::new(IdentityService::new(
                Arc::clone(&store),
                Arc::clone(&passwords),
                tokens,
            )),
            users: Arc::new(UserService::new(Arc::clone(&store), Arc::clone(&passwords))),
            profiles: Arc::new(ProfileService::new(Arc::clone(&store), passwords)),
            companies: Arc::new(CompanyService::new(Arc::clone(&store))),
            job_offers: Arc::new(JobOfferService::new(Arc::clone(&store))),
            applications: Arc::new(ApplicationService::new(Arc::clone(&store))),
            interviews: Arc::new(InterviewService::new(Arc::clone(&store), meetings)),
            activity: Arc::new(ActivityService::new(store)),
            secure_cookies,
        }
    }

    pub fn from_config(store: Arc<S>, config: &AppConfig) -> Result<Self, ServiceError> {
        Ok(Self::new(
            store,
            Passwords::from_config(&config.auth)?,
            TokenIssuer::from_config(&config.auth),
            MeetingLinkFactory::new(config.meetings.base_url.clone()),
            config.auth.secure_cookies,
        ))
    }
}

impl<S> Clone for TalentApi<S> {
    fn clone(&self) -> Self {
        Self {
            identity: Arc::clone(&self.identity),
            users: Arc::clone(&self.users),
            profiles: Arc::clone(&self.profiles),
            companies: Arc::clone(&self.companies),
            job_offers: Arc::clone(&self.job_offers),
            applications: Arc::clone(&self.applications),
            interviews: Arc::clone(&self.interviews),
            activity: Arc::clone(&self.activity),
            secure_cookies: self.secure_cookies,
        }
    }
}

/// Runs a service call on the blocking pool.
async fn blocking<T, F>(work: F) -> Result<T, ServiceError>
where
    F: FnOnce() -> Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await?
}

/// Builds every `/api` route over the given services.
pub fn talent_router<S: Store>(api: TalentApi<S>) -> Router {
    let tokens = Arc::clone(api.identity.tokens());

    let public = Router::new()
        .merge(users::public_routes::<S>())
        .merge(recruiters::public_routes::<S>())
        .merge(recruits::public_routes::<S>())
        .merge(job_offers::public_routes::<S>());

    let protected = Router::new()
        .merge(users::routes::<S>())
        .merge(recruiters::routes::<S>())
        .merge(recruits::routes::<S>())
        .merge(companies::routes::<S>())
        .merge(job_offers::routes::<S>())
        .merge(applications::routes::<S>())
        .merge(interviews::routes::<S>())
        .route_layer(middleware::from_fn_with_state(tokens, require_session));

    public.merge(protected).with_state(api)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[tokio::test]
    async fn blocking_work_returns_its_result() {
        let value = blocking(|| Ok::<_, ServiceError>(21 * 2)).await.expect("value");
        assert_eq!(value, 42);

        let refused = blocking(|| Err::<(), _>(ServiceError::NotFound("user"))).await;
        assert!(matches!(refused, Err(ServiceError::NotFound("user"))));
    }

    #[tokio::test]
    async fn a_panicking_call_becomes_a_server_error() {
        let failed = blocking(|| -> Result<(), ServiceError> { panic!("hash exploded") }).await;
        match failed {
            Err(error @ ServiceError::Worker(_)) => {
                assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
            }
            other => panic!("expected worker failure, got {other:?}"),
        }
    }
}
