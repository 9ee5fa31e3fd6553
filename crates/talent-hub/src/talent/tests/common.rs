use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::{Duration, TimeZone, Utc};
use serde_json::Value;
use tower::ServiceExt;

use crate::identity::{Passwords, Session, TokenIssuer};
use crate::store::{SqliteStore, Store, StoreError, UnitOfWork};
use crate::talent::domain::{
    ActivityLog, Company, CompanyDraft, InterviewDraft, JobOffer, JobOfferDraft,
    ProfileRegistration, Recruit, Recruiter, Role,
};
use crate::talent::{MeetingLinkFactory, ServiceError, TalentApi};

pub(super) const MEETING_BASE: &str = "https://meet.test";

pub(super) fn api_over<S: Store>(store: Arc<S>) -> TalentApi<S> {
    TalentApi::new(
        store,
        Passwords::new(8, 1).expect("cheap argon2 params"),
        TokenIssuer::new("test-secret", Duration::minutes(60)),
        MeetingLinkFactory::new(MEETING_BASE),
        false,
    )
}

pub(super) struct Fixture {
    pub(super) store: Arc<SqliteStore>,
    pub(super) api: TalentApi<SqliteStore>,
}

pub(super) fn fixture() -> Fixture {
    let store = Arc::new(SqliteStore::in_memory().expect("in-memory store"));
    let api = api_over(Arc::clone(&store));
    Fixture { store, api }
}

pub(super) fn registration(email: &str, firstname: &str) -> ProfileRegistration {
    ProfileRegistration {
        email: email.to_string(),
        password: "hunter2".to_string(),
        firstname: firstname.to_string(),
        lastname: "Tester".to_string(),
        phone: None,
    }
}

pub(super) fn company_draft(name: &str) -> CompanyDraft {
    let domain = name.trim().to_lowercase().replace(' ', "-");
    CompanyDraft {
        name: name.to_string(),
        industry: Some("Software".to_string()),
        phone_number: "+1 555 0100".to_string(),
        email_address: format!("hr@{domain}.test"),
        address: "1 Main Street".to_string(),
        website: format!("https://{domain}.test"),
    }
}

pub(super) fn offer_draft(title: &str) -> JobOfferDraft {
    JobOfferDraft {
        title: title.to_string(),
        description: "Design and ship backend services".to_string(),
        location: "Lisbon".to_string(),
        salary: 60_000.0,
        experience_id: 1,
    }
}

pub(super) fn interview_draft(application_id: i64, online: bool) -> InterviewDraft {
    InterviewDraft {
        application_id,
        location: (!online).then(|| "HQ, room 4".to_string()),
        date: Utc.with_ymd_and_hms(2030, 5, 17, 9, 30, 0).unwrap(),
        phone: None,
        email: Some("hr@acme.test".to_string()),
        online,
        start_time: Some("09:30".to_string()),
    }
}

pub(super) fn session_of(user_id: i64, role: Role) -> Session {
    Session { user_id, role }
}

impl Fixture {
    pub(super) fn recruiter(&self, email: &str) -> (Session, Recruiter) {
        let recruiter = self
            .api
            .profiles
            .register_recruiter(&registration(email, "Rita"))
            .expect("recruiter registers");
        (session_of(recruiter.user_id, Role::Recruiter), recruiter)
    }

    /// Registers a recruiter and has them found a company, making them its main recruiter.
    pub(super) fn main_recruiter(&self, email: &str, company: &str) -> (Session, Company) {
        let (session, _) = self.recruiter(email);
        let company = self
            .api
            .companies
            .create(&session, &company_draft(company))
            .expect("company created");
        (session, company)
    }

    pub(super) fn recruit(&self, email: &str) -> (Session, Recruit) {
        let recruit = self
            .api
            .profiles
            .register_recruit(&registration(email, "Xavier"))
            .expect("recruit registers");
        (session_of(recruit.user_id, Role::Recruit), recruit)
    }

    pub(super) fn admin(&self) -> Session {
        let user = self
            .api
            .identity
            .create_admin("root@talent.test", "admin-pass")
            .expect("admin created");
        session_of(user.id, Role::Sysadmin)
    }

    pub(super) fn offer(&self, session: &Session, title: &str) -> JobOffer {
        self.api
            .job_offers
            .create(session, &offer_draft(title))
            .expect("offer created")
    }

    pub(super) fn activity(&self) -> Vec<ActivityLog> {
        self.api.activity.recent(10_000).expect("activity readable")
    }

    pub(super) fn activity_count(&self, action: &str) -> usize {
        self.activity()
            .iter()
            .filter(|entry| entry.action == action)
            .count()
    }
}

/// Store that fails every unit of work, for exercising the 500 path.
pub(super) struct UnavailableStore;

impl Store for UnavailableStore {
    fn read<T, E, F>(&self, _work: F) -> Result<T, E>
    where
        F: FnOnce(&dyn UnitOfWork) -> Result<T, E>,
        E: From<StoreError>,
    {
        Err(StoreError::Sqlite(rusqlite::Error::InvalidQuery).into())
    }

    fn write<T, E, F>(&self, _work: F) -> Result<T, E>
    where
        F: FnOnce(&dyn UnitOfWork) -> Result<T, E>,
        E: From<StoreError>,
    {
        Err(StoreError::Sqlite(rusqlite::Error::InvalidQuery).into())
    }
}

pub(super) fn request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("token={token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).expect("serialize body")))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

pub(super) async fn send(router: &Router, request: Request<Body>) -> Response {
    router.clone().oneshot(request).await.expect("router responds")
}

pub(super) async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    }
}

/// Extracts the session token from a login response's `Set-Cookie` header.
pub(super) fn session_token(response: &Response) -> String {
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login sets a cookie")
        .to_str()
        .expect("ascii cookie");
    cookie
        .split(';')
        .next()
        .and_then(|pair| pair.strip_prefix("token="))
        .expect("token cookie")
        .to_string()
}

pub(super) fn assert_forbidden<T: std::fmt::Debug>(result: Result<T, ServiceError>) {
    match result {
        Err(ServiceError::Forbidden(_)) => {}
        other => panic!("expected Forbidden, got {other:?}"),
    }
}

pub(super) fn assert_not_found<T: std::fmt::Debug>(result: Result<T, ServiceError>) {
    match result {
        Err(ServiceError::NotFound(_)) => {}
        other => panic!("expected NotFound, got {other:?}"),
    }
}

pub(super) fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(response.status(), expected, "unexpected status for response");
}
