//! End-to-end hiring flow through the public router over an in-memory store.
//!
//! Scenarios drive the HTTP surface only, reading the activity log through the
//! service facade to check what each step recorded.

mod common {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use chrono::Duration;
    use serde_json::Value;
    use tower::ServiceExt;

    use talent_hub::identity::{Passwords, TokenIssuer};
    use talent_hub::store::SqliteStore;
    use talent_hub::talent::{talent_router, MeetingLinkFactory, TalentApi};

    pub(super) fn build() -> (TalentApi<SqliteStore>, Router) {
        let store = Arc::new(SqliteStore::in_memory().expect("in-memory store"));
        let api = TalentApi::new(
            store,
            Passwords::new(8, 1).expect("argon2 params"),
            TokenIssuer::new("workflow-secret", Duration::minutes(30)),
            MeetingLinkFactory::new("https://meet.example"),
            false,
        );
        let router = talent_router(api.clone());
        (api, router)
    }

    pub(super) async fn call(
        router: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Option<String>, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("token={token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        };

        let response = router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let token = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|cookie| cookie.split(';').next())
            .and_then(|pair| pair.strip_prefix("token="))
            .filter(|token| !token.is_empty())
            .map(str::to_string);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json")
        };
        (status, token, json)
    }

    pub(super) async fn login(router: &Router, email: &str, password: &str) -> String {
        let (status, token, _) = call(
            router,
            Method::POST,
            "/api/users/login",
            None,
            Some(serde_json::json!({ "email": email, "password": password })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        token.expect("session cookie")
    }
}

mod hiring {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use super::common::*;

    #[tokio::test]
    async fn offer_deletion_rejects_the_pending_application() {
        let (api, router) = build();

        let (status, _, recruiter) = call(
            &router,
            Method::POST,
            "/api/recruiter/addRecruiter",
            None,
            Some(json!({
                "email": "rita@acme.example",
                "password": "s3cret",
                "firstname": "Rita",
                "lastname": "Hale"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(recruiter["companyId"].is_null());
        let recruiter_token = login(&router, "rita@acme.example", "s3cret").await;

        let (status, _, company) = call(
            &router,
            Method::POST,
            "/api/companies/addCompany",
            Some(&recruiter_token),
            Some(json!({
                "name": "Acme",
                "phoneNumber": "+1 555 0100",
                "emailAddress": "hr@acme.example",
                "address": "1 Main Street",
                "website": "https://acme.example"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(company["name"], "Acme");

        let (status, _, offer) = call(
            &router,
            Method::POST,
            "/api/joboffers/newJobOffer",
            Some(&recruiter_token),
            Some(json!({
                "title": "Platform Engineer",
                "description": "Own the deployment pipeline",
                "location": "Porto",
                "salary": 72000.0,
                "expId": 2
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(offer["experience"], "3-4 years");
        assert_eq!(offer["companyId"], company["id"]);
        let offer_id = offer["id"].as_i64().expect("offer id");

        let (status, _, _) = call(
            &router,
            Method::POST,
            "/api/recruits/addRecruit",
            None,
            Some(json!({
                "email": "xavier@mail.example",
                "password": "pa55",
                "firstname": "Xavier",
                "lastname": "Moss"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let recruit_token = login(&router, "xavier@mail.example", "pa55").await;

        let (status, _, hits) = call(
            &router,
            Method::GET,
            "/api/joboffers?company=acm",
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(hits[0]["id"], offer_id);

        let (status, _, application) = call(
            &router,
            Method::POST,
            "/api/applications",
            Some(&recruit_token),
            Some(json!({ "jobOfferId": offer_id })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(application["status"], "pending");
        let application_id = application["id"].as_i64().expect("application id");

        let entries_before = api.activity.recent(1_000).expect("activity").len();

        let (status, _, removal) = call(
            &router,
            Method::DELETE,
            &format!("/api/joboffers/{offer_id}"),
            Some(&recruiter_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(removal["rejectedApplications"], json!([application_id]));

        let activity = api.activity.recent(1_000).expect("activity");
        assert_eq!(activity.len(), entries_before + 2);
        let newest: Vec<_> = activity.iter().take(2).map(|entry| entry.action.as_str()).collect();
        assert_eq!(newest, vec!["JOB_OFFER_DELETED", "APPLICATION_REJECTED"]);

        let (status, _, application) = call(
            &router,
            Method::GET,
            &format!("/api/applications/{application_id}"),
            Some(&recruit_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(application["status"], "rejected");

        let (status, _, body) = call(
            &router,
            Method::GET,
            &format!("/api/joboffers/{offer_id}"),
            Some(&recruiter_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn scheduling_an_interview_moves_the_application_along() {
        let (api, router) = build();

        call(
            &router,
            Method::POST,
            "/api/recruiter/addRecruiter",
            None,
            Some(json!({
                "email": "rita@acme.example",
                "password": "s3cret",
                "firstname": "Rita",
                "lastname": "Hale"
            })),
        )
        .await;
        let recruiter_token = login(&router, "rita@acme.example", "s3cret").await;
        call(
            &router,
            Method::POST,
            "/api/companies/addCompany",
            Some(&recruiter_token),
            Some(json!({
                "name": "Acme",
                "phoneNumber": "+1 555 0100",
                "emailAddress": "hr@acme.example",
                "address": "1 Main Street",
                "website": "https://acme.example"
            })),
        )
        .await;
        let (_, _, offer) = call(
            &router,
            Method::POST,
            "/api/joboffers/newJobOffer",
            Some(&recruiter_token),
            Some(json!({
                "title": "Analyst",
                "description": "Dashboards",
                "location": "Remote",
                "salary": 50000.0,
                "expId": 0
            })),
        )
        .await;

        let (_, _, recruit) = call(
            &router,
            Method::POST,
            "/api/recruits/addRecruit",
            None,
            Some(json!({
                "email": "xavier@mail.example",
                "password": "pa55",
                "firstname": "Xavier",
                "lastname": "Moss"
            })),
        )
        .await;
        let recruit_token = login(&router, "xavier@mail.example", "pa55").await;
        let (_, _, application) = call(
            &router,
            Method::POST,
            "/api/applications",
            Some(&recruit_token),
            Some(json!({ "jobOfferId": offer["id"] })),
        )
        .await;

        let (status, _, interview) = call(
            &router,
            Method::POST,
            "/api/interviews",
            Some(&recruiter_token),
            Some(json!({
                "applicationId": application["id"],
                "date": "2030-05-17T09:30:00Z",
                "online": true
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(interview["startMeetingUrl"]
            .as_str()
            .is_some_and(|url| url.starts_with("https://meet.example/s/")));

        let (status, _, listed) = call(
            &router,
            Method::GET,
            &format!("/api/interviews/recruit/{}", recruit["id"]),
            Some(&recruit_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed[0]["joinMeetingUrl"], interview["joinMeetingUrl"]);
        assert!(listed[0].get("startMeetingUrl").is_none());

        let (_, _, application) = call(
            &router,
            Method::GET,
            &format!("/api/applications/{}", application["id"]),
            Some(&recruit_token),
            None,
        )
        .await;
        assert_eq!(application["status"], "interview");

        let scheduled = api
            .activity
            .recent(1)
            .expect("activity")
            .into_iter()
            .next()
            .expect("latest entry");
        assert_eq!(scheduled.action, "INTERVIEW_SCHEDULED");
    }
}
