use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateEmail, ValidationError};

pub type UserId = i64;
pub type RecruiterId = i64;
pub type RecruitId = i64;
pub type CompanyId = i64;
pub type JobOfferId = i64;
pub type ApplicationId = i64;
pub type InterviewId = i64;

/// Human readable experience ranges, selected by index when an offer is posted.
pub const EXPERIENCE_BUCKETS: [&str; 4] = ["< 1 year", "1-2 years", "3-4 years", "5+ years"];

pub fn experience_bucket(index: usize) -> Option<&'static str> {
    EXPERIENCE_BUCKETS.get(index).copied()
}

/// Error raised when a stored or submitted tag does not match a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Account role carried in the session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Sysadmin,
    Recruiter,
    Recruit,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Sysadmin => "SYSADMIN",
            Role::Recruiter => "RECRUITER",
            Role::Recruit => "RECRUIT",
        }
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "SYSADMIN" => Ok(Role::Sysadmin),
            "RECRUITER" => Ok(Role::Recruiter),
            "RECRUIT" => Ok(Role::Recruit),
            other => Err(UnknownVariant {
                kind: "role",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position of a recruiter inside their company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecruiterRole {
    Main,
    Member,
}

impl RecruiterRole {
    pub fn as_str(self) -> &'static str {
        match self {
            RecruiterRole::Main => "main",
            RecruiterRole::Member => "member",
        }
    }
}

impl FromStr for RecruiterRole {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "main" => Ok(RecruiterRole::Main),
            "member" => Ok(RecruiterRole::Member),
            other => Err(UnknownVariant {
                kind: "recruiter role",
                value: other.to_string(),
            }),
        }
    }
}

/// Lifecycle markers for an application. Any value may overwrite any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Interview,
    Rejected,
    Accepted,
}

impl ApplicationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Accepted => "accepted",
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(ApplicationStatus::Pending),
            "interview" => Ok(ApplicationStatus::Interview),
            "rejected" => Ok(ApplicationStatus::Rejected),
            "accepted" => Ok(ApplicationStatus::Accepted),
            other => Err(UnknownVariant {
                kind: "application status",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tags written to the activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityAction {
    UserRegistered,
    UserLoggedIn,
    UserLoggedOut,
    UserProfileUpdated,
    UserRoleChanged,
    UserDeleted,
    PasswordReset,
    RecruiterRegistered,
    RecruiterProfileUpdated,
    RecruiterDeleted,
    RecruiterJoinedCompany,
    RecruitRegistered,
    RecruitProfileUpdated,
    RecruitDeleted,
    CompanyCreated,
    CompanyUpdated,
    CompanyDeleted,
    JobOfferCreated,
    JobOfferUpdated,
    JobOfferDeleted,
    ApplicationCreated,
    ApplicationStatusChanged,
    ApplicationRejected,
    ApplicationDeleted,
    InterviewScheduled,
    InterviewUpdated,
    InterviewDeleted,
}

impl ActivityAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityAction::UserRegistered => "USER_REGISTERED",
            ActivityAction::UserLoggedIn => "USER_LOGGED_IN",
            ActivityAction::UserLoggedOut => "USER_LOGGED_OUT",
            ActivityAction::UserProfileUpdated => "USER_PROFILE_UPDATED",
            ActivityAction::UserRoleChanged => "USER_ROLE_CHANGED",
            ActivityAction::UserDeleted => "USER_DELETED",
            ActivityAction::PasswordReset => "PASSWORD_RESET",
            ActivityAction::RecruiterRegistered => "RECRUITER_REGISTERED",
            ActivityAction::RecruiterProfileUpdated => "RECRUITER_PROFILE_UPDATED",
            ActivityAction::RecruiterDeleted => "RECRUITER_DELETED",
            ActivityAction::RecruiterJoinedCompany => "RECRUITER_JOINED_COMPANY",
            ActivityAction::RecruitRegistered => "RECRUIT_REGISTERED",
            ActivityAction::RecruitProfileUpdated => "RECRUIT_PROFILE_UPDATED",
            ActivityAction::RecruitDeleted => "RECRUIT_DELETED",
            ActivityAction::CompanyCreated => "COMPANY_CREATED",
            ActivityAction::CompanyUpdated => "COMPANY_UPDATED",
            ActivityAction::CompanyDeleted => "COMPANY_DELETED",
            ActivityAction::JobOfferCreated => "JOB_OFFER_CREATED",
            ActivityAction::JobOfferUpdated => "JOB_OFFER_UPDATED",
            ActivityAction::JobOfferDeleted => "JOB_OFFER_DELETED",
            ActivityAction::ApplicationCreated => "APPLICATION_CREATED",
            ActivityAction::ApplicationStatusChanged => "APPLICATION_STATUS_CHANGED",
            ActivityAction::ApplicationRejected => "APPLICATION_REJECTED",
            ActivityAction::ApplicationDeleted => "APPLICATION_DELETED",
            ActivityAction::InterviewScheduled => "INTERVIEW_SCHEDULED",
            ActivityAction::InterviewUpdated => "INTERVIEW_UPDATED",
            ActivityAction::InterviewDeleted => "INTERVIEW_DELETED",
        }
    }
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recruiter {
    pub id: RecruiterId,
    pub user_id: UserId,
    pub company_id: Option<CompanyId>,
    pub role: RecruiterRole,
    pub firstname: String,
    pub lastname: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Recruiter {
    pub fn is_main(&self) -> bool {
        self.role == RecruiterRole::Main
    }

    pub fn belongs_to(&self, company_id: CompanyId) -> bool {
        self.company_id == Some(company_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recruit {
    pub id: RecruitId,
    pub user_id: UserId,
    pub firstname: String,
    pub lastname: String,
    pub email_address: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub industry: Option<String>,
    pub phone_number: String,
    pub email_address: String,
    pub address: String,
    pub website: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobOffer {
    pub id: JobOfferId,
    pub company_id: CompanyId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub salary: f64,
    pub experience: String,
    pub created_at: DateTime<Utc>,
}

/// Public search hit: the offer plus the advertising company's name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobOfferListing {
    #[serde(flatten)]
    pub offer: JobOffer,
    pub company_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: ApplicationId,
    pub recruit_id: RecruitId,
    pub job_offer_id: JobOfferId,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
}

/// A recruit's own application with whatever is left of the offer it targeted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruitApplication {
    #[serde(flatten)]
    pub application: Application,
    pub job_offer: Option<JobOffer>,
    pub company: Option<Company>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    pub id: InterviewId,
    pub application_id: ApplicationId,
    pub recruit_id: RecruitId,
    pub job_offer_id: JobOfferId,
    pub location: Option<String>,
    pub date: DateTime<Utc>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub online: bool,
    pub start_time: Option<String>,
    pub join_meeting_url: Option<String>,
    pub start_meeting_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Interview as shown to the candidate. The host link has no field here.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruitInterviewView {
    pub id: InterviewId,
    pub application_id: ApplicationId,
    pub recruit_id: RecruitId,
    pub job_offer_id: JobOfferId,
    pub location: Option<String>,
    pub date: DateTime<Utc>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub online: bool,
    pub start_time: Option<String>,
    pub join_meeting_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Interview> for RecruitInterviewView {
    fn from(interview: Interview) -> Self {
        Self {
            id: interview.id,
            application_id: interview.application_id,
            recruit_id: interview.recruit_id,
            job_offer_id: interview.job_offer_id,
            location: interview.location,
            date: interview.date,
            phone: interview.phone,
            email: interview.email,
            online: interview.online,
            start_time: interview.start_time,
            join_meeting_url: interview.join_meeting_url,
            created_at: interview.created_at,
            updated_at: interview.updated_at,
        }
    }
}

/// Interview read shaped for whoever asked.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InterviewView {
    Full(Interview),
    Candidate(RecruitInterviewView),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub id: i64,
    pub user_id: UserId,
    pub action: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// User with whichever profile is linked to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    pub recruiter: Option<Recruiter>,
    pub recruit: Option<Recruit>,
}

/// Emails are compared after trimming, so surrounding whitespace is tolerated.
fn trimmed_email(value: &str) -> Result<(), ValidationError> {
    if value.trim().validate_email() {
        Ok(())
    } else {
        Err(ValidationError::new("email").with_message("a valid email is required".into()))
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank").with_message("must not be empty".into()))
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    #[validate(custom(function = "trimmed_email"))]
    pub email: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    #[validate(custom(function = "trimmed_email"))]
    pub email: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PasswordReset {
    #[validate(custom(function = "trimmed_email"))]
    pub email: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub new_password: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[validate(custom(function = "trimmed_email"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RoleChange {
    pub new_role: Role,
}

/// Sign-up payload shared by recruiters and recruits.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRegistration {
    #[validate(custom(function = "trimmed_email"))]
    pub email: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
    #[validate(custom(function = "not_blank"))]
    pub firstname: String,
    #[validate(custom(function = "not_blank"))]
    pub lastname: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[validate(custom(function = "not_blank"))]
    pub firstname: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub lastname: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDraft {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[serde(default)]
    pub industry: Option<String>,
    pub phone_number: String,
    #[validate(custom(function = "trimmed_email"))]
    pub email_address: String,
    pub address: String,
    pub website: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompanyUpdate {
    #[validate(custom(function = "not_blank"))]
    pub name: Option<String>,
    pub industry: Option<String>,
    pub phone_number: Option<String>,
    #[validate(custom(function = "trimmed_email"))]
    pub email_address: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MemberInvite {
    pub recruiter_id: RecruiterId,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JobOfferDraft {
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[validate(custom(function = "not_blank"))]
    pub description: String,
    #[validate(custom(function = "not_blank"))]
    pub location: String,
    #[validate(range(min = 0.0, message = "salary must be a non-negative number"))]
    pub salary: f64,
    #[serde(alias = "expId")]
    pub experience_id: usize,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JobOfferUpdate {
    #[validate(custom(function = "not_blank"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub location: Option<String>,
    #[validate(range(min = 0.0, message = "salary must be a non-negative number"))]
    pub salary: Option<f64>,
    #[serde(alias = "expId")]
    pub experience_id: Option<usize>,
}

/// Public search parameters; at least one of title, location or company is required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobOfferFilter {
    pub title: Option<String>,
    pub location: Option<String>,
    pub company: Option<String>,
    pub page: Option<u32>,
}

impl JobOfferFilter {
    pub fn has_criteria(&self) -> bool {
        [&self.title, &self.location, &self.company]
            .into_iter()
            .any(|term| term.as_deref().is_some_and(|term| !term.trim().is_empty()))
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDraft {
    pub job_offer_id: JobOfferId,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub status: ApplicationStatus,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InterviewDraft {
    pub application_id: ApplicationId,
    #[serde(default)]
    pub location: Option<String>,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub start_time: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InterviewUpdate {
    pub location: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub online: Option<bool>,
    pub start_time: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn experience_buckets_resolve_by_index() {
        assert_eq!(experience_bucket(0), Some("< 1 year"));
        assert_eq!(experience_bucket(3), Some("5+ years"));
        assert_eq!(experience_bucket(4), None);
    }

    #[test]
    fn status_tags_round_trip_through_strings() {
        for status in [
            ApplicationStatus::Pending,
            ApplicationStatus::Interview,
            ApplicationStatus::Rejected,
            ApplicationStatus::Accepted,
        ] {
            assert_eq!(status.as_str().parse::<ApplicationStatus>(), Ok(status));
        }
        let err = "hired".parse::<ApplicationStatus>().unwrap_err();
        assert_eq!(err.value, "hired");
    }

    #[test]
    fn recruit_view_omits_start_link() {
        let now = Utc::now();
        let interview = Interview {
            id: 1,
            application_id: 2,
            recruit_id: 3,
            job_offer_id: 4,
            location: None,
            date: now,
            phone: None,
            email: None,
            online: true,
            start_time: Some("09:30".to_string()),
            join_meeting_url: Some("https://meet/j/abc".to_string()),
            start_meeting_url: Some("https://meet/s/abc?zak=def".to_string()),
            created_at: now,
            updated_at: now,
        };

        let full = serde_json::to_value(InterviewView::Full(interview.clone())).expect("json");
        assert!(full.get("startMeetingUrl").is_some());

        let view = serde_json::to_value(InterviewView::Candidate(interview.into())).expect("json");
        assert!(view.get("startMeetingUrl").is_none());
        assert_eq!(view["joinMeetingUrl"], "https://meet/j/abc");
    }

    #[test]
    fn user_serialization_hides_password_hash() {
        let user = User {
            id: 7,
            email: "ada@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: Role::Recruit,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).expect("json");
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["role"], "RECRUIT");
    }

    #[test]
    fn malformed_emails_fail_validation() {
        for email in ["@", "a@", "@@@", "x @ y", "not-an-email", ""] {
            let registration = Registration {
                email: email.to_string(),
                password: "pw".to_string(),
                role: Role::Recruit,
            };
            assert!(registration.validate().is_err(), "{email:?} should be rejected");
        }

        let padded = Registration {
            email: "  ada@example.com ".to_string(),
            password: "pw".to_string(),
            role: Role::Recruit,
        };
        assert!(padded.validate().is_ok());
    }

    #[test]
    fn optional_fields_are_checked_only_when_present() {
        assert!(UserUpdate::default().validate().is_ok());
        let blank_name = ProfileUpdate {
            lastname: Some("  ".to_string()),
            ..ProfileUpdate::default()
        };
        assert!(blank_name.validate().is_err());

        let negative = JobOfferUpdate {
            salary: Some(-1.0),
            ..JobOfferUpdate::default()
        };
        let errors = negative.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("salary"));
    }

    #[test]
    fn job_offer_draft_accepts_short_experience_alias() {
        let draft: JobOfferDraft = serde_json::from_value(serde_json::json!({
            "title": "Backend engineer",
            "description": "Rust services",
            "location": "Lisbon",
            "salary": 64000.0,
            "expId": 2
        }))
        .expect("draft parses");
        assert_eq!(draft.experience_id, 2);
    }
}
