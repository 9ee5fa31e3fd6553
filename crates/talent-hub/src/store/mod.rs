//! Persistence gateway.
//!
//! Every domain operation runs inside one [`Store::read`] or [`Store::write`]
//! call. A write commits only when its closure returns `Ok`; any error rolls
//! back every statement issued through the unit.

mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use chrono::{DateTime, Utc};

use crate::talent::domain::{
    ActivityAction, ActivityLog, Application, ApplicationId, ApplicationStatus, Company,
    CompanyDraft, CompanyId, Interview, InterviewId, JobOffer, JobOfferFilter, JobOfferId,
    JobOfferListing, Recruit, RecruitId, Recruiter, RecruiterId, RecruiterRole, Role, User,
    UserId,
};

/// Offers returned per page by [`UnitOfWork::search_job_offers`].
pub const SEARCH_PAGE_SIZE: u32 = 20;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
}

/// Transactional access to the talent tables.
pub trait Store: Send + Sync + 'static {
    /// Runs `work` against a consistent snapshot. Nothing is committed.
    fn read<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&dyn UnitOfWork) -> Result<T, E>,
        E: From<StoreError>;

    /// Runs `work` in one exclusive transaction, committed only on `Ok`.
    fn write<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&dyn UnitOfWork) -> Result<T, E>,
        E: From<StoreError>;
}

#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct NewRecruiter<'a> {
    pub user_id: UserId,
    pub company_id: Option<CompanyId>,
    pub role: RecruiterRole,
    pub firstname: &'a str,
    pub lastname: &'a str,
    pub phone: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct NewRecruit<'a> {
    pub user_id: UserId,
    pub firstname: &'a str,
    pub lastname: &'a str,
    pub email_address: &'a str,
    pub phone: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct NewJobOffer<'a> {
    pub company_id: CompanyId,
    pub title: &'a str,
    pub description: &'a str,
    pub location: &'a str,
    pub salary: f64,
    pub experience: &'a str,
}

#[derive(Debug, Clone)]
pub struct NewInterview {
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
}

#[derive(Debug, Clone)]
pub struct NewActivity<'a> {
    pub user_id: UserId,
    pub action: ActivityAction,
    pub description: &'a str,
}

/// A pending application about to be rejected, with the user behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingApplication {
    pub application_id: ApplicationId,
    pub recruit_user_id: Option<UserId>,
}

/// Typed statements available inside a unit of work.
///
/// Lookups return `None` for missing rows; mutations scoped by company
/// return the number of affected rows so callers can tell "not yours" from
/// success.
pub trait UnitOfWork {
    fn insert_user(&self, user: &NewUser<'_>) -> Result<User, StoreError>;
    fn user(&self, id: UserId) -> Result<Option<User>, StoreError>;
    fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    fn users(&self) -> Result<Vec<User>, StoreError>;
    fn save_user(&self, user: &User) -> Result<(), StoreError>;
    fn delete_user(&self, id: UserId) -> Result<usize, StoreError>;

    fn insert_recruiter(&self, recruiter: &NewRecruiter<'_>) -> Result<Recruiter, StoreError>;
    fn recruiter(&self, id: RecruiterId) -> Result<Option<Recruiter>, StoreError>;
    fn recruiter_for_user(&self, user_id: UserId) -> Result<Option<Recruiter>, StoreError>;
    fn save_recruiter(&self, recruiter: &Recruiter) -> Result<(), StoreError>;
    fn delete_recruiter(&self, id: RecruiterId) -> Result<usize, StoreError>;

    fn insert_recruit(&self, recruit: &NewRecruit<'_>) -> Result<Recruit, StoreError>;
    fn recruit(&self, id: RecruitId) -> Result<Option<Recruit>, StoreError>;
    fn recruit_for_user(&self, user_id: UserId) -> Result<Option<Recruit>, StoreError>;
    fn save_recruit(&self, recruit: &Recruit) -> Result<(), StoreError>;
    fn delete_recruit(&self, id: RecruitId) -> Result<usize, StoreError>;

    fn insert_company(&self, company: &CompanyDraft) -> Result<Company, StoreError>;
    fn company(&self, id: CompanyId) -> Result<Option<Company>, StoreError>;
    fn companies(&self) -> Result<Vec<Company>, StoreError>;
    fn save_company(&self, company: &Company) -> Result<(), StoreError>;
    fn delete_company(&self, id: CompanyId) -> Result<usize, StoreError>;

    fn insert_job_offer(&self, offer: &NewJobOffer<'_>) -> Result<JobOffer, StoreError>;
    fn job_offer(&self, id: JobOfferId) -> Result<Option<JobOffer>, StoreError>;
    fn job_offer_in_company(
        &self,
        id: JobOfferId,
        company_id: CompanyId,
    ) -> Result<Option<JobOffer>, StoreError>;
    fn job_offers_in_company(&self, company_id: CompanyId) -> Result<Vec<JobOffer>, StoreError>;
    /// Case-insensitive substring match on every present filter field.
    fn search_job_offers(&self, filter: &JobOfferFilter)
        -> Result<Vec<JobOfferListing>, StoreError>;
    /// Updates the offer only when it still belongs to `offer.company_id`.
    fn save_job_offer(&self, offer: &JobOffer) -> Result<usize, StoreError>;
    fn delete_job_offer(&self, id: JobOfferId, company_id: CompanyId)
        -> Result<usize, StoreError>;

    fn insert_application(
        &self,
        recruit_id: RecruitId,
        job_offer_id: JobOfferId,
        status: ApplicationStatus,
    ) -> Result<Application, StoreError>;
    fn application(&self, id: ApplicationId) -> Result<Option<Application>, StoreError>;
    fn applications(&self) -> Result<Vec<Application>, StoreError>;
    fn applications_for_recruit(&self, recruit_id: RecruitId)
        -> Result<Vec<Application>, StoreError>;
    fn applications_for_offer(
        &self,
        job_offer_id: JobOfferId,
        company_id: CompanyId,
    ) -> Result<Vec<Application>, StoreError>;
    fn pending_applications(
        &self,
        job_offer_id: JobOfferId,
        company_id: CompanyId,
    ) -> Result<Vec<PendingApplication>, StoreError>;
    fn reject_pending_applications(
        &self,
        job_offer_id: JobOfferId,
        company_id: CompanyId,
    ) -> Result<usize, StoreError>;
    fn set_application_status(
        &self,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> Result<usize, StoreError>;
    fn delete_application(&self, id: ApplicationId) -> Result<usize, StoreError>;

    fn insert_interview(&self, interview: &NewInterview) -> Result<Interview, StoreError>;
    fn interview(&self, id: InterviewId) -> Result<Option<Interview>, StoreError>;
    fn interviews(&self) -> Result<Vec<Interview>, StoreError>;
    fn interviews_for_recruit(&self, recruit_id: RecruitId) -> Result<Vec<Interview>, StoreError>;
    fn interviews_for_offer(
        &self,
        job_offer_id: JobOfferId,
        company_id: CompanyId,
    ) -> Result<Vec<Interview>, StoreError>;
    /// Persists every mutable column and returns the row with a fresh `updated_at`.
    fn save_interview(&self, interview: &Interview) -> Result<Interview, StoreError>;
    fn delete_interview(&self, id: InterviewId) -> Result<usize, StoreError>;

    fn record_activity(&self, entry: &NewActivity<'_>) -> Result<(), StoreError>;
    /// Newest entries first.
    fn recent_activity(&self, limit: usize) -> Result<Vec<ActivityLog>, StoreError>;
}
