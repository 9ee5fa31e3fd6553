//! Recruiting domain: companies, job offers, applications and interviews.

pub mod activity;
pub mod applications;
pub mod companies;
pub mod domain;
pub mod error;
pub mod interviews;
pub mod job_offers;
pub mod meeting;
mod policy;
pub mod profiles;
pub mod router;
pub mod users;

#[cfg(test)]
mod tests;

pub use activity::ActivityService;
pub use applications::ApplicationService;
pub use companies::CompanyService;
pub use error::ServiceError;
pub use interviews::InterviewService;
pub use job_offers::{JobOfferRemoval, JobOfferService};
pub use meeting::{MeetingLinkFactory, MeetingLinks};
pub use profiles::ProfileService;
pub use router::{talent_router, TalentApi};
pub use users::UserService;
