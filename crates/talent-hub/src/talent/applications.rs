use std::sync::Arc;

use super::activity;
use super::domain::{
    ActivityAction, Application, ApplicationDraft, ApplicationId, ApplicationStatus, JobOfferId,
    RecruitApplication, Role, UserId,
};
use super::policy::{acting_recruit, acting_recruiter, recruiter_company, recruits_for_offer};
use super::ServiceError;
use crate::identity::Session;
use crate::store::{Store, UnitOfWork};

pub struct ApplicationService<S> {
    store: Arc<S>,
}

impl<S: Store> ApplicationService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn create(
        &self,
        session: &Session,
        draft: &ApplicationDraft,
    ) -> Result<Application, ServiceError> {
        self.store.write(|unit| {
            let recruit = acting_recruit(unit, session)?;
            let offer = unit
                .job_offer(draft.job_offer_id)?
                .ok_or(ServiceError::NotFound("job offer"))?;
            let application =
                unit.insert_application(recruit.id, offer.id, ApplicationStatus::Pending)?;
            activity::record(
                unit,
                session.user_id,
                ActivityAction::ApplicationCreated,
                &format!("applied to job offer {} (application {})", offer.id, application.id),
            )?;
            Ok(application)
        })
    }

    pub fn list_all(&self, session: &Session) -> Result<Vec<Application>, ServiceError> {
        session.require(Role::Sysadmin)?;
        self.store
            .read(|unit| unit.applications().map_err(ServiceError::from))
    }

    /// A recruit's applications, each with the offer and company it targeted when
    /// those still exist.
    pub fn list_for_recruit(
        &self,
        session: &Session,
        user_id: UserId,
    ) -> Result<Vec<RecruitApplication>, ServiceError> {
        if !session.acts_for(user_id) {
            return Err(ServiceError::Forbidden("cannot list another user's applications"));
        }

        self.store.read(|unit| {
            let recruit = unit
                .recruit_for_user(user_id)?
                .ok_or(ServiceError::NotFound("recruit"))?;

            let mut listed = Vec::new();
            for application in unit.applications_for_recruit(recruit.id)? {
                let job_offer = unit.job_offer(application.job_offer_id)?;
                let company = match &job_offer {
                    Some(offer) => unit.company(offer.company_id)?,
                    None => None,
                };
                listed.push(RecruitApplication {
                    application,
                    job_offer,
                    company,
                });
            }
            Ok(listed)
        })
    }

    /// Applications for one of the caller's own offers; other companies' offers
    /// yield an empty list.
    pub fn list_for_job_offer(
        &self,
        session: &Session,
        job_offer_id: JobOfferId,
    ) -> Result<Vec<Application>, ServiceError> {
        self.store.read(|unit| {
            let recruiter = acting_recruiter(unit, session)?;
            let company_id = recruiter_company(unit, &recruiter)?;
            Ok(unit.applications_for_offer(job_offer_id, company_id)?)
        })
    }

    pub fn get(&self, session: &Session, id: ApplicationId) -> Result<Application, ServiceError> {
        self.store.read(|unit| {
            let application = unit
                .application(id)?
                .ok_or(ServiceError::NotFound("application"))?;
            if session.is_sysadmin()
                || owns_application(unit, session, &application)?
                || recruits_for_offer(unit, session, application.job_offer_id)?
            {
                Ok(application)
            } else {
                Err(ServiceError::Forbidden("application is not visible to this account"))
            }
        })
    }

    /// Overwrites the status. Any known status may replace any other.
    pub fn update_status(
        &self,
        session: &Session,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> Result<Application, ServiceError> {
        self.store.write(|unit| {
            let mut application = unit
                .application(id)?
                .ok_or(ServiceError::NotFound("application"))?;
            if !session.is_sysadmin() && !recruits_for_offer(unit, session, application.job_offer_id)? {
                return Err(ServiceError::Forbidden(
                    "only the offer's company can change the status",
                ));
            }

            let previous = application.status;
            unit.set_application_status(id, status)?;
            application.status = status;
            activity::record(
                unit,
                session.user_id,
                ActivityAction::ApplicationStatusChanged,
                &format!("application {id} moved from {previous} to {status}"),
            )?;
            Ok(application)
        })
    }

    pub fn delete(&self, session: &Session, id: ApplicationId) -> Result<(), ServiceError> {
        self.store.write(|unit| {
            let application = unit
                .application(id)?
                .ok_or(ServiceError::NotFound("application"))?;
            if !session.is_sysadmin() && !owns_application(unit, session, &application)? {
                return Err(ServiceError::Forbidden("only the applicant can withdraw"));
            }

            unit.delete_application(id)?;
            activity::record(
                unit,
                session.user_id,
                ActivityAction::ApplicationDeleted,
                &format!("deleted application {id}"),
            )?;
            Ok(())
        })
    }
}

fn owns_application(
    unit: &dyn UnitOfWork,
    session: &Session,
    application: &Application,
) -> Result<bool, ServiceError> {
    if session.role != Role::Recruit {
        return Ok(false);
    }
    Ok(unit
        .recruit_for_user(session.user_id)?
        .is_some_and(|recruit| recruit.id == application.recruit_id))
}
