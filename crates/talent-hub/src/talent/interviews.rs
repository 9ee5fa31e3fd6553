use std::sync::Arc;

use super::activity;
use super::domain::{
    ActivityAction, ApplicationStatus, Interview, InterviewDraft, InterviewId, InterviewUpdate,
    InterviewView, JobOfferId, RecruitId, RecruitInterviewView, Role,
};
use super::meeting::MeetingLinkFactory;
use super::policy::{acting_recruiter, recruiter_company, recruits_for_offer};
use super::ServiceError;
use crate::identity::Session;
use crate::store::{NewInterview, Store, UnitOfWork};

pub struct InterviewService<S> {
    store: Arc<S>,
    meetings: MeetingLinkFactory,
}

impl<S: Store> InterviewService<S> {
    pub fn new(store: Arc<S>, meetings: MeetingLinkFactory) -> Self {
        Self { store, meetings }
    }

    /// Schedules an interview and moves the application to `interview` in the
    /// same unit of work.
    pub fn create(
        &self,
        session: &Session,
        draft: &InterviewDraft,
    ) -> Result<Interview, ServiceError> {
        let links = draft.online.then(|| self.meetings.create());

        self.store.write(|unit| {
            let recruiter = acting_recruiter(unit, session)?;
            let company_id = recruiter_company(unit, &recruiter)?;
            let application = unit
                .application(draft.application_id)?
                .ok_or(ServiceError::NotFound("application"))?;
            if unit
                .job_offer_in_company(application.job_offer_id, company_id)?
                .is_none()
            {
                return Err(ServiceError::Forbidden(
                    "application belongs to another company's offer",
                ));
            }

            let (join_meeting_url, start_meeting_url) = match links {
                Some(links) => (Some(links.join_url), Some(links.start_url)),
                None => (None, None),
            };
            let interview = unit.insert_interview(&NewInterview {
                application_id: application.id,
                recruit_id: application.recruit_id,
                job_offer_id: application.job_offer_id,
                location: draft.location.clone(),
                date: draft.date,
                phone: draft.phone.clone(),
                email: draft.email.clone(),
                online: draft.online,
                start_time: draft.start_time.clone(),
                join_meeting_url,
                start_meeting_url,
            })?;
            unit.set_application_status(application.id, ApplicationStatus::Interview)?;
            activity::record(
                unit,
                session.user_id,
                ActivityAction::InterviewScheduled,
                &format!(
                    "scheduled interview {} for application {}",
                    interview.id, application.id
                ),
            )?;
            Ok(interview)
        })
    }

    /// Candidate-facing listing: the host link is never part of the result type.
    pub fn list_for_recruit(
        &self,
        session: &Session,
        recruit_id: RecruitId,
    ) -> Result<Vec<RecruitInterviewView>, ServiceError> {
        self.store.read(|unit| {
            let recruit = unit
                .recruit(recruit_id)?
                .ok_or(ServiceError::NotFound("recruit"))?;
            if !session.acts_for(recruit.user_id) {
                return Err(ServiceError::Forbidden("cannot list another recruit's interviews"));
            }
            Ok(unit
                .interviews_for_recruit(recruit.id)?
                .into_iter()
                .map(RecruitInterviewView::from)
                .collect())
        })
    }

    pub fn list_for_job_offer(
        &self,
        session: &Session,
        job_offer_id: JobOfferId,
    ) -> Result<Vec<Interview>, ServiceError> {
        self.store.read(|unit| {
            let recruiter = acting_recruiter(unit, session)?;
            let company_id = recruiter_company(unit, &recruiter)?;
            Ok(unit.interviews_for_offer(job_offer_id, company_id)?)
        })
    }

    pub fn list_all(&self, session: &Session) -> Result<Vec<Interview>, ServiceError> {
        session.require(Role::Sysadmin)?;
        self.store
            .read(|unit| unit.interviews().map_err(ServiceError::from))
    }

    pub fn get(&self, session: &Session, id: InterviewId) -> Result<InterviewView, ServiceError> {
        self.store.read(|unit| {
            let interview = unit
                .interview(id)?
                .ok_or(ServiceError::NotFound("interview"))?;

            if session.is_sysadmin() || recruits_for_offer(unit, session, interview.job_offer_id)? {
                return Ok(InterviewView::Full(interview));
            }
            if session.role == Role::Recruit
                && unit
                    .recruit_for_user(session.user_id)?
                    .is_some_and(|recruit| recruit.id == interview.recruit_id)
            {
                return Ok(InterviewView::Candidate(interview.into()));
            }
            Err(ServiceError::Forbidden("interview is not visible to this account"))
        })
    }

    /// Switching `online` on mints fresh links; switching it off clears them.
    pub fn update(
        &self,
        session: &Session,
        id: InterviewId,
        changes: &InterviewUpdate,
    ) -> Result<Interview, ServiceError> {
        let fresh_links = changes.online.filter(|online| *online).map(|_| self.meetings.create());

        self.store.write(|unit| {
            let mut interview = managed_interview(unit, session, id)?;

            if let Some(location) = &changes.location {
                interview.location = Some(location.clone());
            }
            if let Some(date) = changes.date {
                interview.date = date;
            }
            if let Some(phone) = &changes.phone {
                interview.phone = Some(phone.clone());
            }
            if let Some(email) = &changes.email {
                interview.email = Some(email.clone());
            }
            if let Some(start_time) = &changes.start_time {
                interview.start_time = Some(start_time.clone());
            }
            match changes.online {
                Some(true) if !interview.online => {
                    if let Some(links) = fresh_links {
                        interview.join_meeting_url = Some(links.join_url);
                        interview.start_meeting_url = Some(links.start_url);
                    }
                    interview.online = true;
                }
                Some(false) => {
                    interview.online = false;
                    interview.join_meeting_url = None;
                    interview.start_meeting_url = None;
                }
                _ => {}
            }

            let interview = unit.save_interview(&interview)?;
            activity::record(
                unit,
                session.user_id,
                ActivityAction::InterviewUpdated,
                &format!("updated interview {id}"),
            )?;
            Ok(interview)
        })
    }

    pub fn delete(&self, session: &Session, id: InterviewId) -> Result<(), ServiceError> {
        self.store.write(|unit| {
            managed_interview(unit, session, id)?;
            unit.delete_interview(id)?;
            activity::record(
                unit,
                session.user_id,
                ActivityAction::InterviewDeleted,
                &format!("deleted interview {id}"),
            )?;
            Ok(())
        })
    }
}

/// Loads an interview the caller may change: sysadmins and the offer's recruiters.
fn managed_interview(
    unit: &dyn UnitOfWork,
    session: &Session,
    id: InterviewId,
) -> Result<Interview, ServiceError> {
    let interview = unit
        .interview(id)?
        .ok_or(ServiceError::NotFound("interview"))?;
    if session.is_sysadmin() || recruits_for_offer(unit, session, interview.job_offer_id)? {
        Ok(interview)
    } else {
        Err(ServiceError::Forbidden("only the offer's company can change the interview"))
    }
}
