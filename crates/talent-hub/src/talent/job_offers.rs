use std::sync::Arc;

use serde::Serialize;
use tracing::info;
use validator::Validate;

use super::activity;
use super::domain::{
    experience_bucket, ActivityAction, ApplicationId, JobOffer, JobOfferDraft, JobOfferFilter,
    JobOfferId, JobOfferListing, JobOfferUpdate, EXPERIENCE_BUCKETS,
};
use super::policy::{acting_recruiter, live_company, offer_manager, recruiter_company};
use super::ServiceError;
use crate::identity::Session;
use crate::store::{NewJobOffer, Store};

/// What a job offer deletion took with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobOfferRemoval {
    pub job_offer_id: JobOfferId,
    pub rejected_applications: Vec<ApplicationId>,
}

pub struct JobOfferService<S> {
    store: Arc<S>,
}

impl<S: Store> JobOfferService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn create(&self, session: &Session, draft: &JobOfferDraft) -> Result<JobOffer, ServiceError> {
        draft.validate()?;
        let experience = resolve_experience(draft.experience_id)?;

        self.store.write(|unit| {
            let (_, company_id) = offer_manager(unit, session)?;
            let offer = unit.insert_job_offer(&NewJobOffer {
                company_id,
                title: draft.title.trim(),
                description: &draft.description,
                location: draft.location.trim(),
                salary: draft.salary,
                experience,
            })?;
            activity::record(
                unit,
                session.user_id,
                ActivityAction::JobOfferCreated,
                &format!("created job offer {} `{}`", offer.id, offer.title),
            )?;
            Ok(offer)
        })
    }

    pub fn get(&self, session: &Session, id: JobOfferId) -> Result<JobOffer, ServiceError> {
        self.store.read(|unit| {
            let recruiter = acting_recruiter(unit, session)?;
            let company_id =
                live_company(unit, &recruiter)?.ok_or(ServiceError::NotFound("job offer"))?;
            unit.job_offer_in_company(id, company_id)?
                .ok_or(ServiceError::NotFound("job offer"))
        })
    }

    pub fn list_for_company(&self, session: &Session) -> Result<Vec<JobOffer>, ServiceError> {
        self.store.read(|unit| {
            let recruiter = acting_recruiter(unit, session)?;
            let company_id = recruiter_company(unit, &recruiter)?;
            Ok(unit.job_offers_in_company(company_id)?)
        })
    }

    pub fn update(
        &self,
        session: &Session,
        id: JobOfferId,
        changes: &JobOfferUpdate,
    ) -> Result<JobOffer, ServiceError> {
        changes.validate()?;
        let experience = changes.experience_id.map(resolve_experience).transpose()?;

        self.store.write(|unit| {
            let (_, company_id) = offer_manager(unit, session)?;
            let mut offer = unit
                .job_offer_in_company(id, company_id)?
                .ok_or(ServiceError::NotFound("job offer"))?;

            if let Some(title) = &changes.title {
                offer.title = title.trim().to_string();
            }
            if let Some(description) = &changes.description {
                offer.description = description.clone();
            }
            if let Some(location) = &changes.location {
                offer.location = location.trim().to_string();
            }
            if let Some(salary) = changes.salary {
                offer.salary = salary;
            }
            if let Some(experience) = experience {
                offer.experience = experience.to_string();
            }

            if unit.save_job_offer(&offer)? == 0 {
                return Err(ServiceError::NotFound("job offer"));
            }
            activity::record(
                unit,
                session.user_id,
                ActivityAction::JobOfferUpdated,
                &format!("updated job offer {}", offer.id),
            )?;
            Ok(offer)
        })
    }

    /// Deletes the offer and rejects every application still pending on it.
    /// A miss on the delete aborts the unit, leaving the applications untouched.
    pub fn delete(&self, session: &Session, id: JobOfferId) -> Result<JobOfferRemoval, ServiceError> {
        let removal = self.store.write(|unit| {
            let (_, company_id) = offer_manager(unit, session)?;
            let pending = unit.pending_applications(id, company_id)?;
            unit.reject_pending_applications(id, company_id)?;
            if unit.delete_job_offer(id, company_id)? == 0 {
                return Err(ServiceError::NotFound("job offer"));
            }

            for entry in &pending {
                activity::record(
                    unit,
                    entry.recruit_user_id.unwrap_or(session.user_id),
                    ActivityAction::ApplicationRejected,
                    &format!(
                        "application {} rejected because job offer {id} was deleted",
                        entry.application_id
                    ),
                )?;
            }
            activity::record(
                unit,
                session.user_id,
                ActivityAction::JobOfferDeleted,
                &format!("deleted job offer {id}"),
            )?;

            Ok(JobOfferRemoval {
                job_offer_id: id,
                rejected_applications: pending.iter().map(|entry| entry.application_id).collect(),
            })
        })?;

        info!(
            job_offer_id = id,
            rejected = removal.rejected_applications.len(),
            "job offer removed"
        );
        Ok(removal)
    }

    /// Public search. Refuses to dump the whole table when no criteria are given.
    pub fn search(&self, filter: &JobOfferFilter) -> Result<Vec<JobOfferListing>, ServiceError> {
        if !filter.has_criteria() {
            return Err(ServiceError::FilterRequired);
        }
        self.store
            .read(|unit| unit.search_job_offers(filter).map_err(ServiceError::from))
    }
}

fn resolve_experience(index: usize) -> Result<&'static str, ServiceError> {
    experience_bucket(index).ok_or_else(|| {
        ServiceError::Validation(format!(
            "experienceId must be between 0 and {}",
            EXPERIENCE_BUCKETS.len() - 1
        ))
    })
}
