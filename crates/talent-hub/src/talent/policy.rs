use super::domain::{CompanyId, JobOfferId, Recruit, Recruiter, Role};
use super::ServiceError;
use crate::identity::Session;
use crate::store::UnitOfWork;

pub(crate) fn acting_recruiter(
    unit: &dyn UnitOfWork,
    session: &Session,
) -> Result<Recruiter, ServiceError> {
    session.require(Role::Recruiter)?;
    unit.recruiter_for_user(session.user_id)?
        .ok_or(ServiceError::Forbidden("no recruiter profile for this account"))
}

pub(crate) fn acting_recruit(
    unit: &dyn UnitOfWork,
    session: &Session,
) -> Result<Recruit, ServiceError> {
    session.require(Role::Recruit)?;
    unit.recruit_for_user(session.user_id)?
        .ok_or(ServiceError::Forbidden("no recruit profile for this account"))
}

/// The recruiter's company, provided the row still exists. Company deletion
/// leaves recruiters pointing at a dangling id.
pub(crate) fn live_company(
    unit: &dyn UnitOfWork,
    recruiter: &Recruiter,
) -> Result<Option<CompanyId>, ServiceError> {
    match recruiter.company_id {
        Some(company_id) if unit.company(company_id)?.is_some() => Ok(Some(company_id)),
        _ => Ok(None),
    }
}

pub(crate) fn recruiter_company(
    unit: &dyn UnitOfWork,
    recruiter: &Recruiter,
) -> Result<CompanyId, ServiceError> {
    live_company(unit, recruiter)?
        .ok_or(ServiceError::Forbidden("recruiter is not attached to a company"))
}

/// Main recruiter with a company: the only actor allowed to change job offers.
pub(crate) fn offer_manager(
    unit: &dyn UnitOfWork,
    session: &Session,
) -> Result<(Recruiter, CompanyId), ServiceError> {
    let recruiter = acting_recruiter(unit, session)?;
    if !recruiter.is_main() {
        return Err(ServiceError::Forbidden(
            "only the main recruiter can manage job offers",
        ));
    }
    let company_id = recruiter_company(unit, &recruiter)?;
    Ok((recruiter, company_id))
}

/// True when the caller recruits for the company that owns `job_offer_id`.
pub(crate) fn recruits_for_offer(
    unit: &dyn UnitOfWork,
    session: &Session,
    job_offer_id: JobOfferId,
) -> Result<bool, ServiceError> {
    if session.role != Role::Recruiter {
        return Ok(false);
    }
    let Some(recruiter) = unit.recruiter_for_user(session.user_id)? else {
        return Ok(false);
    };
    let Some(company_id) = live_company(unit, &recruiter)? else {
        return Ok(false);
    };
    Ok(unit.job_offer_in_company(job_offer_id, company_id)?.is_some())
}
