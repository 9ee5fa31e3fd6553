use std::sync::Arc;

use validator::Validate;

use super::activity;
use super::domain::{
    ActivityAction, Company, CompanyDraft, CompanyId, CompanyUpdate, Recruiter, RecruiterId,
    RecruiterRole, Role,
};
use super::policy::{acting_recruiter, live_company};
use super::ServiceError;
use crate::identity::Session;
use crate::store::{Store, UnitOfWork};

pub struct CompanyService<S> {
    store: Arc<S>,
}

impl<S: Store> CompanyService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Creates the company and makes the caller its main recruiter.
    pub fn create(&self, session: &Session, draft: &CompanyDraft) -> Result<Company, ServiceError> {
        draft.validate()?;

        self.store.write(|unit| {
            let mut recruiter = acting_recruiter(unit, session)?;
            if live_company(unit, &recruiter)?.is_some() {
                return Err(ServiceError::Validation(
                    "recruiter already belongs to a company".to_string(),
                ));
            }

            let company = unit.insert_company(draft)?;
            recruiter.company_id = Some(company.id);
            recruiter.role = RecruiterRole::Main;
            unit.save_recruiter(&recruiter)?;
            activity::record(
                unit,
                session.user_id,
                ActivityAction::CompanyCreated,
                &format!("created company {} `{}`", company.id, company.name),
            )?;
            Ok(company)
        })
    }

    pub fn get(&self, session: &Session, id: CompanyId) -> Result<Company, ServiceError> {
        self.store.read(|unit| {
            member_of(unit, session, id)?;
            unit.company(id)?.ok_or(ServiceError::NotFound("company"))
        })
    }

    pub fn update(
        &self,
        session: &Session,
        id: CompanyId,
        changes: &CompanyUpdate,
    ) -> Result<Company, ServiceError> {
        changes.validate()?;

        self.store.write(|unit| {
            member_of(unit, session, id)?;
            let mut company = unit.company(id)?.ok_or(ServiceError::NotFound("company"))?;

            if let Some(name) = &changes.name {
                company.name = name.trim().to_string();
            }
            if let Some(industry) = &changes.industry {
                company.industry = Some(industry.clone());
            }
            if let Some(phone_number) = &changes.phone_number {
                company.phone_number = phone_number.clone();
            }
            if let Some(email_address) = &changes.email_address {
                company.email_address = email_address.clone();
            }
            if let Some(address) = &changes.address {
                company.address = address.clone();
            }
            if let Some(website) = &changes.website {
                company.website = website.clone();
            }

            unit.save_company(&company)?;
            activity::record(
                unit,
                session.user_id,
                ActivityAction::CompanyUpdated,
                &format!("updated company {id}"),
            )?;
            Ok(company)
        })
    }

    /// Removes the company row only; recruiters and offers keep their ids.
    /// Recruiters pointing at a deleted company count as unattached.
    pub fn delete(&self, session: &Session, id: CompanyId) -> Result<(), ServiceError> {
        self.store.write(|unit| {
            member_of(unit, session, id)?;
            if unit.delete_company(id)? == 0 {
                return Err(ServiceError::NotFound("company"));
            }
            activity::record(
                unit,
                session.user_id,
                ActivityAction::CompanyDeleted,
                &format!("deleted company {id}"),
            )?;
            Ok(())
        })
    }

    /// Checks the stored account, not just the token, before listing everything.
    pub fn list_all(&self, session: &Session) -> Result<Vec<Company>, ServiceError> {
        self.store.read(|unit| {
            let is_admin = unit
                .user(session.user_id)?
                .is_some_and(|user| user.role == Role::Sysadmin);
            if !is_admin {
                return Err(ServiceError::Forbidden("administrator role required"));
            }
            Ok(unit.companies()?)
        })
    }

    /// Attaches an unattached recruiter to the caller's company as a member.
    pub fn add_member(
        &self,
        session: &Session,
        company_id: CompanyId,
        recruiter_id: RecruiterId,
    ) -> Result<Recruiter, ServiceError> {
        self.store.write(|unit| {
            let actor = member_of(unit, session, company_id)?;
            if !actor.is_main() {
                return Err(ServiceError::Forbidden("only the main recruiter can add members"));
            }

            let mut member = unit
                .recruiter(recruiter_id)?
                .ok_or(ServiceError::NotFound("recruiter"))?;
            if live_company(unit, &member)?.is_some() {
                return Err(ServiceError::Validation(
                    "recruiter already belongs to a company".to_string(),
                ));
            }

            member.company_id = Some(company_id);
            member.role = RecruiterRole::Member;
            unit.save_recruiter(&member)?;
            activity::record(
                unit,
                session.user_id,
                ActivityAction::RecruiterJoinedCompany,
                &format!("recruiter {} joined company {company_id}", member.id),
            )?;
            Ok(member)
        })
    }
}

fn member_of(
    unit: &dyn UnitOfWork,
    session: &Session,
    company_id: CompanyId,
) -> Result<Recruiter, ServiceError> {
    let recruiter = acting_recruiter(unit, session)?;
    if recruiter.belongs_to(company_id) {
        Ok(recruiter)
    } else {
        Err(ServiceError::Forbidden("recruiter does not belong to this company"))
    }
}
