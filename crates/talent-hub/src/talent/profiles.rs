use std::sync::Arc;

use validator::Validate;

use super::activity;
use super::domain::{
    ActivityAction, ProfileRegistration, ProfileUpdate, Recruit, RecruitId, Recruiter,
    RecruiterId, RecruiterRole, Role,
};
use super::ServiceError;
use crate::identity::service::insert_account;
use crate::identity::{Passwords, Session};
use crate::store::{NewRecruit, NewRecruiter, Store};

/// Recruiter and recruit profiles, each bound one-to-one to a user account.
pub struct ProfileService<S> {
    store: Arc<S>,
    passwords: Arc<Passwords>,
}

impl<S: Store> ProfileService<S> {
    pub fn new(store: Arc<S>, passwords: Arc<Passwords>) -> Self {
        Self { store, passwords }
    }

    /// Creates the account and the recruiter profile together. The recruiter
    /// starts without a company.
    pub fn register_recruiter(
        &self,
        registration: &ProfileRegistration,
    ) -> Result<Recruiter, ServiceError> {
        let password_hash = self.prepare(registration)?;

        self.store.write(|unit| {
            let user = insert_account(unit, &registration.email, &password_hash, Role::Recruiter)?;
            let recruiter = unit.insert_recruiter(&NewRecruiter {
                user_id: user.id,
                company_id: None,
                role: RecruiterRole::Member,
                firstname: registration.firstname.trim(),
                lastname: registration.lastname.trim(),
                phone: registration.phone.as_deref(),
            })?;
            activity::record(
                unit,
                user.id,
                ActivityAction::RecruiterRegistered,
                &format!("registered recruiter {} for {}", recruiter.id, user.email),
            )?;
            Ok(recruiter)
        })
    }

    pub fn recruiter(&self, id: RecruiterId) -> Result<Recruiter, ServiceError> {
        self.store.read(|unit| {
            unit.recruiter(id)?
                .ok_or(ServiceError::NotFound("recruiter"))
        })
    }

    pub fn update_recruiter(
        &self,
        session: &Session,
        id: RecruiterId,
        changes: &ProfileUpdate,
    ) -> Result<Recruiter, ServiceError> {
        changes.validate()?;

        self.store.write(|unit| {
            let mut recruiter = unit
                .recruiter(id)?
                .ok_or(ServiceError::NotFound("recruiter"))?;
            if recruiter.user_id != session.user_id {
                return Err(ServiceError::Forbidden("recruiters may only edit their own profile"));
            }

            apply_names(changes, &mut recruiter.firstname, &mut recruiter.lastname);
            if let Some(phone) = &changes.phone {
                recruiter.phone = Some(phone.clone());
            }
            unit.save_recruiter(&recruiter)?;
            activity::record(
                unit,
                session.user_id,
                ActivityAction::RecruiterProfileUpdated,
                &format!("updated recruiter profile {id}"),
            )?;
            Ok(recruiter)
        })
    }

    pub fn delete_recruiter(&self, session: &Session, id: RecruiterId) -> Result<(), ServiceError> {
        self.store.write(|unit| {
            let recruiter = unit
                .recruiter(id)?
                .ok_or(ServiceError::NotFound("recruiter"))?;
            if !session.acts_for(recruiter.user_id) {
                return Err(ServiceError::Forbidden("cannot delete another recruiter"));
            }
            unit.delete_recruiter(id)?;
            activity::record(
                unit,
                session.user_id,
                ActivityAction::RecruiterDeleted,
                &format!("deleted recruiter {id}"),
            )?;
            Ok(())
        })
    }

    /// Creates the account and the recruit profile together. The profile's
    /// contact address is the login email.
    pub fn register_recruit(
        &self,
        registration: &ProfileRegistration,
    ) -> Result<Recruit, ServiceError> {
        let password_hash = self.prepare(registration)?;

        self.store.write(|unit| {
            let user = insert_account(unit, &registration.email, &password_hash, Role::Recruit)?;
            let recruit = unit.insert_recruit(&NewRecruit {
                user_id: user.id,
                firstname: registration.firstname.trim(),
                lastname: registration.lastname.trim(),
                email_address: &user.email,
                phone: registration.phone.as_deref(),
            })?;
            activity::record(
                unit,
                user.id,
                ActivityAction::RecruitRegistered,
                &format!("registered recruit {} for {}", recruit.id, user.email),
            )?;
            Ok(recruit)
        })
    }

    pub fn recruit(&self, id: RecruitId) -> Result<Recruit, ServiceError> {
        self.store
            .read(|unit| unit.recruit(id)?.ok_or(ServiceError::NotFound("recruit")))
    }

    pub fn update_recruit(
        &self,
        session: &Session,
        id: RecruitId,
        changes: &ProfileUpdate,
    ) -> Result<Recruit, ServiceError> {
        changes.validate()?;

        self.store.write(|unit| {
            let mut recruit = unit
                .recruit(id)?
                .ok_or(ServiceError::NotFound("recruit"))?;
            if recruit.user_id != session.user_id {
                return Err(ServiceError::Forbidden("recruits may only edit their own profile"));
            }

            apply_names(changes, &mut recruit.firstname, &mut recruit.lastname);
            if let Some(phone) = &changes.phone {
                recruit.phone = Some(phone.clone());
            }
            unit.save_recruit(&recruit)?;
            activity::record(
                unit,
                session.user_id,
                ActivityAction::RecruitProfileUpdated,
                &format!("updated recruit profile {id}"),
            )?;
            Ok(recruit)
        })
    }

    pub fn delete_recruit(&self, session: &Session, id: RecruitId) -> Result<(), ServiceError> {
        self.store.write(|unit| {
            let recruit = unit
                .recruit(id)?
                .ok_or(ServiceError::NotFound("recruit"))?;
            if !session.acts_for(recruit.user_id) {
                return Err(ServiceError::Forbidden("cannot delete another recruit"));
            }
            unit.delete_recruit(id)?;
            activity::record(
                unit,
                session.user_id,
                ActivityAction::RecruitDeleted,
                &format!("deleted recruit {id}"),
            )?;
            Ok(())
        })
    }

    fn prepare(&self, registration: &ProfileRegistration) -> Result<String, ServiceError> {
        registration.validate()?;
        self.passwords.hash(&registration.password)
    }
}

fn apply_names(changes: &ProfileUpdate, firstname: &mut String, lastname: &mut String) {
    if let Some(value) = &changes.firstname {
        *firstname = value.trim().to_string();
    }
    if let Some(value) = &changes.lastname {
        *lastname = value.trim().to_string();
    }
}
