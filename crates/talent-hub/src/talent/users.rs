use std::sync::Arc;

use validator::Validate;

use super::activity;
use super::domain::{ActivityAction, Role, RoleChange, User, UserId, UserProfile, UserUpdate};
use super::ServiceError;
use crate::identity::{Passwords, Session};
use crate::store::Store;

pub struct UserService<S> {
    store: Arc<S>,
    passwords: Arc<Passwords>,
}

impl<S: Store> UserService<S> {
    pub fn new(store: Arc<S>, passwords: Arc<Passwords>) -> Self {
        Self { store, passwords }
    }

    pub fn profile(&self, session: &Session, user_id: UserId) -> Result<UserProfile, ServiceError> {
        if !session.acts_for(user_id) {
            return Err(ServiceError::Forbidden("cannot view another user's profile"));
        }
        self.store.read(|unit| {
            let user = unit.user(user_id)?.ok_or(ServiceError::NotFound("user"))?;
            Ok(UserProfile {
                recruiter: unit.recruiter_for_user(user.id)?,
                recruit: unit.recruit_for_user(user.id)?,
                user,
            })
        })
    }

    pub fn update(
        &self,
        session: &Session,
        user_id: UserId,
        changes: &UserUpdate,
    ) -> Result<User, ServiceError> {
        if !session.acts_for(user_id) {
            return Err(ServiceError::Forbidden("cannot edit another user"));
        }
        changes.validate()?;
        let password_hash = changes
            .password
            .as_deref()
            .map(|password| self.passwords.hash(password))
            .transpose()?;

        self.store.write(|unit| {
            let mut user = unit.user(user_id)?.ok_or(ServiceError::NotFound("user"))?;

            if let Some(email) = changes.email.as_deref().map(str::trim) {
                if email != user.email {
                    if unit.user_by_email(email)?.is_some() {
                        return Err(ServiceError::EmailTaken(email.to_string()));
                    }
                    user.email = email.to_string();
                }
            }
            if let Some(password_hash) = password_hash {
                user.password_hash = password_hash;
            }

            unit.save_user(&user)?;
            activity::record(
                unit,
                session.user_id,
                ActivityAction::UserProfileUpdated,
                &format!("updated user {user_id}"),
            )?;
            Ok(user)
        })
    }

    /// Deletes the account row only; linked profiles stay behind.
    pub fn delete(&self, session: &Session, user_id: UserId) -> Result<(), ServiceError> {
        if !session.acts_for(user_id) {
            return Err(ServiceError::Forbidden("cannot delete another user"));
        }
        self.store.write(|unit| {
            if unit.delete_user(user_id)? == 0 {
                return Err(ServiceError::NotFound("user"));
            }
            activity::record(
                unit,
                session.user_id,
                ActivityAction::UserDeleted,
                &format!("deleted user {user_id}"),
            )?;
            Ok(())
        })
    }

    pub fn list_all(&self, session: &Session) -> Result<Vec<User>, ServiceError> {
        session.require(Role::Sysadmin)?;
        self.store.read(|unit| unit.users().map_err(ServiceError::from))
    }

    pub fn change_role(
        &self,
        session: &Session,
        user_id: UserId,
        change: &RoleChange,
    ) -> Result<User, ServiceError> {
        session.require(Role::Sysadmin)?;
        self.store.write(|unit| {
            let mut user = unit.user(user_id)?.ok_or(ServiceError::NotFound("user"))?;
            let previous = user.role;
            user.role = change.new_role;
            unit.save_user(&user)?;
            activity::record(
                unit,
                session.user_id,
                ActivityAction::UserRoleChanged,
                &format!("user {user_id} role changed from {previous} to {}", user.role),
            )?;
            Ok(user)
        })
    }
}
