use std::sync::Arc;

use tracing::{info, warn};
use validator::Validate;

use super::{Passwords, Session, TokenIssuer};
use crate::store::{NewUser, Store, UnitOfWork};
use crate::talent::activity;
use crate::talent::domain::{
    ActivityAction, Credentials, PasswordReset, Registration, Role, User,
};
use crate::talent::ServiceError;

/// Outcome of a successful login: the account and a signed session token.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub token: String,
}

/// Account registration, login and credential maintenance.
pub struct IdentityService<S> {
    store: Arc<S>,
    passwords: Arc<Passwords>,
    tokens: Arc<TokenIssuer>,
}

impl<S: Store> IdentityService<S> {
    pub fn new(store: Arc<S>, passwords: Arc<Passwords>, tokens: Arc<TokenIssuer>) -> Self {
        Self {
            store,
            passwords,
            tokens,
        }
    }

    pub fn tokens(&self) -> &Arc<TokenIssuer> {
        &self.tokens
    }

    /// Public sign-up. Administrator accounts cannot be self-registered.
    pub fn register(&self, registration: &Registration) -> Result<User, ServiceError> {
        if registration.role == Role::Sysadmin {
            return Err(ServiceError::Forbidden("administrators are created by operators"));
        }
        self.create_account(registration)
    }

    /// Operator path for bootstrapping administrator accounts.
    pub fn create_admin(&self, email: &str, password: &str) -> Result<User, ServiceError> {
        self.create_account(&Registration {
            email: email.to_string(),
            password: password.to_string(),
            role: Role::Sysadmin,
        })
    }

    fn create_account(&self, registration: &Registration) -> Result<User, ServiceError> {
        registration.validate()?;
        let password_hash = self.passwords.hash(&registration.password)?;
        let (email, role) = (registration.email.as_str(), registration.role);

        self.store.write(|unit| {
            let user = insert_account(unit, email, &password_hash, role)?;
            activity::record(
                unit,
                user.id,
                ActivityAction::UserRegistered,
                &format!("registered {} as {}", user.email, user.role),
            )?;
            Ok(user)
        })
    }

    pub fn authenticate(&self, credentials: &Credentials) -> Result<LoginOutcome, ServiceError> {
        let email = credentials.email.trim();
        let user = self
            .store
            .read(|unit| unit.user_by_email(email).map_err(ServiceError::from))?
            .ok_or(ServiceError::InvalidCredentials)?;

        if !self.passwords.verify(&credentials.password, &user.password_hash)? {
            warn!(user_id = user.id, "password mismatch");
            return Err(ServiceError::InvalidCredentials);
        }

        let token = self.tokens.issue(user.id, user.role)?;
        self.store.write(|unit| {
            activity::record(unit, user.id, ActivityAction::UserLoggedIn, "logged in")
                .map_err(ServiceError::from)
        })?;

        Ok(LoginOutcome { user, token })
    }

    pub fn verify(&self, token: &str) -> Result<Session, ServiceError> {
        self.tokens.verify(token)
    }

    /// Tokens stay valid until they expire; only the event is recorded.
    pub fn logout(&self, session: &Session) -> Result<(), ServiceError> {
        self.store.write(|unit| {
            activity::record(unit, session.user_id, ActivityAction::UserLoggedOut, "logged out")
                .map_err(ServiceError::from)
        })
    }

    pub fn reset_password(
        &self,
        session: &Session,
        reset: &PasswordReset,
    ) -> Result<(), ServiceError> {
        reset.validate()?;
        let password_hash = self.passwords.hash(&reset.new_password)?;

        self.store.write(|unit| {
            let email = reset.email.trim();
            // Non-admins only ever see their own account.
            let mut user = if session.is_sysadmin() {
                unit.user_by_email(email)?
                    .ok_or(ServiceError::NotFound("user"))?
            } else {
                unit.user(session.user_id)?
                    .filter(|own| own.email == email)
                    .ok_or(ServiceError::Forbidden("cannot reset another user's password"))?
            };

            user.password_hash = password_hash;
            unit.save_user(&user)?;
            activity::record(
                unit,
                session.user_id,
                ActivityAction::PasswordReset,
                &format!("reset password for user {}", user.id),
            )?;
            info!(user_id = user.id, "password reset");
            Ok(())
        })
    }
}

/// Inserts a user after checking the email is free. Runs inside the caller's unit.
pub(crate) fn insert_account(
    unit: &dyn UnitOfWork,
    email: &str,
    password_hash: &str,
    role: Role,
) -> Result<User, ServiceError> {
    let email = email.trim();
    if unit.user_by_email(email)?.is_some() {
        return Err(ServiceError::EmailTaken(email.to_string()));
    }
    Ok(unit.insert_user(&NewUser {
        email,
        password_hash,
        role,
    })?)
}
