//! Credentials, session tokens and the request guard that resolves them.

pub mod middleware;
pub mod password;
pub mod service;
pub mod token;

pub use middleware::{clear_session_cookie, require_session, session_cookie, SESSION_COOKIE};
pub use password::Passwords;
pub use service::{IdentityService, LoginOutcome};
pub use token::{Claims, TokenIssuer};

use crate::talent::domain::{Role, UserId};
use crate::talent::ServiceError;

/// Authenticated caller, inserted into request extensions by [`require_session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
    pub role: Role,
}

impl Session {
    pub fn is_sysadmin(&self) -> bool {
        self.role == Role::Sysadmin
    }

    pub fn require(&self, role: Role) -> Result<(), ServiceError> {
        if self.role == role {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(role_gate_message(role)))
        }
    }

    /// The caller is `user_id` or an administrator.
    pub fn acts_for(&self, user_id: UserId) -> bool {
        self.user_id == user_id || self.is_sysadmin()
    }
}

fn role_gate_message(role: Role) -> &'static str {
    match role {
        Role::Sysadmin => "administrator role required",
        Role::Recruiter => "recruiter role required",
        Role::Recruit => "recruit role required",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_gate_rejects_other_roles() {
        let session = Session {
            user_id: 3,
            role: Role::Recruit,
        };
        assert!(session.require(Role::Recruit).is_ok());
        assert!(matches!(
            session.require(Role::Recruiter),
            Err(ServiceError::Forbidden(_))
        ));
        assert!(session.acts_for(3));
        assert!(!session.acts_for(4));
    }
}
