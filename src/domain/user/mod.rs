//! User domain
//!
//! Account entity, the principal projection used by authentication, input
//! validation and the repository port.

mod entity;
mod principal;
mod repository;
mod validation;

pub use entity::{LoginUser, Role, User, UserId};
pub use principal::{Principal, PrincipalLoader};
pub use repository::UserRepository;
pub use validation::{
    validate_login_user, validate_password, validate_username, UserValidationError,
    ValidationErrors,
};

#[cfg(test)]
pub use principal::MockPrincipalLoader;
#[cfg(test)]
pub use repository::MockUserRepository;
