//! Username/password authentication

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::user::{Principal, PrincipalLoader};
use crate::domain::DomainError;
use crate::infrastructure::observability;
use crate::infrastructure::user::CredentialHasher;

const BAD_CREDENTIALS: &str = "Bad credentials";

/// Verifies submitted credentials against the stored principal.
///
/// Unknown usernames and wrong passwords fail with the same error so a
/// caller cannot tell which usernames exist.
#[derive(Clone)]
pub struct Authenticator {
    loader: Arc<dyn PrincipalLoader>,
    hasher: Arc<dyn CredentialHasher>,
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator").finish_non_exhaustive()
    }
}

impl Authenticator {
    pub fn new(loader: Arc<dyn PrincipalLoader>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { loader, hasher }
    }

    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Principal, DomainError> {
        let principal = match self.loader.load_user_by_username(username).await {
            Ok(principal) => principal,
            Err(DomainError::AuthenticationFailed { .. }) => {
                debug!(username = %username, "Login for unknown user");
                observability::record_login("failure");
                return Err(DomainError::authentication_failed(BAD_CREDENTIALS));
            }
            Err(e) => return Err(e),
        };

        if !self.hasher.verify(password, principal.password_hash()) {
            debug!(username = %username, "Login with wrong password");
            observability::record_login("failure");
            return Err(DomainError::authentication_failed(BAD_CREDENTIALS));
        }

        observability::record_login("success");
        info!(user_id = %principal.user_id(), "User authenticated");

        Ok(principal)
    }
}
