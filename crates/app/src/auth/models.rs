//! Auth data models.

use mockall::automock;
use tokio::sync::watch;

use crate::{auth::AuthError, store::UserStore};

/// The signed-in account as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    /// Account id issued by the provider.
    pub uid: String,

    /// Sign-in email, when the provider exposes one.
    pub email: Option<String>,
}

/// The identity provider's session signal: the current account, or `None`
/// when signed out, plus change notifications.
#[automock]
pub trait IdentityProvider: Send + Sync {
    /// The currently signed-in account, if any.
    fn current_user(&self) -> Option<CurrentUser>;

    /// Subscribes to session changes; the receiver yields the latest session
    /// state after every sign-in or sign-out.
    fn subscribe(&self) -> watch::Receiver<Option<CurrentUser>>;
}

/// Authorization context passed explicitly into every service call.
///
/// Carries exactly what the services need — whose documents to touch and
/// whether the caller may use the admin surface — instead of being read from
/// ambient session state at each call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Account whose data the operation acts on.
    pub user_id: String,

    /// Whether the account carries the admin flag.
    pub is_admin: bool,
}

impl AuthContext {
    /// Context for an ordinary signed-in account.
    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            is_admin: false,
        }
    }

    /// Resolves the context for the currently signed-in account, reading the
    /// admin flag off its user record. Accounts without a record yet are
    /// ordinary users.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotSignedIn`] when nobody is signed in, or
    /// [`AuthError::Store`] when the user record cannot be read.
    pub async fn resolve(
        identity: &dyn IdentityProvider,
        users: &dyn UserStore,
    ) -> Result<Self, AuthError> {
        let user = identity.current_user().ok_or(AuthError::NotSignedIn)?;
        let record = users.get_user_record(&user.uid).await?;

        Ok(Self {
            user_id: user.uid,
            is_admin: record.is_some_and(|record| record.admin),
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::store::{MemoryStore, UserRecord};

    use super::*;

    #[tokio::test]
    async fn resolve_without_session_is_rejected() {
        let store = MemoryStore::new();
        let mut identity = MockIdentityProvider::new();
        identity.expect_current_user().return_const(None);

        let result = AuthContext::resolve(&identity, &store).await;

        assert!(
            matches!(result, Err(AuthError::NotSignedIn)),
            "expected NotSignedIn, got {result:?}"
        );
    }

    #[tokio::test]
    async fn resolve_without_record_is_ordinary_user() -> TestResult {
        let store = MemoryStore::new();
        let mut identity = MockIdentityProvider::new();

        identity.expect_current_user().return_const(Some(CurrentUser {
            uid: "u1".to_string(),
            email: Some("u1@example.com".to_string()),
        }));

        let auth = AuthContext::resolve(&identity, &store).await?;

        assert_eq!(auth.user_id, "u1");
        assert!(!auth.is_admin);

        Ok(())
    }

    #[tokio::test]
    async fn resolve_reads_admin_flag_from_record() -> TestResult {
        let store = MemoryStore::new();

        let mut record = UserRecord::new("staff");
        record.admin = true;
        crate::store::UserStore::put_user_record(&store, &record).await?;

        let mut identity = MockIdentityProvider::new();
        identity.expect_current_user().return_const(Some(CurrentUser {
            uid: "staff".to_string(),
            email: None,
        }));

        let auth = AuthContext::resolve(&identity, &store).await?;

        assert!(auth.is_admin);

        Ok(())
    }
}
