//! Session identity provider.

use tokio::sync::watch;

use crate::auth::models::{CurrentUser, IdentityProvider};

/// Watch-channel-backed session holder, standing in for the hosted identity
/// SDK's current-user-or-null signal.
#[derive(Debug)]
pub struct SessionIdentity {
    session: watch::Sender<Option<CurrentUser>>,
}

impl SessionIdentity {
    /// Creates a provider with nobody signed in.
    pub fn new() -> Self {
        let (session, _) = watch::channel(None);

        Self { session }
    }

    /// Creates a provider with the given account already signed in.
    pub fn signed_in(user: CurrentUser) -> Self {
        let identity = Self::new();
        identity.sign_in(user);

        identity
    }

    /// Replaces the session with the given account.
    pub fn sign_in(&self, user: CurrentUser) {
        self.session.send_replace(Some(user));
    }

    /// Clears the session.
    pub fn sign_out(&self) {
        self.session.send_replace(None);
    }
}

impl Default for SessionIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider for SessionIdentity {
    fn current_user(&self) -> Option<CurrentUser> {
        self.session.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<CurrentUser>> {
        self.session.subscribe()
    }
}
