//! Messages

use std::{collections::HashSet, sync::Arc, time::Duration};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, warn};

use crate::{auth::CurrentUser, store::MessageStore};

/// Greeting written to the messages collection after sign-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WelcomeMessage {
    /// Account the greeting is addressed to.
    pub user_id: String,

    /// The greeting body.
    pub message: String,

    /// Write time, as an ISO-8601 string.
    pub timestamp: Timestamp,
}

/// Text of the greeting sent to every new account.
pub const WELCOME_TEXT: &str =
    "Welcome to Hemline! Browse the new drop and find a fit worth keeping.";

/// Pause between account creation and the greeting write.
pub const WELCOME_DELAY: Duration = Duration::from_secs(10);

/// Schedules the post-signup greeting for a newly created account.
///
/// Sleeps for `delay` before writing so account creation never waits on the
/// store; a failed write is logged and dropped, never surfaced.
pub fn spawn_welcome_message(
    messages: Arc<dyn MessageStore>,
    uid: String,
    delay: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;

        let message = WelcomeMessage {
            user_id: uid,
            message: WELCOME_TEXT.to_string(),
            timestamp: Timestamp::now(),
        };

        if let Err(error) = messages.add_message(&message).await {
            warn!(user_id = %message.user_id, error = %error, "welcome message write failed");
        }
    })
}

/// Watches the identity session and greets accounts it has not seen before.
///
/// Stands in for the identity provider's account-creation trigger: the first
/// time an account shows up signed in, a greeting is scheduled via
/// [`spawn_welcome_message`]. The task ends when the identity provider goes
/// away.
pub fn watch_signups(
    mut sessions: watch::Receiver<Option<CurrentUser>>,
    messages: Arc<dyn MessageStore>,
    delay: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut greeted: HashSet<String> = HashSet::new();

        while sessions.changed().await.is_ok() {
            let user = sessions.borrow_and_update().clone();

            let Some(user) = user else {
                continue;
            };

            if greeted.insert(user.uid.clone()) {
                debug!(user_id = %user.uid, "scheduling welcome message");

                let _greeting = spawn_welcome_message(messages.clone(), user.uid, delay);
            }
        }
    })
}
