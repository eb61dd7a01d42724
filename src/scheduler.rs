use crate::lead_store::LeadStore;
use crate::models::LeadStatus;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Delivery seam for proactive follow-up messages.
///
/// The default implementation logs the message; tests inject a
/// channel-backed notifier to observe firings.
pub trait FollowUpNotifier: Send + Sync {
    fn notify(&self, lead_id: &str, name: &str);
}

/// Logs follow-up messages the way the agent voices every other reply.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl FollowUpNotifier for TracingNotifier {
    fn notify(&self, lead_id: &str, name: &str) {
        tracing::info!(
            "Follow-up for {}: Just checking in to see if you're still interested, {}.",
            lead_id,
            name
        );
    }
}

/// Schedules at most one live follow-up task per lead.
///
/// Arming spawns a task that wakes every idle interval, re-reads the
/// lead's current state, and follows up only when the lead is still
/// non-terminal and has genuinely been idle for a full interval since
/// `last_interaction` (a fresh response makes the wake-up a no-op).
/// Reaching a terminal status is the sole exit condition for the task.
///
/// Re-arming replaces the lead's task and aborts the previous one, so the
/// one-live-task invariant holds by construction; the terminal and
/// staleness checks still make any straggler firing harmless.
pub struct ReminderScheduler {
    store: Arc<LeadStore>,
    interval: Duration,
    notifier: Arc<dyn FollowUpNotifier>,
    tasks: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl ReminderScheduler {
    pub fn new(
        store: Arc<LeadStore>,
        interval: Duration,
        notifier: Arc<dyn FollowUpNotifier>,
    ) -> Self {
        Self {
            store,
            interval,
            notifier,
            tasks: Mutex::new(HashMap::new()),
        }
    }

    /// Arms (or re-arms) the follow-up task for `lead_id`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn arm(&self, lead_id: &str) {
        let handle = tokio::spawn(follow_up_loop(
            self.store.clone(),
            self.notifier.clone(),
            self.interval,
            lead_id.to_string(),
        ));
        tracing::info!(
            "Scheduled follow-up for {} in {}s",
            lead_id,
            self.interval.as_secs()
        );

        if let Some(previous) = self.lock_tasks().insert(lead_id.to_string(), handle) {
            previous.abort();
        }
    }

    /// Whether a live follow-up task exists for `lead_id`.
    pub fn is_armed(&self, lead_id: &str) -> bool {
        self.lock_tasks()
            .get(lead_id)
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    fn lock_tasks(&self) -> std::sync::MutexGuard<'_, HashMap<String, JoinHandle<()>>> {
        self.tasks.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        for (_, handle) in self.lock_tasks().drain() {
            handle.abort();
        }
    }
}

async fn follow_up_loop(
    store: Arc<LeadStore>,
    notifier: Arc<dyn FollowUpNotifier>,
    interval: Duration,
    lead_id: String,
) {
    let idle_threshold =
        chrono::Duration::from_std(interval).unwrap_or(chrono::TimeDelta::MAX);

    loop {
        tokio::time::sleep(interval).await;

        let Some(mut lead) = store.get(&lead_id) else {
            tracing::warn!("Follow-up task found no record for {}; stopping", lead_id);
            return;
        };

        // Sole exit condition for the recurring timer.
        if lead.status.is_terminal() {
            tracing::debug!("Lead {} reached {}; follow-ups done", lead_id, lead.status);
            return;
        }

        // A stale fire racing a real response must not follow up early.
        let idle = chrono::Utc::now() - lead.last_interaction;
        if idle < idle_threshold {
            continue;
        }

        lead.status = LeadStatus::FollowedUp;
        if let Err(e) = store.save(&lead).await {
            tracing::error!("Failed to persist follow-up for {}: {}", lead_id, e);
        }
        notifier.notify(&lead.lead_id, &lead.name);
    }
}
