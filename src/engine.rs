use crate::classifier::{ConsentIntent, ResponseClassifier};
use crate::errors::AppError;
use crate::lead_store::LeadStore;
use crate::models::{LeadRecord, LeadStatus, Step};
use crate::scheduler::ReminderScheduler;
use chrono::Utc;
use std::sync::Arc;

/// Reply returned while the opener is pending, so callers can suppress
/// duplicate consent prompts.
pub const AWAITING_CONSENT: &str = "Awaiting consent";

/// Sentinel response that re-issues the opener without consuming the
/// consent step.
const START_SENTINEL: &str = "start";

const CLARIFY_REPLY: &str = "Sorry, I didn't understand. Could you please say 'yes' or 'no'?";

/// Drives one lead at a time through the fixed question sequence
/// (consent, age, country, interest), persisting after every transition.
///
/// `advance` is the only entry point external callers invoke. All
/// conversational outcomes are expressed as return values; the only `Err`
/// is a lead-store I/O failure.
pub struct ConversationEngine {
    store: Arc<LeadStore>,
    scheduler: Arc<ReminderScheduler>,
    classifier: Arc<dyn ResponseClassifier>,
}

impl ConversationEngine {
    pub fn new(
        store: Arc<LeadStore>,
        scheduler: Arc<ReminderScheduler>,
        classifier: Arc<dyn ResponseClassifier>,
    ) -> Self {
        Self {
            store,
            scheduler,
            classifier,
        }
    }

    /// Processes one free-text response from a lead and returns the
    /// agent's reply: the next prompt, a clarification request, the
    /// `"Awaiting consent"` token, or a terminal status token
    /// (`"secured"` / `"no_response"`).
    pub async fn advance(
        &self,
        lead_id: &str,
        name: &str,
        response: &str,
    ) -> Result<String, AppError> {
        let mut lead = self.store.get_or_create(lead_id, name);
        let response = response.trim().to_lowercase();

        // Checkpoint the current state before interpreting the response.
        self.store.save(&lead).await?;

        // Terminal statuses absorb all further responses.
        if lead.status.is_terminal() {
            tracing::debug!("Lead {} already {}", lead_id, lead.status);
            return Ok(lead.status.as_str().to_string());
        }

        match lead.step {
            Step::Consent => self.handle_consent(&mut lead, &response).await,
            Step::Age | Step::Country | Step::Interest => {
                self.handle_answer(&mut lead, &response).await
            }
        }
    }

    /// Consent step: the response decides whether the conversation starts,
    /// ends, or stays put.
    async fn handle_consent(
        &self,
        lead: &mut LeadRecord,
        response: &str,
    ) -> Result<String, AppError> {
        if response == START_SENTINEL {
            // Repeated openers must not consume the step.
            tracing::info!(
                "Agent to {}: {}",
                lead.name,
                Step::Consent.prompt(&lead.name)
            );
            return Ok(AWAITING_CONSENT.to_string());
        }

        match self.classifier.classify_consent(response) {
            ConsentIntent::Affirmative => {
                lead.step = Step::Age;
                lead.last_interaction = Utc::now();
                self.scheduler.arm(&lead.lead_id);
                self.store.save(lead).await?;
                tracing::info!("Agent to {}: Great, {}! Let's get started.", lead.name, lead.name);
                Ok(Step::Age.prompt(&lead.name))
            }
            ConsentIntent::Negative => {
                lead.status = LeadStatus::NoResponse;
                lead.last_interaction = Utc::now();
                self.store.save(lead).await?;
                tracing::info!(
                    "Agent to {}: Alright, no problem, {}. Have a great day!",
                    lead.name,
                    lead.name
                );
                Ok(LeadStatus::NoResponse.as_str().to_string())
            }
            ConsentIntent::Invalid => {
                // Self-loop: no step or status mutation.
                tracing::info!("Agent to {}: {}", lead.name, CLARIFY_REPLY);
                Ok(CLARIFY_REPLY.to_string())
            }
        }
    }

    /// Age, country, and interest steps all store the normalized response
    /// verbatim (no validation) and advance; completing the interest step
    /// secures the lead instead of advancing further.
    async fn handle_answer(
        &self,
        lead: &mut LeadRecord,
        response: &str,
    ) -> Result<String, AppError> {
        match lead.step {
            Step::Age => lead.age = Some(response.to_string()),
            Step::Country => lead.country = Some(response.to_string()),
            Step::Interest => lead.interest = Some(response.to_string()),
            Step::Consent => {
                return Err(AppError::InternalError(
                    "consent step reached answer handler".to_string(),
                ))
            }
        }
        lead.last_interaction = Utc::now();

        let reply = match lead.step.next() {
            Some(next) => {
                lead.step = next;
                next.prompt(&lead.name)
            }
            None => {
                lead.status = LeadStatus::Secured;
                tracing::info!(
                    "Agent to {}: Thank you for providing the information, {}!",
                    lead.name,
                    lead.name
                );
                LeadStatus::Secured.as_str().to_string()
            }
        };

        self.store.save(lead).await?;
        Ok(reply)
    }
}
