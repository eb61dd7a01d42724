use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============ Conversation State ============

/// The question a lead is currently being asked.
///
/// Steps advance monotonically in declaration order and never regress:
/// `Consent → Age → Country → Interest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Waiting for the lead to agree to answer questions.
    Consent,
    /// Waiting for the lead's age.
    Age,
    /// Waiting for the lead's country.
    Country,
    /// Waiting for the product or service the lead is interested in.
    Interest,
}

impl Step {
    /// The step that follows this one, or `None` after `Interest`.
    pub fn next(self) -> Option<Step> {
        match self {
            Step::Consent => Some(Step::Age),
            Step::Age => Some(Step::Country),
            Step::Country => Some(Step::Interest),
            Step::Interest => None,
        }
    }

    /// The question the agent asks at this step, addressed to `name`.
    pub fn prompt(self, name: &str) -> String {
        match self {
            Step::Consent => format!(
                "Hey {}, thank you for filling out the form. Is that okay?",
                name
            ),
            Step::Age => format!("What is your age, {}?", name),
            Step::Country => format!("Which country are you from, {}?", name),
            Step::Interest => format!("What product or service are you interested in, {}?", name),
        }
    }
}

/// Where a lead stands in the funnel.
///
/// `Secured` and `NoResponse` are terminal: once reached, the record is
/// inert and further responses only echo the status back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    Pending,
    FollowedUp,
    Secured,
    NoResponse,
}

impl LeadStatus {
    /// Stable string form used in the CSV and on the `advance` boundary.
    pub fn as_str(self) -> &'static str {
        match self {
            LeadStatus::Pending => "pending",
            LeadStatus::FollowedUp => "followed_up",
            LeadStatus::Secured => "secured",
            LeadStatus::NoResponse => "no_response",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, LeadStatus::Secured | LeadStatus::NoResponse)
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============ Lead Record ============

/// In-memory state for one lead.
///
/// Created on first contact and never deleted; mutated only by the
/// conversation engine's transition function. Answers are immutable once
/// set (a later partial update never overwrites them).
#[derive(Debug, Clone)]
pub struct LeadRecord {
    /// Opaque unique identifier, assigned at first contact.
    pub lead_id: String,
    /// Display name, set at creation.
    pub name: String,
    /// Question currently awaiting an answer.
    pub step: Step,
    /// Funnel status.
    pub status: LeadStatus,
    /// Answer collected at the `Age` step.
    pub age: Option<String>,
    /// Answer collected at the `Country` step.
    pub country: Option<String>,
    /// Answer collected at the `Interest` step.
    pub interest: Option<String>,
    /// Timestamp of the most recent response processed.
    pub last_interaction: DateTime<Utc>,
}

impl LeadRecord {
    /// Fresh record for a lead seen for the first time.
    pub fn new(lead_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            lead_id: lead_id.into(),
            name: name.into(),
            step: Step::Consent,
            status: LeadStatus::Pending,
            age: None,
            country: None,
            interest: None,
            last_interaction: Utc::now(),
        }
    }
}

// ============ CSV Row Model ============

/// One row of the backing CSV file.
///
/// Column order matches the file header:
/// `lead_id, name, age, country, interest, status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadRow {
    pub lead_id: String,
    pub name: String,
    pub age: Option<String>,
    pub country: Option<String>,
    pub interest: Option<String>,
    pub status: LeadStatus,
}
