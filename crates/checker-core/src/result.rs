//! Lookup result state

use crate::SourceError;

pub const MESSAGE_ELIGIBLE: &str = "You are eligible!";
pub const MESSAGE_NOT_ELIGIBLE: &str = "Sorry, we didn't find your wallet address in the list.";

/// The engine's externally observable state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LookupResult {
    /// Nothing to check
    #[default]
    Idle,
    /// A submission is waiting out the debounce window or being evaluated
    Pending,
    Eligible,
    NotEligible,
    Failed(SourceError),
}

impl LookupResult {
    /// Whether this state ends an evaluation (and is reported as a completion)
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            LookupResult::Eligible | LookupResult::NotEligible | LookupResult::Failed(_)
        )
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, LookupResult::Pending)
    }

    /// User-facing message, if any
    pub fn message(&self) -> Option<String> {
        match self {
            LookupResult::Idle | LookupResult::Pending => None,
            LookupResult::Eligible => Some(MESSAGE_ELIGIBLE.to_string()),
            LookupResult::NotEligible => Some(MESSAGE_NOT_ELIGIBLE.to_string()),
            LookupResult::Failed(err) => Some(format!(
                "Error loading the {} list: {}. Please try again later.",
                err.origin(),
                err.reason()
            )),
        }
    }

    /// Short label, used for logs and metrics
    pub fn outcome(&self) -> &'static str {
        match self {
            LookupResult::Idle => "idle",
            LookupResult::Pending => "pending",
            LookupResult::Eligible => "eligible",
            LookupResult::NotEligible => "not_eligible",
            LookupResult::Failed(_) => "failed",
        }
    }
}
