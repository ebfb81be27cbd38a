//! Outcome of one waitlist subscription attempt.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::SignupValidationError;

/// Confirmation shown once the member is upserted and tagged.
pub const SUCCESS_MESSAGE: &str = "You’re on the list. Please check your email to confirm! ✨";

/// Upper bound on provider diagnostics returned to callers, in characters.
pub const DETAIL_CHAR_LIMIT: usize = 300;

/// Step at which a subscription stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    Validation,
    Config,
    AudienceLookup,
    Upsert,
    Tag,
}

impl FailureStage {
    /// Stable identifier used in logs and error details.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Config => "config",
            Self::AudienceLookup => "audience_lookup",
            Self::Upsert => "upsert",
            Self::Tag => "tag",
        }
    }
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal failure for one subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionFailure {
    stage: FailureStage,
    http_status: Option<u16>,
    detail: Option<String>,
}

impl SubscriptionFailure {
    /// Misconfigured credentials. Carries no detail; the cause is logged.
    pub fn config() -> Self {
        Self {
            stage: FailureStage::Config,
            http_status: None,
            detail: None,
        }
    }

    /// Provider call failure. `detail` is cut to [`DETAIL_CHAR_LIMIT`].
    pub fn provider(stage: FailureStage, http_status: Option<u16>, detail: Option<String>) -> Self {
        Self {
            stage,
            http_status,
            detail: detail.map(|text| truncate_chars(&text, DETAIL_CHAR_LIMIT)),
        }
    }

    /// Step that failed.
    pub fn stage(&self) -> FailureStage {
        self.stage
    }

    /// Provider status code, when the provider answered.
    pub fn http_status(&self) -> Option<u16> {
        self.http_status
    }

    /// Bounded diagnostic text.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

impl From<SignupValidationError> for SubscriptionFailure {
    fn from(error: SignupValidationError) -> Self {
        Self {
            stage: FailureStage::Validation,
            http_status: None,
            detail: Some(error.to_string()),
        }
    }
}

/// Result of a subscription attempt. Built per request, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionOutcome {
    Success { message: String },
    Failure(SubscriptionFailure),
}

impl SubscriptionOutcome {
    /// Successful outcome carrying [`SUCCESS_MESSAGE`].
    pub fn success() -> Self {
        Self::Success {
            message: SUCCESS_MESSAGE.to_owned(),
        }
    }

    /// Whether every step completed.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Failed stage, if any.
    pub fn failure_stage(&self) -> Option<FailureStage> {
        match self {
            Self::Success { .. } => None,
            Self::Failure(failure) => Some(failure.stage()),
        }
    }
}

impl From<SubscriptionFailure> for SubscriptionOutcome {
    fn from(failure: SubscriptionFailure) -> Self {
        Self::Failure(failure)
    }
}

impl From<SignupValidationError> for SubscriptionOutcome {
    fn from(error: SignupValidationError) -> Self {
        Self::Failure(error.into())
    }
}

#[derive(Deserialize)]
struct ProblemBody {
    detail: Option<String>,
}

/// Reduce a provider error body to a bounded diagnostic.
///
/// Prefers the `detail` member of a JSON problem document and falls back to
/// the raw text. Returns `None` for blank bodies.
///
/// # Examples
/// ```
/// use backend::domain::safe_detail;
///
/// let body = r#"{"title":"Member Exists","detail":"a@b.com is already a list member."}"#;
/// assert_eq!(safe_detail(body).as_deref(), Some("a@b.com is already a list member."));
/// assert_eq!(safe_detail("   "), None);
/// ```
pub fn safe_detail(body: &str) -> Option<String> {
    let detail = serde_json::from_str::<ProblemBody>(body)
        .ok()
        .and_then(|problem| problem.detail)
        .filter(|detail| !detail.trim().is_empty())
        .unwrap_or_else(|| body.to_owned());

    if detail.trim().is_empty() {
        return None;
    }
    Some(truncate_chars(&detail, DETAIL_CHAR_LIMIT))
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
