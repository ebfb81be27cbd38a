//! Driving port for waitlist signups.

use async_trait::async_trait;

use crate::domain::{SignupRequest, SubscriptionOutcome};

/// Use-case port invoked by inbound adapters with a validated signup.
///
/// Implementations never fail: every fault is folded into the outcome.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WaitlistSubscriptionCommand: Send + Sync {
    /// Register the signup with the mailing-list provider.
    async fn subscribe(&self, request: SignupRequest) -> SubscriptionOutcome;
}

/// Fixture implementation reporting success without side effects.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureWaitlistSubscriptionCommand;

#[async_trait]
impl WaitlistSubscriptionCommand for FixtureWaitlistSubscriptionCommand {
    async fn subscribe(&self, _request: SignupRequest) -> SubscriptionOutcome {
        SubscriptionOutcome::success()
    }
}
