//! Waitlist subscription orchestration.
//!
//! Runs the provider calls strictly in order and stops at the first failure:
//!
//! ```text
//! Start -> ConfigChecked -> AudienceVerified -> MemberUpserted -> Tagged -> Done
//!   \__________\_______________\_________________\______________\-> Failed(stage)
//! ```
//!
//! Nothing is retried. The upsert is keyed by [`MemberHash`], so a repeated
//! signup converges on the same member.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::domain::ports::{
    MailingListProvider, MailingListProviderError, MemberTag, MemberUpsert,
    WaitlistSubscriptionCommand,
};
use crate::domain::{
    CredentialsError, FailureStage, MemberHash, ProviderCredentials, SignupRequest,
    SubscriptionFailure, SubscriptionOutcome, safe_detail,
};

/// Waitlist service implementing [`WaitlistSubscriptionCommand`].
pub struct WaitlistSubscriptionService<P> {
    provider: Arc<P>,
    credentials: Result<ProviderCredentials, CredentialsError>,
}

impl<P> WaitlistSubscriptionService<P> {
    /// Bind a provider to the credentials parsed at startup.
    ///
    /// A credentials error is kept rather than rejected: every signup then
    /// reports [`FailureStage::Config`] without touching the network.
    pub fn new(
        provider: Arc<P>,
        credentials: Result<ProviderCredentials, CredentialsError>,
    ) -> Self {
        Self {
            provider,
            credentials,
        }
    }
}

#[async_trait]
impl<P> WaitlistSubscriptionCommand for WaitlistSubscriptionService<P>
where
    P: MailingListProvider,
{
    async fn subscribe(&self, request: SignupRequest) -> SubscriptionOutcome {
        subscribe_with(self.provider.as_ref(), &request, self.credentials.as_ref()).await
    }
}

/// Subscribe one validated signup using the given credentials.
pub async fn subscribe_with<P>(
    provider: &P,
    request: &SignupRequest,
    credentials: Result<&ProviderCredentials, &CredentialsError>,
) -> SubscriptionOutcome
where
    P: MailingListProvider + ?Sized,
{
    let member = request.email().member_hash();
    match run_stages(provider, request, credentials, &member).await {
        Ok(()) => {
            info!(member = %member, role = %request.role(), "waitlist signup registered");
            SubscriptionOutcome::success()
        }
        Err(failure) => SubscriptionOutcome::Failure(failure),
    }
}

async fn run_stages<P>(
    provider: &P,
    request: &SignupRequest,
    credentials: Result<&ProviderCredentials, &CredentialsError>,
    member: &MemberHash,
) -> Result<(), SubscriptionFailure>
where
    P: MailingListProvider + ?Sized,
{
    let credentials = credentials.map_err(|cause| {
        error!(error = %cause, "mailing list provider is misconfigured");
        SubscriptionFailure::config()
    })?;

    debug!(audience = credentials.audience_id(), "probing audience");
    provider
        .probe_audience(credentials)
        .await
        .map_err(|cause| stage_failure(FailureStage::AudienceLookup, member, cause))?;

    debug!(member = %member, "upserting member");
    provider
        .upsert_member(credentials, member, &MemberUpsert::from(request))
        .await
        .map_err(|cause| stage_failure(FailureStage::Upsert, member, cause))?;

    // The member exists from here on; a tag failure is still reported.
    let tag = MemberTag::for_role(request.role());
    debug!(member = %member, tag = %tag.name, "tagging member");
    provider
        .tag_member(credentials, member, &tag)
        .await
        .map_err(|cause| stage_failure(FailureStage::Tag, member, cause))
}

fn stage_failure(
    stage: FailureStage,
    member: &MemberHash,
    cause: MailingListProviderError,
) -> SubscriptionFailure {
    let failure = match cause {
        MailingListProviderError::Status { status, body } => {
            SubscriptionFailure::provider(stage, Some(status), safe_detail(&body))
        }
        MailingListProviderError::Timeout { message }
        | MailingListProviderError::Transport { message }
        | MailingListProviderError::InvalidRequest { message } => {
            SubscriptionFailure::provider(stage, None, Some(message))
        }
    };
    warn!(
        stage = %stage,
        member = %member,
        status = failure.http_status(),
        detail = failure.detail(),
        "mailing list provider call failed"
    );
    failure
}

#[cfg(test)]
#[path = "subscription_service_tests.rs"]
mod tests;
