//! Driven port for the external mailing-list provider.
//!
//! The domain owns the three calls a signup needs (audience probe, member
//! upsert, tag assignment) so orchestration can run against fakes.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{MemberHash, ProviderCredentials, Role, SignupRequest};

/// Status assigned to members created by an upsert. Existing members keep
/// their status.
pub const NEW_MEMBER_STATUS: &str = "pending";

/// Create-or-update payload for one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberUpsert {
    /// Email as submitted, casing preserved.
    pub email_address: String,
    /// Value for the `ROLE` merge field.
    pub role: Role,
    /// Value for the `SOURCE` merge field.
    pub source: String,
}

impl From<&SignupRequest> for MemberUpsert {
    fn from(request: &SignupRequest) -> Self {
        Self {
            email_address: request.email().as_ref().to_owned(),
            role: request.role(),
            source: request.source().to_owned(),
        }
    }
}

/// Tag to mark active on a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberTag {
    pub name: String,
}

impl MemberTag {
    /// Waitlist tag derived from the signup role.
    pub fn for_role(role: Role) -> Self {
        Self {
            name: role.waitlist_tag().to_owned(),
        }
    }
}

define_port_error! {
    /// Errors surfaced while calling the mailing-list provider.
    pub enum MailingListProviderError {
        /// The provider answered with a non-success status.
        Status { status: u16, body: String } =>
            "mailing list provider returned status {status}",
        /// The call exceeded its timeout.
        Timeout { message: String } =>
            "mailing list provider timed out: {message}",
        /// Network transport failed before a response arrived.
        Transport { message: String } =>
            "mailing list provider transport failed: {message}",
        /// The adapter could not build the request.
        InvalidRequest { message: String } =>
            "mailing list provider request invalid: {message}",
    }
}

/// Port for the provider calls made during a signup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailingListProvider: Send + Sync {
    /// Confirm the configured audience exists under the account.
    async fn probe_audience(
        &self,
        credentials: &ProviderCredentials,
    ) -> Result<(), MailingListProviderError>;

    /// Create or update the member keyed by `member`.
    async fn upsert_member(
        &self,
        credentials: &ProviderCredentials,
        member: &MemberHash,
        upsert: &MemberUpsert,
    ) -> Result<(), MailingListProviderError>;

    /// Mark `tag` active on the member keyed by `member`.
    async fn tag_member(
        &self,
        credentials: &ProviderCredentials,
        member: &MemberHash,
        tag: &MemberTag,
    ) -> Result<(), MailingListProviderError>;
}

/// Fixture implementation accepting every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureMailingListProvider;

#[async_trait]
impl MailingListProvider for FixtureMailingListProvider {
    async fn probe_audience(
        &self,
        _credentials: &ProviderCredentials,
    ) -> Result<(), MailingListProviderError> {
        Ok(())
    }

    async fn upsert_member(
        &self,
        _credentials: &ProviderCredentials,
        _member: &MemberHash,
        _upsert: &MemberUpsert,
    ) -> Result<(), MailingListProviderError> {
        Ok(())
    }

    async fn tag_member(
        &self,
        _credentials: &ProviderCredentials,
        _member: &MemberHash,
        _tag: &MemberTag,
    ) -> Result<(), MailingListProviderError> {
        Ok(())
    }
}
