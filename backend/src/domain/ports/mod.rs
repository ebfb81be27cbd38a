//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod mailing_list_provider;
mod waitlist_subscription_command;

#[cfg(test)]
pub use mailing_list_provider::MockMailingListProvider;
pub use mailing_list_provider::{
    FixtureMailingListProvider, MailingListProvider, MailingListProviderError, MemberTag,
    MemberUpsert, NEW_MEMBER_STATUS,
};
#[cfg(test)]
pub use waitlist_subscription_command::MockWaitlistSubscriptionCommand;
pub use waitlist_subscription_command::{
    FixtureWaitlistSubscriptionCommand, WaitlistSubscriptionCommand,
};
