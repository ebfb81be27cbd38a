//! Mailchimp Marketing API adapter.
//!
//! Implements the `MailingListProvider` port over HTTPS with reqwest.

mod dto;
mod http_provider;

pub use http_provider::MailchimpHttpProvider;
