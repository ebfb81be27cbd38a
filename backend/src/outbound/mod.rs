//! Outbound adapters implementing domain ports for external services.
//!
//! Adapters translate between domain types and wire formats. They hold no
//! business rules.

pub mod mailchimp;
