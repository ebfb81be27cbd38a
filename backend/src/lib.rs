//! Waitlist backend library.
//!
//! Hexagonal layout: [`domain`] holds validation and the subscription flow,
//! [`inbound`] the HTTP adapter and [`outbound`] the Mailchimp client.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
