//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on the driving
//! port, so they can be exercised without network access.

use std::sync::Arc;

use crate::domain::ports::WaitlistSubscriptionCommand;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub subscription: Arc<dyn WaitlistSubscriptionCommand>,
}

impl HttpState {
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use backend::domain::ports::FixtureWaitlistSubscriptionCommand;
    /// use backend::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::new(Arc::new(FixtureWaitlistSubscriptionCommand));
    /// let _subscription = state.subscription.clone();
    /// ```
    pub fn new(subscription: Arc<dyn WaitlistSubscriptionCommand>) -> Self {
        Self { subscription }
    }
}
