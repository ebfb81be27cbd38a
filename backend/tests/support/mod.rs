//! Shared doubles and app wiring for waitlist integration suites.

use std::sync::{Arc, Mutex};

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use async_trait::async_trait;
use backend::Trace;
use backend::domain::ports::{
    MailingListProvider, MailingListProviderError, MemberTag, MemberUpsert,
    WaitlistSubscriptionCommand,
};
use backend::domain::{
    CredentialsError, FailureStage, MemberHash, ProviderCredentials, WaitlistSubscriptionService,
};
use backend::inbound::http::cache_control::no_store_headers;
use backend::inbound::http::json_error_handler;
use backend::inbound::http::state::HttpState;
use backend::inbound::http::subscribe::subscribe;

pub const API_KEY: &str = "0123456789abcdef-us21";
pub const AUDIENCE_ID: &str = "list123";

/// One provider call as observed by [`RecordingProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    Probe { audience: String },
    Upsert { member: MemberHash, upsert: MemberUpsert },
    Tag { member: MemberHash, tag: String },
}

impl ProviderCall {
    pub fn stage(&self) -> FailureStage {
        match self {
            Self::Probe { .. } => FailureStage::AudienceLookup,
            Self::Upsert { .. } => FailureStage::Upsert,
            Self::Tag { .. } => FailureStage::Tag,
        }
    }
}

/// Provider double that records calls and fails on request.
#[derive(Clone, Default)]
pub struct RecordingProvider {
    calls: Arc<Mutex<Vec<ProviderCall>>>,
    failure: Arc<Mutex<Option<(FailureStage, MailingListProviderError)>>>,
}

impl RecordingProvider {
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// Make every call at `stage` fail with `error`.
    pub fn fail_at(&self, stage: FailureStage, error: MailingListProviderError) {
        *self.failure.lock().expect("failure lock") = Some((stage, error));
    }

    fn record(&self, call: ProviderCall) -> Result<(), MailingListProviderError> {
        let stage = call.stage();
        self.calls.lock().expect("calls lock").push(call);
        match &*self.failure.lock().expect("failure lock") {
            Some((failing, error)) if *failing == stage => Err(error.clone()),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl MailingListProvider for RecordingProvider {
    async fn probe_audience(
        &self,
        credentials: &ProviderCredentials,
    ) -> Result<(), MailingListProviderError> {
        self.record(ProviderCall::Probe {
            audience: credentials.audience_id().to_owned(),
        })
    }

    async fn upsert_member(
        &self,
        _credentials: &ProviderCredentials,
        member: &MemberHash,
        upsert: &MemberUpsert,
    ) -> Result<(), MailingListProviderError> {
        self.record(ProviderCall::Upsert {
            member: member.clone(),
            upsert: upsert.clone(),
        })
    }

    async fn tag_member(
        &self,
        _credentials: &ProviderCredentials,
        member: &MemberHash,
        tag: &MemberTag,
    ) -> Result<(), MailingListProviderError> {
        self.record(ProviderCall::Tag {
            member: member.clone(),
            tag: tag.name.clone(),
        })
    }
}

pub fn valid_credentials() -> Result<ProviderCredentials, CredentialsError> {
    ProviderCredentials::new(Some(API_KEY), Some(AUDIENCE_ID))
}

/// Service wired to `provider` with the given credentials.
pub fn service_with<P>(
    provider: P,
    credentials: Result<ProviderCredentials, CredentialsError>,
) -> Arc<dyn WaitlistSubscriptionCommand>
where
    P: MailingListProvider + 'static,
{
    Arc::new(WaitlistSubscriptionService::new(Arc::new(provider), credentials))
}

/// The `/api` surface as mounted by the server.
pub fn waitlist_app(
    command: Arc<dyn WaitlistSubscriptionCommand>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(HttpState::new(command)))
        .wrap(Trace)
        .service(
            web::scope("/api")
                .wrap(no_store_headers())
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .service(subscribe),
        )
}
