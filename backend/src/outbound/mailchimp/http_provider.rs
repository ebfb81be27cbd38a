//! Reqwest-backed Mailchimp provider.
//!
//! This adapter owns transport details only: URL construction, basic auth,
//! request bodies and mapping transport faults into port errors. Deciding
//! what a failure means is left to the domain.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CACHE_CONTROL;
use reqwest::{Client, RequestBuilder, Response, Url};

use super::dto::{MemberTagsDto, UpsertMemberDto};
use crate::domain::ports::{MailingListProvider, MailingListProviderError, MemberTag, MemberUpsert};
use crate::domain::{MemberHash, ProviderCredentials};

/// Basic-auth username; the API ignores it and authenticates on the key.
const AUTH_USERNAME: &str = "anystring";
const USER_AGENT: &str = "waitlist-backend/0.1";
const BODY_CAPTURE_LIMIT: usize = 16 * 1024;

/// Mailing-list provider speaking the Mailchimp Marketing API v3.
pub struct MailchimpHttpProvider {
    client: Client,
    base_url: Option<Url>,
}

impl MailchimpHttpProvider {
    /// Build an adapter that derives the API host from each key's datacenter.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        Self::build(None, timeout)
    }

    /// Build an adapter pinned to `base_url`, for staging or local fakes.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_base_url(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        Self::build(Some(base_url), timeout)
    }

    fn build(base_url: Option<Url>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, base_url })
    }

    fn api_root(&self, credentials: &ProviderCredentials) -> Result<Url, MailingListProviderError> {
        match &self.base_url {
            Some(url) => Ok(url.clone()),
            None => datacenter_root(credentials),
        }
    }

    fn endpoint(
        &self,
        credentials: &ProviderCredentials,
        segments: &[&str],
    ) -> Result<Url, MailingListProviderError> {
        let mut url = self.api_root(credentials)?;
        url.path_segments_mut()
            .map_err(|()| MailingListProviderError::invalid_request("API root cannot hold a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorised(&self, request: RequestBuilder, credentials: &ProviderCredentials) -> RequestBuilder {
        request
            .basic_auth(AUTH_USERNAME, Some(credentials.api_key()))
            .header(CACHE_CONTROL, "no-cache")
    }
}

#[async_trait]
impl MailingListProvider for MailchimpHttpProvider {
    async fn probe_audience(
        &self,
        credentials: &ProviderCredentials,
    ) -> Result<(), MailingListProviderError> {
        let url = self.endpoint(credentials, &["lists", credentials.audience_id()])?;
        send(self.authorised(self.client.get(url), credentials)).await
    }

    async fn upsert_member(
        &self,
        credentials: &ProviderCredentials,
        member: &MemberHash,
        upsert: &MemberUpsert,
    ) -> Result<(), MailingListProviderError> {
        let url = self.endpoint(
            credentials,
            &["lists", credentials.audience_id(), "members", member.as_str()],
        )?;
        let request = self
            .authorised(self.client.put(url), credentials)
            .json(&UpsertMemberDto::from(upsert));
        send(request).await
    }

    async fn tag_member(
        &self,
        credentials: &ProviderCredentials,
        member: &MemberHash,
        tag: &MemberTag,
    ) -> Result<(), MailingListProviderError> {
        let url = self.endpoint(
            credentials,
            &[
                "lists",
                credentials.audience_id(),
                "members",
                member.as_str(),
                "tags",
            ],
        )?;
        let request = self
            .authorised(self.client.post(url), credentials)
            .json(&MemberTagsDto::from(tag));
        send(request).await
    }
}

fn datacenter_root(credentials: &ProviderCredentials) -> Result<Url, MailingListProviderError> {
    let raw = format!("https://{}.api.mailchimp.com/3.0/", credentials.datacenter());
    Url::parse(&raw).map_err(|error| MailingListProviderError::invalid_request(error.to_string()))
}

async fn send(request: RequestBuilder) -> Result<(), MailingListProviderError> {
    let mut response = request.send().await.map_err(map_transport_error)?;
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = read_capped(&mut response).await?;
    Err(MailingListProviderError::status(
        status.as_u16(),
        String::from_utf8_lossy(&body),
    ))
}

/// Read at most `BODY_CAPTURE_LIMIT` bytes, dropping the rest of the stream.
async fn read_capped(response: &mut Response) -> Result<Vec<u8>, MailingListProviderError> {
    let mut body = Vec::new();
    while body.len() < BODY_CAPTURE_LIMIT {
        let Some(chunk) = response.chunk().await.map_err(map_transport_error)? else {
            break;
        };
        let room = BODY_CAPTURE_LIMIT - body.len();
        body.extend_from_slice(&chunk[..chunk.len().min(room)]);
    }
    Ok(body)
}

fn map_transport_error(error: reqwest::Error) -> MailingListProviderError {
    if error.is_timeout() {
        MailingListProviderError::timeout(error.to_string())
    } else {
        MailingListProviderError::transport(error.to_string())
    }
}
