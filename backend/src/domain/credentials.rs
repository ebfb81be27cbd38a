//! Mailing-list provider credentials.
//!
//! Credentials are parsed once at startup and shared read-only. A parse
//! failure disables signups but does not stop the process.

use std::fmt;

use zeroize::Zeroizing;

/// Regional routing segment embedded in the API key (`<secret>-us21`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datacenter(String);

impl Datacenter {
    /// Segment used as the API host prefix.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Datacenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extract the datacenter from an API key.
///
/// Takes the segment after the first hyphen. The segment must be a non-empty
/// ASCII alphanumeric label so it can be embedded in a host name.
///
/// # Examples
/// ```
/// use backend::domain::datacenter_from_api_key;
///
/// let dc = datacenter_from_api_key("0123abcd-us21").expect("suffix present");
/// assert_eq!(dc.as_str(), "us21");
/// assert!(datacenter_from_api_key("0123abcd").is_none());
/// ```
pub fn datacenter_from_api_key(api_key: &str) -> Option<Datacenter> {
    let segment = api_key.split('-').nth(1)?;
    if segment.is_empty() || !segment.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(Datacenter(segment.to_owned()))
}

/// Reasons the provider credentials are unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsError {
    #[error("mailing list API key is not configured")]
    MissingApiKey,
    #[error("mailing list audience id is not configured")]
    MissingAudienceId,
    #[error("mailing list API key has no datacenter suffix")]
    MissingDatacenter,
}

/// Validated provider credentials.
#[derive(Clone)]
pub struct ProviderCredentials {
    api_key: Zeroizing<String>,
    audience_id: String,
    datacenter: Datacenter,
}

impl ProviderCredentials {
    /// Validate raw settings. Blank values count as missing.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{CredentialsError, ProviderCredentials};
    ///
    /// let creds = ProviderCredentials::new(Some("secret-us6"), Some("a1b2c3")).expect("valid");
    /// assert_eq!(creds.datacenter().as_str(), "us6");
    ///
    /// let err = ProviderCredentials::new(Some("secret"), Some("a1b2c3")).expect_err("no suffix");
    /// assert_eq!(err, CredentialsError::MissingDatacenter);
    /// ```
    pub fn new(api_key: Option<&str>, audience_id: Option<&str>) -> Result<Self, CredentialsError> {
        let api_key = non_blank(api_key).ok_or(CredentialsError::MissingApiKey)?;
        let audience_id = non_blank(audience_id).ok_or(CredentialsError::MissingAudienceId)?;
        let datacenter =
            datacenter_from_api_key(api_key).ok_or(CredentialsError::MissingDatacenter)?;

        Ok(Self {
            api_key: Zeroizing::new(api_key.to_owned()),
            audience_id: audience_id.to_owned(),
            datacenter,
        })
    }

    /// Secret used as the Basic auth password.
    pub fn api_key(&self) -> &str {
        self.api_key.as_str()
    }

    /// Target audience (list) identifier.
    pub fn audience_id(&self) -> &str {
        self.audience_id.as_str()
    }

    /// Datacenter derived from the API key.
    pub fn datacenter(&self) -> &Datacenter {
        &self.datacenter
    }
}

impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("api_key", &"<redacted>")
            .field("audience_id", &self.audience_id)
            .field("datacenter", &self.datacenter)
            .finish()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
