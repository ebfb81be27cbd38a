//! Waitlist signup request and its validation.
//!
//! Validation runs before any provider call and is pure: the same raw input
//! always produces the same [`SignupRequest`] or [`SignupValidationError`].

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::MemberHash;

/// Source recorded when the landing page does not send one.
pub const DEFAULT_SOURCE: &str = "landing-v1";

/// Validation errors returned by [`validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupValidationError {
    InvalidEmail,
    InvalidRole,
}

impl SignupValidationError {
    /// Name of the request field that failed validation.
    pub fn field(self) -> &'static str {
        match self {
            Self::InvalidEmail => "email",
            Self::InvalidRole => "role",
        }
    }
}

impl fmt::Display for SignupValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail => write!(f, "Invalid email"),
            Self::InvalidRole => write!(f, "Invalid role"),
        }
    }
}

impl std::error::Error for SignupValidationError {}

/// Who is joining the waitlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Teacher,
}

impl Role {
    /// Wire value stored in the provider's `ROLE` merge field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
        }
    }

    /// Tag attached to the member after the upsert.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::Role;
    ///
    /// assert_eq!(Role::Teacher.waitlist_tag(), "waitlist-teacher");
    /// assert_eq!(Role::default().waitlist_tag(), "waitlist-student");
    /// ```
    pub fn waitlist_tag(self) -> &'static str {
        match self {
            Self::Teacher => "waitlist-teacher",
            Self::Student => "waitlist-student",
        }
    }
}

impl FromStr for Role {
    type Err = SignupValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "student" => Ok(Self::Student),
            "teacher" => Ok(Self::Teacher),
            _ => Err(SignupValidationError::InvalidRole),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Email address with a `local@domain.tld` shape.
///
/// The original casing is kept for storage; only the member hash lower-cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupEmail(String);

impl SignupEmail {
    /// Validate and construct a [`SignupEmail`].
    pub fn new(email: impl Into<String>) -> Result<Self, SignupValidationError> {
        let email = email.into();
        if !email_regex().is_match(&email) {
            return Err(SignupValidationError::InvalidEmail);
        }
        Ok(Self(email))
    }

    /// Stable provider key for this address.
    pub fn member_hash(&self) -> MemberHash {
        MemberHash::from_email(&self.0)
    }
}

impl AsRef<str> for SignupEmail {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Role field as it arrived: left out, sent as `null`, or given a value.
///
/// Only an omitted role falls back to [`Role::Student`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RawRole {
    #[default]
    Omitted,
    Null,
    Given(String),
}

impl From<Option<String>> for RawRole {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Omitted, Self::Given)
    }
}

/// Unvalidated signup fields as received from the landing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSignup {
    pub email: Option<String>,
    pub role: RawRole,
    pub source: Option<String>,
}

/// Validated waitlist signup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupRequest {
    email: SignupEmail,
    role: Role,
    source: String,
}

impl SignupRequest {
    /// Email address as submitted.
    pub fn email(&self) -> &SignupEmail {
        &self.email
    }

    /// Role the signup declared, defaulting to [`Role::Student`].
    pub fn role(&self) -> Role {
        self.role
    }

    /// Free-form attribution string; stored downstream as-is.
    pub fn source(&self) -> &str {
        self.source.as_str()
    }
}

impl TryFrom<RawSignup> for SignupRequest {
    type Error = SignupValidationError;

    fn try_from(raw: RawSignup) -> Result<Self, Self::Error> {
        validate(raw)
    }
}

/// Validate raw signup fields.
///
/// # Examples
/// ```
/// use backend::domain::{validate, RawSignup, Role, SignupValidationError};
///
/// let request = validate(RawSignup {
///     email: Some("ada@example.com".into()),
///     ..RawSignup::default()
/// })
/// .expect("valid signup");
/// assert_eq!(request.role(), Role::Student);
/// assert_eq!(request.source(), "landing-v1");
///
/// let err = validate(RawSignup::default()).expect_err("email is required");
/// assert_eq!(err, SignupValidationError::InvalidEmail);
/// ```
pub fn validate(raw: RawSignup) -> Result<SignupRequest, SignupValidationError> {
    let RawSignup {
        email,
        role,
        source,
    } = raw;

    let email = SignupEmail::new(email.ok_or(SignupValidationError::InvalidEmail)?)?;
    let role = match role {
        RawRole::Omitted => Role::default(),
        RawRole::Null => return Err(SignupValidationError::InvalidRole),
        RawRole::Given(value) => Role::from_str(&value)?,
    };
    let source = source.unwrap_or_else(|| DEFAULT_SOURCE.to_owned());

    Ok(SignupRequest {
        email,
        role,
        source,
    })
}
