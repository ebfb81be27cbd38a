//! Content-addressed member identifier.

use std::fmt;

use md5::{Digest, Md5};

/// Provider member key: lower-case hex MD5 of the lower-cased email.
///
/// Upserts keyed by this value converge on one member per address, whatever
/// casing the signup used.
///
/// # Examples
/// ```
/// use backend::domain::MemberHash;
///
/// assert_eq!(MemberHash::from_email("A@B.com"), MemberHash::from_email("a@b.com"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberHash(String);

impl MemberHash {
    /// Hash an email address.
    pub fn from_email(email: &str) -> Self {
        let digest = Md5::digest(email.to_lowercase().as_bytes());
        Self(hex::encode(digest))
    }

    /// Hex digest used in provider URLs.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for MemberHash {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for MemberHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
