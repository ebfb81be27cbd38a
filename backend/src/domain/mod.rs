//! Waitlist domain.
//!
//! Validation, credential parsing and the subscription state machine live
//! here. Adapters reach the outside world through [`ports`].

pub mod credentials;
pub mod error;
pub mod member_hash;
pub mod ports;
pub mod signup;
pub mod subscription;
pub mod subscription_service;
pub mod trace_id;

pub use self::credentials::{
    CredentialsError, Datacenter, ProviderCredentials, datacenter_from_api_key,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::member_hash::MemberHash;
pub use self::signup::{
    DEFAULT_SOURCE, RawRole, RawSignup, Role, SignupEmail, SignupRequest, SignupValidationError,
    validate,
};
pub use self::subscription::{
    DETAIL_CHAR_LIMIT, FailureStage, SUCCESS_MESSAGE, SubscriptionFailure, SubscriptionOutcome,
    safe_detail,
};
pub use self::subscription_service::{WaitlistSubscriptionService, subscribe_with};
pub use self::trace_id::TraceId;
