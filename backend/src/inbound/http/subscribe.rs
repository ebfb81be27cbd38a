//! Waitlist signup handler.
//!
//! ```text
//! POST /api/subscribe {"email":"ada@example.com","role":"teacher","source":"landing-v1"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value, json};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::ports::WaitlistSubscriptionCommand;
use crate::domain::{
    Error, FailureStage, RawRole, RawSignup, SignupRequest, SignupValidationError, SubscriptionFailure,
    SubscriptionOutcome, TraceId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::with_current_trace_id;
use crate::inbound::http::state::HttpState;

const AUDIENCE_HINT: &str = "Confirm Audience ID in Mailchimp: Audience → Settings → Audience name and defaults. \
     Make sure you’re using the same account as the API key.";

/// Signup body for `POST /api/subscribe`.
///
/// Every field is optional at the wire level so that a missing email is
/// reported as a validation error rather than a decode failure. `role` keeps
/// an explicit `null` apart from an omitted field.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct SubscribeRequest {
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    /// `student` (default when omitted) or `teacher`.
    #[serde(
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, example = "teacher")]
    pub role: Option<Option<String>>,
    #[schema(example = "landing-v1")]
    pub source: Option<String>,
}

impl From<SubscribeRequest> for RawSignup {
    fn from(value: SubscribeRequest) -> Self {
        let role = match value.role {
            None => RawRole::Omitted,
            Some(None) => RawRole::Null,
            Some(Some(role)) => RawRole::Given(role),
        };
        Self {
            email: value.email,
            role,
            source: value.source,
        }
    }
}

/// Wrap whatever was sent, `null` included, so absence stays `None`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Success body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SubscribeResponse {
    #[schema(example = "You’re on the list. Please check your email to confirm! ✨")]
    pub message: String,
}

/// Join the waitlist.
///
/// Validates the signup, then confirms the audience, upserts the member and
/// applies the role tag. Provider failures report the stage that failed.
#[utoipa::path(
    post,
    path = "/api/subscribe",
    request_body = SubscribeRequest,
    responses(
        (status = 200, description = "Signup registered", body = SubscribeResponse),
        (status = 400, description = "Invalid email or role", body = Error),
        (status = 500, description = "Provider or server failure", body = Error)
    ),
    tags = ["waitlist"],
    operation_id = "subscribe"
)]
#[post("/subscribe")]
pub async fn subscribe(
    state: web::Data<HttpState>,
    payload: web::Json<SubscribeRequest>,
) -> ApiResult<HttpResponse> {
    let raw = RawSignup::from(payload.into_inner());
    let request = SignupRequest::try_from(raw).map_err(map_validation_error)?;
    let outcome = run_detached(state.subscription.clone(), request).await?;
    outcome_response(outcome)
}

/// Run the subscription on its own task so a client disconnect does not
/// cancel provider calls already in flight.
async fn run_detached(
    command: std::sync::Arc<dyn WaitlistSubscriptionCommand>,
    request: SignupRequest,
) -> ApiResult<SubscriptionOutcome> {
    let trace_id = TraceId::current();
    let handle = actix_web::rt::spawn(async move {
        let work = command.subscribe(request);
        match trace_id {
            Some(id) => TraceId::scope(id, work).await,
            None => work.await,
        }
    });
    handle.await.map_err(|join_error| {
        error!(error = %join_error, "subscription task did not complete");
        with_current_trace_id(Error::internal("subscription task failed"))
    })
}

fn outcome_response(outcome: SubscriptionOutcome) -> ApiResult<HttpResponse> {
    match outcome {
        SubscriptionOutcome::Success { message } => {
            Ok(HttpResponse::Ok().json(SubscribeResponse { message }))
        }
        SubscriptionOutcome::Failure(failure) => Err(with_current_trace_id(map_failure(&failure))),
    }
}

fn map_validation_error(err: SignupValidationError) -> Error {
    let code = match err {
        SignupValidationError::InvalidEmail => "invalid_email",
        SignupValidationError::InvalidRole => "invalid_role",
    };
    with_current_trace_id(
        Error::invalid_request(err.to_string())
            .with_details(json!({ "field": err.field(), "code": code })),
    )
}

fn map_failure(failure: &SubscriptionFailure) -> Error {
    let stage = failure.stage();
    let message = match stage {
        FailureStage::Validation => {
            return Error::invalid_request(failure.detail().unwrap_or("Invalid request"))
                .with_details(json!({ "stage": stage }));
        }
        FailureStage::Config => return Error::internal("Server misconfigured"),
        FailureStage::AudienceLookup => {
            "Mailchimp Audience not found (check MC_LIST_ID and account)"
        }
        FailureStage::Upsert => "Mailchimp upsert failed",
        FailureStage::Tag => "Mailchimp tag failed",
    };

    let mut details = Map::new();
    details.insert("stage".into(), json!(stage));
    details.insert("status".into(), json!(failure.http_status()));
    details.insert("detail".into(), json!(failure.detail()));
    if stage == FailureStage::AudienceLookup {
        details.insert("hint".into(), json!(AUDIENCE_HINT));
    }
    Error::provider(message).with_details(Value::Object(details))
}
