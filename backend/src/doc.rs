//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the signup endpoint, the health probes and the error
//! envelope. Swagger UI serves it in debug builds.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode, FailureStage, Role};
use crate::inbound::http::subscribe::{SubscribeRequest, SubscribeResponse};

/// OpenAPI document for the waitlist API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Waitlist backend API",
        description = "Landing-page waitlist signup backed by a Mailchimp audience."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::subscribe::subscribe,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        SubscribeRequest,
        SubscribeResponse,
        Error,
        ErrorCode,
        FailureStage,
        Role
    )),
    tags(
        (name = "waitlist", description = "Waitlist signup"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
