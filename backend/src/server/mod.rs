//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::{error, info};

use backend::Trace;
#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::domain::WaitlistSubscriptionService;
use backend::domain::ports::WaitlistSubscriptionCommand;
use backend::inbound::http::cache_control::no_store_headers;
use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::json_error_handler;
use backend::inbound::http::state::HttpState;
use backend::inbound::http::subscribe::subscribe;
use backend::outbound::mailchimp::MailchimpHttpProvider;
use backend::settings::ProviderSettings;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Build the subscription service from provider settings.
///
/// Invalid credentials are logged here and kept: each signup then fails at
/// the config stage instead of the process refusing to start.
///
/// # Errors
/// Returns [`std::io::Error`] when the base URL override is malformed or the
/// HTTP client cannot be built.
fn build_subscription_service(
    settings: &ProviderSettings,
) -> std::io::Result<Arc<dyn WaitlistSubscriptionCommand>> {
    let credentials = settings.credentials();
    match &credentials {
        Ok(creds) => info!(
            audience = creds.audience_id(),
            datacenter = %creds.datacenter(),
            "mailing list provider configured"
        ),
        Err(cause) => error!(error = %cause, "mailing list provider is misconfigured"),
    }

    let base_url = settings
        .base_url()
        .map_err(|e| std::io::Error::other(format!("invalid MC_BASE_URL: {e}")))?;
    let provider = match base_url {
        Some(url) => MailchimpHttpProvider::with_base_url(url, settings.timeout()),
        None => MailchimpHttpProvider::new(settings.timeout()),
    }
    .map_err(|e| std::io::Error::other(format!("http client construction failed: {e}")))?;

    Ok(Arc::new(WaitlistSubscriptionService::new(
        Arc::new(provider),
        credentials,
    )))
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let api = web::scope("/api")
        .wrap(no_store_headers())
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(subscribe);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct the HTTP server and mark the instance ready once bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when building the provider client or binding
/// the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        bind_addr,
        provider,
    } = config;
    let http_state = web::Data::new(HttpState::new(build_subscription_service(&provider)?));
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, "waitlist backend listening");
    health_state.mark_ready();
    Ok(server)
}
