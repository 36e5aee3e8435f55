//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::{info, warn};

use member_directory::Trace;
#[cfg(debug_assertions)]
use member_directory::doc::ApiDoc;
use member_directory::domain::MemberService;
use member_directory::domain::ports::{InMemoryMemberRepository, MemberDirectory};
use member_directory::inbound::http::health::{HealthState, live, ready, root};
use member_directory::inbound::http::members;
use member_directory::inbound::http::state::HttpState;
use member_directory::outbound::persistence::DieselMemberRepository;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Build the member directory service for the configured store.
///
/// A configured pool selects the Diesel adapter; otherwise members live in a
/// process-local store that is lost on restart.
fn build_member_directory(config: &ServerConfig) -> Arc<dyn MemberDirectory> {
    match &config.db_pool {
        Some(pool) => {
            info!("members persisted in PostgreSQL");
            Arc::new(MemberService::new(Arc::new(DieselMemberRepository::new(
                pool.clone(),
            ))))
        }
        None => {
            warn!("no database configured; members are kept in memory");
            Arc::new(MemberService::new(Arc::new(InMemoryMemberRepository::new())))
        }
    }
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

    let api = web::scope("/api/v1").configure(members::configure);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(root)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// The returned [`Server`] must be awaited to drive the listener. Readiness is
/// flagged once the socket is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(HttpState::new(build_member_directory(&config)));
    let bind_addr = config.bind_addr();

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, "member directory listening");
    health_state.mark_ready();
    Ok(server)
}
