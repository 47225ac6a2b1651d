//! # PetGlow
//!
//! Pet-care dashboard web application: pet registry, hotel status board,
//! health timeline and match swiper over a hosted data backend.

#![recursion_limit = "256"]

pub mod api;
pub mod config;
pub mod consts;
pub mod front;
pub mod logger;
pub mod metric;
pub mod models;
pub mod repo;
pub mod services;
pub mod utils;

use anyhow::Context;
use csrf::AesGcmCsrfProtection;
use log::info;
use logfire::config::MetricsOptions;
use ntex::web;
use ntex_cors::Cors;
use ntex_identity::{CookieIdentityPolicy, IdentityService};
use ntex_session::CookieSession;
use openssl::ssl::{SslAcceptor, SslFiletype, SslMethod};

/// Repository and auth service of the configured backend, cloned per worker
#[derive(Clone)]
enum DataServices {
    Supabase(
        repo::rest::SupabaseRepo,
        services::supabase_auth::SupabaseAuthHandler,
    ),
    Sqlite(
        repo::sqlite::SqlxSqliteRepo,
        services::local_auth::LocalAuthHandler,
    ),
}

impl DataServices {
    async fn connect(app_config: &config::AppConfig) -> anyhow::Result<Self> {
        match app_config.data_backend {
            config::DataBackend::Supabase => Ok(DataServices::Supabase(
                repo::rest::SupabaseRepo::new(
                    utils::REQUEST_CLIENT.clone(),
                    &app_config.supabase_url,
                    &app_config.supabase_anon_key,
                ),
                services::supabase_auth::SupabaseAuthHandler::new(
                    utils::REQUEST_CLIENT.clone(),
                    &app_config.supabase_url,
                    &app_config.supabase_anon_key,
                ),
            )),
            config::DataBackend::Sqlite => {
                let db_pool = utils::setup_sqlite_db_pool(&app_config.db_host)
                    .await
                    .context("failed to open the sqlite database")?;

                let sqlite_repo = repo::sqlite::SqlxSqliteRepo {
                    db_pool: db_pool.clone(),
                };
                sqlite_repo.run_migrations().await?;

                Ok(DataServices::Sqlite(
                    sqlite_repo,
                    services::local_auth::LocalAuthHandler { db_pool },
                ))
            }
        }
    }

    fn app_state(&self, csrf_key: [u8; 32]) -> front::AppState {
        let (repo, auth_service): (repo::ImplAppRepo, services::ImplAuthService) = match self {
            DataServices::Supabase(repo, auth) => (Box::new(repo.clone()), Box::new(auth.clone())),
            DataServices::Sqlite(repo, auth) => (Box::new(repo.clone()), Box::new(auth.clone())),
        };

        front::AppState {
            csrf_protec: AesGcmCsrfProtection::from_key(csrf_key),
            repo,
            auth_service,
        }
    }
}

#[ntex::main]
async fn main() -> anyhow::Result<()> {
    config::init_config()?;

    let app_config = config::APP_CONFIG
        .get()
        .context("failed to get app config")?;

    // Logs and metrics go to logfire when a token is set
    let shutdown_handler = if app_config.has_logfire() {
        Some(
            logfire::configure()
                .install_panic_handler()
                .with_metrics(Some(MetricsOptions::default()))
                .send_to_logfire(logfire::config::SendToLogfire::Yes)
                .with_token(&app_config.logfire_token)
                .finish()?,
        )
    } else {
        logger::setup_simple_logger()?;
        None
    };

    let data_services = DataServices::connect(app_config).await?;
    info!("data backend: {}", app_config.data_backend);

    let csrf_key = utils::build_csrf_key(&app_config.csrf_pass, &app_config.csrf_salt)?;
    let session_key = utils::build_random_key()?;
    let identity_key = utils::build_random_key()?;

    configure_and_run_server(csrf_key, session_key, identity_key, data_services).await?;

    if let Some(shutdown_handler) = shutdown_handler {
        shutdown_handler.shutdown()?;
    }

    Ok(())
}

/// Configures SSL acceptor for production environments
fn setup_ssl_acceptor(
    app_config: &config::AppConfig,
) -> anyhow::Result<openssl::ssl::SslAcceptorBuilder> {
    let mut ssl_acceptor = SslAcceptor::mozilla_intermediate(SslMethod::tls_server())
        .map_err(|e| anyhow::anyhow!("Failed to create SSL acceptor: {}", e))?;

    ssl_acceptor
        .set_private_key_file(&app_config.private_key_path, SslFiletype::PEM)
        .with_context(|| {
            format!(
                "Failed to load private key from {}",
                app_config.private_key_path
            )
        })?;

    ssl_acceptor
        .set_certificate_file(&app_config.certificate_path, SslFiletype::PEM)
        .with_context(|| {
            format!(
                "Failed to load certificate from {}",
                app_config.certificate_path
            )
        })?;

    Ok(ssl_acceptor)
}

async fn configure_and_run_server(
    csrf_key: [u8; 32],
    session_key: [u8; 32],
    identity_key: [u8; 32],
    data_services: DataServices,
) -> anyhow::Result<()> {
    let app_config = config::APP_CONFIG
        .get()
        .context("failed to get app config")?;
    let server_addr = ("0.0.0.0", app_config.web_server_port);
    let origin = format!(
        "{}://{}:{}",
        if app_config.is_prod() { "https" } else { "http" },
        app_config.web_server_host,
        app_config.web_server_port
    );

    let server = web::server(move || {
        web::App::new()
            .wrap(
                Cors::new()
                    .allowed_methods(vec!["GET", "HEAD", "POST", "OPTIONS", "DELETE"])
                    .allowed_origin(&origin)
                    .finish(),
            )
            .wrap(
                CookieSession::private(&session_key)
                    .secure(app_config.is_prod())
                    .domain(app_config.web_server_host.to_string())
                    .max_age(consts::MAX_AGE_COOKIES)
                    .name("petglow-session"),
            )
            .wrap(IdentityService::new(
                CookieIdentityPolicy::new(&identity_key)
                    .name("petglow-auth")
                    .domain(app_config.web_server_host.to_string())
                    .max_age(consts::MAX_AGE_COOKIES)
                    .secure(app_config.is_prod()),
            ))
            .wrap(web::middleware::Logger::default())
            .wrap(web::middleware::Compress::default())
            .state(data_services.app_state(csrf_key))
            .configure(front::routes::auth)
            .configure(front::routes::dashboard)
            .configure(front::routes::pets)
            .configure(front::routes::hotel)
            .configure(front::routes::health)
            .configure(front::routes::matcher)
            .service((
                ntex_files::Files::new("/static", "web/static/"),
                front::server::serve_favicon,
                front::server::index,
            ))
            .default_service(web::route().to(front::server::serve_not_found))
    });

    let bound_server = if app_config.is_prod() {
        server.bind_openssl(server_addr, setup_ssl_acceptor(app_config)?)?
    } else {
        server.bind(server_addr)?
    };

    info!("listening on port {}", app_config.web_server_port);

    bound_server
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
