use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::Method;
use axum::http::header::CONTENT_TYPE;
use axum::routing::{get, post};
use axum_server::tls_rustls::RustlsConfig;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use crate::config::{Config, StorageKind};
use crate::database::Store;
use crate::database::memory::MemoryStore;
use crate::database::postgres::PgStore;

mod config;
mod database;
mod endpoints;
mod error;
mod identity;
mod model;
mod operations;
mod security;

/// Largest accepted request body. Student records are the biggest payload.
const BODY_LIMIT: usize = 2 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub email_domain: Arc<str>,
}

#[tokio::main]
async fn main() {
    // Configuration decides the log level, so it is read before logging starts
    let config = Config::load();
    let level = config
        .as_ref()
        .ok()
        .and_then(|c| c.level().ok())
        .unwrap_or(Level::INFO);

    // Begin logging
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Could not install the log subscriber: {e}");
        return;
    }

    let config = match config {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("{}", e);
            return;
        }
    };

    let store = match build_store(&config).await {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("{}", e);
            return;
        }
    };

    info!("Storage initialized");

    let state = AppState {
        store,
        email_domain: Arc::from(config.email_domain.as_str()),
    };

    // Allow the methods the admin panel uses, JSON bodies, and any origin
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .allow_origin(AllowOrigin::any());

    let app = router()
        .layer(cors)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .with_state(state);

    // `bind` was checked by `Config::validate`
    let addr = match config.bind_addr() {
        Ok(a) => a,
        Err(e) => {
            tracing::error!("{}", e);
            return;
        }
    };

    let served = match &config.tls {
        Some(tls) => {
            if rustls::crypto::aws_lc_rs::default_provider()
                .install_default()
                .is_err()
            {
                tracing::error!("Could not install the rustls crypto provider");
                return;
            }

            let tls_config = match RustlsConfig::from_pem_file(&tls.cert, &tls.key).await {
                Ok(c) => c,
                Err(e) => {
                    tracing::error!("Could not load the TLS certificate: {}", e);
                    return;
                }
            };

            info!("Listening on https://{}", addr);
            axum_server::bind_rustls(addr, tls_config)
                .serve(app.into_make_service())
                .await
        }
        None => {
            info!("Listening on http://{}", addr);
            axum_server::bind(addr).serve(app.into_make_service()).await
        }
    };

    if let Err(e) = served {
        tracing::error!("Server stopped: {}", e);
    }
}

fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/classes",
            get(endpoints::classes::list_classes)
                .post(endpoints::classes::create_class)
                .put(endpoints::classes::update_class)
                .patch(endpoints::classes::reorder_classes)
                .delete(endpoints::classes::delete_class),
        )
        .route(
            "/api/students",
            get(endpoints::students::list_students)
                .post(endpoints::students::create_student)
                .put(endpoints::students::update_student)
                .delete(endpoints::students::delete_student),
        )
        .route(
            "/api/parents",
            get(endpoints::parents::list_parents)
                .post(endpoints::parents::create_parent)
                .put(endpoints::parents::update_parent)
                .delete(endpoints::parents::delete_parent),
        )
        .route(
            "/api/teachers",
            get(endpoints::staff::list_teachers)
                .post(endpoints::staff::create_teacher)
                .put(endpoints::staff::update_teacher)
                .delete(endpoints::staff::delete_teacher),
        )
        .route(
            "/api/employees",
            get(endpoints::staff::list_employees)
                .post(endpoints::staff::create_employee)
                .put(endpoints::staff::update_employee)
                .delete(endpoints::staff::delete_employee),
        )
        .route("/api/summary", get(endpoints::summary))
        .route("/api/login", post(endpoints::login))
}

async fn build_store(config: &Config) -> Result<Arc<dyn Store>, String> {
    match config.storage {
        StorageKind::Postgres => {
            let Some(url) = config.database_url() else {
                return Err("Database credentials are not configured".into());
            };
            let store = PgStore::connect(&url, config.database.max_connections).await?;
            info!("Connected to Postgres at {}", config.database.host);
            Ok(Arc::new(store))
        }
        StorageKind::Memory => {
            info!("Using in-memory storage, data is lost on exit");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
