mod handlers;
mod state;

pub use state::AppState;

use axum::routing::{get, post};
use axum::Router;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::contact::{EmailJs, SubscriberStore};
use crate::directory::Directory;
use crate::location::{AddressResolver, OverrideTable};

/// How often open/closed status is re-evaluated.
pub const STATUS_REFRESH: Duration = Duration::from_secs(60);

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/venues", get(handlers::venues))
        .route("/api/map", get(handlers::map))
        .route("/api/resolve", get(handlers::resolve))
        .route("/api/hours", get(handlers::hours))
        .route("/api/structured-data", get(handlers::structured_data))
        .route("/api/meta", get(handlers::meta))
        .route("/api/suggest", post(handlers::suggest))
        .route("/api/subscribe", post(handlers::subscribe))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Load venues, start the background tasks and serve until the listener fails.
///
/// A failed venue load is not fatal: the server runs with an empty list and
/// reports the localized load error on `/api/venues`.
pub async fn start(config: Config) -> io::Result<()> {
    let data = config.data.clone();
    let lang = config.language;
    let directory = tokio::task::spawn_blocking(move || Directory::load(&data, lang))
        .await
        .map_err(io::Error::other)?;
    let directory = match directory {
        Ok(d) => Some(d),
        Err(e) => {
            warn!(error = %e, "starting without venues");
            None
        }
    };

    let subscribers = SubscriberStore::load_from(config.subscribers_path());
    info!(path = %subscribers.path().display(), count = subscribers.len(), "subscriber store");
    let mailer = Arc::new(EmailJs::new(config.emailjs.clone()));
    let state = Arc::new(AppState::new(
        config.clone(),
        directory,
        AddressResolver::new(),
        subscribers,
        mailer,
    ));

    spawn_override_loader(Arc::clone(&state));
    spawn_status_refresh(Arc::clone(&state));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, venues = state.directory().len(), "vegan-places server listening");

    axum::serve(listener, build_router(state)).await
}

/// Overrides arrive whenever they arrive; views built before then keep
/// their heuristic coordinates.
fn spawn_override_loader(state: Arc<AppState>) {
    let source = state.config.overrides.clone();
    tokio::spawn(async move {
        match tokio::task::spawn_blocking(move || OverrideTable::load(&source)).await {
            Ok(Some(table)) => state.merge_overrides(table),
            Ok(None) => debug!("continuing without address overrides"),
            Err(e) => debug!(error = %e, "override loader task failed"),
        }
    });
}

fn spawn_status_refresh(state: Arc<AppState>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(STATUS_REFRESH);
        loop {
            interval.tick().await;
            state.refresh_status();
        }
    });
}
