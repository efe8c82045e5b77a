use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::contact::{self, Suggestion};
use crate::directory::{ListView, MapView, ViewState};
use crate::export::{self, ItemList};
use crate::hours_label::{self, CondensedLabel};
use crate::i18n::Language;
use crate::location::Resolved;
use crate::schedule::{self, Schedule};

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

pub struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

fn parse_lang(lang: Option<&str>, fallback: Language) -> Result<Language, ApiError> {
    match lang {
        None => Ok(fallback),
        Some(s) => s.parse().map_err(|_| {
            api_error(StatusCode::BAD_REQUEST, format!("Unknown language '{}'. Use 'he' or 'en'.", s))
        }),
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

// ─── GET /api/venues ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VenuesQuery {
    pub q: Option<String>,
    #[serde(default)]
    pub open: bool,
    pub lang: Option<String>,
    #[serde(default)]
    pub expanded: bool,
}

pub async fn venues(
    State(state): State<Arc<AppState>>,
    Query(params): Query<VenuesQuery>,
) -> Result<Json<ListView>, ApiError> {
    let start = Instant::now();
    let view_state = ViewState {
        language: parse_lang(params.lang.as_deref(), state.config.language)?,
        search: params.q.unwrap_or_default(),
        open_only: params.open,
        expanded: params.expanded,
    };

    let mut view = state.directory().list_view(&view_state, &state.board());
    if state.load_failed() {
        view.message = Some(view_state.language.messages().load_error);
    }

    info!(
        q = %view_state.search,
        open = view_state.open_only,
        total = view.total,
        ms = elapsed_ms(start),
        "GET /api/venues"
    );
    Ok(Json(view))
}

// ─── GET /api/map ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LangQuery {
    pub lang: Option<String>,
}

pub async fn map(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LangQuery>,
) -> Result<Json<MapView>, ApiError> {
    let start = Instant::now();
    let lang = parse_lang(params.lang.as_deref(), state.config.language)?;

    let view = {
        let directory = state.directory();
        let mut resolver = state.resolver();
        directory.map_view(lang, &mut *resolver)
    };

    info!(markers = view.markers.len(), ms = elapsed_ms(start), "GET /api/map");
    Ok(Json(view))
}

// ─── GET /api/resolve ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ResolveQuery {
    pub address: Option<String>,
}

#[derive(Serialize)]
pub struct ResolveResponse {
    pub address: String,
    #[serde(flatten)]
    pub resolved: Resolved,
}

pub async fn resolve(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResolveQuery>,
) -> Result<Json<ResolveResponse>, ApiError> {
    let address = params.address.as_deref().unwrap_or("").trim();
    if address.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Missing 'address' parameter"));
    }

    let resolved = state.resolver().resolve(address);
    info!(address, source = %resolved.source, "GET /api/resolve");

    Ok(Json(ResolveResponse {
        address: address.to_string(),
        resolved,
    }))
}

// ─── GET /api/hours ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct HoursQuery {
    pub text: Option<String>,
    pub lang: Option<String>,
    /// Local time `YYYY-MM-DDTHH:MM`; defaults to now in Israel.
    pub at: Option<String>,
}

#[derive(Serialize)]
pub struct HoursResponse {
    pub schedule: Option<Schedule>,
    pub condensed: Option<CondensedLabel>,
    pub today: String,
    pub tooltip: String,
    pub open_now: Option<bool>,
    pub at: NaiveDateTime,
}

pub async fn hours(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HoursQuery>,
) -> Result<Json<HoursResponse>, ApiError> {
    let lang = parse_lang(params.lang.as_deref(), state.config.language)?;
    let text = params.text.unwrap_or_default();
    let at = match params.at.as_deref() {
        Some(s) => schedule::parse_local_time(s)
            .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, format!("Invalid time '{}'", s)))?,
        None => schedule::local_now(),
    };

    let parsed = schedule::parse_schedule(&text);
    let raw = Some(text.as_str()).filter(|t| !t.trim().is_empty());

    Ok(Json(HoursResponse {
        condensed: parsed.as_ref().map(|s| hours_label::condensed_weekly(s, lang)),
        today: hours_label::day_label(parsed.as_ref(), raw, at.weekday(), lang),
        tooltip: hours_label::full_week(parsed.as_ref(), raw, lang),
        open_now: schedule::is_open_at(parsed.as_ref(), at),
        schedule: parsed,
        at,
    }))
}

// ─── GET /api/structured-data, /api/meta ─────────────────────────

pub async fn structured_data(State(state): State<Arc<AppState>>) -> Result<Json<ItemList>, ApiError> {
    let list = {
        let directory = state.directory();
        let mut resolver = state.resolver();
        export::structured_data(directory.venues(), &mut *resolver)
    };
    list.map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "No venues loaded"))
}

#[derive(Serialize)]
pub struct MetaResponse {
    pub title: &'static str,
    pub description: String,
}

pub async fn meta(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LangQuery>,
) -> Result<Json<MetaResponse>, ApiError> {
    let lang = parse_lang(params.lang.as_deref(), state.config.language)?;
    Ok(Json(MetaResponse {
        title: lang.messages().title,
        description: export::meta_description(state.directory().venues(), lang),
    }))
}

// ─── POST /api/suggest, /api/subscribe ───────────────────────────

#[derive(Serialize)]
pub struct MessageResponse {
    pub ok: bool,
    pub message: &'static str,
}

pub async fn suggest(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LangQuery>,
    Json(suggestion): Json<Suggestion>,
) -> Result<Response, ApiError> {
    let lang = parse_lang(params.lang.as_deref(), state.config.language)?;
    let mailer = Arc::clone(&state.mailer);

    let result = tokio::task::spawn_blocking(move || contact::send_suggestion(mailer.as_ref(), &suggestion))
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(match result {
        Ok(()) => Json(MessageResponse { ok: true, message: lang.messages().suggestion_sent }).into_response(),
        Err(e) => {
            warn!(error = %e, "POST /api/suggest failed");
            let status = match e {
                contact::SuggestError::MissingFields => StatusCode::BAD_REQUEST,
                contact::SuggestError::Mail(_) => StatusCode::BAD_GATEWAY,
            };
            (status, Json(MessageResponse { ok: false, message: e.user_message(lang) })).into_response()
        }
    })
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct SubscribeRequest {
    pub name: String,
    pub email: String,
}

pub async fn subscribe(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LangQuery>,
    Json(request): Json<SubscribeRequest>,
) -> Result<Response, ApiError> {
    let lang = parse_lang(params.lang.as_deref(), state.config.language)?;
    let shared = Arc::clone(&state);

    let result = tokio::task::spawn_blocking(move || {
        let mut store = shared.subscribers();
        contact::subscribe(&mut store, shared.mailer.as_ref(), &request.name, &request.email)
    })
    .await
    .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(match result {
        Ok(outcome) => {
            info!(?outcome, "POST /api/subscribe");
            Json(MessageResponse { ok: true, message: outcome.user_message(lang) }).into_response()
        }
        Err(e) => {
            warn!(error = %e, "POST /api/subscribe failed");
            let status = match e {
                contact::SubscribeError::MissingFields => StatusCode::BAD_REQUEST,
                _ => StatusCode::BAD_GATEWAY,
            };
            (status, Json(MessageResponse { ok: false, message: e.user_message(lang) })).into_response()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::contact::{MailDispatcher, MailError, MailParams, SubscriberStore};
    use crate::directory::Directory;
    use crate::location::{AddressResolver, ResolutionSource};
    use crate::venue::Venue;
    use tempfile::TempDir;

    struct NullMailer;

    impl MailDispatcher for NullMailer {
        fn send(&self, _: &MailParams) -> Result<(), MailError> {
            Ok(())
        }
    }

    fn test_state(directory: Option<Directory>) -> (Arc<AppState>, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = SubscriberStore::load_from(dir.path().join("subscribers.json"));
        let state = AppState::new(
            Config::default(),
            directory,
            AddressResolver::seeded(3),
            store,
            Arc::new(NullMailer),
        );
        (Arc::new(state), dir)
    }

    fn sample() -> Directory {
        Directory::new(vec![
            Venue::new("Cafe A", "דיזינגוף 50, תל אביב", "מרכז").with_hours("10:00-22:00"),
            Venue::new("Salad B", "נתנזון 22, חיפה", "צפון"),
        ])
    }

    #[tokio::test]
    async fn test_venues_search() {
        let (state, _dir) = test_state(Some(sample()));
        let query = VenuesQuery { q: Some("salad".into()), open: false, lang: Some("en".into()), expanded: false };
        let Json(view) = venues(State(state), Query(query)).await.ok().unwrap();
        assert_eq!(view.total, 1);
        assert_eq!(view.regions[0].name, "צפון");
        assert_eq!(view.regions[0].cities[0].name, "Haifa");
    }

    #[tokio::test]
    async fn test_failed_load_reports_message() {
        let (state, _dir) = test_state(None);
        let query = VenuesQuery { q: None, open: false, lang: Some("he".into()), expanded: false };
        let Json(view) = venues(State(state), Query(query)).await.ok().unwrap();
        assert_eq!(view.total, 0);
        assert_eq!(view.message, Some(Language::He.messages().load_error));
    }

    #[tokio::test]
    async fn test_bad_language_is_rejected() {
        let (state, _dir) = test_state(Some(sample()));
        let result = map(State(state), Query(LangQuery { lang: Some("fr".into()) })).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_resolve_endpoint() {
        let (state, _dir) = test_state(Some(sample()));
        let Json(resp) = resolve(State(state.clone()), Query(ResolveQuery { address: Some("הרצל 173, רחובות".into()) }))
            .await
            .ok()
            .unwrap();
        assert_eq!(resp.resolved.source, ResolutionSource::KnownAddress);

        let missing = resolve(State(state), Query(ResolveQuery { address: Some("  ".into()) })).await;
        assert!(missing.is_err());
    }

    #[tokio::test]
    async fn test_hours_endpoint() {
        let (state, _dir) = test_state(None);
        let query = HoursQuery {
            text: Some("Sun-Thu 09:00-17:00; Fri 09:00-13:00".into()),
            lang: Some("en".into()),
            at: Some("2026-10-16T12:00".into()),
        };
        let Json(resp) = hours(State(state), Query(query)).await.ok().unwrap();
        assert_eq!(resp.open_now, Some(true));
        assert_eq!(resp.today, "Fri 09:00-13:00");
        assert_eq!(resp.condensed.unwrap().groups.len(), 3);
    }

    #[tokio::test]
    async fn test_structured_data_requires_venues() {
        let (empty, _dir) = test_state(None);
        assert!(structured_data(State(empty)).await.is_err());

        let (state, _dir2) = test_state(Some(sample()));
        let Json(list) = structured_data(State(state)).await.ok().unwrap();
        assert_eq!(list.number_of_items, 2);
    }

    #[tokio::test]
    async fn test_subscribe_endpoint() {
        let (state, _dir) = test_state(None);
        let request = SubscribeRequest { name: "Dana".into(), email: "dana@example.com".into() };
        let response = subscribe(State(state.clone()), Query(LangQuery { lang: Some("en".into()) }), Json(request))
            .await
            .ok()
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(state.subscribers().contains("dana@example.com"));
    }

    async fn message_of(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_suggest_with_missing_address_is_bad_request() {
        let (state, _dir) = test_state(None);
        let suggestion: Suggestion = serde_json::from_str(r#"{"name":"x"}"#).unwrap();
        let response = suggest(State(state), Query(LangQuery { lang: Some("en".into()) }), Json(suggestion))
            .await
            .ok()
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = message_of(response).await;
        assert_eq!(body["ok"], false);
        assert_eq!(body["message"], Language::En.messages().missing_fields);
    }

    #[tokio::test]
    async fn test_subscribe_with_missing_email_is_bad_request() {
        let (state, _dir) = test_state(None);
        let request: SubscribeRequest = serde_json::from_str(r#"{"name":"x"}"#).unwrap();
        let response = subscribe(State(state.clone()), Query(LangQuery { lang: Some("he".into()) }), Json(request))
            .await
            .ok()
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(message_of(response).await["message"], Language::He.messages().missing_fields);
        assert!(state.subscribers().is_empty());
    }
}
