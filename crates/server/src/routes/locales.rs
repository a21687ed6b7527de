use axum::{
    Router,
    extract::{Query, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use serde::Deserialize;
use services::services::locale_registry::LocaleSettings;
use tracing::info;
use utils::{locale::FallbackChain, response::ApiResponse};

use crate::AppState;

/// GET /api/locales
/// Supported locales and the current default
pub async fn get_locales(State(state): State<AppState>) -> ResponseJson<ApiResponse<LocaleSettings>> {
    state.registry().ensure_loaded().await;
    let settings = state.registry().snapshot().await;
    ResponseJson(ApiResponse::success(settings.as_ref().clone()))
}

/// POST /api/locales/reload
/// Drop the cached settings and read them again, after an admin edit
pub async fn reload_locales(
    State(state): State<AppState>,
) -> ResponseJson<ApiResponse<LocaleSettings>> {
    let registry = state.registry();
    registry.invalidate().await;
    registry.ensure_loaded().await;
    let settings = registry.snapshot().await;
    info!(
        supported = ?settings.supported,
        default = %settings.default,
        "Locale settings reloaded"
    );
    ResponseJson(ApiResponse::success(settings.as_ref().clone()))
}

#[derive(Debug, Default, Deserialize)]
pub struct ChainParams {
    pub locale: Option<String>,
    pub default_locale: Option<String>,
}

/// GET /api/locales/chain
/// The fallback chain a content request with these parameters would use
pub async fn get_chain(
    State(state): State<AppState>,
    Query(params): Query<ChainParams>,
) -> ResponseJson<ApiResponse<FallbackChain>> {
    state.registry().ensure_loaded().await;
    let chain = state
        .registry()
        .resolve(params.locale.as_deref(), params.default_locale.as_deref())
        .await;
    ResponseJson(ApiResponse::success(chain))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/locales", get(get_locales))
        .route("/locales/reload", post(reload_locales))
        .route("/locales/chain", get(get_chain))
}

#[cfg(test)]
mod tests {
    use db::models::site_setting::SiteSetting;

    use super::*;
    use crate::test_support;

    #[tokio::test]
    async fn test_reload_picks_up_new_settings() {
        let state = test_support::state(r#"["en"]"#, "en").await;
        let ResponseJson(before) = get_locales(State(state.clone())).await;
        let before = before.into_data().unwrap();
        assert_eq!(before.supported.len(), 1);

        SiteSetting::upsert(&state.db().pool, SiteSetting::SUPPORTED_LOCALES, r#"["en","de"]"#)
            .await
            .unwrap();
        SiteSetting::upsert(&state.db().pool, SiteSetting::DEFAULT_LOCALE, "de")
            .await
            .unwrap();

        // Cached until reloaded.
        let ResponseJson(cached) = get_locales(State(state.clone())).await;
        assert_eq!(cached.into_data().unwrap(), before);

        let ResponseJson(reloaded) = reload_locales(State(state)).await;
        let reloaded = reloaded.into_data().unwrap();
        assert_eq!(reloaded.default.as_str(), "de");
        assert_eq!(reloaded.supported.len(), 2);
    }

    #[tokio::test]
    async fn test_chain_endpoint() {
        let state = test_support::state(r#"["en","de","fr"]"#, "en").await;
        let params = ChainParams {
            locale: Some("fr-CA".to_string()),
            default_locale: Some("de".to_string()),
        };
        let ResponseJson(response) = get_chain(State(state), Query(params)).await;
        let value = serde_json::to_value(response.into_data().unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"primary": "fr", "chain": ["fr", "de", "en"]})
        );
    }
}
