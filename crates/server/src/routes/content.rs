//! Read routes shared by every translated content type.
//!
//! Each type gets `GET /{type}`, `GET /{type}/{id}` and
//! `GET /{type}/slug/{slug}`, all backed by the same generic handlers.

use axum::{
    Router,
    extract::{Path, Query, State},
    http::{HeaderMap, header::ACCEPT_LANGUAGE},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::{
    custom_page::CustomPage,
    faq::Faq,
    pricing_plan::PricingPlan,
    project::Project,
    resume_entry::ResumeEntry,
    service::Service,
    translated::{
        ListQuery, MergedPage, MergedView, SortColumn, SortDirection, TranslatedEntity, ViewMode,
    },
};
use serde::Deserialize;
use services::services::content::LocaleHints;
use tracing::debug;
use utils::{locale::parse_accept_language, response::ApiResponse};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Query parameters accepted by the content routes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentParams {
    pub locale: Option<String>,
    /// Default locale of the record being requested, if the caller knows it.
    pub default_locale: Option<String>,
    pub view: Option<String>,
    pub published: Option<bool>,
    pub active: Option<bool>,
    pub featured: Option<bool>,
    pub category: Option<String>,
    pub client: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

impl ContentParams {
    fn view(&self) -> Result<ViewMode, ApiError> {
        match self.view.as_deref() {
            None | Some("") => Ok(ViewMode::default()),
            Some(raw) => raw
                .parse()
                .map_err(|_| ApiError::BadRequest(format!("unknown view {raw:?}"))),
        }
    }

    /// `locale` first, then Accept-Language tags by weight.
    fn hints(&self, headers: &HeaderMap) -> LocaleHints {
        let mut requested: Vec<String> = self.locale.iter().cloned().collect();
        if let Some(header) = headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
        {
            requested.extend(parse_accept_language(header));
        }
        LocaleHints {
            requested,
            record_default: self.default_locale.clone(),
        }
    }

    /// Sort values outside the allow-list fall back to the default order.
    fn list_query(&self) -> ListQuery {
        let sort = self.sort.as_deref().and_then(|raw| match raw.parse::<SortColumn>() {
            Ok(column) => Some(column),
            Err(_) => {
                debug!(sort = raw, "Ignoring unknown sort column");
                None
            }
        });
        let direction = self
            .order
            .as_deref()
            .and_then(|raw| raw.parse::<SortDirection>().ok())
            .unwrap_or_default();

        ListQuery {
            published: self.published,
            active: self.active,
            featured: self.featured,
            category: self.category.clone(),
            client: self.client.clone(),
            limit: self.limit,
            offset: self.offset,
            sort: sort.map(|column| (column, direction)),
        }
    }
}

pub async fn list_content<E: TranslatedEntity>(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ContentParams>,
) -> Result<ResponseJson<ApiResponse<MergedPage<E>>>, ApiError> {
    let view = params.view()?;
    let page = state
        .content()
        .list::<E>(&params.hints(&headers), &params.list_query(), view)
        .await?;
    Ok(ResponseJson(ApiResponse::success(page)))
}

pub async fn get_content<E: TranslatedEntity>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Query(params): Query<ContentParams>,
) -> Result<ResponseJson<ApiResponse<MergedView<E>>>, ApiError> {
    let view = params.view()?;
    let item = state
        .content()
        .get_by_id::<E>(&params.hints(&headers), id, view)
        .await?;
    Ok(ResponseJson(ApiResponse::success(item)))
}

pub async fn get_content_by_slug<E: TranslatedEntity>(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
    Query(params): Query<ContentParams>,
) -> Result<ResponseJson<ApiResponse<MergedView<E>>>, ApiError> {
    let view = params.view()?;
    let item = state
        .content()
        .get_by_slug::<E>(&params.hints(&headers), &slug, view)
        .await?;
    Ok(ResponseJson(ApiResponse::success(item)))
}

fn content_routes<E: TranslatedEntity>(router: Router<AppState>, path: &str) -> Router<AppState> {
    router
        .route(&format!("/{path}"), get(list_content::<E>))
        .route(&format!("/{path}/{{id}}"), get(get_content::<E>))
        .route(&format!("/{path}/slug/{{slug}}"), get(get_content_by_slug::<E>))
}

pub fn router() -> Router<AppState> {
    let router = Router::new();
    let router = content_routes::<Project>(router, "projects");
    let router = content_routes::<Service>(router, "services");
    let router = content_routes::<PricingPlan>(router, "pricing-plans");
    let router = content_routes::<Faq>(router, "faqs");
    let router = content_routes::<ResumeEntry>(router, "resume");
    content_routes::<CustomPage>(router, "pages")
}
