//! Read path shared by every content route: resolve one fallback chain per
//! request, then hand it to the translated repository.

use std::sync::Arc;

use db::models::translated::{
    ListQuery, MergedPage, MergedView, TranslatedEntity, TranslatedRepo, ViewMode,
};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::debug;
use utils::locale::{FallbackChain, LocaleCode};
use uuid::Uuid;

use super::locale_registry::LocaleRegistry;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("{kind} not found: {key}")]
    NotFound { kind: &'static str, key: String },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Locale preferences collected from a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleHints {
    /// Explicit `locale` parameter first, then Accept-Language tags.
    pub requested: Vec<String>,
    pub record_default: Option<String>,
}

impl LocaleHints {
    pub fn requested(locale: impl Into<String>) -> Self {
        Self {
            requested: vec![locale.into()],
            record_default: None,
        }
    }
}

#[derive(Clone)]
pub struct ContentService {
    pool: SqlitePool,
    registry: Arc<LocaleRegistry>,
}

impl ContentService {
    pub fn new(pool: SqlitePool, registry: Arc<LocaleRegistry>) -> Self {
        Self { pool, registry }
    }

    pub fn registry(&self) -> &Arc<LocaleRegistry> {
        &self.registry
    }

    /// The chain for one request.
    ///
    /// The first supported hint becomes the requested locale. When none is
    /// supported the first hint is passed on and resolution degrades to the
    /// defaults.
    pub async fn chain_for(&self, hints: &LocaleHints) -> FallbackChain {
        self.registry.ensure_loaded().await;
        let settings = self.registry.snapshot().await;

        let requested = hints
            .requested
            .iter()
            .find(|hint| {
                LocaleCode::normalize(hint).is_some_and(|code| settings.supported.contains(&code))
            })
            .or_else(|| hints.requested.first());

        FallbackChain::resolve(
            &settings.supported,
            requested.map(String::as_str),
            hints.record_default.as_deref(),
            &settings.default,
        )
    }

    pub async fn get_by_id<E: TranslatedEntity>(
        &self,
        hints: &LocaleHints,
        id: Uuid,
        view: ViewMode,
    ) -> Result<MergedView<E>, ContentError> {
        let chain = self.chain_for(hints).await;
        debug!(kind = E::KIND, %id, primary = %chain.primary(), "Fetching content by id");
        TranslatedRepo::<E>::find_by_id(&self.pool, &chain, id, view)
            .await?
            .ok_or_else(|| ContentError::NotFound {
                kind: E::KIND,
                key: id.to_string(),
            })
    }

    pub async fn get_by_slug<E: TranslatedEntity>(
        &self,
        hints: &LocaleHints,
        slug: &str,
        view: ViewMode,
    ) -> Result<MergedView<E>, ContentError> {
        let chain = self.chain_for(hints).await;
        debug!(kind = E::KIND, slug, primary = %chain.primary(), "Fetching content by slug");
        TranslatedRepo::<E>::find_by_slug(&self.pool, &chain, slug, view)
            .await?
            .ok_or_else(|| ContentError::NotFound {
                kind: E::KIND,
                key: slug.to_string(),
            })
    }

    pub async fn list<E: TranslatedEntity>(
        &self,
        hints: &LocaleHints,
        query: &ListQuery,
        view: ViewMode,
    ) -> Result<MergedPage<E>, ContentError> {
        let chain = self.chain_for(hints).await;
        debug!(kind = E::KIND, primary = %chain.primary(), "Listing content");
        Ok(TranslatedRepo::<E>::list(&self.pool, &chain, query, view).await?)
    }
}

#[cfg(test)]
mod tests {
    use db::{
        DBService,
        models::{pricing_plan::PricingPlan, project::Project, site_setting::SiteSetting},
    };

    use super::*;
    use crate::services::locale_registry::{DEFAULT_RETRY_INTERVAL, SqliteSettingsSource};

    fn code(raw: &str) -> LocaleCode {
        LocaleCode::normalize(raw).unwrap()
    }

    async fn setup(supported: &str, default: &str) -> (DBService, ContentService) {
        let db = DBService::new_in_memory().await.unwrap();
        SiteSetting::upsert(&db.pool, SiteSetting::SUPPORTED_LOCALES, supported)
            .await
            .unwrap();
        SiteSetting::upsert(&db.pool, SiteSetting::DEFAULT_LOCALE, default)
            .await
            .unwrap();
        let registry = Arc::new(LocaleRegistry::new(
            Arc::new(SqliteSettingsSource::new(db.pool.clone())),
            code("en"),
            DEFAULT_RETRY_INTERVAL,
        ));
        let service = ContentService::new(db.pool.clone(), registry);
        (db, service)
    }

    async fn insert_project(pool: &SqlitePool, translations: &[(&str, &str, &str)]) -> Uuid {
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO projects (id, is_published) VALUES ($1, 1)")
            .bind(id)
            .execute(pool)
            .await
            .unwrap();
        for (locale, title, slug) in translations {
            sqlx::query(
                "INSERT INTO project_translations (project_id, locale, title, slug) VALUES ($1, $2, $3, $4)",
            )
            .bind(id)
            .bind(*locale)
            .bind(*title)
            .bind(*slug)
            .execute(pool)
            .await
            .unwrap();
        }
        id
    }

    #[tokio::test]
    async fn test_chain_prefers_first_supported_hint() {
        let (_db, service) = setup(r#"["en","de","fr"]"#, "en").await;
        let hints = LocaleHints {
            requested: vec!["it".to_string(), "fr-CA".to_string(), "de".to_string()],
            record_default: None,
        };
        let chain = service.chain_for(&hints).await;
        assert_eq!(chain.locales(), &[code("fr"), code("en"), code("de")]);
    }

    #[tokio::test]
    async fn test_chain_without_supported_hint_uses_defaults() {
        let (_db, service) = setup(r#"["en","de"]"#, "de").await;
        let chain = service.chain_for(&LocaleHints::requested("xx")).await;
        assert_eq!(chain.primary(), &code("de"));
        let chain = service.chain_for(&LocaleHints::default()).await;
        assert_eq!(chain.locales(), &[code("de"), code("en")]);
    }

    #[tokio::test]
    async fn test_get_by_id_resolves_and_reports_missing() {
        let (db, service) = setup(r#"["en","de"]"#, "en").await;
        let id = insert_project(&db.pool, &[("en", "Shop", "shop"), ("de", "Laden", "laden")]).await;

        let view = service
            .get_by_id::<Project>(&LocaleHints::requested("de-DE"), id, ViewMode::Card)
            .await
            .unwrap();
        assert_eq!(view.title.as_deref(), Some("Laden"));
        assert_eq!(view.locale_resolved, Some(code("de")));

        let missing = service
            .get_by_id::<Project>(&LocaleHints::default(), Uuid::new_v4(), ViewMode::Card)
            .await;
        assert!(matches!(
            missing,
            Err(ContentError::NotFound { kind: "project", .. })
        ));
    }

    #[tokio::test]
    async fn test_record_default_wins_over_site_default() {
        let (db, service) = setup(r#"["en","de","fr"]"#, "en").await;
        let id = insert_project(&db.pool, &[("en", "Shop", "shop"), ("fr", "Boutique", "boutique")]).await;

        let hints = LocaleHints {
            requested: vec!["de".to_string()],
            record_default: Some("fr".to_string()),
        };
        let view = service
            .get_by_id::<Project>(&hints, id, ViewMode::Card)
            .await
            .unwrap();
        assert_eq!(view.locale_resolved, Some(code("fr")));
    }

    #[tokio::test]
    async fn test_get_by_slug_for_type_without_slugs() {
        let (db, service) = setup(r#"["en"]"#, "en").await;
        insert_project(&db.pool, &[("en", "Shop", "shop")]).await;

        let found = service
            .get_by_slug::<Project>(&LocaleHints::default(), "shop", ViewMode::Card)
            .await
            .unwrap();
        assert_eq!(found.slug.as_deref(), Some("shop"));

        let missing = service
            .get_by_slug::<PricingPlan>(&LocaleHints::default(), "shop", ViewMode::Card)
            .await;
        assert!(matches!(missing, Err(ContentError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_after_settings_change() {
        let (db, service) = setup(r#"["en"]"#, "en").await;
        insert_project(&db.pool, &[("en", "Shop", "shop"), ("de", "Laden", "laden")]).await;

        let hints = LocaleHints::requested("de");
        let page = service
            .list::<Project>(&hints, &ListQuery::default(), ViewMode::Card)
            .await
            .unwrap();
        assert_eq!(page.items[0].locale_resolved, Some(code("en")));

        SiteSetting::upsert(&db.pool, SiteSetting::SUPPORTED_LOCALES, r#"["en","de"]"#)
            .await
            .unwrap();
        service.registry().invalidate().await;
        let page = service
            .list::<Project>(&hints, &ListQuery::default(), ViewMode::Card)
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].title.as_deref(), Some("Laden"));
    }
}
