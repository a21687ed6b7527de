use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use uuid::Uuid;

use super::translated::{FilterColumns, TranslatedEntity};

/// A free-form page addressed by its per-locale slug.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, TS)]
pub struct CustomPage {
    pub id: Uuid,
    pub template: String,
    pub show_in_menu: bool,
    pub display_order: i32,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TranslatedEntity for CustomPage {
    const KIND: &'static str = "custom_page";
    const PARENT_TABLE: &'static str = "custom_pages";
    const PARENT_COLUMNS: &'static str =
        "id, template, show_in_menu, display_order, is_published, created_at, updated_at";
    const TRANSLATION_TABLE: &'static str = "custom_page_translations";
    const PARENT_KEY: &'static str = "page_id";
    const TRANSLATION_COLUMNS: &'static str = "page_id AS parent_id, locale, title, slug, summary, content, \
         seo_title, seo_description, seo_keywords";
    const SLUG_COLUMN: Option<&'static str> = Some("slug");
    const FILTERS: FilterColumns = FilterColumns {
        published: Some("is_published"),
        ..FilterColumns::NONE
    };

    fn id(&self) -> Uuid {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use utils::locale::{FallbackChain, LocaleCode};

    use super::*;
    use crate::{
        DBService,
        models::translated::{TranslatedRepo, ViewMode},
    };

    #[tokio::test]
    async fn test_slug_lookup_falls_back_to_default_locale() {
        let db = DBService::new_in_memory().await.unwrap();
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO custom_pages (id, is_published) VALUES ($1, 1)")
            .bind(id)
            .execute(&db.pool)
            .await
            .unwrap();
        sqlx::query(
            r#"INSERT INTO custom_page_translations (page_id, locale, title, slug, seo_description)
               VALUES ($1, 'en', 'Imprint', 'imprint', 'Legal notice')"#,
        )
        .bind(id)
        .execute(&db.pool)
        .await
        .unwrap();

        let supported = [LocaleCode::normalize("en").unwrap(), LocaleCode::normalize("fr").unwrap()];
        let chain = FallbackChain::resolve(&supported, Some("fr"), None, &supported[0]);
        let page = TranslatedRepo::<CustomPage>::find_by_slug(&db.pool, &chain, "imprint", ViewMode::Card)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(page.parent.id, id);
        assert_eq!(page.parent.template, "default");
        assert_eq!(page.locale_resolved, Some(supported[0].clone()));
        assert_eq!(page.seo_description.as_deref(), Some("Legal notice"));
    }
}
