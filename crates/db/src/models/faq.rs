use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use uuid::Uuid;

use super::translated::{FilterColumns, TranslatedEntity};

/// A frequently asked question. The question is the title, the answer the
/// content.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, TS)]
pub struct Faq {
    pub id: Uuid,
    pub category: Option<String>,
    pub display_order: i32,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TranslatedEntity for Faq {
    const KIND: &'static str = "faq";
    const PARENT_TABLE: &'static str = "faqs";
    const PARENT_COLUMNS: &'static str =
        "id, category, display_order, is_published, created_at, updated_at";
    const TRANSLATION_TABLE: &'static str = "faq_translations";
    const PARENT_KEY: &'static str = "faq_id";
    const TRANSLATION_COLUMNS: &'static str = "faq_id AS parent_id, locale, question AS title, NULL AS slug, \
         NULL AS summary, answer AS content, NULL AS seo_title, NULL AS seo_description, NULL AS seo_keywords";
    const FILTERS: FilterColumns = FilterColumns {
        published: Some("is_published"),
        category: Some("category"),
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
        models::{
            content::ContentDocument,
            translated::{ListQuery, TranslatedRepo, ViewContent, ViewMode},
        },
    };

    #[tokio::test]
    async fn test_faq_answers_by_category() {
        let db = DBService::new_in_memory().await.unwrap();
        let billing = Uuid::new_v4();
        let other = Uuid::new_v4();
        for (id, category, order) in [(billing, "billing", 1), (other, "general", 0)] {
            sqlx::query(
                "INSERT INTO faqs (id, category, display_order, is_published) VALUES ($1, $2, $3, 1)",
            )
            .bind(id)
            .bind(category)
            .bind(order)
            .execute(&db.pool)
            .await
            .unwrap();
        }
        sqlx::query(
            r#"INSERT INTO faq_translations (faq_id, locale, question, answer)
               VALUES ($1, 'en', 'Do you invoice?', '<p>Yes, monthly.</p>')"#,
        )
        .bind(billing)
        .execute(&db.pool)
        .await
        .unwrap();

        let en = LocaleCode::normalize("en").unwrap();
        let query = ListQuery {
            published: Some(true),
            category: Some("billing".to_string()),
            ..ListQuery::default()
        };
        let page = TranslatedRepo::<Faq>::list(&db.pool, &FallbackChain::single(en), &query, ViewMode::Detail)
            .await
            .unwrap();

        assert_eq!(page.total, 1);
        let item = &page.items[0];
        assert_eq!(item.title.as_deref(), Some("Do you invoice?"));
        assert_eq!(
            item.content,
            Some(ViewContent::Document(ContentDocument::from_html("<p>Yes, monthly.</p>")))
        );
    }
}
