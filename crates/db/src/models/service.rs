use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use uuid::Uuid;

use super::translated::{FilterColumns, TranslatedEntity};

/// A service offered on the site.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, TS)]
pub struct Service {
    pub id: Uuid,
    pub icon: Option<String>,
    pub image: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TranslatedEntity for Service {
    const KIND: &'static str = "service";
    const PARENT_TABLE: &'static str = "services";
    const PARENT_COLUMNS: &'static str =
        "id, icon, image, display_order, is_active, is_featured, created_at, updated_at";
    const TRANSLATION_TABLE: &'static str = "service_translations";
    const PARENT_KEY: &'static str = "service_id";
    const TRANSLATION_COLUMNS: &'static str = "service_id AS parent_id, locale, title, slug, \
         short_description AS summary, content, seo_title, seo_description, seo_keywords";
    const SLUG_COLUMN: Option<&'static str> = Some("slug");
    const FILTERS: FilterColumns = FilterColumns {
        active: Some("is_active"),
        featured: Some("is_featured"),
        ..FilterColumns::NONE
    };

    fn id(&self) -> Uuid {
        self.id
    }
}
