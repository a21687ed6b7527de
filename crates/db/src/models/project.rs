use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use uuid::Uuid;

use super::{
    content::JsonList,
    translated::{FilterColumns, TranslatedEntity},
};

/// Locale-independent part of a portfolio project.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, TS)]
pub struct Project {
    pub id: Uuid,
    pub display_order: i32,
    pub is_published: bool,
    pub is_featured: bool,
    pub category: Option<String>,
    pub client: Option<String>,
    pub cover_image: Option<String>,
    pub gallery: JsonList,
    pub technologies: JsonList,
    pub project_url: Option<String>,
    pub repository_url: Option<String>,
    pub completed_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TranslatedEntity for Project {
    const KIND: &'static str = "project";
    const PARENT_TABLE: &'static str = "projects";
    const PARENT_COLUMNS: &'static str = "id, display_order, is_published, is_featured, category, client, cover_image, \
         COALESCE(gallery, '') AS gallery, COALESCE(technologies, '') AS technologies, \
         project_url, repository_url, completed_on, created_at, updated_at";
    const TRANSLATION_TABLE: &'static str = "project_translations";
    const PARENT_KEY: &'static str = "project_id";
    const TRANSLATION_COLUMNS: &'static str = "project_id AS parent_id, locale, title, slug, summary, content, \
         seo_title, seo_description, seo_keywords";
    const SLUG_COLUMN: Option<&'static str> = Some("slug");
    const FILTERS: FilterColumns = FilterColumns {
        published: Some("is_published"),
        featured: Some("is_featured"),
        category: Some("category"),
        client: Some("client"),
        ..FilterColumns::NONE
    };

    fn id(&self) -> Uuid {
        self.id
    }
}
