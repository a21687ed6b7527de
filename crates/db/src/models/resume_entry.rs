use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

use super::{
    content::JsonList,
    translated::{FilterColumns, TranslatedEntity},
};

#[derive(Debug, Clone, Type, Serialize, Deserialize, PartialEq, TS, EnumString, Display, Default)]
#[sqlx(type_name = "resume_entry_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResumeEntryType {
    #[default]
    Experience,
    Education,
    Certification,
    Award,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, TS)]
pub struct ResumeEntry {
    pub id: Uuid,
    pub entry_type: ResumeEntryType,
    pub organization: Option<String>,
    pub organization_url: Option<String>,
    pub location: Option<String>,
    pub logo: Option<String>,
    pub skills: JsonList,
    pub started_on: Option<NaiveDate>,
    pub ended_on: Option<NaiveDate>,
    pub is_current: bool,
    pub display_order: i32,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TranslatedEntity for ResumeEntry {
    const KIND: &'static str = "resume_entry";
    const PARENT_TABLE: &'static str = "resume_entries";
    const PARENT_COLUMNS: &'static str = "id, entry_type, organization, organization_url, location, logo, \
         COALESCE(skills, '') AS skills, started_on, ended_on, is_current, display_order, is_published, \
         created_at, updated_at";
    const TRANSLATION_TABLE: &'static str = "resume_entry_translations";
    const PARENT_KEY: &'static str = "resume_entry_id";
    const TRANSLATION_COLUMNS: &'static str = "resume_entry_id AS parent_id, locale, title, NULL AS slug, \
         summary, content, NULL AS seo_title, NULL AS seo_description, NULL AS seo_keywords";
    // The entry type doubles as the category filter.
    const FILTERS: FilterColumns = FilterColumns {
        published: Some("is_published"),
        category: Some("entry_type"),
        ..FilterColumns::NONE
    };

    fn id(&self) -> Uuid {
        self.id
    }
}
