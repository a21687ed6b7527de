use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

use super::translated::{FilterColumns, TranslatedEntity};

#[derive(Debug, Clone, Type, Serialize, Deserialize, PartialEq, TS, EnumString, Display, Default)]
#[sqlx(type_name = "billing_period", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BillingPeriod {
    #[default]
    Monthly,
    Yearly,
    OneTime,
}

/// A pricing plan. Name, description and the feature list are translated.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, TS)]
pub struct PricingPlan {
    pub id: Uuid,
    pub price_cents: i64,
    pub currency: String,
    pub billing_period: BillingPeriod,
    pub display_order: i32,
    pub is_active: bool,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TranslatedEntity for PricingPlan {
    const KIND: &'static str = "pricing_plan";
    const PARENT_TABLE: &'static str = "pricing_plans";
    const PARENT_COLUMNS: &'static str = "id, price_cents, currency, billing_period, display_order, \
         is_active, is_featured, created_at, updated_at";
    const TRANSLATION_TABLE: &'static str = "pricing_plan_translations";
    const PARENT_KEY: &'static str = "plan_id";
    const TRANSLATION_COLUMNS: &'static str = "plan_id AS parent_id, locale, name AS title, NULL AS slug, \
         description AS summary, content, NULL AS seo_title, NULL AS seo_description, NULL AS seo_keywords";
    const FILTERS: FilterColumns = FilterColumns {
        active: Some("is_active"),
        featured: Some("is_featured"),
        ..FilterColumns::NONE
    };

    fn id(&self) -> Uuid {
        self.id
    }
}
