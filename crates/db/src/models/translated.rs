//! Generic read path for content stored as a parent row plus one translation
//! row per locale.
//!
//! A content type implements [`TranslatedEntity`] to describe its tables and
//! how its translation columns map onto [`TranslationRow`]. [`TranslatedRepo`]
//! then loads parents together with every translation they have, walks the
//! request's [`FallbackChain`] and merges the first hit into a [`MergedView`].

use std::{
    collections::{HashMap, hash_map::Entry},
    marker::PhantomData,
};

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool, sqlite::SqliteRow};
use strum_macros::{Display, EnumString};
use tracing::debug;
use ts_rs::TS;
use utils::locale::{FallbackChain, LocaleCode};
use uuid::Uuid;

use super::content::{ContentDocument, DecodedContent};

pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 200;

/// Parent columns a content type exposes to list filters.
///
/// `None` means the type has no such column and the filter is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterColumns {
    pub published: Option<&'static str>,
    pub active: Option<&'static str>,
    pub featured: Option<&'static str>,
    pub category: Option<&'static str>,
    pub client: Option<&'static str>,
}

impl FilterColumns {
    pub const NONE: Self = Self {
        published: None,
        active: None,
        featured: None,
        category: None,
        client: None,
    };
}

/// A content type whose parent row is `Self`.
///
/// Table and column names are interpolated into SQL, so they must be
/// constants. Every parent table carries `id`, `display_order`, `created_at`
/// and `updated_at`.
pub trait TranslatedEntity:
    for<'r> FromRow<'r, SqliteRow> + Serialize + Clone + Send + Sync + Unpin + 'static
{
    /// Short name used in logs.
    const KIND: &'static str;
    const PARENT_TABLE: &'static str;
    /// Select list producing `Self`.
    const PARENT_COLUMNS: &'static str;
    const TRANSLATION_TABLE: &'static str;
    /// Foreign key column in the translation table.
    const PARENT_KEY: &'static str;
    /// Select list producing a [`TranslationRow`]; missing fields are
    /// projected as `NULL`.
    const TRANSLATION_COLUMNS: &'static str;
    /// Locale-scoped slug column, if the type is addressable by slug.
    const SLUG_COLUMN: Option<&'static str> = None;
    const FILTERS: FilterColumns = FilterColumns::NONE;

    fn id(&self) -> Uuid;
}

/// Translation columns common to every content type.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct TranslationRow {
    pub parent_id: Uuid,
    pub locale: String,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub seo_keywords: Option<String>,
}

/// Which projection of the content column to return.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ViewMode {
    /// Summary fields, content passed through as stored.
    #[default]
    Card,
    /// Content decoded into a [`ContentDocument`].
    Detail,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(untagged)]
pub enum ViewContent {
    Raw(String),
    Document(ContentDocument),
}

/// One parent merged with the translation chosen for the request.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
pub struct MergedView<P> {
    #[serde(flatten)]
    #[ts(flatten)]
    pub parent: P,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub summary: Option<String>,
    pub content: Option<ViewContent>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub seo_keywords: Option<String>,
    /// Locale that supplied the translation fields; `None` when the parent
    /// has no translation in any chain locale.
    pub locale_resolved: Option<LocaleCode>,
}

impl<P> MergedView<P> {
    fn untranslated(parent: P) -> Self {
        Self {
            parent,
            title: None,
            slug: None,
            summary: None,
            content: None,
            seo_title: None,
            seo_description: None,
            seo_keywords: None,
            locale_resolved: None,
        }
    }

    fn translated(parent: P, locale: LocaleCode, row: &TranslationRow, view: ViewMode) -> Self {
        let content = row
            .content
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| project_content(row.parent_id, raw, view));
        Self {
            parent,
            title: row.title.clone(),
            slug: row.slug.clone(),
            summary: row.summary.clone(),
            content,
            seo_title: row.seo_title.clone(),
            seo_description: row.seo_description.clone(),
            seo_keywords: row.seo_keywords.clone(),
            locale_resolved: Some(locale),
        }
    }
}

fn project_content(parent_id: Uuid, raw: &str, view: ViewMode) -> ViewContent {
    match view {
        ViewMode::Card => ViewContent::Raw(raw.to_string()),
        ViewMode::Detail => {
            let decoded = DecodedContent::decode(raw);
            if decoded.is_legacy() {
                debug!(%parent_id, "content is not a JSON object, serving it as html");
            }
            ViewContent::Document(decoded.into_document())
        }
    }
}

/// Merge `parent` with the first translation found along `chain`.
///
/// Chain order alone decides; row order in `translations` never matters.
/// When several rows normalize to the same locale, an exact tag (`de`) beats
/// a region-tagged one (`de-AT`), then the lowest tag wins.
pub fn merge<P>(
    parent: P,
    translations: &[TranslationRow],
    chain: &FallbackChain,
    view: ViewMode,
) -> MergedView<P> {
    let by_locale = index_by_locale(translations);
    let chosen = chain
        .iter()
        .find_map(|locale| by_locale.get(locale).map(|row| (locale.clone(), *row)));
    match chosen {
        Some((locale, row)) => MergedView::translated(parent, locale, row, view),
        None => MergedView::untranslated(parent),
    }
}

fn index_by_locale(rows: &[TranslationRow]) -> HashMap<LocaleCode, &TranslationRow> {
    let mut index: HashMap<LocaleCode, &TranslationRow> = HashMap::with_capacity(rows.len());
    for row in rows {
        let Some(locale) = LocaleCode::normalize(&row.locale) else {
            debug!(
                parent_id = %row.parent_id,
                locale = %row.locale,
                "Skipping translation with unparseable locale"
            );
            continue;
        };
        match index.entry(locale) {
            Entry::Occupied(mut slot) => {
                if locale_rank(row, slot.key()) < locale_rank(slot.get(), slot.key()) {
                    slot.insert(row);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(row);
            }
        }
    }
    index
}

/// Lower ranks win among rows sharing a normalized locale.
fn locale_rank<'a>(row: &'a TranslationRow, locale: &LocaleCode) -> (bool, String, &'a str) {
    let tag = row.locale.trim();
    (
        !tag.eq_ignore_ascii_case(locale.as_str()),
        tag.to_ascii_lowercase(),
        tag,
    )
}

/// Sortable parent columns. Anything else is rejected before it reaches SQL.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SortColumn {
    CreatedAt,
    UpdatedAt,
    DisplayOrder,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    fn sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Filters, paging and ordering for [`TranslatedRepo::list`].
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub published: Option<bool>,
    pub active: Option<bool>,
    pub featured: Option<bool>,
    pub category: Option<String>,
    pub client: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub sort: Option<(SortColumn, SortDirection)>,
}

impl ListQuery {
    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
pub struct MergedPage<P> {
    #[ts(inline)]
    pub items: Vec<MergedView<P>>,
    #[ts(type = "number")]
    pub total: i64,
}

/// Parent+translation merge queries for content type `E`.
pub struct TranslatedRepo<E>(PhantomData<fn() -> E>);

impl<E: TranslatedEntity> TranslatedRepo<E> {
    pub async fn find_parent(pool: &SqlitePool, id: Uuid) -> Result<Option<E>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = $1",
            E::PARENT_COLUMNS,
            E::PARENT_TABLE
        );
        sqlx::query_as::<_, E>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Every translation of the given parents, in any locale.
    pub async fn find_translations(
        pool: &SqlitePool,
        parent_ids: &[Uuid],
    ) -> Result<Vec<TranslationRow>, sqlx::Error> {
        if parent_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM {} WHERE {} IN (",
            E::TRANSLATION_COLUMNS,
            E::TRANSLATION_TABLE,
            E::PARENT_KEY
        ));
        let mut ids = builder.separated(", ");
        for id in parent_ids {
            ids.push_bind(*id);
        }
        ids.push_unseparated(") ORDER BY locale ASC");
        builder
            .build_query_as::<TranslationRow>()
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &SqlitePool,
        chain: &FallbackChain,
        id: Uuid,
        view: ViewMode,
    ) -> Result<Option<MergedView<E>>, sqlx::Error> {
        let Some(parent) = Self::find_parent(pool, id).await? else {
            return Ok(None);
        };
        let translations = Self::find_translations(pool, &[id]).await?;
        let merged = merge(parent, &translations, chain, view);
        debug!(
            kind = E::KIND,
            %id,
            requested = %chain.primary(),
            resolved = ?merged.locale_resolved,
            "Merged translated entity"
        );
        Ok(Some(merged))
    }

    /// Look up by slug, trying the chain's locales in order.
    ///
    /// The same slug may belong to different parents in different locales;
    /// the earliest chain locale that carries it wins.
    pub async fn find_by_slug(
        pool: &SqlitePool,
        chain: &FallbackChain,
        slug: &str,
        view: ViewMode,
    ) -> Result<Option<MergedView<E>>, sqlx::Error> {
        let Some(slug_column) = E::SLUG_COLUMN else {
            return Ok(None);
        };
        let sql = format!(
            "SELECT {key} AS parent_id, locale FROM {table} WHERE {slug_column} = $1",
            key = E::PARENT_KEY,
            table = E::TRANSLATION_TABLE,
        );
        let matches: Vec<(Uuid, String)> = sqlx::query_as(&sql).bind(slug).fetch_all(pool).await?;

        let parent_id = chain.iter().find_map(|wanted| {
            matches.iter().find_map(|(parent_id, locale)| {
                (LocaleCode::normalize(locale).as_ref() == Some(wanted)).then_some(*parent_id)
            })
        });
        match parent_id {
            Some(id) => Self::find_by_id(pool, chain, id, view).await,
            None => Ok(None),
        }
    }

    /// One page of merged views plus the total number of matching parents.
    ///
    /// The chain is resolved once by the caller and shared by every row.
    pub async fn list(
        pool: &SqlitePool,
        chain: &FallbackChain,
        query: &ListQuery,
        view: ViewMode,
    ) -> Result<MergedPage<E>, sqlx::Error> {
        let mut page = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM {}",
            E::PARENT_COLUMNS,
            E::PARENT_TABLE
        ));
        push_filters::<E>(&mut page, query);
        push_order(&mut page, query.sort);
        page.push(" LIMIT ")
            .push_bind(query.limit())
            .push(" OFFSET ")
            .push_bind(query.offset());

        let mut count = QueryBuilder::<Sqlite>::new(format!("SELECT COUNT(*) FROM {}", E::PARENT_TABLE));
        push_filters::<E>(&mut count, query);

        let (parents, total) = tokio::try_join!(
            page.build_query_as::<E>().fetch_all(pool),
            count.build_query_scalar::<i64>().fetch_one(pool),
        )?;

        let ids: Vec<Uuid> = parents.iter().map(|parent| parent.id()).collect();
        let mut grouped: HashMap<Uuid, Vec<TranslationRow>> = HashMap::with_capacity(ids.len());
        for row in Self::find_translations(pool, &ids).await? {
            grouped.entry(row.parent_id).or_default().push(row);
        }

        let items = parents
            .into_iter()
            .map(|parent| {
                let translations = grouped.get(&parent.id()).map(Vec::as_slice).unwrap_or(&[]);
                merge(parent, translations, chain, view)
            })
            .collect::<Vec<_>>();

        debug!(
            kind = E::KIND,
            requested = %chain.primary(),
            returned = items.len(),
            total,
            "Listed translated entities"
        );
        Ok(MergedPage { items, total })
    }
}

fn push_filters<E: TranslatedEntity>(builder: &mut QueryBuilder<'_, Sqlite>, query: &ListQuery) {
    let columns = E::FILTERS;
    builder.push(" WHERE 1 = 1");

    let flags = [
        ("published", columns.published, query.published),
        ("active", columns.active, query.active),
        ("featured", columns.featured, query.featured),
    ];
    for (name, column, value) in flags {
        match (column, value) {
            (Some(column), Some(value)) => {
                builder.push(" AND ").push(column).push(" = ").push_bind(value);
            }
            (None, Some(_)) => debug!(kind = E::KIND, filter = name, "Ignoring unsupported filter"),
            _ => {}
        }
    }

    let texts = [
        ("category", columns.category, &query.category),
        ("client", columns.client, &query.client),
    ];
    for (name, column, value) in texts {
        match (column, value) {
            (Some(column), Some(value)) => {
                builder
                    .push(" AND ")
                    .push(column)
                    .push(" = ")
                    .push_bind(value.clone());
            }
            (None, Some(_)) => debug!(kind = E::KIND, filter = name, "Ignoring unsupported filter"),
            _ => {}
        }
    }
}

fn push_order(builder: &mut QueryBuilder<'_, Sqlite>, sort: Option<(SortColumn, SortDirection)>) {
    match sort {
        Some((column, direction)) => {
            builder
                .push(" ORDER BY ")
                .push(column.to_string())
                .push(" ")
                .push(direction.sql())
                .push(", id ASC");
        }
        None => {
            builder.push(" ORDER BY display_order ASC, created_at DESC, id ASC");
        }
    }
}
