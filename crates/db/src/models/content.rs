//! Lenient decoding for JSON text columns.
//!
//! Stored rows predate strict validation, so nothing in here fails: content
//! that is not a JSON object is kept as legacy html, list columns that are
//! not JSON arrays are split on commas.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::{
    Decode, Sqlite, Type,
    error::BoxDynError,
    sqlite::{SqliteTypeInfo, SqliteValueRef},
};
use ts_rs::TS;

/// Structured body of a translation's `content` column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
pub struct ContentDocument {
    pub html: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub key_features: Vec<String>,
    #[serde(default)]
    pub technologies_used: Vec<String>,
    #[serde(default)]
    pub design_highlights: Vec<String>,
    /// Keys this type does not model, kept so they survive a round trip.
    #[serde(flatten)]
    #[ts(skip)]
    pub extra: Map<String, Value>,
}

impl ContentDocument {
    fn from_map(mut map: Map<String, Value>) -> Self {
        let html = take_text(&mut map, "html");
        let description = take_text(&mut map, "description");
        let key_features = take_list(&mut map, "key_features");
        let technologies_used = take_list(&mut map, "technologies_used");
        let design_highlights = take_list(&mut map, "design_highlights");
        Self {
            html,
            description,
            key_features,
            technologies_used,
            design_highlights,
            extra: map,
        }
    }

    /// Document for content that was stored as plain html.
    pub fn from_html(html: impl Into<String>) -> Self {
        Self {
            html: Some(html.into()),
            ..Self::default()
        }
    }
}

fn take_text(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key) {
        Some(Value::String(text)) => Some(text),
        _ => None,
    }
}

fn take_list(map: &mut Map<String, Value>, key: &str) -> Vec<String> {
    match map.remove(key) {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(text) => Some(text),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Result of decoding a content column.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedContent {
    Structured(ContentDocument),
    Legacy(String),
}

impl DecodedContent {
    pub fn decode(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => Self::Structured(ContentDocument::from_map(map)),
            // Double-encoded rows hold the object inside a JSON string.
            Ok(Value::String(inner)) => match serde_json::from_str::<Value>(&inner) {
                Ok(Value::Object(map)) => Self::Structured(ContentDocument::from_map(map)),
                _ => Self::Legacy(inner),
            },
            _ => Self::Legacy(raw.to_string()),
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy(_))
    }

    pub fn into_document(self) -> ContentDocument {
        match self {
            Self::Structured(document) => document,
            Self::Legacy(html) => ContentDocument::from_html(html),
        }
    }
}

/// A list of strings stored as JSON array text in a parent column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(transparent)]
pub struct JsonList(pub Vec<String>);

impl JsonList {
    pub fn parse_lenient(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::default();
        }
        let items = match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(text) => Some(text),
                    Value::Number(number) => Some(number.to_string()),
                    _ => None,
                })
                .collect(),
            Ok(Value::String(text)) => split_commas(&text),
            Ok(Value::Null) => Vec::new(),
            _ => split_commas(trimmed),
        };
        Self(items)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn split_commas(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

impl Type<Sqlite> for JsonList {
    fn type_info() -> SqliteTypeInfo {
        <str as Type<Sqlite>>::type_info()
    }

    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <str as Type<Sqlite>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Sqlite> for JsonList {
    fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
        let raw = <&str as Decode<'r, Sqlite>>::decode(value)?;
        Ok(Self::parse_lenient(raw))
    }
}
