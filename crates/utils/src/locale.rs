//! Locale codes, normalization and fallback chain resolution.
//!
//! Every content read picks a locale through [`FallbackChain::resolve`]. The
//! resolver never fails: hints that cannot be parsed, or that no configured
//! locale serves, are dropped and resolution degrades to the global default.

use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

/// Two or three letter language, then optional region/script subtags.
static LOCALE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z]{2,3})(?:[-_][a-z0-9]{2,8}){0,2}$").expect("locale tag pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid locale code: {0:?}")]
pub struct InvalidLocale(pub String);

/// A normalized language code such as `de` or `en`.
///
/// Only constructed through [`LocaleCode::normalize`], so the inner string is
/// always lower-case with the region subtag stripped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(try_from = "String", into = "String")]
#[ts(type = "string")]
pub struct LocaleCode(String);

impl LocaleCode {
    /// Trim, lower-case and strip the region subtag (`de-AT` -> `de`).
    ///
    /// Returns `None` for empty input or anything that does not look like a
    /// language tag.
    pub fn normalize(raw: &str) -> Option<Self> {
        let lowered = raw.trim().to_ascii_lowercase();
        let captures = LOCALE_TAG.captures(&lowered)?;
        captures.get(1).map(|lang| Self(lang.as_str().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocaleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LocaleCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LocaleCode {
    type Error = InvalidLocale;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::normalize(&value).ok_or(InvalidLocale(value))
    }
}

impl From<LocaleCode> for String {
    fn from(code: LocaleCode) -> Self {
        code.0
    }
}

/// Ordered, duplicate-free list of locales to try for one request.
///
/// The first element is always the primary locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
pub struct FallbackChain {
    primary: LocaleCode,
    chain: Vec<LocaleCode>,
}

impl FallbackChain {
    /// Build the chain `[primary, record_default, global_default, ...rest]`.
    ///
    /// `requested` and `record_default` only count when `supported` contains
    /// them. `global_default` is always trusted, even when the supported set
    /// is momentarily empty.
    pub fn resolve(
        supported: &[LocaleCode],
        requested: Option<&str>,
        record_default: Option<&str>,
        global_default: &LocaleCode,
    ) -> Self {
        let usable = |raw: Option<&str>| {
            raw.and_then(LocaleCode::normalize)
                .filter(|code| supported.contains(code))
        };
        let requested = usable(requested);
        let record_default = usable(record_default);

        let primary = requested
            .clone()
            .or_else(|| record_default.clone())
            .unwrap_or_else(|| global_default.clone());

        let mut chain = Vec::with_capacity(supported.len() + 1);
        let candidates = std::iter::once(primary.clone())
            .chain(record_default)
            .chain(std::iter::once(global_default.clone()))
            .chain(supported.iter().cloned());
        for code in candidates {
            if !chain.contains(&code) {
                chain.push(code);
            }
        }

        Self { primary, chain }
    }

    /// A chain holding only `locale`.
    pub fn single(locale: LocaleCode) -> Self {
        Self {
            chain: vec![locale.clone()],
            primary: locale,
        }
    }

    pub fn primary(&self) -> &LocaleCode {
        &self.primary
    }

    pub fn locales(&self) -> &[LocaleCode] {
        &self.chain
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocaleCode> {
        self.chain.iter()
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}

/// Language tags from an `Accept-Language` header, best first.
///
/// Entries with `q=0`, the `*` wildcard and unparseable weights are skipped.
/// Tags with equal weight keep header order.
pub fn parse_accept_language(header: &str) -> Vec<String> {
    let mut weighted: Vec<(usize, f32, &str)> = header
        .split(',')
        .enumerate()
        .filter_map(|(index, part)| {
            let mut pieces = part.split(';');
            let tag = pieces.next()?.trim();
            if tag.is_empty() || tag == "*" {
                return None;
            }
            let mut quality = 1.0_f32;
            for param in pieces {
                if let Some(value) = param.trim().strip_prefix("q=") {
                    quality = value.trim().parse().ok()?;
                }
            }
            (quality > 0.0).then_some((index, quality, tag))
        })
        .collect();

    weighted.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    weighted
        .into_iter()
        .map(|(_, _, tag)| tag.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn code(raw: &str) -> LocaleCode {
        LocaleCode::normalize(raw).unwrap()
    }

    fn codes(raw: &[&str]) -> Vec<LocaleCode> {
        raw.iter().map(|r| code(r)).collect()
    }

    #[test]
    fn test_normalize_strips_region_and_case() {
        assert_eq!(code("de-DE").as_str(), "de");
        assert_eq!(code("  EN_us ").as_str(), "en");
        assert_eq!(code("de-at").as_str(), "de");
        assert_eq!(code("zh-Hant-TW").as_str(), "zh");
        assert_eq!(code("fil").as_str(), "fil");
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        for raw in ["", "   ", "e", "english", "12", "de--", "de-", "d3", "de/at"] {
            assert!(LocaleCode::normalize(raw).is_none(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn test_locale_code_deserialize_normalizes() {
        let parsed: LocaleCode = serde_json::from_str("\"DE-at\"").unwrap();
        assert_eq!(parsed.as_str(), "de");
        assert!(serde_json::from_str::<LocaleCode>("\"nope!\"").is_err());
    }

    #[test]
    fn test_resolve_exact_match() {
        let supported = codes(&["en", "de", "fr"]);
        let chain = FallbackChain::resolve(&supported, Some("de"), None, &code("en"));
        assert_eq!(chain.primary().as_str(), "de");
        assert_eq!(chain.locales(), codes(&["de", "en", "fr"]).as_slice());
    }

    #[test]
    fn test_resolve_requested_falls_through_to_global_default() {
        let supported = codes(&["fr", "en"]);
        let chain = FallbackChain::resolve(&supported, Some("fr-CA"), None, &code("en"));
        assert_eq!(chain.locales(), codes(&["fr", "en"]).as_slice());
    }

    #[test]
    fn test_resolve_unsupported_requested_uses_global_default() {
        let supported = codes(&["de", "en"]);
        let chain = FallbackChain::resolve(&supported, Some("xx"), None, &code("de"));
        assert_eq!(chain.primary().as_str(), "de");
        assert_eq!(chain.locales(), codes(&["de", "en"]).as_slice());
    }

    #[test]
    fn test_resolve_record_default_comes_before_global_default() {
        let supported = codes(&["en", "de", "fr"]);
        let chain = FallbackChain::resolve(&supported, Some("it"), Some("fr"), &code("en"));
        assert_eq!(chain.primary().as_str(), "fr");
        assert_eq!(chain.locales(), codes(&["fr", "en", "de"]).as_slice());

        let chain = FallbackChain::resolve(&supported, Some("de"), Some("fr"), &code("en"));
        assert_eq!(chain.locales(), codes(&["de", "fr", "en"]).as_slice());
    }

    #[test]
    fn test_resolve_trusts_global_default_with_empty_registry() {
        let chain = FallbackChain::resolve(&[], Some("de"), Some("fr"), &code("en"));
        assert_eq!(chain.primary().as_str(), "en");
        assert_eq!(chain.locales(), codes(&["en"]).as_slice());
    }

    #[test]
    fn test_resolve_unparseable_matches_absent() {
        let supported = codes(&["en", "de"]);
        let garbage = FallbackChain::resolve(&supported, Some("!!"), Some(""), &code("de"));
        let absent = FallbackChain::resolve(&supported, None, None, &code("de"));
        assert_eq!(garbage, absent);
    }

    #[test]
    fn test_parse_accept_language_orders_by_quality() {
        let tags = parse_accept_language("fr;q=0.5, de-DE, en;q=0.8, *;q=0.1, it;q=0");
        assert_eq!(tags, vec!["de-DE", "en", "fr"]);
    }

    #[test]
    fn test_parse_accept_language_skips_bad_weights() {
        assert_eq!(parse_accept_language("de;q=abc, en"), vec!["en"]);
        assert!(parse_accept_language("").is_empty());
    }

    fn arb_tag() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-zA-Z]{2,3}",
            "[a-zA-Z]{2,3}[-_][a-zA-Z0-9]{2,4}",
            ".{0,8}",
        ]
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(raw in arb_tag()) {
            if let Some(first) = LocaleCode::normalize(&raw) {
                let second = LocaleCode::normalize(first.as_str());
                prop_assert_eq!(second, Some(first));
            }
        }

        #[test]
        fn prop_chain_is_well_formed(
            supported in proptest::collection::vec("[a-z]{2}", 0..6),
            requested in proptest::option::of(arb_tag()),
            record_default in proptest::option::of(arb_tag()),
            global in "[a-z]{2}",
        ) {
            let supported: Vec<LocaleCode> = supported.iter().map(|s| code(s)).collect();
            let global = code(&global);
            let chain = FallbackChain::resolve(
                &supported,
                requested.as_deref(),
                record_default.as_deref(),
                &global,
            );

            prop_assert!(!chain.is_empty());
            prop_assert_eq!(&chain.locales()[0], chain.primary());
            for (i, locale) in chain.iter().enumerate() {
                prop_assert!(!chain.locales()[i + 1..].contains(locale));
                prop_assert!(locale == &global || supported.contains(locale));
            }
        }
    }
}
