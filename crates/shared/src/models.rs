use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Maximum number of authors named per entry.
pub const MAX_AUTHORS: usize = 5;

/// A work as returned by the OpenAlex `/works` endpoint.
///
/// Only `id` is required. Every other field may be absent, `null` or of
/// the wrong JSON type upstream; the accessors below return `None` in all
/// of those cases.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WorkRecord {
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub doi: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub publication_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_items")]
    pub authorships: Vec<Authorship>,
    #[serde(default, deserialize_with = "lenient")]
    pub primary_location: Option<Location>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Authorship {
    #[serde(default, deserialize_with = "lenient")]
    pub author: Option<Author>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Author {
    #[serde(default, deserialize_with = "lenient")]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Location {
    #[serde(default, deserialize_with = "lenient")]
    pub source: Option<Source>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Source {
    #[serde(default, deserialize_with = "lenient")]
    pub display_name: Option<String>,
}

/// Decode the field if it has the expected shape, otherwise fall back to
/// `T::default()`.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Like [`lenient`] for lists, but per item: a malformed item becomes
/// `T::default()` and keeps its position, a non-list becomes empty.
fn lenient_items<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let items = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };
    Ok(items
        .into_iter()
        .map(|item| serde_json::from_value(item).unwrap_or_default())
        .collect())
}

/// The value unchanged, unless it is missing or only whitespace.
fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.trim().is_empty())
}

impl WorkRecord {
    pub fn title(&self) -> Option<&str> {
        non_blank(self.title.as_ref())
    }

    pub fn doi(&self) -> Option<&str> {
        non_blank(self.doi.as_ref())
    }

    /// Publication date, if present and a valid `YYYY-MM-DD` calendar date.
    pub fn published_on(&self) -> Option<NaiveDate> {
        let raw = non_blank(self.publication_date.as_ref())?;
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
    }

    /// Names of the first [`MAX_AUTHORS`] authorships, skipping those
    /// without a usable display name. Authorships past the cap are never
    /// looked at, even if earlier ones were skipped.
    pub fn author_names(&self) -> Vec<&str> {
        self.authorships
            .iter()
            .take(MAX_AUTHORS)
            .filter_map(|a| non_blank(a.author.as_ref()?.display_name.as_ref()))
            .collect()
    }

    /// Display name of the venue at `primary_location.source`.
    pub fn venue(&self) -> Option<&str> {
        let source = self.primary_location.as_ref()?.source.as_ref()?;
        non_blank(source.display_name.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> WorkRecord {
        serde_json::from_value(value).unwrap()
    }

    fn authorship(name: Option<&str>) -> serde_json::Value {
        match name {
            Some(n) => json!({ "author": { "display_name": n } }),
            None => json!({ "author": {} }),
        }
    }

    #[test]
    fn test_full_record_deserializes() {
        let work = record(json!({
            "id": "https://openalex.org/W1",
            "title": "Foo",
            "doi": "https://doi.org/10.1/x",
            "publication_date": "2024-01-02",
            "authorships": [{ "author": { "display_name": "A. One" } }],
            "primary_location": { "source": { "display_name": "Journal Z" } }
        }));
        assert_eq!(work.title(), Some("Foo"));
        assert_eq!(work.doi(), Some("https://doi.org/10.1/x"));
        assert_eq!(work.published_on(), NaiveDate::from_ymd_opt(2024, 1, 2));
        assert_eq!(work.author_names(), vec!["A. One"]);
        assert_eq!(work.venue(), Some("Journal Z"));
    }

    #[test]
    fn test_id_only_record_has_no_optional_fields() {
        let work = record(json!({ "id": "W2" }));
        assert_eq!(work.title(), None);
        assert_eq!(work.doi(), None);
        assert_eq!(work.published_on(), None);
        assert!(work.author_names().is_empty());
        assert_eq!(work.venue(), None);
    }

    #[test]
    fn test_nulls_are_treated_as_absent() {
        let work = record(json!({
            "id": "W3",
            "title": null,
            "doi": null,
            "publication_date": null,
            "authorships": null,
            "primary_location": { "source": null }
        }));
        assert_eq!(work.title(), None);
        assert!(work.authorships.is_empty());
        assert_eq!(work.venue(), None);
    }

    #[test]
    fn test_missing_id_fails_to_deserialize() {
        let result = serde_json::from_value::<WorkRecord>(json!({ "title": "No id" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_strings_count_as_missing() {
        let work = record(json!({
            "id": "W4",
            "title": "   ",
            "doi": "",
            "primary_location": { "source": { "display_name": "" } }
        }));
        assert_eq!(work.title(), None);
        assert_eq!(work.doi(), None);
        assert_eq!(work.venue(), None);
    }

    #[test]
    fn test_surrounding_whitespace_is_kept() {
        let work = record(json!({
            "id": "W4",
            "title": "  Padded  ",
            "authorships": [{ "author": { "display_name": " Jane " } }],
            "primary_location": { "source": { "display_name": "Journal\t" } }
        }));
        assert_eq!(work.title(), Some("  Padded  "));
        assert_eq!(work.author_names(), vec![" Jane "]);
        assert_eq!(work.venue(), Some("Journal\t"));
    }

    #[test]
    fn test_wrong_types_degrade_to_absent() {
        let work = record(json!({
            "id": "W8",
            "title": 123,
            "doi": ["https://doi.org/10.1/x"],
            "publication_date": 20240102,
            "authorships": { "author": "Jane" },
            "primary_location": "Journal Z"
        }));
        assert_eq!(work.title(), None);
        assert_eq!(work.doi(), None);
        assert_eq!(work.published_on(), None);
        assert!(work.authorships.is_empty());
        assert_eq!(work.venue(), None);

        let nested = record(json!({
            "id": "W9",
            "primary_location": { "source": { "display_name": 42 } }
        }));
        assert_eq!(nested.venue(), None);
    }

    #[test]
    fn test_malformed_authorship_keeps_its_slot() {
        let authorships = vec![
            authorship(Some("A")),
            json!({ "author": "Jane" }),
            json!("not an object"),
            json!({ "author": { "display_name": 7 } }),
            authorship(Some("B")),
            authorship(Some("Past the cap")),
        ];
        let work = record(json!({ "id": "W10", "authorships": authorships }));
        assert_eq!(work.authorships.len(), 6);
        assert_eq!(work.author_names(), vec!["A", "B"]);
    }

    #[test]
    fn test_unparseable_dates_are_dropped() {
        for raw in ["2024-13-01", "2024-02-30", "01/02/2024", "2024", "soon"] {
            let work = record(json!({ "id": "W5", "publication_date": raw }));
            assert_eq!(work.published_on(), None, "{raw} should not parse");
        }
    }

    #[test]
    fn test_authors_capped_at_five_in_order() {
        let names = ["A", "B", "C", "D", "E", "F", "G"];
        let authorships: Vec<_> = names.iter().map(|n| authorship(Some(n))).collect();
        let work = record(json!({ "id": "W6", "authorships": authorships }));
        assert_eq!(work.author_names(), vec!["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn test_unnamed_authors_skipped_within_cap() {
        let authorships = vec![
            authorship(Some("A")),
            authorship(None),
            json!({}),
            json!({ "author": null }),
            authorship(Some("B")),
            authorship(Some("Past the cap")),
        ];
        let work = record(json!({ "id": "W7", "authorships": authorships }));
        assert_eq!(work.author_names(), vec!["A", "B"]);
    }
}
