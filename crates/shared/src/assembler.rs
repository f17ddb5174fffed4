//! Turns fetched works into a feed document.
//!
//! Assembly never fails: every missing or malformed optional field on a
//! [`WorkRecord`] has a fixed fallback, and entries keep the order the
//! records arrived in.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use crate::config::PROJECT_NAME;
use crate::models::WorkRecord;
use crate::topics::TopicConfig;

pub const UNTITLED: &str = "Untitled Work";
pub const ANONYMOUS: &str = "Anonymous";
pub const UNKNOWN_VENUE: &str = "Unknown venue";
pub const AUTHOR_SEPARATOR: &str = "; ";

pub const SOURCE_HOME: &str = "https://openalex.org";
pub const FEED_LANGUAGE: &str = "en";
pub const RIGHTS: &str = "CC0. Content sourced from OpenAlex (https://openalex.org).";
const ATTRIBUTION: &str = "Data from OpenAlex (https://openalex.org), a free, open knowledge base. \
                           Data is CC0; attribution appreciated per OpenAlex Terms.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    /// Upstream work id; the entry's GUID and the fallback link.
    pub entry_id: String,
    pub display_title: String,
    pub link_url: String,
    pub published_at: Option<NaiveDate>,
    pub author_names: String,
    pub venue_name: String,
    /// HTML summary shown by feed readers.
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedDocument {
    /// Slug of the topic this feed was built for.
    pub key: String,
    pub feed_id: String,
    pub title: String,
    pub link: String,
    pub description: String,
    pub language: String,
    pub rights: String,
    pub generator: String,
    pub updated: DateTime<Utc>,
    pub entries: Vec<FeedEntry>,
}

/// Build the feed for `topic` from `records`, stamped with `updated`.
pub fn assemble(topic: &TopicConfig, records: &[WorkRecord], updated: DateTime<Utc>) -> FeedDocument {
    let entries = records.iter().map(|work| build_entry(topic, work)).collect();

    FeedDocument {
        key: topic.key.clone(),
        feed_id: topic.topic_url(),
        title: format!("OpenAlex: {}", topic.title),
        link: SOURCE_HOME.to_string(),
        description: format!("{} {}", topic.description.trim(), ATTRIBUTION),
        language: FEED_LANGUAGE.to_string(),
        rights: RIGHTS.to_string(),
        generator: PROJECT_NAME.to_string(),
        updated,
        entries,
    }
}

pub fn build_entry(topic: &TopicConfig, work: &WorkRecord) -> FeedEntry {
    let display_title = work.title().unwrap_or(UNTITLED).to_string();
    let link_url = work.doi().unwrap_or(work.id.as_str()).to_string();

    let published_at = work.published_on();
    if published_at.is_none() {
        if let Some(raw) = &work.publication_date {
            debug!(id = %work.id, date = %raw, "ignoring unparseable publication date");
        }
    }

    let names = work.author_names();
    let author_names = if names.is_empty() {
        ANONYMOUS.to_string()
    } else {
        names.join(AUTHOR_SEPARATOR)
    };

    let venue_name = work.venue().unwrap_or(UNKNOWN_VENUE).to_string();
    let body = entry_body(topic, &author_names, &venue_name);

    FeedEntry {
        entry_id: work.id.clone(),
        display_title,
        link_url,
        published_at,
        author_names,
        venue_name,
        body,
    }
}

/// Authors, venue and a link back to the topic. No abstracts.
fn entry_body(topic: &TopicConfig, authors: &str, venue: &str) -> String {
    format!(
        "<p><strong>Authors:</strong> {}</p>\
         <p><strong>Venue:</strong> {}</p>\
         <p><em>Topic: <a href=\"{}\">{}</a> (OpenAlex). Data CC0.</em></p>",
        escape_html(authors),
        escape_html(venue),
        escape_html(&topic.topic_url()),
        escape_html(&topic.title),
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
