use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{error, info, warn};

use crate::assembler::assemble;
use crate::error::FeedError;
use crate::io::save_feed;
use crate::openalex::{WorkQuery, WorkSource};
use crate::render::render_rss;
use crate::topics::{TopicConfig, TopicTable};

/// What happened to one configured feed during a run.
#[derive(Debug)]
pub struct FeedOutcome {
    pub key: String,
    /// Set when the fetch failed and the feed was written with no entries.
    pub fetch_error: Option<FeedError>,
    pub entry_count: usize,
    pub written: Result<PathBuf, FeedError>,
}

impl FeedOutcome {
    pub fn fetched(&self) -> bool {
        self.fetch_error.is_none()
    }
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<FeedOutcome>,
}

impl RunReport {
    pub fn written_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.written.is_ok()).count()
    }

    pub fn fetch_failures(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.fetched()).count()
    }

    pub fn write_failures(&self) -> usize {
        self.outcomes.iter().filter(|o| o.written.is_err()).count()
    }

    /// A run succeeds when every feed was written and at least one topic
    /// fetched. Partial fetch failures still count as success.
    pub fn is_success(&self) -> bool {
        if self.write_failures() > 0 {
            return false;
        }
        self.outcomes.is_empty() || self.outcomes.iter().any(FeedOutcome::fetched)
    }
}

/// Fetch, assemble, render and write the feed for one topic.
///
/// A failed fetch produces an empty feed; only a render or write failure
/// leaves `written` as an error.
pub async fn generate_feed<S: WorkSource>(
    source: &S,
    topic: &TopicConfig,
    query: &WorkQuery,
    output_dir: &Path,
) -> FeedOutcome {
    let (records, fetch_error) = match source.fetch_recent(&topic.topic_id, query).await {
        Ok(records) => (records, None),
        Err(e) => {
            warn!(feed = %topic.key, error = %e, "fetch failed, writing empty feed");
            (Vec::new(), Some(e))
        }
    };

    let feed = assemble(topic, &records, Utc::now());
    let entry_count = feed.entries.len();
    let written = render_rss(&feed).and_then(|xml| save_feed(output_dir, &topic.key, &xml));

    match &written {
        Ok(path) => info!(feed = %topic.key, path = %path.display(), entries = entry_count, "feed written"),
        Err(e) => error!(feed = %topic.key, error = %e, "feed not written"),
    }

    FeedOutcome {
        key: topic.key.clone(),
        fetch_error,
        entry_count,
        written,
    }
}

/// Generate every feed in `table`, one after another. A failure on one
/// topic never stops the others.
pub async fn run<S: WorkSource>(
    source: &S,
    table: &TopicTable,
    query: &WorkQuery,
    output_dir: &Path,
) -> RunReport {
    let mut report = RunReport::default();
    for topic in table.iter() {
        report
            .outcomes
            .push(generate_feed(source, topic, query, output_dir).await);
    }
    report
}
