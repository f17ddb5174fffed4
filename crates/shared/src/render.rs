//! RSS 2.0 serialization of a [`FeedDocument`].

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use rss::extension::atom::{AtomExtension, Link};
use rss::validation::Validate;
use rss::{Channel, ChannelBuilder, GuidBuilder, Item, ItemBuilder};
use tracing::warn;

use crate::assembler::{FeedDocument, FeedEntry};
use crate::error::{FeedError, Result};

pub fn to_channel(feed: &FeedDocument) -> Channel {
    let items: Vec<Item> = feed.entries.iter().map(entry_to_item).collect();

    // RSS has no feed-level id; carry it as an atom:link to the topic page.
    let mut feed_link = Link::default();
    feed_link.set_href(feed.feed_id.clone());
    feed_link.set_rel("related");
    let mut atom = AtomExtension::default();
    atom.set_links(vec![feed_link]);

    ChannelBuilder::default()
        .title(feed.title.clone())
        .link(feed.link.clone())
        .description(feed.description.clone())
        .language(Some(feed.language.clone()))
        .copyright(Some(feed.rights.clone()))
        .generator(Some(feed.generator.clone()))
        .last_build_date(Some(feed.updated.to_rfc2822()))
        .atom_ext(Some(atom))
        .items(items)
        .build()
}

fn entry_to_item(entry: &FeedEntry) -> Item {
    ItemBuilder::default()
        .title(Some(entry.display_title.clone()))
        .link(Some(entry.link_url.clone()))
        .guid(Some(
            GuidBuilder::default()
                .permalink(true)
                .value(entry.entry_id.clone())
                .build(),
        ))
        .pub_date(entry.published_at.map(rfc2822_midnight))
        .description(Some(entry.body.clone()))
        .build()
}

/// Dates carry no time of day; publish them at 00:00 UTC.
fn rfc2822_midnight(date: NaiveDate) -> String {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::default()))
        .to_rfc2822()
}

/// Pretty-printed RSS XML for `feed`.
///
/// A channel that fails RSS validation is still rendered; the problem is
/// logged so one odd upstream value does not drop the whole feed.
pub fn render_rss(feed: &FeedDocument) -> Result<String> {
    let channel = to_channel(feed);

    if let Err(e) = channel.validate() {
        warn!(feed = %feed.key, error = %e, "feed does not pass RSS validation");
    }

    let bytes = channel
        .pretty_write_to(Vec::new(), b' ', 2)
        .map_err(|e| FeedError::Render {
            key: feed.key.clone(),
            message: e.to_string(),
        })?;

    String::from_utf8(bytes).map_err(|e| FeedError::Render {
        key: feed.key.clone(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::assemble;
    use crate::models::WorkRecord;
    use crate::topics::TopicConfig;
    use chrono::{DateTime, Datelike};
    use serde_json::json;

    fn sample_feed() -> FeedDocument {
        let topic = TopicConfig::new("games", "T11197", "Digital Games and Media", "Games.");
        let records: Vec<WorkRecord> = vec![
            serde_json::from_value(json!({
                "id": "https://openalex.org/W1",
                "title": "Foo",
                "doi": "https://doi.org/10.1/x",
                "publication_date": "2024-01-02",
                "authorships": [{ "author": { "display_name": "A. One" } }],
                "primary_location": { "source": { "display_name": "Journal Z" } }
            }))
            .unwrap(),
            serde_json::from_value(json!({ "id": "https://openalex.org/W2" })).unwrap(),
        ];
        let updated = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        assemble(&topic, &records, updated)
    }

    fn read_back(xml: &str) -> Channel {
        Channel::read_from(xml.as_bytes()).unwrap()
    }

    #[test]
    fn test_channel_metadata_written() {
        let xml = render_rss(&sample_feed()).unwrap();
        let channel = read_back(&xml);

        assert_eq!(channel.title(), "OpenAlex: Digital Games and Media");
        assert_eq!(channel.link(), "https://openalex.org");
        assert!(channel.description().starts_with("Games. Data from OpenAlex"));
        assert_eq!(channel.language(), Some("en"));
        assert_eq!(
            channel.copyright(),
            Some("CC0. Content sourced from OpenAlex (https://openalex.org).")
        );
        assert_eq!(channel.generator(), Some("OpenAlexTopicRSS"));

        let built = DateTime::parse_from_rfc2822(channel.last_build_date().unwrap()).unwrap();
        assert_eq!(built, Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap());
    }

    #[test]
    fn test_feed_id_carried_as_atom_link() {
        let channel = to_channel(&sample_feed());
        let atom = channel.atom_ext().unwrap();
        assert_eq!(atom.links()[0].href(), "https://openalex.org/topics/T11197");

        let xml = render_rss(&sample_feed()).unwrap();
        assert!(xml.contains("xmlns:atom=\"http://www.w3.org/2005/Atom\""));
        assert!(xml.contains("https://openalex.org/topics/T11197"));
    }

    #[test]
    fn test_items_written_in_order() {
        let channel = read_back(&render_rss(&sample_feed()).unwrap());
        let items = channel.items();
        assert_eq!(items.len(), 2);

        let first = &items[0];
        assert_eq!(first.title(), Some("Foo"));
        assert_eq!(first.link(), Some("https://doi.org/10.1/x"));
        let guid = first.guid().unwrap();
        assert_eq!(guid.value(), "https://openalex.org/W1");
        assert!(guid.is_permalink());
        let published = DateTime::parse_from_rfc2822(first.pub_date().unwrap()).unwrap();
        assert_eq!(
            (published.year(), published.month(), published.day()),
            (2024, 1, 2)
        );
        assert!(first.description().unwrap().contains("Journal Z"));

        let second = &items[1];
        assert_eq!(second.title(), Some("Untitled Work"));
        assert_eq!(second.link(), Some("https://openalex.org/W2"));
        assert_eq!(second.pub_date(), None);
        assert!(second.description().unwrap().contains("Anonymous"));
        assert!(second.description().unwrap().contains("Unknown venue"));
    }

    #[test]
    fn test_realistic_feed_passes_validation() {
        assert!(to_channel(&sample_feed()).validate().is_ok());
    }

    #[test]
    fn test_empty_feed_is_well_formed() {
        let mut feed = sample_feed();
        feed.entries.clear();
        let xml = render_rss(&feed).unwrap();
        let channel = read_back(&xml);
        assert!(channel.items().is_empty());
        assert_eq!(channel.title(), "OpenAlex: Digital Games and Media");
    }

    #[test]
    fn test_rendering_is_stable() {
        let feed = sample_feed();
        assert_eq!(render_rss(&feed).unwrap(), render_rss(&feed).unwrap());
    }
}
