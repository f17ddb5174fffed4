use std::collections::HashSet;

use crate::error::{FeedError, Result};

const TOPIC_URL_PREFIX: &str = "https://openalex.org/";

/// One configured feed: an OpenAlex topic and how to present it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicConfig {
    /// Feed slug, used as the output filename stem.
    pub key: String,
    pub topic_id: String,
    pub title: String,
    pub description: String,
}

impl TopicConfig {
    pub fn new(
        key: impl Into<String>,
        topic_id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let topic_id: String = topic_id.into();
        // Accept "https://openalex.org/T123" and "https://openalex.org/topics/T123"
        let topic_id = topic_id
            .trim()
            .strip_prefix(TOPIC_URL_PREFIX)
            .map(|rest| rest.trim_start_matches("topics/"))
            .unwrap_or(topic_id.trim())
            .to_string();

        Self {
            key: key.into(),
            topic_id,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Public page for this topic on openalex.org.
    pub fn topic_url(&self) -> String {
        format!("{}topics/{}", TOPIC_URL_PREFIX, self.topic_id)
    }

    fn validate(&self) -> Result<()> {
        if self.key.is_empty() {
            return Err(FeedError::config("feed slug must not be empty"));
        }
        if !self
            .key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
        {
            return Err(FeedError::config(format!(
                "feed slug {:?} may only contain a-z, 0-9, '_' and '-'",
                self.key
            )));
        }
        if self.topic_id.is_empty() {
            return Err(FeedError::config(format!(
                "feed {:?} has an empty topic id",
                self.key
            )));
        }
        Ok(())
    }
}

/// Validated, immutable list of configured feeds.
///
/// Construction fails if any slug is invalid or appears twice, so a table
/// that exists is always safe to run.
#[derive(Debug, Clone)]
pub struct TopicTable {
    topics: Vec<TopicConfig>,
}

impl TopicTable {
    pub fn new(topics: Vec<TopicConfig>) -> Result<Self> {
        let mut seen = HashSet::new();
        for topic in &topics {
            topic.validate()?;
            if !seen.insert(topic.key.as_str()) {
                return Err(FeedError::config(format!(
                    "feed slug {:?} is configured more than once",
                    topic.key
                )));
            }
        }
        Ok(Self { topics })
    }

    /// Keep only the named feeds, in table order. Unknown slugs are an error.
    pub fn select(&self, keys: &[String]) -> Result<Self> {
        if keys.is_empty() {
            return Ok(self.clone());
        }
        if let Some(unknown) = keys.iter().find(|k| self.get(k).is_none()) {
            return Err(FeedError::config(format!("unknown feed slug {:?}", unknown)));
        }
        let topics = self
            .topics
            .iter()
            .filter(|t| keys.contains(&t.key))
            .cloned()
            .collect();
        Ok(Self { topics })
    }

    pub fn get(&self, key: &str) -> Option<&TopicConfig> {
        self.topics.iter().find(|t| t.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TopicConfig> {
        self.topics.iter()
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

/// The feeds published by this project.
pub fn default_topics() -> Vec<TopicConfig> {
    vec![
        TopicConfig::new(
            "cb_mkt_influence",
            "T14244",
            "Consumer Behavior and Marketing Influence",
            "This cluster of papers focuses on consumer behavior, purchase decision making, \
             and the factors influencing consumer choices in various industries such as \
             retail, hospitality, and e-commerce.",
        ),
        TopicConfig::new(
            "cog_psych_research",
            "T13777",
            "Cognitive and psychological constructs research",
            "This cluster of papers revolves around the application of laddering theory, \
             means-end chain analysis, and personal construct psychology in understanding \
             consumer cognition, decision-making processes, and value hierarchies.",
        ),
        TopicConfig::new(
            "soc_inter_research",
            "T10314",
            "Social and Intergroup Psychology",
            "Recent works on social and intergroup psychology.",
        ),
        TopicConfig::new(
            "optimism_hope_wb",
            "T12485",
            "Optimism, Hope, and Well-being",
            "Recent works on optimism, hope, and well-being.",
        ),
        TopicConfig::new(
            "dig_games_media",
            "T11197",
            "Digital Games and Media",
            "Recent works on digital games and media.",
        ),
        TopicConfig::new(
            "gen_stu",
            "T12275",
            "Gender and Feminist Studies",
            "Recent works on gender and feminist studies.",
        ),
        TopicConfig::new(
            "sport_smes",
            "T11474",
            "Sport and Mega-Event Impacts",
            "Recent works on the impacts of sport and mega-events.",
        ),
        TopicConfig::new(
            "sport_gender",
            "T10942",
            "Sports, Gender, and Society",
            "Recent works on sports, gender, and society.",
        ),
    ]
}
