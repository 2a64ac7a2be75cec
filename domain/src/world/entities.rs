//! Worldbook domain entities

use crate::core::id::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An author-defined setting shared by characters and sessions (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worldbook {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rules: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Genre label, persisted as `type`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Worldbook contents before the repository assigns id and timestamps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewWorldbook {
    pub title: String,
    pub description: String,
    pub rules: String,
    pub tags: Vec<String>,
    pub genre: Option<String>,
    pub image: Option<String>,
}

impl NewWorldbook {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn with_rules(mut self, rules: impl Into<String>) -> Self {
        self.rules = rules.into();
        self
    }

    /// Add a tag. Tags form a set: duplicates are ignored, first insertion wins.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn into_worldbook(self, id: EntityId, now: DateTime<Utc>) -> Worldbook {
        Worldbook {
            id,
            title: self.title,
            description: self.description,
            rules: self.rules,
            tags: self.tags,
            genre: self.genre,
            image: self.image,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for a worldbook.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldbookPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub rules: Option<String>,
    pub tags: Option<Vec<String>>,
    pub genre: Option<Option<String>>,
}

impl WorldbookPatch {
    pub fn apply(self, worldbook: &mut Worldbook, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            worldbook.title = title;
        }
        if let Some(description) = self.description {
            worldbook.description = description;
        }
        if let Some(rules) = self.rules {
            worldbook.rules = rules;
        }
        if let Some(tags) = self.tags {
            let mut unique: Vec<String> = Vec::with_capacity(tags.len());
            for tag in tags {
                if !unique.contains(&tag) {
                    unique.push(tag);
                }
            }
            worldbook.tags = unique;
        }
        if let Some(genre) = self.genre {
            worldbook.genre = genre;
        }
        worldbook.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_deduplicated() {
        let wb = NewWorldbook::new("Lost Liner", "A ship between times")
            .with_tag("fantasy")
            .with_tag("mystery")
            .with_tag("fantasy");
        assert_eq!(wb.tags, vec!["fantasy", "mystery"]);
    }

    #[test]
    fn test_patch_deduplicates_tags() {
        let mut wb = NewWorldbook::new("City", "").into_worldbook(1, Utc::now());
        WorldbookPatch {
            tags: Some(vec!["a".into(), "b".into(), "a".into()]),
            ..Default::default()
        }
        .apply(&mut wb, Utc::now());
        assert_eq!(wb.tags, vec!["a", "b"]);
    }

    #[test]
    fn test_genre_persisted_as_type() {
        let wb = NewWorldbook::new("City", "Neon")
            .with_genre("sci-fi")
            .into_worldbook(2, Utc::now());
        let value = serde_json::to_value(&wb).unwrap();
        assert_eq!(value["type"], "sci-fi");
        let back: Worldbook = serde_json::from_value(value).unwrap();
        assert_eq!(back, wb);
    }
}
