use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque identifier for catalog videos.
pub type VideoId = String;

/// One short travel video as published in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoEntity {
    pub id: VideoId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub category_id: String,
    pub author_id: String,
    pub location: Location,
    pub views: u64,
    pub likes: u64,
    #[serde(default)]
    pub comment_count: u64,
    pub published_at: DateTime<Utc>,
    /// Length in seconds.
    pub duration: u32,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub trending: bool,
    #[serde(default)]
    pub video_url: String,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub travel_info: Option<TravelInfo>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// Place a video was shot at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub country: String,
}

/// Practical trip details attached to some videos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelInfo {
    #[serde(default)]
    pub best_time_to_visit: Vec<String>,
    pub budget: Budget,
    pub duration: String,
    pub difficulty: String,
    #[serde(default)]
    pub activities: Vec<String>,
}

/// Estimated trip cost range. `min` never exceeds `max` in a loaded catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub currency: String,
    pub min: u64,
    pub max: u64,
}

/// Viewer comment shown in the detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub author_name: String,
    #[serde(default)]
    pub author_avatar: String,
    pub text: String,
    #[serde(default)]
    pub likes: u64,
    pub posted_at: DateTime<Utc>,
}

/// Content creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub verified: bool,
}

/// Browsing category such as `adventure` or `food`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl VideoEntity {
    /// Returns true when `needle` (already lowercased) occurs in any searchable field.
    pub(crate) fn matches_text(&self, needle: &str) -> bool {
        contains_folded(&self.title, needle)
            || contains_folded(&self.description, needle)
            || self.tags.iter().any(|tag| contains_folded(tag, needle))
            || contains_folded(&self.location.name, needle)
            || contains_folded(&self.location.country, needle)
    }
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
