use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{CatalogError, Result};
use crate::model::{Author, Category, VideoEntity};

/// On-disk layout of a catalog file.
#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    authors: Vec<Author>,
    #[serde(default)]
    videos: Vec<VideoEntity>,
}

/// Immutable in-memory catalog of travel videos.
///
/// Videos keep the order they were loaded in; every query that needs a stable
/// tie-break relies on it.
///
/// # Example
/// ```
/// use catalog::Catalog;
///
/// let catalog = Catalog::from_json_str(
///     r#"{
///         "categories": [{ "id": "food", "name": "Food" }],
///         "authors": [{ "id": "a1", "name": "Mia" }],
///         "videos": [{
///             "id": "v1",
///             "title": "Street food in Hanoi",
///             "description": "Pho at dawn",
///             "tags": ["vietnam"],
///             "categoryId": "food",
///             "authorId": "a1",
///             "location": { "name": "Hanoi", "country": "Vietnam" },
///             "views": 1200,
///             "likes": 80,
///             "publishedAt": "2024-03-01T08:00:00Z",
///             "duration": 95
///         }]
///     }"#,
/// )
/// .expect("valid catalog");
///
/// assert_eq!(catalog.search_by_text("HANOI").len(), 1);
/// assert!(catalog.video_by_id("missing").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    videos: Vec<Arc<VideoEntity>>,
    authors: Vec<Author>,
    categories: Vec<Category>,
}

impl Catalog {
    /// Builds a catalog after checking id uniqueness and budget ranges.
    pub fn new(
        videos: Vec<VideoEntity>,
        authors: Vec<Author>,
        categories: Vec<Category>,
    ) -> Result<Self> {
        let mut seen = HashSet::new();
        for video in &videos {
            if !seen.insert(video.id.as_str()) {
                return Err(CatalogError::DuplicateVideoId(video.id.clone()));
            }
            if let Some(budget) = video.travel_info.as_ref().map(|info| &info.budget) {
                if budget.min > budget.max {
                    return Err(CatalogError::InvalidBudget {
                        video_id: video.id.clone(),
                        min: budget.min,
                        max: budget.max,
                    });
                }
            }
        }

        let mut seen = HashSet::new();
        if let Some(author) = authors.iter().find(|author| !seen.insert(author.id.as_str())) {
            return Err(CatalogError::DuplicateAuthorId(author.id.clone()));
        }
        let mut seen = HashSet::new();
        if let Some(category) = categories
            .iter()
            .find(|category| !seen.insert(category.id.as_str()))
        {
            return Err(CatalogError::DuplicateCategoryId(category.id.clone()));
        }

        Ok(Self {
            videos: videos.into_iter().map(Arc::new).collect(),
            authors,
            categories,
        })
    }

    /// Parses a catalog document from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        Self::new(document.videos, document.authors, document.categories)
    }

    /// Reads and parses a catalog document from disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&json)?;
        info!(
            path = %path.display(),
            videos = catalog.videos.len(),
            authors = catalog.authors.len(),
            categories = catalog.categories.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Returns every video in catalog order.
    pub fn videos(&self) -> &[Arc<VideoEntity>] {
        &self.videos
    }

    /// Returns every browsing category in catalog order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn video_by_id(&self, id: &str) -> Option<Arc<VideoEntity>> {
        self.videos.iter().find(|video| video.id == id).cloned()
    }

    pub fn author_by_id(&self, id: &str) -> Option<&Author> {
        self.authors.iter().find(|author| author.id == id)
    }

    pub fn category_by_id(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// Case-insensitive match over title, description, tags and location.
    ///
    /// A blank query matches nothing. Results keep catalog order.
    pub fn search_by_text(&self, query: &str) -> Vec<Arc<VideoEntity>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let hits: Vec<_> = self
            .videos
            .iter()
            .filter(|video| video.matches_text(&needle))
            .cloned()
            .collect();
        debug!(query = %needle, hits = hits.len(), "catalog text search");
        hits
    }
}
