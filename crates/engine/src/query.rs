use std::sync::Arc;

use catalog::{Catalog, VideoEntity};
use serde::{Deserialize, Serialize};

/// Category tab selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Maps a tab value to a filter; `"all"` selects every category.
    pub fn from_tab(value: &str) -> Self {
        if value == "all" {
            Self::All
        } else {
            Self::Only(value.to_owned())
        }
    }

    fn admits(&self, video: &VideoEntity) -> bool {
        match self {
            Self::All => true,
            Self::Only(category_id) => video.category_id == *category_id,
        }
    }
}

/// Result ordering offered by the sort select.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    #[default]
    Popular,
    Recent,
    Trending,
}

/// How a non-empty search interacts with the category tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchComposition {
    /// Search hits replace the category-filtered list.
    #[default]
    ReplaceCategory,
    /// Search hits are additionally narrowed to the active category.
    Conjunctive,
}

/// Complete user filter selection. Replaced wholesale on every change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterState {
    pub category: CategoryFilter,
    pub search: String,
    pub sort: SortMode,
}

/// Filters and sorts the catalog for one filter selection.
///
/// Pure: the same inputs always produce the same ordered list. Equal sort keys
/// keep catalog order.
///
/// # Example
/// ```
/// use catalog::Catalog;
/// use engine::query::{FilterState, SearchComposition, SortMode, query};
///
/// let catalog = Catalog::default();
/// let filter = FilterState {
///     sort: SortMode::Trending,
///     ..FilterState::default()
/// };
///
/// assert!(query(&catalog, &filter, SearchComposition::ReplaceCategory).is_empty());
/// ```
pub fn query(
    catalog: &Catalog,
    filter: &FilterState,
    composition: SearchComposition,
) -> Vec<Arc<VideoEntity>> {
    let mut results: Vec<Arc<VideoEntity>> = if filter.search.trim().is_empty() {
        catalog
            .videos()
            .iter()
            .filter(|video| filter.category.admits(video))
            .cloned()
            .collect()
    } else {
        let hits = catalog.search_by_text(&filter.search);
        match composition {
            SearchComposition::ReplaceCategory => hits,
            SearchComposition::Conjunctive => hits
                .into_iter()
                .filter(|video| filter.category.admits(video))
                .collect(),
        }
    };

    match filter.sort {
        SortMode::Recent => results.sort_by(|a, b| b.published_at.cmp(&a.published_at)),
        SortMode::Popular => results.sort_by(|a, b| b.views.cmp(&a.views)),
        SortMode::Trending => {
            let (mut trending, rest): (Vec<_>, Vec<_>) =
                results.into_iter().partition(|video| video.trending);
            trending.extend(rest);
            results = trending;
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use catalog::{Catalog, Location, VideoEntity};

    use super::{CategoryFilter, FilterState, SearchComposition, SortMode, query};

    #[test]
    fn all_category_with_empty_search_keeps_every_video() {
        let catalog = sample_catalog();

        let ids = ids(&query(&catalog, &FilterState::default(), SearchComposition::ReplaceCategory));

        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn category_filter_keeps_only_matching_category() {
        let catalog = sample_catalog();
        let filter = FilterState {
            category: CategoryFilter::Only("food".to_owned()),
            search: String::new(),
            sort: SortMode::Recent,
        };

        let ids = ids(&query(&catalog, &filter, SearchComposition::ReplaceCategory));

        assert_eq!(ids, vec!["v4", "v2"]);
    }

    #[test]
    fn popular_sort_is_descending_by_views_and_stable_on_ties() {
        let catalog = sample_catalog();

        let ids = ids(&query(&catalog, &FilterState::default(), SearchComposition::ReplaceCategory));

        assert_eq!(ids, vec!["v3", "v1", "v2", "v4", "v5"]);
    }

    #[test]
    fn recent_sort_is_descending_by_publication_time() {
        let catalog = sample_catalog();
        let filter = FilterState {
            sort: SortMode::Recent,
            ..FilterState::default()
        };

        let ids = ids(&query(&catalog, &filter, SearchComposition::ReplaceCategory));

        assert_eq!(ids, vec!["v5", "v4", "v3", "v2", "v1"]);
    }

    #[test]
    fn trending_sort_partitions_without_reordering_either_side() {
        let catalog = sample_catalog();
        let filter = FilterState {
            sort: SortMode::Trending,
            ..FilterState::default()
        };

        let ids = ids(&query(&catalog, &filter, SearchComposition::ReplaceCategory));

        assert_eq!(ids, vec!["v2", "v5", "v1", "v3", "v4"]);
    }

    #[test]
    fn search_replaces_category_filter_by_default() {
        let catalog = sample_catalog();
        let filter = FilterState {
            category: CategoryFilter::Only("food".to_owned()),
            search: "  lagoon ".to_owned(),
            sort: SortMode::Popular,
        };

        let ids = ids(&query(&catalog, &filter, SearchComposition::ReplaceCategory));

        assert_eq!(ids, vec!["v3", "v1"]);
    }

    #[test]
    fn conjunctive_search_also_applies_category() {
        let catalog = sample_catalog();
        let filter = FilterState {
            category: CategoryFilter::Only("beach".to_owned()),
            search: "lagoon".to_owned(),
            sort: SortMode::Popular,
        };

        let ids = ids(&query(&catalog, &filter, SearchComposition::Conjunctive));

        assert_eq!(ids, vec!["v3"]);
    }

    #[test]
    fn from_tab_maps_all_sentinel() {
        assert_eq!(CategoryFilter::from_tab("all"), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::from_tab("food"),
            CategoryFilter::Only("food".to_owned())
        );
    }

    fn ids(videos: &[std::sync::Arc<VideoEntity>]) -> Vec<String> {
        videos.iter().map(|video| video.id.clone()).collect()
    }

    fn sample_catalog() -> Catalog {
        Catalog::new(
            vec![
                video("v1", "Lagoon kayak", "nature", 500, 1, false),
                video("v2", "Night market", "food", 200, 2, true),
                video("v3", "Blue lagoon", "beach", 900, 3, false),
                video("v4", "Noodle bar", "food", 200, 4, false),
                video("v5", "Summit push", "adventure", 100, 5, true),
            ],
            Vec::new(),
            Vec::new(),
        )
        .expect("sample catalog is valid")
    }

    fn video(
        id: &str,
        title: &str,
        category: &str,
        views: u64,
        day: u32,
        trending: bool,
    ) -> VideoEntity {
        VideoEntity {
            id: id.to_owned(),
            title: title.to_owned(),
            description: String::new(),
            tags: Vec::new(),
            category_id: category.to_owned(),
            author_id: "a1".to_owned(),
            location: Location {
                name: "Somewhere".to_owned(),
                country: "Nowhere".to_owned(),
            },
            views,
            likes: 0,
            comment_count: 0,
            published_at: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            duration: 30,
            featured: false,
            trending,
            video_url: String::new(),
            thumbnail_url: String::new(),
            travel_info: None,
            comments: Vec::new(),
        }
    }
}
