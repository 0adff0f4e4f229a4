use catalog::{Catalog, TravelInfo, VideoEntity, format_duration, format_number, format_time_ago};
use chrono::{DateTime, Utc};

pub const PLACEHOLDER_AUTHOR_NAME: &str = "Creator";
pub const PLACEHOLDER_AVATAR: &str = "/placeholder.svg?height=32&width=32";

/// Author line of a card, with placeholders when the author is unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorBadge {
    pub name: String,
    pub avatar: String,
    pub verified: bool,
    pub followers: Option<String>,
}

/// Travel facts shown under an expanded card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TravelFacts {
    pub best_time: String,
    pub budget: String,
    pub trip_length: String,
    pub difficulty: String,
    pub activities: Vec<String>,
}

/// Values needed to draw one feed card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRenderModel {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub thumbnail_url: String,
    pub video_url: String,
    pub category: String,
    pub author: AuthorBadge,
    pub views: String,
    pub likes: String,
    pub comments: String,
    pub duration: String,
    pub published: String,
    pub trending: bool,
    pub featured: bool,
    pub playing: bool,
    pub muted: bool,
    pub expanded: bool,
    /// Only filled while expanded.
    pub tags: Vec<String>,
    /// Only filled while expanded and the video carries travel info.
    pub travel: Option<TravelFacts>,
}

/// Per-card flags that come from engine snapshots rather than the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CardFlags {
    pub playing: bool,
    pub muted: bool,
    pub expanded: bool,
}

/// Builds draw data for one feed card.
///
/// Missing author or category lookups fall back to placeholders instead of
/// failing.
pub fn build_card_model(
    video: &VideoEntity,
    catalog: &Catalog,
    flags: CardFlags,
    now: DateTime<Utc>,
) -> CardRenderModel {
    let author = match catalog.author_by_id(&video.author_id) {
        Some(author) => AuthorBadge {
            name: author.name.clone(),
            avatar: if author.avatar.is_empty() {
                PLACEHOLDER_AVATAR.to_owned()
            } else {
                author.avatar.clone()
            },
            verified: author.verified,
            followers: Some(format_number(author.followers)),
        },
        None => AuthorBadge {
            name: PLACEHOLDER_AUTHOR_NAME.to_owned(),
            avatar: PLACEHOLDER_AVATAR.to_owned(),
            verified: false,
            followers: None,
        },
    };
    let category = catalog
        .category_by_id(&video.category_id)
        .map_or_else(|| video.category_id.clone(), |category| category.name.clone());

    let (tags, travel) = if flags.expanded {
        (
            video.tags.iter().map(|tag| format!("#{tag}")).collect(),
            video.travel_info.as_ref().map(travel_facts),
        )
    } else {
        (Vec::new(), None)
    };

    CardRenderModel {
        video_id: video.id.clone(),
        title: video.title.clone(),
        description: video.description.clone(),
        location: format!("{}, {}", video.location.name, video.location.country),
        thumbnail_url: video.thumbnail_url.clone(),
        video_url: video.video_url.clone(),
        category,
        author,
        views: format_number(video.views),
        likes: format_number(video.likes),
        comments: format_number(video.comment_count),
        duration: format_duration(video.duration),
        published: format_time_ago(video.published_at, now),
        trending: video.trending,
        featured: video.featured,
        playing: flags.playing,
        muted: flags.muted,
        expanded: flags.expanded,
        tags,
        travel,
    }
}

fn travel_facts(info: &TravelInfo) -> TravelFacts {
    TravelFacts {
        best_time: info.best_time_to_visit.join(", "),
        budget: format!(
            "{} {}-{}",
            info.budget.currency, info.budget.min, info.budget.max
        ),
        trip_length: info.duration.clone(),
        difficulty: info.difficulty.clone(),
        activities: info.activities.clone(),
    }
}
