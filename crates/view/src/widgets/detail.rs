use catalog::{Catalog, format_number, format_time_ago};
use chrono::{DateTime, Utc};
use engine::DetailSnapshot;

use crate::widgets::card::{CardFlags, CardRenderModel, build_card_model};

/// One comment row in the detail overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentLine {
    pub author_name: String,
    pub text: String,
    pub likes: String,
    pub posted: String,
}

/// Values needed to draw the detail overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailRenderModel {
    /// Card data for the video, always in its expanded form.
    pub card: CardRenderModel,
    pub playing: bool,
    pub muted: bool,
    pub volume: f32,
    /// Progress in `[0, 100]`.
    pub progress: f32,
    /// Filled width of the progress track in pixels.
    pub progress_fill_px: f32,
    pub comments: Vec<CommentLine>,
}

/// Builds draw data for the overlay; `None` when the video left the catalog.
pub fn build_detail_model(
    snapshot: &DetailSnapshot,
    catalog: &Catalog,
    track_width_px: f32,
    now: DateTime<Utc>,
) -> Option<DetailRenderModel> {
    let video = catalog.video_by_id(&snapshot.video_id)?;
    let flags = CardFlags {
        playing: snapshot.playing,
        muted: snapshot.muted,
        expanded: true,
    };
    let progress = snapshot.progress.clamp(0.0, 100.0);

    Some(DetailRenderModel {
        card: build_card_model(&video, catalog, flags, now),
        playing: snapshot.playing,
        muted: snapshot.muted,
        volume: snapshot.volume,
        progress,
        progress_fill_px: track_width_px.max(0.0) * progress / 100.0,
        comments: video
            .comments
            .iter()
            .map(|comment| CommentLine {
                author_name: comment.author_name.clone(),
                text: comment.text.clone(),
                likes: format_number(comment.likes),
                posted: format_time_ago(comment.posted_at, now),
            })
            .collect(),
    })
}

/// Maps a pointer X position over the progress track to a seek fraction.
///
/// Positions outside the track are clamped; a degenerate track maps to `0`.
///
/// # Example
/// ```
/// use view::widgets::detail::seek_fraction_at_x;
///
/// assert_eq!(seek_fraction_at_x(50.0, 200.0), 0.25);
/// assert_eq!(seek_fraction_at_x(-10.0, 200.0), 0.0);
/// assert_eq!(seek_fraction_at_x(250.0, 200.0), 1.0);
/// ```
pub fn seek_fraction_at_x(x_px: f32, width_px: f32) -> f32 {
    if width_px.is_nan() || width_px <= 0.0 || !x_px.is_finite() {
        return 0.0;
    }
    (x_px / width_px).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use catalog::Catalog;
    use chrono::{TimeZone, Utc};
    use engine::DetailSnapshot;

    use super::{build_detail_model, seek_fraction_at_x};

    fn travel_catalog() -> Catalog {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/travel-catalog.json");
        Catalog::from_json_file(path).expect("bundled catalog should load")
    }

    fn snapshot(video_id: &str, progress: f32) -> DetailSnapshot {
        DetailSnapshot {
            video_id: video_id.to_owned(),
            playing: true,
            muted: false,
            volume: 1.0,
            progress,
        }
    }

    #[test]
    fn detail_model_fills_progress_track_and_lists_comments() {
        let catalog = travel_catalog();
        let now = Utc
            .with_ymd_and_hms(2024, 4, 3, 12, 0, 0)
            .single()
            .expect("valid timestamp");

        let model = build_detail_model(&snapshot("v1", 25.0), &catalog, 400.0, now)
            .expect("v1 is in the catalog");

        assert_eq!(model.progress_fill_px, 100.0);
        assert!(model.card.expanded);
        assert!(model.card.travel.is_some());
        assert_eq!(model.comments.len(), 1);
        assert_eq!(model.comments[0].author_name, "Sam");
        assert_eq!(model.comments[0].posted, "2 hours ago");
    }

    #[test]
    fn detail_model_for_missing_video_is_none() {
        let catalog = travel_catalog();

        let model = build_detail_model(&snapshot("nope", 0.0), &catalog, 400.0, Utc::now());

        assert!(model.is_none());
    }

    #[test]
    fn seek_fraction_handles_degenerate_tracks() {
        assert_eq!(seek_fraction_at_x(10.0, 0.0), 0.0);
        assert_eq!(seek_fraction_at_x(10.0, f32::NAN), 0.0);
        assert_eq!(seek_fraction_at_x(f32::NAN, 100.0), 0.0);
        assert_eq!(seek_fraction_at_x(100.0, 100.0), 1.0);
    }
}
