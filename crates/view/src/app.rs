use std::collections::BTreeSet;
use std::sync::Arc;

use catalog::{Catalog, Category, VideoId};
use chrono::{DateTime, Utc};
use engine::{
    CategoryFilter, Command, DetailSnapshot, Event, FeedConfig, FeedSnapshot, PlaybackSnapshot,
    SortMode,
};
use tracing::debug;

use crate::widgets::card::{CardFlags, CardRenderModel, build_card_model};
use crate::widgets::detail::{DetailRenderModel, build_detail_model, seek_fraction_at_x};

/// UI message consumed by update.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Engine(Event),
    SearchChanged(String),
    /// Category tab value; `"all"` selects every category.
    CategorySelected(String),
    SortSelected(SortMode),
    ClearFiltersPressed,
    FilterPanelToggled,
    /// Visible fraction of the end-of-list sentinel.
    SentinelVisibility(f32),
    CardMounted(VideoId),
    CardUnmounted(VideoId),
    CardVisibility {
        video_id: VideoId,
        ratio: f32,
    },
    PlayPressed(VideoId),
    ExpandPressed(VideoId),
    CardSelected(VideoId),
    MuteToggled,
    DetailClosed,
    DetailPlayPressed,
    DetailMutePressed,
    DetailVolumeChanged(f32),
    /// Pointer press on the detail progress track, relative to its left edge.
    DetailProgressPressed {
        x_px: f32,
        width_px: f32,
    },
    DetailTimeUpdated,
    DetailPlaybackStateChanged(bool),
    Scrolled(f32),
    ScrollToTopPressed,
}

/// UI state for the travel feed screen.
#[derive(Debug, Clone)]
pub struct AppState {
    catalog: Arc<Catalog>,
    sentinel_threshold: f32,
    scroll_to_top_offset: f32,
    feed: Option<FeedSnapshot>,
    playback: Option<PlaybackSnapshot>,
    detail: Option<DetailSnapshot>,
    expanded: BTreeSet<VideoId>,
    search_input: String,
    filters_open: bool,
    load_requested: bool,
    scroll_offset: f32,
    notice: Option<String>,
}

impl AppState {
    /// Creates state for a feed over `catalog`, tuned by `config`.
    pub fn new(catalog: Arc<Catalog>, config: &FeedConfig) -> Self {
        Self {
            catalog,
            sentinel_threshold: config.sentinel_threshold,
            scroll_to_top_offset: config.scroll_to_top_offset,
            feed: None,
            playback: None,
            detail: None,
            expanded: BTreeSet::new(),
            search_input: String::new(),
            filters_open: false,
            load_requested: false,
            scroll_offset: 0.0,
            notice: None,
        }
    }

    /// Applies one UI message and returns outgoing engine commands.
    pub fn update(&mut self, message: Message) -> Vec<Command> {
        match message {
            Message::Engine(event) => {
                self.apply_engine_event(event);
                Vec::new()
            }
            Message::SearchChanged(search) => {
                self.search_input = search.clone();
                vec![Command::SetSearch(search)]
            }
            Message::CategorySelected(tab) => {
                vec![Command::SetCategory(CategoryFilter::from_tab(&tab))]
            }
            Message::SortSelected(sort) => vec![Command::SetSort(sort)],
            Message::ClearFiltersPressed => {
                self.search_input.clear();
                vec![Command::ClearFilters]
            }
            Message::FilterPanelToggled => {
                self.filters_open = !self.filters_open;
                Vec::new()
            }
            Message::SentinelVisibility(ratio) => self.sentinel_visible(ratio),
            Message::CardMounted(video_id) => vec![Command::MountPlayer { video_id }],
            Message::CardUnmounted(video_id) => vec![Command::UnmountPlayer { video_id }],
            Message::CardVisibility { video_id, ratio } => {
                vec![Command::Intersection { video_id, ratio }]
            }
            Message::PlayPressed(video_id) => vec![Command::TogglePlay { video_id }],
            Message::ExpandPressed(video_id) => vec![Command::ToggleExpanded { video_id }],
            Message::CardSelected(video_id) => vec![Command::OpenDetail { video_id }],
            Message::MuteToggled => vec![Command::ToggleMute],
            Message::DetailClosed => self.detail_command(Command::CloseDetail),
            Message::DetailPlayPressed => self.detail_command(Command::DetailTogglePlay),
            Message::DetailMutePressed => self.detail_command(Command::DetailToggleMute),
            Message::DetailVolumeChanged(volume) => {
                self.detail_command(Command::DetailSetVolume { volume })
            }
            Message::DetailProgressPressed { x_px, width_px } => {
                self.detail_command(Command::DetailSeek {
                    fraction: seek_fraction_at_x(x_px, width_px),
                })
            }
            Message::DetailTimeUpdated => self.detail_command(Command::DetailTimeUpdate),
            Message::DetailPlaybackStateChanged(playing) => {
                self.detail_command(Command::DetailPlayerState { playing })
            }
            Message::Scrolled(offset) => {
                self.scroll_offset = offset.max(0.0);
                Vec::new()
            }
            Message::ScrollToTopPressed => {
                self.scroll_offset = 0.0;
                Vec::new()
            }
        }
    }

    /// Render data for every card in the feed window.
    pub fn card_models(&self, now: DateTime<Utc>) -> Vec<CardRenderModel> {
        let Some(feed) = &self.feed else {
            return Vec::new();
        };
        let active_id = self
            .playback
            .as_ref()
            .and_then(|playback| playback.active_id.as_deref());
        let muted = self.playback.as_ref().is_none_or(|playback| playback.muted);

        feed.videos
            .iter()
            .map(|video| {
                let flags = CardFlags {
                    playing: active_id == Some(video.id.as_str()),
                    muted,
                    expanded: self.expanded.contains(&video.id),
                };
                build_card_model(video, &self.catalog, flags, now)
            })
            .collect()
    }

    /// Render data for the detail overlay, when open.
    pub fn detail_model(&self, track_width_px: f32, now: DateTime<Utc>) -> Option<DetailRenderModel> {
        self.detail
            .as_ref()
            .and_then(|detail| build_detail_model(detail, &self.catalog, track_width_px, now))
    }

    /// Category tabs in catalog order, preceded by the implicit `all` tab.
    pub fn category_tabs(&self) -> Vec<(String, String)> {
        std::iter::once((String::from("all"), String::from("All")))
            .chain(
                self.catalog
                    .categories()
                    .iter()
                    .map(|Category { id, name, .. }| (id.clone(), name.clone())),
            )
            .collect()
    }

    pub fn feed(&self) -> Option<&FeedSnapshot> {
        self.feed.as_ref()
    }

    /// True once a filter produced no results; the UI offers "Clear Filters".
    pub fn is_empty_result(&self) -> bool {
        self.feed
            .as_ref()
            .is_some_and(|feed| feed.total_results == 0)
    }

    /// Shows the loading row under the last card.
    pub fn is_loading_more(&self) -> bool {
        self.feed.as_ref().is_some_and(|feed| feed.is_loading_more)
    }

    /// Shows the end-of-feed marker.
    pub fn is_exhausted(&self) -> bool {
        self.feed
            .as_ref()
            .is_some_and(|feed| !feed.has_more && !feed.videos.is_empty())
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn filters_open(&self) -> bool {
        self.filters_open
    }

    pub fn is_muted(&self) -> bool {
        self.playback.as_ref().is_none_or(|playback| playback.muted)
    }

    pub fn is_detail_open(&self) -> bool {
        self.detail.is_some()
    }

    /// Whether the scroll-to-top button is shown.
    pub fn show_scroll_to_top(&self) -> bool {
        self.scroll_offset > self.scroll_to_top_offset
    }

    /// Latest user-facing notice, such as a refused autoplay or a failed command.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    fn sentinel_visible(&mut self, ratio: f32) -> Vec<Command> {
        if ratio < self.sentinel_threshold || self.load_requested {
            return Vec::new();
        }
        let Some(feed) = &self.feed else {
            return Vec::new();
        };
        if !feed.has_more || feed.is_loading_more {
            return Vec::new();
        }

        self.load_requested = true;
        vec![Command::LoadMore]
    }

    fn detail_command(&self, command: Command) -> Vec<Command> {
        if self.detail.is_none() {
            debug!(?command, "detail control ignored without an open overlay");
            return Vec::new();
        }
        vec![command]
    }

    fn apply_engine_event(&mut self, event: Event) {
        match event {
            Event::FeedChanged(feed) => {
                self.load_requested = false;
                self.feed = Some(feed);
            }
            Event::LoadScheduled(_) => {}
            Event::PlaybackChanged(playback) => {
                self.playback = Some(playback);
            }
            Event::PlaybackRejected { video_id } => {
                self.notice = Some(format!("playback of {video_id} was blocked"));
            }
            Event::ExpandedChanged { video_id, expanded } => {
                if expanded {
                    self.expanded.insert(video_id);
                } else {
                    self.expanded.remove(&video_id);
                }
            }
            Event::DetailChanged(detail) => {
                self.detail = detail;
            }
            Event::Error(error) => {
                self.notice = Some(error.message);
            }
        }
    }
}
