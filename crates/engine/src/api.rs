use std::collections::BTreeSet;
use std::sync::Arc;

use catalog::{Catalog, VideoEntity, VideoId};
use tracing::{debug, info, warn};

use crate::config::FeedConfig;
use crate::detail::DetailSession;
use crate::error::{EngineError, Result};
use crate::pagination::{LoadOutcome, LoadTicket, Paginator};
use crate::platform::{MediaPlatform, PlayerSlot};
use crate::playback::{PlaybackScheduler, PlayerTransition};
use crate::query::{CategoryFilter, FilterState, SortMode, query};

/// Commands accepted by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Replaces the whole filter selection and restarts paging.
    SetFilter(FilterState),
    SetCategory(CategoryFilter),
    SetSearch(String),
    SetSort(SortMode),
    /// Resets category and search, keeping the sort mode.
    ClearFilters,
    /// Sent when the sentinel after the last card becomes visible.
    LoadMore,
    /// Delivers the page requested by an earlier `Event::LoadScheduled`.
    CompleteLoad(LoadTicket),
    MountPlayer {
        video_id: VideoId,
    },
    UnmountPlayer {
        video_id: VideoId,
    },
    TogglePlay {
        video_id: VideoId,
    },
    /// Visibility ratio of a card player after a threshold crossing.
    Intersection {
        video_id: VideoId,
        ratio: f32,
    },
    SetMuted {
        muted: bool,
    },
    ToggleMute,
    ToggleExpanded {
        video_id: VideoId,
    },
    /// Opens the detail overlay for one video; feed playback is suspended
    /// until `CloseDetail`.
    OpenDetail {
        video_id: VideoId,
    },
    CloseDetail,
    DetailTogglePlay,
    DetailToggleMute,
    DetailSetVolume {
        volume: f32,
    },
    /// Seeks the detail player to `fraction` of its length.
    DetailSeek {
        fraction: f32,
    },
    /// Time-update tick from the detail player.
    DetailTimeUpdate,
    /// Play, pause or ended notification from the detail player.
    DetailPlayerState {
        playing: bool,
    },
}

/// Events emitted by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    FeedChanged(FeedSnapshot),
    /// A page load started; complete it with `Command::CompleteLoad` once the
    /// simulated latency has elapsed.
    LoadScheduled(LoadTicket),
    PlaybackChanged(PlaybackSnapshot),
    PlaybackRejected { video_id: VideoId },
    ExpandedChanged { video_id: VideoId, expanded: bool },
    DetailChanged(Option<DetailSnapshot>),
    Error(EngineErrorEvent),
}

/// User-facing error category emitted as an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineErrorKind {
    DetailSessionNotOpen,
    Other,
}

impl From<&EngineError> for EngineErrorKind {
    fn from(value: &EngineError) -> Self {
        match value {
            EngineError::DetailSessionNotOpen => Self::DetailSessionNotOpen,
            _ => Self::Other,
        }
    }
}

/// User-facing error payload emitted as an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineErrorEvent {
    pub kind: EngineErrorKind,
    pub message: String,
}

impl EngineErrorEvent {
    pub fn from_error(error: &EngineError) -> Self {
        Self {
            kind: EngineErrorKind::from(error),
            message: error.to_string(),
        }
    }
}

/// Immutable view of the feed window consumed by the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSnapshot {
    pub filter: FilterState,
    pub videos: Vec<Arc<VideoEntity>>,
    pub total_results: usize,
    pub page: usize,
    pub has_more: bool,
    pub is_loading_more: bool,
}

/// Immutable view of feed playback consumed by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackSnapshot {
    pub active_id: Option<VideoId>,
    pub muted: bool,
    /// True while the detail overlay owns playback.
    pub suspended: bool,
}

/// Immutable view of the detail overlay consumed by the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailSnapshot {
    pub video_id: VideoId,
    pub playing: bool,
    pub muted: bool,
    pub volume: f32,
    pub progress: f32,
}

/// Feed controller: owns filter, paging, feed playback and the detail session.
#[derive(Debug)]
pub struct Engine<M: MediaPlatform> {
    catalog: Arc<Catalog>,
    platform: M,
    config: FeedConfig,
    filter: FilterState,
    paginator: Paginator,
    scheduler: PlaybackScheduler<M::Player, M::Observer>,
    expanded: BTreeSet<VideoId>,
    detail: Option<DetailSession<M::Player>>,
}

impl<M> Engine<M>
where
    M: MediaPlatform,
{
    /// Creates an engine showing the first page for the default filter.
    pub fn new(catalog: Arc<Catalog>, mut platform: M, config: FeedConfig) -> Result<Self> {
        config.validate()?;
        let observer = platform.visibility_observer(config.autoplay_threshold);
        let scheduler =
            PlaybackScheduler::new(observer, config.start_muted, config.autoplay_threshold);
        let filter = FilterState::default();
        let mut paginator = Paginator::new(config.page_size);
        paginator.reset(query(&catalog, &filter, config.search_composition));

        Ok(Self {
            catalog,
            platform,
            config,
            filter,
            paginator,
            scheduler,
            expanded: BTreeSet::new(),
            detail: None,
        })
    }

    /// Applies one command and returns emitted events.
    pub fn handle_command(&mut self, command: Command) -> Result<Vec<Event>> {
        match command {
            Command::SetFilter(filter) => self.set_filter(filter),
            Command::SetCategory(category) => self.set_filter(FilterState {
                category,
                ..self.filter.clone()
            }),
            Command::SetSearch(search) => self.set_filter(FilterState {
                search,
                ..self.filter.clone()
            }),
            Command::SetSort(sort) => self.set_filter(FilterState {
                sort,
                ..self.filter.clone()
            }),
            Command::ClearFilters => self.set_filter(FilterState {
                sort: self.filter.sort,
                ..FilterState::default()
            }),
            Command::LoadMore => self.load_more(),
            Command::CompleteLoad(ticket) => self.complete_load(ticket),
            Command::MountPlayer { video_id } => self.mount_player(&video_id),
            Command::UnmountPlayer { video_id } => {
                let transitions = self.scheduler.unmount(&video_id);
                Ok(self.playback_events(transitions))
            }
            Command::TogglePlay { video_id } => {
                let transitions = self.scheduler.user_toggle_play(&video_id);
                Ok(self.playback_events(transitions))
            }
            Command::Intersection { video_id, ratio } => {
                let transitions = self.scheduler.on_intersection(&video_id, ratio);
                Ok(self.playback_events(transitions))
            }
            Command::SetMuted { muted } => self.set_muted(muted),
            Command::ToggleMute => self.set_muted(!self.scheduler.is_muted()),
            Command::ToggleExpanded { video_id } => Ok(vec![self.toggle_expanded(video_id)]),
            Command::OpenDetail { video_id } => self.open_detail(&video_id),
            Command::CloseDetail => self.close_detail(),
            Command::DetailTogglePlay => self.with_detail(|session| session.toggle_play()),
            Command::DetailToggleMute => self.with_detail(|session| session.toggle_mute()),
            Command::DetailSetVolume { volume } => {
                self.with_detail(|session| session.set_volume(volume))
            }
            Command::DetailSeek { fraction } => self.with_detail(|session| session.seek(fraction)),
            Command::DetailTimeUpdate => self.with_detail(|session| session.sync_progress()),
            Command::DetailPlayerState { playing } => {
                self.with_detail(|session| session.player_state_changed(playing))
            }
        }
    }

    /// Current feed window.
    pub fn feed_snapshot(&self) -> FeedSnapshot {
        FeedSnapshot {
            filter: self.filter.clone(),
            videos: self.paginator.visible().to_vec(),
            total_results: self.paginator.results().len(),
            page: self.paginator.page(),
            has_more: self.paginator.has_more(),
            is_loading_more: self.paginator.is_loading_more(),
        }
    }

    pub fn playback_snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            active_id: self.scheduler.active_id().map(str::to_owned),
            muted: self.scheduler.is_muted(),
            suspended: self.scheduler.is_suspended(),
        }
    }

    pub fn detail_snapshot(&self) -> Option<DetailSnapshot> {
        self.detail.as_ref().map(|session| DetailSnapshot {
            video_id: session.video_id().to_owned(),
            playing: session.is_playing(),
            muted: session.is_muted(),
            volume: session.volume(),
            progress: session.progress(),
        })
    }

    /// Ids of cards showing their extended description.
    pub fn expanded(&self) -> &BTreeSet<VideoId> {
        &self.expanded
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    fn set_filter(&mut self, filter: FilterState) -> Result<Vec<Event>> {
        let results = query(&self.catalog, &filter, self.config.search_composition);
        self.paginator.reset(results);
        info!(
            category = ?filter.category,
            search = %filter.search,
            sort = ?filter.sort,
            results = self.paginator.results().len(),
            "filter applied"
        );
        self.filter = filter;

        Ok(vec![Event::FeedChanged(self.feed_snapshot())])
    }

    fn load_more(&mut self) -> Result<Vec<Event>> {
        let Some(ticket) = self.paginator.begin_load() else {
            debug!(
                has_more = self.paginator.has_more(),
                is_loading_more = self.paginator.is_loading_more(),
                "load request ignored"
            );
            return Ok(Vec::new());
        };

        debug!(page = ticket.page, generation = ticket.generation, "page load scheduled");
        Ok(vec![
            Event::FeedChanged(self.feed_snapshot()),
            Event::LoadScheduled(ticket),
        ])
    }

    fn complete_load(&mut self, ticket: LoadTicket) -> Result<Vec<Event>> {
        match self.paginator.complete_load(ticket) {
            LoadOutcome::Stale => return Ok(Vec::new()),
            LoadOutcome::Appended { count } => info!(
                page = self.paginator.page(),
                count,
                visible = self.paginator.visible().len(),
                "page appended"
            ),
            LoadOutcome::Exhausted => debug!(page = self.paginator.page(), "feed exhausted"),
        }
        Ok(vec![Event::FeedChanged(self.feed_snapshot())])
    }

    fn mount_player(&mut self, video_id: &str) -> Result<Vec<Event>> {
        let Some(video) = self.catalog.video_by_id(video_id) else {
            warn!(video_id, "mount ignored for unknown video");
            return Ok(Vec::new());
        };
        let Some(player) = self.platform.attach_player(PlayerSlot::Feed(&video)) else {
            debug!(video_id, "no player element to mount");
            return Ok(Vec::new());
        };

        let transitions = self.scheduler.mount(video_id, player);
        Ok(self.playback_events(transitions))
    }

    fn set_muted(&mut self, muted: bool) -> Result<Vec<Event>> {
        self.scheduler.set_muted(muted);
        debug!(muted, "global mute changed");
        Ok(vec![Event::PlaybackChanged(self.playback_snapshot())])
    }

    fn toggle_expanded(&mut self, video_id: VideoId) -> Event {
        let expanded = if self.expanded.remove(&video_id) {
            false
        } else {
            self.expanded.insert(video_id.clone());
            true
        };
        Event::ExpandedChanged { video_id, expanded }
    }

    fn open_detail(&mut self, video_id: &str) -> Result<Vec<Event>> {
        if let Some(previous) = self.detail.take() {
            previous.close();
        }

        let Some(video) = self.catalog.video_by_id(video_id) else {
            warn!(video_id, "detail requested for unknown video");
            let transitions = self.scheduler.suspend();
            self.scheduler.resume();
            let mut events = self.playback_events(transitions);
            events.push(Event::DetailChanged(None));
            return Ok(events);
        };

        let transitions = self.scheduler.suspend();
        let Some(player) = self.platform.attach_player(PlayerSlot::Detail(&video)) else {
            debug!(video_id, "no detail player element");
            self.scheduler.resume();
            let mut events = self.playback_events(transitions);
            events.push(Event::DetailChanged(None));
            return Ok(events);
        };

        let session = DetailSession::open(video_id, player);
        info!(video_id, playing = session.is_playing(), "detail opened");
        self.detail = Some(session);

        let mut events = vec![Event::PlaybackChanged(self.playback_snapshot())];
        events.extend(rejections(&transitions));
        events.push(Event::DetailChanged(self.detail_snapshot()));
        Ok(events)
    }

    fn close_detail(&mut self) -> Result<Vec<Event>> {
        let session = self.detail.take().ok_or(EngineError::DetailSessionNotOpen)?;
        info!(video_id = session.video_id(), "detail closing");
        session.close();
        self.scheduler.resume();

        Ok(vec![
            Event::DetailChanged(None),
            Event::PlaybackChanged(self.playback_snapshot()),
        ])
    }

    fn with_detail(
        &mut self,
        apply: impl FnOnce(&mut DetailSession<M::Player>),
    ) -> Result<Vec<Event>> {
        let session = self.detail.as_mut().ok_or(EngineError::DetailSessionNotOpen)?;
        apply(session);
        Ok(vec![Event::DetailChanged(self.detail_snapshot())])
    }

    fn playback_events(&self, transitions: Vec<PlayerTransition>) -> Vec<Event> {
        if transitions.is_empty() {
            return Vec::new();
        }
        let mut events = vec![Event::PlaybackChanged(self.playback_snapshot())];
        events.extend(rejections(&transitions));
        events
    }
}

fn rejections(transitions: &[PlayerTransition]) -> impl Iterator<Item = Event> + '_ {
    transitions.iter().filter_map(|transition| match transition {
        PlayerTransition::Rejected(video_id) => Some(Event::PlaybackRejected {
            video_id: video_id.clone(),
        }),
        _ => None,
    })
}
