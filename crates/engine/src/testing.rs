//! Recording doubles shared by the engine unit tests.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};

use catalog::{Catalog, Location, VideoEntity};

use crate::platform::{
    MediaPlatform, PlaybackRejected, PlayerHandle, PlayerSlot, VisibilityObserver,
};

/// One call received by a mock player, labelled by player.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PlayerCall {
    Play(String),
    Pause(String),
    Muted(String, bool),
    Volume(String, f32),
    Seek(String, f64),
}

/// State shared between a mock platform and every player it hands out.
#[derive(Debug, Clone, Default)]
pub(crate) struct Recorder {
    pub calls: Arc<Mutex<Vec<PlayerCall>>>,
    pub playing: Arc<Mutex<BTreeSet<String>>>,
    pub observed: Arc<Mutex<BTreeSet<String>>>,
}

impl Recorder {
    pub fn calls(&self) -> Vec<PlayerCall> {
        self.calls.lock().expect("lock player calls").clone()
    }

    pub fn playing(&self) -> Vec<String> {
        self.playing
            .lock()
            .expect("lock playing set")
            .iter()
            .cloned()
            .collect()
    }

    pub fn observed(&self) -> Vec<String> {
        self.observed
            .lock()
            .expect("lock observed set")
            .iter()
            .cloned()
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().expect("lock player calls").clear();
    }

    fn record(&self, call: PlayerCall) {
        self.calls.lock().expect("lock player calls").push(call);
    }
}

#[derive(Debug)]
pub(crate) struct MockPlayer {
    label: String,
    recorder: Recorder,
    reject_play: bool,
    position: f64,
    duration: Option<f64>,
}

impl MockPlayer {
    pub fn new(label: &str, recorder: &Recorder) -> Self {
        Self {
            label: label.to_owned(),
            recorder: recorder.clone(),
            reject_play: false,
            position: 0.0,
            duration: Some(60.0),
        }
    }

    pub fn rejecting(mut self) -> Self {
        self.reject_play = true;
        self
    }

    pub fn with_duration(mut self, duration: Option<f64>) -> Self {
        self.duration = duration;
        self
    }
}

impl PlayerHandle for MockPlayer {
    fn play(&mut self) -> Result<(), PlaybackRejected> {
        self.recorder.record(PlayerCall::Play(self.label.clone()));
        if self.reject_play {
            return Err(PlaybackRejected::new("autoplay blocked"));
        }
        self.recorder
            .playing
            .lock()
            .expect("lock playing set")
            .insert(self.label.clone());
        Ok(())
    }

    fn pause(&mut self) {
        self.recorder.record(PlayerCall::Pause(self.label.clone()));
        self.recorder
            .playing
            .lock()
            .expect("lock playing set")
            .remove(&self.label);
    }

    fn set_muted(&mut self, muted: bool) {
        self.recorder
            .record(PlayerCall::Muted(self.label.clone(), muted));
    }

    fn set_volume(&mut self, volume: f32) {
        self.recorder
            .record(PlayerCall::Volume(self.label.clone(), volume));
    }

    fn seek(&mut self, seconds: f64) {
        self.recorder
            .record(PlayerCall::Seek(self.label.clone(), seconds));
        self.position = seconds;
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }
}

#[derive(Debug)]
pub(crate) struct MockObserver {
    recorder: Recorder,
}

impl MockObserver {
    pub fn new(recorder: &Recorder) -> Self {
        Self {
            recorder: recorder.clone(),
        }
    }
}

impl VisibilityObserver for MockObserver {
    fn observe(&mut self, video_id: &str) {
        self.recorder
            .observed
            .lock()
            .expect("lock observed set")
            .insert(video_id.to_owned());
    }

    fn unobserve(&mut self, video_id: &str) {
        self.recorder
            .observed
            .lock()
            .expect("lock observed set")
            .remove(video_id);
    }
}

/// Platform handing out recording players; detail players are labelled
/// `detail:<id>` so feed and detail playback share one playing set.
#[derive(Debug, Default)]
pub(crate) struct MockPlatform {
    pub recorder: Recorder,
    pub rejecting: BTreeSet<String>,
    pub detail_duration: Option<f64>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self {
            detail_duration: Some(120.0),
            ..Self::default()
        }
    }

    pub fn reject(mut self, label: &str) -> Self {
        self.rejecting.insert(label.to_owned());
        self
    }
}

impl MediaPlatform for MockPlatform {
    type Player = MockPlayer;
    type Observer = MockObserver;

    fn attach_player(&mut self, slot: PlayerSlot<'_>) -> Option<Self::Player> {
        let label = match slot {
            PlayerSlot::Feed(video) => video.id.clone(),
            PlayerSlot::Detail(video) => format!("detail:{}", video.id),
        };
        let mut player = MockPlayer::new(&label, &self.recorder);
        if matches!(slot, PlayerSlot::Detail(_)) {
            player = player.with_duration(self.detail_duration);
        }
        if self.rejecting.contains(&label) {
            player = player.rejecting();
        }
        Some(player)
    }

    fn visibility_observer(&mut self, _threshold: f32) -> Self::Observer {
        MockObserver::new(&self.recorder)
    }
}

/// Catalog of `count` videos `v0..` in index order.
pub(crate) fn sample_catalog(count: usize, trending: impl Fn(usize) -> bool) -> Catalog {
    let videos = (0..count)
        .map(|index| sample_video(index, trending(index)))
        .collect();
    Catalog::new(videos, Vec::new(), Vec::new()).expect("sample catalog is valid")
}

pub(crate) fn sample_video(index: usize, trending: bool) -> VideoEntity {
    VideoEntity {
        id: format!("v{index}"),
        title: format!("Video {index}"),
        description: String::from("Island hopping"),
        tags: vec![String::from("travel")],
        category_id: if index % 2 == 0 { "beach" } else { "nature" }.to_owned(),
        author_id: String::from("a1"),
        location: Location {
            name: String::from("El Nido"),
            country: String::from("Philippines"),
        },
        views: 1_000,
        likes: 10,
        comment_count: 1,
        published_at: Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .unwrap()
            + chrono::Duration::hours(index as i64),
        duration: 60,
        featured: false,
        trending,
        video_url: format!("/videos/v{index}.mp4"),
        thumbnail_url: String::new(),
        travel_info: None,
        comments: Vec::new(),
    }
}
