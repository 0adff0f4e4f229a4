#![allow(dead_code)]

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use catalog::{Catalog, Location, VideoEntity};
use chrono::{TimeZone, Utc};
use engine::{
    FeedConfig, MediaPlatform, PlaybackRejected, PlayerHandle, PlayerSlot, VisibilityObserver,
};

/// Which players are currently playing, across feed and detail.
#[derive(Debug, Clone, Default)]
pub struct PlayingSet(Arc<Mutex<BTreeSet<String>>>);

impl PlayingSet {
    pub fn snapshot(&self) -> Vec<String> {
        self.0
            .lock()
            .expect("lock playing set")
            .iter()
            .cloned()
            .collect()
    }

    fn insert(&self, label: &str) {
        self.0
            .lock()
            .expect("lock playing set")
            .insert(label.to_owned());
    }

    fn remove(&self, label: &str) {
        self.0.lock().expect("lock playing set").remove(label);
    }
}

#[derive(Debug)]
pub struct FakePlayer {
    label: String,
    playing: PlayingSet,
    reject: bool,
    position: f64,
}

impl PlayerHandle for FakePlayer {
    fn play(&mut self) -> Result<(), PlaybackRejected> {
        if self.reject {
            return Err(PlaybackRejected::new("autoplay blocked"));
        }
        self.playing.insert(&self.label);
        Ok(())
    }

    fn pause(&mut self) {
        self.playing.remove(&self.label);
    }

    fn set_muted(&mut self, _muted: bool) {}

    fn set_volume(&mut self, _volume: f32) {}

    fn seek(&mut self, seconds: f64) {
        self.position = seconds;
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn duration(&self) -> Option<f64> {
        Some(90.0)
    }
}

#[derive(Debug, Default)]
pub struct FakeObserver;

impl VisibilityObserver for FakeObserver {
    fn observe(&mut self, _video_id: &str) {}

    fn unobserve(&mut self, _video_id: &str) {}
}

/// Platform whose players only track whether they are playing.
/// Detail players are labelled `detail:<id>`.
#[derive(Debug, Default)]
pub struct FakePlatform {
    pub playing: PlayingSet,
    pub rejecting: BTreeSet<String>,
}

impl FakePlatform {
    pub fn rejecting(labels: &[&str]) -> Self {
        Self {
            rejecting: labels.iter().map(|label| (*label).to_owned()).collect(),
            ..Self::default()
        }
    }
}

impl MediaPlatform for FakePlatform {
    type Player = FakePlayer;
    type Observer = FakeObserver;

    fn attach_player(&mut self, slot: PlayerSlot<'_>) -> Option<Self::Player> {
        let label = match slot {
            PlayerSlot::Feed(video) => video.id.clone(),
            PlayerSlot::Detail(video) => format!("detail:{}", video.id),
        };
        Some(FakePlayer {
            reject: self.rejecting.contains(&label),
            label,
            playing: self.playing.clone(),
            position: 0.0,
        })
    }

    fn visibility_observer(&mut self, _threshold: f32) -> Self::Observer {
        FakeObserver
    }
}

pub fn catalog_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/travel-catalog.json")
}

pub fn travel_catalog() -> Arc<Catalog> {
    Arc::new(Catalog::from_json_file(catalog_path()).expect("bundled catalog should load"))
}

/// `count` videos `v0..` with equal views; `trending` picks the trending ones.
pub fn generated_catalog(count: usize, trending: impl Fn(usize) -> bool) -> Arc<Catalog> {
    let videos = (0..count)
        .map(|index| VideoEntity {
            id: format!("v{index}"),
            title: format!("Clip {index}"),
            description: String::from("Ridge walk"),
            tags: vec![String::from("hiking")],
            category_id: String::from("nature"),
            author_id: String::from("a1"),
            location: Location {
                name: String::from("Dolomites"),
                country: String::from("Italy"),
            },
            views: 500,
            likes: 5,
            comment_count: 0,
            published_at: Utc
                .with_ymd_and_hms(2024, 6, 1, 0, 0, 0)
                .single()
                .expect("valid timestamp"),
            duration: 75,
            featured: false,
            trending: trending(index),
            video_url: format!("/videos/v{index}.mp4"),
            thumbnail_url: String::new(),
            travel_info: None,
            comments: Vec::new(),
        })
        .collect();
    Arc::new(Catalog::new(videos, Vec::new(), Vec::new()).expect("generated catalog is valid"))
}

pub fn ids(videos: &[Arc<VideoEntity>]) -> Vec<String> {
    videos.iter().map(|video| video.id.clone()).collect()
}

pub fn default_config() -> FeedConfig {
    FeedConfig::default()
}
