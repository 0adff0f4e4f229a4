use engine::{MediaPlatform, PlaybackRejected, PlayerHandle, PlayerSlot, VisibilityObserver};
use tracing::debug;

/// Player for surfaces without media output, such as a terminal.
///
/// Tracks play state and position only; the media length comes from the
/// catalog record.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessPlayer {
    label: String,
    playing: bool,
    muted: bool,
    volume: f32,
    position: f64,
    duration: f64,
}

impl HeadlessPlayer {
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }
}

impl PlayerHandle for HeadlessPlayer {
    fn play(&mut self) -> Result<(), PlaybackRejected> {
        self.playing = true;
        debug!(player = %self.label, "headless play");
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
        debug!(player = %self.label, "headless pause");
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn seek(&mut self, seconds: f64) {
        self.position = seconds.clamp(0.0, self.duration);
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn duration(&self) -> Option<f64> {
        (self.duration > 0.0).then_some(self.duration)
    }
}

/// Observer that never reports intersections on its own; the caller sends
/// `Command::Intersection` explicitly.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessObserver;

impl VisibilityObserver for HeadlessObserver {
    fn observe(&mut self, video_id: &str) {
        debug!(video_id, "headless observe");
    }

    fn unobserve(&mut self, video_id: &str) {
        debug!(video_id, "headless unobserve");
    }
}

/// Media platform for terminal and test surfaces.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessPlatform;

impl MediaPlatform for HeadlessPlatform {
    type Player = HeadlessPlayer;
    type Observer = HeadlessObserver;

    fn attach_player(&mut self, slot: PlayerSlot<'_>) -> Option<Self::Player> {
        let label = match slot {
            PlayerSlot::Feed(video) => video.id.clone(),
            PlayerSlot::Detail(video) => format!("detail:{}", video.id),
        };
        Some(HeadlessPlayer {
            label,
            playing: false,
            muted: false,
            volume: 1.0,
            position: 0.0,
            duration: f64::from(slot.video().duration),
        })
    }

    fn visibility_observer(&mut self, _threshold: f32) -> Self::Observer {
        HeadlessObserver
    }
}
