use std::fmt::{Debug, Display, Formatter};

use catalog::VideoEntity;

/// The platform refused to start playback, for example because of an
/// autoplay policy. Never fatal: the player simply stays paused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackRejected {
    pub reason: String,
}

impl PlaybackRejected {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Display for PlaybackRejected {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "playback rejected: {}", self.reason)
    }
}

impl std::error::Error for PlaybackRejected {}

/// Control surface of one mounted media element.
pub trait PlayerHandle: Debug {
    /// Starts playback from the current position.
    fn play(&mut self) -> Result<(), PlaybackRejected>;

    fn pause(&mut self);

    fn set_muted(&mut self, muted: bool);

    /// Sets output volume in `[0, 1]`.
    fn set_volume(&mut self, volume: f32);

    /// Moves the play position to `seconds`.
    fn seek(&mut self, seconds: f64);

    /// Current play position in seconds.
    fn current_time(&self) -> f64;

    /// Media length in seconds, `None` until the platform knows it.
    fn duration(&self) -> Option<f64>;
}

/// Viewport-intersection subscription for card players.
///
/// The platform reports threshold crossings back to the engine through
/// `Command::Intersection`.
pub trait VisibilityObserver: Debug {
    fn observe(&mut self, video_id: &str);

    fn unobserve(&mut self, video_id: &str);
}

/// Where a player is being attached.
#[derive(Debug, Clone, Copy)]
pub enum PlayerSlot<'a> {
    /// Inline player on a feed card.
    Feed(&'a VideoEntity),
    /// Player inside the detail overlay.
    Detail(&'a VideoEntity),
}

impl<'a> PlayerSlot<'a> {
    pub fn video(&self) -> &'a VideoEntity {
        match *self {
            Self::Feed(video) | Self::Detail(video) => video,
        }
    }
}

/// Media operations required by the engine.
pub trait MediaPlatform {
    type Player: PlayerHandle;
    type Observer: VisibilityObserver;

    /// Returns a handle for the element rendered in `slot`, or `None` when the
    /// element is not available.
    fn attach_player(&mut self, slot: PlayerSlot<'_>) -> Option<Self::Player>;

    /// Creates the observer that reports card visibility around `threshold`.
    fn visibility_observer(&mut self, threshold: f32) -> Self::Observer;
}
