use catalog::VideoId;
use tracing::{debug, warn};

use crate::platform::PlayerHandle;

/// Independent playback context of the detail overlay.
///
/// Volume and mute are coupled: a zero volume implies muted, and unmuting a
/// zero-volume session is refused until a non-zero volume is set.
#[derive(Debug)]
pub struct DetailSession<P> {
    video_id: VideoId,
    player: P,
    playing: bool,
    muted: bool,
    volume: f32,
    progress: f32,
}

impl<P> DetailSession<P>
where
    P: PlayerHandle,
{
    /// Binds a session to `video_id` and tries to autoplay it.
    ///
    /// A refused autoplay leaves the session paused.
    pub fn open(video_id: &str, mut player: P) -> Self {
        player.set_volume(1.0);
        player.set_muted(false);
        let playing = match player.play() {
            Ok(()) => true,
            Err(rejected) => {
                warn!(video_id, reason = %rejected.reason, "detail autoplay refused");
                false
            }
        };

        Self {
            video_id: video_id.to_owned(),
            player,
            playing,
            muted: false,
            volume: 1.0,
            progress: 0.0,
        }
    }

    pub fn toggle_play(&mut self) {
        if self.playing {
            self.player.pause();
            self.playing = false;
            return;
        }
        match self.player.play() {
            Ok(()) => self.playing = true,
            Err(rejected) => {
                warn!(video_id = %self.video_id, reason = %rejected.reason, "detail play refused");
            }
        }
    }

    pub fn toggle_mute(&mut self) {
        if self.muted && self.volume <= 0.0 {
            debug!(video_id = %self.video_id, "unmute refused at zero volume");
            return;
        }
        self.muted = !self.muted;
        self.player.set_muted(self.muted);
    }

    /// Sets volume clamped to `[0, 1]`; zero mutes, non-zero unmutes.
    pub fn set_volume(&mut self, volume: f32) {
        let volume = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
        self.volume = volume;
        self.player.set_volume(volume);

        if volume == 0.0 {
            if !self.muted {
                self.muted = true;
                self.player.set_muted(true);
            }
        } else if self.muted {
            self.muted = false;
            self.player.set_muted(false);
        }
    }

    /// Refreshes progress from the player's position.
    pub fn sync_progress(&mut self) {
        self.progress = progress_percent(self.player.current_time(), self.player.duration());
    }

    /// Seeks to `fraction` of the media length; no-op while the length is unknown.
    pub fn seek(&mut self, fraction: f32) {
        let Some(duration) = known_duration(self.player.duration()) else {
            debug!(video_id = %self.video_id, "seek ignored without a known duration");
            return;
        };
        let fraction = if fraction.is_nan() { 0.0 } else { f64::from(fraction) };
        let target = (fraction * duration).clamp(0.0, duration);
        self.player.seek(target);
        self.sync_progress();
    }

    /// Records a play/pause/ended notification from the element itself.
    pub fn player_state_changed(&mut self, playing: bool) {
        self.playing = playing;
    }

    /// Pauses the player and ends the session.
    pub fn close(mut self) {
        self.player.pause();
        debug!(video_id = %self.video_id, "detail session closed");
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Play position as a percentage in `[0, 100]`.
    pub fn progress(&self) -> f32 {
        self.progress
    }
}

fn known_duration(duration: Option<f64>) -> Option<f64> {
    duration.filter(|duration| duration.is_finite() && *duration > 0.0)
}

/// `current / duration` as a percentage; 0 whenever the length is unknown.
pub fn progress_percent(current_time: f64, duration: Option<f64>) -> f32 {
    let Some(duration) = known_duration(duration) else {
        return 0.0;
    };
    if !current_time.is_finite() {
        return 0.0;
    }
    ((current_time / duration) * 100.0).clamp(0.0, 100.0) as f32
}
