use std::collections::HashMap;

use catalog::VideoId;
use tracing::{debug, warn};

use crate::platform::{PlayerHandle, VisibilityObserver};

/// Player command issued by the scheduler, in issue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerTransition {
    Paused(VideoId),
    Started(VideoId),
    /// The platform refused to start this player; nothing is active.
    Rejected(VideoId),
}

/// Decides which mounted feed player is playing.
///
/// Owns the registry of mounted players. At most one player is active at any
/// time and `active_id` always names it. Explicit user toggles and viewport
/// visibility both funnel through here; visibility never preempts a player
/// that is already active.
#[derive(Debug)]
pub struct PlaybackScheduler<P, O> {
    players: HashMap<VideoId, P>,
    active_id: Option<VideoId>,
    muted: bool,
    suspended: bool,
    autoplay_threshold: f32,
    observer: O,
}

impl<P, O> PlaybackScheduler<P, O>
where
    P: PlayerHandle,
    O: VisibilityObserver,
{
    pub fn new(observer: O, muted: bool, autoplay_threshold: f32) -> Self {
        Self {
            players: HashMap::new(),
            active_id: None,
            muted,
            suspended: false,
            autoplay_threshold,
            observer,
        }
    }

    /// Registers a freshly rendered player and starts observing it.
    ///
    /// The player inherits the current global mute. Mounting an id that is
    /// already mounted replaces the old handle.
    pub fn mount(&mut self, video_id: &str, mut player: P) -> Vec<PlayerTransition> {
        let transitions = if self.players.contains_key(video_id) {
            self.unmount(video_id)
        } else {
            Vec::new()
        };

        player.set_muted(self.muted);
        self.players.insert(video_id.to_owned(), player);
        self.observer.observe(video_id);
        debug!(video_id, mounted = self.players.len(), "player mounted");
        transitions
    }

    /// Drops a player; an active player is paused first.
    pub fn unmount(&mut self, video_id: &str) -> Vec<PlayerTransition> {
        let Some(mut player) = self.players.remove(video_id) else {
            return Vec::new();
        };
        self.observer.unobserve(video_id);

        let mut transitions = Vec::new();
        if self.active_id.as_deref() == Some(video_id) {
            player.pause();
            self.active_id = None;
            transitions.push(PlayerTransition::Paused(video_id.to_owned()));
        }
        debug!(video_id, mounted = self.players.len(), "player unmounted");
        transitions
    }

    /// Click on a card's play button.
    ///
    /// Pauses `video_id` when it is active; otherwise pauses the active player
    /// before starting `video_id`.
    pub fn user_toggle_play(&mut self, video_id: &str) -> Vec<PlayerTransition> {
        if self.suspended {
            debug!(video_id, "toggle ignored while feed playback is suspended");
            return Vec::new();
        }
        if !self.players.contains_key(video_id) {
            debug!(video_id, "toggle ignored for unmounted player");
            return Vec::new();
        }

        if self.active_id.as_deref() == Some(video_id) {
            return self.pause_active();
        }
        let mut transitions = self.pause_active();
        transitions.extend(self.start(video_id));
        transitions
    }

    /// The player crossed the visibility threshold into view.
    pub fn on_visible(&mut self, video_id: &str) -> Vec<PlayerTransition> {
        if self.suspended || self.active_id.is_some() {
            return Vec::new();
        }
        self.start(video_id)
    }

    /// The player dropped below the visibility threshold.
    pub fn on_hidden(&mut self, video_id: &str) -> Vec<PlayerTransition> {
        if self.active_id.as_deref() == Some(video_id) {
            self.pause_active()
        } else {
            Vec::new()
        }
    }

    /// Maps a raw intersection ratio onto `on_visible` / `on_hidden`.
    pub fn on_intersection(&mut self, video_id: &str, ratio: f32) -> Vec<PlayerTransition> {
        if ratio >= self.autoplay_threshold {
            self.on_visible(video_id)
        } else {
            self.on_hidden(video_id)
        }
    }

    /// Applies one mute flag to every mounted player.
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        for player in self.players.values_mut() {
            player.set_muted(muted);
        }
    }

    /// Pauses the active player and blocks feed playback until `resume`.
    ///
    /// Used while the detail overlay owns playback.
    pub fn suspend(&mut self) -> Vec<PlayerTransition> {
        self.suspended = true;
        self.pause_active()
    }

    /// Lifts a suspension without starting anything.
    pub fn resume(&mut self) {
        self.suspended = false;
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn is_mounted(&self, video_id: &str) -> bool {
        self.players.contains_key(video_id)
    }

    pub fn mounted_count(&self) -> usize {
        self.players.len()
    }

    fn pause_active(&mut self) -> Vec<PlayerTransition> {
        let Some(active_id) = self.active_id.take() else {
            return Vec::new();
        };
        if let Some(player) = self.players.get_mut(&active_id) {
            player.pause();
        }
        vec![PlayerTransition::Paused(active_id)]
    }

    fn start(&mut self, video_id: &str) -> Vec<PlayerTransition> {
        debug_assert!(self.active_id.is_none(), "start requires an idle scheduler");
        let Some(player) = self.players.get_mut(video_id) else {
            return Vec::new();
        };

        match player.play() {
            Ok(()) => {
                self.active_id = Some(video_id.to_owned());
                vec![PlayerTransition::Started(video_id.to_owned())]
            }
            Err(rejected) => {
                warn!(video_id, reason = %rejected.reason, "player refused to start");
                vec![PlayerTransition::Rejected(video_id.to_owned())]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PlaybackScheduler, PlayerTransition};
    use crate::testing::{MockObserver, MockPlayer, PlayerCall, Recorder};

    type Scheduler = PlaybackScheduler<MockPlayer, MockObserver>;

    #[test]
    fn toggle_starts_then_pauses_the_same_video() {
        let recorder = Recorder::default();
        let mut scheduler = scheduler_with(&recorder, &["a"]);

        let started = scheduler.user_toggle_play("a");
        let paused = scheduler.user_toggle_play("a");

        assert_eq!(started, vec![PlayerTransition::Started("a".to_owned())]);
        assert_eq!(paused, vec![PlayerTransition::Paused("a".to_owned())]);
        assert_eq!(scheduler.active_id(), None);
        assert!(recorder.playing().is_empty());
    }

    #[test]
    fn toggle_on_another_video_pauses_previous_before_playing() {
        let recorder = Recorder::default();
        let mut scheduler = scheduler_with(&recorder, &["a", "b"]);
        scheduler.user_toggle_play("a");
        recorder.clear_calls();

        let transitions = scheduler.user_toggle_play("b");

        assert_eq!(
            transitions,
            vec![
                PlayerTransition::Paused("a".to_owned()),
                PlayerTransition::Started("b".to_owned()),
            ]
        );
        assert_eq!(
            recorder.calls(),
            vec![
                PlayerCall::Pause("a".to_owned()),
                PlayerCall::Play("b".to_owned()),
            ]
        );
        assert_eq!(scheduler.active_id(), Some("b"));
        assert_eq!(recorder.playing(), vec!["b".to_owned()]);
    }

    #[test]
    fn visibility_does_not_preempt_an_active_player() {
        let recorder = Recorder::default();
        let mut scheduler = scheduler_with(&recorder, &["a", "b"]);
        scheduler.user_toggle_play("a");

        let transitions = scheduler.on_visible("b");

        assert!(transitions.is_empty());
        assert_eq!(scheduler.active_id(), Some("a"));
    }

    #[test]
    fn visible_player_autoplays_when_idle_and_pauses_when_hidden() {
        let recorder = Recorder::default();
        let mut scheduler = scheduler_with(&recorder, &["a"]);

        scheduler.on_intersection("a", 0.75);
        assert_eq!(scheduler.active_id(), Some("a"));

        scheduler.on_intersection("a", 0.3);
        assert_eq!(scheduler.active_id(), None);
        assert!(recorder.playing().is_empty());
    }

    #[test]
    fn hidden_signal_for_inactive_player_is_ignored() {
        let recorder = Recorder::default();
        let mut scheduler = scheduler_with(&recorder, &["a", "b"]);
        scheduler.on_visible("a");

        let transitions = scheduler.on_hidden("b");

        assert!(transitions.is_empty());
        assert_eq!(scheduler.active_id(), Some("a"));
    }

    #[test]
    fn same_tick_hidden_then_visible_hands_over_playback() {
        let recorder = Recorder::default();
        let mut scheduler = scheduler_with(&recorder, &["a", "b"]);
        scheduler.on_visible("a");

        scheduler.on_hidden("a");
        scheduler.on_visible("b");

        assert_eq!(scheduler.active_id(), Some("b"));
        assert_eq!(recorder.playing(), vec!["b".to_owned()]);
    }

    #[test]
    fn rejected_play_leaves_nothing_active() {
        let recorder = Recorder::default();
        let mut scheduler = Scheduler::new(MockObserver::new(&recorder), true, 0.7);
        scheduler.mount("a", MockPlayer::new("a", &recorder).rejecting());

        let transitions = scheduler.on_visible("a");

        assert_eq!(transitions, vec![PlayerTransition::Rejected("a".to_owned())]);
        assert_eq!(scheduler.active_id(), None);
        assert!(recorder.playing().is_empty());
    }

    #[test]
    fn unmounting_active_player_pauses_and_clears_it() {
        let recorder = Recorder::default();
        let mut scheduler = scheduler_with(&recorder, &["a"]);
        scheduler.user_toggle_play("a");

        let transitions = scheduler.unmount("a");

        assert_eq!(transitions, vec![PlayerTransition::Paused("a".to_owned())]);
        assert_eq!(scheduler.active_id(), None);
        assert!(!scheduler.is_mounted("a"));
        assert!(recorder.observed().is_empty());
    }

    #[test]
    fn mount_applies_current_mute_and_later_changes_reach_every_player() {
        let recorder = Recorder::default();
        let mut scheduler = scheduler_with(&recorder, &["a"]);
        scheduler.set_muted(false);
        scheduler.mount("b", MockPlayer::new("b", &recorder));

        let calls = recorder.calls();

        assert!(calls.contains(&PlayerCall::Muted("a".to_owned(), true)));
        assert!(calls.contains(&PlayerCall::Muted("a".to_owned(), false)));
        assert_eq!(calls.last(), Some(&PlayerCall::Muted("b".to_owned(), false)));
        assert!(!scheduler.is_muted());
    }

    #[test]
    fn suspension_pauses_active_and_blocks_autoplay_until_resumed() {
        let recorder = Recorder::default();
        let mut scheduler = scheduler_with(&recorder, &["a", "b"]);
        scheduler.user_toggle_play("a");

        let transitions = scheduler.suspend();
        let ignored_visible = scheduler.on_visible("b");
        let ignored_toggle = scheduler.user_toggle_play("b");

        assert_eq!(transitions, vec![PlayerTransition::Paused("a".to_owned())]);
        assert!(ignored_visible.is_empty());
        assert!(ignored_toggle.is_empty());
        assert!(recorder.playing().is_empty());

        scheduler.resume();
        assert_eq!(scheduler.active_id(), None);
        scheduler.on_visible("b");
        assert_eq!(scheduler.active_id(), Some("b"));
    }

    #[test]
    fn toggle_on_unmounted_player_is_ignored() {
        let recorder = Recorder::default();
        let mut scheduler = scheduler_with(&recorder, &["a"]);

        assert!(scheduler.user_toggle_play("ghost").is_empty());
        assert_eq!(scheduler.active_id(), None);
    }

    fn scheduler_with(recorder: &Recorder, ids: &[&str]) -> Scheduler {
        let mut scheduler = Scheduler::new(MockObserver::new(recorder), true, 0.7);
        for id in ids {
            scheduler.mount(id, MockPlayer::new(id, recorder));
        }
        scheduler
    }
}
