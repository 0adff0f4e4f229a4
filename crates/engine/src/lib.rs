//! Headless controller for the travel video feed: filtering, paging, feed
//! playback scheduling and the detail overlay.

pub mod api;
pub mod config;
pub mod detail;
pub mod error;
pub mod pagination;
pub mod platform;
pub mod playback;
pub mod query;

#[cfg(test)]
mod testing;

pub use api::{
    Command, DetailSnapshot, Engine, EngineErrorEvent, EngineErrorKind, Event, FeedSnapshot,
    PlaybackSnapshot,
};
pub use config::FeedConfig;
pub use detail::{DetailSession, progress_percent};
pub use error::{EngineError, Result};
pub use pagination::{LoadOutcome, LoadTicket, Paginator};
pub use platform::{MediaPlatform, PlaybackRejected, PlayerHandle, PlayerSlot, VisibilityObserver};
pub use playback::{PlaybackScheduler, PlayerTransition};
pub use query::{CategoryFilter, FilterState, SearchComposition, SortMode, query};
