//! Presentation state for the travel feed: message handling, render models,
//! a headless media platform and the worker-thread bridge to the engine.

pub mod app;
pub mod bridge;
pub mod headless;
pub mod widgets;

pub use app::{AppState, Message};
pub use bridge::{EngineCommandSender, EngineEventReceiver, spawn_engine_bridge};
pub use headless::{HeadlessObserver, HeadlessPlatform, HeadlessPlayer};
