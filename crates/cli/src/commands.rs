use std::io::Write;
use std::sync::Arc;
use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;

use catalog::Catalog;
use chrono::{DateTime, Utc};
use engine::{Command, Engine, FeedConfig, FilterState, query};
use tracing::{debug, info};
use view::widgets::card::{CardFlags, build_card_model};
use view::widgets::detail::build_detail_model;
use view::{AppState, EngineCommandSender, EngineEventReceiver, HeadlessPlatform, Message};

use crate::error::{CliError, Result};
use crate::render::{write_card, write_detail};

const BRIDGE_GRACE: Duration = Duration::from_secs(5);
const DETAIL_TRACK_WIDTH_PX: f32 = 40.0;

/// Prints every result of `filter` in feed order; returns the result count.
pub fn run_query(
    catalog: &Catalog,
    config: &FeedConfig,
    filter: &FilterState,
    now: DateTime<Utc>,
    out: &mut impl Write,
) -> Result<usize> {
    let results = query(catalog, filter, config.search_composition);
    info!(results = results.len(), "query finished");

    if results.is_empty() {
        writeln!(out, "No videos found")?;
        return Ok(0);
    }
    for (index, video) in results.iter().enumerate() {
        let flags = CardFlags {
            muted: config.start_muted,
            ..CardFlags::default()
        };
        write_card(out, index, &build_card_model(video, catalog, flags, now))?;
    }
    Ok(results.len())
}

/// Pages through the feed the way scrolling does: each page is requested by
/// the end-of-list sentinel and delivered after the configured latency.
///
/// Stops when the feed is exhausted or `max_pages` pages were shown; returns
/// the number of pages shown.
pub fn run_browse(
    catalog: Arc<Catalog>,
    config: &FeedConfig,
    filter: FilterState,
    max_pages: Option<usize>,
    now: DateTime<Utc>,
    out: &mut impl Write,
) -> Result<usize> {
    let engine = Engine::new(Arc::clone(&catalog), HeadlessPlatform, config.clone())?;
    let mut app = AppState::new(catalog, config);
    let (command_tx, event_rx) = view::spawn_engine_bridge(engine);
    let timeout = Duration::from_millis(config.load_latency_ms) + BRIDGE_GRACE;

    command_tx
        .send(Command::SetFilter(filter))
        .map_err(|_| CliError::BridgeClosed)?;
    pump_until(&mut app, &event_rx, timeout, |app| app.feed().is_some())?;

    if app.is_empty_result() {
        writeln!(out, "No videos found")?;
        return Ok(0);
    }

    let mut printed = 0;
    let mut pages = 0;
    loop {
        let cards = app.card_models(now);
        writeln!(out, "-- page {} --", pages + 1)?;
        for (index, card) in cards.iter().enumerate().skip(printed) {
            write_card(out, index, card)?;
        }
        printed = cards.len();
        pages += 1;

        if max_pages.is_some_and(|max_pages| pages >= max_pages) {
            break;
        }
        let shown = app.feed().map_or(0, |feed| feed.page);
        if !dispatch(&mut app, &command_tx, Message::SentinelVisibility(1.0))? {
            break;
        }
        pump_until(&mut app, &event_rx, timeout, |app| {
            app.feed().is_some_and(|feed| {
                (!feed.is_loading_more && feed.page > shown) || !feed.has_more
            })
        })?;
        if app.card_models(now).len() == printed {
            break;
        }
    }

    if app.is_exhausted() {
        writeln!(out, "-- end of feed --")?;
    }
    Ok(pages)
}

/// Opens the detail view for `video_id` and prints it.
pub fn run_show(
    catalog: Arc<Catalog>,
    config: &FeedConfig,
    video_id: &str,
    now: DateTime<Utc>,
    out: &mut impl Write,
) -> Result<()> {
    let mut engine = Engine::new(Arc::clone(&catalog), HeadlessPlatform, config.clone())?;
    engine.handle_command(Command::OpenDetail {
        video_id: video_id.to_owned(),
    })?;

    let detail = engine
        .detail_snapshot()
        .and_then(|snapshot| build_detail_model(&snapshot, &catalog, DETAIL_TRACK_WIDTH_PX, now))
        .ok_or_else(|| CliError::UnknownVideo {
            video_id: video_id.to_owned(),
        })?;
    write_detail(out, &detail)?;

    engine.handle_command(Command::CloseDetail)?;
    Ok(())
}

/// Sends the commands `message` produces; false when it produced none.
fn dispatch(app: &mut AppState, command_tx: &EngineCommandSender, message: Message) -> Result<bool> {
    let commands = app.update(message);
    let sent = !commands.is_empty();
    for command in commands {
        debug!(?command, "dispatching");
        command_tx.send(command).map_err(|_| CliError::BridgeClosed)?;
    }
    Ok(sent)
}

fn pump_until(
    app: &mut AppState,
    event_rx: &EngineEventReceiver,
    timeout: Duration,
    done: impl Fn(&AppState) -> bool,
) -> Result<()> {
    while !done(app) {
        let event = event_rx.recv_timeout(timeout).map_err(|error| match error {
            RecvTimeoutError::Timeout => CliError::BridgeTimeout,
            RecvTimeoutError::Disconnected => CliError::BridgeClosed,
        })?;
        app.update(Message::Engine(event));
    }
    Ok(())
}
