use std::collections::VecDeque;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use engine::{Command, Engine, EngineErrorEvent, Event, LoadTicket, MediaPlatform};
use tracing::debug;

const COMMAND_CHANNEL_CAPACITY: usize = 32;
const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Sender used by the UI thread to dispatch commands to the engine thread.
pub type EngineCommandSender = mpsc::SyncSender<Command>;

/// Receiver used by the UI thread to read events emitted by the engine thread.
pub type EngineEventReceiver = mpsc::Receiver<Event>;

/// Spawns a worker thread that owns `engine`.
///
/// Commands are applied in arrival order. Every `Event::LoadScheduled` is
/// answered by the worker itself with `Command::CompleteLoad` once the
/// configured load latency has elapsed. Failed commands surface as
/// `Event::Error`. The worker exits when either channel end is dropped.
pub fn spawn_engine_bridge<M>(mut engine: Engine<M>) -> (EngineCommandSender, EngineEventReceiver)
where
    M: MediaPlatform + 'static,
    Engine<M>: Send,
{
    let (command_tx, command_rx) = mpsc::sync_channel::<Command>(COMMAND_CHANNEL_CAPACITY);
    let (event_tx, event_rx) = mpsc::sync_channel::<Event>(EVENT_CHANNEL_CAPACITY);
    let latency = Duration::from_millis(engine.config().load_latency_ms);

    thread::spawn(move || {
        let mut pending = PendingLoads::default();
        while let Some(command) = pending.next_command(&command_rx) {
            let events = match engine.handle_command(command) {
                Ok(events) => events,
                Err(error) => vec![Event::Error(EngineErrorEvent::from_error(&error))],
            };
            for event in events {
                if let Event::LoadScheduled(ticket) = event {
                    pending.schedule(ticket, latency);
                }
                if event_tx.send(event).is_err() {
                    return;
                }
            }
        }
        debug!("engine bridge stopped");
    });

    (command_tx, event_rx)
}

/// Page loads waiting for their simulated latency, oldest first.
#[derive(Debug, Default)]
struct PendingLoads {
    queue: VecDeque<(Instant, LoadTicket)>,
}

impl PendingLoads {
    fn schedule(&mut self, ticket: LoadTicket, latency: Duration) {
        self.queue.push_back((Instant::now() + latency, ticket));
    }

    /// Next command to apply: a due completion, else the next UI command,
    /// waiting at most until the oldest pending load falls due.
    fn next_command(&mut self, command_rx: &mpsc::Receiver<Command>) -> Option<Command> {
        let Some(&(due, ticket)) = self.queue.front() else {
            return command_rx.recv().ok();
        };

        let wait = due.saturating_duration_since(Instant::now());
        if !wait.is_zero() {
            match command_rx.recv_timeout(wait) {
                Ok(command) => return Some(command),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return None,
            }
        }

        self.queue.pop_front();
        debug!(page = ticket.page, generation = ticket.generation, "page load due");
        Some(Command::CompleteLoad(ticket))
    }
}
