use super::state::{Effect, Outcome, Phase, RequestToken, SearchState, TimerHandle};
use crate::api::ProductSearch;
use crate::config::StorefrontConfig;
use crate::error::ApiError;
use crate::models::Product;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Timing and sizing knobs for a search controller
#[derive(Debug, Clone, Copy)]
pub struct SearchSettings {
    pub debounce: Duration,
    pub result_count: u32,
    pub request_timeout: Duration,
}

impl SearchSettings {
    pub fn from_config(config: &StorefrontConfig) -> Self {
        Self {
            debounce: config.debounce(),
            result_count: config.result_count,
            request_timeout: config.request_timeout(),
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self::from_config(&StorefrontConfig::default())
    }
}

/// Point-in-time view of a search controller, published after every event
#[derive(Debug, Clone)]
pub struct SearchSnapshot {
    pub query: String,
    pub results: Vec<Product>,
    pub loading: bool,
    pub timed_out: bool,
    pub phase: Phase,
    /// Number of query changes processed so far
    pub revision: u64,
}

enum Command {
    SetQuery { text: String, revision: u64 },
    Shutdown,
}

enum Event {
    TimerFired(TimerHandle),
    Completed {
        token: RequestToken,
        result: Result<Vec<Product>, ApiError>,
    },
    TimedOut(RequestToken),
}

/// Actor that owns a [`SearchState`] and performs its effects.
///
/// All state lives in one task and events are handled one at a time, so the
/// machine sees keystrokes, timer fires and responses in a total order no
/// matter how the network delivers them.
pub struct SearchController<S: ProductSearch> {
    state: SearchState,
    search: Arc<S>,
    settings: SearchSettings,
    timer: Option<(TimerHandle, JoinHandle<()>)>,
    revision: u64,
    events_tx: mpsc::UnboundedSender<Event>,
    events_rx: mpsc::UnboundedReceiver<Event>,
    snapshots: watch::Sender<SearchSnapshot>,
}

impl<S: ProductSearch> SearchController<S> {
    /// Start a controller on the current tokio runtime
    pub fn spawn(search: Arc<S>, settings: SearchSettings) -> SearchHandle {
        let state = SearchState::new(settings.debounce, settings.result_count);
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (snapshots, snapshot_rx) = watch::channel(snapshot_of(&state, 0));

        let controller = Self {
            state,
            search,
            settings,
            timer: None,
            revision: 0,
            events_tx,
            events_rx,
            snapshots,
        };
        tokio::spawn(controller.run(commands_rx));

        SearchHandle {
            commands: commands_tx,
            snapshots: snapshot_rx,
            sent: Arc::new(AtomicU64::new(0)),
        }
    }

    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        ::log::debug!("Search controller started");
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::SetQuery { text, revision }) => {
                        self.revision = revision;
                        let effects = self.state.set_query(text);
                        for effect in effects {
                            self.apply(effect);
                        }
                    }
                    Some(Command::Shutdown) | None => break,
                },
                Some(event) = self.events_rx.recv() => self.handle_event(event),
            }
            self.snapshots
                .send_replace(snapshot_of(&self.state, self.revision));
        }

        if let Some((_, timer)) = self.timer.take() {
            timer.abort();
        }
        ::log::debug!("Search controller stopped");
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::CancelTimer(handle) => {
                if let Some((armed, task)) = self.timer.take() {
                    if armed == handle {
                        task.abort();
                    } else {
                        self.timer = Some((armed, task));
                    }
                }
            }
            Effect::ArmTimer { handle, delay } => {
                ::log::trace!("Arming debounce timer {:?} for {:?}", handle, delay);
                let tx = self.events_tx.clone();
                let task = tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(Event::TimerFired(handle));
                });
                self.timer = Some((handle, task));
            }
            Effect::Search {
                token,
                query,
                count,
            } => {
                ::log::debug!("Issuing search #{} for '{}'", token.generation(), query);
                let search = Arc::clone(&self.search);
                let tx = self.events_tx.clone();
                let limit = self.settings.request_timeout;
                tokio::spawn(async move {
                    let event = match tokio::time::timeout(limit, search.search(&query, count)).await
                    {
                        Ok(result) => Event::Completed { token, result },
                        Err(_) => Event::TimedOut(token),
                    };
                    let _ = tx.send(event);
                });
            }
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::TimerFired(handle) => {
                if matches!(&self.timer, Some((armed, _)) if *armed == handle) {
                    self.timer = None;
                }
                if let Some(effect) = self.state.debounce_fired(handle) {
                    self.apply(effect);
                }
            }
            Event::Completed {
                token,
                result: Ok(items),
            } => {
                let count = items.len();
                match self.state.request_succeeded(token, items) {
                    Outcome::Applied => {
                        ::log::info!("Search #{} returned {} products", token.generation(), count)
                    }
                    Outcome::Discarded => {
                        ::log::debug!("Discarding stale response for search #{}", token.generation())
                    }
                }
            }
            // the HTTP client can hit the same deadline before the outer timeout does
            Event::Completed {
                token,
                result: Err(ApiError::Timeout(_)),
            }
            | Event::TimedOut(token) => {
                if self.state.request_timed_out(token) == Outcome::Applied {
                    ::log::warn!(
                        "Search #{} timed out after {:?}",
                        token.generation(),
                        self.settings.request_timeout
                    );
                }
            }
            Event::Completed {
                token,
                result: Err(e),
            } => match self.state.request_failed(token) {
                Outcome::Applied => {
                    ::log::warn!("Search #{} failed: {}", token.generation(), e)
                }
                Outcome::Discarded => {
                    ::log::debug!("Ignoring failure of stale search #{}: {}", token.generation(), e)
                }
            },
        }
    }
}

fn snapshot_of(state: &SearchState, revision: u64) -> SearchSnapshot {
    SearchSnapshot {
        query: state.query().to_string(),
        results: state.results().to_vec(),
        loading: state.loading(),
        timed_out: state.timed_out(),
        phase: state.phase(),
        revision,
    }
}

/// Caller side of a running [`SearchController`]
#[derive(Clone)]
pub struct SearchHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<SearchSnapshot>,
    sent: Arc<AtomicU64>,
}

impl SearchHandle {
    /// Deliver a query change. Returns false once the controller has stopped.
    pub fn set_query(&self, text: impl Into<String>) -> bool {
        let revision = self.sent.fetch_add(1, Ordering::SeqCst) + 1;
        self.commands
            .send(Command::SetQuery {
                text: text.into(),
                revision,
            })
            .is_ok()
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that is notified after every processed event
    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.snapshots.clone()
    }

    /// Waits until every query change sent so far has been processed and
    /// the controller is back to idle.
    pub async fn settled(&self) -> SearchSnapshot {
        let target = self.sent.load(Ordering::SeqCst);
        let mut rx = self.snapshots.clone();
        match rx
            .wait_for(|s| s.revision >= target && s.phase == Phase::Idle)
            .await
        {
            Ok(snapshot) => (*snapshot).clone(),
            Err(_) => self.snapshot(),
        }
    }

    pub fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown);
    }
}
