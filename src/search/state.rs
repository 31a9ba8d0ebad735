use crate::models::Product;
use std::time::Duration;

/// Identifies one armed debounce timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// Identifies one request cycle. Tokens are minted from a monotonically
/// increasing counter, so a larger token is always the newer request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Where the current query-change cycle is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Debouncing,
    Requesting,
}

/// Work the driver has to carry out on behalf of the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ArmTimer { handle: TimerHandle, delay: Duration },
    CancelTimer(TimerHandle),
    Search {
        token: RequestToken,
        query: String,
        count: u32,
    },
}

/// What happened to a completed request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Discarded,
}

/// Search state for one mounted search view.
///
/// Pure and synchronous: every transition returns the effects the caller must
/// perform instead of performing them, which keeps ordering decisions in one
/// place and makes the machine testable without a clock.
#[derive(Debug, Clone)]
pub struct SearchState {
    query: String,
    results: Vec<Product>,
    loading: bool,
    timed_out: bool,
    pending_timer: Option<TimerHandle>,
    active_request: Option<RequestToken>,
    next_timer: u64,
    next_generation: u64,
    debounce: Duration,
    result_count: u32,
}

impl SearchState {
    pub fn new(debounce: Duration, result_count: u32) -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            loading: false,
            timed_out: false,
            pending_timer: None,
            active_request: None,
            next_timer: 0,
            next_generation: 0,
            debounce,
            result_count,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[Product] {
        &self.results
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Set when the last request exceeded its time bound
    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    pub fn active_request(&self) -> Option<RequestToken> {
        self.active_request
    }

    pub fn phase(&self) -> Phase {
        if self.pending_timer.is_some() {
            Phase::Debouncing
        } else if self.active_request.is_some() {
            Phase::Requesting
        } else {
            Phase::Idle
        }
    }

    /// Replaces the query. Any pending timer is cancelled and any in-flight
    /// request is superseded; a non-blank query arms a fresh timer.
    pub fn set_query(&mut self, text: impl Into<String>) -> Vec<Effect> {
        self.query = text.into();
        self.timed_out = false;
        self.active_request = None;

        let mut effects = Vec::with_capacity(2);
        if let Some(handle) = self.pending_timer.take() {
            ::log::trace!("Cancelling debounce timer {:?}", handle);
            effects.push(Effect::CancelTimer(handle));
        }

        if self.query.trim().is_empty() {
            self.results.clear();
            self.loading = false;
            return effects;
        }

        let handle = TimerHandle(self.next_timer);
        self.next_timer += 1;
        self.pending_timer = Some(handle);
        effects.push(Effect::ArmTimer {
            handle,
            delay: self.debounce,
        });
        effects
    }

    /// Debounce timer callback. Handles that are no longer pending are ignored.
    pub fn debounce_fired(&mut self, handle: TimerHandle) -> Option<Effect> {
        if self.pending_timer != Some(handle) {
            ::log::trace!("Ignoring superseded timer {:?}", handle);
            return None;
        }
        self.pending_timer = None;

        let token = RequestToken(self.next_generation);
        self.next_generation += 1;
        self.active_request = Some(token);
        self.loading = true;

        // read at fire time, not at schedule time
        Some(Effect::Search {
            token,
            query: self.query.clone(),
            count: self.result_count,
        })
    }

    /// A search answered. Only the active request may replace the results.
    pub fn request_succeeded(&mut self, token: RequestToken, items: Vec<Product>) -> Outcome {
        if !self.is_active(token) {
            return Outcome::Discarded;
        }
        self.active_request = None;
        self.results = items;
        self.loading = false;
        Outcome::Applied
    }

    /// A search failed. Results are left as they were.
    pub fn request_failed(&mut self, token: RequestToken) -> Outcome {
        if !self.is_active(token) {
            return Outcome::Discarded;
        }
        self.active_request = None;
        self.loading = false;
        Outcome::Applied
    }

    /// A search exceeded its time bound. Results are left as they were.
    pub fn request_timed_out(&mut self, token: RequestToken) -> Outcome {
        let outcome = self.request_failed(token);
        if outcome == Outcome::Applied {
            self.timed_out = true;
        }
        outcome
    }

    fn is_active(&self, token: RequestToken) -> bool {
        self.active_request == Some(token)
    }
}
