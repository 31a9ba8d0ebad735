use crate::api::ProductSearch;
use crate::error::ApiError;
use crate::models::Product;
use crate::search::{Phase, SearchController, SearchHandle, SearchSettings};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Search double with per-query latency and failures
#[derive(Default)]
struct ScriptedSearch {
    calls: Mutex<Vec<(String, u32)>>,
    delays: HashMap<&'static str, Duration>,
    failing: Vec<&'static str>,
    timing_out: Vec<&'static str>,
}

impl ScriptedSearch {
    fn with_delay(mut self, query: &'static str, delay: Duration) -> Self {
        self.delays.insert(query, delay);
        self
    }

    fn failing_on(mut self, query: &'static str) -> Self {
        self.failing.push(query);
        self
    }

    /// The client itself gives up on this query, as reqwest does at its deadline
    fn client_timeout_on(mut self, query: &'static str) -> Self {
        self.timing_out.push(query);
        self
    }

    fn queries(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(q, _)| q.clone())
            .collect()
    }
}

impl ProductSearch for ScriptedSearch {
    async fn search(&self, query: &str, count: u32) -> Result<Vec<Product>, ApiError> {
        self.calls.lock().unwrap().push((query.to_string(), count));

        let delay = self
            .delays
            .get(query)
            .copied()
            .unwrap_or(Duration::from_millis(50));
        tokio::time::sleep(delay).await;

        if self.timing_out.iter().any(|f| *f == query) {
            return Err(ApiError::Timeout(Duration::from_secs(5)));
        }
        if self.failing.iter().any(|f| *f == query) {
            return Err(ApiError::Status {
                status: 503,
                body: String::new(),
            });
        }
        let id = format!("{}-1", query);
        Ok(vec![Product::new(id.as_str(), query)])
    }
}

fn settings() -> SearchSettings {
    SearchSettings {
        debounce: Duration::from_millis(500),
        result_count: 10,
        request_timeout: Duration::from_secs(5),
    }
}

fn start(search: ScriptedSearch) -> (Arc<ScriptedSearch>, SearchHandle) {
    let search = Arc::new(search);
    let handle = SearchController::spawn(Arc::clone(&search), settings());
    (search, handle)
}

fn result_ids(handle: &SearchHandle) -> Vec<String> {
    handle
        .snapshot()
        .results
        .iter()
        .map(|p| p.id.to_string())
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_keystroke_burst_issues_one_request_for_last_query() {
    let (search, handle) = start(ScriptedSearch::default());

    for text in ["p", "ph", "pho", "phon", "phone"] {
        handle.set_query(text);
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    let snapshot = handle.settled().await;

    assert_eq!(search.queries(), vec!["phone"]);
    assert_eq!(search.calls.lock().unwrap()[0].1, 10);
    assert_eq!(snapshot.query, "phone");
    assert_eq!(result_ids(&handle), vec!["phone-1"]);
    assert!(!snapshot.loading);
}

#[tokio::test(start_paused = true)]
async fn test_blank_query_never_hits_the_network() {
    let (search, handle) = start(ScriptedSearch::default());

    handle.set_query("   ");
    tokio::time::sleep(Duration::from_secs(2)).await;
    let snapshot = handle.settled().await;

    assert!(search.queries().is_empty());
    assert!(snapshot.results.is_empty());
    assert!(!snapshot.loading);
}

#[tokio::test(start_paused = true)]
async fn test_clearing_the_query_drops_results() {
    let (search, handle) = start(ScriptedSearch::default());

    handle.set_query("desk");
    handle.settled().await;
    assert_eq!(result_ids(&handle), vec!["desk-1"]);

    handle.set_query("");
    let snapshot = handle.settled().await;
    assert!(snapshot.results.is_empty());
    assert!(!snapshot.loading);
    assert_eq!(search.queries(), vec!["desk"]);
}

#[tokio::test(start_paused = true)]
async fn test_slow_older_response_does_not_overwrite_newer() {
    let (search, handle) = start(
        ScriptedSearch::default()
            .with_delay("a", Duration::from_secs(2))
            .with_delay("ab", Duration::from_millis(100)),
    );

    handle.set_query("a");
    // past the debounce: the request for "a" is in flight
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert!(handle.snapshot().loading);

    handle.set_query("ab");
    handle.settled().await;
    assert_eq!(result_ids(&handle), vec!["ab-1"]);

    // let the slow "a" response land
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(search.queries(), vec!["a", "ab"]);
    assert_eq!(result_ids(&handle), vec!["ab-1"]);
    assert!(!handle.snapshot().loading);
}

#[tokio::test(start_paused = true)]
async fn test_loading_is_visible_while_requesting() {
    let (_search, handle) =
        start(ScriptedSearch::default().with_delay("sofa", Duration::from_secs(2)));

    handle.set_query("sofa");
    tokio::time::sleep(Duration::from_millis(200)).await;
    let snapshot = handle.snapshot();
    assert_eq!(snapshot.phase, Phase::Debouncing);
    assert!(!snapshot.loading);

    tokio::time::sleep(Duration::from_millis(500)).await;
    let snapshot = handle.snapshot();
    assert_eq!(snapshot.phase, Phase::Requesting);
    assert!(snapshot.loading);

    let snapshot = handle.settled().await;
    assert!(!snapshot.loading);
    assert_eq!(snapshot.results.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_failure_is_quiet_and_keeps_results() {
    let (_search, handle) = start(ScriptedSearch::default().failing_on("chairs"));

    handle.set_query("chair");
    handle.settled().await;
    assert_eq!(result_ids(&handle), vec!["chair-1"]);

    handle.set_query("chairs");
    let snapshot = handle.settled().await;
    assert_eq!(result_ids(&handle), vec!["chair-1"]);
    assert!(!snapshot.loading);
    assert!(!snapshot.timed_out);
}

#[tokio::test(start_paused = true)]
async fn test_hung_request_times_out() {
    let (_search, handle) =
        start(ScriptedSearch::default().with_delay("rug", Duration::from_secs(60)));

    handle.set_query("rug");
    let snapshot = handle.settled().await;
    assert!(snapshot.timed_out);
    assert!(!snapshot.loading);
    assert!(snapshot.results.is_empty());

    handle.set_query("rugs");
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(!handle.snapshot().timed_out);
}

#[tokio::test(start_paused = true)]
async fn test_client_side_timeout_sets_timed_out() {
    let (_search, handle) = start(ScriptedSearch::default().client_timeout_on("rug"));

    handle.set_query("rug");
    let snapshot = handle.settled().await;
    assert!(snapshot.timed_out);
    assert!(!snapshot.loading);
    assert!(snapshot.results.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_set_query_after_shutdown_is_rejected() {
    let (_search, handle) = start(ScriptedSearch::default());

    handle.shutdown();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(!handle.set_query("lamp"));
}
