//! Debounced autocomplete search
//!
//! Each keystroke takes a new sequence number. A debounce task only issues
//! its request if no newer keystroke arrived while it slept, and only applies
//! the response if its number is still the latest when the response lands.
//! Requests already in flight are never aborted; stale responses are dropped.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::address::Coordinates;
use crate::config::ClientOptions;
use crate::error::Error;
use crate::places::{PlaceSuggestion, PlacesClient};

/// Anything that can answer an autocomplete query
#[async_trait]
pub trait SuggestionSource: Send + Sync + 'static {
    async fn suggest(
        &self,
        input: &str,
        bias: Option<Coordinates>,
    ) -> Result<Vec<PlaceSuggestion>, Error>;
}

#[async_trait]
impl SuggestionSource for PlacesClient {
    async fn suggest(
        &self,
        input: &str,
        bias: Option<Coordinates>,
    ) -> Result<Vec<PlaceSuggestion>, Error> {
        self.autocomplete(input, bias).await
    }
}

struct Shared {
    source: Arc<dyn SuggestionSource>,
    latest: AtomicU64,
    suggestions: watch::Sender<Vec<PlaceSuggestion>>,
}

impl Shared {
    fn is_latest(&self, seq: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == seq
    }
}

/// Debounced place search feeding a suggestion list
#[derive(Clone)]
pub struct PlaceSearch {
    shared: Arc<Shared>,
    debounce: Duration,
    min_chars: usize,
}

impl PlaceSearch {
    pub fn new(source: Arc<dyn SuggestionSource>, options: &ClientOptions) -> Self {
        let (suggestions, _) = watch::channel(Vec::new());
        Self {
            shared: Arc::new(Shared {
                source,
                latest: AtomicU64::new(0),
                suggestions,
            }),
            debounce: options.search_debounce,
            min_chars: options.min_query_chars,
        }
    }

    /// React to the search box changing.
    ///
    /// Must be called from within a tokio runtime.
    pub fn on_query_changed(&self, text: &str, bias: Option<Coordinates>) -> u64 {
        let seq = self.shared.latest.fetch_add(1, Ordering::SeqCst) + 1;

        if text.chars().count() < self.min_chars {
            self.shared.suggestions.send_replace(Vec::new());
            return seq;
        }

        let shared = Arc::clone(&self.shared);
        let debounce = self.debounce;
        let query = text.to_string();

        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if !shared.is_latest(seq) {
                return;
            }

            let result = shared.source.suggest(&query, bias).await;

            if !shared.is_latest(seq) {
                log::debug!("dropping stale suggestions for {:?} (#{})", query, seq);
                return;
            }
            match result {
                Ok(list) => {
                    shared.suggestions.send_replace(list);
                }
                Err(e) => {
                    log::warn!("autocomplete for {:?} failed: {}", query, e);
                    shared.suggestions.send_replace(Vec::new());
                }
            }
        });

        seq
    }

    /// Receiver notified whenever the visible suggestions change
    pub fn subscribe(&self) -> watch::Receiver<Vec<PlaceSuggestion>> {
        self.shared.suggestions.subscribe()
    }

    /// Current visible suggestions
    pub fn suggestions(&self) -> Vec<PlaceSuggestion> {
        self.shared.suggestions.borrow().clone()
    }

    /// Hide suggestions and invalidate anything pending
    pub fn clear(&self) {
        self.shared.latest.fetch_add(1, Ordering::SeqCst);
        self.shared.suggestions.send_replace(Vec::new());
    }

    pub fn latest_sequence(&self) -> u64 {
        self.shared.latest.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Answers after a per-query delay and records every query it receives
    struct ScriptedSource {
        calls: Mutex<Vec<String>>,
        delays: Vec<(&'static str, Duration)>,
    }

    impl ScriptedSource {
        fn new(delays: Vec<(&'static str, Duration)>) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                delays,
            })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SuggestionSource for ScriptedSource {
        async fn suggest(
            &self,
            input: &str,
            _bias: Option<Coordinates>,
        ) -> Result<Vec<PlaceSuggestion>, Error> {
            self.calls.lock().unwrap().push(input.to_string());
            let delay = self
                .delays
                .iter()
                .find(|(q, _)| *q == input)
                .map(|(_, d)| *d)
                .unwrap_or_default();
            tokio::time::sleep(delay).await;
            if input == "fail" {
                return Err(Error::general("boom"));
            }
            Ok(vec![PlaceSuggestion {
                place_id: format!("id-{}", input),
                description: input.to_string(),
                structured_formatting: None,
                types: vec![],
            }])
        }
    }

    fn search(source: Arc<ScriptedSource>) -> PlaceSearch {
        PlaceSearch::new(source, &ClientOptions::default())
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_secs(10)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_queries_never_hit_the_network() {
        let source = ScriptedSource::new(vec![]);
        let search = search(source.clone());

        search.on_query_changed("pi", None);
        settle().await;
        assert_eq!(search.suggestions().len(), 1);

        search.on_query_changed("p", None);
        assert!(search.suggestions().is_empty());
        search.on_query_changed("", None);
        settle().await;

        assert!(search.suggestions().is_empty());
        assert_eq!(source.calls(), vec!["pi".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keystrokes_inside_window_issue_one_request() {
        let source = ScriptedSource::new(vec![]);
        let search = search(source.clone());

        for text in ["Pi", "Piz", "Pizz", "Pizza"] {
            search.on_query_changed(text, None);
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        assert!(source.calls().is_empty());

        settle().await;
        assert_eq!(source.calls(), vec!["Pizza".to_string()]);
        assert_eq!(search.suggestions()[0].description, "Pizza");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_is_discarded() {
        let source = ScriptedSource::new(vec![("slow", Duration::from_secs(5))]);
        let search = search(source.clone());

        search.on_query_changed("slow", None);
        tokio::time::sleep(Duration::from_millis(600)).await;
        search.on_query_changed("fast", None);
        settle().await;

        assert_eq!(source.calls(), vec!["slow".to_string(), "fast".to_string()]);
        assert_eq!(search.suggestions()[0].description, "fast");
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_clears_suggestions() {
        let source = ScriptedSource::new(vec![]);
        let search = search(source);

        search.on_query_changed("ok", None);
        settle().await;
        assert_eq!(search.suggestions().len(), 1);

        search.on_query_changed("fail", None);
        settle().await;
        assert!(search.suggestions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_invalidates_pending() {
        let source = ScriptedSource::new(vec![]);
        let search = search(source.clone());
        let mut rx = search.subscribe();

        search.on_query_changed("Pizza", None);
        search.clear();
        settle().await;

        assert!(source.calls().is_empty());
        assert!(rx.borrow_and_update().is_empty());
    }
}
