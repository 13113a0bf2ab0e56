//! Debounced refresh on external change signals.
//!
//! The content editor and the hosting page emit loosely structured
//! messages (a save notification, a window regaining focus). Each
//! recognised signal may start a refresh, but at most once per debounce
//! window, and only after a short settle delay so the host has finished
//! writing the new files.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::store::{ContentStore, RefreshOutcome};

/// A recognised external change signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeSignal {
    /// The editor saved content.
    CmsSave,
    /// Some other editor event mentioning the CMS.
    CmsEvent,
    /// The page regained focus.
    Focus,
    /// An editor logged in; recognised but never refreshes.
    IdentityLogin,
}

impl ChangeSignal {
    /// Classify a message.
    ///
    /// Objects are matched on their `type` field; strings on their value.
    /// Anything else is not a signal.
    ///
    /// # Examples
    ///
    /// ```
    /// use atelier_store::ChangeSignal;
    /// use serde_json::json;
    ///
    /// assert_eq!(
    ///     ChangeSignal::from_message(&json!({"type": "NETLIFY_CMS_SAVE"})),
    ///     Some(ChangeSignal::CmsSave)
    /// );
    /// assert_eq!(ChangeSignal::from_message(&json!("focus")), Some(ChangeSignal::Focus));
    /// assert_eq!(ChangeSignal::from_message(&json!(42)), None);
    /// ```
    pub fn from_message(message: &Value) -> Option<Self> {
        match message {
            Value::Object(fields) => match fields.get("type").and_then(Value::as_str)? {
                "NETLIFY_CMS_SAVE" => Some(Self::CmsSave),
                "NETLIFY_IDENTITY_LOGIN" => Some(Self::IdentityLogin),
                _ => None,
            },
            Value::String(text) => match text.as_str() {
                "cms-save" => Some(Self::CmsSave),
                "focus" => Some(Self::Focus),
                other if other.contains("cms") => Some(Self::CmsEvent),
                _ => None,
            },
            _ => None,
        }
    }

    /// Whether this signal asks for new content.
    pub fn triggers_refresh(self) -> bool {
        !matches!(self, Self::IdentityLogin)
    }
}

/// Timing for [`ChangeTrigger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerConfig {
    /// Minimum time between two signal-initiated refreshes.
    pub debounce: Duration,
    /// Wait between accepting a signal and starting the refresh.
    pub settle_delay: Duration,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_secs(30),
            settle_delay: Duration::from_millis(500),
        }
    }
}

/// What a single signal led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The signal does not ask for a refresh.
    Ignored,
    /// A refresh started within the debounce window; nothing was done.
    Debounced {
        /// Time until the window closes.
        remaining: Duration,
    },
    /// A refresh was requested from the store.
    Refreshed(RefreshOutcome),
}

/// Turns change signals into debounced store refreshes.
pub struct ChangeTrigger {
    store: Arc<ContentStore>,
    config: TriggerConfig,
    last_accepted: Mutex<Option<Instant>>,
}

impl ChangeTrigger {
    /// Creates a trigger for `store`.
    pub fn new(store: Arc<ContentStore>, config: TriggerConfig) -> Self {
        Self {
            store,
            config,
            last_accepted: Mutex::new(None),
        }
    }

    /// The timing in use.
    pub fn config(&self) -> TriggerConfig {
        self.config
    }

    /// Handle one signal.
    ///
    /// The debounce window starts when a signal is accepted, so signals
    /// arriving during the settle delay are debounced too.
    pub async fn fire(&self, signal: ChangeSignal) -> TriggerOutcome {
        if !signal.triggers_refresh() {
            debug!(?signal, "signal does not refresh content");
            return TriggerOutcome::Ignored;
        }

        let now = Instant::now();
        {
            let mut last = self
                .last_accepted
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(previous) = *last {
                let elapsed = now.duration_since(previous);
                if elapsed < self.config.debounce {
                    let remaining = self.config.debounce - elapsed;
                    debug!(?signal, ?remaining, "refresh debounced");
                    return TriggerOutcome::Debounced { remaining };
                }
            }
            *last = Some(now);
        }

        if !self.config.settle_delay.is_zero() {
            tokio::time::sleep(self.config.settle_delay).await;
        }
        info!(?signal, "content change signalled, refreshing");
        TriggerOutcome::Refreshed(self.store.refresh().await)
    }

    /// Handle a raw message; unrecognised messages are ignored.
    pub async fn fire_message(&self, message: &Value) -> TriggerOutcome {
        match ChangeSignal::from_message(message) {
            Some(signal) => self.fire(signal).await,
            None => TriggerOutcome::Ignored,
        }
    }

    /// Consume signals until the channel closes.
    ///
    /// Returns the number of signals that led to a refresh.
    pub async fn run(&self, mut signals: mpsc::Receiver<ChangeSignal>) -> usize {
        let mut refreshes = 0;
        while let Some(signal) = signals.recv().await {
            if let TriggerOutcome::Refreshed(_) = self.fire(signal).await {
                refreshes += 1;
            }
        }
        debug!(refreshes, "change signal channel closed");
        refreshes
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::source::MockSource;
    use atelier_content::ResourceDescriptor;
    use serde_json::json;

    fn setup() -> (Arc<MockSource>, Arc<ContentStore>) {
        let mock = Arc::new(MockSource::new());
        let store = Arc::new(ContentStore::new(
            mock.clone(),
            ResourceDescriptor::default(),
        ));
        (mock, store)
    }

    #[test]
    fn test_signal_classification() {
        let cases = [
            (json!({"type": "NETLIFY_CMS_SAVE"}), Some(ChangeSignal::CmsSave)),
            (
                json!({"type": "NETLIFY_IDENTITY_LOGIN"}),
                Some(ChangeSignal::IdentityLogin),
            ),
            (json!({"type": "OTHER"}), None),
            (json!({"kind": "NETLIFY_CMS_SAVE"}), None),
            (json!("cms-save"), Some(ChangeSignal::CmsSave)),
            (json!("netlify-cms-publish"), Some(ChangeSignal::CmsEvent)),
            (json!("focus"), Some(ChangeSignal::Focus)),
            (json!("blur"), None),
            (json!(null), None),
            (json!(["cms-save"]), None),
        ];
        for (message, expected) in cases {
            assert_eq!(ChangeSignal::from_message(&message), expected, "{message}");
        }
    }

    #[test]
    fn test_identity_login_never_refreshes() {
        assert!(!ChangeSignal::IdentityLogin.triggers_refresh());
        assert!(ChangeSignal::Focus.triggers_refresh());
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_signals_within_window_refresh_once() {
        let (_, store) = setup();
        let trigger = ChangeTrigger::new(store.clone(), TriggerConfig::default());

        let first = trigger.fire(ChangeSignal::CmsSave).await;
        assert_eq!(
            first,
            TriggerOutcome::Refreshed(RefreshOutcome::Completed { cycles: 1 })
        );

        tokio::time::advance(Duration::from_secs(5)).await;
        let second = trigger.fire(ChangeSignal::Focus).await;
        assert!(matches!(second, TriggerOutcome::Debounced { .. }));
        assert_eq!(store.cycles_completed(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refreshes_again_after_window() {
        let (_, store) = setup();
        let trigger = ChangeTrigger::new(store.clone(), TriggerConfig::default());

        trigger.fire(ChangeSignal::Focus).await;
        tokio::time::advance(Duration::from_secs(31)).await;
        let outcome = trigger.fire(ChangeSignal::Focus).await;
        assert!(matches!(outcome, TriggerOutcome::Refreshed(_)));
        assert_eq!(store.cycles_completed(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_delay_precedes_refresh() {
        let (mock, store) = setup();
        let trigger = ChangeTrigger::new(store, TriggerConfig::default());

        let start = Instant::now();
        trigger.fire(ChangeSignal::CmsSave).await;
        assert!(start.elapsed() >= Duration::from_millis(500));
        assert!(mock.fetch_count() > 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ignored_signals_do_not_start_window() {
        let (_, store) = setup();
        let trigger = ChangeTrigger::new(store.clone(), TriggerConfig::default());

        assert_eq!(
            trigger.fire(ChangeSignal::IdentityLogin).await,
            TriggerOutcome::Ignored
        );
        assert_eq!(
            trigger.fire_message(&json!("resize")).await,
            TriggerOutcome::Ignored
        );
        let outcome = trigger.fire_message(&json!({"type": "NETLIFY_CMS_SAVE"})).await;
        assert!(matches!(outcome, TriggerOutcome::Refreshed(_)));
        assert_eq!(store.cycles_completed(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_consumes_channel() {
        let (_, store) = setup();
        let trigger = ChangeTrigger::new(
            store.clone(),
            TriggerConfig {
                debounce: Duration::from_secs(30),
                settle_delay: Duration::ZERO,
            },
        );

        let (tx, rx) = mpsc::channel(8);
        tx.send(ChangeSignal::CmsSave).await.unwrap();
        tx.send(ChangeSignal::Focus).await.unwrap();
        tx.send(ChangeSignal::CmsEvent).await.unwrap();
        drop(tx);

        assert_eq!(trigger.run(rx).await, 1);
        assert_eq!(store.cycles_completed(), 1);
    }
}
