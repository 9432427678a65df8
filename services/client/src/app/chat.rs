//! services/client/src/app/chat.rs
//!
//! The chat widget's session: one thread with the assistant backend, an
//! optimistic transcript, and a poller that follows the active run to completion.
//!
//! At most one run is in flight per thread. The poller is a single spawned task
//! driven by an interval and stopped through one `CancellationToken`.

use chrono::Utc;
use portfolio_core::chat_text::chronological;
use portfolio_core::domain::{ChatMessage, RunId, Sender, ThreadId};
use portfolio_core::ports::{ChatService, ThreadStore};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Shown locally when a new thread starts. Never sent to the backend.
pub const GREETING: &str = "Hi! I'm the portfolio assistant. I can help you learn more about the work, skills, and experience shown here. What would you like to know?";

/// Everything a chat front end renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatSnapshot {
    pub thread: Option<ThreadId>,
    pub run: Option<RunId>,
    pub messages: Vec<ChatMessage>,
    pub typing: bool,
    /// A send request is on the wire and its run id is not known yet.
    pub sending: bool,
}

impl ChatSnapshot {
    /// No send in flight and no run being polled.
    pub fn is_idle(&self) -> bool {
        self.run.is_none() && !self.sending
    }
}

/// Result of a send attempt. Only `Dispatched` issued a request that succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Dispatched(RunId),
    Empty,
    NoThread,
    RunOutstanding,
    Failed,
}

struct Inner {
    service: Arc<dyn ChatService>,
    store: Arc<dyn ThreadStore>,
    poll_interval: Duration,
    state: watch::Sender<ChatSnapshot>,
    poller: Mutex<Option<CancellationToken>>,
}

impl Inner {
    fn stop_polling(&self) {
        if let Ok(mut slot) = self.poller.lock() {
            if let Some(token) = slot.take() {
                token.cancel();
            }
        }
    }
}

/// One visitor conversation. Dropping the session stops its poller.
pub struct ChatSession {
    inner: Arc<Inner>,
}

impl ChatSession {
    pub fn new(
        service: Arc<dyn ChatService>,
        store: Arc<dyn ThreadStore>,
        poll_interval: Duration,
    ) -> Self {
        let (state, _) = watch::channel(ChatSnapshot::default());
        Self {
            inner: Arc::new(Inner {
                service,
                store,
                poll_interval,
                state,
                poller: Mutex::new(None),
            }),
        }
    }

    pub fn snapshot(&self) -> ChatSnapshot {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ChatSnapshot> {
        self.inner.state.subscribe()
    }

    /// Waits until no send or run is outstanding. A run that ends in a status other
    /// than completed keeps the session busy, so interactive callers bound this wait.
    pub async fn wait_until_idle(&self) {
        let mut rx = self.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(ChatSnapshot::is_idle).await;
    }

    /// Reuses the stored thread (loading its history) or creates a new one.
    pub async fn establish(&self) {
        if self.inner.state.borrow().thread.is_some() {
            return;
        }

        match self.inner.store.load_thread().await {
            Ok(Some(thread)) => {
                info!("Resuming chat thread {}", thread);
                self.inner.state.send_modify(|s| s.thread = Some(thread.clone()));
                self.load_history(&thread).await;
                return;
            }
            Ok(None) => {}
            Err(e) => warn!("Failed to read the stored chat thread: {}", e),
        }

        match self.inner.service.create_thread().await {
            Ok(thread) => {
                info!("Created chat thread {}", thread);
                if let Err(e) = self.inner.store.save_thread(&thread).await {
                    warn!("Failed to persist chat thread {}: {}", thread, e);
                }
                self.inner.state.send_modify(|s| {
                    s.thread = Some(thread);
                    s.messages = vec![greeting()];
                });
            }
            Err(e) => {
                error!("Failed to create chat thread: {}", e);
                self.inner.state.send_modify(|s| s.messages = vec![greeting()]);
            }
        }
    }

    async fn load_history(&self, thread: &ThreadId) {
        match self.inner.service.list_messages(thread, None).await {
            Ok(listing) => {
                let transcript = chronological(listing.messages);
                self.inner.state.send_modify(|s| s.messages = transcript);
            }
            Err(e) => error!("Failed to load chat history: {}", e),
        }
    }

    /// Sends a visitor message.
    ///
    /// Blank input, a missing thread or an outstanding run reject the send without a
    /// request and without touching the transcript.
    pub async fn send(&self, text: &str) -> SendOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::Empty;
        }

        let mut admitted: Result<ThreadId, SendOutcome> = Err(SendOutcome::NoThread);
        self.inner.state.send_if_modified(|s| {
            let Some(thread) = s.thread.clone() else {
                return false;
            };
            if !s.is_idle() {
                admitted = Err(SendOutcome::RunOutstanding);
                return false;
            }
            s.messages.push(visitor_message(text));
            s.typing = true;
            s.sending = true;
            admitted = Ok(thread);
            true
        });
        let thread = match admitted {
            Ok(thread) => thread,
            Err(outcome) => {
                debug!("Chat send rejected: {:?}", outcome);
                return outcome;
            }
        };

        match self.inner.service.send_message(&thread, text).await {
            Ok(run) => {
                self.inner.state.send_modify(|s| {
                    s.sending = false;
                    s.run = Some(run.clone());
                });
                self.start_polling(thread, run.clone());
                SendOutcome::Dispatched(run)
            }
            Err(e) => {
                error!("Failed to send chat message: {}", e);
                self.inner.state.send_modify(|s| {
                    s.sending = false;
                    s.typing = false;
                });
                SendOutcome::Failed
            }
        }
    }

    fn start_polling(&self, thread: ThreadId, run: RunId) {
        let token = CancellationToken::new();
        if let Ok(mut slot) = self.inner.poller.lock() {
            if let Some(previous) = slot.replace(token.clone()) {
                previous.cancel();
            }
        }
        tokio::spawn(poll_run(Arc::clone(&self.inner), thread, run, token));
    }

    /// Stops the poller. The run id is kept, so further sends stay rejected
    /// until a new session is established.
    pub fn shutdown(&self) {
        self.inner.stop_polling();
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.inner.stop_polling();
    }
}

/// Polls `/chat/list` for `run` until it completes or `token` is cancelled.
async fn poll_run(inner: Arc<Inner>, thread: ThreadId, run: RunId, token: CancellationToken) {
    let mut ticker = tokio::time::interval(inner.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick fires immediately; the first poll waits one full period.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let listing = tokio::select! {
            _ = token.cancelled() => break,
            listing = inner.service.list_messages(&thread, Some(&run)) => listing,
        };

        match listing {
            Ok(listing) => {
                let completed = listing.status.is_completed();
                let transcript = chronological(listing.messages);
                let current = inner.state.send_if_modified(|s| {
                    if token.is_cancelled() || s.run.as_ref() != Some(&run) {
                        return false;
                    }
                    s.messages = transcript;
                    if completed {
                        s.run = None;
                        s.typing = false;
                    }
                    true
                });
                if !current {
                    break;
                }
                if completed {
                    info!("Chat run {} completed", run);
                    token.cancel();
                    break;
                }
            }
            Err(e) => {
                warn!("Failed to poll chat run {}: {}", run, e);
                inner.state.send_modify(|s| s.typing = false);
            }
        }
    }
    debug!("Stopped polling chat run {}", run);
}

fn greeting() -> ChatMessage {
    ChatMessage {
        id: "1".to_string(),
        text: GREETING.to_string(),
        sender: Sender::Assistant,
        timestamp: Utc::now(),
    }
}

fn visitor_message(text: &str) -> ChatMessage {
    ChatMessage {
        id: Uuid::new_v4().to_string(),
        text: text.to_string(),
        sender: Sender::Visitor,
        timestamp: Utc::now(),
    }
}
