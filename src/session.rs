//! Conversation state for one chat with the assistant.
//!
//! A [`ConversationSession`] owns the transcript of a single conversation.
//! Submitting an utterance appends the user's message immediately and
//! schedules the assistant's reply on the tokio runtime. The reply is
//! appended once a simulated latency has elapsed, so callers can keep
//! reading the transcript (or submitting more utterances) in the meantime.
//!
//! Replies are cancellable tasks. Dropping the session, or calling
//! [`ConversationSession::cancel_pending`], invalidates every reply still in
//! flight and guarantees none of them will touch the transcript afterwards.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rand::Rng;
use tokio::select;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::assistant::ResponseEngine;
use crate::chat::{ChatMessage, MessageId, Origin, Transcript};

/// The simulated time the assistant takes to answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Latency {
    /// Every reply waits at least this long.
    pub base: Duration,
    /// Upper bound of a uniformly random delay added on top of `base`.
    pub jitter: Duration,
}

impl Default for Latency {
    fn default() -> Self {
        Latency {
            base: Duration::from_millis(1000),
            jitter: Duration::ZERO,
        }
    }
}

impl Latency {
    #[cfg(test)]
    pub(crate) fn fixed(base: Duration) -> Latency {
        Latency {
            base,
            jitter: Duration::ZERO,
        }
    }

    fn sample(&self) -> Duration {
        if self.jitter.is_zero() {
            return self.base;
        }

        let jitter_ms = self.jitter.as_millis() as u64;
        let extra = rand::thread_rng().gen_range(0..=jitter_ms);

        self.base + Duration::from_millis(extra)
    }
}

#[derive(Debug, Default)]
struct SessionState {
    transcript: Transcript,
    /// Number of replies scheduled under the current cancellation token and
    /// not yet appended. Cancelling the token zeroes it.
    pending: usize,
}

type SharedState = Arc<Mutex<SessionState>>;

fn lock(state: &SharedState) -> MutexGuard<'_, SessionState> {
    // The transcript only ever grows by whole messages, so a panic while the
    // lock was held cannot leave it half-written.
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) struct ConversationSession {
    engine: ResponseEngine,
    latency: Latency,
    state: SharedState,
    /// Parent of every reply's token. Replaced after `cancel_pending`.
    cancel: CancellationToken,
    replies: JoinSet<()>,
}

impl ConversationSession {
    /// Starts a new conversation whose transcript holds the assistant's
    /// greeting and nothing else.
    pub(crate) fn start(engine: ResponseEngine, latency: Latency) -> ConversationSession {
        let mut transcript = Transcript::new();

        transcript.append(Origin::Bot, engine.greeting().to_string());

        ConversationSession {
            engine,
            latency,
            state: Arc::new(Mutex::new(SessionState {
                transcript,
                pending: 0,
            })),
            cancel: CancellationToken::new(),
            replies: JoinSet::new(),
        }
    }

    /// Submits an utterance on behalf of the user.
    ///
    /// Leading and trailing whitespace is trimmed. An utterance that is empty
    /// after trimming is ignored and `None` is returned. Otherwise the user's
    /// message is appended before this returns, and the assistant's reply follows
    /// once the latency elapses.
    ///
    /// Must be called from within a tokio runtime.
    pub(crate) fn submit(&mut self, text: &str) -> Option<MessageId> {
        let utterance = text.trim();

        if utterance.is_empty() {
            debug!("ignoring an empty utterance");
            return None;
        }

        self.reap_finished();

        let id = {
            let mut state = lock(&self.state);

            state.pending += 1;

            state.transcript.append(Origin::User, utterance.to_string())
        };

        let delay = self.latency.sample();

        let topic = self.engine.classify(utterance);

        debug!(id = %id, ?topic, ?delay, "scheduling a reply");

        let reply = Reply {
            utterance: utterance.to_string(),
            engine: self.engine,
            delay,
            state: Arc::clone(&self.state),
            cancel: self.cancel.child_token(),
        };

        self.replies.spawn(reply.run());

        Some(id)
    }

    /// Returns a snapshot of the conversation so far.
    pub(crate) fn transcript(&self) -> Vec<ChatMessage> {
        lock(&self.state).transcript.messages().to_vec()
    }

    /// Returns the messages at position `from` and later.
    pub(crate) fn messages_since(&self, from: usize) -> Vec<ChatMessage> {
        let state = lock(&self.state);

        state
            .transcript
            .messages()
            .get(from..)
            .map(|messages| messages.to_vec())
            .unwrap_or_default()
    }

    pub(crate) fn len(&self) -> usize {
        lock(&self.state).transcript.len()
    }

    /// Whether at least one reply is still on its way.
    pub(crate) fn is_pending(&self) -> bool {
        lock(&self.state).pending > 0
    }

    /// Waits until every reply scheduled so far has been appended or cancelled.
    pub(crate) async fn settle(&mut self) {
        while let Some(result) = self.replies.join_next().await {
            if let Err(err) = result {
                if err.is_panic() {
                    warn!("a reply task panicked: {}", err);
                }
            }
        }
    }

    /// Cancels every reply in flight. Their messages will never be appended;
    /// later submissions are unaffected.
    pub(crate) fn cancel_pending(&mut self) {
        let cancel = std::mem::replace(&mut self.cancel, CancellationToken::new());

        let mut state = lock(&self.state);

        // Every reply still counted was spawned under `cancel`
        state.pending = 0;
        cancel.cancel();
    }

    fn reap_finished(&mut self) {
        while let Some(result) = self.replies.try_join_next() {
            if let Err(err) = result {
                if err.is_panic() {
                    warn!("a reply task panicked: {}", err);
                }
            }
        }
    }
}

impl Drop for ConversationSession {
    fn drop(&mut self) {
        let mut state = lock(&self.state);

        state.pending = 0;
        self.cancel.cancel();
    }
}

/// A reply waiting for its latency to elapse.
struct Reply {
    utterance: String,
    engine: ResponseEngine,
    delay: Duration,
    state: SharedState,
    cancel: CancellationToken,
}

impl Reply {
    async fn run(self) {
        let cancelled = select! {
            _ = self.cancel.cancelled() => true,
            _ = tokio::time::sleep(self.delay) => false,
        };

        let mut state = lock(&self.state);

        // Cancelling takes the lock too, so a reply is either delivered
        // before the cancellation or not at all. A cancelled reply has
        // already been taken off the pending count.
        if cancelled || self.cancel.is_cancelled() {
            debug!("reply cancelled before it was delivered");
            return;
        }

        state.pending -= 1;

        let reply = self.engine.respond(&self.utterance);

        let id = state.transcript.append(Origin::Bot, reply.to_string());

        debug!(id = %id, "reply delivered");
    }
}
