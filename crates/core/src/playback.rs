//! Paced reveal of raw payloads into the conversation log.
//!
//! A payload is split into segments (see [`crate::segment`]) and each
//! segment becomes one utterance. History replays instantly; live replies
//! wait a length-proportional delay before each segment to mimic typing,
//! holding the [`BusySignal`] for the whole sequence.

use crate::busy::BusySignal;
use crate::message::{RawPayload, Utterance};
use crate::pacing::PacingPolicy;
use crate::segment::{DEFAULT_SENTINEL, split_segments};
use crate::store::MessageStore;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio_util::sync::CancellationToken;

/// How a batch is revealed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealMode {
    /// No delay and no busy toggling (history replay)
    Instant,
    /// Per-segment delay with the busy signal held (live replies)
    Timed,
}

impl RevealMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RevealMode::Instant => "instant",
            RevealMode::Timed => "timed",
        }
    }
}

/// Scheduler state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Revealing,
}

/// Result of one `reveal` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Every segment of the batch was appended
    Completed { appended: usize },
    /// The session was torn down part way; later segments were dropped
    Cancelled { appended: usize },
}

impl RevealOutcome {
    pub fn appended(&self) -> usize {
        match self {
            RevealOutcome::Completed { appended } | RevealOutcome::Cancelled { appended } => *appended,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RevealOutcome::Cancelled { .. })
    }
}

/// Splits payloads into segments and reveals them into the [`MessageStore`]
///
/// Clones share one state: history replay and a live turn may overlap, and
/// the scheduler stays `Revealing` until the last of them finishes. The send
/// path keeps at most one timed reveal running through the busy signal.
#[derive(Debug, Clone)]
pub struct PlaybackScheduler {
    store: MessageStore,
    busy: BusySignal,
    pacing: PacingPolicy,
    sentinel: char,
    cancel: CancellationToken,
    active: Arc<AtomicUsize>,
}

impl PlaybackScheduler {
    pub fn new(store: MessageStore, busy: BusySignal, pacing: PacingPolicy) -> Self {
        Self {
            store,
            busy,
            pacing,
            sentinel: DEFAULT_SENTINEL,
            cancel: CancellationToken::new(),
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_sentinel(mut self, sentinel: char) -> Self {
        self.sentinel = sentinel;
        self
    }

    /// Tie pending delays to an externally owned token (session teardown).
    pub fn with_cancel_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn state(&self) -> PlaybackState {
        if self.active.load(Ordering::Acquire) > 0 { PlaybackState::Revealing } else { PlaybackState::Idle }
    }

    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    pub fn busy(&self) -> &BusySignal {
        &self.busy
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Reveal `batch` in order.
    pub async fn reveal(&self, batch: Vec<RawPayload>, mode: RevealMode) -> RevealOutcome {
        let _active = ActiveReveal::enter(&self.active);
        tracing::debug!(payloads = batch.len(), mode = mode.as_str(), "reveal started");

        let outcome = match mode {
            RevealMode::Instant => self.reveal_instant(&batch),
            RevealMode::Timed => {
                let outcome = self.reveal_timed(&batch).await;
                self.busy.release();
                outcome
            }
        };

        tracing::debug!(appended = outcome.appended(), cancelled = outcome.is_cancelled(), "reveal finished");
        outcome
    }

    fn reveal_instant(&self, batch: &[RawPayload]) -> RevealOutcome {
        let mut appended = 0;
        for payload in batch {
            for segment in split_segments(&payload.content, self.sentinel) {
                if self.cancel.is_cancelled() {
                    return RevealOutcome::Cancelled { appended };
                }
                if self.store.append(Utterance::new(payload.role, segment)) {
                    appended += 1;
                }
            }
        }
        RevealOutcome::Completed { appended }
    }

    async fn reveal_timed(&self, batch: &[RawPayload]) -> RevealOutcome {
        let mut appended = 0;
        for payload in batch {
            for segment in split_segments(&payload.content, self.sentinel) {
                self.busy.set(true);
                let delay = self.pacing.delay_for(segment);
                tracing::trace!(delay_ms = delay.as_millis() as u64, chars = segment.chars().count(), "pacing segment");

                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => return RevealOutcome::Cancelled { appended },
                    _ = tokio::time::sleep(delay) => {}
                }

                if self.store.append(Utterance::new(payload.role, segment)) {
                    appended += 1;
                }
            }
        }
        RevealOutcome::Completed { appended }
    }
}

/// Counts one running reveal; decrements on drop so an aborted task
/// does not leave the scheduler stuck in `Revealing`.
struct ActiveReveal<'a>(&'a AtomicUsize);

impl<'a> ActiveReveal<'a> {
    fn enter(active: &'a AtomicUsize) -> Self {
        active.fetch_add(1, Ordering::AcqRel);
        Self(active)
    }
}

impl Drop for ActiveReveal<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;
    use std::time::Duration;
    use tokio::time::{Instant, sleep};

    fn fixture() -> (PlaybackScheduler, MessageStore, BusySignal) {
        let store = MessageStore::new();
        let busy = BusySignal::new();
        let scheduler = PlaybackScheduler::new(store.clone(), busy.clone(), PacingPolicy::default());
        (scheduler, store, busy)
    }

    fn contents(store: &MessageStore) -> Vec<String> {
        store.snapshot().iter().map(|u| u.content().to_string()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_reveal_appends_each_segment_in_order() {
        let (scheduler, store, busy) = fixture();

        let outcome = scheduler
            .reveal(vec![RawPayload::system(" a $b$$ c "), RawPayload::system("d")], RevealMode::Timed)
            .await;

        assert_eq!(outcome, RevealOutcome::Completed { appended: 4 });
        assert_eq!(contents(&store), vec!["a", "b", "c", "d"]);
        assert!(store.snapshot().iter().all(|u| u.role() == Role::System));
        assert!(!busy.is_busy());
        assert_eq!(scheduler.state(), PlaybackState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_segment_reply_is_paced_one_second_apart() {
        let (scheduler, store, busy) = fixture();
        busy.set(true);

        let task = tokio::spawn({
            let scheduler = scheduler.clone();
            async move { scheduler.reveal(vec![RawPayload::system("你好$在吗")], RevealMode::Timed).await }
        });

        sleep(Duration::from_millis(999)).await;
        assert!(store.is_empty());
        assert!(busy.is_busy());
        assert_eq!(scheduler.state(), PlaybackState::Revealing);

        sleep(Duration::from_millis(2)).await;
        assert_eq!(contents(&store), vec!["你好"]);
        assert!(busy.is_busy());

        sleep(Duration::from_millis(998)).await;
        assert_eq!(store.len(), 1);
        assert!(busy.is_busy());

        sleep(Duration::from_millis(2)).await;
        assert_eq!(contents(&store), vec!["你好", "在吗"]);
        assert!(!busy.is_busy());

        assert_eq!(task.await.unwrap(), RevealOutcome::Completed { appended: 2 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_total_duration_follows_pacing() {
        let (scheduler, _store, _busy) = fixture();
        let start = Instant::now();

        scheduler
            .reveal(vec![RawPayload::system(format!("{}${}", "x".repeat(30), "y".repeat(90)))], RevealMode::Timed)
            .await;

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(3000 + 5000));
        assert!(elapsed < Duration::from_millis(3000 + 5000 + 10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_instant_reveal_has_no_delay_and_leaves_busy_alone() {
        let (scheduler, store, busy) = fixture();
        let mut busy_rx = busy.subscribe();
        let start = Instant::now();

        let outcome = scheduler
            .reveal(
                vec![RawPayload::user("question"), RawPayload::system(format!("{}$short", "x".repeat(80)))],
                RevealMode::Instant,
            )
            .await;

        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(outcome.appended(), 3);
        assert_eq!(store.snapshot()[0].role(), Role::User);
        assert!(!busy_rx.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_reveal_without_segments_releases_busy() {
        let (scheduler, store, busy) = fixture();
        busy.set(true);

        let outcome = scheduler.reveal(vec![RawPayload::system(" $ $ ")], RevealMode::Timed).await;

        assert_eq!(outcome, RevealOutcome::Completed { appended: 0 });
        assert!(store.is_empty());
        assert!(!busy.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_mid_reveal_stops_appending() {
        let (scheduler, store, busy) = fixture();

        let task = tokio::spawn({
            let scheduler = scheduler.clone();
            async move { scheduler.reveal(vec![RawPayload::system("one$two$three")], RevealMode::Timed).await }
        });

        sleep(Duration::from_millis(1500)).await;
        scheduler.cancel_token().cancel();

        let outcome = task.await.unwrap();
        assert_eq!(outcome, RevealOutcome::Cancelled { appended: 1 });
        assert_eq!(contents(&store), vec!["one"]);
        assert!(!busy.is_busy());

        sleep(Duration::from_secs(10)).await;
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_store_is_not_written() {
        let (scheduler, store, _busy) = fixture();
        store.close();

        let outcome = scheduler.reveal(vec![RawPayload::system("a$b")], RevealMode::Timed).await;

        assert_eq!(outcome, RevealOutcome::Completed { appended: 0 });
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_instant_reveal_keeps_timed_state() {
        let (scheduler, store, _busy) = fixture();

        let timed = tokio::spawn({
            let scheduler = scheduler.clone();
            async move { scheduler.reveal(vec![RawPayload::system("reply")], RevealMode::Timed).await }
        });
        sleep(Duration::from_millis(100)).await;
        assert_eq!(scheduler.state(), PlaybackState::Revealing);

        let history = scheduler.clone();
        history.reveal(vec![RawPayload::user("old")], RevealMode::Instant).await;
        assert_eq!(scheduler.state(), PlaybackState::Revealing);
        assert_eq!(contents(&store), vec!["old"]);

        timed.await.unwrap();
        assert_eq!(scheduler.state(), PlaybackState::Idle);
        assert_eq!(contents(&store), vec!["old", "reply"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_aborted_reveal_returns_to_idle() {
        let (scheduler, _store, _busy) = fixture();

        let task = tokio::spawn({
            let scheduler = scheduler.clone();
            async move { scheduler.reveal(vec![RawPayload::system("slow")], RevealMode::Timed).await }
        });
        sleep(Duration::from_millis(100)).await;
        assert_eq!(scheduler.state(), PlaybackState::Revealing);

        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());
        assert_eq!(scheduler.state(), PlaybackState::Idle);
    }

    #[tokio::test]
    async fn test_custom_sentinel() {
        let (scheduler, store, _busy) = fixture();
        let scheduler = scheduler.with_sentinel('|');

        scheduler.reveal(vec![RawPayload::system("a|b$c")], RevealMode::Instant).await;

        assert_eq!(contents(&store), vec!["a", "b$c"]);
    }
}
