use murmur_core::logging::preview;
use murmur_core::{Error, PlaybackScheduler, RawPayload, Result, RevealMode, Utterance};
use murmur_transport::ChatService;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::Instrument;

/// How a submitted turn ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The service replied; `segments` utterances were revealed
    Answered { segments: usize },
    /// The service replied without data; the placeholder was revealed
    NoResponse,
    /// The request failed; the network error text was revealed
    Failed { error: String },
    /// The session was shut down before the turn finished
    Cancelled,
}

/// Handle to the background part of a turn (network call and reveal)
#[derive(Debug)]
pub struct TurnHandle {
    task: JoinHandle<TurnOutcome>,
}

impl TurnHandle {
    pub async fn wait(self) -> Result<TurnOutcome> {
        self.task.await.map_err(|e| Error::Other(format!("turn task failed: {}", e)))
    }
}

/// Accepts user input and drives one request/reveal turn at a time
#[derive(Clone)]
pub struct SendController {
    service: Arc<dyn ChatService>,
    scheduler: PlaybackScheduler,
    no_response: String,
    network_error: String,
}

impl SendController {
    pub fn new(
        service: Arc<dyn ChatService>, scheduler: PlaybackScheduler, no_response: impl Into<String>,
        network_error: impl Into<String>,
    ) -> Self {
        Self { service, scheduler, no_response: no_response.into(), network_error: network_error.into() }
    }

    pub fn is_busy(&self) -> bool {
        self.scheduler.busy().is_busy()
    }

    /// Submit the composer contents.
    ///
    /// Blank input, a turn already in progress, or a closed session leave
    /// `buffer` and all state untouched and return `None`. Otherwise the
    /// user utterance is appended, `buffer` is cleared and the request runs
    /// on a spawned task. Must be called from within a tokio runtime.
    pub fn submit(&self, buffer: &mut String) -> Option<TurnHandle> {
        if buffer.trim().is_empty() {
            tracing::debug!("ignoring blank input");
            return None;
        }

        let store = self.scheduler.store();
        if store.is_closed() {
            tracing::debug!("ignoring input after shutdown");
            return None;
        }

        let busy = self.scheduler.busy();
        if !busy.try_acquire() {
            tracing::info!(input = %preview(buffer, 40), "still waiting for the previous reply, input ignored");
            return None;
        }

        let input = std::mem::take(buffer);
        store.append(Utterance::user(input.clone()));
        tracing::info!(input = %preview(&input, 80), "sending user input");

        let service = Arc::clone(&self.service);
        let scheduler = self.scheduler.clone();
        let no_response = self.no_response.clone();
        let network_error = self.network_error.clone();
        let span = tracing::info_span!("turn", chars = input.chars().count());

        let task = tokio::spawn(
            async move {
                let cancel = scheduler.cancel_token().clone();
                let result = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        scheduler.busy().release();
                        return TurnOutcome::Cancelled;
                    }
                    result = service.send_chat(&input) => result,
                };

                let (reply, outcome) = match result {
                    Ok(Some(reply)) => {
                        tracing::debug!(reply = %preview(&reply, 80), "reply received");
                        (reply, None)
                    }
                    Ok(None) => {
                        tracing::debug!("reply without data");
                        (no_response, Some(TurnOutcome::NoResponse))
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "chat request failed");
                        (network_error, Some(TurnOutcome::Failed { error: e.to_string() }))
                    }
                };

                let revealed = scheduler.reveal(vec![RawPayload::system(reply)], RevealMode::Timed).await;
                if revealed.is_cancelled() {
                    return TurnOutcome::Cancelled;
                }
                outcome.unwrap_or(TurnOutcome::Answered { segments: revealed.appended() })
            }
            .instrument(span),
        );

        Some(TurnHandle { task })
    }
}
