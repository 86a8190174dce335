use murmur_core::{HistoryOrder, PlaybackScheduler, RawPayload, Result, RevealMode, RevealOutcome};
use murmur_transport::ChatService;
use std::sync::Arc;

/// Fetches past turns for a session and replays them instantly
#[derive(Clone)]
pub struct HistoryLoader {
    service: Arc<dyn ChatService>,
    scheduler: PlaybackScheduler,
    order: HistoryOrder,
    network_error: String,
}

impl HistoryLoader {
    pub fn new(
        service: Arc<dyn ChatService>, scheduler: PlaybackScheduler, order: HistoryOrder,
        network_error: impl Into<String>,
    ) -> Self {
        Self { service, scheduler, order, network_error: network_error.into() }
    }

    /// Past turns in chronological order, or the transport error.
    pub async fn load(&self, session_id: &str) -> Result<Vec<RawPayload>> {
        let records = self.service.fetch_history(session_id).await?;
        let payloads: Vec<RawPayload> = records.into_iter().map(|record| record.into_payload()).collect();
        Ok(self.order.into_chronological(payloads))
    }

    /// Load history and append it to the store without pacing.
    ///
    /// A transport failure is shown as a single system utterance carrying
    /// the configured network error text; it is never returned to the caller.
    pub async fn replay(&self, session_id: &str) -> RevealOutcome {
        let batch = match self.load(session_id).await {
            Ok(batch) => {
                tracing::info!(session_id, payloads = batch.len(), "history loaded");
                batch
            }
            Err(e) => {
                tracing::warn!(session_id, error = %e, "history request failed");
                vec![RawPayload::system(self.network_error.clone())]
            }
        };

        self.scheduler.reveal(batch, RevealMode::Instant).await
    }
}
