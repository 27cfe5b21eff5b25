//! Fire-and-forget recording of calculations and leads.
//!
//! A [`Recorder`] owns a worker thread that drains an mpsc channel into an
//! [`EventSink`]. Callers never wait on the sink and never see its errors;
//! failures are logged by the worker.

pub mod lead;
pub mod sink;

pub use lead::{LeadRecord, LeadSubmission};
pub use sink::{JsonLinesSink, MemorySink};

use crate::calculation::calculator::CalculationInput;
use crate::calculation::result::CalculationResult;
use crate::core::catalog::ScenarioType;
use crate::core::currency::CurrencyCode;
use crate::core::selector::Selection;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("I/O error writing event: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize event: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("recorder channel is closed")]
    ChannelClosed,

    #[error("recorder worker panicked")]
    WorkerPanicked,
}

/// Where the caller's request came from, when known.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestInfo {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationRecord {
    /// Catalog key, e.g. `marketing-hub`.
    pub category: String,
    pub scenario_type: ScenarioType,
    /// Key of the scenario actually used, after fallback.
    pub specific_scenario: String,
    pub currency: CurrencyCode,
    pub investment: Decimal,
    pub usd_investment: Decimal,
    pub request: Option<RequestInfo>,
    pub result: CalculationResult,
    pub recorded_at: DateTime<Utc>,
}

impl CalculationRecord {
    pub fn new(
        input: &CalculationInput,
        selection: &Selection<'_>,
        scenario_type: ScenarioType,
        request: Option<RequestInfo>,
        result: &CalculationResult,
    ) -> Self {
        Self {
            category: selection.category_key.to_string(),
            scenario_type,
            specific_scenario: selection.scenario_key.to_string(),
            currency: input.currency.clone(),
            investment: input.investment,
            usd_investment: result.projection.usd_investment,
            request,
            result: result.clone(),
            recorded_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RecordedEvent {
    Calculation(CalculationRecord),
    Lead(LeadRecord),
}

impl RecordedEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            RecordedEvent::Calculation(_) => "calculation",
            RecordedEvent::Lead(_) => "lead",
        }
    }
}

/// Destination for recorded events. Called only from the worker thread.
pub trait EventSink: Send + 'static {
    fn write(&self, event: &RecordedEvent) -> Result<(), RecordError>;

    fn flush(&self) -> Result<(), RecordError> {
        Ok(())
    }
}

/// Counts reported by the worker when it exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecorderStats {
    pub written: u64,
    pub failed: u64,
}

/// Non-blocking handle to the recording worker.
///
/// Dropping the handle closes the channel and waits for queued events to
/// drain; [`Recorder::shutdown`] does the same and returns the counts.
pub struct Recorder {
    sender: Option<Sender<RecordedEvent>>,
    worker: Option<JoinHandle<RecorderStats>>,
}

impl Recorder {
    /// Start a worker thread writing into `sink`.
    pub fn spawn<S: EventSink>(sink: S) -> Result<Self, RecordError> {
        let (sender, receiver) = mpsc::channel::<RecordedEvent>();
        let worker = thread::Builder::new()
            .name("roi-recorder".to_string())
            .spawn(move || {
                let mut stats = RecorderStats::default();
                for event in receiver {
                    match sink.write(&event) {
                        Ok(()) => stats.written += 1,
                        Err(e) => {
                            stats.failed += 1;
                            log::error!("failed to record {} event: {e}", event.kind());
                        }
                    }
                }
                if let Err(e) = sink.flush() {
                    log::error!("failed to flush recorder sink: {e}");
                }
                log::debug!(
                    "recorder stopped: {} written, {} failed",
                    stats.written,
                    stats.failed
                );
                stats
            })?;

        Ok(Self {
            sender: Some(sender),
            worker: Some(worker),
        })
    }

    /// Queue an event. Never blocks and never fails the caller.
    pub fn record(&self, event: RecordedEvent) {
        let Some(sender) = &self.sender else {
            log::error!("dropping {} event: {}", event.kind(), RecordError::ChannelClosed);
            return;
        };
        if let Err(mpsc::SendError(event)) = sender.send(event) {
            log::error!("dropping {} event: {}", event.kind(), RecordError::ChannelClosed);
        }
    }

    /// Close the channel and wait for every queued event to be written.
    pub fn shutdown(mut self) -> Result<RecorderStats, RecordError> {
        self.finish()
    }

    fn finish(&mut self) -> Result<RecorderStats, RecordError> {
        self.sender.take();
        match self.worker.take() {
            Some(worker) => worker.join().map_err(|_| RecordError::WorkerPanicked),
            None => Ok(RecorderStats::default()),
        }
    }
}

impl Drop for Recorder {
    fn drop(&mut self) {
        if let Err(e) = self.finish() {
            log::error!("recorder shutdown failed: {e}");
        }
    }
}
