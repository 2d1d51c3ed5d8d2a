use crate::{db::key::CodecError, types::RowKey};

///
/// ScanTraceSink
///

pub trait ScanTraceSink: Send + Sync {
    fn on_event(&self, event: &ScanTraceEvent);
}

///
/// ScanTraceEvent
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ScanTraceEvent {
    PageFetched {
        row: RowKey,
        requested: usize,
        returned: usize,
    },
    Seek {
        row: RowKey,
    },
    MalformedSkipped {
        row: RowKey,
        reason: CodecError,
    },
    Exhausted {
        row: RowKey,
    },
    Failed {
        row: RowKey,
    },
}

///
/// NoopTraceSink
///

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopTraceSink;

impl ScanTraceSink for NoopTraceSink {
    fn on_event(&self, _: &ScanTraceEvent) {}
}

/// Mirror one event to `tracing` and forward it to the optional sink.
pub fn emit(sink: Option<&dyn ScanTraceSink>, event: ScanTraceEvent) {
    match &event {
        ScanTraceEvent::PageFetched {
            row,
            requested,
            returned,
        } => tracing::debug!(%row, requested, returned, "index page fetched"),
        ScanTraceEvent::Seek { row } => tracing::debug!(%row, "index scan seek"),
        ScanTraceEvent::MalformedSkipped { row, reason } => {
            tracing::warn!(%row, %reason, "skipped malformed index column");
        }
        ScanTraceEvent::Exhausted { row } => tracing::debug!(%row, "index scan exhausted"),
        ScanTraceEvent::Failed { row } => tracing::error!(%row, "index scan failed"),
    }

    if let Some(sink) = sink {
        sink.on_event(&event);
    }
}
