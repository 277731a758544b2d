use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use solicitudes::error::AppError;
use solicitudes::review::{RecordSnapshot, SnapshotSource};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Snapshot-backed source, or an empty one when no snapshot is configured.
pub(crate) fn load_source(path: Option<&Path>) -> Result<SnapshotSource, AppError> {
    match path {
        Some(path) => Ok(SnapshotSource::new(RecordSnapshot::from_path(path)?)),
        None => {
            warn!("no record snapshot configured, serving an empty record set");
            Ok(SnapshotSource::default())
        }
    }
}

/// Evaluation instant for a reporting date: noon UTC, or now when no date is given.
pub(crate) fn evaluation_instant(today: Option<NaiveDate>) -> DateTime<Utc> {
    today
        .and_then(|date| date.and_hms_opt(12, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .unwrap_or_else(Utc::now)
}
