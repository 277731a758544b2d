//! Credit application review pipeline: client documentation coherence, client-reference
//! validation, completeness and quality scoring, advisory approval support and list filtering.
//!
//! Every validator and scorer is a pure function of the records passed in. Records arrive as
//! read-only snapshots from a [`RecordSource`]; nothing here persists or mutates them.

pub mod cache;
pub mod coherence;
pub mod dashboard;
pub mod domain;
pub mod export;
pub mod filter;
pub mod format;
pub mod partition;
pub mod router;
pub mod scoring;
pub mod service;
pub mod snapshot;
pub mod source;

#[cfg(test)]
mod tests;

pub use cache::ValidationCache;
pub use coherence::{
    coherence_check, CoherenceValidator, CompletenessReport, RequiredDocument,
    RequiredDocumentPolicy,
};
pub use dashboard::{classify_expiry, DashboardSummary, ExpiryStatus, StatusCount};
pub use domain::{
    Cliente, Documento, DocumentoEstatus, DocumentoTipo, ProductoCodigo, Solicitud,
    SolicitudEstatus, SolicitudProducto, TipoPersona, WorkflowError,
};
pub use export::{write_solicitudes_csv, ExportError};
pub use filter::{filter_records, FilterSpec, Filterable};
pub use partition::{partition_by_client_reference, SolicitudPartition};
pub use router::review_router;
pub use scoring::{
    ApplicationCheck, ApplicationScorer, ApprovalSupport, ApprovalSupportScorer, Check,
    CheckOutcome, DocumentCheck, DocumentQualityScorer, Recommendation, RiskTier, ScoringConfig,
    ValidationResult, HUMAN_DECISION_NOTICE,
};
pub use service::{ReviewService, ReviewServiceError};
pub use snapshot::{RecordSnapshot, SnapshotError, SnapshotSource};
pub use source::{RecordSource, SourceError};
