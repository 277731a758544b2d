use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::cache::ValidationCache;
use super::coherence::{CoherenceValidator, CompletenessReport, RequiredDocumentPolicy};
use super::dashboard::DashboardSummary;
use super::domain::Solicitud;
use super::filter::{filter_records, FilterSpec};
use super::partition::{partition_by_client_reference, SolicitudPartition};
use super::scoring::{
    ApplicationCheck, ApplicationScorer, ApprovalSupport, ApprovalSupportScorer, DocumentCheck,
    DocumentQualityScorer, ScoringConfig, ValidationResult,
};
use super::source::{RecordSource, SourceError};

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Service composing the record source with the validators, scorers and filter engine.
pub struct ReviewService<S> {
    source: Arc<S>,
    config: ScoringConfig,
    coherence: CoherenceValidator,
    documents: DocumentQualityScorer,
    applications: ApplicationScorer,
    approval: ApprovalSupportScorer,
    cache: Mutex<ValidationCache<ApplicationCheck>>,
    clock: Clock,
}

impl<S> ReviewService<S>
where
    S: RecordSource + 'static,
{
    pub fn new(source: Arc<S>, config: ScoringConfig) -> Self {
        Self {
            source,
            documents: DocumentQualityScorer::new(config.clone()),
            approval: ApprovalSupportScorer::new(config.clone()),
            applications: ApplicationScorer,
            coherence: CoherenceValidator::default(),
            cache: Mutex::new(ValidationCache::new()),
            clock: Arc::new(Utc::now),
            config,
        }
    }

    pub fn with_policy(mut self, policy: RequiredDocumentPolicy) -> Self {
        self.coherence = CoherenceValidator::with_policy(policy);
        self
    }

    /// Replaces the wall clock used to stamp results and resolve expirations.
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    fn solicitudes(&self) -> Result<Vec<Solicitud>, ReviewServiceError> {
        self.source.solicitudes().map_err(unavailable)
    }

    fn find_solicitud(&self, id: i64) -> Result<Solicitud, ReviewServiceError> {
        self.source
            .solicitud(id)
            .map_err(unavailable)?
            .ok_or(ReviewServiceError::NotFound {
                kind: "solicitud",
                id,
            })
    }

    /// Applications matching a user-entered filter.
    pub fn search(&self, spec: &FilterSpec) -> Result<Vec<Solicitud>, ReviewServiceError> {
        let solicitudes = self.solicitudes()?;
        Ok(filter_records(&solicitudes, spec))
    }

    pub fn partition(&self) -> Result<SolicitudPartition, ReviewServiceError> {
        let solicitudes = self.solicitudes()?;
        Ok(partition_by_client_reference(&solicitudes))
    }

    /// Completeness result for one application, served from cache while the list is unchanged.
    pub fn application_validation(
        &self,
        id: i64,
    ) -> Result<ValidationResult<ApplicationCheck>, ReviewServiceError> {
        let solicitudes = self.solicitudes()?;
        let solicitud = solicitudes
            .iter()
            .find(|solicitud| solicitud.solicitud_id == id)
            .ok_or(ReviewServiceError::NotFound {
                kind: "solicitud",
                id,
            })?;

        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache.sync(&solicitudes);
        let evaluado_en = self.now();
        Ok(cache.get_or_compute(id, || self.applications.score(solicitud, evaluado_en)))
    }

    pub fn application_validations(
        &self,
    ) -> Result<Vec<ValidationResult<ApplicationCheck>>, ReviewServiceError> {
        let solicitudes = self.solicitudes()?;
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache.sync(&solicitudes);
        let evaluado_en = self.now();

        Ok(solicitudes
            .iter()
            .map(|solicitud| {
                cache.get_or_compute(solicitud.solicitud_id, || {
                    self.applications.score(solicitud, evaluado_en)
                })
            })
            .collect())
    }

    pub fn document_quality(
        &self,
        id: i64,
    ) -> Result<ValidationResult<DocumentCheck>, ReviewServiceError> {
        let documento = self
            .source
            .documento(id)
            .map_err(unavailable)?
            .ok_or(ReviewServiceError::NotFound {
                kind: "documento",
                id,
            })?;
        Ok(self.documents.score(&documento, self.now()))
    }

    /// Advisory approval score; callers must present it with [`ApprovalSupport::aviso`].
    pub fn approval_support(&self, id: i64) -> Result<ApprovalSupport, ReviewServiceError> {
        let solicitud = self.find_solicitud(id)?;
        Ok(self.approval.evaluate(&solicitud, self.now()))
    }

    pub fn client_completeness(
        &self,
        cliente_id: i64,
    ) -> Result<CompletenessReport, ReviewServiceError> {
        let cliente = self
            .source
            .cliente(cliente_id)
            .map_err(unavailable)?
            .ok_or(ReviewServiceError::NotFound {
                kind: "cliente",
                id: cliente_id,
            })?;
        let documentos = self.source.documentos_for(cliente_id).map_err(unavailable)?;
        Ok(self.coherence.validate_completeness(&cliente, &documentos))
    }

    pub fn dashboard(&self) -> Result<DashboardSummary, ReviewServiceError> {
        let solicitudes = self.solicitudes()?;
        let documentos = self.source.documentos().map_err(unavailable)?;
        let today = self.now().date_naive();
        debug!(
            solicitudes = solicitudes.len(),
            documentos = documentos.len(),
            "building dashboard summary"
        );
        Ok(DashboardSummary::from_records(
            &solicitudes,
            &documentos,
            today,
            self.config.expiry_warning_days,
        ))
    }
}

fn unavailable(error: SourceError) -> ReviewServiceError {
    warn!(%error, "record source request failed");
    ReviewServiceError::Source(error)
}

/// Error raised by the review service.
#[derive(Debug, thiserror::Error)]
pub enum ReviewServiceError {
    #[error("{kind} #{id} not found")]
    NotFound { kind: &'static str, id: i64 },
    #[error(transparent)]
    Source(#[from] SourceError),
}
