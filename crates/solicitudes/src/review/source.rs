use super::domain::{Cliente, Documento, Solicitud};

/// Read access to the back office records. The REST backend sits behind this in production.
pub trait RecordSource: Send + Sync {
    fn solicitudes(&self) -> Result<Vec<Solicitud>, SourceError>;
    fn solicitud(&self, id: i64) -> Result<Option<Solicitud>, SourceError>;
    fn cliente(&self, id: i64) -> Result<Option<Cliente>, SourceError>;
    fn documentos(&self) -> Result<Vec<Documento>, SourceError>;
    fn documento(&self, id: i64) -> Result<Option<Documento>, SourceError>;
    fn documentos_for(&self, cliente_id: i64) -> Result<Vec<Documento>, SourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("record not found")]
    NotFound,
    #[error("record source unavailable: {0}")]
    Unavailable(String),
}
