use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use super::domain::{Cliente, Documento, DocumentoTipo, Solicitud};
use super::source::{RecordSource, SourceError};

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read record snapshot: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid record snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Export of back office records, as produced by the backend list endpoints.
///
/// Records are parsed one at a time; a malformed record is logged and skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSnapshot")]
pub struct RecordSnapshot {
    pub clientes: Vec<Cliente>,
    pub documento_tipos: Vec<DocumentoTipo>,
    pub documentos: Vec<Documento>,
    pub solicitudes: Vec<Solicitud>,
}

#[derive(Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    clientes: Vec<Value>,
    #[serde(default)]
    documento_tipos: Vec<Value>,
    #[serde(default)]
    documentos: Vec<Value>,
    #[serde(default)]
    solicitudes: Vec<Value>,
}

impl From<RawSnapshot> for RecordSnapshot {
    fn from(raw: RawSnapshot) -> Self {
        Self {
            clientes: parse_records("cliente", raw.clientes),
            documento_tipos: parse_records("documento_tipo", raw.documento_tipos),
            documentos: parse_records("documento", raw.documentos),
            solicitudes: parse_records("solicitud", raw.solicitudes),
        }
    }
}

fn parse_records<T: DeserializeOwned>(kind: &'static str, values: Vec<Value>) -> Vec<T> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(error) => {
                warn!(kind, index, %error, "skipping malformed record in snapshot");
                None
            }
        })
        .collect()
}

impl RecordSnapshot {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SnapshotError> {
        let file = std::fs::File::open(path.as_ref())?;
        let snapshot = Self::from_reader(file)?;
        info!(
            path = %path.as_ref().display(),
            solicitudes = snapshot.solicitudes.len(),
            clientes = snapshot.clientes.len(),
            documentos = snapshot.documentos.len(),
            "loaded record snapshot"
        );
        Ok(snapshot)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SnapshotError> {
        let snapshot: RecordSnapshot = serde_json::from_reader(reader)?;
        Ok(snapshot.joined())
    }

    /// Attaches catalog entries to documents, and clients and documents to applications,
    /// wherever the export left them unresolved.
    pub fn joined(mut self) -> Self {
        let catalog: HashMap<i64, DocumentoTipo> = self
            .documento_tipos
            .iter()
            .filter(|tipo| tipo.documento_tipo_id > 0)
            .map(|tipo| (tipo.documento_tipo_id, tipo.clone()))
            .collect();
        for documento in &mut self.documentos {
            if documento.documento_tipo.is_none() && documento.documento_tipo_id > 0 {
                documento.documento_tipo = catalog.get(&documento.documento_tipo_id).cloned();
            }
        }

        let clientes: HashMap<i64, Cliente> = self
            .clientes
            .iter()
            .map(|cliente| (cliente.cliente_id, cliente.clone()))
            .collect();
        for solicitud in &mut self.solicitudes {
            if solicitud.cliente.is_none() {
                solicitud.cliente = solicitud
                    .cliente_id
                    .and_then(|id| clientes.get(&id).cloned());
            }
            if solicitud.documentos.is_empty() {
                solicitud.documentos = self
                    .documentos
                    .iter()
                    .filter(|documento| documento.solicitud_id == Some(solicitud.solicitud_id))
                    .cloned()
                    .collect();
            }
        }

        self
    }
}

/// Read-only [`RecordSource`] over a loaded snapshot.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSource {
    snapshot: RecordSnapshot,
}

impl SnapshotSource {
    pub fn new(snapshot: RecordSnapshot) -> Self {
        Self {
            snapshot: snapshot.joined(),
        }
    }
}

impl RecordSource for SnapshotSource {
    fn solicitudes(&self) -> Result<Vec<Solicitud>, SourceError> {
        Ok(self.snapshot.solicitudes.clone())
    }

    fn solicitud(&self, id: i64) -> Result<Option<Solicitud>, SourceError> {
        Ok(self
            .snapshot
            .solicitudes
            .iter()
            .find(|solicitud| solicitud.solicitud_id == id)
            .cloned())
    }

    fn cliente(&self, id: i64) -> Result<Option<Cliente>, SourceError> {
        Ok(self
            .snapshot
            .clientes
            .iter()
            .find(|cliente| cliente.cliente_id == id)
            .cloned())
    }

    fn documentos(&self) -> Result<Vec<Documento>, SourceError> {
        Ok(self.snapshot.documentos.clone())
    }

    fn documento(&self, id: i64) -> Result<Option<Documento>, SourceError> {
        Ok(self
            .snapshot
            .documentos
            .iter()
            .find(|documento| documento.documento_id == id)
            .cloned())
    }

    fn documentos_for(&self, cliente_id: i64) -> Result<Vec<Documento>, SourceError> {
        Ok(self
            .snapshot
            .documentos
            .iter()
            .filter(|documento| documento.cliente_id == cliente_id)
            .cloned()
            .collect())
    }
}
