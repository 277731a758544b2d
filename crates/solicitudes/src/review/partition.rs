use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::Solicitud;

/// Applications split by whether their client reference has been resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolicitudPartition {
    pub valid: Vec<Solicitud>,
    pub invalid: Vec<Solicitud>,
    pub errors: Vec<String>,
}

impl SolicitudPartition {
    pub fn len(&self) -> usize {
        self.valid.len() + self.invalid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Problems with the client reference of a single application, empty when it is usable.
pub fn client_reference_errors(solicitud: &Solicitud) -> Vec<String> {
    let mut errors = Vec::new();
    if !solicitud.has_cliente_id() {
        errors.push(format!("Solicitud #{} sin cliente_id", solicitud.solicitud_id));
    }
    if solicitud.cliente.is_none() {
        errors.push(format!(
            "Solicitud #{} sin datos de cliente",
            solicitud.solicitud_id
        ));
    }
    errors
}

/// Joining client data is the caller's job; this only inspects what is already attached.
pub fn partition_by_client_reference(solicitudes: &[Solicitud]) -> SolicitudPartition {
    let mut partition = SolicitudPartition::default();

    for solicitud in solicitudes {
        let errors = client_reference_errors(solicitud);
        if errors.is_empty() {
            partition.valid.push(solicitud.clone());
        } else {
            partition.errors.extend(errors);
            partition.invalid.push(solicitud.clone());
        }
    }

    debug!(
        total = solicitudes.len(),
        valid = partition.valid.len(),
        invalid = partition.invalid.len(),
        "partitioned solicitudes by client reference"
    );

    partition
}
