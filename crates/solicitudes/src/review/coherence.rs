use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{Cliente, Documento, DocumentoTipo, TipoPersona};
use super::scoring::rounded_percentage;

/// A document a client of some person type must have on file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredDocument {
    pub nombre: String,
    /// When set, the requirement is satisfied by type id instead of by name.
    #[serde(default)]
    pub documento_tipo_id: Option<i64>,
}

impl RequiredDocument {
    pub fn by_name(nombre: impl Into<String>) -> Self {
        Self {
            nombre: nombre.into(),
            documento_tipo_id: None,
        }
    }

    pub fn by_id(nombre: impl Into<String>, documento_tipo_id: i64) -> Self {
        Self {
            nombre: nombre.into(),
            documento_tipo_id: Some(documento_tipo_id),
        }
    }

    pub fn is_satisfied_by(&self, documento: &Documento) -> bool {
        match self.documento_tipo_id {
            Some(id) => documento.effective_tipo_id() == id,
            None => documento
                .documento_tipo
                .as_ref()
                .map(|tipo| tipo.nombre.contains(self.nombre.as_str()))
                .unwrap_or(false),
        }
    }
}

const PERSONA_FISICA_REQUIRED: [&str; 3] = [
    "INE",
    "Comprobante de Ingresos",
    "Comprobante de Domicilio",
];

const PERSONA_MORAL_REQUIRED: [&str; 4] = [
    "RFC",
    "Acta Constitutiva",
    "Comprobante de Domicilio Fiscal",
    "Estados Financieros",
];

/// Which documents each person type has to provide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredDocumentPolicy {
    requirements: BTreeMap<TipoPersona, Vec<RequiredDocument>>,
}

impl RequiredDocumentPolicy {
    pub fn new(requirements: BTreeMap<TipoPersona, Vec<RequiredDocument>>) -> Self {
        Self { requirements }
    }

    /// Fixed lookup table used by the back office: natural persons, with or without business
    /// activity, share one list and legal persons have their own.
    pub fn standard() -> Self {
        let fisica: Vec<RequiredDocument> = PERSONA_FISICA_REQUIRED
            .iter()
            .map(|nombre| RequiredDocument::by_name(*nombre))
            .collect();
        let moral = PERSONA_MORAL_REQUIRED
            .iter()
            .map(|nombre| RequiredDocument::by_name(*nombre))
            .collect();

        let mut requirements = BTreeMap::new();
        requirements.insert(TipoPersona::Pf, fisica.clone());
        requirements.insert(TipoPersona::PfAe, fisica);
        requirements.insert(TipoPersona::Pm, moral);
        Self { requirements }
    }

    /// Requirements derived from the catalog applicability flags, matched by type id.
    pub fn from_catalog(catalog: &[DocumentoTipo]) -> Self {
        let mut requirements = BTreeMap::new();
        for tipo_persona in [TipoPersona::Pf, TipoPersona::PfAe, TipoPersona::Pm] {
            let required = catalog
                .iter()
                .filter(|tipo| tipo.applies_to(tipo_persona))
                .map(|tipo| RequiredDocument::by_id(tipo.nombre.clone(), tipo.documento_tipo_id))
                .collect();
            requirements.insert(tipo_persona, required);
        }
        Self { requirements }
    }

    pub fn required_for(&self, tipo_persona: TipoPersona) -> &[RequiredDocument] {
        self.requirements
            .get(&tipo_persona)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl Default for RequiredDocumentPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

/// Completeness of a client's documentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletenessReport {
    pub cliente_id: i64,
    pub es_completo: bool,
    pub documentos_faltantes: Vec<String>,
    pub documentos_invalidos: Vec<String>,
    pub porcentaje_completitud: u8,
}

/// Checks a client's documents against the required set and against the client itself.
#[derive(Debug, Clone, Default)]
pub struct CoherenceValidator {
    policy: RequiredDocumentPolicy,
}

impl CoherenceValidator {
    pub fn with_policy(policy: RequiredDocumentPolicy) -> Self {
        Self { policy }
    }

    pub fn validate_completeness(
        &self,
        cliente: &Cliente,
        documentos: &[Documento],
    ) -> CompletenessReport {
        let required = self.policy.required_for(cliente.tipo_persona);

        let documentos_faltantes: Vec<String> = required
            .iter()
            .filter(|requirement| {
                !documentos
                    .iter()
                    .any(|documento| requirement.is_satisfied_by(documento))
            })
            .map(|requirement| requirement.nombre.clone())
            .collect();

        let documentos_invalidos: Vec<String> = documentos
            .iter()
            .filter(|documento| !coherence_check(documento, cliente))
            .map(Documento::display_label)
            .collect();

        let satisfied = required.len() - documentos_faltantes.len();
        // An empty requirement list counts as fully documented.
        let porcentaje_completitud = if required.is_empty() {
            100
        } else {
            rounded_percentage(satisfied, required.len())
        };

        let es_completo = documentos_faltantes.is_empty() && documentos_invalidos.is_empty();

        debug!(
            cliente_id = cliente.cliente_id,
            tipo_persona = cliente.tipo_persona.label(),
            missing = documentos_faltantes.len(),
            invalid = documentos_invalidos.len(),
            porcentaje_completitud,
            "validated client documentation"
        );

        CompletenessReport {
            cliente_id: cliente.cliente_id,
            es_completo,
            documentos_faltantes,
            documentos_invalidos,
            porcentaje_completitud,
        }
    }
}

/// Whether a document is consistent with the client it is attached to.
pub fn coherence_check(documento: &Documento, cliente: &Cliente) -> bool {
    let belongs_to_client = documento.cliente_id == cliente.cliente_id;

    let nombre = documento
        .documento_tipo
        .as_ref()
        .map(|tipo| tipo.nombre.as_str())
        .unwrap_or("");
    let fisica_with_acta =
        cliente.tipo_persona == TipoPersona::Pf && nombre.contains("Acta Constitutiva");
    let moral_with_curp = cliente.tipo_persona == TipoPersona::Pm && nombre.contains("CURP");

    let not_applicable = documento
        .documento_tipo
        .as_ref()
        .map(|tipo| !tipo.applies_to(cliente.tipo_persona))
        .unwrap_or(false);

    belongs_to_client && !fisica_with_acta && !moral_with_curp && !not_applicable
}
