use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::super::domain::Documento;
use super::config::ScoringConfig;
use super::{build_result, Check, CheckOutcome, ValidationResult};

const NEW_VERSION_RECOMMENDATION: &str = "Solicitar una nueva versión del documento";
const DESCRIPTIVE_NAME_MIN_CHARS: usize = 3;

/// Quality checks applied to a single uploaded document, each worth one sixth of the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCheck {
    FormatoValido,
    #[serde(rename = "tamaño_adecuado")]
    TamanoAdecuado,
    Legibilidad,
    InformacionCompleta,
    FechaValida,
    Autenticidad,
}

impl Check for DocumentCheck {
    fn label(self) -> &'static str {
        match self {
            DocumentCheck::FormatoValido => "formato_valido",
            DocumentCheck::TamanoAdecuado => "tamaño_adecuado",
            DocumentCheck::Legibilidad => "legibilidad",
            DocumentCheck::InformacionCompleta => "informacion_completa",
            DocumentCheck::FechaValida => "fecha_valida",
            DocumentCheck::Autenticidad => "autenticidad",
        }
    }

    fn problem(self) -> &'static str {
        match self {
            DocumentCheck::FormatoValido => {
                "Formato de archivo no válido o tipo de documento no identificado"
            }
            DocumentCheck::TamanoAdecuado => "No se encontró el archivo del documento",
            DocumentCheck::Legibilidad => "El documento podría no ser legible",
            DocumentCheck::InformacionCompleta => "Información del documento incompleta",
            DocumentCheck::FechaValida => "La fecha del documento no es válida",
            DocumentCheck::Autenticidad => "No se pudo verificar la autenticidad del documento",
        }
    }

    fn recommendation(self) -> Option<&'static str> {
        match self {
            DocumentCheck::FormatoValido => Some("Verificar el tipo de documento asignado"),
            DocumentCheck::TamanoAdecuado => None,
            DocumentCheck::Legibilidad => Some("Verificar la legibilidad del archivo"),
            DocumentCheck::InformacionCompleta => {
                Some("Completar la información del tipo de documento")
            }
            DocumentCheck::FechaValida => Some("Corregir la fecha del documento"),
            DocumentCheck::Autenticidad => Some("Solicitar un documento vigente y verificable"),
        }
    }
}

/// Evaluates the six quality checks; `today` decides the date and expiry checks.
pub fn document_checks(documento: &Documento, today: NaiveDate) -> Vec<CheckOutcome<DocumentCheck>> {
    let has_file = documento.has_file();
    let has_type_reference = documento.has_valid_type_reference();
    let type_name = documento.tipo_nombre();
    let has_type_name = type_name.is_some();
    let descriptive_name = type_name
        .map(|nombre| nombre.chars().filter(|c| !c.is_whitespace()).count())
        .map(|chars| chars >= DESCRIPTIVE_NAME_MIN_CHARS)
        .unwrap_or(false);
    let dated_in_past = documento
        .fecha_subida
        .map(|fecha| fecha <= today)
        .unwrap_or(false);
    let expired = documento.esta_vencido(today);

    vec![
        CheckOutcome::new(DocumentCheck::FormatoValido, has_file && has_type_reference),
        CheckOutcome::new(DocumentCheck::TamanoAdecuado, has_file),
        CheckOutcome::new(DocumentCheck::Legibilidad, has_file && descriptive_name),
        CheckOutcome::new(
            DocumentCheck::InformacionCompleta,
            has_type_name && has_type_reference && documento.cliente_id > 0,
        ),
        CheckOutcome::new(DocumentCheck::FechaValida, dated_in_past),
        CheckOutcome::new(
            DocumentCheck::Autenticidad,
            has_file && has_type_name && has_type_reference && !expired,
        ),
    ]
}

/// Scores uploaded documents for reviewer triage.
#[derive(Debug, Clone, Default)]
pub struct DocumentQualityScorer {
    config: ScoringConfig,
}

impl DocumentQualityScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn score(
        &self,
        documento: &Documento,
        evaluado_en: DateTime<Utc>,
    ) -> ValidationResult<DocumentCheck> {
        let checks = document_checks(documento, evaluado_en.date_naive());
        let mut result = build_result(documento.documento_id, checks, Vec::new(), evaluado_en);

        if result.score < self.config.review_threshold {
            result
                .recomendaciones
                .insert(0, NEW_VERSION_RECOMMENDATION.to_string());
        }

        debug!(
            documento_id = documento.documento_id,
            score = result.score,
            nivel_riesgo = result.nivel_riesgo.label(),
            "scored document quality"
        );

        result
    }
}
