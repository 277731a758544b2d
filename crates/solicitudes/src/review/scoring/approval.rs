use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::super::domain::Solicitud;
use super::config::ScoringConfig;

/// Shown with every approval-support result.
pub const HUMAN_DECISION_NOTICE: &str = "Recomendación orientativa: la decisión de aprobar o rechazar corresponde exclusivamente al personal autorizado.";

const CRITERION_CAP: u32 = 95;

/// Suggested reviewer action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Aprobar,
    Revisar,
    Rechazar,
}

impl Recommendation {
    pub const fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => Recommendation::Aprobar,
            60..=79 => Recommendation::Revisar,
            _ => Recommendation::Rechazar,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Recommendation::Aprobar => "aprobar",
            Recommendation::Revisar => "revisar",
            Recommendation::Rechazar => "rechazar",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalCriteria {
    pub documentacion: u8,
    pub solvencia: u8,
    pub experiencia: u8,
    pub riesgo: u8,
}

impl ApprovalCriteria {
    pub fn average(&self) -> u8 {
        let sum = u32::from(self.documentacion)
            + u32::from(self.solvencia)
            + u32::from(self.experiencia)
            + u32::from(self.riesgo);
        ((sum + 2) / 4) as u8
    }
}

/// Advisory outcome only. Nothing turns this into a status transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApprovalSupport {
    pub solicitud_id: i64,
    pub criterios: ApprovalCriteria,
    pub puntaje_general: u8,
    pub recomendacion: Recommendation,
    pub aviso: &'static str,
    pub evaluado_en: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct ApprovalSupportScorer {
    config: ScoringConfig,
}

impl ApprovalSupportScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn criteria(&self, solicitud: &Solicitud) -> ApprovalCriteria {
        let document_count = solicitud.documentos.len() as u32;
        let product_count = solicitud.productos.len() as u32;
        let cliente = solicitud.cliente.as_ref();

        let documentacion = if document_count > 0 {
            capped(document_count.saturating_mul(10).saturating_add(60))
        } else {
            30
        };

        let solvencia = match cliente {
            Some(cliente) if cliente.has_rfc() && cliente.has_email() => {
                let monto = solicitud.monto_total().unwrap_or(Decimal::ZERO);
                let bonus = if monto > self.config.high_amount_threshold {
                    10
                } else {
                    20
                };
                capped(70 + bonus)
            }
            _ => 45,
        };

        let experiencia = if product_count > 0 {
            capped(product_count.saturating_mul(8).saturating_add(65))
        } else {
            40
        };

        let cliente_completo = cliente.map(|cliente| cliente.is_complete()).unwrap_or(false);
        let riesgo = if solicitud.estatus.is_actionable()
            && cliente_completo
            && document_count > 0
        {
            85
        } else {
            35
        };

        ApprovalCriteria {
            documentacion,
            solvencia,
            experiencia,
            riesgo,
        }
    }

    pub fn evaluate(&self, solicitud: &Solicitud, evaluado_en: DateTime<Utc>) -> ApprovalSupport {
        let criterios = self.criteria(solicitud);
        let puntaje_general = criterios.average();
        let recomendacion = Recommendation::from_score(puntaje_general);

        debug!(
            solicitud_id = solicitud.solicitud_id,
            puntaje_general,
            recomendacion = recomendacion.label(),
            "computed approval support"
        );

        ApprovalSupport {
            solicitud_id: solicitud.solicitud_id,
            criterios,
            puntaje_general,
            recomendacion,
            aviso: HUMAN_DECISION_NOTICE,
            evaluado_en,
        }
    }
}

fn capped(value: u32) -> u8 {
    value.min(CRITERION_CAP) as u8
}
