use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::super::domain::{Solicitud, SolicitudEstatus};
use super::{build_result, Check, CheckOutcome, ValidationResult};

const MANUAL_REVIEW_RECOMMENDATION: &str = "Turnar la solicitud a revisión manual";

/// Completeness checks applied to an application, each worth a fifth of the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationCheck {
    DatosCompletos,
    DocumentosRequeridos,
    ClienteVerificado,
    CumpleRequisitos,
    InformacionConsistente,
}

impl Check for ApplicationCheck {
    fn label(self) -> &'static str {
        match self {
            ApplicationCheck::DatosCompletos => "datos_completos",
            ApplicationCheck::DocumentosRequeridos => "documentos_requeridos",
            ApplicationCheck::ClienteVerificado => "cliente_verificado",
            ApplicationCheck::CumpleRequisitos => "cumple_requisitos",
            ApplicationCheck::InformacionConsistente => "informacion_consistente",
        }
    }

    fn problem(self) -> &'static str {
        match self {
            ApplicationCheck::DatosCompletos => "Faltan nombre o correo electrónico del cliente",
            ApplicationCheck::DocumentosRequeridos => "La solicitud no tiene documentos adjuntos",
            ApplicationCheck::ClienteVerificado => "La solicitud no tiene un cliente asociado",
            ApplicationCheck::CumpleRequisitos => "La solicitud fue rechazada o cancelada",
            ApplicationCheck::InformacionConsistente => {
                "La solicitud no tiene productos registrados"
            }
        }
    }

    fn recommendation(self) -> Option<&'static str> {
        match self {
            ApplicationCheck::DatosCompletos => {
                Some("Completar nombre y correo electrónico del cliente")
            }
            ApplicationCheck::DocumentosRequeridos => {
                Some("Solicitar la documentación requerida al cliente")
            }
            ApplicationCheck::ClienteVerificado => {
                Some("Vincular la solicitud con un cliente registrado")
            }
            ApplicationCheck::CumpleRequisitos => None,
            ApplicationCheck::InformacionConsistente => {
                Some("Registrar al menos un producto con monto y plazo")
            }
        }
    }
}

pub fn application_checks(solicitud: &Solicitud) -> Vec<CheckOutcome<ApplicationCheck>> {
    let datos_completos = solicitud
        .cliente
        .as_ref()
        .map(|cliente| cliente.has_name() && cliente.has_email())
        .unwrap_or(false);
    let cumple_requisitos = !matches!(
        solicitud.estatus,
        SolicitudEstatus::Rechazada | SolicitudEstatus::Cancelada
    );

    vec![
        CheckOutcome::new(ApplicationCheck::DatosCompletos, datos_completos),
        CheckOutcome::new(
            ApplicationCheck::DocumentosRequeridos,
            !solicitud.documentos.is_empty(),
        ),
        CheckOutcome::new(
            ApplicationCheck::ClienteVerificado,
            solicitud.cliente.is_some(),
        ),
        CheckOutcome::new(ApplicationCheck::CumpleRequisitos, cumple_requisitos),
        CheckOutcome::new(
            ApplicationCheck::InformacionConsistente,
            !solicitud.productos.is_empty(),
        ),
    ]
}

/// Scores how complete an application is before it goes to a reviewer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplicationScorer;

impl ApplicationScorer {
    pub fn score(
        &self,
        solicitud: &Solicitud,
        evaluado_en: DateTime<Utc>,
    ) -> ValidationResult<ApplicationCheck> {
        let checks = application_checks(solicitud);
        let mut result = build_result(solicitud.solicitud_id, checks, Vec::new(), evaluado_en);

        if result.requiere_revision_manual {
            result
                .recomendaciones
                .push(MANUAL_REVIEW_RECOMMENDATION.to_string());
        }

        debug!(
            solicitud_id = solicitud.solicitud_id,
            score = result.score,
            nivel_riesgo = result.nivel_riesgo.label(),
            "scored application completeness"
        );

        result
    }
}
