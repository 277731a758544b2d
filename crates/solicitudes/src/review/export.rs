use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::Solicitud;
use super::format::{format_currency, format_date};
use super::scoring::ApplicationScorer;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write CSV export: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush CSV export: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Serialize)]
struct SolicitudRow {
    solicitud_id: i64,
    cliente: String,
    tipo_persona: &'static str,
    estatus: &'static str,
    productos: String,
    monto: String,
    fecha_creacion: String,
    completitud: u8,
    nivel_riesgo: &'static str,
}

/// Writes the list view of applications as CSV, one row per application.
pub fn write_solicitudes_csv<W: Write>(
    writer: W,
    solicitudes: &[Solicitud],
    evaluado_en: DateTime<Utc>,
) -> Result<(), ExportError> {
    let scorer = ApplicationScorer;
    let mut csv_writer = csv::Writer::from_writer(writer);

    for solicitud in solicitudes {
        let result = scorer.score(solicitud, evaluado_en);
        let productos: Vec<&str> = solicitud
            .productos
            .iter()
            .map(|producto| producto.producto.code())
            .collect();

        csv_writer.serialize(SolicitudRow {
            solicitud_id: solicitud.solicitud_id,
            cliente: solicitud
                .cliente
                .as_ref()
                .map(|cliente| cliente.nombre_completo())
                .unwrap_or_default(),
            tipo_persona: solicitud
                .cliente
                .as_ref()
                .map(|cliente| cliente.tipo_persona.label())
                .unwrap_or(""),
            estatus: solicitud.estatus.label(),
            productos: productos.join("|"),
            monto: solicitud
                .monto_total()
                .map(format_currency)
                .unwrap_or_default(),
            fecha_creacion: solicitud
                .fecha_creacion
                .map(format_date)
                .unwrap_or_default(),
            completitud: result.score,
            nivel_riesgo: result.nivel_riesgo.label(),
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}
