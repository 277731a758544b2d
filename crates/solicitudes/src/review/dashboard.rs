use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::domain::{Documento, DocumentoEstatus, Solicitud, SolicitudEstatus};
use super::format::days_until;
use super::scoring::{application_checks, rounded_percentage, score_checks};

/// Where a document stands relative to its expiration date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "estado", rename_all = "snake_case")]
pub enum ExpiryStatus {
    SinVencimiento,
    Vigente,
    PorVencer { dias_restantes: i64 },
    Vencido,
}

pub fn classify_expiry(documento: &Documento, today: NaiveDate, warning_days: u32) -> ExpiryStatus {
    if documento.esta_vencido(today) {
        return ExpiryStatus::Vencido;
    }

    match documento.expiration_date() {
        None => ExpiryStatus::SinVencimiento,
        Some(fecha) => {
            let dias_restantes = days_until(fecha, today);
            if dias_restantes <= i64::from(warning_days) {
                ExpiryStatus::PorVencer { dias_restantes }
            } else {
                ExpiryStatus::Vigente
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub estatus: SolicitudEstatus,
    pub estatus_label: &'static str,
    pub total: usize,
}

/// Headline figures for the back office landing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total_solicitudes: usize,
    pub por_estatus: Vec<StatusCount>,
    pub monto_total: Decimal,
    pub monto_aprobado: Decimal,
    /// Approved share of decided (approved or rejected) applications.
    pub tasa_aprobacion: u8,
    pub documentos_pendientes: usize,
    pub documentos_vencidos: usize,
    pub documentos_por_vencer: usize,
    pub completitud_promedio: u8,
}

impl DashboardSummary {
    pub fn from_records(
        solicitudes: &[Solicitud],
        documentos: &[Documento],
        today: NaiveDate,
        warning_days: u32,
    ) -> Self {
        let por_estatus = SolicitudEstatus::ordered()
            .into_iter()
            .map(|estatus| StatusCount {
                estatus,
                estatus_label: estatus.label(),
                total: solicitudes
                    .iter()
                    .filter(|solicitud| solicitud.estatus == estatus)
                    .count(),
            })
            .collect::<Vec<_>>();

        let count_of = |estatus: SolicitudEstatus| {
            por_estatus
                .iter()
                .find(|entry| entry.estatus == estatus)
                .map(|entry| entry.total)
                .unwrap_or(0)
        };
        let aprobadas = count_of(SolicitudEstatus::Aprobada);
        let decididas = aprobadas + count_of(SolicitudEstatus::Rechazada);

        let monto_total = solicitudes
            .iter()
            .filter_map(Solicitud::monto_total)
            .sum();
        let monto_aprobado = solicitudes
            .iter()
            .filter(|solicitud| solicitud.estatus == SolicitudEstatus::Aprobada)
            .filter_map(Solicitud::monto_total)
            .sum();

        let mut documentos_vencidos = 0;
        let mut documentos_por_vencer = 0;
        for documento in documentos {
            match classify_expiry(documento, today, warning_days) {
                ExpiryStatus::Vencido => documentos_vencidos += 1,
                ExpiryStatus::PorVencer { .. } => documentos_por_vencer += 1,
                ExpiryStatus::Vigente | ExpiryStatus::SinVencimiento => {}
            }
        }
        let documentos_pendientes = documentos
            .iter()
            .filter(|documento| documento.estatus == DocumentoEstatus::Pendiente)
            .count();

        let score_sum: usize = solicitudes
            .iter()
            .map(|solicitud| usize::from(score_checks(&application_checks(solicitud))))
            .sum();
        let completitud_promedio = rounded_percentage(score_sum, solicitudes.len() * 100);

        Self {
            total_solicitudes: solicitudes.len(),
            por_estatus,
            monto_total,
            monto_aprobado,
            tasa_aprobacion: rounded_percentage(aprobadas, decididas),
            documentos_pendientes,
            documentos_vencidos,
            documentos_por_vencer,
            completitud_promedio,
        }
    }
}
