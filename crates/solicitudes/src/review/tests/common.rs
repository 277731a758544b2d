use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::review::domain::{
    Cliente, Documento, DocumentoEstatus, DocumentoTipo, ProductoCodigo, Solicitud,
    SolicitudEstatus, SolicitudProducto, TipoPersona,
};
use crate::review::snapshot::{RecordSnapshot, SnapshotSource};
use crate::review::source::{RecordSource, SourceError};
use crate::review::{review_router, ReviewService, ScoringConfig};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
}

pub(super) fn evaluated_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 15, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn persona_fisica() -> Cliente {
    Cliente {
        cliente_id: 1,
        tipo_persona: TipoPersona::Pf,
        nombre: Some("Ana".to_string()),
        apellido_paterno: Some("Lopez".to_string()),
        apellido_materno: None,
        razon_social: None,
        rfc: Some("LOAA850101AB1".to_string()),
        curp: Some("LOAA850101MDFPNN09".to_string()),
        email: Some("ana.lopez@example.com".to_string()),
        telefono: Some("5512345678".to_string()),
        fecha_registro: Some(date(2026, 1, 15)),
    }
}

pub(super) fn persona_moral() -> Cliente {
    Cliente {
        cliente_id: 2,
        tipo_persona: TipoPersona::Pm,
        nombre: None,
        apellido_paterno: None,
        apellido_materno: None,
        razon_social: Some("Comercializadora del Bajío SA de CV".to_string()),
        rfc: Some("CBA010101XY9".to_string()),
        curp: None,
        email: Some("finanzas@cbajio.mx".to_string()),
        telefono: None,
        fecha_registro: Some(date(2025, 6, 2)),
    }
}

pub(super) fn tipo(id: i64, nombre: &str) -> DocumentoTipo {
    DocumentoTipo {
        documento_tipo_id: id,
        nombre: nombre.to_string(),
        aplica_pf: true,
        aplica_pfae: true,
        aplica_pm: true,
        vigencia_dias: None,
    }
}

pub(super) fn documento(id: i64, cliente_id: i64, tipo: DocumentoTipo) -> Documento {
    Documento {
        documento_id: id,
        cliente_id,
        solicitud_id: None,
        documento_tipo_id: tipo.documento_tipo_id,
        documento_tipo: Some(tipo),
        estatus: DocumentoEstatus::Aceptado,
        archivo_url: Some(format!("https://files.example.com/docs/{id}.pdf")),
        fecha_subida: Some(date(2026, 9, 1)),
        fecha_expiracion: None,
        comentarios: None,
    }
}

/// A document passing all six quality checks as of [`today`].
pub(super) fn sound_document() -> Documento {
    documento(10, 1, tipo(1, "INE"))
}

pub(super) fn producto(producto: ProductoCodigo, monto: i64) -> SolicitudProducto {
    SolicitudProducto {
        producto,
        monto: Decimal::from(monto),
        plazo_meses: 24,
    }
}

pub(super) fn solicitud(id: i64, estatus: SolicitudEstatus) -> Solicitud {
    let cliente = persona_fisica();
    Solicitud {
        solicitud_id: id,
        cliente_id: Some(cliente.cliente_id),
        cliente: Some(cliente),
        estatus,
        productos: vec![producto(ProductoCodigo::Cs, 80_000)],
        documentos: vec![sound_document()],
        monto_solicitado: Some(Decimal::from(80_000)),
        fecha_creacion: Some(date(2026, 9, 10)),
        asignado_a: Some(7),
        comentarios: None,
    }
}

pub(super) fn orphan_solicitud(id: i64) -> Solicitud {
    Solicitud {
        solicitud_id: id,
        cliente_id: Some(0),
        cliente: None,
        estatus: SolicitudEstatus::Iniciada,
        productos: Vec::new(),
        documentos: Vec::new(),
        monto_solicitado: None,
        fecha_creacion: None,
        asignado_a: None,
        comentarios: None,
    }
}

pub(super) fn snapshot() -> RecordSnapshot {
    let mut aprobada = solicitud(1, SolicitudEstatus::Aprobada);
    aprobada.monto_solicitado = Some(Decimal::from(150_000));

    let mut moral = solicitud(3, SolicitudEstatus::EnRevision);
    moral.cliente_id = Some(2);
    moral.cliente = Some(persona_moral());
    moral.productos = vec![
        producto(ProductoCodigo::Fa, 300_000),
        producto(ProductoCodigo::Ar, 120_000),
    ];
    moral.monto_solicitado = None;
    moral.documentos = Vec::new();
    moral.fecha_creacion = Some(date(2026, 10, 2));
    moral.asignado_a = Some(9);

    RecordSnapshot {
        clientes: vec![persona_fisica(), persona_moral()],
        documento_tipos: vec![tipo(1, "INE"), tipo(2, "Comprobante de Ingresos")],
        documentos: vec![
            sound_document(),
            documento(11, 1, tipo(2, "Comprobante de Ingresos")),
            documento(20, 2, tipo(5, "Acta Constitutiva")),
        ],
        solicitudes: vec![
            aprobada,
            solicitud(2, SolicitudEstatus::EnRevision),
            moral,
            orphan_solicitud(4),
        ],
    }
}

pub(super) fn build_service() -> Arc<ReviewService<SnapshotSource>> {
    let source = Arc::new(SnapshotSource::new(snapshot()));
    Arc::new(ReviewService::new(source, ScoringConfig::default()).with_clock(evaluated_at))
}

pub(super) fn router() -> axum::Router {
    review_router(build_service())
}

pub(super) struct OfflineSource;

impl RecordSource for OfflineSource {
    fn solicitudes(&self) -> Result<Vec<Solicitud>, SourceError> {
        Err(SourceError::Unavailable("backend offline".to_string()))
    }

    fn solicitud(&self, _id: i64) -> Result<Option<Solicitud>, SourceError> {
        Err(SourceError::Unavailable("backend offline".to_string()))
    }

    fn cliente(&self, _id: i64) -> Result<Option<Cliente>, SourceError> {
        Err(SourceError::Unavailable("backend offline".to_string()))
    }

    fn documentos(&self) -> Result<Vec<Documento>, SourceError> {
        Err(SourceError::Unavailable("backend offline".to_string()))
    }

    fn documento(&self, _id: i64) -> Result<Option<Documento>, SourceError> {
        Err(SourceError::Unavailable("backend offline".to_string()))
    }

    fn documentos_for(&self, _cliente_id: i64) -> Result<Vec<Documento>, SourceError> {
        Err(SourceError::Unavailable("backend offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
