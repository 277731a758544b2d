use std::sync::Arc;

use chrono::{TimeZone, Utc};
use solicitudes::review::{
    FilterSpec, RecordSnapshot, ReviewService, RiskTier, ScoringConfig, SnapshotSource,
    SolicitudEstatus,
};

const SNAPSHOT: &str = r#"{
  "clientes": [
    { "cliente_id": 1, "tipo_persona": "PF", "nombre": "Ana", "apellido_paterno": "Lopez",
      "email": "ana@example.com", "rfc": "LOAA850101AB1" },
    { "cliente_id": 2, "tipo_persona": "PM", "razon_social": "Grupo Norte SA de CV",
      "email": "contacto@gruponorte.mx", "rfc": "GNO010101AB1" }
  ],
  "documento_tipos": [
    { "documento_tipo_id": 1, "nombre": "INE", "aplica_pm": false },
    { "documento_tipo_id": 2, "nombre": "Comprobante de Ingresos" },
    { "documento_tipo_id": 3, "nombre": "Comprobante de Domicilio", "vigencia_dias": 90 }
  ],
  "documentos": [
    { "documento_id": 10, "cliente_id": 1, "solicitud_id": 100, "documento_tipo_id": 1,
      "estatus": "aceptado", "archivo_url": "https://files.example.com/10.pdf",
      "fecha_subida": "2026-09-01" },
    { "documento_id": 11, "cliente_id": 1, "solicitud_id": 100, "documento_tipo_id": 2,
      "estatus": "aceptado", "archivo_url": "https://files.example.com/11.pdf",
      "fecha_subida": "2026-09-01" },
    { "documento_id": 12, "cliente_id": 1, "solicitud_id": 100, "documento_tipo_id": 3,
      "estatus": "pendiente", "archivo_url": "https://files.example.com/12.pdf",
      "fecha_subida": "2026-06-01" }
  ],
  "solicitudes": [
    { "solicitud_id": 100, "cliente_id": 1, "estatus": "en_revision",
      "productos": [ { "producto": "CS", "monto": "75000", "plazo_meses": 12 } ],
      "fecha_creacion": "2026-09-02", "asignado_a": 3 },
    { "solicitud_id": 101, "cliente_id": 2, "estatus": "aprobada",
      "productos": [ { "producto": "AR", "monto": "250000", "plazo_meses": 36 } ],
      "monto_solicitado": "250000", "fecha_creacion": "2026-08-15" },
    { "solicitud_id": 102, "cliente_id": 0, "estatus": "iniciada" }
  ]
}"#;

fn service() -> ReviewService<SnapshotSource> {
    let snapshot = RecordSnapshot::from_reader(SNAPSHOT.as_bytes()).expect("snapshot parses");
    ReviewService::new(Arc::new(SnapshotSource::new(snapshot)), ScoringConfig::default())
        .with_clock(|| {
            Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0)
                .single()
                .expect("valid timestamp")
        })
}

#[test]
fn snapshot_join_attaches_clients_catalog_and_documents() {
    let snapshot = RecordSnapshot::from_reader(SNAPSHOT.as_bytes()).expect("snapshot parses");

    let first = &snapshot.solicitudes[0];
    assert_eq!(
        first.cliente.as_ref().map(|cliente| cliente.nombre_completo()),
        Some("Ana Lopez".to_string())
    );
    assert_eq!(first.documentos.len(), 3);
    assert_eq!(
        snapshot.documentos[2].tipo_nombre(),
        Some("Comprobante de Domicilio")
    );
    assert!(snapshot.solicitudes[2].cliente.is_none());
}

#[test]
fn reviewer_pipeline_over_snapshot() {
    let service = service();

    let partition = service.partition().expect("partition");
    assert_eq!(partition.valid.len(), 2);
    assert_eq!(partition.invalid[0].solicitud_id, 102);

    let report = service.client_completeness(1).expect("completeness");
    assert!(report.documentos_faltantes.is_empty());
    assert_eq!(report.porcentaje_completitud, 100);

    let validation = service.application_validation(100).expect("validation");
    assert_eq!(validation.score, 100);
    assert_eq!(validation.nivel_riesgo, RiskTier::Bajo);

    // Domicilio proof expired after its 90 day validity window.
    let quality = service.document_quality(12).expect("quality");
    assert_eq!(quality.score, 83);
    assert_eq!(
        quality.recomendaciones,
        vec!["Solicitar un documento vigente y verificable".to_string()]
    );

    let dashboard = service.dashboard().expect("dashboard");
    assert_eq!(dashboard.documentos_vencidos, 1);
    assert_eq!(dashboard.documentos_pendientes, 1);
}

#[test]
fn approval_support_never_changes_status() {
    let service = service();

    let support = service.approval_support(100).expect("approval support");
    let after = service
        .search(&FilterSpec::default())
        .expect("search")
        .into_iter()
        .find(|solicitud| solicitud.solicitud_id == 100)
        .expect("application still listed");

    assert!(support.puntaje_general <= 100);
    assert_eq!(after.estatus, SolicitudEstatus::EnRevision);
}

#[test]
fn persona_moral_cannot_hold_ine() {
    let snapshot = RecordSnapshot::from_reader(SNAPSHOT.as_bytes()).expect("snapshot parses");
    let moral = &snapshot.clientes[1];
    let mut misfiled = snapshot.documentos[0].clone();
    misfiled.cliente_id = moral.cliente_id;

    assert!(!solicitudes::review::coherence_check(&misfiled, moral));
}
