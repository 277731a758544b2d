use super::common::*;
use crate::review::domain::SolicitudEstatus;
use crate::review::partition::{client_reference_errors, partition_by_client_reference};

#[test]
fn orphan_application_collects_both_errors() {
    let mut orphan = orphan_solicitud(7);
    orphan.cliente_id = Some(0);

    let partition = partition_by_client_reference(&[orphan]);

    assert!(partition.valid.is_empty());
    assert_eq!(partition.invalid.len(), 1);
    assert_eq!(
        partition.errors,
        vec![
            "Solicitud #7 sin cliente_id".to_string(),
            "Solicitud #7 sin datos de cliente".to_string(),
        ]
    );
}

#[test]
fn missing_client_id_is_reported_like_zero() {
    let mut solicitud = orphan_solicitud(8);
    solicitud.cliente_id = None;
    assert_eq!(
        client_reference_errors(&solicitud),
        vec![
            "Solicitud #8 sin cliente_id".to_string(),
            "Solicitud #8 sin datos de cliente".to_string(),
        ]
    );
}

#[test]
fn client_id_without_joined_data_only_reports_missing_data() {
    let mut solicitud = solicitud(5, SolicitudEstatus::Iniciada);
    solicitud.cliente = None;

    assert_eq!(
        client_reference_errors(&solicitud),
        vec!["Solicitud #5 sin datos de cliente".to_string()]
    );
}

#[test]
fn partition_is_disjoint_and_preserves_order() {
    let solicitudes = snapshot().solicitudes;

    let partition = partition_by_client_reference(&solicitudes);

    assert_eq!(partition.len(), solicitudes.len());
    let valid_ids: Vec<i64> = partition.valid.iter().map(|s| s.solicitud_id).collect();
    let invalid_ids: Vec<i64> = partition.invalid.iter().map(|s| s.solicitud_id).collect();
    assert_eq!(valid_ids, vec![1, 2, 3]);
    assert_eq!(invalid_ids, vec![4]);
    assert!(valid_ids.iter().all(|id| !invalid_ids.contains(id)));
    assert_eq!(partition.errors.len(), 2);
}

#[test]
fn empty_input_yields_empty_partition() {
    let partition = partition_by_client_reference(&[]);
    assert!(partition.is_empty());
    assert!(partition.errors.is_empty());
}
