use crate::review::domain::{SolicitudEstatus, WorkflowError};

use super::common::*;

#[test]
fn review_flow_reaches_a_decision() {
    let mut solicitud = solicitud(1, SolicitudEstatus::Iniciada);

    solicitud
        .transition(SolicitudEstatus::EnRevision)
        .expect("iniciada moves to review");
    solicitud
        .transition(SolicitudEstatus::Aprobada)
        .expect("review can be approved");

    assert_eq!(solicitud.estatus, SolicitudEstatus::Aprobada);
    assert!(solicitud.estatus.is_terminal());
}

#[test]
fn terminal_statuses_do_not_move() {
    for terminal in [
        SolicitudEstatus::Aprobada,
        SolicitudEstatus::Rechazada,
        SolicitudEstatus::Cancelada,
    ] {
        for next in SolicitudEstatus::ordered() {
            assert!(
                !terminal.can_transition_to(next),
                "{terminal:?} -> {next:?} should be rejected"
            );
        }
    }
}

#[test]
fn skipping_review_is_rejected() {
    let mut solicitud = solicitud(9, SolicitudEstatus::Iniciada);

    let error = solicitud
        .transition(SolicitudEstatus::Aprobada)
        .expect_err("approval needs review first");

    assert_eq!(
        error,
        WorkflowError::InvalidTransition {
            solicitud_id: 9,
            from: "iniciada",
            to: "aprobada",
        }
    );
    assert_eq!(solicitud.estatus, SolicitudEstatus::Iniciada);
    assert_eq!(
        error.to_string(),
        "solicitud #9 cannot move from iniciada to aprobada"
    );
}

#[test]
fn open_applications_can_be_cancelled() {
    assert!(SolicitudEstatus::Iniciada.can_transition_to(SolicitudEstatus::Cancelada));
    assert!(SolicitudEstatus::EnRevision.can_transition_to(SolicitudEstatus::Cancelada));
    assert!(SolicitudEstatus::Iniciada.is_actionable());
    assert!(SolicitudEstatus::EnRevision.is_actionable());
}

#[test]
fn status_labels_match_backend_values() {
    for estatus in SolicitudEstatus::ordered() {
        let value = serde_json::to_value(estatus).expect("serializes");
        assert_eq!(value, serde_json::json!(estatus.label()));
    }
}
