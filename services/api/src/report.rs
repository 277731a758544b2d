use crate::infra::{evaluation_instant, load_source, parse_date};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;
use rust_decimal::Decimal;
use solicitudes::config::AppConfig;
use solicitudes::error::AppError;
use solicitudes::review::format::{
    format_currency, format_date, format_percentage, format_phone, is_valid_email,
    is_valid_rfc_for,
};
use solicitudes::review::{
    classify_expiry, write_solicitudes_csv, Check, ExpiryStatus, FilterSpec, ProductoCodigo,
    RecordSource, ReviewService, ScoringConfig, SnapshotSource, HUMAN_DECISION_NOTICE,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ReviewArgs {
    /// JSON record snapshot to review
    #[arg(long)]
    pub(crate) snapshot: PathBuf,
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Only review this application
    #[arg(long)]
    pub(crate) solicitud: Option<i64>,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// JSON record snapshot to export from
    #[arg(long)]
    pub(crate) snapshot: PathBuf,
    /// Keep applications in these statuses (repeatable)
    #[arg(long)]
    pub(crate) estatus: Vec<String>,
    /// Keep applications offering any of these product codes (CS, CC, FA, AR)
    #[arg(long, value_parser = parse_producto)]
    pub(crate) producto: Vec<ProductoCodigo>,
    /// Earliest creation date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) fecha_desde: Option<NaiveDate>,
    /// Latest creation date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) fecha_hasta: Option<NaiveDate>,
    #[arg(long)]
    pub(crate) monto_minimo: Option<Decimal>,
    #[arg(long)]
    pub(crate) monto_maximo: Option<Decimal>,
    /// Free-text search over id, status, client name, RFC and products
    #[arg(long)]
    pub(crate) search: Option<String>,
    #[arg(long)]
    pub(crate) cliente_id: Option<i64>,
    #[arg(long)]
    pub(crate) asignado_a: Option<i64>,
    /// Evaluation date used for the completeness columns (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Write to this file instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

impl ExportArgs {
    pub(crate) fn filter_spec(&self) -> FilterSpec {
        FilterSpec {
            estatus: Some(self.estatus.clone()).filter(|set| !set.is_empty()),
            productos: Some(self.producto.clone()).filter(|set| !set.is_empty()),
            fecha_desde: self.fecha_desde,
            fecha_hasta: self.fecha_hasta,
            monto_minimo: self.monto_minimo,
            monto_maximo: self.monto_maximo,
            search: self.search.clone(),
            cliente_id: self.cliente_id,
            asignado_a: self.asignado_a,
        }
    }
}

pub(crate) fn parse_producto(raw: &str) -> Result<ProductoCodigo, String> {
    let code = raw.trim().to_ascii_uppercase();
    [
        ProductoCodigo::Cs,
        ProductoCodigo::Cc,
        ProductoCodigo::Fa,
        ProductoCodigo::Ar,
    ]
    .into_iter()
    .find(|producto| producto.code() == code)
    .ok_or_else(|| format!("unknown product code '{raw}' (expected CS, CC, FA or AR)"))
}

fn build_service(
    source: Arc<SnapshotSource>,
    scoring: ScoringConfig,
    evaluado_en: DateTime<Utc>,
) -> ReviewService<SnapshotSource> {
    ReviewService::new(source, scoring).with_clock(move || evaluado_en)
}

pub(crate) fn run_review(args: ReviewArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let source = Arc::new(load_source(Some(args.snapshot.as_path()))?);
    let evaluado_en = evaluation_instant(args.today);
    let service = build_service(source.clone(), config.scoring, evaluado_en);

    let output = render_review(&service, source.as_ref(), args.solicitud, evaluado_en)?;
    print!("{output}");
    Ok(())
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let source = Arc::new(load_source(Some(args.snapshot.as_path()))?);
    let evaluado_en = evaluation_instant(args.today);
    let service = build_service(source, config.scoring, evaluado_en);

    let matching = service.search(&args.filter_spec())?;
    match &args.output {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            write_solicitudes_csv(file, &matching, evaluado_en)?;
            eprintln!("Exported {} solicitudes to {}", matching.len(), path.display());
        }
        None => write_solicitudes_csv(std::io::stdout().lock(), &matching, evaluado_en)?,
    }
    Ok(())
}

pub(crate) fn render_review<S: RecordSource + 'static>(
    service: &ReviewService<S>,
    source: &S,
    only: Option<i64>,
    evaluado_en: DateTime<Utc>,
) -> Result<String, AppError> {
    let today = evaluado_en.date_naive();
    let mut lines = vec![format!("Credit application review ({})", format_date(today))];

    let partition = service.partition()?;
    lines.push(String::new());
    lines.push(format!(
        "Client references: {} valid | {} with errors",
        partition.valid.len(),
        partition.invalid.len()
    ));
    lines.extend(partition.errors.iter().map(|error| format!("- {error}")));

    lines.push(String::new());
    lines.push("Applications".to_string());
    let solicitudes = source.solicitudes()?;
    for solicitud in solicitudes
        .iter()
        .filter(|solicitud| only.map_or(true, |id| solicitud.solicitud_id == id))
    {
        let validation = service.application_validation(solicitud.solicitud_id)?;
        let cliente = solicitud
            .cliente
            .as_ref()
            .map(|cliente| cliente.nombre_completo())
            .unwrap_or_else(|| "sin cliente".to_string());
        let monto = solicitud
            .monto_total()
            .map(format_currency)
            .unwrap_or_else(|| "-".to_string());
        lines.push(format!(
            "#{} {} | {} | {} | completeness {} ({})",
            solicitud.solicitud_id,
            cliente,
            solicitud.estatus.label(),
            monto,
            format_percentage(validation.score),
            validation.nivel_riesgo.label()
        ));
        lines.extend(
            validation
                .failed_checks()
                .map(|check| format!("    ! {}: {}", check.label(), check.problem())),
        );
        lines.extend(
            validation
                .recomendaciones
                .iter()
                .map(|recomendacion| format!("    > {recomendacion}")),
        );

        let support = service.approval_support(solicitud.solicitud_id)?;
        let criterios = support.criterios;
        lines.push(format!(
            "    Approval support: {} -> {} (documentacion {}, solvencia {}, experiencia {}, riesgo {})",
            support.puntaje_general,
            support.recomendacion.label(),
            criterios.documentacion,
            criterios.solvencia,
            criterios.experiencia,
            criterios.riesgo
        ));
    }
    lines.push(String::new());
    lines.push(HUMAN_DECISION_NOTICE.to_string());

    if only.is_none() {
        render_clients(&mut lines, service, source)?;
        render_documents(&mut lines, service, source, today)?;

        let summary = service.dashboard()?;
        lines.push(String::new());
        lines.push("Summary".to_string());
        lines.push(format!(
            "- {} applications | {} requested | {} approved | approval rate {}",
            summary.total_solicitudes,
            format_currency(summary.monto_total),
            format_currency(summary.monto_aprobado),
            format_percentage(summary.tasa_aprobacion)
        ));
        lines.push(format!(
            "- Documents: {} pending | {} expired | {} expiring soon",
            summary.documentos_pendientes,
            summary.documentos_vencidos,
            summary.documentos_por_vencer
        ));
        lines.push(format!(
            "- Average completeness {}",
            format_percentage(summary.completitud_promedio)
        ));
    }

    let mut output = lines.join("\n");
    output.push('\n');
    Ok(output)
}

fn render_clients<S: RecordSource + 'static>(
    lines: &mut Vec<String>,
    service: &ReviewService<S>,
    source: &S,
) -> Result<(), AppError> {
    let mut cliente_ids: Vec<i64> = source
        .solicitudes()?
        .iter()
        .filter_map(|solicitud| solicitud.cliente.as_ref().map(|cliente| cliente.cliente_id))
        .collect();
    cliente_ids.sort_unstable();
    cliente_ids.dedup();

    lines.push(String::new());
    lines.push("Clients".to_string());
    for cliente_id in cliente_ids {
        let Some(cliente) = source.cliente(cliente_id)? else {
            continue;
        };
        let report = service.client_completeness(cliente_id)?;
        lines.push(format!(
            "{} ({}) documentation {}{}",
            cliente.nombre_completo(),
            cliente.tipo_persona.label(),
            format_percentage(report.porcentaje_completitud),
            if report.es_completo { "" } else { " incomplete" }
        ));
        if !report.documentos_faltantes.is_empty() {
            lines.push(format!("    missing: {}", report.documentos_faltantes.join(", ")));
        }
        if !report.documentos_invalidos.is_empty() {
            lines.push(format!(
                "    inconsistent: {}",
                report.documentos_invalidos.join(", ")
            ));
        }
        if let Some(rfc) = cliente.rfc.as_deref() {
            if !is_valid_rfc_for(rfc, cliente.tipo_persona) {
                lines.push(format!("    RFC '{rfc}' does not match the person type"));
            }
        }
        if let Some(email) = cliente.email.as_deref() {
            if !is_valid_email(email) {
                lines.push(format!("    email '{email}' looks invalid"));
            }
        }
        if let Some(telefono) = cliente.telefono.as_deref() {
            lines.push(format!("    phone {}", format_phone(telefono)));
        }
    }
    Ok(())
}

fn render_documents<S: RecordSource + 'static>(
    lines: &mut Vec<String>,
    service: &ReviewService<S>,
    source: &S,
    today: NaiveDate,
) -> Result<(), AppError> {
    let warning_days = service.config().expiry_warning_days;
    lines.push(String::new());
    lines.push("Documents".to_string());
    for documento in source.documentos()? {
        let quality = service.document_quality(documento.documento_id)?;
        let expiry = match classify_expiry(&documento, today, warning_days) {
            ExpiryStatus::SinVencimiento => "no expiry".to_string(),
            ExpiryStatus::Vigente => "valid".to_string(),
            ExpiryStatus::PorVencer { dias_restantes } => {
                format!("expires in {dias_restantes} days")
            }
            ExpiryStatus::Vencido => "expired".to_string(),
        };
        lines.push(format!(
            "#{} {} (cliente {}) quality {} ({}) | {} | {}",
            documento.documento_id,
            documento.display_label(),
            documento.cliente_id,
            quality.score,
            quality.nivel_riesgo.label(),
            documento.estatus.label(),
            expiry
        ));
    }
    Ok(())
}
