use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Mexican regulatory person type attached to every client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TipoPersona {
    #[serde(rename = "PF")]
    Pf,
    #[serde(rename = "PF_AE")]
    PfAe,
    #[serde(rename = "PM")]
    Pm,
}

impl TipoPersona {
    pub const fn label(self) -> &'static str {
        match self {
            TipoPersona::Pf => "PF",
            TipoPersona::PfAe => "PF_AE",
            TipoPersona::Pm => "PM",
        }
    }

    /// Legal (moral) persons are named by `razon_social` instead of personal names.
    pub const fn is_moral(self) -> bool {
        matches!(self, TipoPersona::Pm)
    }
}

/// Customer snapshot as delivered by the back office API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cliente {
    #[serde(default, deserialize_with = "null_as_default")]
    pub cliente_id: i64,
    pub tipo_persona: TipoPersona,
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub apellido_paterno: Option<String>,
    #[serde(default)]
    pub apellido_materno: Option<String>,
    #[serde(default)]
    pub razon_social: Option<String>,
    #[serde(default)]
    pub rfc: Option<String>,
    #[serde(default)]
    pub curp: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub fecha_registro: Option<NaiveDate>,
}

impl Cliente {
    /// Name under the naming scheme matching `tipo_persona`, if any part is populated.
    pub fn display_name(&self) -> Option<String> {
        if self.tipo_persona.is_moral() {
            if let Some(razon_social) = present(&self.razon_social) {
                return Some(razon_social.to_string());
            }
        }

        let parts: Vec<&str> = [
            &self.nombre,
            &self.apellido_paterno,
            &self.apellido_materno,
        ]
        .into_iter()
        .filter_map(present)
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    pub fn nombre_completo(&self) -> String {
        self.display_name()
            .unwrap_or_else(|| format!("Cliente #{}", self.cliente_id))
    }

    pub fn has_name(&self) -> bool {
        self.display_name().is_some()
    }

    pub fn has_email(&self) -> bool {
        present(&self.email).is_some()
    }

    pub fn has_rfc(&self) -> bool {
        present(&self.rfc).is_some()
    }

    /// Identity and contact data required before an application can be backed.
    pub fn is_complete(&self) -> bool {
        self.has_name() && self.has_email() && self.has_rfc()
    }
}

/// Catalog entry describing a kind of supporting document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentoTipo {
    #[serde(default)]
    pub documento_tipo_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nombre: String,
    #[serde(default = "applies_by_default")]
    pub aplica_pf: bool,
    #[serde(default = "applies_by_default")]
    pub aplica_pfae: bool,
    #[serde(default = "applies_by_default")]
    pub aplica_pm: bool,
    #[serde(default)]
    pub vigencia_dias: Option<u32>,
}

fn applies_by_default() -> bool {
    true
}

impl DocumentoTipo {
    pub fn applies_to(&self, tipo_persona: TipoPersona) -> bool {
        match tipo_persona {
            TipoPersona::Pf => self.aplica_pf,
            TipoPersona::PfAe => self.aplica_pfae,
            TipoPersona::Pm => self.aplica_pm,
        }
    }
}

/// Reviewer-driven status of an uploaded document.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DocumentoEstatus {
    #[default]
    Pendiente,
    Aceptado,
    Rechazado,
    Vencido,
}

impl DocumentoEstatus {
    pub const fn label(self) -> &'static str {
        match self {
            DocumentoEstatus::Pendiente => "pendiente",
            DocumentoEstatus::Aceptado => "aceptado",
            DocumentoEstatus::Rechazado => "rechazado",
            DocumentoEstatus::Vencido => "vencido",
        }
    }
}

/// Uploaded file instance belonging to exactly one client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Documento {
    #[serde(default)]
    pub documento_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cliente_id: i64,
    #[serde(default)]
    pub solicitud_id: Option<i64>,
    #[serde(default)]
    pub documento_tipo_id: i64,
    #[serde(default)]
    pub documento_tipo: Option<DocumentoTipo>,
    #[serde(default)]
    pub estatus: DocumentoEstatus,
    #[serde(default)]
    pub archivo_url: Option<String>,
    #[serde(default)]
    pub fecha_subida: Option<NaiveDate>,
    #[serde(default)]
    pub fecha_expiracion: Option<NaiveDate>,
    #[serde(default)]
    pub comentarios: Option<String>,
}

impl Documento {
    pub fn tipo_nombre(&self) -> Option<&str> {
        self.documento_tipo
            .as_ref()
            .map(|tipo| tipo.nombre.trim())
            .filter(|nombre| !nombre.is_empty())
    }

    /// Type id from the record itself, falling back to the joined catalog entry.
    pub fn effective_tipo_id(&self) -> i64 {
        if self.documento_tipo_id > 0 {
            return self.documento_tipo_id;
        }
        self.documento_tipo
            .as_ref()
            .map(|tipo| tipo.documento_tipo_id)
            .unwrap_or(0)
    }

    pub fn has_file(&self) -> bool {
        present(&self.archivo_url).is_some()
    }

    pub fn has_valid_type_reference(&self) -> bool {
        self.effective_tipo_id() > 0
    }

    /// Explicit expiration, or upload date plus the catalog validity window.
    pub fn expiration_date(&self) -> Option<NaiveDate> {
        if let Some(fecha) = self.fecha_expiracion {
            return Some(fecha);
        }

        let vigencia = self.documento_tipo.as_ref()?.vigencia_dias?;
        self.fecha_subida
            .and_then(|subida| subida.checked_add_signed(Duration::days(i64::from(vigencia))))
    }

    pub fn esta_vencido(&self, today: NaiveDate) -> bool {
        if self.estatus == DocumentoEstatus::Vencido {
            return true;
        }
        self.expiration_date()
            .map(|fecha| fecha < today)
            .unwrap_or(false)
    }

    pub fn display_label(&self) -> String {
        match self.tipo_nombre() {
            Some(nombre) => nombre.to_string(),
            None => format!("Documento #{}", self.documento_id),
        }
    }
}

/// Status of a credit application; see [`SolicitudEstatus::can_transition_to`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SolicitudEstatus {
    #[default]
    Iniciada,
    EnRevision,
    Aprobada,
    Rechazada,
    Cancelada,
}

impl SolicitudEstatus {
    pub const fn label(self) -> &'static str {
        match self {
            SolicitudEstatus::Iniciada => "iniciada",
            SolicitudEstatus::EnRevision => "en_revision",
            SolicitudEstatus::Aprobada => "aprobada",
            SolicitudEstatus::Rechazada => "rechazada",
            SolicitudEstatus::Cancelada => "cancelada",
        }
    }

    pub fn ordered() -> [SolicitudEstatus; 5] {
        [
            SolicitudEstatus::Iniciada,
            SolicitudEstatus::EnRevision,
            SolicitudEstatus::Aprobada,
            SolicitudEstatus::Rechazada,
            SolicitudEstatus::Cancelada,
        ]
    }

    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            SolicitudEstatus::Aprobada | SolicitudEstatus::Rechazada | SolicitudEstatus::Cancelada
        )
    }

    /// Statuses a reviewer can still act on.
    pub const fn is_actionable(self) -> bool {
        !self.is_terminal()
    }

    pub const fn can_transition_to(self, next: SolicitudEstatus) -> bool {
        matches!(
            (self, next),
            (SolicitudEstatus::Iniciada, SolicitudEstatus::EnRevision)
                | (SolicitudEstatus::Iniciada, SolicitudEstatus::Cancelada)
                | (SolicitudEstatus::EnRevision, SolicitudEstatus::Aprobada)
                | (SolicitudEstatus::EnRevision, SolicitudEstatus::Rechazada)
                | (SolicitudEstatus::EnRevision, SolicitudEstatus::Cancelada)
        )
    }
}

/// Credit product codes offered on an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProductoCodigo {
    #[serde(rename = "CS")]
    Cs,
    #[serde(rename = "CC")]
    Cc,
    #[serde(rename = "FA")]
    Fa,
    #[serde(rename = "AR")]
    Ar,
}

impl ProductoCodigo {
    pub const fn code(self) -> &'static str {
        match self {
            ProductoCodigo::Cs => "CS",
            ProductoCodigo::Cc => "CC",
            ProductoCodigo::Fa => "FA",
            ProductoCodigo::Ar => "AR",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ProductoCodigo::Cs => "Crédito Simple",
            ProductoCodigo::Cc => "Crédito en Cuenta Corriente",
            ProductoCodigo::Fa => "Factoraje",
            ProductoCodigo::Ar => "Arrendamiento",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SolicitudProducto {
    pub producto: ProductoCodigo,
    #[serde(default, deserialize_with = "null_as_default")]
    pub monto: Decimal,
    #[serde(default)]
    pub plazo_meses: u16,
}

/// Loan application snapshot, optionally joined with its client and documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Solicitud {
    pub solicitud_id: i64,
    #[serde(default)]
    pub cliente_id: Option<i64>,
    #[serde(default)]
    pub cliente: Option<Cliente>,
    #[serde(default)]
    pub estatus: SolicitudEstatus,
    #[serde(default)]
    pub productos: Vec<SolicitudProducto>,
    #[serde(default)]
    pub documentos: Vec<Documento>,
    #[serde(default)]
    pub monto_solicitado: Option<Decimal>,
    #[serde(default)]
    pub fecha_creacion: Option<NaiveDate>,
    #[serde(default)]
    pub asignado_a: Option<i64>,
    #[serde(default)]
    pub comentarios: Option<String>,
}

impl Solicitud {
    pub fn has_cliente_id(&self) -> bool {
        matches!(self.cliente_id, Some(id) if id != 0)
    }

    /// Requested amount, or the sum of product amounts when none was captured.
    pub fn monto_total(&self) -> Option<Decimal> {
        if let Some(monto) = self.monto_solicitado {
            return Some(monto);
        }
        if self.productos.is_empty() {
            return None;
        }
        Some(self.productos.iter().map(|producto| producto.monto).sum())
    }

    pub fn transition(&mut self, next: SolicitudEstatus) -> Result<(), WorkflowError> {
        if !self.estatus.can_transition_to(next) {
            return Err(WorkflowError::InvalidTransition {
                solicitud_id: self.solicitud_id,
                from: self.estatus.label(),
                to: next.label(),
            });
        }
        self.estatus = next;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("solicitud #{solicitud_id} cannot move from {from} to {to}")]
    InvalidTransition {
        solicitud_id: i64,
        from: &'static str,
        to: &'static str,
    },
}

/// Missing and `null` values both fall back to the type's default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
