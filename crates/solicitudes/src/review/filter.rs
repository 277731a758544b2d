use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{present, Cliente, Documento, ProductoCodigo, Solicitud};

/// Fields a record exposes to the filter engine.
pub trait Filterable {
    fn status_label(&self) -> Option<&'static str>;

    fn product_codes(&self) -> Vec<ProductoCodigo> {
        Vec::new()
    }

    /// Date the range predicates apply to.
    fn filter_date(&self) -> Option<NaiveDate>;

    fn amount(&self) -> Option<Decimal> {
        None
    }

    fn cliente_ref(&self) -> Option<i64>;

    fn asignado_a(&self) -> Option<i64> {
        None
    }

    /// Values scanned by free-text search.
    fn search_fields(&self) -> Vec<String>;
}

/// User-entered filter. Every field is optional and an absent field places no constraint.
///
/// Empty sets and blank search terms count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(default)]
    pub estatus: Option<Vec<String>>,
    #[serde(default)]
    pub productos: Option<Vec<ProductoCodigo>>,
    #[serde(default)]
    pub fecha_desde: Option<NaiveDate>,
    #[serde(default)]
    pub fecha_hasta: Option<NaiveDate>,
    #[serde(default)]
    pub monto_minimo: Option<Decimal>,
    #[serde(default)]
    pub monto_maximo: Option<Decimal>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub cliente_id: Option<i64>,
    #[serde(default)]
    pub asignado_a: Option<i64>,
}

impl FilterSpec {
    fn estatus_set(&self) -> Option<&[String]> {
        self.estatus.as_deref().filter(|set| !set.is_empty())
    }

    fn productos_set(&self) -> Option<&[ProductoCodigo]> {
        self.productos.as_deref().filter(|set| !set.is_empty())
    }

    fn search_term(&self) -> Option<String> {
        present(&self.search).map(str::to_lowercase)
    }

    pub fn is_unconstrained(&self) -> bool {
        self.estatus_set().is_none()
            && self.productos_set().is_none()
            && self.fecha_desde.is_none()
            && self.fecha_hasta.is_none()
            && self.monto_minimo.is_none()
            && self.monto_maximo.is_none()
            && self.search_term().is_none()
            && self.cliente_id.is_none()
            && self.asignado_a.is_none()
    }

    pub fn matches<T: Filterable + ?Sized>(&self, record: &T) -> bool {
        self.matches_with_term(record, self.search_term().as_deref())
    }

    fn matches_with_term<T: Filterable + ?Sized>(&self, record: &T, term: Option<&str>) -> bool {
        if let Some(set) = self.estatus_set() {
            let in_set = record
                .status_label()
                .map(|status| set.iter().any(|wanted| wanted.trim().eq_ignore_ascii_case(status)))
                .unwrap_or(false);
            if !in_set {
                return false;
            }
        }

        if let Some(set) = self.productos_set() {
            if !record.product_codes().iter().any(|code| set.contains(code)) {
                return false;
            }
        }

        if self.fecha_desde.is_some() || self.fecha_hasta.is_some() {
            let Some(date) = record.filter_date() else {
                return false;
            };
            if self.fecha_desde.is_some_and(|desde| date < desde) {
                return false;
            }
            if self.fecha_hasta.is_some_and(|hasta| date > hasta) {
                return false;
            }
        }

        if self.monto_minimo.is_some() || self.monto_maximo.is_some() {
            let Some(amount) = record.amount() else {
                return false;
            };
            if self.monto_minimo.is_some_and(|minimo| amount < minimo) {
                return false;
            }
            if self.monto_maximo.is_some_and(|maximo| amount > maximo) {
                return false;
            }
        }

        if let Some(cliente_id) = self.cliente_id {
            if record.cliente_ref() != Some(cliente_id) {
                return false;
            }
        }

        if let Some(asignado_a) = self.asignado_a {
            if record.asignado_a() != Some(asignado_a) {
                return false;
            }
        }

        if let Some(term) = term {
            return record
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(term));
        }

        true
    }
}

/// Records satisfying every predicate in `spec`, in their original order.
pub fn filter_records<T: Filterable + Clone>(records: &[T], spec: &FilterSpec) -> Vec<T> {
    let term = spec.search_term();
    let matching: Vec<T> = records
        .iter()
        .filter(|record| spec.matches_with_term(*record, term.as_deref()))
        .cloned()
        .collect();

    debug!(
        total = records.len(),
        matching = matching.len(),
        "filtered records"
    );

    matching
}

impl Filterable for Solicitud {
    fn status_label(&self) -> Option<&'static str> {
        Some(self.estatus.label())
    }

    fn product_codes(&self) -> Vec<ProductoCodigo> {
        self.productos.iter().map(|producto| producto.producto).collect()
    }

    fn filter_date(&self) -> Option<NaiveDate> {
        self.fecha_creacion
    }

    fn amount(&self) -> Option<Decimal> {
        self.monto_total()
    }

    fn cliente_ref(&self) -> Option<i64> {
        self.cliente_id.filter(|id| *id != 0)
    }

    fn asignado_a(&self) -> Option<i64> {
        self.asignado_a
    }

    fn search_fields(&self) -> Vec<String> {
        let mut fields = vec![
            self.solicitud_id.to_string(),
            self.estatus.label().to_string(),
        ];

        if let Some(cliente) = &self.cliente {
            fields.push(cliente.nombre_completo());
            if let Some(rfc) = present(&cliente.rfc) {
                fields.push(rfc.to_string());
            }
        }

        if !self.productos.is_empty() {
            let labels: Vec<&str> = self
                .productos
                .iter()
                .map(|producto| producto.producto.label())
                .collect();
            let codes: Vec<&str> = self
                .productos
                .iter()
                .map(|producto| producto.producto.code())
                .collect();
            fields.push(labels.join(", "));
            fields.push(codes.join(", "));
        }

        fields
    }
}

impl Filterable for Documento {
    fn status_label(&self) -> Option<&'static str> {
        Some(self.estatus.label())
    }

    fn filter_date(&self) -> Option<NaiveDate> {
        self.fecha_subida
    }

    fn cliente_ref(&self) -> Option<i64> {
        Some(self.cliente_id)
    }

    fn search_fields(&self) -> Vec<String> {
        let mut fields = vec![
            self.documento_id.to_string(),
            self.display_label(),
            self.estatus.label().to_string(),
        ];
        if let Some(comentarios) = present(&self.comentarios) {
            fields.push(comentarios.to_string());
        }
        fields
    }
}

impl Filterable for Cliente {
    fn status_label(&self) -> Option<&'static str> {
        None
    }

    fn filter_date(&self) -> Option<NaiveDate> {
        self.fecha_registro
    }

    fn cliente_ref(&self) -> Option<i64> {
        Some(self.cliente_id)
    }

    fn search_fields(&self) -> Vec<String> {
        let mut fields = vec![
            self.cliente_id.to_string(),
            self.nombre_completo(),
            self.tipo_persona.label().to_string(),
        ];
        fields.extend(
            [&self.rfc, &self.curp, &self.email]
                .into_iter()
                .filter_map(present)
                .map(str::to_string),
        );
        fields
    }
}
