//! Validação de campos obrigatórios
//!
//! Roda sobre fichas já normalizadas. Nunca falha: devolve a lista de campos
//! ausentes por ficha e o conjunto distinto do lote.

use crate::fields::FieldSchema;
use crate::types::FichaDataPoint;
use serde::Serialize;

/// Campos obrigatórios ausentes numa ficha
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingFields {
    /// Posição da ficha no lote
    pub index: usize,
    pub fields: Vec<String>,
}

/// Resultado da validação de um lote
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub total_records: usize,
    pub missing: Vec<MissingFields>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty()
    }

    /// Campos ausentes em pelo menos uma ficha, na ordem do esquema
    pub fn missing_field_names(&self, schema: &FieldSchema) -> Vec<String> {
        schema
            .required_fields()
            .filter(|name| {
                self.missing
                    .iter()
                    .any(|m| m.fields.iter().any(|f| f == name))
            })
            .map(str::to_string)
            .collect()
    }
}

/// Verifica os campos obrigatórios de cada ficha
pub fn validate_required(records: &[FichaDataPoint], schema: &FieldSchema) -> ValidationReport {
    let required: Vec<&str> = schema.required_fields().collect();

    let missing = records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let fields: Vec<String> = required
                .iter()
                .filter(|name| !record.has_field(name))
                .map(|name| name.to_string())
                .collect();
            (!fields.is_empty()).then_some(MissingFields { index, fields })
        })
        .collect();

    ValidationReport {
        total_records: records.len(),
        missing,
    }
}
