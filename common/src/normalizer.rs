//! Normalização de fichas
//!
//! Para cada campo do esquema: resolve a coluna, converte o valor e grava na
//! ficha canônica. Linhas ruins nunca falham; a validação de obrigatórios é
//! uma etapa separada (`validation`).
//!
//! ## Busca de valor da ficha
//! `valor_ficha_from_row` é diferente da resolução normal: percorre todas as
//! colunas candidatas e fica com o primeiro valor **não-zero**. Planilhas
//! importam `"0"` em colunas de preço não preenchidas, e esse zero não pode
//! esconder uma coluna antiga com o valor real.

use crate::clock::{Clock, SystemClock};
use crate::coerce::{self, CoordinateInput};
use crate::fields::{DataType, FieldMapping, FieldSchema};
use crate::resolver::{self, MatchKind};
use crate::types::{FichaDataPoint, RawRow, TypedValue};
use rayon::prelude::*;
use tracing::{debug, trace};

/// Tamanho de lote a partir do qual `normalize_all` usa rayon
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 2048;

/// Normalizador de fichas
#[derive(Debug, Clone)]
pub struct FichaNormalizer<C: Clock = SystemClock> {
    schema: FieldSchema,
    clock: C,
    parallel_threshold: usize,
}

impl FichaNormalizer<SystemClock> {
    /// Normalizador com o esquema embutido e o relógio do sistema
    pub fn new() -> Self {
        Self::with_schema(FieldSchema::builtin().clone())
    }

    pub fn with_schema(schema: FieldSchema) -> Self {
        Self::with_clock(schema, SystemClock)
    }
}

impl Default for FichaNormalizer<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> FichaNormalizer<C> {
    /// Normalizador com relógio injetado (fallback de datas)
    pub fn with_clock(schema: FieldSchema, clock: C) -> Self {
        Self {
            schema,
            clock,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    pub fn parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    /// Normaliza uma linha
    pub fn normalize(&self, row: &RawRow) -> FichaDataPoint {
        let now = self.clock.now();
        let mut ficha = FichaDataPoint::with_raw(row.clone());

        for mapping in self.schema.mappings() {
            if let Some(value) = self.resolve_value(row, mapping, now) {
                ficha.assign(&mapping.canonical_name, value);
            }
        }

        ficha
    }

    /// Normaliza um lote, mantendo a ordem de entrada
    pub fn normalize_all(&self, rows: &[RawRow]) -> Vec<FichaDataPoint>
    where
        C: Sync,
    {
        if rows.len() >= self.parallel_threshold {
            rows.par_iter().map(|row| self.normalize(row)).collect()
        } else {
            rows.iter().map(|row| self.normalize(row)).collect()
        }
    }

    fn resolve_value(
        &self,
        row: &RawRow,
        mapping: &FieldMapping,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Option<TypedValue> {
        let found = resolver::candidate_columns(row, mapping, &self.schema)
            .into_iter()
            .next();

        let value = match found {
            Some(found) => {
                if found.kind == MatchKind::Fuzzy {
                    trace!(
                        field = %mapping.canonical_name,
                        column = found.column,
                        "coluna resolvida por palavra-chave"
                    );
                }
                let cell = row.get(found.column)?;
                if mapping.data_type == DataType::Date && coerce::parse_date(cell).is_none() {
                    debug!(
                        field = %mapping.canonical_name,
                        column = found.column,
                        "data inválida, usando o horário atual"
                    );
                }
                Some(coerce::coerce_at(cell, mapping.data_type, mapping.transform, now))
            }
            None => None,
        };

        // coordenadas em duas colunas quando a coluna combinada falta ou está vazia
        if mapping.data_type == DataType::Coordinates
            && !matches!(value, Some(TypedValue::Coordinates(Some(_))))
        {
            if let Some(split) = split_coordinates(row, mapping) {
                return Some(split);
            }
        }

        value
    }

    /// Valor da ficha: primeira coluna candidata com valor não-zero
    pub fn valor_ficha_from_row(&self, row: &RawRow) -> f64 {
        first_non_zero(row, &self.schema, "valor_ficha")
    }

    /// Média do valor por ficha, ignorando linhas com valor 0
    pub fn media_valor_por_ficha(&self, rows: &[RawRow]) -> f64 {
        mean_non_zero(rows.iter().map(|row| self.valor_ficha_from_row(row)))
    }
}

fn split_coordinates(row: &RawRow, mapping: &FieldMapping) -> Option<TypedValue> {
    let split = mapping.split.as_ref()?;
    let (lat, lng) = resolver::resolve_split(row, split)?;
    let input = CoordinateInput::Split(row.get(lat)?, row.get(lng)?);
    coerce::parse_coordinates(input).map(|latlng| TypedValue::Coordinates(Some(latlng)))
}

/// Primeiro valor numérico não-zero entre as colunas candidatas do campo
///
/// Ordem: aliases exatos, depois sem diferenciar maiúsculas, depois fuzzy.
/// Coluna presente com valor 0 conta como "não encontrada". Sem candidato
/// não-zero, devolve 0.
pub fn first_non_zero(row: &RawRow, schema: &FieldSchema, canonical_name: &str) -> f64 {
    let Some(mapping) = schema.mapping(canonical_name) else {
        return 0.0;
    };
    resolver::candidate_columns(row, mapping, schema)
        .into_iter()
        .filter_map(|found| row.get(found.column))
        .map(coerce::parse_number)
        .find(|value| *value != 0.0)
        .unwrap_or(0.0)
}

/// Média dos valores diferentes de zero (0 se não houver nenhum)
pub fn mean_non_zero(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .filter(|v| *v != 0.0)
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Normaliza uma linha com o esquema embutido
pub fn normalize(row: &RawRow) -> FichaDataPoint {
    FichaNormalizer::new().normalize(row)
}

/// Valor da ficha com o esquema embutido
pub fn valor_ficha_from_row(row: &RawRow) -> f64 {
    first_non_zero(row, FieldSchema::builtin(), "valor_ficha")
}

/// Média do valor por ficha com o esquema embutido
pub fn media_valor_por_ficha(rows: &[RawRow]) -> f64 {
    mean_non_zero(rows.iter().map(valor_ficha_from_row))
}
