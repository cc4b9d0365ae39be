//! Resolução de aliases
//!
//! Encontra a coluna da linha bruta que corresponde a um campo canônico.
//!
//! ## Ordem de prioridade
//! 1. Exata: chave == alias (sem espaços nas pontas, maiúsculas preservadas)
//! 2. Sem diferenciar maiúsculas
//! 3. Fuzzy: só campos com regra na tabela; primeira chave, na ordem da
//!    linha, que contém raiz e qualificador
//!
//! Dentro de cada etapa, vale a ordem da lista de aliases.

use crate::fields::{FieldMapping, FieldSchema, SplitCoordinates};
use crate::types::RawRow;

/// Como a coluna foi encontrada
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    CaseInsensitive,
    Fuzzy,
}

/// Coluna candidata para um campo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'r> {
    pub column: &'r str,
    pub kind: MatchKind,
}

/// Resolve a coluna de um campo com o esquema embutido
pub fn resolve<'r>(row: &'r RawRow, mapping: &FieldMapping) -> Option<&'r str> {
    resolve_in(row, mapping, FieldSchema::builtin())
}

/// Resolve a coluna de um campo com as regras fuzzy e aliases de `schema`
pub fn resolve_in<'r>(
    row: &'r RawRow,
    mapping: &FieldMapping,
    schema: &FieldSchema,
) -> Option<&'r str> {
    candidate_columns(row, mapping, schema)
        .first()
        .map(|r| r.column)
}

/// Todas as colunas candidatas, em ordem de prioridade e sem repetição
///
/// `resolve` usa só a primeira; a busca por valor não-zero percorre todas.
/// No estágio fuzzy, uma coluna que é alias de outro campo do esquema nunca
/// é candidata.
pub fn candidate_columns<'r>(
    row: &'r RawRow,
    mapping: &FieldMapping,
    schema: &FieldSchema,
) -> Vec<Resolution<'r>> {
    let mut found = alias_columns(row, &mapping.aliases);

    if let Some(rule) = schema.fuzzy_rule(&mapping.canonical_name) {
        for key in row.keys().filter(|k| rule.matches(k)) {
            let claimed = schema
                .alias_owner(key)
                .is_some_and(|owner| owner != mapping.canonical_name);
            if !claimed && !found.iter().any(|r| r.column == key) {
                found.push(Resolution {
                    column: key,
                    kind: MatchKind::Fuzzy,
                });
            }
        }
    }

    found
}

/// Colunas que casam com a lista de aliases: exatas, depois sem diferenciar maiúsculas
fn alias_columns<'r>(row: &'r RawRow, aliases: &[String]) -> Vec<Resolution<'r>> {
    let mut found: Vec<Resolution<'r>> = Vec::new();
    let mut push = |column: &'r str, kind: MatchKind| {
        if !found.iter().any(|r| r.column == column) {
            found.push(Resolution { column, kind });
        }
    };

    for alias in aliases {
        let alias = alias.trim();
        for key in row.keys().filter(|k| k.trim() == alias) {
            push(key, MatchKind::Exact);
        }
    }

    for alias in aliases {
        let alias = alias.trim().to_lowercase();
        for key in row.keys().filter(|k| k.trim().to_lowercase() == alias) {
            push(key, MatchKind::CaseInsensitive);
        }
    }

    found
}

/// Resolve as colunas separadas de latitude e longitude (as duas precisam existir)
pub fn resolve_split<'r>(row: &'r RawRow, split: &SplitCoordinates) -> Option<(&'r str, &'r str)> {
    let lat = alias_columns(row, &split.latitude).first()?.column;
    let lng = alias_columns(row, &split.longitude).first()?.column;
    Some((lat, lng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::DataType;

    fn valor_mapping() -> FieldMapping {
        FieldSchema::builtin().mapping("valor_ficha").unwrap().clone()
    }

    #[test]
    fn test_exact_match_preserves_case() {
        let row: RawRow = [("valor ficha", "1"), ("Valor Ficha", "2")].into_iter().collect();
        let resolved = candidate_columns(&row, &valor_mapping(), FieldSchema::builtin());
        assert_eq!(resolved[0].column, "Valor Ficha");
        assert_eq!(resolved[0].kind, MatchKind::Exact);
        assert_eq!(resolved[1].column, "valor ficha");
        assert_eq!(resolved[1].kind, MatchKind::CaseInsensitive);
    }

    #[test]
    fn test_exact_match_trims_keys() {
        let mapping = FieldMapping::new("scouter", &["Gestão de Scouter"], DataType::Text);
        let row: RawRow = [("  Gestão de Scouter ", "Maria")].into_iter().collect();
        assert_eq!(resolve(&row, &mapping), Some("  Gestão de Scouter "));
    }

    #[test]
    fn test_alias_list_order_wins_over_row_order() {
        let row: RawRow = [("Valor Ficha", "5"), ("Valor por Fichas", "6")]
            .into_iter()
            .collect();
        assert_eq!(resolve(&row, &valor_mapping()), Some("Valor por Fichas"));
    }

    #[test]
    fn test_case_insensitive_match() {
        let row: RawRow = [("VALOR POR FICHAS", "6")].into_iter().collect();
        assert_eq!(resolve(&row, &valor_mapping()), Some("VALOR POR FICHAS"));
    }

    #[test]
    fn test_fuzzy_fallback() {
        let row: RawRow = [("Nome", "Ana"), ("Valor da Ficha Nova", "R$ 6,00")]
            .into_iter()
            .collect();
        let resolved = candidate_columns(&row, &valor_mapping(), FieldSchema::builtin());
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].kind, MatchKind::Fuzzy);
        assert_eq!(resolve(&row, &valor_mapping()), Some("Valor da Ficha Nova"));
    }

    #[test]
    fn test_exact_beats_earlier_fuzzy_key() {
        let row: RawRow = [("Valor da Ficha Nova", "R$ 9,00"), ("Valor Ficha", "R$ 6,00")]
            .into_iter()
            .collect();
        assert_eq!(resolve(&row, &valor_mapping()), Some("Valor Ficha"));
    }

    #[test]
    fn test_fuzzy_only_for_eligible_fields() {
        let mapping = FieldSchema::builtin().mapping("scouter").unwrap();
        let row: RawRow = [("Scouter responsável pela ficha", "Ana")].into_iter().collect();
        assert_eq!(resolve(&row, mapping), None);
    }

    #[test]
    fn test_no_match_returns_none() {
        let row: RawRow = [("outra coluna", "x")].into_iter().collect();
        assert_eq!(resolve(&row, &valor_mapping()), None);
    }

    #[test]
    fn test_fuzzy_skips_alias_of_another_field() {
        let schema = FieldSchema::builtin()
            .with_overrides(&crate::fields::SchemaOverrides {
                fields: vec![FieldMapping::new(
                    "valor_ficha_antiga",
                    &["Valor Ficha Antiga"],
                    DataType::Number,
                )],
                ..Default::default()
            })
            .unwrap();
        let valor = schema.mapping("valor_ficha").unwrap();
        let antiga = schema.mapping("valor_ficha_antiga").unwrap();

        let row: RawRow = [("valor ficha antiga", "9"), ("Valor da Ficha Nova", "6")]
            .into_iter()
            .collect();
        assert_eq!(resolve_in(&row, valor, &schema), Some("Valor da Ficha Nova"));
        assert_eq!(resolve_in(&row, antiga, &schema), Some("valor ficha antiga"));

        let only_old: RawRow = [("Valor Ficha Antiga", "9")].into_iter().collect();
        assert_eq!(resolve_in(&only_old, valor, &schema), None);
    }

    #[test]
    fn test_resolve_split_needs_both_columns() {
        let mapping = FieldSchema::builtin().mapping("localizacao").unwrap();
        let split = mapping.split.as_ref().unwrap();

        let both: RawRow = [("Latitude", "-23.5"), ("Longitude", "-46.6")].into_iter().collect();
        assert_eq!(resolve_split(&both, split), Some(("Latitude", "Longitude")));

        let only_lat: RawRow = [("lat", "-23.5")].into_iter().collect();
        assert_eq!(resolve_split(&only_lat, split), None);
    }
}
