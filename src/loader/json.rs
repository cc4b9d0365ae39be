use crate::error::{MaxfamaError, Result};
use maxfama_common::RawRow;
use serde_json::Value;

/// Linhas de uma exportação JSON do banco
///
/// Aceita um array de objetos ou a resposta da API REST (`{ "data": [...] }`).
pub fn parse_json_rows(content: &str) -> Result<Vec<RawRow>> {
    let value: Value = serde_json::from_str(content)?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) if map.get("data").is_some_and(Value::is_array) => {
            match map.remove("data") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            }
        }
        Value::Object(map) => vec![Value::Object(map)],
        _ => return Err(MaxfamaError::InvalidRow { index: 0 }),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| RawRow::from_json(item).ok_or(MaxfamaError::InvalidRow { index }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use maxfama_common::CellValue;

    #[test]
    fn test_parse_array() {
        let rows = parse_json_rows(r#"[{"id": 1, "scouter": "Ana"}, {"id": 2}]"#).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("scouter"), Some(&CellValue::Text("Ana".into())));
    }

    #[test]
    fn test_parse_rest_envelope() {
        let rows = parse_json_rows(r#"{"data": [{"id": 1}], "count": 1}"#).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("id"), Some(&CellValue::Number(1.0)));
    }

    #[test]
    fn test_single_object_is_one_row() {
        let rows = parse_json_rows(r#"{"id": 7, "nome": "Bia"}"#).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_scalar_data_key_is_a_column() {
        let rows = parse_json_rows(r#"{"id": 7, "data": "15/03/2024"}"#).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("data"), Some(&CellValue::Text("15/03/2024".into())));
        assert_eq!(rows[0].len(), 2);
    }

    #[test]
    fn test_non_object_row_is_rejected() {
        let err = parse_json_rows(r#"[{"id": 1}, 42]"#).unwrap_err();
        assert!(matches!(err, MaxfamaError::InvalidRow { index: 1 }));
    }
}
