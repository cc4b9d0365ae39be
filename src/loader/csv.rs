use crate::error::{MaxfamaError, Result};
use ::csv::ReaderBuilder;
use maxfama_common::{CellValue, RawRow};
use std::path::Path;

/// Delimitador pela primeira linha: `;` se aparecer mais que `,` fora de aspas
pub fn detect_delimiter(content: &str) -> u8 {
    let header = content.lines().next().unwrap_or("");
    let mut in_quotes = false;
    let (mut commas, mut semicolons) = (0usize, 0usize);

    for c in header.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => commas += 1,
            ';' if !in_quotes => semicolons += 1,
            _ => {}
        }
    }

    if semicolons > commas {
        b';'
    } else {
        b','
    }
}

/// Linhas de uma exportação CSV de planilha
///
/// Cabeçalhos perdem o BOM; linhas totalmente vazias são descartadas. As
/// células ficam como texto bruto, a coerção acontece no normalizador.
pub fn parse_csv(content: &str, path: &Path) -> Result<Vec<RawRow>> {
    let content = content.trim_start_matches('\u{feff}');
    let mut reader = ReaderBuilder::new()
        .delimiter(detect_delimiter(content))
        .flexible(true)
        .from_reader(content.as_bytes());

    let csv_error = |source: ::csv::Error| MaxfamaError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(|h| h.trim_matches('\u{feff}').to_string())
        .collect();
    super::warn_duplicate_headers(path, &headers);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .filter(|(header, _)| !header.trim().is_empty())
            .map(|(header, cell)| (header.clone(), CellValue::Text(cell.to_string())))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}
