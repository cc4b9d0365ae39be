//! Leitura das linhas brutas
//!
//! Cada fonte passa por uma única etapa de parse que produz `RawRow`:
//! - `.json`: exportação da tabela `fichas`/`leads` (banco)
//! - `.csv`: exportação de planilha (delimitador `,` ou `;`)
//! - `.xlsx`/`.xls`/`.ods`: pasta de trabalho, primeira aba

mod csv;
mod excel;
mod json;

pub use self::csv::{detect_delimiter, parse_csv};
pub use self::json::parse_json_rows;

use crate::error::{MaxfamaError, Result};
use maxfama_common::RawRow;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Tipo de fonte, pela extensão do arquivo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// JSON do banco
    Relational,
    /// CSV de planilha
    Spreadsheet,
    /// Pasta de trabalho (xlsx/xls/ods)
    Workbook,
}

impl SourceKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        match ext.as_str() {
            "json" => Some(SourceKind::Relational),
            "csv" => Some(SourceKind::Spreadsheet),
            "xlsx" | "xlsm" | "xls" | "ods" => Some(SourceKind::Workbook),
            _ => None,
        }
    }
}

/// Lê as linhas de um arquivo ou de todos os arquivos suportados de uma pasta
pub fn load_rows(path: &Path) -> Result<Vec<RawRow>> {
    if !path.exists() {
        return Err(MaxfamaError::FileNotFound(path.display().to_string()));
    }

    let files = if path.is_dir() {
        discover_files(path)
    } else {
        vec![path.to_path_buf()]
    };

    let mut rows = Vec::new();
    for file in &files {
        let loaded = load_file(file)?;
        info!(file = %file.display(), rows = loaded.len(), "arquivo lido");
        rows.extend(loaded);
    }

    if rows.is_empty() {
        return Err(MaxfamaError::NoRowsFound(path.display().to_string()));
    }

    Ok(rows)
}

/// Lê as linhas de um único arquivo
pub fn load_file(path: &Path) -> Result<Vec<RawRow>> {
    let kind = SourceKind::from_path(path)
        .ok_or_else(|| MaxfamaError::UnsupportedFormat(path.display().to_string()))?;
    debug!(file = %path.display(), ?kind, "lendo arquivo");

    match kind {
        SourceKind::Relational => {
            let content = std::fs::read_to_string(path)?;
            parse_json_rows(&content)
        }
        SourceKind::Spreadsheet => {
            let content = std::fs::read_to_string(path)?;
            parse_csv(&content, path)
        }
        SourceKind::Workbook => excel::read_workbook(path),
    }
}

/// Arquivos suportados dentro da pasta (recursivo, ordenados pelo caminho)
pub fn discover_files(folder: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(folder)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| SourceKind::from_path(p).is_some())
        .filter(|p| !is_hidden(p))
        .collect();

    files.sort();
    files
}

/// Avisa sobre cabeçalhos repetidos; a linha fica com a primeira coluna de cada nome
pub(crate) fn warn_duplicate_headers(path: &Path, headers: &[String]) {
    let mut seen = std::collections::HashSet::new();
    for header in headers.iter().filter(|h| !h.is_empty()) {
        if !seen.insert(header.as_str()) {
            warn!(
                file = %path.display(),
                header = %header,
                "cabeçalho repetido, usando a primeira coluna"
            );
        }
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_kind_from_path() {
        assert_eq!(SourceKind::from_path(Path::new("fichas.JSON")), Some(SourceKind::Relational));
        assert_eq!(SourceKind::from_path(Path::new("a.csv")), Some(SourceKind::Spreadsheet));
        assert_eq!(SourceKind::from_path(Path::new("a.xlsx")), Some(SourceKind::Workbook));
        assert_eq!(SourceKind::from_path(Path::new("a.txt")), None);
        assert_eq!(SourceKind::from_path(Path::new("sem_extensao")), None);
    }
}
