//! Casos de erro
//!
//! Entradas inválidas devem virar o erro certo, sem pânico

use maxfama::config::Config;
use maxfama::error::MaxfamaError;
use maxfama::loader::load_rows;
use std::path::Path;
use tempfile::tempdir;

/// Caminho inexistente
#[test]
fn test_missing_input() {
    let result = load_rows(Path::new("/nonexistent/path/12345.csv"));
    assert!(matches!(result, Err(MaxfamaError::FileNotFound(_))));
}

/// Extensão sem leitor
#[test]
fn test_unsupported_extension() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("fichas.txt");
    std::fs::write(&path, "nome\nAna\n").unwrap();

    assert!(matches!(load_rows(&path), Err(MaxfamaError::UnsupportedFormat(_))));
}

/// Pasta sem arquivos suportados
#[test]
fn test_empty_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("leia-me.txt"), "nada aqui").unwrap();

    assert!(matches!(load_rows(dir.path()), Err(MaxfamaError::NoRowsFound(_))));
}

/// Cabeçalho sem linhas
#[test]
fn test_header_only_csv() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("vazio.csv");
    std::fs::write(&path, "nome;scouter\n").unwrap();

    assert!(matches!(load_rows(&path), Err(MaxfamaError::NoRowsFound(_))));
}

/// JSON quebrado
#[test]
fn test_malformed_json() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("quebrado.json");
    std::fs::write(&path, "[{\"nome\": ").unwrap();

    assert!(matches!(load_rows(&path), Err(MaxfamaError::Json(_))));
}

/// Linha que não é objeto
#[test]
fn test_non_object_row() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("leads.json");
    std::fs::write(&path, r#"[{"nome": "Ana"}, "texto"]"#).unwrap();

    assert!(matches!(load_rows(&path), Err(MaxfamaError::InvalidRow { index: 1 })));
}

/// Alias repetido entre dois campos no arquivo de overrides
#[test]
fn test_conflicting_alias_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("aliases.json");
    std::fs::write(&path, r#"{ "aliases": { "scouter": ["Nome do Modelo"] } }"#).unwrap();

    let result = Config::default().schema(Some(&path));
    assert!(matches!(result, Err(MaxfamaError::Schema(_))));
}

/// Mensagens de erro legíveis
#[test]
fn test_error_display() {
    let err = MaxfamaError::FileNotFound("/tmp/x.csv".into());
    assert_eq!(err.to_string(), "Arquivo não encontrado: /tmp/x.csv");

    let err = MaxfamaError::InvalidRow { index: 3 };
    assert_eq!(err.to_string(), "Linha 3 não é um objeto JSON");
}
