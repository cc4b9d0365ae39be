//! Leitura de exportações
//!
//! Arquivos reais em pasta temporária, passando por `load_rows`

use maxfama::loader::{discover_files, load_rows};
use maxfama_common::CellValue;
use tempfile::tempdir;

#[test]
fn test_load_semicolon_csv() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("fichas.csv");
    std::fs::write(
        &path,
        "\u{feff}Gestão de Scouter;Data_criacao_Ficha;Valor por Fichas\nMaria;15/03/2024;R$ 6,00\n",
    )
    .unwrap();

    let rows = load_rows(&path).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("Gestão de Scouter"), Some(&CellValue::Text("Maria".into())));
    assert_eq!(rows[0].get("Valor por Fichas"), Some(&CellValue::Text("R$ 6,00".into())));
}

#[test]
fn test_load_json_export() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("leads.json");
    std::fs::write(
        &path,
        r#"[{"id": 10, "scouter": "Ana", "valor_ficha": 6.5, "confirmado": true}]"#,
    )
    .unwrap();

    let rows = load_rows(&path).unwrap();
    assert_eq!(rows[0].get("valor_ficha"), Some(&CellValue::Number(6.5)));
    assert_eq!(rows[0].get("confirmado"), Some(&CellValue::Bool(true)));
}

#[test]
fn test_load_directory_in_path_order() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("b.csv"), "nome\nBeatriz\n").unwrap();
    std::fs::write(dir.path().join("a.json"), r#"[{"nome": "Alice"}]"#).unwrap();
    std::fs::write(dir.path().join("notas.txt"), "ignorado").unwrap();
    std::fs::write(dir.path().join(".oculto.csv"), "nome\nX\n").unwrap();

    let files = discover_files(dir.path());
    assert_eq!(files.len(), 2);

    let rows = load_rows(dir.path()).unwrap();
    let nomes: Vec<String> = rows
        .iter()
        .filter_map(|r| r.get("nome"))
        .map(|v| v.as_text().into_owned())
        .collect();
    assert_eq!(nomes, vec!["Alice", "Beatriz"]);
}

#[test]
fn test_nested_directories_are_walked() {
    let dir = tempdir().expect("Failed to create temp dir");
    let sub = dir.path().join("marco");
    std::fs::create_dir(&sub).unwrap();
    std::fs::write(sub.join("fichas.csv"), "nome\nCarla\n").unwrap();

    let rows = load_rows(dir.path()).unwrap();
    assert_eq!(rows.len(), 1);
}
