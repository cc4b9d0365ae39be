use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MaxfamaError {
    #[error("Erro de configuração: {0}")]
    Config(String),

    #[error("Arquivo não encontrado: {0}")]
    FileNotFound(String),

    #[error("Formato não suportado: {0} (use .json, .csv, .xlsx, .xls ou .ods)")]
    UnsupportedFormat(String),

    #[error("Erro ao ler CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Erro ao ler planilha {path}: {message}")]
    Workbook { path: PathBuf, message: String },

    #[error("Linha {index} não é um objeto JSON")]
    InvalidRow { index: usize },

    #[error("Nenhuma linha encontrada em {0}")]
    NoRowsFound(String),

    #[error("Esquema de campos inválido: {0}")]
    Schema(#[from] maxfama_common::Error),

    #[error("Erro de JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Erro de IO: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MaxfamaError>;
