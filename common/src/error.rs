//! Tipos de erro
//!
//! A normalização em si nunca falha. Estes erros só aparecem na montagem do
//! esquema de campos e na leitura de arquivos de configuração.

use thiserror::Error;

/// Erro comum
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Campo canônico duplicado: {0}")]
    DuplicateCanonical(String),

    #[error("Alias \"{alias}\" declarado em \"{first}\" e \"{second}\"")]
    DuplicateAlias {
        alias: String,
        first: String,
        second: String,
    },

    #[error("Campo \"{0}\" sem aliases")]
    EmptyAliases(String),

    #[error("Campo canônico desconhecido: {0}")]
    UnknownField(String),

    #[error("Campo \"{field}\" deve ser do tipo {expected}, recebido {found}")]
    TypeMismatch {
        field: String,
        expected: String,
        found: String,
    },

    #[error("Campo \"{field}\": transformação {transform} não se aplica ao tipo {data_type}")]
    IncompatibleTransform {
        field: String,
        transform: String,
        data_type: String,
    },
}

/// Alias de Result
pub type Result<T> = std::result::Result<T, Error>;
