//! Maxfama
//!
//! Camada de entrada/saída sobre `maxfama-common`: leitura de exportações
//! (JSON do banco, CSV e planilhas), configuração, logs e CLI.

pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod logging;
pub mod report;
