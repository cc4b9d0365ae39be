use crate::error::{MaxfamaError, Result};
use maxfama_common::cache::{RoutePermissionCache, ROUTE_CACHE_TTL_SECS};
use maxfama_common::normalizer::DEFAULT_PARALLEL_THRESHOLD;
use maxfama_common::{FieldSchema, SchemaOverrides};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Variável de ambiente que sobrepõe `alias_file`
pub const ALIAS_FILE_ENV: &str = "MAXFAMA_ALIAS_FILE";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Overrides de aliases (JSON)
    pub alias_file: Option<PathBuf>,
    pub route_cache_ttl_seconds: i64,
    pub pretty_output: bool,
    /// Lotes a partir deste tamanho são normalizados em paralelo
    pub parallel_threshold: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            alias_file: None,
            route_cache_ttl_seconds: ROUTE_CACHE_TTL_SECS,
            pretty_output: true,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!(path = %path.display(), "lendo configuração");
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| MaxfamaError::Config("Diretório home não encontrado".into()))?;
        Ok(home.join(".config").join("maxfama").join("config.json"))
    }

    fn validate(&self) -> Result<()> {
        if !(5..=30).contains(&self.route_cache_ttl_seconds) {
            return Err(MaxfamaError::Config(format!(
                "route_cache_ttl_seconds deve ficar entre 5 e 30 (recebido {})",
                self.route_cache_ttl_seconds
            )));
        }
        if self.parallel_threshold == 0 {
            return Err(MaxfamaError::Config("parallel_threshold deve ser maior que 0".into()));
        }
        Ok(())
    }

    /// Arquivo de aliases efetivo: argumento > variável de ambiente > configuração
    pub fn alias_file(&self, explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        if let Ok(path) = std::env::var(ALIAS_FILE_ENV) {
            if !path.is_empty() {
                return Some(PathBuf::from(path));
            }
        }
        self.alias_file.clone()
    }

    /// Esquema embutido com os overrides do arquivo de aliases, se houver
    pub fn schema(&self, explicit: Option<&Path>) -> Result<FieldSchema> {
        match self.alias_file(explicit) {
            Some(path) => {
                if !path.exists() {
                    return Err(MaxfamaError::FileNotFound(path.display().to_string()));
                }
                debug!(path = %path.display(), "aplicando overrides de aliases");
                let overrides = SchemaOverrides::from_file(&path)?;
                Ok(FieldSchema::builtin().with_overrides(&overrides)?)
            }
            None => Ok(FieldSchema::builtin().clone()),
        }
    }

    /// Cache de permissão de rota com o TTL configurado
    pub fn route_cache(&self) -> RoutePermissionCache {
        RoutePermissionCache::new(chrono::Duration::seconds(self.route_cache_ttl_seconds))
    }

    pub fn set_alias_file(&mut self, path: PathBuf) -> Result<()> {
        self.alias_file = Some(path);
        self.save()
    }
}
