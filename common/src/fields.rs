//! Tabela de campos canônicos
//!
//! Cada campo canônico declara os nomes de coluna aceitos (aliases) em ordem
//! de prioridade, o tipo de dado e uma transformação opcional. A tabela
//! embutida cobre as planilhas históricas e a tabela `fichas`; um arquivo JSON
//! de overrides pode acrescentar aliases e campos.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

/// Tipo de dado de um campo canônico
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Text,
    Number,
    Date,
    Boolean,
    Coordinates,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Text => write!(f, "text"),
            DataType::Number => write!(f, "number"),
            DataType::Date => write!(f, "date"),
            DataType::Boolean => write!(f, "boolean"),
            DataType::Coordinates => write!(f, "coordinates"),
        }
    }
}

/// Transformação nomeada aplicada na coerção
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transform {
    /// Moeda brasileira (`R$ 1.234,56`), arredondada em centavos
    Currency,
    /// Mantém só dígitos (telefones)
    Digits,
    /// Texto em minúsculas
    Lowercase,
}

impl Transform {
    /// Tipo de dado sobre o qual a transformação opera
    pub fn applies_to(self, data_type: DataType) -> bool {
        match self {
            Transform::Currency => data_type == DataType::Number,
            Transform::Digits | Transform::Lowercase => data_type == DataType::Text,
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::Currency => write!(f, "currency"),
            Transform::Digits => write!(f, "digits"),
            Transform::Lowercase => write!(f, "lowercase"),
        }
    }
}

/// Aliases das colunas separadas de latitude/longitude
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitCoordinates {
    pub latitude: Vec<String>,
    pub longitude: Vec<String>,
}

/// Definição de um campo canônico
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMapping {
    pub canonical_name: String,
    /// Nomes de coluna aceitos, do mais atual ao mais antigo
    pub aliases: Vec<String>,
    pub data_type: DataType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,
    #[serde(default)]
    pub required: bool,
    /// Só para `coordinates`: forma em duas colunas
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split: Option<SplitCoordinates>,
}

impl FieldMapping {
    pub fn new(canonical_name: &str, aliases: &[&str], data_type: DataType) -> Self {
        Self {
            canonical_name: canonical_name.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            data_type,
            transform: None,
            required: false,
            split: None,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_split(mut self, latitude: &[&str], longitude: &[&str]) -> Self {
        self.split = Some(SplitCoordinates {
            latitude: latitude.iter().map(|a| a.to_string()).collect(),
            longitude: longitude.iter().map(|a| a.to_string()).collect(),
        });
        self
    }

    /// Todos os aliases, incluindo os das colunas separadas
    fn all_aliases(&self) -> impl Iterator<Item = &str> {
        let split = self
            .split
            .iter()
            .flat_map(|s| s.latitude.iter().chain(s.longitude.iter()));
        self.aliases.iter().chain(split).map(String::as_str)
    }
}

/// Regra de casamento fuzzy: colunas que contêm as duas palavras-chave
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuzzyRule {
    pub canonical_name: String,
    pub root: String,
    pub qualifier: String,
}

impl FuzzyRule {
    pub fn new(canonical_name: &str, root: &str, qualifier: &str) -> Self {
        Self {
            canonical_name: canonical_name.to_string(),
            root: root.to_lowercase(),
            qualifier: qualifier.to_lowercase(),
        }
    }

    /// A chave contém raiz e qualificador (sem diferenciar maiúsculas)?
    pub fn matches(&self, key: &str) -> bool {
        let key = key.to_lowercase();
        key.contains(&self.root.to_lowercase()) && key.contains(&self.qualifier.to_lowercase())
    }
}

/// Campos embutidos e o tipo que cada um deve manter
const BUILTIN_TYPES: &[(&str, DataType)] = &[
    ("id", DataType::Text),
    ("nome", DataType::Text),
    ("telefone", DataType::Text),
    ("projeto", DataType::Text),
    ("scouter", DataType::Text),
    ("criado", DataType::Date),
    ("data_agendamento", DataType::Date),
    ("valor_ficha", DataType::Number),
    ("confirmado", DataType::Boolean),
    ("compareceu", DataType::Boolean),
    ("aprovado", DataType::Boolean),
    ("etapa", DataType::Text),
    ("foto", DataType::Text),
    ("localizacao", DataType::Coordinates),
];

fn builtin_mappings() -> Vec<FieldMapping> {
    use DataType::{Boolean, Coordinates, Date, Number, Text};

    vec![
        FieldMapping::new("id", &["id", "ID Ficha", "id_ficha", "Código"], Text).required(),
        FieldMapping::new(
            "nome",
            &["nome", "Nome do Modelo", "nome_modelo", "Nome Completo"],
            Text,
        )
        .required(),
        FieldMapping::new(
            "telefone",
            &["telefone", "Telefone Responsável", "telefone_responsavel", "Celular"],
            Text,
        )
        .with_transform(Transform::Digits),
        // "Cormeciais" vem das planilhas antigas, com o erro de digitação
        FieldMapping::new(
            "projeto",
            &["projeto", "Projetos Cormeciais", "Projetos Comerciais", "projetos"],
            Text,
        ),
        FieldMapping::new(
            "scouter",
            &["scouter", "Gestão de Scouter", "Gestao de Scouter", "gestao_scouter"],
            Text,
        )
        .required(),
        FieldMapping::new(
            "criado",
            &[
                "criado",
                "Data_criacao_Ficha",
                "Data de Criação",
                "Data de criação da Ficha",
                "created_at",
            ],
            Date,
        )
        .required(),
        FieldMapping::new(
            "data_agendamento",
            &["data_agendamento", "Data Agendamento", "Data do Agendamento", "agendamento"],
            Date,
        ),
        FieldMapping::new(
            "valor_ficha",
            &["valor_ficha", "Valor por Fichas", "Valor Ficha", "valor_por_ficha", "Valor da Ficha"],
            Number,
        )
        .with_transform(Transform::Currency),
        FieldMapping::new(
            "confirmado",
            &["confirmado", "Ficha Confirmada", "ficha_confirmada"],
            Boolean,
        ),
        FieldMapping::new("compareceu", &["compareceu", "Comparecimento"], Boolean),
        FieldMapping::new(
            "aprovado",
            &["aprovado", "Cadastro Aprovado", "cadastro_aprovado"],
            Boolean,
        ),
        FieldMapping::new("etapa", &["etapa", "Etapa do Funil", "etapa_funil", "status"], Text),
        FieldMapping::new("foto", &["foto", "foto_url", "Link da Foto", "url_foto"], Text),
        FieldMapping::new(
            "localizacao",
            &["localizacao", "Localização", "coordenadas", "latlng"],
            Coordinates,
        )
        .with_split(&["lat", "latitude"], &["lng", "lon", "longitude"]),
    ]
}

fn builtin_fuzzy_rules() -> Vec<FuzzyRule> {
    vec![FuzzyRule::new("valor_ficha", "valor", "ficha")]
}

lazy_static::lazy_static! {
    static ref BUILTIN_SCHEMA: FieldSchema =
        FieldSchema::new(builtin_mappings(), builtin_fuzzy_rules()).unwrap();
}

/// Esquema validado: campos canônicos + regras fuzzy
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    mappings: Vec<FieldMapping>,
    fuzzy_rules: Vec<FuzzyRule>,
}

impl FieldSchema {
    /// Monta e valida um esquema
    ///
    /// Recusa nomes canônicos repetidos, campos sem aliases e o mesmo alias
    /// (comparação sem espaços nas pontas e sem diferenciar maiúsculas) em
    /// dois campos diferentes.
    pub fn new(mappings: Vec<FieldMapping>, fuzzy_rules: Vec<FuzzyRule>) -> Result<Self> {
        let mut canonical_names = HashSet::new();
        let mut alias_owner: HashMap<String, &str> = HashMap::new();

        for mapping in &mappings {
            let name = mapping.canonical_name.as_str();
            if !canonical_names.insert(name) {
                return Err(Error::DuplicateCanonical(name.to_string()));
            }
            if mapping.aliases.iter().all(|a| a.trim().is_empty()) {
                return Err(Error::EmptyAliases(name.to_string()));
            }
            if let Some((_, expected)) = BUILTIN_TYPES.iter().find(|(n, _)| *n == name) {
                if *expected != mapping.data_type {
                    return Err(Error::TypeMismatch {
                        field: name.to_string(),
                        expected: expected.to_string(),
                        found: mapping.data_type.to_string(),
                    });
                }
            }
            if let Some(transform) = mapping.transform {
                if !transform.applies_to(mapping.data_type) {
                    return Err(Error::IncompatibleTransform {
                        field: name.to_string(),
                        transform: transform.to_string(),
                        data_type: mapping.data_type.to_string(),
                    });
                }
            }
            if mapping.split.is_some() && mapping.data_type != DataType::Coordinates {
                return Err(Error::Config(format!(
                    "\"{}\": colunas separadas só valem para coordinates",
                    name
                )));
            }

            for alias in mapping.all_aliases() {
                let key = alias.trim().to_lowercase();
                match alias_owner.get(&key) {
                    Some(owner) if *owner != name => {
                        return Err(Error::DuplicateAlias {
                            alias: alias.to_string(),
                            first: owner.to_string(),
                            second: name.to_string(),
                        });
                    }
                    Some(_) => {}
                    None => {
                        alias_owner.insert(key, name);
                    }
                }
            }
        }

        for rule in &fuzzy_rules {
            let mapping = mappings
                .iter()
                .find(|m| m.canonical_name == rule.canonical_name)
                .ok_or_else(|| Error::UnknownField(rule.canonical_name.clone()))?;
            if mapping.data_type != DataType::Number {
                return Err(Error::TypeMismatch {
                    field: rule.canonical_name.clone(),
                    expected: DataType::Number.to_string(),
                    found: mapping.data_type.to_string(),
                });
            }
            if rule.root.trim().is_empty() || rule.qualifier.trim().is_empty() {
                return Err(Error::Config(format!(
                    "regra fuzzy de \"{}\" sem palavra-chave",
                    rule.canonical_name
                )));
            }
        }

        Ok(Self {
            mappings,
            fuzzy_rules,
        })
    }

    /// Esquema embutido (planilhas históricas + tabela `fichas`)
    pub fn builtin() -> &'static FieldSchema {
        &BUILTIN_SCHEMA
    }

    pub fn mappings(&self) -> &[FieldMapping] {
        &self.mappings
    }

    pub fn fuzzy_rules(&self) -> &[FuzzyRule] {
        &self.fuzzy_rules
    }

    pub fn mapping(&self, canonical_name: &str) -> Option<&FieldMapping> {
        self.mappings
            .iter()
            .find(|m| m.canonical_name == canonical_name)
    }

    pub fn fuzzy_rule(&self, canonical_name: &str) -> Option<&FuzzyRule> {
        self.fuzzy_rules
            .iter()
            .find(|r| r.canonical_name == canonical_name)
    }

    /// Campo que declara `key` como alias (sem espaços nas pontas, sem diferenciar maiúsculas)
    pub fn alias_owner(&self, key: &str) -> Option<&str> {
        let key = key.trim().to_lowercase();
        self.mappings
            .iter()
            .find(|m| m.all_aliases().any(|a| a.trim().to_lowercase() == key))
            .map(|m| m.canonical_name.as_str())
    }

    /// Campos obrigatórios, na ordem do esquema
    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.mappings
            .iter()
            .filter(|m| m.required)
            .map(|m| m.canonical_name.as_str())
    }

    /// Aplica overrides e valida de novo
    ///
    /// Aliases extras entram no fim da lista (menor prioridade).
    pub fn with_overrides(&self, overrides: &SchemaOverrides) -> Result<Self> {
        let mut mappings = self.mappings.clone();

        for (canonical, extra) in &overrides.aliases {
            let mapping = mappings
                .iter_mut()
                .find(|m| &m.canonical_name == canonical)
                .ok_or_else(|| Error::UnknownField(canonical.clone()))?;
            for alias in extra {
                if !mapping.aliases.contains(alias) {
                    mapping.aliases.push(alias.clone());
                }
            }
        }
        mappings.extend(overrides.fields.iter().cloned());

        let mut fuzzy_rules = self.fuzzy_rules.clone();
        fuzzy_rules.extend(overrides.fuzzy_rules.iter().cloned());

        Self::new(mappings, fuzzy_rules)
    }
}

/// Arquivo de overrides do esquema
///
/// ```json
/// {
///   "aliases": { "valor_ficha": ["Preço Ficha"] },
///   "fields": [
///     { "canonicalName": "supervisor", "aliases": ["Supervisor"], "dataType": "text" }
///   ],
///   "fuzzyRules": []
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaOverrides {
    #[serde(default)]
    pub aliases: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub fields: Vec<FieldMapping>,
    #[serde(default)]
    pub fuzzy_rules: Vec<FuzzyRule>,
}

impl SchemaOverrides {
    /// Lê de um arquivo JSON
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Lê de uma string JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let overrides: Self = serde_json::from_str(json)?;
        Ok(overrides)
    }
}
