//! Tipos de dados da normalização
//!
//! - CellValue: valor bruto de uma célula (planilha ou banco)
//! - RawRow: linha bruta, colunas na ordem original da fonte
//! - FichaDataPoint: ficha canônica produzida pelo normalizador

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Valor bruto de uma célula
///
/// Fronteira tipada para os dados que chegam das fontes externas. Objetos e
/// arrays JSON viram texto, então o restante do núcleo só enxerga estes
/// quatro formatos.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CellValue {
    #[default]
    Null,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    /// Nulo ou texto só com espaços
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Representação textual da célula
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            CellValue::Null => Cow::Borrowed(""),
            CellValue::Text(s) => Cow::Borrowed(s.as_str()),
            CellValue::Number(n) => Cow::Owned(format_number(*n)),
            CellValue::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl From<serde_json::Value> for CellValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => CellValue::Null,
            Value::Bool(b) => CellValue::Bool(b),
            Value::Number(n) => n.as_f64().map_or(CellValue::Null, CellValue::Number),
            Value::String(s) => CellValue::Text(s),
            other => CellValue::Text(other.to_string()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Null, Into::into)
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Null => serializer.serialize_unit(),
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Number(n) if n.is_finite() => serializer.serialize_f64(*n),
            CellValue::Number(_) => serializer.serialize_unit(),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(CellValue::from)
    }
}

/// Linha bruta
///
/// As colunas mantêm a ordem da fonte: o casamento fuzzy devolve a primeira
/// coluna nessa ordem.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    columns: Vec<(String, CellValue)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Converte um objeto JSON em linha (None para qualquer outro valor)
    pub fn from_json(value: serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Object(map) => Some(map.into_iter().collect()),
            _ => None,
        }
    }

    /// Adiciona uma coluna. Uma chave idêntica já existente é substituída.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<CellValue>) {
        let key = key.into();
        let value = value.into();
        match self.columns.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.columns.push((key, value)),
        }
    }

    /// Adiciona uma coluna só se a chave ainda não existir. Devolve `false` para chave repetida.
    pub fn push_first(&mut self, key: impl Into<String>, value: impl Into<CellValue>) -> bool {
        let key = key.into();
        if self.contains_key(&key) {
            return false;
        }
        self.columns.push((key, value.into()));
        true
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.columns.iter().any(|(k, _)| k == key)
    }

    /// Busca exata pela chave original
    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.columns
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Chave repetida: fica a primeira ocorrência, na ordem da fonte
impl<K, V> FromIterator<(K, V)> for RawRow
where
    K: Into<String>,
    V: Into<CellValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = RawRow::new();
        for (key, value) in iter {
            row.push_first(key, value);
        }
        row
    }
}

impl Serialize for RawRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (key, value) in &self.columns {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RawRow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = serde_json::Map::deserialize(deserializer)?;
        Ok(map.into_iter().collect())
    }
}

/// Par de coordenadas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Valor já convertido para o tipo declarado do campo
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Text(String),
    Number(f64),
    Date(DateTime<Utc>),
    Boolean(bool),
    Coordinates(Option<LatLng>),
}

impl Serialize for TypedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TypedValue::Text(s) => serializer.serialize_str(s),
            TypedValue::Number(n) => serializer.serialize_f64(*n),
            TypedValue::Date(d) => serializer.serialize_str(&to_iso(d)),
            TypedValue::Boolean(b) => serializer.serialize_bool(*b),
            TypedValue::Coordinates(c) => c.serialize(serializer),
        }
    }
}

/// Data em ISO-8601 com milissegundos e sufixo `Z`
pub fn to_iso(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn serialize_iso_opt<S: Serializer>(
    date: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match date {
        Some(d) => serializer.serialize_str(&to_iso(d)),
        None => serializer.serialize_none(),
    }
}

/// Ficha canônica
///
/// Campo `None` = nenhum alias encontrado na linha. Campo presente com valor
/// zero (`0`, `false`, `""`) = coluna encontrada, conteúdo vazio ou inválido.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FichaDataPoint {
    pub id: Option<String>,
    pub nome: Option<String>,
    pub telefone: Option<String>,
    pub projeto: Option<String>,
    pub scouter: Option<String>,
    #[serde(serialize_with = "serialize_iso_opt")]
    pub criado: Option<DateTime<Utc>>,
    #[serde(serialize_with = "serialize_iso_opt")]
    pub data_agendamento: Option<DateTime<Utc>>,
    pub valor_ficha: Option<f64>,
    pub confirmado: Option<bool>,
    pub compareceu: Option<bool>,
    pub aprovado: Option<bool>,
    pub etapa: Option<String>,
    pub foto: Option<String>,
    pub localizacao: Option<LatLng>,
    /// Campos extras declarados na configuração de aliases
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, TypedValue>,
    /// Linha original (rastreabilidade)
    pub raw: RawRow,
}

impl FichaDataPoint {
    pub(crate) fn with_raw(raw: RawRow) -> Self {
        Self {
            raw,
            ..Default::default()
        }
    }

    /// Atribui um valor convertido ao campo canônico correspondente
    pub(crate) fn assign(&mut self, canonical: &str, value: TypedValue) {
        match (canonical, value) {
            ("id", TypedValue::Text(v)) => self.id = Some(v),
            ("nome", TypedValue::Text(v)) => self.nome = Some(v),
            ("telefone", TypedValue::Text(v)) => self.telefone = Some(v),
            ("projeto", TypedValue::Text(v)) => self.projeto = Some(v),
            ("scouter", TypedValue::Text(v)) => self.scouter = Some(v),
            ("criado", TypedValue::Date(v)) => self.criado = Some(v),
            ("data_agendamento", TypedValue::Date(v)) => self.data_agendamento = Some(v),
            ("valor_ficha", TypedValue::Number(v)) => self.valor_ficha = Some(v),
            ("confirmado", TypedValue::Boolean(v)) => self.confirmado = Some(v),
            ("compareceu", TypedValue::Boolean(v)) => self.compareceu = Some(v),
            ("aprovado", TypedValue::Boolean(v)) => self.aprovado = Some(v),
            ("etapa", TypedValue::Text(v)) => self.etapa = Some(v),
            ("foto", TypedValue::Text(v)) => self.foto = Some(v),
            ("localizacao", TypedValue::Coordinates(v)) => self.localizacao = v,
            (name, value) => {
                self.extras.insert(name.to_string(), value);
            }
        }
    }

    /// O campo canônico foi preenchido?
    pub fn has_field(&self, canonical: &str) -> bool {
        match canonical {
            "id" => self.id.is_some(),
            "nome" => self.nome.is_some(),
            "telefone" => self.telefone.is_some(),
            "projeto" => self.projeto.is_some(),
            "scouter" => self.scouter.is_some(),
            "criado" => self.criado.is_some(),
            "data_agendamento" => self.data_agendamento.is_some(),
            "valor_ficha" => self.valor_ficha.is_some(),
            "confirmado" => self.confirmado.is_some(),
            "compareceu" => self.compareceu.is_some(),
            "aprovado" => self.aprovado.is_some(),
            "etapa" => self.etapa.is_some(),
            "foto" => self.foto.is_some(),
            "localizacao" => self.localizacao.is_some(),
            other => self.extras.contains_key(other),
        }
    }
}
