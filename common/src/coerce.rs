//! Coerção de valores
//!
//! Converte células brutas (texto em formato brasileiro, números, nulos) no
//! tipo declarado do campo. Nenhuma função aqui falha: entrada inválida vira
//! o valor-zero do tipo (`0`, `false`, `""`, agora, ou `None` para
//! coordenadas).

use crate::fields::{DataType, Transform};
use crate::types::{CellValue, LatLng, TypedValue};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use regex::Regex;

/// Valores aceitos como verdadeiro
const AFFIRMATIVE: &[&str] = &["sim", "yes", "true", "1", "verdadeiro"];

/// Entrada de coordenadas: uma coluna `"lat,lon"` ou duas colunas
#[derive(Debug, Clone, Copy)]
pub enum CoordinateInput<'a> {
    Combined(&'a CellValue),
    Split(&'a CellValue, &'a CellValue),
}

/// Converte uma célula para o tipo declarado (fallback de data = agora)
pub fn coerce(value: &CellValue, data_type: DataType, transform: Option<Transform>) -> TypedValue {
    coerce_at(value, data_type, transform, Utc::now())
}

/// Igual a `coerce`, com o instante usado no fallback de datas
///
/// Uma transformação que não se aplica a `data_type` é ignorada; o esquema
/// já recusa essas combinações na montagem.
pub fn coerce_at(
    value: &CellValue,
    data_type: DataType,
    transform: Option<Transform>,
    now: DateTime<Utc>,
) -> TypedValue {
    let transform = transform.filter(|t| t.applies_to(data_type));
    match data_type {
        DataType::Number => {
            let number = parse_number(value);
            match transform {
                Some(Transform::Currency) => TypedValue::Number(round_cents(number)),
                _ => TypedValue::Number(number),
            }
        }
        DataType::Date => TypedValue::Date(parse_date(value).unwrap_or(now)),
        DataType::Boolean => TypedValue::Boolean(parse_bool(value)),
        DataType::Coordinates => {
            TypedValue::Coordinates(parse_coordinates(CoordinateInput::Combined(value)))
        }
        DataType::Text => TypedValue::Text(apply_text_transform(parse_text(value), transform)),
    }
}

fn apply_text_transform(text: String, transform: Option<Transform>) -> String {
    match transform {
        Some(Transform::Digits) => text.chars().filter(char::is_ascii_digit).collect(),
        Some(Transform::Lowercase) => text.to_lowercase(),
        Some(Transform::Currency) | None => text,
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Número em formato brasileiro ou internacional
///
/// Números finitos passam direto; booleanos, nulos e o resto viram 0.
pub fn parse_number(value: &CellValue) -> f64 {
    match value {
        CellValue::Number(n) if n.is_finite() => *n,
        CellValue::Text(s) => parse_currency(s),
        _ => 0.0,
    }
}

/// Valor monetário em texto
///
/// - remove `R$`/`r$` e qualquer espaço (inclusive NBSP)
/// - com `.` e `,`: ponto é milhar, vírgula é decimal
/// - só `,`: vírgula é decimal
/// - vazio, inválido, NaN ou infinito: 0
///
/// ```
/// use maxfama_common::coerce::parse_currency;
///
/// assert_eq!(parse_currency("R$ 1.234,56"), 1234.56);
/// assert_eq!(parse_currency("6,00"), 6.0);
/// assert_eq!(parse_currency("abc"), 0.0);
/// ```
pub fn parse_currency(text: &str) -> f64 {
    let stripped = text.replace("R$", "").replace("r$", "");
    let mut cleaned: String = stripped.chars().filter(|c| !c.is_whitespace()).collect();

    if cleaned.is_empty() {
        return 0.0;
    }

    if cleaned.contains('.') && cleaned.contains(',') {
        cleaned = cleaned.replace('.', "").replace(',', ".");
    } else if cleaned.contains(',') {
        cleaned = cleaned.replace(',', ".");
    }

    match cleaned.parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => 0.0,
    }
}

/// Data da célula, ou None quando vazia/inválida
///
/// - `dd/MM/yyyy[ HH:mm[:ss]]` (separador espaço, `T` ou `,`), ano com dois
///   dígitos = 20YY, sem hora = meia-noite UTC
/// - outro texto com `T` ou `Z`: ISO-8601
/// - `yyyy-MM-dd[ HH:mm[:ss]]` (colunas `date`/`timestamp` do banco)
/// - número: milissegundos desde 1970
pub fn parse_date(value: &CellValue) -> Option<DateTime<Utc>> {
    match value {
        CellValue::Text(s) => parse_date_text(s.trim()),
        CellValue::Number(n) if n.is_finite() => DateTime::from_timestamp_millis(*n as i64),
        _ => None,
    }
}

fn parse_date_text(text: &str) -> Option<DateTime<Utc>> {
    lazy_static::lazy_static! {
        // dd/MM/yyyy [HH:mm[:ss]]
        static ref BR_DATE_RE: Regex = Regex::new(
            r"^(\d{1,2})/(\d{1,2})/(\d{4}|\d{2})(?:[ T,]+(\d{1,2}):(\d{2})(?::(\d{2}))?)?$"
        ).unwrap();
        // yyyy-MM-dd [HH:mm[:ss]]
        static ref SQL_DATE_RE: Regex = Regex::new(
            r"^(\d{4})-(\d{2})-(\d{2})(?: (\d{2}):(\d{2})(?::(\d{2}))?)?$"
        ).unwrap();
    }

    if text.is_empty() {
        return None;
    }

    if let Some(caps) = BR_DATE_RE.captures(text) {
        let mut year: i32 = caps[3].parse().ok()?;
        if caps[3].len() == 2 {
            year += 2000;
        }
        let date = NaiveDate::from_ymd_opt(year, caps[2].parse().ok()?, caps[1].parse().ok()?)?;
        return at_time(date, caps.get(4), caps.get(5), caps.get(6));
    }

    if text.contains('T') || text.contains('Z') {
        return parse_iso(text);
    }

    if let Some(caps) = SQL_DATE_RE.captures(text) {
        let date = NaiveDate::from_ymd_opt(
            caps[1].parse().ok()?,
            caps[2].parse().ok()?,
            caps[3].parse().ok()?,
        )?;
        return at_time(date, caps.get(4), caps.get(5), caps.get(6));
    }

    None
}

fn parse_iso(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    // sem fuso: assume UTC
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn at_time(
    date: NaiveDate,
    hour: Option<regex::Match<'_>>,
    minute: Option<regex::Match<'_>>,
    second: Option<regex::Match<'_>>,
) -> Option<DateTime<Utc>> {
    let time = NaiveTime::from_hms_opt(time_part(hour)?, time_part(minute)?, time_part(second)?)?;
    Some(Utc.from_utc_datetime(&date.and_time(time)))
}

fn time_part(m: Option<regex::Match<'_>>) -> Option<u32> {
    m.map_or(Some(0), |m| m.as_str().parse().ok())
}

/// Booleano: `sim`, `yes`, `true`, `1`, `verdadeiro` (sem diferenciar maiúsculas)
pub fn parse_bool(value: &CellValue) -> bool {
    match value {
        CellValue::Bool(b) => *b,
        CellValue::Number(n) => *n == 1.0,
        CellValue::Text(s) => {
            let s = s.trim().to_lowercase();
            AFFIRMATIVE.contains(&s.as_str())
        }
        CellValue::Null => false,
    }
}

/// Coordenadas; None se algum componente não for um número finito
pub fn parse_coordinates(input: CoordinateInput<'_>) -> Option<LatLng> {
    match input {
        CoordinateInput::Combined(value) => {
            let text = value.as_text();
            let (lat, lng) = text.split_once(',')?;
            Some(LatLng {
                lat: parse_component(lat)?,
                lng: parse_component(lng)?,
            })
        }
        CoordinateInput::Split(lat, lng) => Some(LatLng {
            lat: coordinate_cell(lat)?,
            lng: coordinate_cell(lng)?,
        }),
    }
}

fn coordinate_cell(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Number(n) if n.is_finite() => Some(*n),
        // coluna separada pode vir com vírgula decimal
        CellValue::Text(s) => parse_component(&s.replace(',', ".")),
        _ => None,
    }
}

fn parse_component(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Texto sem espaços nas pontas; nulo vira ""
pub fn parse_text(value: &CellValue) -> String {
    value.as_text().trim().to_string()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn brazilian(int_part: u64, cents: u64) -> String {
        let digits = int_part.to_string();
        let mut grouped = String::new();
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(c);
        }
        format!("{},{:02}", grouped, cents)
    }

    proptest! {
        #[test]
        fn test_brazilian_currency_matches_plain_decimal(
            int_part in 0u64..10_000_000,
            cents in 0u64..100,
            prefix in prop::sample::select(vec!["", "R$", "R$ ", "r$", "R$\u{a0}"]),
        ) {
            let formatted = format!("{}{}", prefix, brazilian(int_part, cents));
            let plain = format!("{}.{:02}", int_part, cents);
            prop_assert_eq!(parse_currency(&formatted), parse_currency(&plain));
        }
    }
}
