//! Maxfama Common Library
//!
//! Núcleo de normalização de fichas: resolução de aliases de coluna,
//! coerção de valores em formato brasileiro e montagem da ficha canônica.

pub mod cache;
pub mod clock;
pub mod coerce;
pub mod error;
pub mod fields;
pub mod format;
pub mod normalizer;
pub mod resolver;
pub mod summary;
pub mod types;
pub mod validation;

pub use cache::{RoutePermissionCache, TtlCache};
pub use clock::{Clock, FixedClock, ManualClock, SystemClock};
pub use coerce::{coerce, parse_currency};
pub use error::{Error, Result};
pub use fields::{DataType, FieldMapping, FieldSchema, FuzzyRule, SchemaOverrides, Transform};
pub use format::format_currency;
pub use normalizer::{media_valor_por_ficha, normalize, valor_ficha_from_row, FichaNormalizer};
pub use resolver::resolve;
pub use summary::{summarize, FichaSummary};
pub use types::{CellValue, FichaDataPoint, LatLng, RawRow, TypedValue};
pub use validation::{validate_required, ValidationReport};
