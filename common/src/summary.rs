//! Indicadores do lote (KPIs do dashboard)

use crate::normalizer::mean_non_zero;
use crate::types::FichaDataPoint;
use serde::Serialize;
use std::collections::BTreeMap;

/// Nome usado quando a ficha não tem scouter
pub const UNASSIGNED_SCOUTER: &str = "(sem scouter)";

/// Indicadores por scouter
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScouterStats {
    pub fichas: usize,
    pub confirmadas: usize,
    pub comparecimentos: usize,
    pub valor_total: f64,
}

/// Indicadores do lote
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FichaSummary {
    pub total_fichas: usize,
    pub valor_total: f64,
    /// Média sem as fichas de valor 0
    pub media_valor_por_ficha: f64,
    pub confirmadas: usize,
    pub comparecimentos: usize,
    pub aprovadas: usize,
    pub por_scouter: BTreeMap<String, ScouterStats>,
}

impl FichaSummary {
    /// Taxa de comparecimento sobre as confirmadas (0 sem confirmadas)
    pub fn taxa_comparecimento(&self) -> f64 {
        if self.confirmadas == 0 {
            0.0
        } else {
            self.comparecimentos as f64 / self.confirmadas as f64
        }
    }
}

/// Calcula os indicadores de um lote de fichas
pub fn summarize(records: &[FichaDataPoint]) -> FichaSummary {
    let mut summary = FichaSummary {
        total_fichas: records.len(),
        ..Default::default()
    };

    for record in records {
        let valor = record.valor_ficha.unwrap_or(0.0);
        let confirmada = record.confirmado.unwrap_or(false);
        let compareceu = record.compareceu.unwrap_or(false);

        summary.valor_total += valor;
        summary.confirmadas += usize::from(confirmada);
        summary.comparecimentos += usize::from(compareceu);
        summary.aprovadas += usize::from(record.aprovado.unwrap_or(false));

        let scouter = match record.scouter.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => UNASSIGNED_SCOUTER,
        };
        let stats = summary.por_scouter.entry(scouter.to_string()).or_default();
        stats.fichas += 1;
        stats.confirmadas += usize::from(confirmada);
        stats.comparecimentos += usize::from(compareceu);
        stats.valor_total += valor;
    }

    summary.media_valor_por_ficha =
        mean_non_zero(records.iter().map(|r| r.valor_ficha.unwrap_or(0.0)));

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ficha(scouter: Option<&str>, valor: Option<f64>, confirmado: bool, compareceu: bool) -> FichaDataPoint {
        FichaDataPoint {
            scouter: scouter.map(str::to_string),
            valor_ficha: valor,
            confirmado: Some(confirmado),
            compareceu: Some(compareceu),
            ..Default::default()
        }
    }

    #[test]
    fn test_summarize() {
        let records = vec![
            ficha(Some("Maria"), Some(6.0), true, true),
            ficha(Some("Maria"), Some(0.0), true, false),
            ficha(Some("Carlos"), Some(10.0), false, false),
            ficha(None, None, false, false),
        ];
        let summary = summarize(&records);

        assert_eq!(summary.total_fichas, 4);
        assert_eq!(summary.valor_total, 16.0);
        assert_eq!(summary.media_valor_por_ficha, 8.0);
        assert_eq!(summary.confirmadas, 2);
        assert_eq!(summary.comparecimentos, 1);
        assert_eq!(summary.taxa_comparecimento(), 0.5);

        let maria = &summary.por_scouter["Maria"];
        assert_eq!(maria.fichas, 2);
        assert_eq!(maria.valor_total, 6.0);
        assert_eq!(summary.por_scouter[UNASSIGNED_SCOUTER].fichas, 1);
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_fichas, 0);
        assert_eq!(summary.media_valor_por_ficha, 0.0);
        assert_eq!(summary.taxa_comparecimento(), 0.0);
    }
}
