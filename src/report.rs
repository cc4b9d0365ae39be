//! Relatórios em texto para o terminal

use maxfama_common::format::format_currency;
use maxfama_common::summary::FichaSummary;
use maxfama_common::{FieldSchema, ValidationReport};
use std::fmt::Write;

/// Até quantas fichas com pendência são listadas
const MAX_LISTED_RECORDS: usize = 20;

/// Indicadores do lote
///
/// `media_linhas` é a média calculada direto das linhas brutas (busca em
/// todas as colunas de valor); aparece só quando difere da média das fichas.
pub fn render_summary(summary: &FichaSummary, media_linhas: f64) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Fichas: {}", summary.total_fichas);
    let _ = writeln!(out, "Valor total: {}", format_currency(summary.valor_total));
    let _ = writeln!(
        out,
        "Valor médio por ficha: {}",
        format_currency(summary.media_valor_por_ficha)
    );
    if (media_linhas - summary.media_valor_por_ficha).abs() > f64::EPSILON {
        let _ = writeln!(
            out,
            "Valor médio por ficha (todas as colunas): {}",
            format_currency(media_linhas)
        );
    }
    let _ = writeln!(out, "Confirmadas: {}", summary.confirmadas);
    let _ = writeln!(
        out,
        "Comparecimentos: {} ({:.1}% das confirmadas)",
        summary.comparecimentos,
        summary.taxa_comparecimento() * 100.0
    );
    let _ = writeln!(out, "Aprovadas: {}", summary.aprovadas);

    if !summary.por_scouter.is_empty() {
        let _ = writeln!(out, "\nPor scouter:");
        for (scouter, stats) in &summary.por_scouter {
            let _ = writeln!(
                out,
                "  {}: {} fichas, {} confirmadas, {} comparecimentos, {}",
                scouter,
                stats.fichas,
                stats.confirmadas,
                stats.comparecimentos,
                format_currency(stats.valor_total)
            );
        }
    }

    out
}

/// Pendências de campos obrigatórios
pub fn render_validation(report: &ValidationReport, schema: &FieldSchema) -> String {
    let mut out = String::new();

    if report.is_clean() {
        let _ = writeln!(
            out,
            "✔ {} fichas, nenhum campo obrigatório ausente",
            report.total_records
        );
        return out;
    }

    let _ = writeln!(
        out,
        "⚠ {} de {} fichas com campos obrigatórios ausentes",
        report.missing.len(),
        report.total_records
    );
    let _ = writeln!(
        out,
        "  Campos: {}",
        report.missing_field_names(schema).join(", ")
    );

    for missing in report.missing.iter().take(MAX_LISTED_RECORDS) {
        let _ = writeln!(out, "  #{}: {}", missing.index + 1, missing.fields.join(", "));
    }
    if report.missing.len() > MAX_LISTED_RECORDS {
        let _ = writeln!(
            out,
            "  ... e mais {}",
            report.missing.len() - MAX_LISTED_RECORDS
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use maxfama_common::{normalize, summarize, validate_required, RawRow};

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn test_render_summary() {
        let records = vec![
            normalize(&row(&[("scouter", "Ana"), ("Valor Ficha", "6"), ("Ficha Confirmada", "sim")])),
            normalize(&row(&[("scouter", "Ana"), ("Valor Ficha", "10")])),
            normalize(&row(&[("scouter", "Bia"), ("Valor Ficha", "0")])),
        ];
        let summary = summarize(&records);
        let text = render_summary(&summary, summary.media_valor_por_ficha);

        assert!(text.contains("Fichas: 3"));
        assert!(text.contains("Valor total: R$ 16,00"));
        assert!(text.contains("Valor médio por ficha: R$ 8,00"));
        assert!(!text.contains("todas as colunas"));
        assert!(text.contains("  Ana: 2 fichas, 1 confirmadas"));
    }

    #[test]
    fn test_render_summary_shows_row_mean_when_different() {
        let records = vec![normalize(&row(&[("Valor Ficha", "6")]))];
        let text = render_summary(&summarize(&records), 7.0);
        assert!(text.contains("Valor médio por ficha (todas as colunas): R$ 7,00"));
    }

    #[test]
    fn test_render_validation() {
        let schema = FieldSchema::builtin();
        let records = vec![normalize(&row(&[("nome", "Ana")]))];
        let report = validate_required(&records, schema);
        let text = render_validation(&report, schema);

        assert!(text.contains("1 de 1 fichas"));
        assert!(text.contains("Campos: id, scouter, criado"));
        assert!(text.contains("#1: id, scouter, criado"));
    }

    #[test]
    fn test_render_validation_clean() {
        let text = render_validation(&ValidationReport::default(), FieldSchema::builtin());
        assert!(text.starts_with("✔ 0 fichas"));
    }
}
