use anyhow::{Context, Result};
use clap::Parser;
use maxfama::{cli, config, loader, logging, report};
use maxfama_common::{summarize, validate_required, FichaNormalizer};
use cli::{Cli, Commands};
use config::Config;
use std::path::Path;
use tracing::info;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);
    let config = Config::load().context("falha ao carregar a configuração")?;

    match cli.command {
        Commands::Normalize { input, output, aliases } => {
            let normalizer = build_normalizer(&config, aliases.as_deref())?;
            let rows = load(&input)?;

            let records = normalizer.normalize_all(&rows);
            info!(records = records.len(), "fichas normalizadas");

            let json = if config.pretty_output {
                serde_json::to_string_pretty(&records)?
            } else {
                serde_json::to_string(&records)?
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("falha ao gravar {}", path.display()))?;
                    eprintln!("✔ {} fichas gravadas em {}", records.len(), path.display());
                }
                None => println!("{}", json),
            }
        }

        Commands::Validate { input, aliases, strict } => {
            let normalizer = build_normalizer(&config, aliases.as_deref())?;
            let rows = load(&input)?;

            let records = normalizer.normalize_all(&rows);
            let validation = validate_required(&records, normalizer.schema());
            print!("{}", report::render_validation(&validation, normalizer.schema()));

            if strict && !validation.is_clean() {
                anyhow::bail!(
                    "{} fichas com campos obrigatórios ausentes",
                    validation.missing.len()
                );
            }
        }

        Commands::Stats { input, aliases } => {
            let normalizer = build_normalizer(&config, aliases.as_deref())?;
            let rows = load(&input)?;

            let records = normalizer.normalize_all(&rows);
            let summary = summarize(&records);
            let media = normalizer.media_valor_por_ficha(&rows);
            print!("{}", report::render_summary(&summary, media));
        }

        Commands::Fields { aliases } => {
            let schema = config.schema(aliases.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }

        Commands::Config { set_alias_file, show } => {
            let mut config = config;
            let show = show || set_alias_file.is_none();

            if let Some(path) = set_alias_file {
                // valida o arquivo antes de gravar
                config.schema(Some(&path))?;
                config.set_alias_file(path)?;
                println!("✔ Arquivo de aliases definido");
            }

            if show {
                println!("Configuração:");
                println!(
                    "  Arquivo: {}",
                    Config::config_path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|_| "(indisponível)".into())
                );
                println!(
                    "  Aliases: {}",
                    config
                        .alias_file(None)
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "(embutidos)".into())
                );
                println!("  TTL do cache de rotas: {}s", config.route_cache_ttl_seconds);
                println!("  Lote paralelo a partir de: {}", config.parallel_threshold);
                println!("  JSON formatado: {}", if config.pretty_output { "sim" } else { "não" });
            }
        }
    }

    Ok(())
}

fn build_normalizer(config: &Config, aliases: Option<&Path>) -> Result<FichaNormalizer> {
    let schema = config
        .schema(aliases)
        .context("falha ao montar o esquema de campos")?;
    Ok(FichaNormalizer::with_schema(schema).parallel_threshold(config.parallel_threshold))
}

fn load(input: &Path) -> Result<Vec<maxfama_common::RawRow>> {
    let rows = loader::load_rows(input)
        .with_context(|| format!("falha ao ler {}", input.display()))?;
    info!(rows = rows.len(), "linhas lidas");
    Ok(rows)
}
