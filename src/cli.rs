use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "maxfama")]
#[command(about = "Normalização de fichas para o dashboard Maxfama", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Logs detalhados (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Normaliza as linhas e grava um array JSON de fichas
    Normalize {
        /// Arquivo (.json/.csv/.xlsx/.xls/.ods) ou pasta
        #[arg(required = true)]
        input: PathBuf,

        /// Arquivo de saída (padrão: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Arquivo JSON com aliases adicionais
        #[arg(long)]
        aliases: Option<PathBuf>,
    },

    /// Lista fichas sem os campos obrigatórios
    Validate {
        /// Arquivo ou pasta de entrada
        #[arg(required = true)]
        input: PathBuf,

        /// Arquivo JSON com aliases adicionais
        #[arg(long)]
        aliases: Option<PathBuf>,

        /// Sai com erro se houver pendências
        #[arg(long)]
        strict: bool,
    },

    /// Indicadores do lote (total, valor médio por ficha, por scouter)
    Stats {
        /// Arquivo ou pasta de entrada
        #[arg(required = true)]
        input: PathBuf,

        /// Arquivo JSON com aliases adicionais
        #[arg(long)]
        aliases: Option<PathBuf>,
    },

    /// Mostra o esquema de campos efetivo
    Fields {
        /// Arquivo JSON com aliases adicionais
        #[arg(long)]
        aliases: Option<PathBuf>,
    },

    /// Mostra/edita a configuração
    Config {
        /// Define o arquivo de aliases padrão
        #[arg(long)]
        set_alias_file: Option<PathBuf>,

        /// Mostra a configuração
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalize_with_output() {
        let cli = Cli::try_parse_from(["maxfama", "-vv", "normalize", "fichas.csv", "-o", "out.json"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Normalize { input, output, aliases } => {
                assert_eq!(input, PathBuf::from("fichas.csv"));
                assert_eq!(output, Some(PathBuf::from("out.json")));
                assert!(aliases.is_none());
            }
            _ => panic!("esperado normalize"),
        }
    }

    #[test]
    fn test_parse_validate_strict() {
        let cli = Cli::try_parse_from(["maxfama", "validate", "dados/", "--strict"]).unwrap();
        assert!(matches!(cli.command, Commands::Validate { strict: true, .. }));
    }

    #[test]
    fn test_input_is_required() {
        assert!(Cli::try_parse_from(["maxfama", "stats"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
