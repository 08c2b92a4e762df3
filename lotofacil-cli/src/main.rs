mod analysis;
mod config;
mod display;
mod format;
mod interactive;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::analysis::compute_frequencies;
use crate::analysis::generator::generate_combinations;
use crate::analysis::scorer::{evaluate, number_usage};
use crate::config::{AppConfig, DEFAULT_CONFIG_FILE, load_or_default, save_config};
use crate::display::{
    display_combinations, display_draw_result, display_exclusions, display_performance,
    display_prizes, display_summary, display_usage_grid,
};
use crate::format::parse_brl_decimal;
use lotofacil_db::db::{CombinationStore, SqliteStore, db_path};
use lotofacil_db::models::{Combination, DrawResult, ExclusionSet, Rules};

const GRID_COLUMNS: usize = 5;

#[derive(Parser)]
#[command(name = "lotofacil", about = "Gerador e conferidor de combinações da Lotofácil")]
struct Cli {
    /// Caminho da base SQLite (padrão : data/lotofacil.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Arquivo de configuração (regras e prêmios)
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Logs detalhados
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Gerar 20 combinações sem as dezenas excluídas
    Gerar {
        /// 5 dezenas de 1 a 25 a excluir
        numbers: Vec<u8>,

        /// Seed para reprodutibilidade
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Listar as combinações gravadas
    Listar,

    /// Conferir as combinações gravadas contra o resultado do sorteio
    Conferir {
        /// Dezenas sorteadas (até 15)
        numbers: Vec<u8>,

        /// Prêmio para 14 acertos
        #[arg(long = "premio-14", value_parser = parse_brl_decimal)]
        prize_14: Option<f64>,

        /// Prêmio para 15 acertos
        #[arg(long = "premio-15", value_parser = parse_brl_decimal)]
        prize_15: Option<f64>,

        /// Dezenas excluídas, para marcar na grade (separadas por vírgulas)
        #[arg(short, long, value_delimiter = ',')]
        excluir: Vec<u8>,
    },

    /// Mostrar a tabela de prêmios
    Premios,

    /// Mostrar o caminho da base de dados
    DbPath,

    /// Gravar a configuração padrão
    Config {
        /// Arquivo de saída
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        output: PathBuf,
    },

    /// Modo interativo
    Interativo {
        /// Seed para reprodutibilidade
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let path = cli.db.clone().unwrap_or_else(db_path);

    match cli.command {
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::Config { output } => cmd_write_config(&output),
        command => {
            let config = load_or_default(&cli.config)?;
            let store = SqliteStore::open(&path, config.rules)?;
            run(command, &store, config)
        }
    }
}

fn run(command: Command, store: &dyn CombinationStore, config: AppConfig) -> Result<()> {
    match command {
        Command::Gerar { numbers, seed } => {
            let (exclusions, combinations) = cmd_generate(store, &config.rules, &numbers, seed)?;
            display_exclusions(&exclusions);
            display_combinations(&combinations, None);
            Ok(())
        }
        Command::Listar => cmd_list(store),
        Command::Conferir { numbers, prize_14, prize_15, excluir } => {
            let config = config.with_top_prizes(prize_14, prize_15);
            let result = DrawResult::from_input(&numbers, &config.rules)?;
            let exclusions = if excluir.is_empty() {
                None
            } else {
                Some(ExclusionSet::from_input(&excluir, &config.rules)?)
            };
            display_draw_result(&result, result.is_complete(&config.rules));
            cmd_check(store, &config, &result, exclusions.as_ref())
        }
        Command::Premios => {
            display_prizes(&config.prizes);
            Ok(())
        }
        Command::Interativo { seed } => interactive::run_interactive(store, config, seed),
        Command::DbPath | Command::Config { .. } => Ok(()),
    }
}

/// Gera e grava um conjunto novo. Exclusões inválidas não tocam no que está gravado.
pub(crate) fn cmd_generate(
    store: &dyn CombinationStore,
    rules: &Rules,
    numbers: &[u8],
    seed: Option<u64>,
) -> Result<(ExclusionSet, Vec<Combination>)> {
    let (exclusions, combinations) = generate_combinations(numbers, rules, seed)?;
    store.save(&combinations)?;
    Ok((exclusions, combinations))
}

pub(crate) fn cmd_list(store: &dyn CombinationStore) -> Result<()> {
    let combinations = store.load()?;
    display_combinations(&combinations, None);
    Ok(())
}

pub(crate) fn cmd_check(
    store: &dyn CombinationStore,
    config: &AppConfig,
    result: &DrawResult,
    exclusions: Option<&ExclusionSet>,
) -> Result<()> {
    let combinations = store.load()?;
    if combinations.is_empty() {
        println!("Nenhuma combinação gravada. Use primeiro : lotofacil gerar <5 dezenas>");
        return Ok(());
    }

    let rules = &config.rules;
    let evaluation = evaluate(&combinations, result, &config.prizes, rules);

    display_combinations(&combinations, Some((result, evaluation.hits.as_slice())));
    display_usage_grid(
        &number_usage(&combinations, exclusions, rules),
        &compute_frequencies(&combinations, rules),
        GRID_COLUMNS,
    );
    display_performance(&evaluation.histogram);
    display_prizes(&config.prizes);
    display_summary(&evaluation);
    Ok(())
}

fn cmd_write_config(output: &Path) -> Result<()> {
    save_config(&AppConfig::default(), output)?;
    println!("Configuração gravada em : {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotofacil_db::db::MemoryStore;
    use lotofacil_db::error::LotofacilError;

    const RULES: Rules = Rules::LOTOFACIL;

    #[test]
    fn test_generate_persists() {
        let store = MemoryStore::new(RULES);
        let (_, combinations) = cmd_generate(&store, &RULES, &[1, 2, 3, 4, 5], Some(9)).unwrap();
        assert_eq!(store.load().unwrap(), combinations);
    }

    #[test]
    fn test_generate_overwrites_previous_set() {
        let store = MemoryStore::new(RULES);
        cmd_generate(&store, &RULES, &[1, 2, 3, 4, 5], Some(1)).unwrap();
        let (_, second) = cmd_generate(&store, &RULES, &[21, 22, 23, 24, 25], Some(2)).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, second);
        assert_eq!(loaded.len(), 20);
        assert!(loaded.iter().all(|c| !c.contains(25)));
    }

    #[test]
    fn test_invalid_exclusions_leave_store_untouched() {
        let store = MemoryStore::new(RULES);
        let (_, first) = cmd_generate(&store, &RULES, &[1, 2, 3, 4, 5], Some(1)).unwrap();

        let err = cmd_generate(&store, &RULES, &[1, 2, 3, 0, 26], Some(2)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LotofacilError>(),
            Some(LotofacilError::InvalidExclusionCount { found: 3, .. })
        ));
        assert_eq!(store.load().unwrap(), first);
    }

    #[test]
    fn test_check_with_empty_store() {
        let store = MemoryStore::new(RULES);
        let config = AppConfig::default();
        let result = DrawResult::empty(&RULES);
        assert!(cmd_check(&store, &config, &result, None).is_ok());
    }

    #[test]
    fn test_cli_parses_conferir() {
        let cli = Cli::try_parse_from([
            "lotofacil", "conferir", "1", "2", "3", "--premio-15", "1.500.000,00", "-e", "21,22,23,24,25",
        ])
        .unwrap();
        match cli.command {
            Command::Conferir { numbers, prize_14, prize_15, excluir } => {
                assert_eq!(numbers, vec![1, 2, 3]);
                assert_eq!(prize_14, None);
                assert_eq!(prize_15, Some(1_500_000.0));
                assert_eq!(excluir, vec![21, 22, 23, 24, 25]);
            }
            _ => panic!("comando inesperado"),
        }
    }

    #[test]
    fn test_cli_parses_gerar() {
        let cli = Cli::try_parse_from(["lotofacil", "-v", "gerar", "1", "2", "3", "4", "5", "--seed", "42"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Command::Gerar { numbers, seed } => {
                assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
                assert_eq!(seed, Some(42));
            }
            _ => panic!("comando inesperado"),
        }
    }
}
