use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use lotofacil_db::db::CombinationStore;
use lotofacil_db::models::{DrawResult, ExclusionSet};

use crate::config::AppConfig;
use crate::format::{format_brl, parse_brl_decimal};

#[derive(Debug, PartialEq)]
enum InteractiveCommand {
    Exclude,
    Generate,
    Result,
    Prizes,
    Analysis,
    List,
    Quit,
}

fn parse_command(input: &str) -> Option<InteractiveCommand> {
    match input.trim().to_lowercase().as_str() {
        "1" | "excluir" | "exclude" | "excl" => Some(InteractiveCommand::Exclude),
        "2" | "gerar" | "generate" | "gen" => Some(InteractiveCommand::Generate),
        "3" | "resultado" | "result" | "res" => Some(InteractiveCommand::Result),
        "4" | "premios" | "prêmios" | "prizes" => Some(InteractiveCommand::Prizes),
        "5" | "analise" | "análise" | "analysis" | "conferir" => Some(InteractiveCommand::Analysis),
        "6" | "listar" | "list" | "ls" => Some(InteractiveCommand::List),
        "7" | "sair" | "quit" | "q" | "exit" => Some(InteractiveCommand::Quit),
        _ => None,
    }
}

fn display_menu() {
    println!();
    println!("── Modo interativo ──");
    println!("  1. excluir    Dezenas a excluir");
    println!("  2. gerar      Gerar combinações");
    println!("  3. resultado  Resultado do sorteio");
    println!("  4. premios    Prêmios de 14 e 15 acertos");
    println!("  5. analise    Conferir as combinações");
    println!("  6. listar     Combinações gravadas");
    println!("  7. sair       Sair");
    println!();
}

fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    let read = io::stdin()
        .read_line(&mut input)
        .context("Erro de leitura")?;
    if read == 0 {
        bail!("Fim da entrada");
    }
    Ok(input.trim().to_string())
}

fn parse_numbers(input: &str) -> Result<Vec<u8>> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<u8>().with_context(|| format!("Número inválido : '{}'", s)))
        .collect()
}

fn prompt_numbers(msg: &str) -> Result<Vec<u8>> {
    loop {
        let input = prompt(msg)?;
        match parse_numbers(&input) {
            Ok(v) => return Ok(v),
            Err(e) => println!("{e}. Tente novamente."),
        }
    }
}

fn prompt_prize(msg: &str, current: f64) -> Result<f64> {
    loop {
        let input = prompt(&format!("{} [{}] : ", msg, format_brl(current)))?;
        if input.is_empty() {
            return Ok(current);
        }
        match parse_brl_decimal(&input) {
            Ok(v) => return Ok(v),
            Err(e) => println!("{e:#}. Tente novamente."),
        }
    }
}

/// Exclusões, resultado e prêmios vivem só durante a sessão.
struct Session<'a> {
    store: &'a dyn CombinationStore,
    config: AppConfig,
    exclusion_input: Vec<u8>,
    exclusions: Option<ExclusionSet>,
    result: DrawResult,
    seed: Option<u64>,
}

impl<'a> Session<'a> {
    fn new(store: &'a dyn CombinationStore, config: AppConfig, seed: Option<u64>) -> Self {
        let result = DrawResult::empty(&config.rules);
        Self {
            store,
            config,
            exclusion_input: Vec::new(),
            exclusions: None,
            result,
            seed,
        }
    }

    fn exclude(&mut self) -> Result<()> {
        let rules = &self.config.rules;
        let msg = format!(
            "{} dezenas de 1 a {} a excluir (separadas por espaços) : ",
            rules.exclusion_count, rules.pool_size
        );
        self.exclusion_input = prompt_numbers(&msg)?;
        match ExclusionSet::from_input(&self.exclusion_input, rules) {
            Ok(set) => {
                crate::display::display_exclusions(&set);
                self.exclusions = Some(set);
            }
            Err(e) => {
                self.exclusions = None;
                println!("{e}");
            }
        }
        Ok(())
    }

    fn generate(&mut self) -> Result<()> {
        let (exclusions, combinations) =
            super::cmd_generate(self.store, &self.config.rules, &self.exclusion_input, self.seed)?;
        crate::display::display_combinations(&combinations, None);
        self.exclusions = Some(exclusions);
        Ok(())
    }

    fn enter_result(&mut self) -> Result<()> {
        let rules = &self.config.rules;
        let msg = format!(
            "Resultado do sorteio, até {} dezenas de 1 a {} : ",
            rules.pick_count, rules.pool_size
        );
        let numbers = prompt_numbers(&msg)?;
        self.result = DrawResult::from_input(&numbers, rules)?;
        let complete = self.result.is_complete(rules);
        crate::display::display_draw_result(&self.result, complete);
        Ok(())
    }

    fn enter_prizes(&mut self) -> Result<()> {
        let prize_14 = prompt_prize("Prêmio 14 acertos", self.config.prizes.get(14))?;
        let prize_15 = prompt_prize("Prêmio 15 acertos", self.config.prizes.get(15))?;
        self.config.prizes.set(14, prize_14);
        self.config.prizes.set(15, prize_15);
        crate::display::display_prizes(&self.config.prizes);
        Ok(())
    }

    fn analysis(&self) -> Result<()> {
        super::cmd_check(self.store, &self.config, &self.result, self.exclusions.as_ref())
    }
}

pub fn run_interactive(store: &dyn CombinationStore, config: AppConfig, seed: Option<u64>) -> Result<()> {
    println!("Bem-vindo ao modo interativo do Lotofácil fácil !");
    let mut session = Session::new(store, config, seed);

    loop {
        display_menu();
        let input = match prompt("> ") {
            Ok(s) => s,
            Err(_) => break, // EOF / Ctrl+D
        };

        if input.is_empty() {
            continue;
        }

        let outcome = match parse_command(&input) {
            Some(InteractiveCommand::Quit) => {
                println!("Até logo !");
                break;
            }
            Some(InteractiveCommand::Exclude) => session.exclude(),
            Some(InteractiveCommand::Generate) => session.generate(),
            Some(InteractiveCommand::Result) => session.enter_result(),
            Some(InteractiveCommand::Prizes) => session.enter_prizes(),
            Some(InteractiveCommand::Analysis) => session.analysis(),
            Some(InteractiveCommand::List) => super::cmd_list(session.store),
            None => {
                println!("Comando desconhecido : '{}'. Digite um número (1-7) ou o nome do comando.", input);
                Ok(())
            }
        };

        if let Err(e) = outcome {
            println!("Erro: {e:#}");
        }
    }

    Ok(())
}
