use comfy_table::{Table, ContentArrangement, presets::UTF8_FULL, Cell, Color};

use crate::analysis::scorer::{Evaluation, is_drawn};
use crate::format::format_brl;
use lotofacil_db::models::{
    Combination, DrawResult, ExclusionSet, NumberUsage, PerformanceHistogram, PrizeTable,
};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn join_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

pub fn display_exclusions(exclusions: &ExclusionSet) {
    println!("Dezenas excluídas : {}", join_numbers(exclusions.numbers()));
}

/// Jogos com as dezenas sorteadas em verde e as demais em vermelho.
pub fn display_combinations(combinations: &[Combination], checked: Option<(&DrawResult, &[usize])>) {
    if combinations.is_empty() {
        println!("Nenhuma combinação gerada. Use : lotofacil gerar <5 dezenas>");
        return;
    }

    println!("\n🎲 Combinações\n");

    let width = combinations[0].numbers().len();
    let mut header = vec!["#".to_string()];
    header.extend((1..=width).map(|i| i.to_string()));
    if checked.is_some() {
        header.push("Acertos".to_string());
    }

    let mut table = new_table();
    table.set_header(header);

    for (i, combo) in combinations.iter().enumerate() {
        let mut row = vec![Cell::new(i + 1)];
        row.extend(combo.numbers().iter().map(|&n| {
            let cell = Cell::new(format!("{:2}", n));
            match checked {
                Some((result, _)) if is_drawn(n, result) => cell.fg(Color::Green),
                Some(_) => cell.fg(Color::Red),
                None => cell,
            }
        }));
        if let Some((_, hits)) = checked {
            row.push(Cell::new(hits.get(i).copied().unwrap_or(0)));
        }
        table.add_row(row);
    }

    println!("{table}");
}

/// Grade do volante com a quantidade de jogos em que cada dezena aparece.
pub fn display_usage_grid(usage: &[(u8, NumberUsage)], frequencies: &[(u8, u32)], columns: usize) {
    println!("\n── Dezenas usadas ──");

    let mut table = new_table();
    for (row_usage, row_freq) in usage.chunks(columns).zip(frequencies.chunks(columns)) {
        let cells: Vec<Cell> = row_usage
            .iter()
            .zip(row_freq)
            .map(|(&(n, status), &(_, count))| {
                let color = match status {
                    NumberUsage::Excluded => Color::DarkGrey,
                    NumberUsage::Used => Color::Red,
                    NumberUsage::Unused => Color::White,
                };
                let text = match status {
                    NumberUsage::Used => format!("{:2} ({})", n, count),
                    _ => format!("{:2} {}", n, status),
                };
                Cell::new(text).fg(color)
            })
            .collect();
        table.add_row(cells);
    }
    println!("{table}");
}

pub fn display_performance(histogram: &PerformanceHistogram) {
    println!("\n── Performance ──");

    let mut table = new_table();
    table.set_header(vec!["Acertos", "Jogos"]);
    for (tier, count) in histogram.iter() {
        table.add_row(vec![tier.to_string(), count.to_string()]);
    }
    println!("{table}");
}

pub fn display_prizes(prizes: &PrizeTable) {
    println!("\n── Prêmios ──");

    let mut table = new_table();
    table.set_header(vec!["Acertos", "Prêmio"]);
    for (tier, value) in prizes.iter() {
        let prize = if value > 0.0 {
            format_brl(value)
        } else {
            "—".to_string()
        };
        table.add_row(vec![tier.to_string(), prize]);
    }
    println!("{table}");
}

pub fn display_summary(evaluation: &Evaluation) {
    println!("\n── Total de prêmios/lucro ──");

    let color = if evaluation.net_profit >= 0.0 {
        Color::Green
    } else {
        Color::Red
    };

    let mut table = new_table();
    table.add_row(vec![Cell::new("Total da aposta"), Cell::new(format_brl(evaluation.total_cost))]);
    table.add_row(vec![Cell::new("Total de prêmios"), Cell::new(format_brl(evaluation.total_prize))]);
    table.add_row(vec![
        Cell::new("Lucro"),
        Cell::new(format_brl(evaluation.net_profit)).fg(color),
    ]);
    println!("{table}");
}

pub fn display_draw_result(result: &DrawResult, complete: bool) {
    let numbers: Vec<u8> = result.slots().iter().copied().filter(|&n| n != 0).collect();
    println!("\nResultado : {}", join_numbers(&numbers));
    if !complete {
        println!("(Resultado incompleto : {} de {} dezenas)", result.filled(), result.slots().len());
    }
}
