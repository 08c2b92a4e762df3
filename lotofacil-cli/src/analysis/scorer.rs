use lotofacil_db::models::{
    Combination, DrawResult, ExclusionSet, NumberUsage, PerformanceHistogram, PrizeTable, Rules,
};

/// Resumo da conferência de um conjunto de jogos contra um sorteio.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub hits: Vec<usize>,
    pub histogram: PerformanceHistogram,
    pub total_prize: f64,
    pub total_cost: f64,
    pub net_profit: f64,
}

pub fn is_drawn(n: u8, result: &DrawResult) -> bool {
    result.contains(n)
}

/// Quantas dezenas do jogo saíram no sorteio.
pub fn hits_for(combo: &Combination, result: &DrawResult) -> usize {
    combo.numbers().iter().filter(|&&n| is_drawn(n, result)).count()
}

pub fn histogram(combinations: &[Combination], result: &DrawResult, rules: &Rules) -> PerformanceHistogram {
    let mut hist = PerformanceHistogram::new(rules);
    for combo in combinations {
        hist.record(hits_for(combo, result));
    }
    hist
}

pub fn total_prize(histogram: &PerformanceHistogram, prizes: &PrizeTable) -> f64 {
    histogram
        .iter()
        .map(|(tier, count)| count as f64 * prizes.get(tier))
        .sum()
}

/// O custo é fixo por conjunto, não depende da quantidade de jogos.
pub fn net_profit(total_prize: f64, rules: &Rules) -> f64 {
    total_prize - rules.total_cost
}

pub fn evaluate(
    combinations: &[Combination],
    result: &DrawResult,
    prizes: &PrizeTable,
    rules: &Rules,
) -> Evaluation {
    let hits: Vec<usize> = combinations.iter().map(|c| hits_for(c, result)).collect();
    let histogram = histogram(combinations, result, rules);
    let total_prize = total_prize(&histogram, prizes);
    tracing::debug!(
        games = combinations.len(),
        drawn = result.filled(),
        awarded = histogram.total(),
        total_prize,
        "conferência"
    );

    Evaluation {
        hits,
        histogram,
        total_prize,
        total_cost: rules.total_cost,
        net_profit: net_profit(total_prize, rules),
    }
}

/// Situação de cada dezena do volante no conjunto de jogos.
pub fn number_usage(
    combinations: &[Combination],
    exclusions: Option<&ExclusionSet>,
    rules: &Rules,
) -> Vec<(u8, NumberUsage)> {
    rules
        .pool()
        .map(|n| {
            let usage = if exclusions.is_some_and(|e| e.contains(n)) {
                NumberUsage::Excluded
            } else if combinations.iter().any(|c| c.contains(n)) {
                NumberUsage::Used
            } else {
                NumberUsage::Unused
            };
            (n, usage)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::generator::generate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const RULES: Rules = Rules::LOTOFACIL;

    fn combo(numbers: &[u8]) -> Combination {
        Combination::new(numbers.to_vec(), &RULES).unwrap()
    }

    fn result(numbers: &[u8]) -> DrawResult {
        DrawResult::from_input(numbers, &RULES).unwrap()
    }

    fn first_fifteen() -> Combination {
        combo(&(1..=15).collect::<Vec<u8>>())
    }

    fn histogram_of(counts: &[(usize, usize)]) -> PerformanceHistogram {
        let mut hist = PerformanceHistogram::new(&RULES);
        for &(tier, count) in counts {
            for _ in 0..count {
                hist.record(tier);
            }
        }
        hist
    }

    #[test]
    fn test_hits_with_unset_slots() {
        let r = result(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 0, 0, 0, 0]);
        assert_eq!(hits_for(&first_fifteen(), &r), 11);
    }

    #[test]
    fn test_hits_order_independent() {
        let a = result(&[15, 3, 9, 1, 22]);
        let b = result(&[1, 3, 9, 15, 22]);
        assert_eq!(hits_for(&first_fifteen(), &a), 4);
        assert_eq!(hits_for(&first_fifteen(), &b), 4);
    }

    #[test]
    fn test_hits_duplicate_draw_counts_once() {
        let r = result(&[1, 1, 1, 2]);
        assert_eq!(hits_for(&first_fifteen(), &r), 2);
    }

    #[test]
    fn test_hits_bounds() {
        let all = result(&(1..=15).collect::<Vec<u8>>());
        assert_eq!(hits_for(&first_fifteen(), &all), 15);
        let none = result(&(16..=25).collect::<Vec<u8>>());
        assert_eq!(hits_for(&first_fifteen(), &none), 0);
        assert_eq!(hits_for(&first_fifteen(), &DrawResult::empty(&RULES)), 0);
    }

    #[test]
    fn test_is_drawn() {
        let r = result(&[4, 0, 17]);
        assert!(is_drawn(4, &r));
        assert!(is_drawn(17, &r));
        assert!(!is_drawn(0, &r));
        assert!(!is_drawn(5, &r));
    }

    #[test]
    fn test_histogram_buckets() {
        let combos = vec![
            first_fifteen(),
            combo(&(11..=25).collect::<Vec<u8>>()),
            combo(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 20, 21, 22]),
        ];
        let r = result(&(1..=15).collect::<Vec<u8>>());
        let hist = histogram(&combos, &r, &RULES);
        assert_eq!(hist.get(15), 1);
        assert_eq!(hist.get(12), 1);
        // 11..=25 : apenas 11..=15 sorteadas, 5 acertos
        assert_eq!(hist.total(), 2);
        assert!(hist.total() as usize <= combos.len());
    }

    #[test]
    fn test_total_prize_example() {
        let hist = histogram_of(&[(11, 2), (12, 1)]);
        let mut prizes = PrizeTable::with_top_prizes(50.0, 1000.0);
        prizes.set(13, 30.0);
        let total = total_prize(&hist, &prizes);
        assert!((total - 24.0).abs() < 1e-10, "Total = {}", total);
        assert!((net_profit(total, &RULES) + 36.0).abs() < 1e-10);
    }

    #[test]
    fn test_total_prize_linear_per_tier() {
        let hist = histogram_of(&[(11, 3), (14, 2), (15, 1)]);
        let base = PrizeTable::with_top_prizes(1500.0, 500_000.0);
        let mut scaled = base.clone();
        scaled.set(14, base.get(14) * 3.0);

        let delta = total_prize(&hist, &scaled) - total_prize(&hist, &base);
        let expected = 2.0 * base.get(14) * 2.0;
        assert!((delta - expected).abs() < 1e-6, "Delta = {}", delta);
    }

    #[test]
    fn test_zero_counts_contribute_nothing() {
        let hist = PerformanceHistogram::new(&RULES);
        let prizes = PrizeTable::with_top_prizes(1500.0, 500_000.0);
        assert_eq!(total_prize(&hist, &prizes), 0.0);
    }

    #[test]
    fn test_evaluate_idempotent() {
        let combos = vec![first_fifteen(), combo(&(11..=25).collect::<Vec<u8>>())];
        let r = result(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 24, 25]);
        let prizes = PrizeTable::default();

        let a = evaluate(&combos, &r, &prizes, &RULES);
        let b = evaluate(&combos, &r, &prizes, &RULES);
        assert_eq!(a, b);
        assert_eq!(a.hits, vec![13, 5]);
        assert_eq!(a.histogram.get(13), 1);
        assert!((a.total_prize - 30.0).abs() < 1e-10);
        assert!((a.total_cost - 60.0).abs() < 1e-10);
        assert!((a.net_profit + 30.0).abs() < 1e-10);
    }

    #[test]
    fn test_number_usage() {
        let excl = ExclusionSet::from_input(&[21, 22, 23, 24, 25], &RULES).unwrap();
        let combos = vec![first_fifteen()];
        let usage = number_usage(&combos, Some(&excl), &RULES);

        assert_eq!(usage.len(), 25);
        assert_eq!(usage[0], (1, NumberUsage::Used));
        assert_eq!(usage[15], (16, NumberUsage::Unused));
        assert_eq!(usage[24], (25, NumberUsage::Excluded));

        let usage = number_usage(&combos, None, &RULES);
        assert_eq!(usage[24], (25, NumberUsage::Unused));
    }

    #[test]
    fn test_histogram_counts_every_generated_game() {
        // 9 exclusões : sobram 16 dezenas, todo jogo acerta 14 ou 15 de um
        // sorteio tirado das mesmas 16
        let rules = Rules { exclusion_count: 9, ..RULES };
        let excl = ExclusionSet::from_input(&[17, 18, 19, 20, 21, 22, 23, 24, 25], &rules).unwrap();
        let r = DrawResult::from_input(&(1..=15).collect::<Vec<u8>>(), &rules).unwrap();

        for seed in [1, 7, 42] {
            let mut rng = StdRng::seed_from_u64(seed);
            let combos = generate(&excl, &rules, &mut rng).unwrap();
            assert_eq!(combos.len(), 20);

            let hist = histogram(&combos, &r, &rules);
            assert_eq!(hist.total(), 20);
            assert_eq!(hist.get(14) + hist.get(15), 20);
        }
    }

    #[test]
    fn test_histogram_total_bounded_by_games() {
        let excl = ExclusionSet::from_input(&[1, 2, 3, 4, 5], &RULES).unwrap();
        let r = result(&[3, 6, 7, 8, 10, 11, 12, 14, 15, 17, 19, 20, 21, 23, 25]);

        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let combos = generate(&excl, &RULES, &mut rng).unwrap();
            let hist = histogram(&combos, &r, &RULES);

            let awarded = combos.iter().filter(|c| hits_for(c, &r) >= 11).count();
            assert!(hist.total() <= 20);
            assert_eq!(hist.total() as usize, awarded);
        }
    }
}
