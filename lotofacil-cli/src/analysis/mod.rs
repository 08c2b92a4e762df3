pub mod generator;
pub mod scorer;

use lotofacil_db::models::{Combination, Rules};

/// Em quantos jogos do conjunto cada dezena do volante aparece.
pub fn compute_frequencies(combinations: &[Combination], rules: &Rules) -> Vec<(u8, u32)> {
    let mut counts = vec![0u32; rules.pool_size as usize];

    for combo in combinations {
        for &n in combo.numbers() {
            let idx = (n - 1) as usize;
            if idx < counts.len() {
                counts[idx] += 1;
            }
        }
    }

    rules.pool().zip(counts).collect()
}
