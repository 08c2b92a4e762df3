use anyhow::Result;
use rand::{Rng, RngExt, SeedableRng};
use rand::rngs::StdRng;

use lotofacil_db::error::LotofacilError;
use lotofacil_db::models::{Combination, ExclusionSet, Rules};

pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

/// Valida as exclusões informadas e gera um conjunto novo de combinações.
pub fn generate_combinations(
    values: &[u8],
    rules: &Rules,
    seed: Option<u64>,
) -> Result<(ExclusionSet, Vec<Combination>)> {
    let exclusions = ExclusionSet::from_input(values, rules)?;
    let mut rng = seeded_rng(seed);
    let combinations = generate(&exclusions, rules, &mut rng)?;
    Ok((exclusions, combinations))
}

pub fn generate(
    exclusions: &ExclusionSet,
    rules: &Rules,
    rng: &mut impl Rng,
) -> Result<Vec<Combination>, LotofacilError> {
    let allowed = exclusions.allowed_pool(rules);
    tracing::debug!(
        excluded = ?exclusions.numbers(),
        pool = allowed.len(),
        "geração de combinações"
    );

    (0..rules.combination_count)
        .map(|_| {
            let picked = partial_shuffle(&allowed, rules.pick_count, &mut *rng);
            Combination::new(picked, rules)
        })
        .collect()
}

/// Fisher-Yates parcial : sorteia `count` dezenas sem reposição.
fn partial_shuffle(pool: &[u8], count: usize, rng: &mut impl Rng) -> Vec<u8> {
    let mut copy = pool.to_vec();
    let len = copy.len();
    let mut picked = Vec::with_capacity(count);

    for j in 0..count.min(len) {
        let boundary = len - 1 - j;
        let idx = rng.random_range(0..=boundary);
        picked.push(copy[idx]);
        copy.swap(idx, boundary);
    }

    picked
}
