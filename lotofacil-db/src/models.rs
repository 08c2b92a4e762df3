use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::LotofacilError;

/// Prêmios fixos da Lotofácil (11, 12 e 13 acertos).
pub const FIXED_PRIZES: [(usize, f64); 3] = [(11, 6.0), (12, 12.0), (13, 30.0)];

/// Regras do jogo : volante de 25 dezenas, apostas de 15.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rules {
    pub pool_size: u8,
    pub pick_count: usize,
    pub exclusion_count: usize,
    pub combination_count: usize,
    pub min_prize_tier: usize,
    pub total_cost: f64,
}

impl Rules {
    pub const LOTOFACIL: Rules = Rules {
        pool_size: 25,
        pick_count: 15,
        exclusion_count: 5,
        combination_count: 20,
        min_prize_tier: 11,
        total_cost: 60.0,
    };

    pub fn validate(&self) -> Result<(), LotofacilError> {
        if self.pool_size == 0 || self.pick_count == 0 || self.combination_count == 0 {
            return Err(LotofacilError::InvalidRules(
                "volante, aposta e quantidade de jogos devem ser positivos".to_string(),
            ));
        }
        if self.exclusion_count + self.pick_count > self.pool_size as usize {
            return Err(LotofacilError::InvalidRules(format!(
                "{} exclusões + {} dezenas excedem o volante de {}",
                self.exclusion_count, self.pick_count, self.pool_size
            )));
        }
        if self.min_prize_tier == 0 || self.min_prize_tier > self.pick_count {
            return Err(LotofacilError::InvalidRules(format!(
                "faixa mínima de prêmio {} fora de 1..={}",
                self.min_prize_tier, self.pick_count
            )));
        }
        if !self.total_cost.is_finite() || self.total_cost < 0.0 {
            return Err(LotofacilError::InvalidRules(format!(
                "custo total inválido : {}",
                self.total_cost
            )));
        }
        Ok(())
    }

    pub fn in_range(&self, n: u8) -> bool {
        (1..=self.pool_size).contains(&n)
    }

    pub fn pool(&self) -> RangeInclusive<u8> {
        1..=self.pool_size
    }

    pub fn prize_tiers(&self) -> RangeInclusive<usize> {
        self.min_prize_tier..=self.pick_count
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::LOTOFACIL
    }
}

/// Dezenas que o jogador não quer ver em nenhuma combinação.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionSet {
    numbers: Vec<u8>,
}

impl ExclusionSet {
    /// Valores fora do volante (0 inclusive) são descartados, duplicatas
    /// contam uma vez só.
    pub fn from_input(values: &[u8], rules: &Rules) -> Result<Self, LotofacilError> {
        let mut numbers: Vec<u8> = values.iter().copied().filter(|&n| rules.in_range(n)).collect();
        numbers.sort_unstable();
        numbers.dedup();

        if numbers.len() != rules.exclusion_count {
            return Err(LotofacilError::InvalidExclusionCount {
                expected: rules.exclusion_count,
                found: numbers.len(),
                pool_size: rules.pool_size,
            });
        }
        Ok(Self { numbers })
    }

    pub fn numbers(&self) -> &[u8] {
        &self.numbers
    }

    pub fn contains(&self, n: u8) -> bool {
        self.numbers.binary_search(&n).is_ok()
    }

    /// Dezenas permitidas, em ordem crescente.
    pub fn allowed_pool(&self, rules: &Rules) -> Vec<u8> {
        rules.pool().filter(|&n| !self.contains(n)).collect()
    }
}

/// Um jogo : dezenas distintas, em ordem crescente.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Combination {
    numbers: Vec<u8>,
}

impl Combination {
    pub fn new(mut numbers: Vec<u8>, rules: &Rules) -> Result<Self, LotofacilError> {
        if numbers.len() != rules.pick_count {
            return Err(LotofacilError::InvalidCombination(format!(
                "{} dezenas, esperado {}",
                numbers.len(),
                rules.pick_count
            )));
        }
        if let Some(&n) = numbers.iter().find(|&&n| !rules.in_range(n)) {
            return Err(LotofacilError::InvalidCombination(format!(
                "dezena {} fora do volante (1-{})",
                n, rules.pool_size
            )));
        }
        numbers.sort_unstable();
        if let Some(pair) = numbers.windows(2).find(|w| w[0] == w[1]) {
            return Err(LotofacilError::InvalidCombination(format!(
                "dezena repetida : {}",
                pair[0]
            )));
        }
        Ok(Self { numbers })
    }

    pub fn numbers(&self) -> &[u8] {
        &self.numbers
    }

    pub fn contains(&self, n: u8) -> bool {
        self.numbers.binary_search(&n).is_ok()
    }
}

/// Resultado do sorteio. Posições com 0 ainda não foram preenchidas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawResult {
    slots: Vec<u8>,
}

impl DrawResult {
    pub fn empty(rules: &Rules) -> Self {
        Self {
            slots: vec![0; rules.pick_count],
        }
    }

    pub fn from_input(values: &[u8], rules: &Rules) -> Result<Self, LotofacilError> {
        if values.len() > rules.pick_count {
            return Err(LotofacilError::TooManyDrawNumbers {
                expected: rules.pick_count,
                found: values.len(),
            });
        }
        let mut slots = values.to_vec();
        slots.resize(rules.pick_count, 0);
        Ok(Self { slots })
    }

    pub fn slots(&self) -> &[u8] {
        &self.slots
    }

    pub fn contains(&self, n: u8) -> bool {
        n != 0 && self.slots.contains(&n)
    }

    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|&&n| n != 0).count()
    }

    /// Todas as posições preenchidas com dezenas distintas do volante.
    pub fn is_complete(&self, rules: &Rules) -> bool {
        let mut seen: Vec<u8> = self.slots.iter().copied().filter(|&n| rules.in_range(n)).collect();
        seen.sort_unstable();
        seen.dedup();
        seen.len() == self.slots.len()
    }
}

/// Faixas cujo prêmio o jogador informa (14 e 15 acertos).
pub const TOP_PRIZE_TIERS: [usize; 2] = [14, 15];

/// Valor pago por faixa de acertos.
///
/// Lida de um arquivo, a tabela parte dos valores padrão : entradas ausentes
/// mantêm o padrão, e as faixas fixas não podem ser alteradas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<usize, f64>", into = "BTreeMap<usize, f64>")]
pub struct PrizeTable {
    prizes: BTreeMap<usize, f64>,
}

impl TryFrom<BTreeMap<usize, f64>> for PrizeTable {
    type Error = LotofacilError;

    fn try_from(entries: BTreeMap<usize, f64>) -> Result<Self, Self::Error> {
        let mut table = PrizeTable::default();
        for (tier, value) in entries {
            if !value.is_finite() || value < 0.0 {
                return Err(LotofacilError::InvalidPrize(format!(
                    "{} acertos : valor {}",
                    tier, value
                )));
            }
            if let Some(&(_, fixed)) = FIXED_PRIZES.iter().find(|(t, _)| *t == tier) {
                if value != fixed {
                    return Err(LotofacilError::InvalidPrize(format!(
                        "{} acertos tem prêmio fixo de {}, recebido {}",
                        tier, fixed, value
                    )));
                }
            } else if TOP_PRIZE_TIERS.contains(&tier) {
                table.set(tier, value);
            } else {
                return Err(LotofacilError::InvalidPrize(format!(
                    "faixa de {} acertos não existe",
                    tier
                )));
            }
        }
        Ok(table)
    }
}

impl From<PrizeTable> for BTreeMap<usize, f64> {
    fn from(table: PrizeTable) -> Self {
        table.prizes
    }
}

impl PrizeTable {
    /// Faixas fixas mais os prêmios de 14 e 15 acertos informados pelo jogador.
    pub fn with_top_prizes(prize_14: f64, prize_15: f64) -> Self {
        let mut prizes: BTreeMap<usize, f64> = FIXED_PRIZES.into_iter().collect();
        prizes.insert(14, prize_14);
        prizes.insert(15, prize_15);
        Self { prizes }
    }

    pub fn get(&self, tier: usize) -> f64 {
        self.prizes.get(&tier).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, tier: usize, value: f64) {
        self.prizes.insert(tier, value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.prizes.iter().map(|(&tier, &value)| (tier, value))
    }
}

impl Default for PrizeTable {
    fn default() -> Self {
        Self::with_top_prizes(0.0, 0.0)
    }
}

/// Quantidade de jogos por faixa premiada.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerformanceHistogram {
    counts: BTreeMap<usize, u32>,
}

impl PerformanceHistogram {
    pub fn new(rules: &Rules) -> Self {
        Self {
            counts: rules.prize_tiers().map(|tier| (tier, 0)).collect(),
        }
    }

    /// Acertos abaixo da faixa mínima não são contabilizados.
    pub fn record(&mut self, hits: usize) {
        if let Some(count) = self.counts.get_mut(&hits) {
            *count += 1;
        }
    }

    pub fn get(&self, tier: usize) -> u32 {
        self.counts.get(&tier).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.counts.iter().map(|(&tier, &count)| (tier, count))
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberUsage {
    Excluded,
    Used,
    Unused,
}

impl std::fmt::Display for NumberUsage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumberUsage::Excluded => write!(f, "EXCL"),
            NumberUsage::Used => write!(f, "USADA"),
            NumberUsage::Unused => write!(f, "-"),
        }
    }
}
