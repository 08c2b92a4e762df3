use thiserror::Error;

/// Erros de validação do domínio Lotofácil.
#[derive(Debug, Error, PartialEq)]
pub enum LotofacilError {
    /// Menos (ou mais) números distintos válidos do que o exigido para exclusão.
    #[error("Coloque {expected} números distintos entre 1 e {pool_size} para serem excluídos (recebidos: {found})")]
    InvalidExclusionCount {
        expected: usize,
        found: usize,
        pool_size: u8,
    },

    #[error("Combinação inválida : {0}")]
    InvalidCombination(String),

    #[error("Resultado com {found} números, máximo {expected}")]
    TooManyDrawNumbers { expected: usize, found: usize },

    #[error("Regras inválidas : {0}")]
    InvalidRules(String),

    #[error("Prêmio inválido : {0}")]
    InvalidPrize(String),
}
