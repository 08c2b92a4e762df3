use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use lotofacil_db::models::{PrizeTable, Rules};

pub const DEFAULT_CONFIG_FILE: &str = "lotofacil.json";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub rules: Rules,
    pub prizes: PrizeTable,
}

impl AppConfig {
    /// Prêmios de 14 e 15 acertos informados na linha de comando.
    pub fn with_top_prizes(mut self, prize_14: Option<f64>, prize_15: Option<f64>) -> Self {
        if let Some(p) = prize_14 {
            self.prizes.set(14, p);
        }
        if let Some(p) = prize_15 {
            self.prizes.set(15, p);
        }
        self
    }
}

pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)
        .with_context(|| format!("Não foi possível gravar {:?}", path))?;
    Ok(())
}

pub fn load_config(path: &Path) -> Result<AppConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Não foi possível ler {:?}", path))?;
    let config: AppConfig = serde_json::from_str(&json)
        .with_context(|| format!("Configuração inválida em {:?}", path))?;
    config.rules.validate()?;
    Ok(config)
}

/// Arquivo ausente : configuração padrão.
pub fn load_or_default(path: &Path) -> Result<AppConfig> {
    if path.exists() {
        let config = load_config(path)?;
        tracing::debug!(?path, "configuração carregada");
        Ok(config)
    } else {
        tracing::debug!(?path, "sem arquivo de configuração, usando padrão");
        Ok(AppConfig::default())
    }
}
