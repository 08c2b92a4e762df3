use std::cell::RefCell;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};

use crate::models::{Combination, Rules};

/// Chave fixa onde o último conjunto de combinações é gravado.
pub const COMBINATIONS_KEY: &str = "combinations";

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS kv (
    key    TEXT PRIMARY KEY,
    value  TEXT NOT NULL
);
";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("lotofacil.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Não foi possível criar o diretório {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Não foi possível abrir a base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Falha na migração")?;
    Ok(())
}

pub fn get_value(conn: &Connection, key: &str) -> Result<Option<String>> {
    let value = conn
        .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
        .optional()
        .with_context(|| format!("Falha ao ler a chave '{}'", key))?;
    Ok(value)
}

pub fn put_value(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO kv (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        rusqlite::params![key, value],
    ).with_context(|| format!("Falha ao gravar a chave '{}'", key))?;
    Ok(())
}

/// Porta de persistência do último conjunto de combinações gerado.
pub trait CombinationStore {
    /// Conjunto vazio quando nada foi gravado ou o conteúdo é ilegível.
    fn load(&self) -> Result<Vec<Combination>>;

    /// Substitui por inteiro o conjunto gravado.
    fn save(&self, combinations: &[Combination]) -> Result<()>;
}

pub fn encode_combinations(combinations: &[Combination]) -> Result<String> {
    let json = serde_json::to_string(combinations)
        .context("Falha ao serializar as combinações")?;
    Ok(json)
}

/// Decodifica o array de arrays gravado. Qualquer problema vira conjunto vazio.
pub fn decode_combinations(json: &str, rules: &Rules) -> Vec<Combination> {
    let raw: Vec<Vec<u8>> = match serde_json::from_str(json) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(error = %e, "combinações gravadas ilegíveis, ignoradas");
            return Vec::new();
        }
    };

    match raw
        .into_iter()
        .map(|numbers| Combination::new(numbers, rules))
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(combinations) => combinations,
        Err(e) => {
            tracing::warn!(error = %e, "combinação gravada inválida, conjunto ignorado");
            Vec::new()
        }
    }
}

pub struct SqliteStore {
    conn: Connection,
    rules: Rules,
}

impl SqliteStore {
    pub fn open(path: &Path, rules: Rules) -> Result<Self> {
        let conn = open_db(path)?;
        Self::from_connection(conn, rules)
    }

    pub fn from_connection(conn: Connection, rules: Rules) -> Result<Self> {
        migrate(&conn)?;
        Ok(Self { conn, rules })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl CombinationStore for SqliteStore {
    fn load(&self) -> Result<Vec<Combination>> {
        let combinations = match get_value(&self.conn, COMBINATIONS_KEY)? {
            Some(json) => decode_combinations(&json, &self.rules),
            None => Vec::new(),
        };
        tracing::debug!(count = combinations.len(), "combinações carregadas");
        Ok(combinations)
    }

    fn save(&self, combinations: &[Combination]) -> Result<()> {
        let json = encode_combinations(combinations)?;
        put_value(&self.conn, COMBINATIONS_KEY, &json)?;
        tracing::info!(count = combinations.len(), "combinações gravadas");
        Ok(())
    }
}

/// Armazenamento em memória, mesmo formato JSON que o SQLite.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: RefCell<Option<String>>,
    rules: Rules,
}

impl MemoryStore {
    pub fn new(rules: Rules) -> Self {
        Self {
            slot: RefCell::new(None),
            rules,
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.slot.borrow().clone()
    }

    pub fn set_raw(&self, json: &str) {
        *self.slot.borrow_mut() = Some(json.to_string());
    }
}

impl CombinationStore for MemoryStore {
    fn load(&self) -> Result<Vec<Combination>> {
        Ok(self
            .slot
            .borrow()
            .as_deref()
            .map(|json| decode_combinations(json, &self.rules))
            .unwrap_or_default())
    }

    fn save(&self, combinations: &[Combination]) -> Result<()> {
        let json = encode_combinations(combinations)?;
        *self.slot.borrow_mut() = Some(json);
        Ok(())
    }
}
