use std::{collections::BTreeMap, fs, path::Path};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::engine::EngineError;

pub const CELL_INDEX_KEY: &str = "cell_index";
pub const CELLS_TOTAL_KEY: &str = "cells_total";
pub const TRACK_INDEX_KEY: &str = "track_index";

/// Read-only key/number mapping handed to a generator.
///
/// Lookups never fail: missing keys fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    values: BTreeMap<String, f64>,
}

impl Context {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn cell(cell_index: i64, cells_total: i64, track_index: i64) -> Self {
        Self::new()
            .with(CELL_INDEX_KEY, cell_index as f64)
            .with(CELLS_TOTAL_KEY, cells_total as f64)
            .with(TRACK_INDEX_KEY, track_index as f64)
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        self.values.insert(key.into(), value);
    }

    pub fn merge(&mut self, other: &Context) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), *value);
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    /// Integer view of `key`, truncated toward zero. NaN reads as zero.
    #[must_use]
    pub fn integer_or(&self, key: &str, default: i64) -> i64 {
        self.get(key).map_or(default, |value| value as i64)
    }

    #[must_use]
    pub fn cell_position(&self) -> CellPosition {
        CellPosition {
            cell_index: self.integer_or(CELL_INDEX_KEY, 0),
            cells_total: self.integer_or(CELLS_TOTAL_KEY, 1).max(1),
            track_index: self.integer_or(TRACK_INDEX_KEY, 0),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(key, value)| (key.as_str(), *value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parses a flat TOML table whose values are all integers or floats.
    pub fn from_toml_str(source: &str) -> Result<Self, EngineError> {
        let table: toml::Table = toml::from_str(source)
            .map_err(|error| EngineError::InvalidContextEntry(error.message().to_string()))?;

        let mut context = Self::new();
        for (key, value) in table {
            let number = match value {
                toml::Value::Integer(integer) => integer as f64,
                toml::Value::Float(float) => float,
                other => {
                    return Err(EngineError::InvalidContextEntry(format!(
                        "{key} must be numeric, found {}",
                        other.type_str()
                    )));
                }
            };
            context.insert(key, number);
        }
        Ok(context)
    }

    #[instrument(fields(path = %path.display()))]
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read context file: {}", path.display()))?;
        let context = Self::from_toml_str(&content)
            .with_context(|| format!("invalid context file: {}", path.display()))?;
        debug!(keys = context.len(), "context loaded");
        Ok(context)
    }

    /// Parses a `key=value` assignment as given on the command line.
    pub fn parse_assignment(raw: &str) -> Result<(String, f64), EngineError> {
        let (key, value) = raw
            .split_once('=')
            .ok_or_else(|| EngineError::InvalidContextEntry(format!("expected key=value, got {raw}")))?;

        let key = key.trim();
        if key.is_empty() {
            return Err(EngineError::InvalidContextEntry(format!(
                "empty key in {raw}"
            )));
        }

        let value: f64 = value.trim().parse().map_err(|_| {
            EngineError::InvalidContextEntry(format!("{key} must be numeric, got {value}"))
        })?;
        Ok((key.to_string(), value))
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut context = Self::new();
        for (key, value) in iter {
            context.insert(key, value);
        }
        context
    }
}

/// Where a render sits inside a larger grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellPosition {
    pub cell_index: i64,
    pub cells_total: i64,
    pub track_index: i64,
}

impl Default for CellPosition {
    fn default() -> Self {
        Self {
            cell_index: 0,
            cells_total: 1,
            track_index: 0,
        }
    }
}

impl CellPosition {
    /// Normalised position of the cell in `[0, 1]`.
    ///
    /// Exactly 0 for the first cell and for single-cell grids, exactly 1 for the last cell.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.cells_total <= 1 {
            return 0.0;
        }

        let span = (self.cells_total - 1) as f64;
        (self.cell_index as f64 / span).clamp(0.0, 1.0)
    }
}
