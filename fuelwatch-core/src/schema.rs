//! Column-name normalization and required-column validation.
//!
//! Source files arrive with arbitrary header casing, spaces, and accented
//! characters. Every cleaner first rewrites headers into a canonical form
//! (lowercase, `_` separators, ASCII), then resolves a small set of known
//! per-source aliases, and only then checks the required column set —
//! a missing required column fails the whole source run, fast.

use polars::prelude::*;
use thiserror::Error;

/// Column-contract violations. Fatal for the current source's run.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("{source_name}: missing required columns {missing:?} (available: {available:?})")]
    MissingColumns {
        source_name: String,
        missing: Vec<String>,
        available: Vec<String>,
    },

    #[error("table '{table}': artifact is missing required column '{column}'")]
    MissingTableColumn { table: String, column: String },
}

/// Canonical form of a header: trimmed, lowercased, spaces and periods
/// replaced with underscores, Latin diacritics transliterated to ASCII.
pub fn normalize_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.trim().to_lowercase().chars() {
        match ch {
            ' ' | '.' => out.push('_'),
            'á' | 'à' | 'ä' | 'â' | 'ã' => out.push('a'),
            'é' | 'è' | 'ë' | 'ê' => out.push('e'),
            'í' | 'ì' | 'ï' | 'î' => out.push('i'),
            'ó' | 'ò' | 'ö' | 'ô' | 'õ' => out.push('o'),
            'ú' | 'ù' | 'ü' | 'û' => out.push('u'),
            'ñ' => out.push('n'),
            'ç' => out.push('c'),
            other => out.push(other),
        }
    }
    out
}

/// Rewrite all column names into canonical form and resolve known aliases.
///
/// An alias is only applied when its target is not already present, so a
/// file carrying both `brent_price` and `price` keeps the existing `price`
/// column untouched.
pub fn normalize_columns(df: &mut DataFrame, aliases: &[(&str, &str)]) -> Result<(), PolarsError> {
    let normalized: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| normalize_name(name.as_str()))
        .collect();

    let mut renamed = normalized.clone();
    for (from, to) in aliases {
        if normalized.iter().any(|n| n == to) {
            continue;
        }
        for (i, name) in normalized.iter().enumerate() {
            if name == from {
                renamed[i] = (*to).to_string();
            }
        }
    }

    df.set_column_names(renamed)?;
    Ok(())
}

/// Fail fast if any required column is absent after normalization.
pub fn ensure_required(
    df: &DataFrame,
    source_name: &str,
    required: &[&str],
) -> Result<(), SchemaError> {
    let available: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    let missing: Vec<String> = required
        .iter()
        .filter(|col| !available.iter().any(|have| have == *col))
        .map(|col| col.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::MissingColumns {
            source_name: source_name.to_string(),
            missing,
            available,
        })
    }
}
