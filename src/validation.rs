//! # Validação — Key-Entities Esperadas vs. Extraídas
//!
//! Um arquivo de validação traz a lista esperada, uma linha por
//! key-entity (lemas separados por espaço), seguida do separador `—` e do
//! texto:
//!
//! ```text
//! # comentários e linhas vazias são ignorados
//! mot dingue
//! phrase
//! —
//! Une phrase avec un mot dingue. Une autre phrase avec le même mot dingue.
//! ```
//!
//! O score é `-(falsos positivos + falsos negativos) / esperadas`: zero é
//! perfeito, quanto mais negativo pior.

use serde::Serialize;

use crate::errors::{self, Error};
use crate::pipeline::Engine;

/// Separador entre a lista esperada e o texto.
pub const SEPARATOR: char = '—';

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Comparison {
    /// Extraídas e esperadas.
    pub true_positives: Vec<String>,
    /// Extraídas mas não esperadas.
    pub false_positives: Vec<String>,
    /// Esperadas mas não extraídas.
    pub false_negatives: Vec<String>,
    pub score: f64,
}

/// Compara a lista esperada com a lista extraída.
///
/// Com a lista esperada vazia o denominador vale 1.
pub fn compare_lists(valids: &[String], candidates: &[String]) -> Comparison {
    let mut comparison = Comparison::default();
    for candidate in candidates {
        if valids.contains(candidate) {
            comparison.true_positives.push(candidate.clone());
        } else {
            comparison.false_positives.push(candidate.clone());
        }
    }
    comparison.false_negatives = valids
        .iter()
        .filter(|v| !candidates.contains(*v))
        .cloned()
        .collect();
    let misses = comparison.false_positives.len() + comparison.false_negatives.len();
    comparison.score = -(misses as f64) / valids.len().max(1) as f64;

    tracing::info!(
        expected = ?valids,
        output = ?candidates,
        true_positives = ?comparison.true_positives,
        false_positives = ?comparison.false_positives,
        false_negatives = ?comparison.false_negatives,
        score = comparison.score,
        "Validação"
    );
    comparison
}

/// Separa um arquivo de validação em (lista esperada, texto).
pub fn split_validation_content(content: &str) -> errors::Result<(Vec<String>, String)> {
    let (expected, text) = content
        .split_once(SEPARATOR)
        .ok_or_else(|| Error::Validation(format!("missing '{SEPARATOR}' separator")))?;
    let expected = expected
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();
    Ok((expected, text.trim().to_string()))
}

/// Extrai as key-entities de `text` (sem deduplicação) e compara as suas
/// formas canônicas com `expected`.
pub fn validate_keyentities(engine: &Engine, expected: &[String], text: &str) -> errors::Result<Comparison> {
    let semantical = engine.analyze(text)?;
    let output: Vec<String> = semantical
        .keyentities()
        .iter()
        .map(|ke| ke.label().to_string())
        .collect();
    Ok(compare_lists(expected, &output))
}
