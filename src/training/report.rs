//! # Relatório de Treinamento
//!
//! Toda sessão de [`RuleTrainer::train`](super::RuleTrainer::train) devolve
//! um [`TrainingReport`] serializável: a lista ordenada de regras (a ordem
//! é o modelo), as contagens de cada iteração e o estado terminal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::rules::RuleFamily;

/// Como a sessão terminou.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainingState {
    /// Nenhum erro restante.
    Converged,
    /// Restam erros, mas nenhuma regra qualificada os corrige.
    Exhausted,
    /// Interrompida pelo sinal de parada.
    Stopped,
}

/// Regra aprendida, na forma textual, com a sua pontuação de seleção.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredRule {
    pub rule: String,
    pub score: f64,
}

/// Contagens de uma iteração (uma regra aplicada).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IterationStats {
    pub rule: String,
    pub good: usize,
    pub bad: usize,
    pub changed: usize,
    pub errors_after: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrainingReport {
    pub family: RuleFamily,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total_tokens: usize,
    pub initial_errors: usize,
    pub rules: Vec<ScoredRule>,
    pub iterations: Vec<IterationStats>,
    pub state: TrainingState,
    pub remaining_errors: usize,
}

impl TrainingReport {
    /// Erros restantes em porcentagem dos tokens.
    pub fn error_rate(&self) -> f64 {
        if self.total_tokens == 0 {
            return 0.0;
        }
        100.0 * self.remaining_errors as f64 / self.total_tokens as f64
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> TrainingReport {
        let now = Utc::now();
        TrainingReport {
            family: RuleFamily::Lemmatizer,
            started_at: now,
            finished_at: now,
            total_tokens: 200,
            initial_errors: 12,
            rules: vec![ScoredRule {
                rule: "SBC:pl CHANGESUFFIX \"s\" \"\"".into(),
                score: 0.5,
            }],
            iterations: vec![IterationStats {
                rule: "SBC:pl CHANGESUFFIX \"s\" \"\"".into(),
                good: 8,
                bad: 1,
                changed: 9,
                errors_after: 5,
            }],
            state: TrainingState::Exhausted,
            remaining_errors: 5,
        }
    }

    #[test]
    fn error_rate_is_a_percentage() {
        assert!((report().error_rate() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn report_round_trips_through_json() {
        let json = report().to_json().unwrap();
        let back: TrainingReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.state, TrainingState::Exhausted);
        assert_eq!(back.rules, report().rules);
        assert!(json.contains("\"family\": \"lemmatizer\""));
    }
}
