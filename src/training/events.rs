//! # Eventos de Treinamento
//!
//! Define o enum [`TrainingEvent`], publicado pelo [`RuleTrainer`](super::RuleTrainer)
//! num canal `tokio::sync::broadcast` a cada fronteira de iteração, e o
//! [`StopSignal`], o sinal externo de parada.
//!
//! ## Ciclo de Vida dos Eventos
//!
//! ```text
//! Started → RuleApplied* → Finished
//!                        ou → Stopped
//! ```
//!
//! ## Serialização
//!
//! Usa `#[serde(tag = "type")]` para produzir JSON com discriminador:
//!
//! ```json
//! { "type": "RuleApplied", "rule": "SBC:sg VCJ:sg PREVTAG PRV:sg", "score": 0.73, ... }
//! ```
//!
//! O envio não exige runtime async: sem assinantes, o evento é descartado.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::broadcast;

use super::report::TrainingState;
use crate::rules::RuleFamily;

/// Capacidade do canal de eventos; assinantes lentos perdem os mais antigos.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Evento emitido durante uma sessão de treinamento.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type")]
pub enum TrainingEvent {
    /// Sessão iniciada, depois do pré-etiquetamento do corpus.
    Started {
        family: RuleFamily,
        /// Erros no corpus antes da primeira regra.
        errors: usize,
        /// Tokens no corpus (o `corpus_size` da seleção).
        tokens: usize,
        shards: usize,
    },

    /// Uma regra foi selecionada e aplicada em todos os shards.
    ///
    /// É o "publish" da coordenação: cada shard aplica a mesma regra,
    /// na mesma ordem.
    RuleApplied {
        family: RuleFamily,
        /// Número da iteração (1-indexed).
        iteration: usize,
        rule: String,
        score: f64,
        good: usize,
        bad: usize,
        /// Tokens cujo rótulo mudou.
        changed: usize,
        /// Erros restantes depois da aplicação.
        errors_after: usize,
    },

    /// O sinal de parada foi observado numa fronteira de iteração.
    Stopped {
        family: RuleFamily,
        /// Regras aprendidas até a parada.
        rules: usize,
    },

    /// Sessão encerrada sem interrupção.
    Finished {
        family: RuleFamily,
        state: TrainingState,
        rules: usize,
        remaining_errors: usize,
    },
}

/// Cria o canal de eventos com a capacidade padrão.
pub fn event_channel() -> broadcast::Sender<TrainingEvent> {
    let (tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
    tx
}

/// Sinal de parada compartilhável entre threads.
///
/// O treinamento só o consulta entre iterações: uma regra nunca é aplicada
/// pela metade.
#[derive(Clone, Debug, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
