//! # Módulo Training — Aprendizado de Regras e de Sinapses
//!
//! Dois treinadores independentes:
//!
//! | Treinador | Entrada | Saída |
//! |-----------|---------|-------|
//! | [`RuleTrainer`] | corpus anotado (`palavra/ETIQUETA/lema`) | lista ordenada de regras |
//! | [`SemanticalTrainer`] | conteúdos com descritores humanos | sinapses do tesauro |
//!
//! ## Loop do RuleTrainer
//!
//! ```text
//! pré-etiquetagem (estágios anteriores à família)
//! loop {
//!   ├── sinal de parada?            → Stopped
//!   ├── erros restantes == 0?       → Converged
//!   ├── candidatas = make_rules(erros)
//!   ├── contagem good/bad por shard (rayon)
//!   ├── select_one(minval, coeff)
//!   │     └── nenhuma?              → Exhausted
//!   └── aplica a regra, emite TrainingEvent::RuleApplied
//! }
//! ```
//!
//! A contagem em shards é somada na ordem dos shards, então a lista de
//! regras não depende do número de shards.

/// Eventos de progresso e sinal de parada.
pub mod events;

/// Relatório serializável de uma sessão.
pub mod report;

/// Corpus particionado para contagem paralela.
pub mod shard;

/// Treinador de regras (Brill).
pub mod trainer;

/// Treinador semântico (tesauro).
pub mod semantical;

pub use events::{StopSignal, TrainingEvent};
pub use report::{TrainingReport, TrainingState};
pub use semantical::{ContentItem, ContentSource, SemanticalStats, SemanticalTrainer};
pub use shard::ShardedCorpus;
pub use trainer::RuleTrainer;
