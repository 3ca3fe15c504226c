//! # Semantic Tagger
//!
//! Anotador semântico para o francês: etiquetagem morfossintática por regras
//! de transformação (Brill), lematização, extração de expressões-chave
//! ("key-entities") e cálculo de descritores a partir de um tesauro
//! aprendido.
//!
//! ## Arquitetura
//!
//! ```text
//! texto bruto
//!   │
//!   ├── core          normalização, tokenização, Text/Sample/Token, léxico
//!   ├── tagger        PosTagger (padrão → léxicas → contextuais) + Lemmatizer
//!   ├── textmining    StemmedText → n-grams → KeyEntity → deduplicação
//!   └── thesaurus     triggers → sinapses → descritores pontuados
//!
//! treinamento
//!   ├── training::RuleTrainer        corpus anotado → regras (léxicas, contextuais, lematizador)
//!   └── training::SemanticalTrainer  conteúdos + descritores humanos → sinapses
//! ```
//!
//! ## Exemplo de Uso
//!
//! ```rust,ignore
//! use semantic_tagger::{Config, Engine};
//!
//! let engine = Engine::load(Config::from_env()?)?;
//! let mut semantical = engine.analyze("Une phrase avec un mot dingue.")?;
//! semantical.deduplicate_keyentities();
//! for ke in semantical.keyentities() {
//!     println!("{ke} {:.3}", ke.confidence());
//! }
//! ```

/// Módulo `config` — objeto de configuração do motor e do treinamento.
pub mod config;

/// Módulo `core` — tipos fundamentais: Token, Sample, Text, Lexicon.
pub mod core;

/// Módulo `errors` — tipo de erro da biblioteca.
pub mod errors;

/// Módulo `rules` — templates e regras de transformação.
pub mod rules;

/// Módulo `tagger` — aplicação das regras: etiquetador e lematizador.
pub mod tagger;

/// Módulo `training` — treinadores de regras e de sinapses.
pub mod training;

/// Módulo `textmining` — stems, n-grams e key-entities.
pub mod textmining;

/// Módulo `thesaurus` — triggers, descritores e sinapses.
pub mod thesaurus;

/// Módulo `persistence` — tesauro e relatórios em JSON.
pub mod persistence;

/// Módulo `pipeline` — o `Engine`, contexto de execução.
pub mod pipeline;

/// Módulo `validation` — comparação com listas esperadas.
pub mod validation;

pub use config::Config;
pub use errors::{Error, Result};
pub use pipeline::Engine;
pub use thesaurus::{MemoryThesaurus, Thesaurus};
