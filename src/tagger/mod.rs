//! # Módulo Tagger — Aplicação das Regras Aprendidas
//!
//! Consome as listas ordenadas de regras produzidas pelo treinamento:
//!
//! ```text
//! Sample[]
//!   ├── PosTagger
//!   │   ├── 1. etiqueta padrão (léxico → heurística)
//!   │   ├── 2. regras léxicas, na ordem de treinamento
//!   │   └── 3. regras contextuais, na ordem de treinamento
//!   └── Lemmatizer
//!       ├── 4. regras do lematizador, na ordem de treinamento
//!       └── 5. o léxico tem a última palavra sobre o lema
//! ```
//!
//! Cada estágio é idempotente: reexecutá-lo sobre tokens já corretos não
//! muda nada.

/// Etiquetador morfossintático.
pub mod pos_tagger;

/// Lematizador.
pub mod lemmatizer;

pub use lemmatizer::Lemmatizer;
pub use pos_tagger::{PosTagger, TaggingStages};
