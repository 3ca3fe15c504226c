//! # Erros — Tipos de Falha da Biblioteca
//!
//! Todas as operações falíveis da biblioteca retornam [`Result<T>`], com
//! [`Error`] como tipo de erro. O binário e os helpers de persistência usam
//! `anyhow` por cima, adicionando contexto com `.context(...)`.
//!
//! | Variante | Quando ocorre |
//! |----------|---------------|
//! | `EmptyText` | Texto vazio passado ao motor de key-entities |
//! | `RuleParse` | Linha de arquivo de regras malformada |
//! | `UnknownTemplate` | Nome de template inexistente |
//! | `NotRelated` | Comparação de key-entities sem relação de contenção |
//! | `LexiconParse` | Linha de léxico malformada |
//! | `InvalidToken` | Token anotado inválido (`palavra/TAG/lema`) |
//! | `Validation` | Arquivo de validação sem separador |

use thiserror::Error;

/// Erro único da biblioteca.
#[derive(Debug, Error)]
pub enum Error {
    /// O texto normalizado está vazio: nenhuma métrica pode ser calculada.
    #[error("can't process an empty text")]
    EmptyText,

    /// Linha de regra corrompida (regras são produzidas pelo próprio trainer).
    #[error("malformed rule at line {line}: {reason}")]
    RuleParse { line: usize, reason: String },

    #[error("unknown rule template: {0}")]
    UnknownTemplate(String),

    /// A ordem entre key-entities é parcial: só vale entre pai e filho.
    #[error("keyentities must be in a parent/child relationship to compare ({left} / {right})")]
    NotRelated { left: String, right: String },

    #[error("malformed lexicon entry at line {line}: {reason}")]
    LexiconParse { line: usize, reason: String },

    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// Arquivo de validação sem o separador entre lista e texto.
    #[error("malformed validation content: {0}")]
    Validation(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Alias de resultado da biblioteca.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Atalho para erros de parsing de regra.
    pub fn rule_parse(line: usize, reason: impl Into<String>) -> Self {
        Error::RuleParse {
            line,
            reason: reason.into(),
        }
    }
}
