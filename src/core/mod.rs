//! # Módulo Core — Modelo de Texto e Léxico
//!
//! Tipos fundamentais sobre os quais todo o resto trabalha:
//!
//! - [`Token`] — palavra com etiqueta, lema e rótulos verificados
//! - [`Sample`] — uma frase, dona dos seus tokens e dos caches de treinamento
//! - [`Text`] — sequência de frases
//! - [`Lexicon`] / [`LexiconLookup`] — palavras conhecidas, afixos frequentes
//!
//! ## Propriedade
//!
//! ```text
//! Text ──owns──▶ Sample ──owns──▶ Token
//!                                  │
//!                                  └── TokenRef { sample, position }  (handle, sem ponteiro)
//! ```
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use semantic_tagger::core::Text;
//!
//! let text = Text::from_raw("Une phrase. Une autre.");
//! assert_eq!(text.samples().len(), 2);
//! ```

/// Sub-módulo do [`Token`] e do handle [`TokenRef`].
pub mod token;

/// Sub-módulo da [`Sample`] (frase).
pub mod sample;

/// Sub-módulo do [`Text`].
pub mod text;

/// Sub-módulo do [`Lexicon`].
pub mod lexicon;

/// Stopwords e palavras usuais do francês.
pub mod stopwords;

/// Normalização, tokenização e helpers de afixo.
pub mod textutils;

pub use lexicon::{Lexicon, LexiconEntry, LexiconLookup};
pub use sample::Sample;
pub use text::Text;
pub use token::{Label, Token, TokenRef};
