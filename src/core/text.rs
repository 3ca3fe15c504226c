//! # Text — Coleção de Frases
//!
//! Um [`Text`] é dono das suas [`Sample`]s, que por sua vez são donas dos
//! [`Token`]s. A divisão em frases segue [`Token::begin_of_sample`].
//!
//! ```text
//! "Une phrase. Une autre."
//!   ├── Sample 0: [Une, phrase, .]
//!   └── Sample 1: [Une, autre, .]
//! ```
//!
//! Três construtores, conforme a origem:
//!
//! | Construtor | Entrada | Uso |
//! |------------|---------|-----|
//! | [`Text::from_raw`] | texto bruto | análise em tempo de execução |
//! | [`Text::from_words`] | palavras já tokenizadas | testes, ferramentas |
//! | [`Text::from_annotated`] | `palavra/TAG/lema ...` | corpus de treinamento |

use std::collections::HashMap;
use std::ops::Index;

use super::sample::Sample;
use super::textutils::{normalize_text, tokenize_text};
use super::token::{Token, TokenRef};
use crate::errors::Result;

/// Um texto segmentado em frases.
#[derive(Clone, Debug, Default)]
pub struct Text {
    samples: Vec<Sample>,
}

impl Text {
    /// Normaliza, tokeniza e segmenta um texto bruto.
    pub fn from_raw(raw: &str) -> Self {
        Self::from_tokens(tokenize_text(&normalize_text(raw)).into_iter().map(Token::new))
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_tokens(words.into_iter().map(Token::new))
    }

    /// Lê um corpus anotado: tokens `palavra/TAG[/lema]` separados por espaços.
    pub fn from_annotated(content: &str) -> Result<Self> {
        let tokens = content
            .split_whitespace()
            .map(Token::from_annotated)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_tokens(tokens))
    }

    pub fn from_samples(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    fn from_tokens(tokens: impl IntoIterator<Item = Token>) -> Self {
        let mut samples: Vec<Sample> = Vec::new();
        let mut previous: Option<Token> = None;
        for token in tokens {
            if samples.is_empty() || token.begin_of_sample(previous.as_ref()) {
                samples.push(Sample::new(samples.len()));
            }
            previous = Some(token.clone());
            if let Some(current) = samples.last_mut() {
                current.append(token);
            }
        }
        Self { samples }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [Sample] {
        &mut self.samples
    }

    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }

    /// Todos os tokens, em ordem.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.samples.iter().flat_map(|s| s.iter())
    }

    pub fn token(&self, token_ref: TokenRef) -> Option<&Token> {
        self.samples.get(token_ref.sample)?.get(token_ref.position)
    }

    /// Número total de palavras (pontuação incluída).
    pub fn len(&self) -> usize {
        self.samples.iter().map(Sample::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn meaning_words_count(&self) -> usize {
        self.samples.iter().map(Sample::meaning_words_count).sum()
    }

    /// Uso das etiquetas verificadas, da mais frequente para a menos.
    pub fn tags_stats(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for token in self.tokens() {
            match token.verified_tag() {
                Some(tag) => *counts.entry(tag).or_default() += 1,
                None => tracing::warn!(token = %token.original(), "Token sem etiqueta verificada"),
            }
        }
        let mut stats: Vec<(String, usize)> =
            counts.into_iter().map(|(t, c)| (t.to_string(), c)).collect();
        stats.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        stats
    }

    /// Contextos onde uma palavra aparece.
    pub fn check_word(&self, word: &str) -> Vec<String> {
        self.samples
            .iter()
            .flat_map(|s| {
                s.iter()
                    .filter(move |t| *t == word)
                    .map(move |t| s.show_context(t.position()))
            })
            .collect()
    }

    /// Serializa no formato anotado (`palavra/TAG[/lema]`), uma frase por linha.
    ///
    /// Com `with_lemmes`, o lema só é escrito quando difere da palavra.
    pub fn to_annotated(&self, with_lemmes: bool) -> String {
        self.samples
            .iter()
            .map(|sample| {
                sample
                    .iter()
                    .map(|t| {
                        if with_lemmes && t.lemme() != t.original() {
                            format!("{}/{}/{}", t.original(), t.tag(), t.lemme())
                        } else {
                            format!("{}/{}", t.original(), t.tag())
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Index<TokenRef> for Text {
    type Output = Token;

    fn index(&self, token_ref: TokenRef) -> &Token {
        &self.samples[token_ref.sample][token_ref.position]
    }
}
