//! # Token — Menor Unidade do Texto
//!
//! Um [`Token`] guarda a forma de superfície (`original`), a etiqueta e o
//! lema atuais, e, em corpus de treinamento, os rótulos verificados
//! (`verified_tag` / `verified_lemme`).
//!
//! ## Sem Ponteiro para o Pai
//!
//! O token não aponta para a sua [`Sample`](super::Sample): ele só conhece a
//! própria posição e o índice da sample. Tudo o que depende de vizinhança
//! (`get_neighbors`, contexto) passa pela sample dona do token, e um
//! [`TokenRef`] serve de handle leve quando é preciso referenciar um token
//! de fora.
//!
//! ## Igualdade
//!
//! Dois tokens são iguais quando têm a mesma forma de superfície, e um token
//! pode ser comparado diretamente com uma `&str`:
//!
//! ```rust
//! use semantic_tagger::core::Token;
//!
//! let token = Token::new("bla");
//! assert!(token == "bla");
//! assert!("bla" == token);
//! assert!(token != Token::new("bleh"));
//! ```
//!
//! ## Formato Anotado
//!
//! `palavra/TAG/lema`, com o lema opcional (assume a própria palavra):
//!
//! | Entrada | verified_tag | verified_lemme |
//! |---------|--------------|----------------|
//! | `mots/SBC:pl/mot` | `SBC:pl` | `mot` |
//! | `mot/SBC:sg` | `SBC:sg` | `mot` |
//! | `mot` | — | — |

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::stopwords::is_usual_word;
use crate::errors::{Error, Result};

/// Pontuação forte: fecha uma frase.
const STRONG_PUNCTUATION: &[&str] = &[".", "!", "?", "…"];

/// Etiquetas de palavras-ferramenta (determinantes, preposições...).
const TOOL_TAGS: &[&str] = &[
    "DTN:sg", "DTN:pl", "DTC:sg", "DTC:pl", "PLU", "COO", "PREP", "REL", "SUB",
];

const VERB_TAGS: &[&str] = &["VCJ:sg", "VCJ:pl", "PAR:sg", "PAR:pl", "VNCFF", "VNCNT"];

const ETRE_TAGS: &[&str] = &["ECJ:sg", "ECJ:pl", "EPAR:sg", "ENCFF", "ENCNT"];

const AVOIR_TAGS: &[&str] = &["ACJ:sg", "ACJ:pl", "APAR:sg", "APAR:pl", "ANCFF", "ANCNT"];

/// Qual rótulo de um token é lido ou escrito (etiqueta ou lema).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Tag,
    Lemme,
}

/// Handle leve para um token: índice da sample + posição dentro dela.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenRef {
    pub sample: usize,
    pub position: usize,
}

/// Um token do texto.
#[derive(Clone, Debug)]
pub struct Token {
    /// Forma de superfície, exatamente como no texto.
    original: String,
    /// Etiqueta morfossintática atual (vazia antes da etiquetagem).
    tag: String,
    /// Lema atual (começa igual a `original`).
    lemme: String,
    verified_tag: Option<String>,
    verified_lemme: Option<String>,
    /// Índice do token dentro da sample; mantido por [`Sample::append`](super::Sample::append).
    pub(crate) position: usize,
    /// Índice da sample dona do token.
    pub(crate) sample: usize,
}

impl Token {
    /// Cria um token sem rótulos verificados.
    pub fn new(original: impl Into<String>) -> Self {
        let original = original.into();
        Self {
            lemme: original.clone(),
            original,
            tag: String::new(),
            verified_tag: None,
            verified_lemme: None,
            position: 0,
            sample: 0,
        }
    }

    /// Lê um token anotado `palavra/TAG[/lema]`.
    pub fn from_annotated(raw: &str) -> Result<Self> {
        let mut parts = raw.split('/');
        let original = parts.next().unwrap_or_default();
        if original.is_empty() {
            return Err(Error::InvalidToken(raw.to_string()));
        }
        let mut token = Token::new(original);
        if let Some(tag) = parts.next() {
            if tag.is_empty() {
                return Err(Error::InvalidToken(raw.to_string()));
            }
            token.verified_tag = Some(tag.to_string());
            let lemme = parts.next().filter(|l| !l.is_empty()).unwrap_or(original);
            token.verified_lemme = Some(lemme.to_string());
        }
        Ok(token)
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn lemme(&self) -> &str {
        &self.lemme
    }

    pub fn verified_tag(&self) -> Option<&str> {
        self.verified_tag.as_deref()
    }

    pub fn verified_lemme(&self) -> Option<&str> {
        self.verified_lemme.as_deref()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn token_ref(&self) -> TokenRef {
        TokenRef {
            sample: self.sample,
            position: self.position,
        }
    }

    /// Valor atual do rótulo pedido.
    pub fn label(&self, label: Label) -> &str {
        match label {
            Label::Tag => &self.tag,
            Label::Lemme => &self.lemme,
        }
    }

    /// Valor verificado (gold) do rótulo pedido.
    pub fn verified(&self, label: Label) -> Option<&str> {
        match label {
            Label::Tag => self.verified_tag(),
            Label::Lemme => self.verified_lemme(),
        }
    }

    /// `true` se o rótulo atual difere do verificado.
    pub fn is_error(&self, label: Label) -> bool {
        self.verified(label)
            .is_some_and(|verified| verified != self.label(label))
    }

    /// Escrita direta; quem muda rótulos de fora passa pela sample,
    /// que mantém os caches de treinamento coerentes.
    pub(crate) fn set_label(&mut self, label: Label, value: String) {
        match label {
            Label::Tag => self.tag = value,
            Label::Lemme => self.lemme = value,
        }
    }

    pub fn lower(&self) -> String {
        self.original.to_lowercase()
    }

    pub fn is_tagged(&self, tag: &str) -> bool {
        self.tag == tag
    }

    pub fn has_verified_tag(&self, tag: &str) -> bool {
        self.verified_tag.as_deref() == Some(tag)
    }

    pub fn is_strong_punctuation(&self) -> bool {
        STRONG_PUNCTUATION.contains(&self.original.as_str())
    }

    pub fn is_opening_quote(&self) -> bool {
        self.original == "«" || self.original == "\""
    }

    pub fn is_closing_quote(&self) -> bool {
        self.original == "»" || self.original == "\""
    }

    /// Um token abre nova frase quando segue pontuação forte (ou aspas de
    /// fechamento) e começa com maiúscula ou aspas de abertura.
    pub fn begin_of_sample(&self, previous: Option<&Token>) -> bool {
        let Some(previous) = previous else {
            return true;
        };
        (previous.is_strong_punctuation() || previous.is_closing_quote())
            && (self.original.chars().next().is_some_and(char::is_uppercase)
                || self.is_opening_quote())
    }

    /// Palavra-ferramenta: pela etiqueta, pela forma, ou (em início de
    /// frase) pela forma em minúsculas.
    pub fn is_tool_word(&self) -> bool {
        TOOL_TAGS.contains(&self.tag.as_str())
            || is_usual_word(&self.original)
            || (self.position == 0 && is_usual_word(&self.lower()))
    }

    /// Verbo conjugado ou no infinitivo, fora "être" e "avoir".
    pub fn is_verb(&self) -> bool {
        VERB_TAGS.contains(&self.tag.as_str())
    }

    pub fn is_etre(&self) -> bool {
        ETRE_TAGS.contains(&self.tag.as_str())
    }

    pub fn is_avoir(&self) -> bool {
        AVOIR_TAGS.contains(&self.tag.as_str())
    }

    /// O token carrega sentido: não é stopword (pelo lema), tem ao menos
    /// dois caracteres (salvo números), não é palavra-ferramenta, nem
    /// "être"/"avoir".
    pub fn has_meaning(&self) -> bool {
        !is_usual_word(&self.lemme)
            && (self.lemme.chars().count() >= 2 || is_digit(&self.lemme))
            && !self.is_tool_word()
            && !self.is_etre()
            && !self.is_avoir()
    }

    /// Como [`has_meaning`](Token::has_meaning), sem números de um dígito.
    pub fn has_meaning_alone(&self) -> bool {
        self.has_meaning() && self.lemme.chars().count() >= 2
    }

    /// Nome próprio, segundo a etiqueta.
    pub fn istitle(&self) -> bool {
        self.tag.starts_with("SBP")
    }

    /// Forma curta para logs: `<Token original/TAG [VERIFIED]>`.
    pub fn repr(&self) -> String {
        let tag = if self.tag.is_empty() {
            String::new()
        } else {
            format!("/{}", self.tag)
        };
        let verified = self
            .verified_tag
            .as_ref()
            .map(|v| format!(" [{v}]"))
            .unwrap_or_default();
        format!("<Token {}{}{}>", self.original, tag, verified)
    }
}

fn is_digit(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.original == other.original
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.original.hash(state);
    }
}

impl PartialEq<str> for Token {
    fn eq(&self, other: &str) -> bool {
        self.original == other
    }
}

impl PartialEq<&str> for Token {
    fn eq(&self, other: &&str) -> bool {
        self.original == *other
    }
}

impl PartialEq<Token> for str {
    fn eq(&self, other: &Token) -> bool {
        self == other.original
    }
}

impl PartialEq<Token> for &str {
    fn eq(&self, other: &Token) -> bool {
        *self == other.original
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ─── igualdade ───

    #[test]
    fn token_equals_plain_string_both_ways() {
        let token = Token::new("bla");
        assert!(token == "bla");
        assert!("bla" == token);
        assert!(token != Token::new("bleh"));
        assert_eq!(token, Token::new("bla"));
    }

    // ─── formato anotado ───

    #[test]
    fn annotated_token_with_lemme() {
        let token = Token::from_annotated("mots/SBC:sg/mot").unwrap();
        assert_eq!(token.original(), "mots");
        assert_eq!(token.verified_tag(), Some("SBC:sg"));
        assert_eq!(token.verified_lemme(), Some("mot"));
        assert_eq!(token.lemme(), "mots");
        assert_eq!(token.tag(), "");
    }

    /// Sem lema explícito, o lema verificado é a própria palavra
    #[test]
    fn annotated_token_defaults_lemme_to_original() {
        let token = Token::from_annotated("mot/SBC:sg").unwrap();
        assert_eq!(token.verified_lemme(), Some("mot"));
    }

    #[test]
    fn annotated_token_rejects_empty_parts() {
        assert!(Token::from_annotated("/SBC:sg").is_err());
        assert!(Token::from_annotated("mot/").is_err());
    }

    // ─── pontuação ───

    #[test]
    fn strong_punctuation() {
        for p in [".", "!", "?", "…"] {
            assert!(Token::new(p).is_strong_punctuation());
        }
        assert!(!Token::new(",").is_strong_punctuation());
    }

    #[test]
    fn begin_of_sample_after_strong_punctuation() {
        let dot = Token::new(".");
        let comma = Token::new(",");
        assert!(Token::new("Une").begin_of_sample(None));
        assert!(Token::new("Une").begin_of_sample(Some(&dot)));
        assert!(Token::new("«").begin_of_sample(Some(&dot)));
        assert!(!Token::new("une").begin_of_sample(Some(&dot)));
        assert!(!Token::new("Une").begin_of_sample(Some(&comma)));
        assert!(Token::new("Il").begin_of_sample(Some(&Token::new("»"))));
    }

    // ─── sentido ───

    fn tagged(original: &str, tag: &str, lemme: &str) -> Token {
        let mut token = Token::new(original);
        token.set_label(Label::Tag, tag.to_string());
        token.set_label(Label::Lemme, lemme.to_string());
        token
    }

    #[test]
    fn has_meaning_filters_tool_words() {
        assert!(tagged("phrase", "SBC:sg", "phrase").has_meaning());
        assert!(!tagged("avec", "PREP", "avec").has_meaning());
        assert!(!tagged("autre", "DTN:sg", "autre").has_meaning());
        assert!(!tagged("est", "ECJ:sg", "être").has_meaning());
        assert!(!tagged("ont", "ACJ:pl", "avoir").has_meaning());
        assert!(!tagged(".", "PUNCT", ".").has_meaning());
        assert!(tagged("7", "NUM", "7").has_meaning());
        assert!(!tagged("7", "NUM", "7").has_meaning_alone());
    }

    #[test]
    fn istitle_uses_tag() {
        assert!(tagged("Paris", "SBP:sg", "Paris").istitle());
        assert!(!tagged("Paris", "SBC:sg", "Paris").istitle());
    }

    #[test]
    fn is_error_compares_with_verified() {
        let mut token = Token::from_annotated("porte/SBC:sg").unwrap();
        token.set_label(Label::Tag, "VCJ:sg".to_string());
        assert!(token.is_error(Label::Tag));
        assert!(!token.is_error(Label::Lemme));
        assert!(!Token::new("porte").is_error(Label::Tag));
    }
}
