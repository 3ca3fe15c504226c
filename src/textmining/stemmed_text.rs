//! # StemmedText — Texto Etiquetado e Agrupado por Lema
//!
//! Depois da etiquetagem e da lematização, cada token cai num [`Stem`]
//! identificado por `(lema, família da etiqueta)`. A família é a parte da
//! etiqueta antes de `:`, então singular e plural caem no mesmo stem.
//!
//! ```text
//! "Le mot dingue. Les mots dingues."
//!   mot/SBC:sg, mots/SBC:pl      → Stem("mot", "SBC")     count = 2
//!   dingue/ADJ:sg, dingues/ADJ:pl → Stem("dingue", "ADJ") count = 2
//! ```
//!
//! Cada token conhece o seu stem por índice ([`StemId`]); o stem guarda as
//! suas ocorrências como [`TokenRef`]s.

use std::collections::HashMap;
use std::fmt;

use crate::core::textutils::{normalize_text, tokenize_text};
use crate::core::{Sample, Text, Token, TokenRef};
use crate::errors::{Error, Result};
use crate::tagger::{Lemmatizer, PosTagger};

/// Índice de um [`Stem`] dentro do seu [`StemmedText`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StemId(pub usize);

/// Grupo de tokens com o mesmo lema e a mesma família de etiqueta.
#[derive(Clone, Debug)]
pub struct Stem {
    id: StemId,
    lemme: String,
    family: String,
    occurrences: Vec<TokenRef>,
    main: TokenRef,
}

impl Stem {
    pub fn id(&self) -> StemId {
        self.id
    }

    pub fn lemme(&self) -> &str {
        &self.lemme
    }

    /// Parte da etiqueta antes de `:` (`SBC`, `ADJ`, `VCJ`...).
    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn occurrences(&self) -> &[TokenRef] {
        &self.occurrences
    }

    pub fn count(&self) -> usize {
        self.occurrences.len()
    }

    /// Ocorrência mais frequente; no empate, a primeira vista.
    pub fn main_occurrence(&self) -> TokenRef {
        self.main
    }
}

impl fmt::Display for Stem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.lemme, self.family)
    }
}

/// Texto analisado: frases etiquetadas e lematizadas, mais os stems.
#[derive(Clone, Debug)]
pub struct StemmedText {
    normalized: String,
    text: Text,
    stems: Vec<Stem>,
    /// `token_stems[sample][position]`
    token_stems: Vec<Vec<StemId>>,
    medium_word_count: f64,
}

impl StemmedText {
    /// Normaliza, tokeniza, etiqueta e lematiza um texto bruto.
    ///
    /// Texto vazio (ou só espaços e marcação) é rejeitado com
    /// [`Error::EmptyText`]: todas as métricas dividem pelo número de palavras.
    pub fn new(raw: &str, tagger: &PosTagger, lemmatizer: &Lemmatizer) -> Result<Self> {
        let normalized = normalize_text(raw);
        let words = tokenize_text(&normalized);
        if words.is_empty() {
            return Err(Error::EmptyText);
        }
        let mut text = Text::from_words(words);
        tagger.tag(text.samples_mut());
        lemmatizer.lemmatize(text.samples_mut());
        Self::build(normalized, text)
    }

    /// Usa um texto já etiquetado e lematizado.
    pub fn from_tagged(text: Text) -> Result<Self> {
        let normalized = text.tokens().map(Token::original).collect::<Vec<_>>().join(" ");
        Self::build(normalized, text)
    }

    fn build(normalized: String, text: Text) -> Result<Self> {
        if text.is_empty() {
            return Err(Error::EmptyText);
        }
        let mut index: HashMap<(String, String), StemId> = HashMap::new();
        let mut stems: Vec<Stem> = Vec::new();
        let mut token_stems = Vec::with_capacity(text.samples().len());

        for (sample_idx, sample) in text.samples().iter().enumerate() {
            let mut ids = Vec::with_capacity(sample.len());
            for token in sample.iter() {
                let family = token.tag().split(':').next().unwrap_or_default().to_string();
                let key = (token.lemme().to_string(), family);
                let token_ref = TokenRef {
                    sample: sample_idx,
                    position: token.position(),
                };
                let id = *index.entry(key.clone()).or_insert_with(|| {
                    let id = StemId(stems.len());
                    stems.push(Stem {
                        id,
                        lemme: key.0,
                        family: key.1,
                        occurrences: Vec::new(),
                        main: token_ref,
                    });
                    id
                });
                stems[id.0].occurrences.push(token_ref);
                ids.push(id);
            }
            token_stems.push(ids);
        }

        for stem in &mut stems {
            stem.main = main_occurrence(&text, &stem.occurrences);
        }

        let distinct = text
            .tokens()
            .map(Token::original)
            .collect::<std::collections::HashSet<_>>()
            .len();
        let medium_word_count = text.len() as f64 / distinct as f64;

        tracing::debug!(
            words = text.len(),
            samples = text.samples().len(),
            stems = stems.len(),
            medium_word_count,
            "Texto agrupado por lemas"
        );

        Ok(Self {
            normalized,
            text,
            stems,
            token_stems,
            medium_word_count,
        })
    }

    pub fn normalized_text(&self) -> &str {
        &self.normalized
    }

    pub fn text(&self) -> &Text {
        &self.text
    }

    pub fn samples(&self) -> &[Sample] {
        self.text.samples()
    }

    /// Número de palavras, pontuação incluída.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Palavras por forma distinta.
    pub fn medium_word_count(&self) -> f64 {
        self.medium_word_count
    }

    pub fn meaning_words_count(&self) -> usize {
        self.text.meaning_words_count()
    }

    /// Stems na ordem da primeira ocorrência.
    pub fn stems(&self) -> &[Stem] {
        &self.stems
    }

    pub fn stem(&self, id: StemId) -> &Stem {
        &self.stems[id.0]
    }

    pub fn stem_of(&self, token_ref: TokenRef) -> Option<StemId> {
        self.token_stems
            .get(token_ref.sample)?
            .get(token_ref.position)
            .copied()
    }

    pub fn token(&self, token_ref: TokenRef) -> Option<&Token> {
        self.text.token(token_ref)
    }

    /// Token da ocorrência principal do stem.
    pub fn main_token(&self, id: StemId) -> &Token {
        let main = self.stem(id).main;
        &self.text.samples()[main.sample][main.position]
    }

    /// Nome próprio, pela ocorrência principal.
    pub fn stem_istitle(&self, id: StemId) -> bool {
        self.main_token(id).istitle()
    }

    pub fn stem_is_valid(&self, id: StemId) -> bool {
        self.main_token(id).has_meaning()
    }

    pub fn stem_is_valid_alone(&self, id: StemId) -> bool {
        self.main_token(id).has_meaning_alone()
    }

    /// Vale como entidade sozinho: tem sentido e é frequente (ou nome próprio).
    pub fn stem_has_interest_alone(&self, id: StemId) -> bool {
        self.stem_is_valid_alone(id)
            && (self.stem(id).count() as f64 >= self.medium_word_count || self.stem_istitle(id))
    }

    /// O token em `sample[position]` pertence ao stem?
    pub fn is_token(&self, id: StemId, sample: usize, position: isize) -> bool {
        usize::try_from(position)
            .ok()
            .and_then(|p| self.stem_of(TokenRef { sample, position: p }))
            == Some(id)
    }

    /// A ocorrência aparece com todos os vizinhos esperados `(stem, distância)`?
    pub fn is_neighbor(&self, occurrence: TokenRef, neighbors: &[(StemId, isize)]) -> bool {
        neighbors.iter().all(|&(id, distance)| {
            self.is_token(id, occurrence.sample, occurrence.position as isize + distance)
        })
    }
}

fn main_occurrence(text: &Text, occurrences: &[TokenRef]) -> TokenRef {
    let mut counts: Vec<(&str, usize, TokenRef)> = Vec::new();
    for &occurrence in occurrences {
        let Some(token) = text.token(occurrence) else {
            continue;
        };
        match counts.iter_mut().find(|(original, _, _)| *original == token.original()) {
            Some(entry) => entry.1 += 1,
            None => counts.push((token.original(), 1, occurrence)),
        }
    }
    let mut best = occurrences[0];
    let mut best_count = 0;
    for (_, count, first) in counts {
        if count > best_count {
            best = first;
            best_count = count;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::core::Lexicon;
    use crate::textmining::fixtures::LEXICON;

    fn analyze(raw: &str) -> Result<StemmedText> {
        let lexicon: Arc<Lexicon> = Arc::new(Lexicon::parse(LEXICON).unwrap());
        let tagger = PosTagger::new(lexicon.clone());
        let lemmatizer = Lemmatizer::new(lexicon, Vec::new());
        StemmedText::new(raw, &tagger, &lemmatizer)
    }

    #[test]
    fn empty_text_is_rejected() {
        assert!(matches!(analyze(""), Err(Error::EmptyText)));
        assert!(matches!(analyze("   <p></p> "), Err(Error::EmptyText)));
        assert!(matches!(StemmedText::from_tagged(Text::default()), Err(Error::EmptyText)));
    }

    /// Singular e plural do mesmo lema caem no mesmo stem
    #[test]
    fn tokens_are_grouped_by_lemme_and_tag_family() {
        let text = analyze("Une phrase avec un mot. Une phrase avec le mots.").unwrap();
        let mot = text
            .stems()
            .iter()
            .find(|s| s.lemme() == "mot")
            .expect("stem mot");
        assert_eq!(mot.family(), "SBC");
        assert_eq!(mot.count(), 2);
        let first = mot.occurrences()[0];
        assert_eq!(text.stem_of(first), Some(mot.id()));
        assert_eq!(text.token(mot.main_occurrence()).unwrap().original(), "mot");
    }

    #[test]
    fn medium_word_count_is_words_per_distinct_form() {
        let text = analyze("Une phrase avec un mot dingue. Une autre phrase avec le même mot dingue.")
            .unwrap();
        assert_eq!(text.len(), 16);
        assert!((text.medium_word_count() - 1.6).abs() < 1e-12);
    }

    #[test]
    fn neighbors_are_checked_inside_the_sample() {
        let text = analyze("Une phrase avec un mot dingue. Une autre phrase avec le même mot dingue.")
            .unwrap();
        let mot = text.stem_of(TokenRef { sample: 0, position: 4 }).unwrap();
        let dingue = text.stem_of(TokenRef { sample: 0, position: 5 }).unwrap();
        assert!(text.is_neighbor(TokenRef { sample: 0, position: 4 }, &[(dingue, 1)]));
        assert!(text.is_neighbor(TokenRef { sample: 1, position: 7 }, &[(mot, -1)]));
        assert!(!text.is_neighbor(TokenRef { sample: 0, position: 5 }, &[(mot, 1)]));
        assert!(!text.is_token(mot, 0, -1));
    }
}
