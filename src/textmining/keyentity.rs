//! # KeyEntity — Expressão Candidata e as Suas Confianças
//!
//! Uma [`KeyEntity`] é uma sequência ordenada de stems (um n-gram ou um stem
//! isolado) com a contagem no texto e as métricas calculadas uma única vez,
//! na construção.
//!
//! ## Métricas
//!
//! | Métrica | Fórmula |
//! |---------|---------|
//! | `frequency` | `count / palavras / 0.1` |
//! | `nrelative_frequency` | `count / (palavras - n + 1)` |
//! | `title` | `1 + Σ (3 / #stems com sentido + 0.1)` por nome próprio |
//! | `pos` | média dos pesos por categoria (SBP 2.5, ADJ 1.7, SBC 1.5, verbo 1.2, ADV 1.0, être/avoir 0.3, resto 0.1) |
//! | `heuristical_mutual_information` | isolamento dos stems fora da expressão |
//! | `statistical_mutual_information` | `ln(count / possíveis / Π p(stem))` |
//!
//! ## Compostos
//!
//! ```text
//! collocation = média(heurística, estatística) * pos
//! keyconcept  = nrelative_frequency
//! confidence  = collocation * keyconcept
//! trigger     = estatística * nrelative_frequency
//! ```
//!
//! ## Comparação entre Parentes
//!
//! [`KeyEntity::beats`] só vale entre entidades em que uma contém a outra;
//! fora disso devolve [`Error::NotRelated`].

use std::fmt;

use serde::Serialize;

use super::stemmed_text::{StemId, StemmedText};
use crate::errors::{Error, Result};

/// Métricas de uma entidade, calculadas na construção.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Confidences {
    pub frequency: f64,
    pub nrelative_frequency: f64,
    pub title: f64,
    pub pos: f64,
    pub heuristical_mutual_information: f64,
    pub statistical_mutual_information: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct KeyEntity {
    stems: Vec<StemId>,
    count: usize,
    /// Lemas das ocorrências principais, separados por espaço.
    label: String,
    /// Formas de superfície das ocorrências principais.
    surface: String,
    title: bool,
    confidences: Confidences,
}

impl KeyEntity {
    /// Cria a entidade e calcula todas as métricas.
    pub fn new(stems: Vec<StemId>, count: usize, text: &StemmedText) -> Self {
        let label = stems
            .iter()
            .map(|&id| text.main_token(id).lemme())
            .collect::<Vec<_>>()
            .join(" ");
        let surface = stems
            .iter()
            .map(|&id| text.main_token(id).original())
            .collect::<Vec<_>>()
            .join(" ");
        let title = stems.iter().all(|&id| text.stem_istitle(id));
        let confidences = Confidences {
            frequency: count as f64 / text.len() as f64 / 0.1,
            nrelative_frequency: count as f64 / ngram_possible(text, stems.len()),
            title: title_confidence(&stems, text),
            pos: pos_confidence(&stems, text),
            heuristical_mutual_information: heuristical_mutual_information(&stems, text),
            statistical_mutual_information: statistical_mutual_information(&stems, count, text),
        };
        Self {
            stems,
            count,
            label,
            surface,
            title,
            confidences,
        }
    }

    pub fn stems(&self) -> &[StemId] {
        &self.stems
    }

    pub fn len(&self) -> usize {
        self.stems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stems.is_empty()
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Forma canônica (lemas), usada como chave de trigger.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn surface(&self) -> &str {
        &self.surface
    }

    /// Todos os stems são nomes próprios.
    pub fn istitle(&self) -> bool {
        self.title
    }

    pub fn confidences(&self) -> &Confidences {
        &self.confidences
    }

    pub fn collocation_confidence(&self) -> f64 {
        let c = &self.confidences;
        (c.heuristical_mutual_information + c.statistical_mutual_information) / 2.0 * c.pos
    }

    pub fn keyconcept_confidence(&self) -> f64 {
        self.confidences.nrelative_frequency
    }

    pub fn confidence(&self) -> f64 {
        self.collocation_confidence() * self.keyconcept_confidence()
    }

    pub fn frequency_relative_pmi_confidence(&self) -> f64 {
        self.confidences.statistical_mutual_information * self.confidences.nrelative_frequency
    }

    /// Valor entregue ao tesauro para cada trigger encontrado.
    pub fn trigger_score(&self) -> f64 {
        self.frequency_relative_pmi_confidence()
    }

    /// `other` aparece como subsequência contígua de `self`?
    pub fn contains(&self, other: &KeyEntity) -> bool {
        if other.stems.is_empty() || other.len() > self.len() {
            return false;
        }
        self.stems.windows(other.len()).any(|w| w == other.stems.as_slice())
    }

    /// Uma das duas contém a outra.
    pub fn is_duplicate(&self, other: &KeyEntity) -> bool {
        self.contains(other) || other.contains(self)
    }

    /// `self` concentra mais informação que `other`?
    ///
    /// Dois nomes próprios: vence a maior informação mútua estatística. Só um
    /// nome próprio: nenhum vence. Nenhum: informação mútua estatística,
    /// depois heurística, depois confiança, depois comprimento.
    pub fn beats(&self, other: &KeyEntity) -> Result<bool> {
        if !self.is_duplicate(other) {
            return Err(Error::NotRelated {
                left: self.label.clone(),
                right: other.label.clone(),
            });
        }
        let (mine, theirs) = (&self.confidences, &other.confidences);
        if self.title && other.title {
            return Ok(mine.statistical_mutual_information > theirs.statistical_mutual_information);
        }
        if self.title || other.title {
            return Ok(false);
        }
        let criteria = [
            (mine.statistical_mutual_information, theirs.statistical_mutual_information),
            (mine.heuristical_mutual_information, theirs.heuristical_mutual_information),
            (self.confidence(), other.confidence()),
            (self.len() as f64, other.len() as f64),
        ];
        Ok(criteria
            .iter()
            .find(|(a, b)| a != b)
            .is_some_and(|(a, b)| a > b))
    }
}

impl fmt::Display for KeyEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// N-grams de comprimento `n` possíveis no texto.
fn ngram_possible(text: &StemmedText, n: usize) -> f64 {
    (text.len() + 1).saturating_sub(n).max(1) as f64
}

fn title_confidence(stems: &[StemId], text: &StemmedText) -> f64 {
    let meaningful: Vec<StemId> = stems
        .iter()
        .copied()
        .filter(|&id| text.stem_is_valid(id))
        .collect();
    let titles = meaningful.iter().filter(|&&id| text.stem_istitle(id)).count();
    if titles == 0 {
        return 1.0;
    }
    1.0 + titles as f64 * (3.0 / meaningful.len() as f64 + 0.1)
}

fn pos_confidence(stems: &[StemId], text: &StemmedText) -> f64 {
    let total: f64 = stems
        .iter()
        .map(|&id| {
            let token = text.main_token(id);
            let tag = token.tag();
            if tag.starts_with("SBP") {
                2.5
            } else if tag.starts_with("ADJ") {
                1.7
            } else if tag.starts_with("SBC") {
                1.5
            } else if token.is_verb() {
                1.2
            } else if tag.starts_with("ADV") {
                1.0
            } else if token.is_avoir() || token.is_etre() {
                0.3
            } else {
                0.1
            }
        })
        .sum();
    total / stems.len().max(1) as f64
}

/// Quantas vezes cada stem com sentido aparece sem os vizinhos da expressão.
///
/// ```text
/// nenhum stem isolado          → 3 * n
/// algum stem nunca isolado     → 2
/// todos isolados às vezes      → Π 2n / (n + isolamentos)
/// ```
fn heuristical_mutual_information(stems: &[StemId], text: &StemmedText) -> f64 {
    let n = stems.len();
    if n == 1 {
        return 1.0;
    }
    let candidates: Vec<(usize, StemId)> = stems
        .iter()
        .copied()
        .enumerate()
        .filter(|&(_, id)| text.stem_is_valid(id))
        .collect();
    if candidates.is_empty() {
        return 0.1;
    }
    let alone: Vec<usize> = candidates
        .iter()
        .map(|&(position, id)| {
            let neighbors: Vec<(StemId, isize)> = stems
                .iter()
                .enumerate()
                .filter(|&(_, &other)| other != id)
                .map(|(p, &other)| (other, p as isize - position as isize))
                .collect();
            text.stem(id)
                .occurrences()
                .iter()
                .filter(|&&occurrence| !text.is_neighbor(occurrence, &neighbors))
                .count()
        })
        .collect();

    if alone.iter().all(|&v| v == 0) {
        3.0 * n as f64
    } else if alone.contains(&0) {
        2.0
    } else {
        alone
            .iter()
            .map(|&v| 2.0 * n as f64 / (n + v) as f64)
            .product()
    }
}

fn statistical_mutual_information(stems: &[StemId], count: usize, text: &StemmedText) -> f64 {
    if stems.len() == 1 {
        return 1.0;
    }
    let words = text.len() as f64;
    let members_probability: f64 = stems
        .iter()
        .map(|&id| text.stem(id).count() as f64 / words)
        .product();
    (count as f64 / ngram_possible(text, stems.len()) / members_probability).ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Text, TokenRef};
    use crate::textmining::fixtures::scenario;

    fn stem_at(text: &StemmedText, sample: usize, position: usize) -> StemId {
        text.stem_of(TokenRef { sample, position }).unwrap()
    }

    // ─── métricas ───

    #[test]
    fn bigram_confidences() {
        let text = scenario();
        let mot = stem_at(&text, 0, 4);
        let dingue = stem_at(&text, 0, 5);
        let ke = KeyEntity::new(vec![mot, dingue], 2, &text);

        assert_eq!(ke.label(), "mot dingue");
        let c = ke.confidences();
        assert!((c.frequency - 2.0 / 16.0 / 0.1).abs() < 1e-12);
        assert!((c.nrelative_frequency - 2.0 / 15.0).abs() < 1e-12);
        assert!((c.pos - (1.5 + 1.7) / 2.0).abs() < 1e-12);
        assert!((c.title - 1.0).abs() < 1e-12);
        // "mot" e "dingue" nunca aparecem separados
        assert!((c.heuristical_mutual_information - 6.0).abs() < 1e-12);
        let expected = (2.0f64 / 15.0 / (2.0 / 16.0 * 2.0 / 16.0)).ln();
        assert!((c.statistical_mutual_information - expected).abs() < 1e-12);
        assert!((ke.trigger_score() - expected * 2.0 / 15.0).abs() < 1e-12);
    }

    #[test]
    fn unigram_mutual_information_is_neutral() {
        let text = scenario();
        let phrase = stem_at(&text, 0, 1);
        let ke = KeyEntity::new(vec![phrase], 2, &text);
        assert_eq!(ke.confidences().statistical_mutual_information, 1.0);
        assert_eq!(ke.confidences().heuristical_mutual_information, 1.0);
    }

    /// Um stem que às vezes aparece sozinho baixa a confiança heurística
    #[test]
    fn isolated_member_lowers_heuristical_confidence() {
        let text = scenario();
        let phrase = stem_at(&text, 0, 1);
        let avec = stem_at(&text, 0, 2);
        let un = stem_at(&text, 0, 3);
        let mot = stem_at(&text, 0, 4);
        // "phrase avec un mot" só aparece uma vez; "phrase" e "mot" aparecem
        // uma vez fora dela.
        let ke = KeyEntity::new(vec![phrase, avec, un, mot], 1, &text);
        let expected = (8.0 / 5.0) * (8.0 / 5.0);
        assert!((ke.confidences().heuristical_mutual_information - expected).abs() < 1e-12);
    }

    // ─── comparação ───

    #[test]
    fn containment_is_contiguous() {
        let text = scenario();
        let phrase = stem_at(&text, 0, 1);
        let mot = stem_at(&text, 0, 4);
        let dingue = stem_at(&text, 0, 5);
        let long = KeyEntity::new(vec![phrase, mot, dingue], 1, &text);
        let bigram = KeyEntity::new(vec![mot, dingue], 2, &text);
        let gapped = KeyEntity::new(vec![phrase, dingue], 1, &text);
        assert!(long.contains(&bigram));
        assert!(!long.contains(&gapped));
        assert!(bigram.is_duplicate(&long));
        assert!(long.is_duplicate(&bigram));
    }

    #[test]
    fn bigram_beats_its_members() {
        let text = scenario();
        let mot = stem_at(&text, 0, 4);
        let dingue = stem_at(&text, 0, 5);
        let bigram = KeyEntity::new(vec![mot, dingue], 2, &text);
        let alone = KeyEntity::new(vec![mot], 2, &text);
        assert!(bigram.beats(&alone).unwrap());
        assert!(!alone.beats(&bigram).unwrap());
    }

    #[test]
    fn unrelated_entities_cannot_be_compared() {
        let text = scenario();
        let phrase = KeyEntity::new(vec![stem_at(&text, 0, 1)], 2, &text);
        let mot = KeyEntity::new(vec![stem_at(&text, 0, 4)], 2, &text);
        assert!(matches!(phrase.beats(&mot), Err(Error::NotRelated { .. })));
    }

    /// Só um dos dois é nome próprio: nenhum vence
    #[test]
    fn single_title_never_wins() {
        let mut raw = Text::from_words(["Jacques", "Chirac", "parle", ".", "Chirac", "parle", "."]);
        for sample in raw.samples_mut() {
            for position in 0..sample.len() {
                let tag = match sample[position].original() {
                    "." => "PUNCT",
                    "parle" => "VCJ:sg",
                    _ => "SBP:sg",
                };
                sample.set_tag(position, tag);
            }
        }
        let text = StemmedText::from_tagged(raw).unwrap();
        let chirac = stem_at(&text, 0, 1);
        let parle = stem_at(&text, 0, 2);
        let long = KeyEntity::new(vec![chirac, parle], 2, &text);
        let short = KeyEntity::new(vec![chirac], 2, &text);
        assert!(short.istitle());
        assert!(!long.istitle());
        assert!(!long.beats(&short).unwrap());
        assert!(!short.beats(&long).unwrap());
    }
}
