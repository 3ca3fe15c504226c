//! # SemanticalTagger — De Texto a Key-Entities e Descritores
//!
//! ```text
//! StemmedText
//!   ├── ngrams()           por frase, pontas com sentido, chave = stems
//!   │     └── filtro       count ≥ min_count ou todos nomes próprios
//!   ├── keystems()         stems interessantes sozinhos
//!   └── keyentities        n-grams filtrados + keystems
//!         ├── deduplicate_keyentities()
//!         ├── triggers(tesauro)
//!         └── descriptors(tesauro, min_score, min_edge_weight)
//! ```

use std::collections::{HashMap, HashSet};

use super::keyentity::KeyEntity;
use super::stemmed_text::{StemId, StemmedText};
use crate::config::NgramOptions;
use crate::thesaurus::Thesaurus;

/// Quantas key-entities o treinamento semântico considera.
pub const TRAINER_KEYENTITIES: usize = 20;

/// Um n-gram: stems na ordem e número de ocorrências.
pub type Ngram = (Vec<StemId>, usize);

pub struct SemanticalTagger {
    text: StemmedText,
    options: NgramOptions,
    keyentities: Vec<KeyEntity>,
}

impl SemanticalTagger {
    /// Extrai as key-entities do texto (n-grams filtrados, depois keystems).
    pub fn new(text: StemmedText, options: NgramOptions) -> Self {
        let mut tagger = Self {
            text,
            options,
            keyentities: Vec::new(),
        };
        tagger.make_keyentities();
        tagger
    }

    fn make_keyentities(&mut self) {
        let mut keyentities = Vec::new();
        for (stems, count) in self.filtered_ngrams() {
            keyentities.push(KeyEntity::new(stems, count, &self.text));
        }
        for id in self.keystems() {
            let count = self.text.stem(id).count();
            keyentities.push(KeyEntity::new(vec![id], count, &self.text));
        }
        tracing::debug!(count = keyentities.len(), "Key-entities candidatas");
        self.keyentities = keyentities;
    }

    pub fn text(&self) -> &StemmedText {
        &self.text
    }

    pub fn options(&self) -> NgramOptions {
        self.options
    }

    pub fn keyentities(&self) -> &[KeyEntity] {
        &self.keyentities
    }

    pub fn into_keyentities(self) -> Vec<KeyEntity> {
        self.keyentities
    }

    /// Todos os n-grams de `min_length..=max_length` tokens cujas pontas têm
    /// sentido, sem cruzar frases, do mais frequente para o menos.
    pub fn ngrams(&self, min_length: usize, max_length: usize) -> Vec<Ngram> {
        let min_length = min_length.max(1);
        let mut order: Vec<Vec<StemId>> = Vec::new();
        let mut counts: HashMap<Vec<StemId>, usize> = HashMap::new();

        for (sample_idx, sample) in self.text.samples().iter().enumerate() {
            let stems: Vec<StemId> = (0..sample.len())
                .filter_map(|position| {
                    self.text.stem_of(crate::core::TokenRef {
                        sample: sample_idx,
                        position,
                    })
                })
                .collect();
            for begin in 0..sample.len() {
                if !sample[begin].has_meaning() {
                    continue;
                }
                let last = (begin + max_length).min(sample.len());
                for end in (begin + min_length)..=last {
                    if !sample[end - 1].has_meaning() {
                        continue;
                    }
                    let key = stems[begin..end].to_vec();
                    let count = counts.entry(key.clone()).or_insert_with(|| {
                        order.push(key);
                        0
                    });
                    *count += 1;
                }
            }
        }

        let mut ngrams: Vec<Ngram> = order
            .into_iter()
            .map(|key| {
                let count = counts.get(&key).copied().unwrap_or_default();
                (key, count)
            })
            .collect();
        ngrams.sort_by(|a, b| b.1.cmp(&a.1));
        ngrams
    }

    /// N-grams frequentes ou formados só por nomes próprios.
    pub fn filtered_ngrams(&self) -> Vec<Ngram> {
        self.ngrams(self.options.min_length, self.options.max_length)
            .into_iter()
            .filter(|(stems, count)| {
                *count >= self.options.min_count
                    || stems.iter().all(|&id| self.text.stem_istitle(id))
            })
            .collect()
    }

    /// Stems com interesse sozinhos, do mais frequente para o menos.
    pub fn keystems(&self) -> Vec<StemId> {
        let mut stems: Vec<StemId> = self
            .text
            .stems()
            .iter()
            .map(|s| s.id())
            .filter(|&id| self.text.stem_has_interest_alone(id))
            .collect();
        stems.sort_by(|a, b| self.text.stem(*b).count().cmp(&self.text.stem(*a).count()));
        stems
    }

    /// Remove a perdedora de cada par em que uma entidade contém a outra.
    ///
    /// Percorre da mais curta para a mais longa; um par em que só uma é nome
    /// próprio fica intacto. Devolve quantas foram removidas.
    pub fn deduplicate_keyentities(&mut self) -> usize {
        let mut by_length: Vec<usize> = (0..self.keyentities.len()).collect();
        by_length.sort_by_key(|&i| self.keyentities[i].len());
        let mut removed: HashSet<usize> = HashSet::new();

        for (idx, &one) in by_length.iter().enumerate() {
            for &two in &by_length[idx + 1..] {
                if removed.contains(&one) || removed.contains(&two) {
                    continue;
                }
                let (a, b) = (&self.keyentities[one], &self.keyentities[two]);
                if !a.is_duplicate(b) {
                    continue;
                }
                if matches!(a.beats(b), Ok(true)) {
                    tracing::debug!(winner = %a, deleted = %b, "Key-entity duplicada removida");
                    removed.insert(two);
                } else if matches!(b.beats(a), Ok(true)) {
                    tracing::debug!(winner = %b, deleted = %a, "Key-entity duplicada removida");
                    removed.insert(one);
                }
            }
        }

        let mut index = 0;
        self.keyentities.retain(|_| {
            let keep = !removed.contains(&index);
            index += 1;
            keep
        });
        removed.len()
    }

    /// As entidades mais informativas para o treinamento semântico.
    pub fn keyentities_for_trainer(&self) -> Vec<&KeyEntity> {
        let mut ranked: Vec<&KeyEntity> = self.keyentities.iter().collect();
        let score = |ke: &KeyEntity| ke.frequency_relative_pmi_confidence() * ke.confidences().pos;
        ranked.sort_by(|a, b| score(b).total_cmp(&score(a)));
        ranked.truncate(TRAINER_KEYENTITIES);
        ranked
    }

    /// Triggers conhecidos pelo tesauro, cada um com o score da sua entidade.
    pub fn triggers(&self, thesaurus: &dyn Thesaurus) -> Vec<(String, f64)> {
        let mut seen = HashSet::new();
        self.keyentities
            .iter()
            .filter(|ke| seen.insert(ke.label()))
            .filter(|ke| thesaurus.trigger(ke.label()).is_some())
            .map(|ke| (ke.label().to_string(), ke.trigger_score()))
            .collect()
    }

    /// Descritores do texto, em porcentagem do maior score de trigger.
    ///
    /// Só contam as arestas com peso acima de `min_edge_weight`; ficam os
    /// descritores acima de `min_score`, do maior para o menor.
    pub fn descriptors(
        &self,
        thesaurus: &dyn Thesaurus,
        min_score: f64,
        min_edge_weight: f64,
    ) -> Vec<(String, f64)> {
        let mut order: Vec<String> = Vec::new();
        let mut scored: HashMap<String, f64> = HashMap::new();
        let mut max_score: f64 = 0.0;

        for (trigger, score) in self.triggers(thesaurus) {
            for edge in thesaurus.trigger(&trigger).unwrap_or_default() {
                if edge.weight <= min_edge_weight {
                    continue;
                }
                let weight = scored.entry(edge.descriptor.clone()).or_insert_with(|| {
                    order.push(edge.descriptor.clone());
                    0.0
                });
                *weight += edge.pondered_weight * score;
            }
            max_score = max_score.max(score);
        }
        if max_score <= 0.0 {
            return Vec::new();
        }

        let mut descriptors: Vec<(String, f64)> = order
            .into_iter()
            .map(|name| {
                let weight = scored.get(&name).copied().unwrap_or_default() / max_score * 100.0;
                (name, weight)
            })
            .filter(|(_, weight)| *weight > min_score)
            .collect();
        descriptors.sort_by(|a, b| b.1.total_cmp(&a.1));
        tracing::debug!(count = descriptors.len(), max_score, "Descritores calculados");
        descriptors
    }
}
