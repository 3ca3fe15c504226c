//! # Corpus Particionado — Map-Reduce por Iteração
//!
//! O corpus de treinamento é dividido em shards contíguos de frases. Cada
//! iteração do treinamento cruza a fronteira de concorrência duas vezes:
//!
//! ```text
//! coordenador                         shards (rayon)
//!     │── candidatas ──────────────▶  par_iter: (good, bad) locais por regra
//!     │◀── soma por índice ─────────  reduce
//!     │   select_one (determinística)
//!     │── regra vencedora ─────────▶  par_iter_mut: apply local
//! ```
//!
//! As contagens são somadas por índice de candidata e os erros são listados
//! na ordem global das frases, portanto a regra escolhida não depende do
//! número de shards.

use rayon::prelude::*;

use crate::core::{LexiconLookup, Sample, TokenRef};
use crate::rules::Rule;

/// Frases de treinamento repartidas em shards contíguos.
#[derive(Clone, Debug)]
pub struct ShardedCorpus {
    shards: Vec<Vec<Sample>>,
    /// Índice global da primeira frase de cada shard.
    offsets: Vec<usize>,
}

impl ShardedCorpus {
    /// Reparte as frases em até `shard_count` shards (pelo menos um).
    pub fn new(samples: Vec<Sample>, shard_count: usize) -> Self {
        let shard_count = shard_count.max(1);
        let per_shard = samples.len().div_ceil(shard_count).max(1);
        let mut shards: Vec<Vec<Sample>> = Vec::with_capacity(shard_count);
        let mut current = Vec::with_capacity(per_shard);
        for sample in samples {
            current.push(sample);
            if current.len() == per_shard {
                shards.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() || shards.is_empty() {
            shards.push(current);
        }
        let offsets = shards
            .iter()
            .scan(0, |start, shard| {
                let offset = *start;
                *start += shard.len();
                Some(offset)
            })
            .collect();
        Self { shards, offsets }
    }

    /// (shard, posição no shard) de um índice global.
    fn locate(&self, index: usize) -> (usize, usize) {
        let shard = self.offsets.partition_point(|&start| start <= index).saturating_sub(1);
        (shard, index - self.offsets.get(shard).copied().unwrap_or(0))
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    pub fn token_count(&self) -> usize {
        self.samples().map(Sample::len).sum()
    }

    /// Frases na ordem global.
    pub fn samples(&self) -> impl Iterator<Item = &Sample> {
        self.shards.iter().flatten()
    }

    pub fn samples_mut(&mut self) -> impl Iterator<Item = &mut Sample> {
        self.shards.iter_mut().flatten()
    }

    /// Frase pelo índice global.
    pub fn sample(&self, index: usize) -> Option<&Sample> {
        let (shard, local) = self.locate(index);
        self.shards.get(shard)?.get(local)
    }

    pub fn sample_mut(&mut self, index: usize) -> Option<&mut Sample> {
        let (shard, local) = self.locate(index);
        self.shards.get_mut(shard)?.get_mut(local)
    }

    pub fn token(&self, token_ref: TokenRef) -> Option<&crate::core::Token> {
        self.sample(token_ref.sample)?.get(token_ref.position)
    }

    pub fn into_samples(self) -> Vec<Sample> {
        self.shards.into_iter().flatten().collect()
    }

    /// (good, bad) de cada candidata sobre o corpus inteiro.
    ///
    /// Cada shard conta localmente; os vetores são somados por índice.
    pub fn count(&self, candidates: &[Rule], lexicon: &dyn LexiconLookup) -> Vec<(usize, usize)> {
        let zero = || vec![(0usize, 0usize); candidates.len()];
        self.shards
            .par_iter()
            .map(|shard| {
                candidates
                    .iter()
                    .map(|rule| rule.count(shard, lexicon))
                    .collect::<Vec<_>>()
            })
            .reduce(zero, |mut acc, local| {
                for (total, (good, bad)) in acc.iter_mut().zip(local) {
                    total.0 += good;
                    total.1 += bad;
                }
                acc
            })
    }

    /// Aplica a regra em todos os shards; devolve o total de tokens alterados.
    pub fn apply(&mut self, rule: &Rule, lexicon: &dyn LexiconLookup) -> usize {
        self.shards
            .par_iter_mut()
            .map(|shard| rule.apply(shard, lexicon))
            .sum()
    }
}
