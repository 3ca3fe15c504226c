//! # Lemmatizer
//!
//! Aplica as regras do lematizador na ordem de treinamento e, por fim,
//! consulta o léxico: se ele registra um lema para a palavra com a
//! etiqueta atual, esse lema vence.

use std::sync::Arc;

use crate::core::{LexiconLookup, Sample};
use crate::rules::Rule;

#[derive(Clone)]
pub struct Lemmatizer {
    lexicon: Arc<dyn LexiconLookup>,
    rules: Vec<Rule>,
}

impl Lemmatizer {
    pub fn new(lexicon: Arc<dyn LexiconLookup>, rules: Vec<Rule>) -> Self {
        Self { lexicon, rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Lematiza frases já etiquetadas.
    pub fn lemmatize(&self, samples: &mut [Sample]) {
        for rule in &self.rules {
            rule.apply(samples, self.lexicon.as_ref());
        }
        let mut overridden = 0;
        for sample in samples.iter_mut() {
            for position in 0..sample.len() {
                let token = &sample[position];
                let Some(known) = self.lexicon.lemme_for(token.original(), token.tag()) else {
                    continue;
                };
                if known != token.lemme() {
                    let known = known.to_string();
                    sample.set_lemme(position, &known);
                    overridden += 1;
                }
            }
        }
        tracing::debug!(rules = self.rules.len(), overridden, "Lematização concluída");
    }
}

impl std::fmt::Debug for Lemmatizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lemmatizer").field("rules", &self.rules.len()).finish()
    }
}
