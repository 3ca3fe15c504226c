//! # PosTagger
//!
//! Etiqueta padrão seguida das passadas de regras léxicas e contextuais.
//!
//! | Palavra | Etiqueta padrão |
//! |---------|-----------------|
//! | conhecida do léxico | primeira entrada (a mais frequente) |
//! | capitalizada (`Paris`, `iPhone`, `al-Qaida`) | `SBP:sg` |
//! | qualquer outra | `SBC:sg` |

use std::sync::Arc;

use crate::core::textutils::modern_istitle;
use crate::core::{LexiconLookup, Sample};
use crate::rules::Rule;

/// Etiqueta de nome próprio atribuída a palavras capitalizadas desconhecidas.
pub const PROPER_NOUN_TAG: &str = "SBP:sg";
/// Etiqueta atribuída a qualquer outra palavra desconhecida.
pub const COMMON_NOUN_TAG: &str = "SBC:sg";

/// Quais passadas de regras executar depois da etiqueta padrão.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaggingStages {
    pub lexical: bool,
    pub contextual: bool,
}

impl TaggingStages {
    pub const FULL: TaggingStages = TaggingStages { lexical: true, contextual: true };
    /// Só a etiqueta padrão (pré-treinamento das regras léxicas).
    pub const DEFAULT_ONLY: TaggingStages = TaggingStages { lexical: false, contextual: false };
    /// Sem a passada contextual (pré-treinamento das regras contextuais).
    pub const NO_CONTEXTUAL: TaggingStages = TaggingStages { lexical: true, contextual: false };
}

/// Etiquetador: léxico compartilhado mais duas listas ordenadas de regras.
#[derive(Clone)]
pub struct PosTagger {
    lexicon: Arc<dyn LexiconLookup>,
    lexical_rules: Vec<Rule>,
    contextual_rules: Vec<Rule>,
}

impl PosTagger {
    pub fn new(lexicon: Arc<dyn LexiconLookup>) -> Self {
        Self {
            lexicon,
            lexical_rules: Vec::new(),
            contextual_rules: Vec::new(),
        }
    }

    pub fn with_rules(mut self, lexical: Vec<Rule>, contextual: Vec<Rule>) -> Self {
        self.lexical_rules = lexical;
        self.contextual_rules = contextual;
        self
    }

    pub fn lexicon(&self) -> &dyn LexiconLookup {
        self.lexicon.as_ref()
    }

    pub fn shared_lexicon(&self) -> Arc<dyn LexiconLookup> {
        Arc::clone(&self.lexicon)
    }

    pub fn lexical_rules(&self) -> &[Rule] {
        &self.lexical_rules
    }

    pub fn contextual_rules(&self) -> &[Rule] {
        &self.contextual_rules
    }

    pub fn default_tag(&self, word: &str) -> String {
        if let Some(entry) = self.lexicon.default_entry(word) {
            entry.tag.clone()
        } else if modern_istitle(word) {
            PROPER_NOUN_TAG.to_string()
        } else {
            COMMON_NOUN_TAG.to_string()
        }
    }

    /// Etiqueta todas as frases, executando as passadas pedidas.
    pub fn tag_all(&self, samples: &mut [Sample], stages: TaggingStages) {
        for sample in samples.iter_mut() {
            for position in 0..sample.len() {
                let tag = self.default_tag(sample[position].original());
                sample.set_tag(position, &tag);
            }
        }
        if stages.lexical {
            self.apply_rules(samples, &self.lexical_rules);
        }
        if stages.contextual {
            self.apply_rules(samples, &self.contextual_rules);
        }
    }

    /// Todas as passadas.
    pub fn tag(&self, samples: &mut [Sample]) {
        self.tag_all(samples, TaggingStages::FULL);
    }

    fn apply_rules(&self, samples: &mut [Sample], rules: &[Rule]) {
        let mut changed = 0;
        for rule in rules {
            changed += rule.apply(samples, self.lexicon.as_ref());
        }
        tracing::debug!(rules = rules.len(), changed, "Passada de regras aplicada");
    }
}

impl std::fmt::Debug for PosTagger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PosTagger")
            .field("lexical_rules", &self.lexical_rules.len())
            .field("contextual_rules", &self.contextual_rules.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Lexicon, Text};

    fn tagger() -> PosTagger {
        let lexicon = Lexicon::parse(
            "la\tDTN:sg/le PRV:sg/le\nferme\tSBC:sg/ferme VCJ:sg/fermer\nIl\tPRV:sg/il\n.\tPUNCT/.",
        )
        .unwrap();
        PosTagger::new(Arc::new(lexicon))
    }

    fn tags(samples: &[Sample]) -> Vec<String> {
        samples
            .iter()
            .flat_map(|s| s.iter().map(|t| t.tag().to_string()))
            .collect()
    }

    // ─── etiqueta padrão ───

    #[test]
    fn default_tag_prefers_lexicon_then_case() {
        let tagger = tagger();
        assert_eq!(tagger.default_tag("ferme"), "SBC:sg");
        assert_eq!(tagger.default_tag("Paris"), "SBP:sg");
        assert_eq!(tagger.default_tag("iPhone"), "SBP:sg");
        assert_eq!(tagger.default_tag("truc"), "SBC:sg");
    }

    // ─── passadas ───

    #[test]
    fn stages_run_in_order() {
        let tagger = tagger().with_rules(
            vec!["ment hassuf 4 ADV".parse().unwrap()],
            vec!["SBC:sg VCJ:sg PREVTAG PRV:sg".parse().unwrap()],
        );
        let mut samples = Text::from_words(["Il", "ferme", "la", "porte", "."]).into_samples();

        tagger.tag_all(&mut samples, TaggingStages::DEFAULT_ONLY);
        assert_eq!(tags(&samples), ["PRV:sg", "SBC:sg", "DTN:sg", "SBC:sg", "PUNCT"]);

        tagger.tag(&mut samples);
        assert_eq!(tags(&samples), ["PRV:sg", "VCJ:sg", "DTN:sg", "SBC:sg", "PUNCT"]);
    }

    /// Etiquetar de novo dá o mesmo resultado
    #[test]
    fn tagging_is_idempotent() {
        let tagger = tagger().with_rules(
            Vec::new(),
            vec!["SBC:sg VCJ:sg PREVTAG PRV:sg".parse().unwrap()],
        );
        let mut samples = Text::from_words(["Il", "ferme", "."]).into_samples();
        tagger.tag(&mut samples);
        let first = tags(&samples);
        tagger.tag(&mut samples);
        assert_eq!(tags(&samples), first);
    }
}
