//! # SemanticalTrainer — Aprendendo as Sinapses do Tesauro
//!
//! Para cada conteúdo com descritores atribuídos por humanos:
//!
//! ```text
//! ContentSource::fetch(id)
//!   ├── sem texto ou sem descritores → ignorado
//!   ├── Engine::analyze + deduplicate_keyentities   (em paralelo, rayon)
//!   └── write lock no tesauro
//!       ├── descritor.count += 1
//!       ├── trigger.count += 1           (um por key-entity distinta)
//!       └── connect(trigger, descritor, 1)  para todo par
//! ```
//!
//! A análise, a parte cara, roda sem lock; só a atualização do tesauro é
//! serializada pelo `parking_lot::RwLock`.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use parking_lot::RwLock;
use rayon::prelude::*;
use serde::Serialize;

use crate::errors::Error;
use crate::pipeline::Engine;
use crate::thesaurus::MemoryThesaurus;

/// Conteúdo de treinamento: texto e descritores atribuídos por humanos.
#[derive(Clone, Debug, Default)]
pub struct ContentItem {
    pub text: String,
    pub descriptors: Vec<String>,
}

/// Fonte dos conteúdos de treinamento.
pub trait ContentSource: Send + Sync {
    fn fetch(&self, id: &str) -> Option<ContentItem>;
}

impl ContentSource for HashMap<String, ContentItem> {
    fn fetch(&self, id: &str) -> Option<ContentItem> {
        self.get(id).cloned()
    }
}

/// Resumo de uma sessão de treinamento semântico.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SemanticalStats {
    pub processed: usize,
    pub skipped: usize,
    /// Ligações trigger → descritor reforçadas.
    pub connections: usize,
}

pub struct SemanticalTrainer {
    engine: Arc<Engine>,
    thesaurus: Arc<RwLock<MemoryThesaurus>>,
}

/// Resultado da análise de um conteúdo, antes de tocar o tesauro.
struct Learned {
    triggers: BTreeSet<String>,
    descriptors: BTreeSet<String>,
}

impl SemanticalTrainer {
    pub fn new(engine: Arc<Engine>, thesaurus: Arc<RwLock<MemoryThesaurus>>) -> Self {
        Self { engine, thesaurus }
    }

    pub fn thesaurus(&self) -> &Arc<RwLock<MemoryThesaurus>> {
        &self.thesaurus
    }

    /// Processa os conteúdos `ids` em paralelo.
    pub fn train(&self, source: &dyn ContentSource, ids: &[String]) -> SemanticalStats {
        tracing::info!(items = ids.len(), "Início do treinamento semântico");
        let stats = ids
            .par_iter()
            .map(|id| match source.fetch(id) {
                Some(item) => self.train_item(id, &item),
                None => {
                    tracing::warn!(%id, "Conteúdo não encontrado");
                    SemanticalStats {
                        skipped: 1,
                        ..SemanticalStats::default()
                    }
                }
            })
            .reduce(SemanticalStats::default, |a, b| SemanticalStats {
                processed: a.processed + b.processed,
                skipped: a.skipped + b.skipped,
                connections: a.connections + b.connections,
            });
        tracing::info!(
            processed = stats.processed,
            skipped = stats.skipped,
            connections = stats.connections,
            "Fim do treinamento semântico"
        );
        stats
    }

    /// Processa um conteúdo.
    pub fn train_item(&self, id: &str, item: &ContentItem) -> SemanticalStats {
        let skipped = SemanticalStats {
            skipped: 1,
            ..SemanticalStats::default()
        };
        let Some(learned) = self.learn(id, item) else {
            return skipped;
        };

        let mut thesaurus = self.thesaurus.write();
        for descriptor in &learned.descriptors {
            thesaurus.bump_descriptor(descriptor);
        }
        for trigger in &learned.triggers {
            thesaurus.bump_trigger(trigger);
        }
        for descriptor in &learned.descriptors {
            for trigger in &learned.triggers {
                thesaurus.connect(trigger, descriptor, 1.0);
            }
        }
        let connections = learned.descriptors.len() * learned.triggers.len();
        tracing::debug!(%id, triggers = learned.triggers.len(), descriptors = learned.descriptors.len(), "Conteúdo aprendido");
        SemanticalStats {
            processed: 1,
            skipped: 0,
            connections,
        }
    }

    fn learn(&self, id: &str, item: &ContentItem) -> Option<Learned> {
        let descriptors: BTreeSet<String> = item
            .descriptors
            .iter()
            .map(|d| d.trim())
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .collect();
        if descriptors.is_empty() || item.text.trim().is_empty() {
            tracing::info!(%id, "Conteúdo sem dados, ignorado");
            return None;
        }
        let mut semantical = match self.engine.analyze(&item.text) {
            Ok(semantical) => semantical,
            Err(Error::EmptyText) => {
                tracing::info!(%id, "Texto vazio após normalização, ignorado");
                return None;
            }
            Err(e) => {
                tracing::warn!(%id, error = %e, "Falha ao analisar conteúdo");
                return None;
            }
        };
        semantical.deduplicate_keyentities();
        let triggers = semantical
            .keyentities()
            .iter()
            .map(|ke| ke.label().to_string())
            .collect();
        Some(Learned {
            triggers,
            descriptors,
        })
    }

    /// Remove as ligações com peso ≤ 0.
    pub fn clean_connections(&self) -> usize {
        self.thesaurus.write().clean_connections()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::Lexicon;
    use crate::textmining::fixtures::{LEXICON, SCENARIO};
    use crate::thesaurus::Thesaurus;

    fn trainer() -> SemanticalTrainer {
        let engine = Engine::from_parts(
            Config::default(),
            Lexicon::parse(LEXICON).unwrap(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
        );
        SemanticalTrainer::new(Arc::new(engine), Arc::new(RwLock::new(MemoryThesaurus::new())))
    }

    fn source() -> HashMap<String, ContentItem> {
        let mut items = HashMap::new();
        for id in ["1", "2", "3"] {
            items.insert(
                id.to_string(),
                ContentItem {
                    text: SCENARIO.to_string(),
                    descriptors: vec!["Langue".into(), " Humour ".into()],
                },
            );
        }
        items.insert(
            "vide".to_string(),
            ContentItem {
                text: "   ".into(),
                descriptors: vec!["Langue".into()],
            },
        );
        items.insert(
            "sans".to_string(),
            ContentItem {
                text: SCENARIO.to_string(),
                descriptors: Vec::new(),
            },
        );
        items
    }

    /// Todo trigger do texto se liga a todo descritor humano com peso 1
    #[test]
    fn every_trigger_connects_to_every_descriptor() {
        let trainer = trainer();
        let ids: Vec<String> = ["1", "2", "3", "vide", "sans", "ausente"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let stats = trainer.train(&source(), &ids);
        assert_eq!(stats.processed, 3);
        assert_eq!(stats.skipped, 3);
        // 2 triggers (mot dingue, phrase) x 2 descritores x 3 conteúdos
        assert_eq!(stats.connections, 12);

        let thesaurus = trainer.thesaurus().read();
        assert_eq!(thesaurus.weight("mot dingue", "Langue"), Some(3.0));
        assert_eq!(thesaurus.weight("phrase", "Humour"), Some(3.0));
        assert_eq!(thesaurus.triggers["phrase"].count, 3);
        assert_eq!(thesaurus.descriptors["Humour"].count, 3);
        assert_eq!(thesaurus.trigger("mot dingue").unwrap().len(), 2);
    }

    #[test]
    fn learned_thesaurus_scores_descriptors() {
        let trainer = trainer();
        let ids = vec!["1".to_string(), "2".to_string(), "3".to_string()];
        trainer.train(&source(), &ids);
        let thesaurus = trainer.thesaurus().read();
        let descriptors = trainer
            .engine
            .descriptors(SCENARIO, &*thesaurus)
            .unwrap();
        let names: BTreeSet<&str> = descriptors.iter().map(|(d, _)| d.as_str()).collect();
        assert_eq!(names, BTreeSet::from(["Humour", "Langue"]));
    }
}
