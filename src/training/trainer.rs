//! # RuleTrainer — Aprendizado Baseado em Transformações
//!
//! Aprende uma lista ordenada de regras que reduz os erros de um
//! etiquetamento (ou lematização) inicial sobre um corpus verificado.
//!
//! ## Laço Principal
//!
//! ```text
//! pré-etiquetamento
//!   └── loop
//!       ├── sinal de parada? → Stopped
//!       ├── erros (frases sujas, posições não processadas)
//!       │   └── nenhum → Converged (0 erros) ou Exhausted
//!       └── para cada erro, em ordem:
//!           ├── candidatas de todos os templates, sem as já aplicadas
//!           ├── map-reduce (good, bad) sobre o corpus inteiro
//!           ├── select_one
//!           │   ├── Some(regra) → aplica em todos os shards, registra, volta ao loop
//!           │   └── None → marca a posição como processada
//! ```
//!
//! ## Pré-etiquetamento por Família
//!
//! | Família | Estado inicial | Erros considerados |
//! |---------|----------------|--------------------|
//! | `Lexical` | só a etiqueta padrão | palavras fora do léxico |
//! | `Contextual` | etiqueta padrão + regras léxicas | todos |
//! | `Lemmatizer` | etiquetas verificadas, lema = palavra | todos |
//!
//! ## Terminação
//!
//! As regras são pontuadas sobre os mesmos tokens que contam como erro
//! ([`RuleFamily::trains_on`]). Uma regra selecionada tem `good > bad` (o
//! limiar `minval` é ≥ 1), então cada iteração reduz estritamente o total
//! de erros; uma iteração sem regra marca posições como processadas até a
//! próxima mudança da frase. O número de erros restantes nunca cresce.

use std::collections::HashSet;

use chrono::Utc;
use tokio::sync::broadcast;

use super::events::{event_channel, StopSignal, TrainingEvent};
use super::report::{IterationStats, ScoredRule, TrainingReport, TrainingState};
use super::shard::ShardedCorpus;
use crate::config::Config;
use crate::core::{Label, Sample, Text, TokenRef};
use crate::rules::{export_rules, select_one, Rule, RuleCandidate, RuleFamily};
use crate::tagger::{PosTagger, TaggingStages};

/// Treinador de uma família de regras.
pub struct RuleTrainer {
    family: RuleFamily,
    tagger: PosTagger,
    corpus: ShardedCorpus,
    minval: f64,
    coeff: f64,
    rules: Vec<(Rule, f64)>,
    events: broadcast::Sender<TrainingEvent>,
    stop: StopSignal,
}

impl RuleTrainer {
    /// Prepara o corpus (pré-etiquetamento da família) e reparte em shards.
    ///
    /// Para `Contextual`, o `tagger` deve carregar as regras léxicas já
    /// aprendidas.
    pub fn new(family: RuleFamily, tagger: PosTagger, corpus: Text, config: &Config) -> Self {
        let mut samples = corpus.into_samples();
        match family {
            RuleFamily::Lexical => tagger.tag_all(&mut samples, TaggingStages::DEFAULT_ONLY),
            RuleFamily::Contextual => tagger.tag_all(&mut samples, TaggingStages::NO_CONTEXTUAL),
            RuleFamily::Lemmatizer => use_verified_tags(&mut samples),
        }
        for sample in &mut samples {
            sample.reset_trainer_status();
        }
        Self {
            family,
            tagger,
            corpus: ShardedCorpus::new(samples, config.shards),
            minval: config.minval_for(family),
            coeff: config.selection_coeff,
            rules: Vec::new(),
            events: event_channel(),
            stop: StopSignal::new(),
        }
    }

    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TrainingEvent> {
        self.events.subscribe()
    }

    pub fn family(&self) -> RuleFamily {
        self.family
    }

    pub fn corpus(&self) -> &ShardedCorpus {
        &self.corpus
    }

    /// Regras aprendidas até agora, na ordem de aplicação.
    pub fn rules(&self) -> &[(Rule, f64)] {
        &self.rules
    }

    /// Regras no formato de arquivo da família.
    pub fn export(&self) -> String {
        export_rules(self.family, &self.rules)
    }

    fn label(&self) -> Label {
        self.family.label()
    }

    /// Erro que esta família deve corrigir?
    fn counts_as_error(&self, sample: &Sample, position: usize) -> bool {
        let token = &sample[position];
        token.is_error(self.label()) && self.family.trains_on(token, self.tagger.lexicon())
    }

    /// Total de erros, ignorando os caches de treinamento.
    pub fn remaining_errors(&self) -> usize {
        self.corpus
            .samples()
            .map(|s| (0..s.len()).filter(|&p| self.counts_as_error(s, p)).count())
            .sum()
    }

    /// Erros ainda não processados, na ordem global das frases.
    fn collect_errors(&mut self) -> Vec<TokenRef> {
        let label = self.label();
        let family = self.family;
        let lexicon = self.tagger.lexicon();
        let mut errors = Vec::new();
        for (idx, sample) in self.corpus.samples_mut().enumerate() {
            for position in sample.get_errors(label) {
                if !family.trains_on(&sample[position], lexicon) {
                    continue;
                }
                errors.push(TokenRef { sample: idx, position });
            }
        }
        errors
    }

    /// Candidatas que corrigiriam o erro, sem duplicatas nem regras já aplicadas.
    fn candidates_for(&self, error: TokenRef, applied: &HashSet<Rule>) -> Vec<Rule> {
        let Some(sample) = self.corpus.sample(error.sample) else {
            return Vec::new();
        };
        let lexicon = self.tagger.lexicon();
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        for template in self.family.templates() {
            for rule in template.make_rules(sample, error.position, lexicon) {
                if !applied.contains(&rule) && seen.insert(rule.clone()) {
                    candidates.push(rule);
                }
            }
        }
        candidates
    }

    fn log_error(&self, error: TokenRef) {
        if let Some(token) = self.corpus.token(error) {
            tracing::debug!(
                token = %token.original(),
                current = %token.label(self.label()),
                verified = token.verified(self.label()).unwrap_or_default(),
                "Erro"
            );
        }
    }

    /// Executa o laço até convergir, esgotar as candidatas ou receber o sinal de parada.
    pub fn train(&mut self) -> TrainingReport {
        let started_at = Utc::now();
        let total_tokens = self.corpus.token_count();
        let initial_errors = self.remaining_errors();
        tracing::info!(
            family = %self.family,
            errors = initial_errors,
            tokens = total_tokens,
            shards = self.corpus.shard_count(),
            "Início da sessão de treinamento"
        );
        let _ = self.events.send(TrainingEvent::Started {
            family: self.family,
            errors: initial_errors,
            tokens: total_tokens,
            shards: self.corpus.shard_count(),
        });

        let mut applied: HashSet<Rule> = self.rules.iter().map(|(r, _)| r.clone()).collect();
        let mut iterations = Vec::new();

        let state = loop {
            if self.stop.is_stopped() {
                break TrainingState::Stopped;
            }
            let errors = self.collect_errors();
            if errors.is_empty() {
                break if self.remaining_errors() == 0 {
                    TrainingState::Converged
                } else {
                    TrainingState::Exhausted
                };
            }
            tracing::info!(errors = errors.len(), "Erros a processar");

            let mut selected = None;
            for error in errors {
                self.log_error(error);
                let candidates = self.candidates_for(error, &applied);
                if let Some(choice) = self.select(candidates, total_tokens) {
                    selected = Some(choice);
                    break;
                }
                if let Some(sample) = self.corpus.sample_mut(error.sample) {
                    sample.set_trained_position(error.position);
                }
                tracing::debug!(sample = error.sample, position = error.position, "Sem regra: posição processada");
            }

            let Some((rule, score, good, bad)) = selected else {
                continue;
            };
            let changed = self.corpus.apply(&rule, self.tagger.lexicon());
            let errors_after = self.remaining_errors();
            tracing::info!(%rule, score, good, bad, changed, errors_after, "Regra aplicada");
            let _ = self.events.send(TrainingEvent::RuleApplied {
                family: self.family,
                iteration: iterations.len() + 1,
                rule: rule.to_string(),
                score,
                good,
                bad,
                changed,
                errors_after,
            });
            iterations.push(IterationStats {
                rule: rule.to_string(),
                good,
                bad,
                changed,
                errors_after,
            });
            applied.insert(rule.clone());
            self.rules.push((rule, score));
        };

        let remaining_errors = self.remaining_errors();
        let event = if state == TrainingState::Stopped {
            TrainingEvent::Stopped {
                family: self.family,
                rules: self.rules.len(),
            }
        } else {
            TrainingEvent::Finished {
                family: self.family,
                state,
                rules: self.rules.len(),
                remaining_errors,
            }
        };
        let _ = self.events.send(event);
        tracing::info!(
            family = %self.family,
            ?state,
            rules = self.rules.len(),
            remaining_errors,
            "Fim da sessão de treinamento"
        );

        TrainingReport {
            family: self.family,
            started_at,
            finished_at: Utc::now(),
            total_tokens,
            initial_errors,
            rules: self
                .rules
                .iter()
                .map(|(rule, score)| ScoredRule {
                    rule: rule.to_string(),
                    score: *score,
                })
                .collect(),
            iterations,
            state,
            remaining_errors,
        }
    }

    /// Pontua as candidatas sobre o corpus inteiro e escolhe uma.
    fn select(&self, candidates: Vec<Rule>, corpus_size: usize) -> Option<(Rule, f64, usize, usize)> {
        if candidates.is_empty() {
            return None;
        }
        let counts = self.corpus.count(&candidates, self.tagger.lexicon());
        let scored: Vec<RuleCandidate> = candidates
            .into_iter()
            .zip(counts)
            .map(|(rule, (good, bad))| {
                tracing::debug!(%rule, good, bad, "Candidata");
                RuleCandidate { rule, good, bad }
            })
            .collect();
        let (rule, score) = select_one(&scored, corpus_size, self.minval, self.coeff)?;
        let (good, bad) = scored
            .iter()
            .find(|c| c.rule == rule)
            .map(|c| (c.good, c.bad))
            .unwrap_or_default();
        Some((rule, score, good, bad))
    }

    pub fn into_samples(self) -> Vec<Sample> {
        self.corpus.into_samples()
    }
}

/// Lematizador treina com as etiquetas certas; o lema parte da palavra.
fn use_verified_tags(samples: &mut [Sample]) {
    for sample in samples.iter_mut() {
        for position in 0..sample.len() {
            let token = &sample[position];
            if let Some(tag) = token.verified_tag().map(str::to_string) {
                let original = token.original().to_string();
                sample.set_tag(position, &tag);
                sample.set_lemme(position, &original);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::core::Lexicon;

    const CORPUS: &str = "Il/PRV:sg ferme/VCJ:sg/fermer la/DTN:sg/le porte/SBC:sg ./PUNCT \
        Elle/PRV:sg ferme/VCJ:sg/fermer la/DTN:sg/le fenêtre/SBC:sg ./PUNCT \
        On/PRV:sg ferme/VCJ:sg/fermer la/DTN:sg/le maison/SBC:sg ./PUNCT \
        Il/PRV:sg ferme/VCJ:sg/fermer la/DTN:sg/le grange/SBC:sg ./PUNCT \
        Elle/PRV:sg ferme/VCJ:sg/fermer la/DTN:sg/le cuisine/SBC:sg ./PUNCT \
        Il/PRV:sg voit/VCJ:sg/voir la/DTN:sg/le ferme/SBC:sg ./PUNCT \
        Elle/PRV:sg aime/VCJ:sg/aimer la/DTN:sg/le ferme/SBC:sg ./PUNCT \
        On/PRV:sg visite/VCJ:sg/visiter la/DTN:sg/le ferme/SBC:sg ./PUNCT \
        Nous/PRV:pl fermons/VCJ:pl/fermer les/DTN:pl/le portes/SBC:pl/porte ./PUNCT \
        Vous/PRV:pl fermez/VCJ:pl/fermer les/DTN:pl/le fenêtres/SBC:pl/fenêtre ./PUNCT";

    fn tagger() -> PosTagger {
        let corpus = Text::from_annotated(CORPUS).unwrap();
        let lexicon = Lexicon::build(&corpus);
        PosTagger::new(Arc::new(lexicon))
    }

    fn config(shards: usize) -> Config {
        Config {
            shards,
            ..Config::default()
        }
    }

    // ─── contextual ───

    /// O laço termina e os erros nunca aumentam
    #[test]
    fn contextual_training_reduces_errors_monotonically() {
        let corpus = Text::from_annotated(CORPUS).unwrap();
        let mut trainer = RuleTrainer::new(RuleFamily::Contextual, tagger(), corpus, &config(1));
        let report = trainer.train();

        assert!(report.initial_errors > 0);
        assert!(!report.rules.is_empty());
        let mut previous = report.initial_errors;
        for iteration in &report.iterations {
            assert!(iteration.errors_after < previous);
            assert!(iteration.good > iteration.bad);
            previous = iteration.errors_after;
        }
        assert_eq!(report.remaining_errors, previous);
        assert_ne!(report.state, TrainingState::Stopped);
        assert_eq!(report.rules.len(), trainer.rules().len());
    }

    /// A ordem das regras não depende do número de shards
    #[test]
    fn rule_order_is_independent_of_shards() {
        let run = |shards| {
            let corpus = Text::from_annotated(CORPUS).unwrap();
            let mut trainer = RuleTrainer::new(RuleFamily::Contextual, tagger(), corpus, &config(shards));
            trainer.train().rules
        };
        let single = run(1);
        assert_eq!(run(2), single);
        assert_eq!(run(4), single);
    }

    /// Nenhuma regra aparece duas vezes
    #[test]
    fn applied_rules_are_never_reselected() {
        let corpus = Text::from_annotated(CORPUS).unwrap();
        let mut trainer = RuleTrainer::new(RuleFamily::Contextual, tagger(), corpus, &config(1));
        let report = trainer.train();
        let unique: HashSet<&str> = report.rules.iter().map(|r| r.rule.as_str()).collect();
        assert_eq!(unique.len(), report.rules.len());
    }

    // ─── lematizador ───

    #[test]
    fn lemmatizer_training_learns_plural_rules() {
        let corpus = Text::from_annotated(CORPUS).unwrap();
        let mut trainer = RuleTrainer::new(RuleFamily::Lemmatizer, tagger(), corpus, &config(1));
        let report = trainer.train();
        assert!(report.rules.iter().any(|r| r.rule.starts_with("SBC:pl CHANGESUFFIX")));
        assert!(report.remaining_errors < report.initial_errors);
        let exported = trainer.export();
        assert!(exported.lines().all(|l| l.contains('\t')));
    }

    // ─── sinal de parada e eventos ───

    #[test]
    fn stop_signal_is_checked_before_each_iteration() {
        let corpus = Text::from_annotated(CORPUS).unwrap();
        let stop = StopSignal::new();
        let mut trainer = RuleTrainer::new(RuleFamily::Contextual, tagger(), corpus, &config(1))
            .with_stop_signal(stop.clone());
        let mut events = trainer.subscribe();
        stop.stop();
        let report = trainer.train();
        assert_eq!(report.state, TrainingState::Stopped);
        assert!(report.rules.is_empty());
        assert!(matches!(events.try_recv(), Ok(TrainingEvent::Started { .. })));
        assert!(matches!(events.try_recv(), Ok(TrainingEvent::Stopped { rules: 0, .. })));
    }

    #[test]
    fn every_applied_rule_is_published() {
        let corpus = Text::from_annotated(CORPUS).unwrap();
        let mut trainer = RuleTrainer::new(RuleFamily::Contextual, tagger(), corpus, &config(2));
        let mut events = trainer.subscribe();
        let report = trainer.train();
        let mut published = Vec::new();
        while let Ok(event) = events.try_recv() {
            if let TrainingEvent::RuleApplied { rule, .. } = event {
                published.push(rule);
            }
        }
        let learned: Vec<String> = report.rules.iter().map(|r| r.rule.clone()).collect();
        assert_eq!(published, learned);
    }

    // ─── léxico ───

    /// Palavras do léxico não contam como erros léxicos
    #[test]
    fn lexical_training_ignores_known_words() {
        let corpus = Text::from_annotated(CORPUS).unwrap();
        let trainer = RuleTrainer::new(RuleFamily::Lexical, tagger(), corpus, &config(1));
        // O léxico foi construído do próprio corpus: nenhuma palavra é desconhecida.
        assert_eq!(trainer.remaining_errors(), 0);

        let unknown = Text::from_annotated("Ils/PRV:pl ferment/VCJ:pl/fermer ./PUNCT").unwrap();
        let trainer = RuleTrainer::new(RuleFamily::Lexical, tagger(), unknown, &config(1));
        assert_eq!(trainer.remaining_errors(), 2);
    }

    fn lexical_trainer(lexicon: &str, corpus: &str) -> RuleTrainer {
        let lexicon = Lexicon::parse(lexicon).unwrap();
        let corpus = Text::from_annotated(corpus).unwrap();
        RuleTrainer::new(RuleFamily::Lexical, PosTagger::new(Arc::new(lexicon)), corpus, &config(1))
    }

    /// Palavras conhecidas corrigidas por acaso não justificam uma regra léxica
    #[test]
    fn lexical_rules_are_not_scored_on_known_words() {
        let mut trainer = lexical_trainer(
            "bras\tSBC:sg/bras SBC:pl/bras\n.\tPUNCT/.",
            "bras/SBC:pl ./PUNCT bras/SBC:pl ./PUNCT bras/SBC:pl ./PUNCT \
             bras/SBC:pl ./PUNCT bras/SBC:pl ./PUNCT foos/SBC:pl ./PUNCT \
             zzs/SBC:sg ./PUNCT yys/SBC:sg ./PUNCT",
        );
        let report = trainer.train();

        assert_eq!(report.initial_errors, 1);
        assert!(report.rules.iter().all(|r| r.rule != ". goodleft SBC:pl"));
        let mut previous = report.initial_errors;
        for iteration in &report.iterations {
            assert!(iteration.errors_after < previous, "{}", iteration.rule);
            previous = iteration.errors_after;
        }
        assert!(report.remaining_errors <= report.initial_errors);
        assert_eq!(report.state, TrainingState::Exhausted);
    }

    /// Palavras desconhecidas ao lado de palavras conhecidas que competem pela
    /// mesma regra: os erros só diminuem e as regras voltam do arquivo iguais
    #[test]
    fn lexical_training_learns_from_unknown_words_only() {
        let mut trainer = lexical_trainer(
            "les\tDTN:pl/le\nbras\tSBC:sg/bras SBC:pl/bras\ngros\tADJ:pl/gros\n.\tPUNCT/.",
            "les/DTN:pl chats/SBC:pl/chat ./PUNCT les/DTN:pl chiens/SBC:pl/chien ./PUNCT \
             les/DTN:pl bras/SBC:pl ./PUNCT les/DTN:pl loups/SBC:pl/loup ./PUNCT \
             les/DTN:pl gros/ADJ:pl ./PUNCT les/DTN:pl rats/SBC:pl/rat ./PUNCT \
             les/DTN:pl autres/ADJ:pl/autre ./PUNCT",
        );
        assert_eq!(trainer.remaining_errors(), 5);
        let report = trainer.train();

        assert!(!report.rules.is_empty());
        let mut previous = report.initial_errors;
        for iteration in &report.iterations {
            assert!(iteration.errors_after < previous, "{}", iteration.rule);
            assert!(iteration.good > iteration.bad);
            previous = iteration.errors_after;
        }
        assert_eq!(report.remaining_errors, previous);
        assert!(report.remaining_errors < report.initial_errors);

        let exported = trainer.export();
        let parsed = crate::rules::parse_rules(RuleFamily::Lexical, &exported).unwrap();
        let learned: Vec<Rule> = trainer.rules().iter().map(|(r, _)| r.clone()).collect();
        assert_eq!(parsed, learned);
        assert!(learned.iter().all(|r| r.family() == RuleFamily::Lexical));
    }
}
