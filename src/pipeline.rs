//! # Engine — Contexto de Execução do Anotador
//!
//! O [`Engine`] é dono de tudo o que o anotador carrega uma única vez:
//! léxico, regras das três famílias, etiquetador e lematizador. Não há
//! estado global; dois engines com configurações diferentes convivem no
//! mesmo processo.
//!
//! ## Fluxo de `analyze`
//!
//! ```text
//! texto bruto
//!   ├── normalize_text + tokenize_text
//!   ├── PosTagger      (padrão → regras léxicas → regras contextuais)
//!   ├── Lemmatizer     (regras → léxico)
//!   ├── StemmedText    (stems)
//!   └── SemanticalTagger (n-grams, keystems, key-entities)
//! ```
//!
//! `descriptors` acrescenta a deduplicação e a consulta ao tesauro.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::core::{Lexicon, Text};
use crate::errors;
use crate::rules::{load_rules, Rule, RuleFamily};
use crate::tagger::{Lemmatizer, PosTagger};
use crate::textmining::{SemanticalTagger, StemmedText};
use crate::thesaurus::Thesaurus;
use crate::training::RuleTrainer;

pub struct Engine {
    config: Config,
    lexicon: Arc<Lexicon>,
    tagger: PosTagger,
    lemmatizer: Lemmatizer,
}

impl Engine {
    /// Carrega léxico e regras dos caminhos da configuração.
    ///
    /// O léxico é obrigatório. Um arquivo de regras ausente vale como lista
    /// vazia (ainda não treinado).
    pub fn load(config: Config) -> Result<Self> {
        let lexicon = Lexicon::load(&config.lexicon_path)
            .with_context(|| format!("Falha ao carregar léxico {}", config.lexicon_path.display()))?;
        let lexical = load_optional_rules(RuleFamily::Lexical, &config.lexical_rules_path)?;
        let contextual = load_optional_rules(RuleFamily::Contextual, &config.contextual_rules_path)?;
        let lemmatizer = load_optional_rules(RuleFamily::Lemmatizer, &config.lemmatizer_rules_path)?;
        tracing::info!(
            words = lexicon.len(),
            lexical = lexical.len(),
            contextual = contextual.len(),
            lemmatizer = lemmatizer.len(),
            "Engine carregado"
        );
        Ok(Self::from_parts(config, lexicon, lexical, contextual, lemmatizer))
    }

    /// Monta o engine a partir de partes já em memória.
    pub fn from_parts(
        config: Config,
        lexicon: Lexicon,
        lexical_rules: Vec<Rule>,
        contextual_rules: Vec<Rule>,
        lemmatizer_rules: Vec<Rule>,
    ) -> Self {
        let lexicon = Arc::new(lexicon);
        let tagger = PosTagger::new(lexicon.clone()).with_rules(lexical_rules, contextual_rules);
        let lemmatizer = Lemmatizer::new(lexicon.clone(), lemmatizer_rules);
        Self {
            config,
            lexicon,
            tagger,
            lemmatizer,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn tagger(&self) -> &PosTagger {
        &self.tagger
    }

    pub fn lemmatizer(&self) -> &Lemmatizer {
        &self.lemmatizer
    }

    /// Etiqueta e lematiza um texto bruto.
    pub fn tag(&self, raw: &str) -> Text {
        let mut text = Text::from_raw(raw);
        self.tagger.tag(text.samples_mut());
        self.lemmatizer.lemmatize(text.samples_mut());
        text
    }

    /// Extrai as key-entities de um texto bruto.
    pub fn analyze(&self, raw: &str) -> errors::Result<SemanticalTagger> {
        let text = StemmedText::new(raw, &self.tagger, &self.lemmatizer)?;
        let semantical = SemanticalTagger::new(text, self.config.ngrams);
        tracing::debug!(keyentities = semantical.keyentities().len(), "Texto analisado");
        Ok(semantical)
    }

    /// Descritores do texto, do mais forte para o mais fraco.
    pub fn descriptors(&self, raw: &str, thesaurus: &dyn Thesaurus) -> errors::Result<Vec<(String, f64)>> {
        let mut semantical = self.analyze(raw)?;
        semantical.deduplicate_keyentities();
        Ok(semantical.descriptors(
            thesaurus,
            self.config.descriptors_min_score,
            self.config.min_edge_weight,
        ))
    }

    /// Prepara um treinador sobre um corpus anotado.
    ///
    /// O treinador contextual parte das regras léxicas deste engine.
    pub fn trainer(&self, family: RuleFamily, corpus: Text) -> RuleTrainer {
        let tagger = match family {
            RuleFamily::Contextual => {
                PosTagger::new(self.lexicon.clone()).with_rules(self.tagger.lexical_rules().to_vec(), Vec::new())
            }
            _ => PosTagger::new(self.lexicon.clone()),
        };
        RuleTrainer::new(family, tagger, corpus, &self.config)
    }
}

fn load_optional_rules(family: RuleFamily, path: &Path) -> Result<Vec<Rule>> {
    if !path.exists() {
        tracing::warn!(%family, path = %path.display(), "Arquivo de regras ausente, nenhuma regra");
        return Ok(Vec::new());
    }
    load_rules(family, path).with_context(|| format!("Falha ao carregar regras {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::rules::save_rules;
    use crate::textmining::fixtures::{LEXICON, SCENARIO};
    use crate::thesaurus::MemoryThesaurus;

    fn engine() -> Engine {
        Engine::from_parts(
            Config::default(),
            Lexicon::parse(LEXICON).unwrap(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
        )
    }

    #[test]
    fn analyze_extracts_keyentities() {
        let semantical = engine().analyze(SCENARIO).unwrap();
        let labels: Vec<&str> = semantical.keyentities().iter().map(|k| k.label()).collect();
        assert_eq!(labels, ["mot dingue", "phrase", "mot", "dingue"]);
    }

    #[test]
    fn analyze_rejects_empty_text() {
        assert!(matches!(engine().analyze("  "), Err(Error::EmptyText)));
    }

    #[test]
    fn descriptors_go_through_the_thesaurus() {
        let mut thesaurus = MemoryThesaurus::new();
        thesaurus.connect("mot dingue", "Langue", 3.0);
        thesaurus.connect("phrase", "Grammaire", 3.0);
        let descriptors = engine().descriptors(SCENARIO, &thesaurus).unwrap();
        let names: Vec<&str> = descriptors.iter().map(|(d, _)| d.as_str()).collect();
        assert_eq!(names, ["Langue", "Grammaire"]);
        assert!((descriptors[0].1 - 100.0).abs() < 1e-9);
    }

    #[test]
    fn tag_uses_the_lexicon_lemmes() {
        let text = engine().tag("Une phrase avec le mots.");
        let lemmes: Vec<&str> = text.tokens().map(|t| t.lemme()).collect();
        assert_eq!(lemmes, ["un", "phrase", "avec", "le", "mot", "."]);
    }

    // ─── carregamento ───

    #[test]
    fn load_reads_lexicon_and_rules() {
        let dir = tempfile::tempdir().unwrap();
        let lexicon_path = dir.path().join("lexicon.lxc");
        std::fs::write(&lexicon_path, LEXICON).unwrap();
        let contextual_path = dir.path().join("contextual.rls");
        let rule: Rule = "SBC:sg ADJ:sg PREVTAG SBC:sg".parse().unwrap();
        save_rules(RuleFamily::Contextual, &[(rule, 1.0)], &contextual_path).unwrap();

        let config = Config {
            lexicon_path,
            contextual_rules_path: contextual_path,
            lexical_rules_path: dir.path().join("missing.rls"),
            lemmatizer_rules_path: dir.path().join("missing.rls"),
            ..Config::default()
        };
        let engine = Engine::load(config).unwrap();
        assert_eq!(engine.tagger().contextual_rules().len(), 1);
        assert!(engine.tagger().lexical_rules().is_empty());
        assert_eq!(engine.lexicon().len(), 11);
    }

    #[test]
    fn load_fails_without_lexicon() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            lexicon_path: dir.path().join("nope.lxc"),
            ..Config::default()
        };
        let err = Engine::load(config).err().unwrap();
        assert!(err.to_string().contains("léxico"));
    }
}
