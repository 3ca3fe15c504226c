//! # Configuração — Objeto de Contexto do Motor
//!
//! Em vez de caches globais (léxico carregado uma vez por processo, regras
//! em variáveis de classe), toda a configuração vive em um [`Config`]
//! explícito, passado ao [`Engine`](crate::pipeline::Engine) na construção.
//!
//! ## Fontes
//!
//! ```text
//! Config::from_env()
//!   ├── $SEMANTIC_TAGGER_CONFIG definido → Config::load(caminho)
//!   └── ausente                          → Config::default()
//! ```
//!
//! O JSON aceita campos parciais: tudo o que faltar assume o valor padrão
//! (`#[serde(default)]`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Variável de ambiente com o caminho do arquivo de configuração.
pub const CONFIG_ENV: &str = "SEMANTIC_TAGGER_CONFIG";

/// Limites da enumeração de n-grams.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NgramOptions {
    /// Comprimento mínimo (em tokens) de um n-gram.
    pub min_length: usize,
    /// Comprimento máximo (em tokens) de um n-gram.
    pub max_length: usize,
    /// Contagem mínima para um n-gram passar no filtro.
    pub min_count: usize,
}

impl Default for NgramOptions {
    fn default() -> Self {
        Self {
            min_length: 2,
            max_length: 15,
            min_count: 2,
        }
    }
}

/// Configuração completa do motor de anotação e do treinamento.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Léxico no formato `palavra\tTAG/lema TAG/lema ...`.
    pub lexicon_path: PathBuf,
    pub lexical_rules_path: PathBuf,
    pub contextual_rules_path: PathBuf,
    pub lemmatizer_rules_path: PathBuf,
    /// Tesauro serializado em JSON.
    pub thesaurus_path: PathBuf,

    /// Razão mínima good/bad para regras de etiquetagem (léxicas e contextuais).
    pub tagging_minval: f64,
    /// Razão mínima good/bad para regras de lematização.
    pub lemmatizer_minval: f64,
    /// Expoente do termo de cobertura no score de seleção.
    pub selection_coeff: f64,

    pub ngrams: NgramOptions,

    /// Descritores abaixo deste score (percentual) são descartados.
    pub descriptors_min_score: f64,
    /// Peso mínimo de uma aresta trigger→descritor para contar no score.
    pub min_edge_weight: f64,
    /// Quantas sinapses (as mais pesadas) são lidas por trigger.
    pub synapses_per_trigger: usize,

    /// Número de shards do corpus durante o treinamento.
    pub shards: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lexicon_path: PathBuf::from("corpus/lexicon.lxc"),
            lexical_rules_path: PathBuf::from("corpus/lexical_rules.rls"),
            contextual_rules_path: PathBuf::from("corpus/contextual_rules.rls"),
            lemmatizer_rules_path: PathBuf::from("corpus/lemmatizer_rules.rls"),
            thesaurus_path: PathBuf::from("data/thesaurus.json"),
            tagging_minval: 3.0,
            lemmatizer_minval: 2.0,
            selection_coeff: 0.1,
            ngrams: NgramOptions::default(),
            descriptors_min_score: 10.0,
            min_edge_weight: 2.0,
            synapses_per_trigger: 20,
            shards: 1,
        }
    }
}

impl Config {
    /// Lê a configuração de um arquivo JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Falha ao ler configuração {}", path.display()))?;
        let config: Config = serde_json::from_str(&json)
            .with_context(|| format!("Falha ao desserializar configuração {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Configuração carregada");
        Ok(config)
    }

    /// Lê o caminho de [`CONFIG_ENV`]; sem a variável, usa os padrões.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(PathBuf::from(path)),
            None => {
                tracing::info!("{} não definido, usando configuração padrão", CONFIG_ENV);
                Ok(Self::default())
            }
        }
    }

    /// Valor de `minval` adequado para a família de regras.
    pub fn minval_for(&self, family: crate::rules::RuleFamily) -> f64 {
        match family {
            crate::rules::RuleFamily::Lemmatizer => self.lemmatizer_minval,
            _ => self.tagging_minval,
        }
    }
}
