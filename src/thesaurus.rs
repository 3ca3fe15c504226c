//! # Tesauro — Triggers, Descritores e Sinapses
//!
//! Um **trigger** é a forma canônica de uma key-entity (lemas separados por
//! espaço). Cada trigger se liga a **descritores** por arestas pesadas, as
//! "sinapses", aprendidas pelo
//! [`SemanticalTrainer`](crate::training::SemanticalTrainer).
//!
//! ```text
//! "loi création internet" ──(12)──▶ "Internet"
//!                         ──(9)───▶ "Droit d'auteur"
//!                         ──(1)───▶ "Musique"
//! ```
//!
//! ## Peso Ponderado
//!
//! O peso bruto é relativizado pelo maior peso do trigger e pelo maior peso
//! do descritor:
//!
//! ```text
//! pondered = (w / max_trigger) * (w / max_descritor)
//! ```
//!
//! Só as `synapses_per_trigger` sinapses mais pesadas de cada trigger são
//! lidas.
//!
//! ## Persistência
//!
//! [`MemoryThesaurus`] é serializado como JSON via
//! [`persistence::save_thesaurus`](crate::persistence::save_thesaurus). O
//! índice reverso descritor → triggers é `#[serde(skip)]` e reconstruído por
//! [`rebuild_index()`](MemoryThesaurus::rebuild_index).

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Sinapses lidas por trigger quando nada é configurado.
pub const DEFAULT_SYNAPSES_PER_TRIGGER: usize = 20;

/// Aresta trigger → descritor, como o motor de descritores a consome.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TriggerEdge {
    /// Descritor primordial (aliases já resolvidos).
    pub descriptor: String,
    pub weight: f64,
    pub pondered_weight: f64,
}

/// Interface consumida pelo motor de descritores.
pub trait Thesaurus {
    /// Arestas do trigger, das mais pesadas para as mais leves; `None` se o
    /// trigger não existe.
    fn trigger(&self, original: &str) -> Option<Vec<TriggerEdge>>;
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TriggerEntry {
    /// Em quantos conteúdos de treinamento o trigger apareceu.
    pub count: u64,
    /// Descritor → peso.
    pub synapses: BTreeMap<String, f64>,
}

impl TriggerEntry {
    pub fn max_weight(&self) -> f64 {
        self.synapses.values().copied().fold(0.0, f64::max)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DescriptorEntry {
    /// Em quantos conteúdos de treinamento o descritor foi atribuído.
    pub count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias_of: Option<String>,
}

/// Tesauro em memória.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MemoryThesaurus {
    pub triggers: BTreeMap<String, TriggerEntry>,
    pub descriptors: BTreeMap<String, DescriptorEntry>,

    #[serde(skip, default = "default_synapses")]
    synapses_per_trigger: usize,

    /// Índice reverso: descritor → triggers ligados a ele.
    ///
    /// **Não serializado**, reconstruído após load.
    #[serde(skip, default)]
    descriptor_triggers: HashMap<String, Vec<String>>,
}

fn default_synapses() -> usize {
    DEFAULT_SYNAPSES_PER_TRIGGER
}

impl Default for MemoryThesaurus {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryThesaurus {
    pub fn new() -> Self {
        Self {
            triggers: BTreeMap::new(),
            descriptors: BTreeMap::new(),
            synapses_per_trigger: DEFAULT_SYNAPSES_PER_TRIGGER,
            descriptor_triggers: HashMap::new(),
        }
    }

    pub fn with_synapses_per_trigger(mut self, synapses: usize) -> Self {
        self.synapses_per_trigger = synapses;
        self
    }

    pub fn set_synapses_per_trigger(&mut self, synapses: usize) {
        self.synapses_per_trigger = synapses;
    }

    /// Reconstrói o índice descritor → triggers.
    ///
    /// **Deve ser chamado após desserialização.**
    pub fn rebuild_index(&mut self) {
        self.descriptor_triggers.clear();
        for (trigger, entry) in &self.triggers {
            for descriptor in entry.synapses.keys() {
                self.descriptor_triggers
                    .entry(descriptor.clone())
                    .or_default()
                    .push(trigger.clone());
            }
        }
    }

    pub fn trigger_count(&self) -> usize {
        self.triggers.len()
    }

    pub fn descriptor_count(&self) -> usize {
        self.descriptors.len()
    }

    pub fn contains_trigger(&self, original: &str) -> bool {
        self.triggers.contains_key(original)
    }

    /// Registra o descritor (se preciso) e incrementa a sua contagem.
    pub fn bump_descriptor(&mut self, name: &str) -> u64 {
        let entry = self.descriptors.entry(name.to_string()).or_insert_with(|| {
            tracing::info!(descriptor = %name, "Tesauro: novo descritor");
            DescriptorEntry::default()
        });
        entry.count += 1;
        entry.count
    }

    /// Registra o trigger (se preciso) e incrementa a sua contagem.
    pub fn bump_trigger(&mut self, original: &str) -> u64 {
        let entry = self.triggers.entry(original.to_string()).or_default();
        entry.count += 1;
        entry.count
    }

    /// Declara `name` como alias de `of`.
    pub fn set_alias(&mut self, name: &str, of: &str) {
        self.descriptors.entry(of.to_string()).or_default();
        self.descriptors.entry(name.to_string()).or_default().alias_of = Some(of.to_string());
    }

    /// Segue a cadeia de aliases até o descritor primordial.
    pub fn primeval<'a>(&'a self, name: &'a str) -> &'a str {
        let mut current = name;
        // Uma cadeia nunca é maior que o número de descritores; limita ciclos.
        for _ in 0..=self.descriptors.len() {
            match self.descriptors.get(current).and_then(|d| d.alias_of.as_deref()) {
                Some(next) => current = next,
                None => return current,
            }
        }
        tracing::warn!(descriptor = %name, "Tesauro: ciclo de aliases");
        current
    }

    /// Cria a ligação se preciso e soma `score` ao peso.
    pub fn connect(&mut self, trigger: &str, descriptor: &str, score: f64) {
        self.descriptors.entry(descriptor.to_string()).or_default();
        let entry = self.triggers.entry(trigger.to_string()).or_default();
        if !entry.synapses.contains_key(descriptor) {
            self.descriptor_triggers
                .entry(descriptor.to_string())
                .or_default()
                .push(trigger.to_string());
        }
        *entry.synapses.entry(descriptor.to_string()).or_insert(0.0) += score;
    }

    pub fn weight(&self, trigger: &str, descriptor: &str) -> Option<f64> {
        self.triggers.get(trigger)?.synapses.get(descriptor).copied()
    }

    /// Remove as ligações com peso ≤ 0; devolve quantas foram removidas.
    pub fn clean_connections(&mut self) -> usize {
        let mut removed = 0;
        for (trigger, entry) in self.triggers.iter_mut() {
            entry.synapses.retain(|descriptor, weight| {
                let keep = *weight > 0.0;
                if !keep {
                    tracing::debug!(%trigger, %descriptor, "Tesauro: ligação removida");
                    removed += 1;
                }
                keep
            });
        }
        if removed > 0 {
            self.rebuild_index();
        }
        tracing::info!(removed, "Tesauro: ligações limpas");
        removed
    }

    /// Maior peso de uma ligação que chega ao descritor.
    pub fn descriptor_max_weight(&self, descriptor: &str) -> f64 {
        self.descriptor_triggers
            .get(descriptor)
            .into_iter()
            .flatten()
            .filter_map(|trigger| self.weight(trigger, descriptor))
            .fold(0.0, f64::max)
    }

    /// `(w / max_trigger) * (w / max_descritor)`; zero se algum máximo é zero.
    pub fn pondered_weight(&self, trigger: &str, descriptor: &str) -> f64 {
        let Some(entry) = self.triggers.get(trigger) else {
            return 0.0;
        };
        let Some(&weight) = entry.synapses.get(descriptor) else {
            return 0.0;
        };
        let trigger_max = entry.max_weight();
        let descriptor_max = self.descriptor_max_weight(descriptor);
        if trigger_max <= 0.0 || descriptor_max <= 0.0 {
            return 0.0;
        }
        (weight / trigger_max) * (weight / descriptor_max)
    }

    /// As sinapses mais pesadas do trigger, em ordem decrescente de peso.
    pub fn synapses(&self, trigger: &str) -> Vec<(&str, f64)> {
        let Some(entry) = self.triggers.get(trigger) else {
            return Vec::new();
        };
        let mut synapses: Vec<(&str, f64)> = entry
            .synapses
            .iter()
            .map(|(d, &w)| (d.as_str(), w))
            .collect();
        synapses.sort_by(|a, b| b.1.total_cmp(&a.1));
        synapses.truncate(self.synapses_per_trigger);
        synapses
    }
}

impl Thesaurus for MemoryThesaurus {
    fn trigger(&self, original: &str) -> Option<Vec<TriggerEdge>> {
        if !self.contains_trigger(original) {
            return None;
        }
        Some(
            self.synapses(original)
                .into_iter()
                .map(|(descriptor, weight)| TriggerEdge {
                    descriptor: self.primeval(descriptor).to_string(),
                    weight,
                    pondered_weight: self.pondered_weight(original, descriptor),
                })
                .collect(),
        )
    }
}
