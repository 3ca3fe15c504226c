//! # Léxico — Palavras Conhecidas e Seus Rótulos
//!
//! O léxico associa cada forma de superfície à lista ordenada de pares
//! (etiqueta, lema) vistos no corpus de treinamento, do mais frequente para
//! o menos frequente. O primeiro par é o **padrão** usado na etiquetagem.
//!
//! ## Formato em Disco
//!
//! ```text
//! ferme	SBC:sg/ferme VCJ:sg/fermer
//! porte	SBC:sg/porte VCJ:sg/porter
//! ```
//!
//! ## Conjuntos Derivados
//!
//! Calculados uma vez, na construção:
//!
//! | Conjunto | Conteúdo | Uso |
//! |----------|----------|-----|
//! | `prefixes` | prefixos (≤ 3 chars) frequentes | `haspref`, `addpref` |
//! | `suffixes` | sufixos (≤ 5 chars) frequentes | `hassuf`, `addsuf` |
//! | `factors` | toda subcadeia de palavra conhecida | `addpref`, `addsuf` |
//!
//! Um afixo é "frequente" quando a sua contagem ponderada (cada ocorrência
//! soma o comprimento do afixo) passa de duas vezes o seu comprimento.
//!
//! ## Trait de Consulta
//!
//! O resto da biblioteca só enxerga o léxico pela trait [`LexiconLookup`],
//! o que permite trocar a origem dos dados sem mexer nos templates.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::text::Text;
use super::textutils::{char_len, first_chars, last_chars};
use crate::errors::{Error, Result};

const MAX_PREFIX_LENGTH: usize = 3;
const MAX_SUFFIX_LENGTH: usize = 5;

/// Um par (etiqueta, lema) possível para uma palavra.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconEntry {
    pub tag: String,
    pub lemme: String,
}

/// Interface de consulta ao léxico consumida pelo tagger e pelos templates.
pub trait LexiconLookup: Send + Sync {
    fn contains(&self, word: &str) -> bool;

    /// Pares conhecidos para a palavra, do mais frequente ao menos (vazio se desconhecida).
    fn lookup(&self, word: &str) -> &[LexiconEntry];

    fn prefixes(&self) -> &BTreeSet<String>;

    fn suffixes(&self) -> &BTreeSet<String>;

    /// Todas as subcadeias próprias das palavras conhecidas.
    fn factors(&self) -> &HashSet<String>;

    /// Par padrão (o mais frequente).
    fn default_entry(&self, word: &str) -> Option<&LexiconEntry> {
        self.lookup(word).first()
    }

    /// Lema registrado para a palavra com esta etiqueta.
    fn lemme_for(&self, word: &str, tag: &str) -> Option<&str> {
        self.lookup(word)
            .iter()
            .find(|e| e.tag == tag)
            .map(|e| e.lemme.as_str())
    }
}

/// Léxico em memória.
#[derive(Clone, Debug, Default)]
pub struct Lexicon {
    entries: BTreeMap<String, Vec<LexiconEntry>>,
    prefixes: BTreeSet<String>,
    suffixes: BTreeSet<String>,
    factors: HashSet<String>,
}

impl Lexicon {
    /// Monta o léxico e os conjuntos derivados a partir das entradas.
    pub fn from_entries(entries: BTreeMap<String, Vec<LexiconEntry>>) -> Self {
        let mut lexicon = Self {
            entries,
            ..Self::default()
        };
        lexicon.create_affixes();
        lexicon.create_factors();
        tracing::debug!(
            words = lexicon.entries.len(),
            prefixes = lexicon.prefixes.len(),
            suffixes = lexicon.suffixes.len(),
            "Léxico montado"
        );
        lexicon
    }

    /// Lê linhas `palavra<TAB>TAG/lema TAG/lema ...`.
    ///
    /// Sem tabulação, o primeiro espaço separa a palavra dos pares.
    pub fn parse(content: &str) -> Result<Self> {
        let mut entries = BTreeMap::new();
        for (idx, line) in content.lines().enumerate() {
            let line_no = idx + 1;
            if line.trim().is_empty() {
                continue;
            }
            let (word, tags) = line
                .split_once('\t')
                .or_else(|| line.split_once(' '))
                .ok_or_else(|| Error::LexiconParse {
                    line: line_no,
                    reason: "missing tags".into(),
                })?;
            let mut pairs = Vec::new();
            for pair in tags.split_whitespace() {
                let (tag, lemme) = pair.split_once('/').ok_or_else(|| Error::LexiconParse {
                    line: line_no,
                    reason: format!("expected TAG/lemme, got {pair:?}"),
                })?;
                pairs.push(LexiconEntry {
                    tag: tag.to_string(),
                    lemme: lemme.to_string(),
                });
            }
            if pairs.is_empty() {
                return Err(Error::LexiconParse {
                    line: line_no,
                    reason: "missing tags".into(),
                });
            }
            entries.insert(word.to_string(), pairs);
        }
        Ok(Self::from_entries(entries))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "Carregando léxico");
        Self::parse(&std::fs::read_to_string(path)?)
    }

    /// Deriva um léxico de um corpus anotado.
    ///
    /// Nomes próprios (`SBP*`) ficam de fora. As etiquetas de cada palavra
    /// são ordenadas por frequência e cada uma recebe o seu lema mais
    /// frequente; empates ficam com o primeiro visto.
    pub fn build(corpus: &Text) -> Self {
        // palavra → [(etiqueta, contagem, [(lema, contagem)])], na ordem de aparição
        type TagCounts = Vec<(String, usize, Vec<(String, usize)>)>;
        let mut seen: HashMap<String, TagCounts> = HashMap::new();
        for token in corpus.tokens() {
            let Some(tag) = token.verified_tag() else {
                continue;
            };
            if tag.starts_with("SBP") {
                continue;
            }
            let lemme = token.verified_lemme().unwrap_or(token.original());
            let tags = seen.entry(token.original().to_string()).or_default();
            let idx = match tags.iter().position(|(t, _, _)| t == tag) {
                Some(idx) => idx,
                None => {
                    tags.push((tag.to_string(), 0, Vec::new()));
                    tags.len() - 1
                }
            };
            let (_, count, lemmes) = &mut tags[idx];
            *count += 1;
            match lemmes.iter_mut().find(|(l, _)| l == lemme) {
                Some((_, c)) => *c += 1,
                None => lemmes.push((lemme.to_string(), 1)),
            }
        }

        let entries = seen
            .into_iter()
            .map(|(word, mut tags)| {
                tags.sort_by(|a, b| b.1.cmp(&a.1));
                let pairs = tags
                    .into_iter()
                    .map(|(tag, _, mut lemmes)| {
                        lemmes.sort_by(|a, b| b.1.cmp(&a.1));
                        let lemme = lemmes
                            .into_iter()
                            .next()
                            .map(|(l, _)| l)
                            .unwrap_or_else(|| word.clone());
                        LexiconEntry { tag, lemme }
                    })
                    .collect();
                (word, pairs)
            })
            .collect();
        Self::from_entries(entries)
    }

    /// Serializa no formato de disco, ordenado por palavra.
    pub fn to_lexicon_string(&self) -> String {
        self.entries
            .iter()
            .map(|(word, pairs)| {
                let tags: Vec<String> =
                    pairs.iter().map(|e| format!("{}/{}", e.tag, e.lemme)).collect();
                format!("{}\t{}", word, tags.join(" "))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<LexiconEntry>)> {
        self.entries.iter()
    }

    /// Palavras com mais de uma etiqueta: candidatas a duplicatas erradas.
    pub fn ambiguous_entries(&self) -> Vec<(&str, &[LexiconEntry])> {
        self.entries
            .iter()
            .filter(|(_, pairs)| pairs.len() > 1)
            .map(|(w, pairs)| (w.as_str(), pairs.as_slice()))
            .collect()
    }

    fn create_affixes(&mut self) {
        let mut prefixes: HashMap<&str, usize> = HashMap::new();
        let mut suffixes: HashMap<&str, usize> = HashMap::new();
        for word in self.entries.keys() {
            let len = char_len(word);
            for i in 1..(MAX_PREFIX_LENGTH + 1).min(len) {
                *prefixes.entry(first_chars(word, i)).or_default() += i;
            }
            for i in 1..(MAX_SUFFIX_LENGTH + 1).min(len) {
                *suffixes.entry(last_chars(word, i)).or_default() += i;
            }
        }
        let frequent = |counts: HashMap<&str, usize>| -> BTreeSet<String> {
            counts
                .into_iter()
                .filter(|(affix, count)| *count > char_len(affix) * 2)
                .map(|(affix, _)| affix.to_string())
                .collect()
        };
        self.prefixes = frequent(prefixes);
        self.suffixes = frequent(suffixes);
    }

    fn create_factors(&mut self) {
        let mut factors = HashSet::new();
        for word in self.entries.keys() {
            let bounds: Vec<usize> = word
                .char_indices()
                .map(|(i, _)| i)
                .chain(std::iter::once(word.len()))
                .collect();
            for (a, &start) in bounds.iter().enumerate() {
                for &end in &bounds[a + 1..] {
                    let factor = &word[start..end];
                    if factor != word {
                        factors.insert(factor.to_string());
                    }
                }
            }
        }
        self.factors = factors;
    }
}

impl LexiconLookup for Lexicon {
    fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    fn lookup(&self, word: &str) -> &[LexiconEntry] {
        self.entries.get(word).map(Vec::as_slice).unwrap_or(&[])
    }

    fn prefixes(&self) -> &BTreeSet<String> {
        &self.prefixes
    }

    fn suffixes(&self) -> &BTreeSet<String> {
        &self.suffixes
    }

    fn factors(&self) -> &HashSet<String> {
        &self.factors
    }
}
