//! # Templates Léxicos
//!
//! Regras que olham só para a forma da palavra (afixos) ou para a palavra
//! imediatamente vizinha. Usadas para dar uma primeira etiqueta a palavras
//! **fora do léxico**.
//!
//! ## Operações
//!
//! | Operação | Condição sobre a palavra `w` e o afixo `x` |
//! |----------|---------------------------------------------|
//! | `deletesuf` | `w` termina com `x` e `w - x` está no léxico |
//! | `deletepref` | `w` começa com `x` e `x - w` está no léxico |
//! | `addsuf` | `w + x` está no léxico |
//! | `addpref` | `x + w` está no léxico |
//! | `hassuf` | `w` termina com `x`, um sufixo frequente |
//! | `haspref` | `w` começa com `x`, um prefixo frequente |
//! | `goodleft` | a palavra seguinte é `x` |
//! | `goodright` | a palavra anterior é `x` |
//!
//! Cada operação tem uma variante com prefixo `f` que também exige uma
//! etiqueta atual (`from_tag`).
//!
//! ## Forma Textual
//!
//! ```text
//! ment hassuf 4 ADV                 afixo, sem etiqueta de origem
//! ADV re fdeletepref 2 VNCFF        afixo, com etiqueta de origem
//! la goodright SBC:sg               palavra vizinha
//! DTN:sg la fgoodright SBC:sg       palavra vizinha, com etiqueta de origem
//! ```

use std::fmt;

use super::is_rule_field;
use crate::core::textutils::{char_len, drop_first_chars, drop_last_chars, first_chars, last_chars};
use crate::core::{Label, LexiconLookup, Sample};

/// Maior sufixo testado por `deletesuf` e `hassuf`.
const MAX_SUFFIX: usize = 5;
/// Maior prefixo testado por `deletepref` e `haspref`.
const MAX_PREFIX: usize = 4;

/// O que o template testa.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LexicalOp {
    DeleteSuffix,
    DeletePrefix,
    AddSuffix,
    AddPrefix,
    HasSuffix,
    HasPrefix,
    GoodLeft,
    GoodRight,
}

impl LexicalOp {
    const ALL: [LexicalOp; 8] = [
        LexicalOp::DeleteSuffix,
        LexicalOp::DeletePrefix,
        LexicalOp::AddSuffix,
        LexicalOp::AddPrefix,
        LexicalOp::HasSuffix,
        LexicalOp::HasPrefix,
        LexicalOp::GoodLeft,
        LexicalOp::GoodRight,
    ];

    /// Testa a palavra vizinha em vez de um afixo.
    fn is_proximity(self) -> bool {
        matches!(self, LexicalOp::GoodLeft | LexicalOp::GoodRight)
    }
}

/// Template léxico: uma operação, com ou sem etiqueta de origem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LexicalTemplate {
    pub op: LexicalOp,
    pub checks_from_tag: bool,
}

impl LexicalTemplate {
    /// Os 16 templates, cada operação seguida da sua variante `f`.
    pub fn all() -> Vec<LexicalTemplate> {
        LexicalOp::ALL
            .iter()
            .flat_map(|&op| {
                [false, true].map(|checks_from_tag| LexicalTemplate { op, checks_from_tag })
            })
            .collect()
    }

    pub fn name(&self) -> &'static str {
        match (self.op, self.checks_from_tag) {
            (LexicalOp::DeleteSuffix, false) => "deletesuf",
            (LexicalOp::DeleteSuffix, true) => "fdeletesuf",
            (LexicalOp::DeletePrefix, false) => "deletepref",
            (LexicalOp::DeletePrefix, true) => "fdeletepref",
            (LexicalOp::AddSuffix, false) => "addsuf",
            (LexicalOp::AddSuffix, true) => "faddsuf",
            (LexicalOp::AddPrefix, false) => "addpref",
            (LexicalOp::AddPrefix, true) => "faddpref",
            (LexicalOp::HasSuffix, false) => "hassuf",
            (LexicalOp::HasSuffix, true) => "fhassuf",
            (LexicalOp::HasPrefix, false) => "haspref",
            (LexicalOp::HasPrefix, true) => "fhaspref",
            (LexicalOp::GoodLeft, false) => "goodleft",
            (LexicalOp::GoodLeft, true) => "fgoodleft",
            (LexicalOp::GoodRight, false) => "goodright",
            (LexicalOp::GoodRight, true) => "fgoodright",
        }
    }

    pub fn from_name(name: &str) -> Option<LexicalTemplate> {
        Self::all().into_iter().find(|t| t.name() == name)
    }

    /// O template vale para o token em `position` com este afixo (ou palavra)?
    fn matches(
        &self,
        sample: &Sample,
        position: usize,
        affix: &str,
        lexicon: &dyn LexiconLookup,
    ) -> bool {
        let Some(token) = sample.get(position) else {
            return false;
        };
        let word = token.original();
        match self.op {
            LexicalOp::DeleteSuffix => word
                .strip_suffix(affix)
                .is_some_and(|stem| !stem.is_empty() && lexicon.contains(stem)),
            LexicalOp::DeletePrefix => word
                .strip_prefix(affix)
                .is_some_and(|stem| !stem.is_empty() && lexicon.contains(stem)),
            LexicalOp::AddSuffix => lexicon.contains(&format!("{word}{affix}")),
            LexicalOp::AddPrefix => lexicon.contains(&format!("{affix}{word}")),
            LexicalOp::HasSuffix => {
                char_len(affix) < char_len(word)
                    && word.ends_with(affix)
                    && lexicon.suffixes().contains(affix)
            }
            LexicalOp::HasPrefix => {
                char_len(affix) < char_len(word)
                    && word.starts_with(affix)
                    && lexicon.prefixes().contains(affix)
            }
            LexicalOp::GoodLeft => sample
                .get_neighbors(position, &[1])
                .first()
                .is_some_and(|n| n.original() == affix),
            LexicalOp::GoodRight => sample
                .get_neighbors(position, &[-1])
                .first()
                .is_some_and(|n| n.original() == affix),
        }
    }

    /// Afixos (ou palavras vizinhas) com os quais o template valeria para o token.
    fn complements(&self, sample: &Sample, position: usize, lexicon: &dyn LexiconLookup) -> Vec<String> {
        let Some(token) = sample.get(position) else {
            return Vec::new();
        };
        let word = token.original();
        let len = char_len(word);
        let mut found: Vec<String> = match self.op {
            LexicalOp::DeleteSuffix => (1..(MAX_SUFFIX + 1).min(len))
                .filter(|&i| lexicon.contains(drop_last_chars(word, i)))
                .map(|i| last_chars(word, i).to_string())
                .collect(),
            LexicalOp::DeletePrefix => (1..(MAX_PREFIX + 1).min(len))
                .filter(|&i| lexicon.contains(drop_first_chars(word, i)))
                .map(|i| first_chars(word, i).to_string())
                .collect(),
            LexicalOp::AddSuffix | LexicalOp::AddPrefix => {
                if !lexicon.factors().contains(word) {
                    return Vec::new();
                }
                let affixes = if self.op == LexicalOp::AddSuffix {
                    lexicon.suffixes()
                } else {
                    lexicon.prefixes()
                };
                affixes
                    .iter()
                    .filter(|affix| self.matches(sample, position, affix, lexicon))
                    .cloned()
                    .collect()
            }
            LexicalOp::HasSuffix => (1..(MAX_SUFFIX + 1).min(len))
                .map(|i| last_chars(word, i))
                .filter(|affix| lexicon.suffixes().contains(*affix))
                .map(str::to_string)
                .collect(),
            LexicalOp::HasPrefix => (1..(MAX_PREFIX + 1).min(len))
                .map(|i| first_chars(word, i))
                .filter(|affix| lexicon.prefixes().contains(*affix))
                .map(str::to_string)
                .collect(),
            LexicalOp::GoodLeft => sample
                .get_neighbors(position, &[1])
                .into_iter()
                .map(|n| n.original().to_string())
                .collect(),
            LexicalOp::GoodRight => sample
                .get_neighbors(position, &[-1])
                .into_iter()
                .map(|n| n.original().to_string())
                .collect(),
        };
        found.retain(|c| is_rule_field(c));
        found
    }

    /// Regras que levariam um token errado à sua etiqueta verificada.
    pub fn make_rules(
        &self,
        sample: &Sample,
        position: usize,
        lexicon: &dyn LexiconLookup,
    ) -> Vec<LexicalRule> {
        let Some(token) = sample.get(position) else {
            return Vec::new();
        };
        if !token.is_error(Label::Tag) {
            return Vec::new();
        }
        let Some(to_tag) = token.verified_tag() else {
            return Vec::new();
        };
        let from_tag = self.checks_from_tag.then(|| token.tag().to_string());
        if from_tag.as_deref().is_some_and(|t| !is_rule_field(t)) {
            return Vec::new();
        }
        self.complements(sample, position, lexicon)
            .into_iter()
            .map(|affix| LexicalRule {
                template: *self,
                from_tag: from_tag.clone(),
                affix,
                to_tag: to_tag.to_string(),
            })
            .collect()
    }
}

/// Regra léxica compilada.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LexicalRule {
    pub template: LexicalTemplate,
    pub from_tag: Option<String>,
    /// Afixo, ou palavra vizinha para `goodleft`/`goodright`.
    pub affix: String,
    pub to_tag: String,
}

impl LexicalRule {
    pub fn proposal(
        &self,
        sample: &Sample,
        position: usize,
        lexicon: &dyn LexiconLookup,
    ) -> Option<String> {
        let token = sample.get(position)?;
        if let Some(from_tag) = &self.from_tag {
            if token.tag() != from_tag {
                return None;
            }
        }
        self.template
            .matches(sample, position, &self.affix, lexicon)
            .then(|| self.to_tag.clone())
    }

    /// `fields` é a linha já quebrada em campos; `name_idx` aponta o nome do template.
    pub(crate) fn parse(fields: &[&str], name_idx: usize) -> Result<Self, String> {
        let template = LexicalTemplate::from_name(fields[name_idx])
            .ok_or_else(|| format!("unknown lexical template {:?}", fields[name_idx]))?;
        let expected_idx = if template.checks_from_tag { 2 } else { 1 };
        let expected_len = expected_idx + if template.op.is_proximity() { 2 } else { 3 };
        if name_idx != expected_idx || fields.len() != expected_len {
            return Err(format!(
                "{} expects {expected_len} fields, got {}",
                template.name(),
                fields.len()
            ));
        }
        let affix = fields[name_idx - 1];
        if !template.op.is_proximity() {
            let len: usize = fields[name_idx + 1]
                .parse()
                .map_err(|_| format!("invalid affix length {:?}", fields[name_idx + 1]))?;
            if len != char_len(affix) {
                return Err(format!("affix {affix:?} is not {len} chars long"));
            }
        }
        Ok(LexicalRule {
            template,
            from_tag: template.checks_from_tag.then(|| fields[0].to_string()),
            affix: affix.to_string(),
            to_tag: fields[fields.len() - 1].to_string(),
        })
    }
}

impl fmt::Display for LexicalRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(from_tag) = &self.from_tag {
            write!(f, "{from_tag} ")?;
        }
        write!(f, "{} {}", self.affix, self.template.name())?;
        if !self.template.op.is_proximity() {
            write!(f, " {}", char_len(&self.affix))?;
        }
        write!(f, " {}", self.to_tag)
    }
}
