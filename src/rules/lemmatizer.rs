//! # Templates do Lematizador
//!
//! Três formas, todas condicionadas à etiqueta atual do token:
//!
//! ```text
//! SBP:sg MAKELOWER                  lema em minúsculas
//! SBC:pl CHANGESUFFIX "s" ""        troca o sufixo do lema
//! VCJ:sg FORCELEMME être            lema fixo
//! ```

use std::collections::HashSet;
use std::fmt;

use super::is_rule_field;
use crate::core::textutils::{char_len, drop_last_chars, last_chars};
use crate::core::{Label, Sample};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LemmatizerTemplate {
    MakeLower,
    ChangeSuffix,
    ForceLemme,
}

impl LemmatizerTemplate {
    pub const ALL: [LemmatizerTemplate; 3] = [
        LemmatizerTemplate::MakeLower,
        LemmatizerTemplate::ChangeSuffix,
        LemmatizerTemplate::ForceLemme,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LemmatizerTemplate::MakeLower => "MAKELOWER",
            LemmatizerTemplate::ChangeSuffix => "CHANGESUFFIX",
            LemmatizerTemplate::ForceLemme => "FORCELEMME",
        }
    }

    pub fn from_name(name: &str) -> Option<LemmatizerTemplate> {
        Self::ALL.iter().copied().find(|t| t.name() == name)
    }

    /// Regras que levariam o lema atual ao lema verificado.
    pub fn make_rules(&self, sample: &Sample, position: usize) -> Vec<LemmatizerRule> {
        let Some(token) = sample.get(position) else {
            return Vec::new();
        };
        if !token.is_error(Label::Lemme) || !is_rule_field(token.tag()) {
            return Vec::new();
        }
        let Some(verified) = token.verified_lemme() else {
            return Vec::new();
        };
        let tag = token.tag().to_string();
        let lemme = token.lemme();
        match self {
            LemmatizerTemplate::MakeLower => {
                if lemme.chars().next().is_some_and(char::is_uppercase) {
                    vec![LemmatizerRule::MakeLower { tag }]
                } else {
                    Vec::new()
                }
            }
            LemmatizerTemplate::ChangeSuffix => {
                let mut seen = HashSet::new();
                let mut rules = Vec::new();
                for i in 1..=char_len(lemme) {
                    let delete = last_chars(lemme, i);
                    let stem = drop_last_chars(lemme, i);
                    let Some(add) = verified.strip_prefix(stem) else {
                        continue;
                    };
                    if !is_rule_field(delete) || !(add.is_empty() || is_rule_field(add)) {
                        continue;
                    }
                    if seen.insert((delete, add)) {
                        rules.push(LemmatizerRule::ChangeSuffix {
                            tag: tag.clone(),
                            delete: delete.to_string(),
                            add: add.to_string(),
                        });
                    }
                }
                rules
            }
            LemmatizerTemplate::ForceLemme => {
                if is_rule_field(verified) {
                    vec![LemmatizerRule::ForceLemme {
                        tag,
                        lemme: verified.to_string(),
                    }]
                } else {
                    Vec::new()
                }
            }
        }
    }
}

/// Regra do lematizador compilada.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LemmatizerRule {
    MakeLower { tag: String },
    ChangeSuffix { tag: String, delete: String, add: String },
    ForceLemme { tag: String, lemme: String },
}

impl LemmatizerRule {
    pub fn template(&self) -> LemmatizerTemplate {
        match self {
            LemmatizerRule::MakeLower { .. } => LemmatizerTemplate::MakeLower,
            LemmatizerRule::ChangeSuffix { .. } => LemmatizerTemplate::ChangeSuffix,
            LemmatizerRule::ForceLemme { .. } => LemmatizerTemplate::ForceLemme,
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            LemmatizerRule::MakeLower { tag }
            | LemmatizerRule::ChangeSuffix { tag, .. }
            | LemmatizerRule::ForceLemme { tag, .. } => tag,
        }
    }

    pub fn proposal(&self, sample: &Sample, position: usize) -> Option<String> {
        let token = sample.get(position)?;
        if token.tag() != self.tag() {
            return None;
        }
        let current = token.lemme();
        match self {
            LemmatizerRule::MakeLower { .. } => Some(current.to_lowercase()),
            LemmatizerRule::ChangeSuffix { delete, add, .. } => current
                .strip_suffix(delete.as_str())
                .map(|stem| format!("{stem}{add}")),
            LemmatizerRule::ForceLemme { lemme, .. } => Some(lemme.clone()),
        }
    }

    pub(crate) fn parse(fields: &[&str]) -> Result<Self, String> {
        let template = LemmatizerTemplate::from_name(fields[1])
            .ok_or_else(|| format!("unknown lemmatizer template {:?}", fields[1]))?;
        let tag = fields[0].to_string();
        let expected = match template {
            LemmatizerTemplate::MakeLower => 2,
            LemmatizerTemplate::ChangeSuffix => 4,
            LemmatizerTemplate::ForceLemme => 3,
        };
        if fields.len() != expected {
            return Err(format!(
                "{} expects {expected} fields, got {}",
                template.name(),
                fields.len()
            ));
        }
        Ok(match template {
            LemmatizerTemplate::MakeLower => LemmatizerRule::MakeLower { tag },
            LemmatizerTemplate::ChangeSuffix => {
                let delete = unquote(fields[2])?;
                if delete.is_empty() {
                    return Err("empty suffix to delete".into());
                }
                LemmatizerRule::ChangeSuffix {
                    tag,
                    delete: delete.to_string(),
                    add: unquote(fields[3])?.to_string(),
                }
            }
            LemmatizerTemplate::ForceLemme => LemmatizerRule::ForceLemme {
                tag,
                lemme: fields[2].to_string(),
            },
        })
    }
}

fn unquote(field: &str) -> Result<&str, String> {
    field
        .strip_prefix('"')
        .and_then(|f| f.strip_suffix('"'))
        .ok_or_else(|| format!("expected a quoted suffix, got {field:?}"))
}

impl fmt::Display for LemmatizerRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LemmatizerRule::MakeLower { tag } => write!(f, "{tag} MAKELOWER"),
            LemmatizerRule::ChangeSuffix { tag, delete, add } => {
                write!(f, "{tag} CHANGESUFFIX \"{delete}\" \"{add}\"")
            }
            LemmatizerRule::ForceLemme { tag, lemme } => write!(f, "{tag} FORCELEMME {lemme}"),
        }
    }
}
