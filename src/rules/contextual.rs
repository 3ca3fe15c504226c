//! # Templates Contextuais
//!
//! Corrigem etiquetas olhando para os vizinhos do token. Cada template é
//! parametrizado por uma tupla fixa de deslocamentos e testa palavras,
//! etiquetas, ou uma combinação das duas:
//!
//! ```text
//! SBC:sg VCJ:sg PREVTAG PRV:sg          o token anterior tem a etiqueta PRV:sg
//! SBC:sg VCJ:sg WDPREVTAG PRV:sg ferme  etiqueta anterior PRV:sg, palavra atual "ferme"
//! ADJ:sg SBC:sg NEXT1OR2WD de           "de" é uma das duas palavras seguintes
//! ```
//!
//! Os templates `...OR...` são disjunções: basta um dos deslocamentos
//! bater, e a regra carrega um único complemento. Se algum deslocamento cair
//! fora da frase, o token não é candidato.
//!
//! As etiquetas lidas nos vizinhos são as **atuais**, tanto na geração das
//! regras quanto na aplicação: a regra aprendida vale exatamente no estado
//! em que será aplicada.

use std::fmt;

use super::is_rule_field;
use crate::core::{Label, Sample, Token};

/// O que cada deslocamento compara.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Shape {
    Words,
    Tags,
    /// Palavra no primeiro deslocamento, etiqueta no segundo.
    WordTag,
    /// Etiqueta no primeiro deslocamento, palavra no segundo.
    TagWord,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContextualTemplate {
    NextBigram,
    PrevBigram,
    Next1Or2Or3Tag,
    Next1Or2Tag,
    Prev1Or2Or3Tag,
    Prev1Or2Tag,
    NextTag,
    Next2Tag,
    PrevTag,
    Prev2Tag,
    SurroundTag,
    Next1Or2Wd,
    Next2Wd,
    NextWd,
    CurWd,
    Prev1Or2Wd,
    Prev2Wd,
    PrevWd,
    WdAnd2Bfr,
    WdAnd2Aft,
    LBigram,
    RBigram,
    WdAnd2TagAft,
    WdAnd2TagBfr,
    WdNextTag,
    WdPrevTag,
}

impl ContextualTemplate {
    pub const ALL: [ContextualTemplate; 26] = [
        ContextualTemplate::NextBigram,
        ContextualTemplate::PrevBigram,
        ContextualTemplate::Next1Or2Or3Tag,
        ContextualTemplate::Next1Or2Tag,
        ContextualTemplate::Prev1Or2Or3Tag,
        ContextualTemplate::Prev1Or2Tag,
        ContextualTemplate::NextTag,
        ContextualTemplate::Next2Tag,
        ContextualTemplate::PrevTag,
        ContextualTemplate::Prev2Tag,
        ContextualTemplate::SurroundTag,
        ContextualTemplate::Next1Or2Wd,
        ContextualTemplate::Next2Wd,
        ContextualTemplate::NextWd,
        ContextualTemplate::CurWd,
        ContextualTemplate::Prev1Or2Wd,
        ContextualTemplate::Prev2Wd,
        ContextualTemplate::PrevWd,
        ContextualTemplate::WdAnd2Bfr,
        ContextualTemplate::WdAnd2Aft,
        ContextualTemplate::LBigram,
        ContextualTemplate::RBigram,
        ContextualTemplate::WdAnd2TagAft,
        ContextualTemplate::WdAnd2TagBfr,
        ContextualTemplate::WdNextTag,
        ContextualTemplate::WdPrevTag,
    ];

    pub fn name(&self) -> &'static str {
        use ContextualTemplate::*;
        match self {
            NextBigram => "NEXTBIGRAM",
            PrevBigram => "PREVBIGRAM",
            Next1Or2Or3Tag => "NEXT1OR2OR3TAG",
            Next1Or2Tag => "NEXT1OR2TAG",
            Prev1Or2Or3Tag => "PREV1OR2OR3TAG",
            Prev1Or2Tag => "PREV1OR2TAG",
            NextTag => "NEXTTAG",
            Next2Tag => "NEXT2TAG",
            PrevTag => "PREVTAG",
            Prev2Tag => "PREV2TAG",
            SurroundTag => "SURROUNDTAG",
            Next1Or2Wd => "NEXT1OR2WD",
            Next2Wd => "NEXT2WD",
            NextWd => "NEXTWD",
            CurWd => "CURWD",
            Prev1Or2Wd => "PREV1OR2WD",
            Prev2Wd => "PREV2WD",
            PrevWd => "PREVWD",
            WdAnd2Bfr => "WDAND2BFR",
            WdAnd2Aft => "WDAND2AFT",
            LBigram => "LBIGRAM",
            RBigram => "RBIGRAM",
            WdAnd2TagAft => "WDAND2TAGAFT",
            WdAnd2TagBfr => "WDAND2TAGBFR",
            WdNextTag => "WDNEXTTAG",
            WdPrevTag => "WDPREVTAG",
        }
    }

    pub fn from_name(name: &str) -> Option<ContextualTemplate> {
        Self::ALL.iter().copied().find(|t| t.name() == name)
    }

    /// Deslocamentos testados, relativos ao token.
    fn offsets(&self) -> &'static [isize] {
        use ContextualTemplate::*;
        match self {
            NextBigram => &[1, 2],
            PrevBigram => &[-2, -1],
            Next1Or2Or3Tag => &[1, 2, 3],
            Next1Or2Tag => &[1, 2],
            Prev1Or2Or3Tag => &[-3, -2, -1],
            Prev1Or2Tag => &[-2, -1],
            NextTag => &[1],
            Next2Tag => &[2],
            PrevTag => &[-1],
            Prev2Tag => &[-2],
            SurroundTag => &[-1, 1],
            Next1Or2Wd => &[1, 2],
            Next2Wd => &[2],
            NextWd => &[1],
            CurWd => &[0],
            Prev1Or2Wd => &[-2, -1],
            Prev2Wd => &[-2],
            PrevWd => &[-1],
            WdAnd2Bfr => &[-2, 0],
            WdAnd2Aft => &[0, 2],
            LBigram => &[-1, 0],
            RBigram => &[0, 1],
            WdAnd2TagAft => &[0, 2],
            WdAnd2TagBfr => &[-2, 0],
            WdNextTag => &[0, 1],
            WdPrevTag => &[-1, 0],
        }
    }

    fn shape(&self) -> Shape {
        use ContextualTemplate::*;
        match self {
            Next1Or2Or3Tag | Next1Or2Tag | Prev1Or2Or3Tag | Prev1Or2Tag | NextTag | Next2Tag
            | PrevTag | Prev2Tag | SurroundTag => Shape::Tags,
            WdAnd2TagAft | WdNextTag => Shape::WordTag,
            WdAnd2TagBfr | WdPrevTag => Shape::TagWord,
            _ => Shape::Words,
        }
    }

    fn is_or(&self) -> bool {
        use ContextualTemplate::*;
        matches!(
            self,
            Next1Or2Or3Tag | Next1Or2Tag | Prev1Or2Or3Tag | Prev1Or2Tag | Next1Or2Wd | Prev1Or2Wd
        )
    }

    /// Número de complementos numa regra deste template.
    fn arity(&self) -> usize {
        if self.is_or() {
            1
        } else {
            self.offsets().len()
        }
    }

    /// Valores observados nos deslocamentos (palavra ou etiqueta, conforme a forma).
    fn observed(&self, sample: &Sample, position: usize) -> Vec<String> {
        let neighbors = sample.get_neighbors(position, self.offsets());
        let word = |t: &Token| t.original().to_string();
        let tag = |t: &Token| t.tag().to_string();
        match self.shape() {
            Shape::Words => neighbors.into_iter().map(word).collect(),
            Shape::Tags => neighbors.into_iter().map(tag).collect(),
            Shape::WordTag => match neighbors.as_slice() {
                [first, second] => vec![word(*first), tag(*second)],
                _ => Vec::new(),
            },
            Shape::TagWord => match neighbors.as_slice() {
                [first, second] => vec![tag(*first), word(*second)],
                _ => Vec::new(),
            },
        }
    }

    /// Regras que levariam um token errado à sua etiqueta verificada.
    pub fn make_rules(&self, sample: &Sample, position: usize) -> Vec<ContextualRule> {
        let Some(token) = sample.get(position) else {
            return Vec::new();
        };
        if !token.is_error(Label::Tag) {
            return Vec::new();
        }
        let Some(to_tag) = token.verified_tag() else {
            return Vec::new();
        };
        if !is_rule_field(token.tag()) {
            return Vec::new();
        }
        let observed = self.observed(sample, position);
        if observed.is_empty() || !observed.iter().all(|c| is_rule_field(c)) {
            return Vec::new();
        }
        let complements: Vec<Vec<String>> = if self.is_or() {
            let mut single: Vec<Vec<String>> = Vec::new();
            for value in observed {
                let candidate = vec![value];
                if !single.contains(&candidate) {
                    single.push(candidate);
                }
            }
            single
        } else {
            vec![observed]
        };
        complements
            .into_iter()
            .map(|complement| ContextualRule {
                template: *self,
                from_tag: token.tag().to_string(),
                to_tag: to_tag.to_string(),
                complement,
            })
            .collect()
    }
}

/// Regra contextual compilada.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContextualRule {
    pub template: ContextualTemplate,
    pub from_tag: String,
    pub to_tag: String,
    pub complement: Vec<String>,
}

impl ContextualRule {
    pub fn proposal(&self, sample: &Sample, position: usize) -> Option<String> {
        let token = sample.get(position)?;
        if token.tag() != self.from_tag {
            return None;
        }
        let observed = self.template.observed(sample, position);
        if observed.is_empty() {
            return None;
        }
        let matched = if self.template.is_or() {
            self.complement
                .first()
                .is_some_and(|wanted| observed.contains(wanted))
        } else {
            observed == self.complement
        };
        matched.then(|| self.to_tag.clone())
    }

    pub(crate) fn parse(fields: &[&str]) -> Result<Self, String> {
        let template = ContextualTemplate::from_name(fields[2])
            .ok_or_else(|| format!("unknown contextual template {:?}", fields[2]))?;
        let expected = 3 + template.arity();
        if fields.len() != expected {
            return Err(format!(
                "{} expects {expected} fields, got {}",
                template.name(),
                fields.len()
            ));
        }
        Ok(ContextualRule {
            template,
            from_tag: fields[0].to_string(),
            to_tag: fields[1].to_string(),
            complement: fields[3..].iter().map(|c| c.to_string()).collect(),
        })
    }
}

impl fmt::Display for ContextualRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.from_tag,
            self.to_tag,
            self.template.name(),
            self.complement.join(" ")
        )
    }
}
