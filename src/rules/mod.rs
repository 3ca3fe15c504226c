//! # Regras de Transformação — Registro de Templates
//!
//! Uma **regra** é uma função pura: dado um token (e a frase em volta),
//! decide se ele é candidato e, se for, qual rótulo prescreve. Regras são
//! instâncias de **templates**, formas parametrizadas agrupadas em três
//! famílias:
//!
//! | Família | Rótulo | Exemplos de template |
//! |---------|--------|----------------------|
//! | [`RuleFamily::Lexical`] | etiqueta | `hassuf`, `fdeletepref`, `goodleft` |
//! | [`RuleFamily::Contextual`] | etiqueta | `PREVTAG`, `NEXT1OR2WD`, `SURROUNDTAG` |
//! | [`RuleFamily::Lemmatizer`] | lema | `MAKELOWER`, `CHANGESUFFIX`, `FORCELEMME` |
//!
//! O registro é estático: [`RuleFamily::templates`] lista os templates de
//! cada família, e o nome no texto da regra identifica o template que a
//! interpreta.
//!
//! ## Forma Textual
//!
//! ```text
//! ment hassuf 4 ADV                       léxica
//! ADV re fdeletepref 2 VNCFF              léxica com etiqueta de origem
//! SBC:sg VCJ:sg PREVTAG PRV:sg            contextual
//! SBC:pl CHANGESUFFIX "s" ""              lematizador
//! ```
//!
//! `Display` compila e [`Rule::parse_line`] descompila; a ida e volta é
//! exata.
//!
//! ## Operações
//!
//! - [`Template::make_rules`] — todas as regras que corrigiriam um erro
//! - [`Rule::is_candidate`] — a regra se aplica ao token agora?
//! - [`Rule::test`] — o que a regra faria com o token (`Good`/`Bad`/`Neutral`)
//! - [`Rule::apply`] — aplica a todos os candidatos, de forma atômica
//! - [`select_one`] — escolhe a melhor regra entre candidatas pontuadas

/// Templates léxicos (afixos e vizinho imediato).
pub mod lexical;

/// Templates contextuais (etiquetas e palavras vizinhas).
pub mod contextual;

/// Templates do lematizador.
pub mod lemmatizer;

/// Leitura e escrita de arquivos de regras.
pub mod file;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::{Label, LexiconLookup, Sample, Token};
use crate::errors::{Error, Result};

pub use contextual::{ContextualRule, ContextualTemplate};
pub use file::{export_rules, load_rules, parse_rules, save_rules};
pub use lemmatizer::{LemmatizerRule, LemmatizerTemplate};
pub use lexical::{LexicalOp, LexicalRule, LexicalTemplate};

/// Família de regras.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleFamily {
    Lexical,
    Contextual,
    Lemmatizer,
}

impl RuleFamily {
    /// Rótulo que as regras desta família escrevem.
    pub fn label(self) -> Label {
        match self {
            RuleFamily::Lemmatizer => Label::Lemme,
            _ => Label::Tag,
        }
    }

    /// Templates registrados, na ordem em que geram candidatas.
    pub fn templates(self) -> Vec<Template> {
        match self {
            RuleFamily::Lexical => LexicalTemplate::all().into_iter().map(Template::Lexical).collect(),
            RuleFamily::Contextual => ContextualTemplate::ALL
                .iter()
                .copied()
                .map(Template::Contextual)
                .collect(),
            RuleFamily::Lemmatizer => LemmatizerTemplate::ALL
                .iter()
                .copied()
                .map(Template::Lemmatizer)
                .collect(),
        }
    }

    /// O token entra no treinamento desta família?
    ///
    /// Regras léxicas só aprendem com palavras fora do léxico; as outras
    /// famílias usam todos os tokens.
    pub fn trains_on(self, token: &Token, lexicon: &dyn LexiconLookup) -> bool {
        self != RuleFamily::Lexical || !lexicon.contains(token.original())
    }

    /// Regra de arquivo com pontuação (`regra\tscore`)?
    pub fn exports_scores(self) -> bool {
        !matches!(self, RuleFamily::Contextual)
    }
}

impl fmt::Display for RuleFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RuleFamily::Lexical => "lexical",
            RuleFamily::Contextual => "contextual",
            RuleFamily::Lemmatizer => "lemmatizer",
        })
    }
}

/// Um template de qualquer família.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Template {
    Lexical(LexicalTemplate),
    Contextual(ContextualTemplate),
    Lemmatizer(LemmatizerTemplate),
}

impl Template {
    pub fn name(&self) -> &'static str {
        match self {
            Template::Lexical(t) => t.name(),
            Template::Contextual(t) => t.name(),
            Template::Lemmatizer(t) => t.name(),
        }
    }

    pub fn family(&self) -> RuleFamily {
        match self {
            Template::Lexical(_) => RuleFamily::Lexical,
            Template::Contextual(_) => RuleFamily::Contextual,
            Template::Lemmatizer(_) => RuleFamily::Lemmatizer,
        }
    }

    /// Todas as regras deste template que levariam o token em `position`
    /// ao seu rótulo verificado.
    pub fn make_rules(
        &self,
        sample: &Sample,
        position: usize,
        lexicon: &dyn LexiconLookup,
    ) -> Vec<Rule> {
        match self {
            Template::Lexical(t) => t
                .make_rules(sample, position, lexicon)
                .into_iter()
                .map(Rule::Lexical)
                .collect(),
            Template::Contextual(t) => t
                .make_rules(sample, position)
                .into_iter()
                .map(Rule::Contextual)
                .collect(),
            Template::Lemmatizer(t) => t
                .make_rules(sample, position)
                .into_iter()
                .map(Rule::Lemmatizer)
                .collect(),
        }
    }
}

impl FromStr for Template {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        LexicalTemplate::from_name(name)
            .map(Template::Lexical)
            .or_else(|| ContextualTemplate::from_name(name).map(Template::Contextual))
            .or_else(|| LemmatizerTemplate::from_name(name).map(Template::Lemmatizer))
            .ok_or_else(|| Error::UnknownTemplate(name.to_string()))
    }
}

/// Efeito de uma regra sobre um token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleTest {
    /// Não candidato, ou o rótulo não mudaria.
    Neutral,
    /// Errado → certo.
    Good,
    /// Certo → errado, ou errado → outro errado.
    Bad,
}

impl RuleTest {
    /// Forma numérica: 0, 1 ou -1.
    pub fn value(self) -> i8 {
        match self {
            RuleTest::Neutral => 0,
            RuleTest::Good => 1,
            RuleTest::Bad => -1,
        }
    }
}

/// Uma regra compilada.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Rule {
    Lexical(LexicalRule),
    Contextual(ContextualRule),
    Lemmatizer(LemmatizerRule),
}

impl Rule {
    pub fn family(&self) -> RuleFamily {
        match self {
            Rule::Lexical(_) => RuleFamily::Lexical,
            Rule::Contextual(_) => RuleFamily::Contextual,
            Rule::Lemmatizer(_) => RuleFamily::Lemmatizer,
        }
    }

    pub fn template(&self) -> Template {
        match self {
            Rule::Lexical(r) => Template::Lexical(r.template),
            Rule::Contextual(r) => Template::Contextual(r.template),
            Rule::Lemmatizer(r) => Template::Lemmatizer(r.template()),
        }
    }

    /// Novo valor do rótulo se o token em `position` for candidato.
    pub fn proposal(
        &self,
        sample: &Sample,
        position: usize,
        lexicon: &dyn LexiconLookup,
    ) -> Option<String> {
        match self {
            Rule::Lexical(r) => r.proposal(sample, position, lexicon),
            Rule::Contextual(r) => r.proposal(sample, position),
            Rule::Lemmatizer(r) => r.proposal(sample, position),
        }
    }

    pub fn is_candidate(&self, sample: &Sample, position: usize, lexicon: &dyn LexiconLookup) -> bool {
        self.proposal(sample, position, lexicon).is_some()
    }

    /// O que a regra faria com o token, comparando com o rótulo verificado.
    pub fn test(&self, sample: &Sample, position: usize, lexicon: &dyn LexiconLookup) -> RuleTest {
        let label = self.family().label();
        let Some(new) = self.proposal(sample, position, lexicon) else {
            return RuleTest::Neutral;
        };
        let token = &sample[position];
        if new == token.label(label) {
            return RuleTest::Neutral;
        }
        match token.verified(label) {
            Some(verified) if verified == new => RuleTest::Good,
            Some(_) => RuleTest::Bad,
            None => RuleTest::Neutral,
        }
    }

    /// Soma (good, bad) sobre os tokens com que a família treina.
    ///
    /// Usa o mesmo recorte que a contagem de erros do treinador: uma regra
    /// léxica não ganha nem perde pontos com palavras conhecidas.
    pub fn count(&self, samples: &[Sample], lexicon: &dyn LexiconLookup) -> (usize, usize) {
        let family = self.family();
        let mut good = 0;
        let mut bad = 0;
        for sample in samples {
            for position in 0..sample.len() {
                if !family.trains_on(&sample[position], lexicon) {
                    continue;
                }
                match self.test(sample, position, lexicon) {
                    RuleTest::Good => good += 1,
                    RuleTest::Bad => bad += 1,
                    RuleTest::Neutral => {}
                }
            }
        }
        (good, bad)
    }

    /// Aplica a regra a todos os candidatos; devolve quantos tokens mudaram.
    ///
    /// As propostas são calculadas sobre o estado anterior e só então
    /// escritas: o resultado não depende da ordem dos tokens e nenhuma
    /// aplicação fica pela metade.
    pub fn apply(&self, samples: &mut [Sample], lexicon: &dyn LexiconLookup) -> usize {
        let label = self.family().label();
        let changes: Vec<(usize, usize, String)> = samples
            .iter()
            .enumerate()
            .flat_map(|(idx, sample)| {
                (0..sample.len()).filter_map(move |position| {
                    self.proposal(sample, position, lexicon)
                        .filter(|new| new != sample[position].label(label))
                        .map(|new| (idx, position, new))
                })
            })
            .collect();
        let changed = changes.len();
        for (idx, position, new) in changes {
            samples[idx].set_label(position, label, &new);
        }
        changed
    }

    /// Descompila uma linha de regra sem saber a família.
    ///
    /// Tenta lematizador, contextual e léxica, nessa ordem, e fica com a
    /// primeira que aceita a linha. `line_no` só entra na mensagem de erro.
    pub fn parse_line(line: &str, line_no: usize) -> Result<Rule> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let mut first_error = None;
        for family in [RuleFamily::Lemmatizer, RuleFamily::Contextual, RuleFamily::Lexical] {
            match Self::parse_fields(family, &fields) {
                Some(Ok(rule)) => return Ok(rule),
                Some(Err(reason)) => {
                    first_error.get_or_insert(reason);
                }
                None => {}
            }
        }
        let reason = first_error.unwrap_or_else(|| format!("no known template in {line:?}"));
        Err(Error::rule_parse(line_no, reason))
    }

    /// Descompila uma linha de uma família conhecida.
    pub fn parse_in_family(family: RuleFamily, line: &str, line_no: usize) -> Result<Rule> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        Self::parse_fields(family, &fields)
            .unwrap_or_else(|| Err(format!("no {family} template in {line:?}")))
            .map_err(|reason| Error::rule_parse(line_no, reason))
    }

    /// `None` quando o nome de template da família não está no lugar esperado.
    fn parse_fields(family: RuleFamily, fields: &[&str]) -> Option<std::result::Result<Rule, String>> {
        let is_named = |idx: usize, known: fn(&str) -> bool| fields.get(idx).is_some_and(|f| known(f));
        match family {
            RuleFamily::Lemmatizer => is_named(1, |f| LemmatizerTemplate::from_name(f).is_some())
                .then(|| LemmatizerRule::parse(fields).map(Rule::Lemmatizer)),
            RuleFamily::Contextual => is_named(2, |f| ContextualTemplate::from_name(f).is_some())
                .then(|| ContextualRule::parse(fields).map(Rule::Contextual)),
            RuleFamily::Lexical => [1, 2]
                .into_iter()
                .find(|&idx| is_named(idx, |f| LexicalTemplate::from_name(f).is_some()))
                .map(|idx| LexicalRule::parse(fields, idx).map(Rule::Lexical)),
        }
    }
}

impl FromStr for Rule {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self> {
        Rule::parse_line(line, 1)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Lexical(r) => r.fmt(f),
            Rule::Contextual(r) => r.fmt(f),
            Rule::Lemmatizer(r) => r.fmt(f),
        }
    }
}

/// Uma regra candidata com as suas contagens sobre o corpus inteiro.
#[derive(Clone, Debug, PartialEq)]
pub struct RuleCandidate {
    pub rule: Rule,
    pub good: usize,
    pub bad: usize,
}

/// Escolhe a melhor candidata.
///
/// Descarta as que têm `good / max(bad, 1) < minval`; entre as restantes,
/// maximiza `(good / (good + bad)) * (good / corpus_size) ^ coeff`. Em caso
/// de empate fica a primeira.
pub fn select_one(
    candidates: &[RuleCandidate],
    corpus_size: usize,
    minval: f64,
    coeff: f64,
) -> Option<(Rule, f64)> {
    if corpus_size == 0 {
        return None;
    }
    let mut best: Option<(&Rule, f64)> = None;
    for candidate in candidates {
        let good = candidate.good as f64;
        let bad = candidate.bad as f64;
        if good / bad.max(1.0) < minval {
            continue;
        }
        let score = (good / (good + bad)) * (good / corpus_size as f64).powf(coeff);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((&candidate.rule, score)),
        }
    }
    best.map(|(rule, score)| (rule.clone(), score))
}

/// Uma palavra ou etiqueta pode entrar numa regra (sem espaços nem aspas).
pub(crate) fn is_rule_field(s: &str) -> bool {
    !s.is_empty() && !s.contains(|c: char| c.is_whitespace() || c == '"')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Lexicon, Text};

    fn rule(s: &str) -> Rule {
        s.parse().unwrap()
    }

    // ─── seleção ───

    /// Razão good/bad abaixo do limiar elimina a candidata
    #[test]
    fn select_one_applies_minval() {
        let candidates = vec![
            RuleCandidate { rule: rule("SBC:sg VCJ:sg PREVTAG PRV:sg"), good: 5, bad: 2 },
            RuleCandidate { rule: rule("SBC:sg VCJ:sg NEXTTAG DTN:sg"), good: 6, bad: 2 },
        ];
        let (selected, score) = select_one(&candidates, 100, 3.0, 0.1).unwrap();
        assert_eq!(selected.to_string(), "SBC:sg VCJ:sg NEXTTAG DTN:sg");
        let expected = 0.75 * (0.06f64).powf(0.1);
        assert!((score - expected).abs() < 1e-12);
        assert!(select_one(&candidates[..1], 100, 3.0, 0.1).is_none());
    }

    /// Mais cobertura ganha quando a precisão é próxima
    #[test]
    fn select_one_balances_precision_and_coverage() {
        let candidates = vec![
            RuleCandidate { rule: rule("SBC:pl CHANGESUFFIX \"rs\" \"r\""), good: 15, bad: 0 },
            RuleCandidate { rule: rule("SBC:pl CHANGESUFFIX \"s\" \"\""), good: 179, bad: 18 },
        ];
        let (selected, _) = select_one(&candidates, 1000, 2.0, 0.1).unwrap();
        assert_eq!(selected.to_string(), "SBC:pl CHANGESUFFIX \"s\" \"\"");
    }

    /// Empate: a primeira encontrada vence
    #[test]
    fn select_one_first_maximum_wins() {
        let candidates = vec![
            RuleCandidate { rule: rule("A B PREVTAG X"), good: 4, bad: 0 },
            RuleCandidate { rule: rule("A B NEXTTAG X"), good: 4, bad: 0 },
        ];
        let (selected, _) = select_one(&candidates, 10, 3.0, 0.1).unwrap();
        assert_eq!(selected.to_string(), "A B PREVTAG X");
        assert!(select_one(&candidates, 0, 3.0, 0.1).is_none());
    }

    // ─── parsing ───

    #[test]
    fn parse_dispatches_on_template_name() {
        assert_eq!(rule("ment hassuf 4 ADV").family(), RuleFamily::Lexical);
        assert_eq!(rule("ADV re fdeletepref 2 VNCFF").family(), RuleFamily::Lexical);
        assert_eq!(rule("SBC:sg VCJ:sg PREVTAG PRV:sg").family(), RuleFamily::Contextual);
        assert_eq!(rule("SBC:pl MAKELOWER").family(), RuleFamily::Lemmatizer);
        assert_eq!(rule("la goodright SBC:sg").template().name(), "goodright");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(
            "SBC:sg VCJ:sg NOSUCH X".parse::<Rule>(),
            Err(Error::RuleParse { .. })
        ));
        assert!(Rule::parse_line("SBC:sg VCJ:sg PREVTAG", 7).is_err());
        assert!(matches!(
            "nosuch".parse::<Template>(),
            Err(Error::UnknownTemplate(_))
        ));
        assert_eq!("PREVTAG".parse::<Template>().unwrap().family(), RuleFamily::Contextual);
    }

    /// Um vizinho com nome de template de outra família não confunde a leitura
    #[test]
    fn parse_in_family_reads_neighbor_named_like_a_template() {
        let line = "SBC:sg MAKELOWER fgoodleft SBC:pl";
        let parsed = Rule::parse_in_family(RuleFamily::Lexical, line, 3).unwrap();
        assert_eq!(parsed.template().name(), "fgoodleft");
        assert_eq!(parsed.to_string(), line);
        assert_eq!(rule(line), parsed);

        let err = Rule::parse_in_family(RuleFamily::Lemmatizer, line, 3).unwrap_err();
        assert!(matches!(err, Error::RuleParse { line: 3, .. }));
        assert!(Rule::parse_in_family(RuleFamily::Contextual, "ment hassuf 4 ADV", 1).is_err());
        assert!(Rule::parse_in_family(RuleFamily::Lemmatizer, "SBC:pl", 1).is_err());
        assert!(Rule::parse_in_family(RuleFamily::Contextual, "", 1).is_err());
    }

    /// Toda regra gerada por todo template sobrevive à ida e volta textual
    #[test]
    fn generated_rules_round_trip() {
        let lexicon = Lexicon::parse(
            "rapide\tADJ:sg/rapide\nlente\tADJ:sg/lent\nvraiment\tADV/vraiment\n\
             lentement\tADV/lentement\nle\tDTN:sg/le\nchat\tSBC:sg/chat",
        )
        .unwrap();
        let text = Text::from_annotated(
            "le/DTN:sg chat/SBC:sg rapidement/ADV Chats/SBC:pl/chat dorment/VCJ:pl/dormir ./PUNCT",
        )
        .unwrap();
        let mut samples = text.into_samples();
        for sample in &mut samples {
            for pos in 0..sample.len() {
                sample.set_tag(pos, "SBC:sg");
            }
        }
        let mut total = 0;
        for family in [RuleFamily::Lexical, RuleFamily::Contextual, RuleFamily::Lemmatizer] {
            for template in family.templates() {
                for sample in &samples {
                    for pos in 0..sample.len() {
                        for r in template.make_rules(sample, pos, &lexicon) {
                            let again: Rule = r.to_string().parse().unwrap();
                            assert_eq!(again, r, "{r}");
                            assert_eq!(again.to_string(), r.to_string());
                            total += 1;
                        }
                    }
                }
            }
        }
        assert!(total > 50);
    }

    // ─── aplicação ───

    /// Reaplicar uma regra já satisfeita não muda nada
    #[test]
    fn apply_is_idempotent() {
        let lexicon = Lexicon::default();
        let mut samples = Text::from_annotated("Il/PRV:sg ferme/VCJ:sg la/DTN:sg porte/SBC:sg")
            .unwrap()
            .into_samples();
        for (pos, tag) in ["PRV:sg", "SBC:sg", "DTN:sg", "SBC:sg"].iter().enumerate() {
            samples[0].set_tag(pos, tag);
        }
        let r = rule("SBC:sg VCJ:sg PREVTAG PRV:sg");
        assert_eq!(r.apply(&mut samples, &lexicon), 1);
        assert_eq!(samples[0][1].tag(), "VCJ:sg");

        assert!(samples[0].get_errors(Label::Tag).is_empty());
        assert_eq!(r.apply(&mut samples, &lexicon), 0);
        assert!(!samples[0].is_trainer_candidate());
    }

    #[test]
    fn test_scores_wrong_to_right_and_right_to_wrong() {
        let lexicon = Lexicon::default();
        let mut samples = Text::from_annotated("Il/PRV:sg ferme/VCJ:sg la/DTN:sg ferme/SBC:sg")
            .unwrap()
            .into_samples();
        for (pos, tag) in ["PRV:sg", "SBC:sg", "DTN:sg", "SBC:sg"].iter().enumerate() {
            samples[0].set_tag(pos, tag);
        }
        let r = rule("SBC:sg VCJ:sg CURWD ferme");
        assert_eq!(r.test(&samples[0], 1, &lexicon), RuleTest::Good);
        assert_eq!(r.test(&samples[0], 3, &lexicon), RuleTest::Bad);
        assert_eq!(r.test(&samples[0], 0, &lexicon), RuleTest::Neutral);
        assert_eq!(r.test(&samples[0], 3, &lexicon).value(), -1);
        assert_eq!(r.count(&samples, &lexicon), (1, 1));
    }

    /// Regras léxicas só pontuam sobre palavras fora do léxico
    #[test]
    fn lexical_count_skips_known_words() {
        let lexicon = Lexicon::parse("bras\tSBC:sg/bras SBC:pl/bras\n.\tPUNCT/.").unwrap();
        let mut samples = Text::from_annotated(
            "bras/SBC:pl ./PUNCT bras/SBC:pl ./PUNCT foos/SBC:pl ./PUNCT zzs/SBC:sg ./PUNCT",
        )
        .unwrap()
        .into_samples();
        for sample in &mut samples {
            for pos in 0..sample.len() {
                let tag = if sample[pos].original() == "." { "PUNCT" } else { "SBC:sg" };
                sample.set_tag(pos, tag);
            }
        }
        let r = rule(". goodleft SBC:pl");
        // os dois "bras" seriam corrigidos, mas não contam
        assert_eq!(r.count(&samples, &lexicon), (1, 1));
        assert_eq!(r.count(&samples, &Lexicon::default()), (3, 1));

        let contextual = rule("SBC:sg SBC:pl NEXTWD .");
        assert_eq!(contextual.count(&samples, &lexicon), (3, 1));
    }

    /// As propostas usam o estado anterior à aplicação
    #[test]
    fn apply_uses_snapshot() {
        let lexicon = Lexicon::default();
        let mut samples = Text::from_words(["a", "b", "c"]).into_samples();
        for pos in 0..3 {
            samples[0].set_tag(pos, "X");
        }
        // Cada token precedido de X vira Y: em cascata, só "b" mudaria.
        let r = rule("X Y PREVTAG X");
        assert_eq!(r.apply(&mut samples, &lexicon), 2);
        assert_eq!(samples[0][1].tag(), "Y");
        assert_eq!(samples[0][2].tag(), "Y");
    }
}
