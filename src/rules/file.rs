//! # Arquivos de Regras
//!
//! Uma regra por linha, na ordem em que foram aprendidas (a ordem é o
//! modelo: o tagger aplica as regras exatamente nessa sequência).
//!
//! | Família | Linha |
//! |---------|-------|
//! | léxica | `regra\tscore` |
//! | contextual | `regra` |
//! | lematizador | `regra\tscore` |
//!
//! A pontuação é informativa: é lida só para validar o formato. Cada
//! linha é lida como regra da família do arquivo, nunca adivinhada pelo
//! nome do template.

use std::path::Path;

use super::{Rule, RuleFamily};
use crate::errors::{Error, Result};
use crate::persistence::write_atomic;

/// Lê um arquivo de regras de uma família, preservando a ordem.
pub fn parse_rules(family: RuleFamily, content: &str) -> Result<Vec<Rule>> {
    let mut rules = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let (body, score) = match line.split_once('\t') {
            Some((body, score)) => (body, Some(score.trim())),
            None => (line, None),
        };
        let body = body.trim();
        if body.is_empty() {
            continue;
        }
        if let Some(score) = score.filter(|s| !s.is_empty()) {
            score
                .parse::<f64>()
                .map_err(|_| Error::rule_parse(line_no, format!("invalid score {score:?}")))?;
        }
        rules.push(Rule::parse_in_family(family, body, line_no)?);
    }
    Ok(rules)
}

/// Serializa regras pontuadas, na ordem recebida.
pub fn export_rules(family: RuleFamily, rules: &[(Rule, f64)]) -> String {
    rules
        .iter()
        .map(|(rule, score)| {
            if family.exports_scores() {
                format!("{rule}\t{score:.6}")
            } else {
                rule.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn load_rules(family: RuleFamily, path: impl AsRef<Path>) -> Result<Vec<Rule>> {
    let path = path.as_ref();
    let rules = parse_rules(family, &std::fs::read_to_string(path)?)?;
    tracing::info!(%family, path = %path.display(), count = rules.len(), "Regras carregadas");
    Ok(rules)
}

/// Grava de forma atômica: um arquivo de regras nunca fica pela metade.
pub fn save_rules(family: RuleFamily, rules: &[(Rule, f64)], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    write_atomic(path, &export_rules(family, rules))?;
    tracing::info!(%family, path = %path.display(), count = rules.len(), "Regras salvas");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(s: &str) -> Rule {
        s.parse().unwrap()
    }

    #[test]
    fn lexical_rules_carry_scores() {
        let rules = vec![
            (rule("ment hassuf 4 ADV"), 0.912345678),
            (rule("SBC:sg re fdeletepref 2 VNCFF"), 0.5),
        ];
        let exported = export_rules(RuleFamily::Lexical, &rules);
        assert_eq!(
            exported,
            "ment hassuf 4 ADV\t0.912346\nSBC:sg re fdeletepref 2 VNCFF\t0.500000"
        );
        let parsed = parse_rules(RuleFamily::Lexical, &exported).unwrap();
        assert_eq!(parsed, vec![rules[0].0.clone(), rules[1].0.clone()]);
    }

    #[test]
    fn contextual_rules_are_bare() {
        let rules = vec![(rule("SBC:sg VCJ:sg PREVTAG PRV:sg"), 0.7)];
        assert_eq!(
            export_rules(RuleFamily::Contextual, &rules),
            "SBC:sg VCJ:sg PREVTAG PRV:sg"
        );
    }

    /// A ordem do arquivo é a ordem de aplicação
    #[test]
    fn parse_keeps_file_order_and_skips_blank_lines() {
        let content = "SBC:pl CHANGESUFFIX \"s\" \"\"\t0.9\n\nSBP:sg MAKELOWER\t0.95\n";
        let rules = parse_rules(RuleFamily::Lemmatizer, content).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[1].to_string(), "SBP:sg MAKELOWER");
    }

    #[test]
    fn parse_reports_line_number_and_family_mismatch() {
        let err = parse_rules(RuleFamily::Contextual, "A B PREVTAG X\nA B PREVTAG").unwrap_err();
        assert!(matches!(err, Error::RuleParse { line: 2, .. }));

        let err = parse_rules(RuleFamily::Contextual, "ment hassuf 4 ADV").unwrap_err();
        assert!(matches!(err, Error::RuleParse { line: 1, .. }));

        assert!(parse_rules(RuleFamily::Lexical, "ment hassuf 4 ADV\tabc").is_err());
    }

    #[test]
    fn save_and_load_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus").join("contextual_rules.rls");
        let rules = vec![
            (rule("SBC:sg VCJ:sg PREVTAG PRV:sg"), 1.0),
            (rule("ADJ:sg SBC:sg NEXT1OR2WD de"), 1.0),
        ];
        save_rules(RuleFamily::Contextual, &rules, &path).unwrap();
        let loaded = load_rules(RuleFamily::Contextual, &path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[1], rules[1].0);
    }

    /// Uma palavra vizinha com nome de template do lematizador continua léxica
    #[test]
    fn lexical_file_keeps_neighbor_words_named_like_templates() {
        let content = "SBC:sg MAKELOWER fgoodleft SBC:pl\t0.8\nment hassuf 4 ADV\t0.5";
        let rules = parse_rules(RuleFamily::Lexical, content).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].family(), RuleFamily::Lexical);
        assert_eq!(rules[0].template().name(), "fgoodleft");

        let err = parse_rules(RuleFamily::Lemmatizer, content).unwrap_err();
        assert!(matches!(err, Error::RuleParse { line: 1, .. }));
    }

    /// Regravar substitui o arquivo inteiro sem deixar o temporário para trás
    #[test]
    fn save_replaces_file_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lexical_rules.rls");
        let first = vec![(rule("ment hassuf 4 ADV"), 0.9), (rule("s hassuf 1 SBC:pl"), 0.7)];
        save_rules(RuleFamily::Lexical, &first, &path).unwrap();
        let second = vec![(rule("SBC:sg MAKELOWER fgoodleft SBC:pl"), 0.8)];
        save_rules(RuleFamily::Lexical, &second, &path).unwrap();

        let loaded = load_rules(RuleFamily::Lexical, &path).unwrap();
        assert_eq!(loaded, vec![second[0].0.clone()]);
        assert!(!path.with_extension("tmp").exists());
        let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }
}
