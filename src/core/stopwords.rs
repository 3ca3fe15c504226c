//! Palavras vazias do francês.
//!
//! - [`STOP_WORDS`]: não acrescentam sentido à entidade ou frase em que aparecem.
//! - [`is_usual_word`]: stopwords + palavras muito comuns, com pouca chance de
//!   serem palavras-chave.

/// Stopwords do francês.
pub const STOP_WORDS: &[&str] = &[
    "a", "à", "après", "au", "aux", "avec", "ce", "ces", "comme", "dans", "de", "des", "du",
    "elle", "en", "entre", "et", "eux", "il", "je", "jusque", "jusqu", "la", "le", "leur", "lui",
    "lors", "ma", "mais", "me", "même", "mes", "moi", "mon", "ne", "nos", "notre", "nous", "on",
    "ou", "où", "par", "pas", "pour", "qu", "que", "qui", "sa", "se", "ses", "son", "sur", "ta",
    "te", "tes", "toi", "ton", "tu", "un", "une", "vos", "votre", "vous", "c", "d", "j", "l", "m",
    "n", "s", "t", "y", "été", "étée", "étées", "étés", "étant", "suis", "es", "est", "sommes",
    "êtes", "sont", "serai", "seras", "sera", "serons", "serez", "seront", "serais", "serait",
    "serions", "seriez", "seraient", "étais", "était", "étions", "étiez", "étaient", "fus", "fut",
    "fûmes", "fûtes", "furent", "sois", "soit", "soyons", "soyez", "soient", "fusse", "fusses",
    "fût", "fussions", "fussiez", "fussent", "ayant", "eu", "eue", "eues", "eus", "ai", "as",
    "avons", "avez", "ont", "aurai", "auras", "aura", "aurons", "aurez", "auront", "aurais",
    "aurait", "aurions", "auriez", "auraient", "avais", "avait", "avions", "aviez", "avaient",
    "eut", "eûmes", "eûtes", "eurent", "aie", "aies", "ait", "ayons", "ayez", "aient", "eusse",
    "eusses", "eût", "eussions", "eussiez", "eussent", "ceci", "celà", "cet", "cette", "ici",
    "ils", "les", "leurs", "quel", "quels", "quelle", "quelles", "sans", "soi", "quelque",
    "quelques", "si", "jusqu'au", "jusqu'à", "jusqu’au", "jusqu’à", "alors", "ça", "fait",
    "faite", "faits", "faites", "qu'",
];

/// Palavras comuns além das stopwords.
const EXTRA_USUAL_WORDS: &[&str] = &[
    "pourquoi", "chez", "avant", "après", "plus", "ensuite", "autant", "surtout", "plutôt", "car",
    "toujours", "encore", "parmi", "malgré", "depuis", "donc", "tout", "tous", "toute", "toutes",
    "aussi", "très", "avoir", "faire", "quant",
];

/// `true` se a palavra é uma stopword.
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// `true` se a palavra é uma stopword ou uma palavra muito comum.
pub fn is_usual_word(word: &str) -> bool {
    is_stop_word(word) || EXTRA_USUAL_WORDS.contains(&word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usual_words_include_stop_words() {
        assert!(is_stop_word("avec"));
        assert!(is_usual_word("avec"));
        assert!(is_usual_word("toujours"));
        assert!(!is_stop_word("toujours"));
        assert!(!is_usual_word("phrase"));
    }
}
