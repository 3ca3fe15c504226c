//! # Utilidades de Texto — Normalização e Tokenização do Francês
//!
//! Primeira etapa do pipeline: o texto bruto é limpo e quebrado em tokens
//! antes de virar um [`Text`](super::Text).
//!
//! ```text
//! texto bruto
//!   ├── 1. NFC (unicode-normalization)
//!   ├── 2. Remove tags HTML, resolve entidades (&amp; …)
//!   ├── 3. ’ → '   e   qu' → "qu' "
//!   ├── 4. Aspas retas → « »
//!   ├── 5. Pronomes invertidos: "viendra-t-il" → "viendra - t - il"
//!   └── 6. tokenize_text() → Vec<String>
//! ```
//!
//! Também concentra os helpers de afixo por **caractere** (não por byte),
//! usados pelo léxico e pelos templates léxicos.

use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Alternativas do tokenizador, em ordem de prioridade (leftmost-first).
const TOKEN_PATTERNS: &[&str] = &[
    r"c'est-à-dire",
    r"[A-Z]\.",
    r"\d+(?:[,. ]\d+)*",
    r"\$\d+(?:\.\d{2})?",
    r"%",
    r"…",
    r#"[«»"]"#,
    r"[,.:()!\-?\[\];]",
    r"\w['’]",
    r"qu['’]",
    r"[\w’'\-]+",
];

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&TOKEN_PATTERNS.join("|")).expect("invalid regex"))
}

fn html_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("invalid regex"))
}

/// Regexes de aspas e pronomes invertidos, compiladas uma vez.
struct Normalizers {
    opening_quote: Regex,
    closing_quote: Regex,
    inverted_t: Regex,
    inverted_pronoun: Regex,
}

fn normalizers() -> &'static Normalizers {
    static RE: OnceLock<Normalizers> = OnceLock::new();
    RE.get_or_init(|| Normalizers {
        opening_quote: Regex::new(r#"(")([^ \n.,!?])"#).expect("invalid regex"),
        closing_quote: Regex::new(r#"([^ \n])(")"#).expect("invalid regex"),
        inverted_t: Regex::new(r"-t-").expect("invalid regex"),
        inverted_pronoun: Regex::new(
            r"-(je|moi|tu|toi|il|le|elle|la|on|nous|vous|ils|elles|les|ci|là|ce)(\W|$)",
        )
        .expect("invalid regex"),
    })
}

/// Normaliza um texto francês para a tokenização.
pub fn normalize_text(text: &str) -> String {
    let re = normalizers();
    let text: String = text.nfc().collect();
    let text = html_tag_re().replace_all(&text, "");
    let text = unescape_entities(&text)
        .replace('’', "'")
        .replace("qu'", "qu' ");

    let text = re.opening_quote.replace_all(&text, "«$2");
    let text = re.closing_quote.replace_all(&text, "$1»");
    let text = re.inverted_t.replace_all(&text, " - t - ");
    re.inverted_pronoun.replace_all(&text, " - $1$2").into_owned()
}

/// Resolve as entidades HTML mais comuns.
fn unescape_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&rsquo;", "'")
        .replace("&laquo;", "«")
        .replace("&raquo;", "»")
        .replace("&amp;", "&")
}

/// Quebra um texto (já normalizado) em tokens.
pub fn tokenize_text(text: &str) -> Vec<String> {
    token_re()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Capitalização "moderna": `Paris`, `al-Assad`, `el-Assad`, `iPhone`, `eMac`.
pub fn modern_istitle(word: &str) -> bool {
    let chars: Vec<char> = word.chars().collect();
    match chars.first() {
        None => false,
        Some(c) if c.is_uppercase() => true,
        Some(_) => {
            let after = |n: usize| chars.get(n).is_some_and(|c| c.is_uppercase());
            if (word.starts_with("al-") || word.starts_with("el-")) && after(3) {
                return true;
            }
            matches!(chars[0], 'e' | 'i') && after(1)
        }
    }
}

/// Número de caracteres (não bytes).
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Os `n` primeiros caracteres de `s` (ou `s` inteiro se for mais curto).
pub fn first_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Os `n` últimos caracteres de `s` (ou `s` inteiro se for mais curto).
pub fn last_chars(s: &str, n: usize) -> &str {
    let len = char_len(s);
    if n >= len {
        return s;
    }
    match s.char_indices().nth(len - n) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}

/// Remove os `n` últimos caracteres.
pub fn drop_last_chars(s: &str, n: usize) -> &str {
    let len = char_len(s);
    first_chars(s, len.saturating_sub(n))
}

/// Remove os `n` primeiros caracteres.
pub fn drop_first_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[idx..],
        None => "",
    }
}
