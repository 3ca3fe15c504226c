//! # Módulo Textmining — Key-Entities e Descritores
//!
//! Transforma um texto etiquetado e lematizado em expressões-chave
//! ("key-entities") pontuadas e, com a ajuda de um tesauro, em descritores.
//!
//! | Sub-módulo | Responsabilidade |
//! |------------|------------------|
//! | [`stemmed_text`] | Agrupa tokens por `(lema, família da etiqueta)` |
//! | [`keyentity`] | Métricas de confiança e ordem parcial entre entidades |
//! | [`semantical_tagger`] | N-grams, keystems, deduplicação, triggers, descritores |
//!
//! ## Exemplo de Uso
//!
//! ```rust,ignore
//! use semantic_tagger::textmining::{SemanticalTagger, StemmedText};
//!
//! let text = StemmedText::new(raw, &tagger, &lemmatizer)?;
//! let mut semantical = SemanticalTagger::new(text, NgramOptions::default());
//! semantical.deduplicate_keyentities();
//! for ke in semantical.keyentities() {
//!     println!("{ke} {:.3}", ke.confidence());
//! }
//! ```

/// Texto agrupado por lemas.
pub mod stemmed_text;

/// Key-entities e as suas métricas.
pub mod keyentity;

/// Extração de key-entities e cálculo de descritores.
pub mod semantical_tagger;

pub use keyentity::{Confidences, KeyEntity};
pub use semantical_tagger::{Ngram, SemanticalTagger};
pub use stemmed_text::{Stem, StemId, StemmedText};

#[cfg(test)]
pub(crate) mod fixtures {
    use std::sync::Arc;

    use super::StemmedText;
    use crate::core::Lexicon;
    use crate::tagger::{Lemmatizer, PosTagger};

    pub(crate) const LEXICON: &str = "Une\tDTN:sg/un\n\
        autre\tDTN:sg/autre\n\
        avec\tPREP/avec\n\
        dingue\tADJ:sg/dingue\n\
        le\tDTN:sg/le\n\
        mot\tSBC:sg/mot\n\
        mots\tSBC:pl/mot\n\
        même\tADJ:sg/même\n\
        phrase\tSBC:sg/phrase\n\
        un\tDTN:sg/un\n\
        .\tPUNCT/.";

    pub(crate) const SCENARIO: &str =
        "Une phrase avec un mot dingue. Une autre phrase avec le même mot dingue.";

    pub(crate) fn scenario() -> StemmedText {
        let lexicon: Arc<Lexicon> = Arc::new(Lexicon::parse(LEXICON).unwrap());
        let tagger = PosTagger::new(lexicon.clone());
        let lemmatizer = Lemmatizer::new(lexicon, Vec::new());
        StemmedText::new(SCENARIO, &tagger, &lemmatizer).unwrap()
    }
}
