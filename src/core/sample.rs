//! # Sample — Uma Frase do Texto
//!
//! A [`Sample`] é dona de uma sequência ordenada de [`Token`]s e é o único
//! caminho para mudar a etiqueta ou o lema de um token. Isso permite manter
//! os dois caches usados pelo treinamento sempre coerentes:
//!
//! | Cache | Significado |
//! |-------|-------------|
//! | `trainer_candidate` | a frase ainda pode conter erros não corrigidos |
//! | `trainer_processed` | posições já testadas sem regra aplicável |
//!
//! Sempre que um rótulo **muda de valor**, os dois caches são reiniciados.
//! Reescrever o mesmo valor não toca nos caches, o que torna a reaplicação
//! de uma regra já satisfeita idempotente.

use std::collections::BTreeSet;
use std::ops::Index;

use super::token::{Label, Token};

/// Uma frase: sequência de tokens só de acréscimo.
#[derive(Clone, Debug)]
pub struct Sample {
    id: usize,
    tokens: Vec<Token>,
    trainer_candidate: bool,
    trainer_processed: BTreeSet<usize>,
}

impl Sample {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            tokens: Vec::new(),
            trainer_candidate: true,
            trainer_processed: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Acrescenta um token, fixando sua posição e a sample dona.
    pub fn append(&mut self, mut token: Token) {
        token.position = self.tokens.len();
        token.sample = self.id;
        self.tokens.push(token);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn get(&self, position: usize) -> Option<&Token> {
        self.tokens.get(position)
    }

    pub fn has_position(&self, position: isize) -> bool {
        position >= 0 && (position as usize) < self.tokens.len()
    }

    /// Vizinhos do token em `position`, nos deslocamentos pedidos.
    ///
    /// Se **algum** deslocamento cair fora da frase, devolve vazio (nunca
    /// uma lista parcial).
    pub fn get_neighbors(&self, position: usize, offsets: &[isize]) -> Vec<&Token> {
        let mut neighbors = Vec::with_capacity(offsets.len());
        for offset in offsets {
            let target = position as isize + offset;
            if !self.has_position(target) {
                return Vec::new();
            }
            neighbors.push(&self.tokens[target as usize]);
        }
        neighbors
    }

    /// Muda um rótulo; devolve `true` se o valor mudou.
    ///
    /// Uma mudança real reinicia o estado de treinamento da frase.
    pub fn set_label(&mut self, position: usize, label: Label, value: &str) -> bool {
        let Some(token) = self.tokens.get_mut(position) else {
            return false;
        };
        if token.label(label) == value {
            return false;
        }
        token.set_label(label, value.to_string());
        self.reset_trainer_status();
        true
    }

    pub fn set_tag(&mut self, position: usize, tag: &str) -> bool {
        self.set_label(position, Label::Tag, tag)
    }

    pub fn set_lemme(&mut self, position: usize, lemme: &str) -> bool {
        self.set_label(position, Label::Lemme, lemme)
    }

    /// Posições com rótulo diferente do verificado, ignorando as já
    /// processadas. Uma frase sem erros fica marcada como limpa e não é
    /// mais varrida até mudar.
    pub fn get_errors(&mut self, label: Label) -> Vec<usize> {
        if !self.trainer_candidate {
            return Vec::new();
        }
        let errors: Vec<usize> = self
            .tokens
            .iter()
            .filter(|t| t.is_error(label) && !self.trainer_processed.contains(&t.position))
            .map(|t| t.position)
            .collect();
        if errors.is_empty() {
            self.trainer_candidate = false;
        }
        errors
    }

    pub fn reset_trainer_status(&mut self) {
        self.trainer_candidate = true;
        self.trainer_processed.clear();
    }

    /// Marca uma posição como testada sem regra aplicável.
    pub fn set_trained_position(&mut self, position: usize) {
        self.trainer_processed.insert(position);
    }

    pub fn is_trainer_candidate(&self) -> bool {
        self.trainer_candidate
    }

    pub fn meaning_words_count(&self) -> usize {
        self.tokens.iter().filter(|t| t.has_meaning()).count()
    }

    /// Até cinco tokens de cada lado da posição, para logs.
    pub fn show_context(&self, position: usize) -> String {
        let begin = position.saturating_sub(5);
        let end = (position + 5).min(self.tokens.len());
        self.tokens[begin.min(end)..end]
            .iter()
            .map(Token::repr)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Index<usize> for Sample {
    type Output = Token;

    fn index(&self, position: usize) -> &Token {
        &self.tokens[position]
    }
}

impl<'a> IntoIterator for &'a Sample {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
