use super::{CommandError, Result};

const UNICODE_DASHES: [char; 9] = [
    '\u{2010}', '\u{2011}', '\u{2012}', '\u{2013}', '\u{2014}', '\u{2015}', '\u{2212}', '\u{fe63}',
    '\u{ff0d}',
];

/// Replaces non-ascii dash characters with `-`. Returns `None` when nothing changed.
pub fn normalize_hyphens(token: &str) -> Option<String> {
    if !token.contains(UNICODE_DASHES) {
        return None;
    }
    Some(token.replace(UNICODE_DASHES, "-"))
}

/// Sequential view over the command-line tokens, with one step of undo.
#[derive(Debug, Clone, Default)]
pub struct TokenCursor {
    tokens: Vec<String>,
    index: usize,
}

impl TokenCursor {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
            index: 0,
        }
    }

    pub fn has_next(&self) -> bool {
        self.index < self.tokens.len()
    }

    pub fn peek(&self) -> Option<&str> {
        self.tokens.get(self.index).map(String::as_str)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn remaining(&self) -> &[String] {
        &self.tokens[self.index.min(self.tokens.len())..]
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn next_string(&mut self, name: &str) -> Result<String> {
        let token = self
            .tokens
            .get(self.index)
            .cloned()
            .ok_or_else(|| CommandError::MissingArgument(name.to_string()))?;
        self.index += 1;
        Ok(token)
    }

    pub fn next_bool(&mut self, name: &str) -> Result<bool> {
        let token = self.next_string(name)?;
        match token.to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(CommandError::type_mismatch(name, token, "Boolean")),
        }
    }

    pub fn next_int(&mut self, name: &str) -> Result<i64> {
        let token = self.next_string(name)?;
        token
            .parse::<i64>()
            .map_err(|_| CommandError::type_mismatch(name, token, "Integer"))
    }

    pub fn next_double(&mut self, name: &str) -> Result<f64> {
        let token = self.next_string(name)?;
        token
            .parse::<f64>()
            .map_err(|_| CommandError::type_mismatch(name, token, "Floating Point"))
    }

    pub fn advance(&mut self) {
        if self.has_next() {
            self.index += 1;
        }
    }

    pub fn backup(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    pub fn rewind(&mut self) {
        self.index = 0;
    }

    /// Deletes the token under the cursor; the following token takes its place.
    pub fn remove(&mut self) -> Option<String> {
        if self.has_next() {
            Some(self.tokens.remove(self.index))
        } else {
            None
        }
    }
}
