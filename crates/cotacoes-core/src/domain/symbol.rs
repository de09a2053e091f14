use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_SYMBOL_LEN: usize = 15;

/// Normalized ticker used to address the detail endpoint.
///
/// Accepted shapes, all stored uppercase:
///
/// | Shape | Example |
/// |-------|---------|
/// | B3 share class: four letters, class digit | `PETR4`, `VALE3` |
/// | Unit, fund or BDR: two-digit suffix | `TAEE11`, `KNRI11`, `AAPL34` |
/// | Fractional lot: trailing `F` | `PETR4F` |
/// | Index: leading caret | `^BVSP` |
/// | Exchange-qualified | `PETR4.SA` |
///
/// Only the character set is checked; whether the ticker is listed is for
/// the detail endpoint to answer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let normalized = input.trim().to_ascii_uppercase();
        if normalized.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }

        let len = normalized.chars().count();
        if len > MAX_SYMBOL_LEN {
            return Err(ValidationError::SymbolTooLong {
                len,
                max: MAX_SYMBOL_LEN,
            });
        }

        if let Some((index, ch)) = normalized
            .chars()
            .enumerate()
            .find(|&(index, ch)| !is_symbol_char(index, ch))
        {
            return Err(ValidationError::SymbolInvalidChar { ch, index });
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_symbol_char(index: usize, ch: char) -> bool {
    match ch {
        '^' => index == 0,
        '.' | '-' => true,
        _ => ch.is_ascii_alphanumeric(),
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Symbol {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}
