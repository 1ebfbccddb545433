//! Decoders turning a solver's raw textual answer into canonical entities.
//!
//! Two grammar variants exist, matching the two generations of ICCMA
//! competition output formats: a single-line one, in which whitespace is
//! not significant, and a multi-line one, in which each line is a token.
//! Decoders only report syntax errors; comparing a well-formed answer
//! with the ground truth is the checkers' job.

mod multi_line;
pub use multi_line::MultiLineDecoder;

mod single_line;
pub use single_line::SingleLineDecoder;

use crate::aa::{ArgumentSetId, EntityStore, ExtensionSetId, Query};
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt::Display;

lazy_static! {
    static ref ARG_NAME_PATTERN: Regex = Regex::new(r"^[a-zA-Z0-9]+$").unwrap();
}

/// An error raised when a solver answer does not follow the expected grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    text: String,
    reason: String,
}

impl SyntaxError {
    pub(crate) fn new(text: &str, reason: &str) -> Self {
        SyntaxError {
            text: text.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Returns the offending text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            r#"syntax error in solver output "{}": {}"#,
            self.text, self.reason
        )
    }
}

impl std::error::Error for SyntaxError {}

/// The result of a decoding operation.
pub type DecodingResult<T> = Result<T, SyntaxError>;

/// A trait implemented by objects able to decode solver answers.
///
/// Decoded sets are interned in the provided [`EntityStore`], so the
/// checkers can compare them with the ground truth by handle equality.
pub trait OutputDecoder {
    /// Returns `true` iff the text is the acceptance token.
    fn is_true(&self, text: &str) -> bool;

    /// Returns `true` iff the text is the non-acceptance token.
    fn is_false(&self, text: &str) -> bool;

    /// Returns `true` iff the text is the no-extension token.
    fn is_no_extension(&self, text: &str) -> bool;

    /// Decodes a single extension.
    fn read_extension(&self, text: &str, store: &mut EntityStore)
        -> DecodingResult<ArgumentSetId>;

    /// Decodes an extension set.
    fn read_extension_set(
        &self,
        text: &str,
        store: &mut EntityStore,
    ) -> DecodingResult<ExtensionSetId>;

    /// Decodes the grounded, stable and preferred extension sets of a combined-track answer.
    fn read_triple(
        &self,
        text: &str,
        store: &mut EntityStore,
    ) -> DecodingResult<[ExtensionSetId; 3]>;

    /// Splits a dynamic-track answer into one raw chunk per query step.
    fn split_dynamic(&self, text: &str, query: Query) -> DecodingResult<Vec<String>>;
}

/// The available output grammars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderVariant {
    /// The single-line grammar (whitespace is not significant)
    SingleLine,
    /// The multi-line grammar (each line is a token)
    MultiLine,
}

impl DecoderVariant {
    /// Returns the decoder implementing this grammar.
    pub fn decoder(&self) -> Box<dyn OutputDecoder> {
        match self {
            DecoderVariant::SingleLine => Box::new(SingleLineDecoder),
            DecoderVariant::MultiLine => Box::new(MultiLineDecoder),
        }
    }
}

impl TryFrom<&str> for DecoderVariant {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "single-line" => Ok(DecoderVariant::SingleLine),
            "multi-line" => Ok(DecoderVariant::MultiLine),
            _ => Err(anyhow::anyhow!(r#"undefined output format "{}""#, value)),
        }
    }
}

pub(crate) fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Parses the content of a whitespace-free `[a,b,c]` extension.
pub(crate) fn parse_extension(
    text: &str,
    store: &mut EntityStore,
) -> DecodingResult<ArgumentSetId> {
    let inner = text
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .ok_or_else(|| SyntaxError::new(text, "an extension must be enclosed in brackets"))?;
    if inner.is_empty() {
        return Ok(store.argument_set(&[]));
    }
    let mut args = Vec::new();
    for token in inner.split(',') {
        if !ARG_NAME_PATTERN.is_match(token) {
            return Err(SyntaxError::new(
                text,
                &format!(r#"invalid argument name "{}""#, token),
            ));
        }
        args.push(store.argument(token));
    }
    Ok(store.argument_set(&args))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_display() {
        let e = SyntaxError::new("foo", "bar");
        assert_eq!(r#"syntax error in solver output "foo": bar"#, format!("{}", e));
        assert_eq!("foo", e.text());
    }

    #[test]
    fn test_parse_extension_ok() {
        let mut store = EntityStore::default();
        let a = store.argument("a");
        let b = store.argument("b");
        let expected = store.argument_set(&[a, b]);
        assert_eq!(expected, parse_extension("[a,b]", &mut store).unwrap());
        let empty = store.argument_set(&[]);
        assert_eq!(empty, parse_extension("[]", &mut store).unwrap());
    }

    #[test]
    fn test_parse_extension_errors() {
        let mut store = EntityStore::default();
        assert!(parse_extension("a,b", &mut store).is_err());
        assert!(parse_extension("[a,b", &mut store).is_err());
        assert!(parse_extension("[a,,b]", &mut store).is_err());
        assert!(parse_extension("[a,b!]", &mut store).is_err());
    }

    #[test]
    fn test_decoder_variant_from_str() {
        assert_eq!(
            DecoderVariant::SingleLine,
            DecoderVariant::try_from("single-line").unwrap()
        );
        assert_eq!(
            DecoderVariant::MultiLine,
            DecoderVariant::try_from("Multi-Line").unwrap()
        );
        assert!(DecoderVariant::try_from("foo").is_err());
    }
}
