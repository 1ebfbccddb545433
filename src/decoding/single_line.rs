use super::{parse_extension, strip_whitespace, DecodingResult, OutputDecoder, SyntaxError};
use crate::aa::{ArgumentSetId, EntityStore, ExtensionSetId, Query};

/// The decoder for the single-line output grammar.
///
/// In this grammar, whitespace is not significant and is stripped before
/// parsing.
/// An extension is a bracketed, comma-separated list of argument names;
/// an extension set is a bracketed, comma-separated list of extensions.
/// A combined-track answer is made of three comma-separated extension
/// sets.
pub struct SingleLineDecoder;

impl OutputDecoder for SingleLineDecoder {
    fn is_true(&self, text: &str) -> bool {
        strip_whitespace(text) == "YES"
    }

    fn is_false(&self, text: &str) -> bool {
        strip_whitespace(text) == "NO"
    }

    fn is_no_extension(&self, text: &str) -> bool {
        strip_whitespace(text) == "NO"
    }

    fn read_extension(
        &self,
        text: &str,
        store: &mut EntityStore,
    ) -> DecodingResult<ArgumentSetId> {
        parse_extension(&strip_whitespace(text), store)
    }

    fn read_extension_set(
        &self,
        text: &str,
        store: &mut EntityStore,
    ) -> DecodingResult<ExtensionSetId> {
        let stripped = strip_whitespace(text);
        let groups = slice_top_level_groups(&stripped)?;
        if groups.len() != 1 {
            return Err(SyntaxError::new(
                text,
                &format!("expected a single extension set, got {}", groups.len()),
            ));
        }
        parse_extension_set(&groups[0], store)
    }

    fn read_triple(
        &self,
        text: &str,
        store: &mut EntityStore,
    ) -> DecodingResult<[ExtensionSetId; 3]> {
        let stripped = strip_whitespace(text);
        let groups = slice_top_level_groups(&stripped)?;
        if groups.len() != 3 {
            return Err(SyntaxError::new(
                text,
                &format!("expected three extension sets, got {}", groups.len()),
            ));
        }
        let grounded = parse_extension_set(&groups[0], store)?;
        let stable = parse_extension_set(&groups[1], store)?;
        let preferred = parse_extension_set(&groups[2], store)?;
        Ok([grounded, stable, preferred])
    }

    fn split_dynamic(&self, text: &str, query: Query) -> DecodingResult<Vec<String>> {
        match query {
            Query::EE => slice_group_sequence(&strip_whitespace(text)),
            _ => Ok(text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect()),
        }
    }
}

/// Parses a whitespace-free `[[a],[b,c]]` extension set.
fn parse_extension_set(text: &str, store: &mut EntityStore) -> DecodingResult<ExtensionSetId> {
    let inner = text
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .ok_or_else(|| SyntaxError::new(text, "an extension set must be enclosed in brackets"))?;
    let extensions = slice_top_level_groups(inner)?
        .iter()
        .map(|group| parse_extension(group, store))
        .collect::<DecodingResult<Vec<ArgumentSetId>>>()?;
    Ok(store.extension_set(&extensions))
}

/// Slices a whitespace-free text into its top-level bracket-balanced groups.
///
/// Groups are separated by commas; any other character at nesting depth 0
/// is a syntax error, as are unbalanced brackets.
fn slice_top_level_groups(text: &str) -> DecodingResult<Vec<String>> {
    slice_groups(text, true)
}

/// Slices a whitespace-free sequence of bracket-balanced groups.
///
/// This is the grammar of dynamic enumeration answers: one group per
/// query step, with no separator in between (a comma is tolerated).
fn slice_group_sequence(text: &str) -> DecodingResult<Vec<String>> {
    slice_groups(text, false)
}

fn slice_groups(text: &str, require_separator: bool) -> DecodingResult<Vec<String>> {
    let mut groups = Vec::new();
    let mut depth = 0usize;
    let mut group_start = None;
    let mut expect_separator = false;
    for (i, c) in text.char_indices() {
        match c {
            '[' => {
                if depth == 0 {
                    if expect_separator && require_separator {
                        return Err(SyntaxError::new(text, "missing separator between groups"));
                    }
                    group_start = Some(i);
                    expect_separator = false;
                }
                depth += 1;
            }
            ']' => {
                if depth == 0 {
                    return Err(SyntaxError::new(text, "unbalanced brackets"));
                }
                depth -= 1;
                if depth == 0 {
                    groups.push(text[group_start.unwrap()..=i].to_string());
                    expect_separator = true;
                }
            }
            ',' if depth == 0 => {
                if !expect_separator {
                    return Err(SyntaxError::new(text, "unexpected separator"));
                }
                expect_separator = false;
            }
            _ if depth == 0 => {
                return Err(SyntaxError::new(
                    text,
                    &format!(r#"unexpected character "{}" outside brackets"#, c),
                ));
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(SyntaxError::new(text, "unbalanced brackets"));
    }
    if !expect_separator && !groups.is_empty() {
        return Err(SyntaxError::new(text, "trailing separator"));
    }
    Ok(groups)
}
