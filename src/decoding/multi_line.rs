use super::{parse_extension, strip_whitespace, DecodingResult, OutputDecoder, SyntaxError};
use crate::aa::{ArgumentSetId, EntityStore, ExtensionSetId, Query};

/// The decoder for the multi-line output grammar.
///
/// In this grammar each line is a token: an opening `[`, a closing `]`,
/// the empty extension set `[]`, or a bare extension such as `[a,b]`.
/// An extension set is a `[` line and a `]` line wrapping one extension
/// line per member, or the single line `[]`.
/// Acceptance-status answers remain whitespace-stripped tokens.
pub struct MultiLineDecoder;

impl OutputDecoder for MultiLineDecoder {
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
        let chunks = split_extension_sets(text)?;
        if chunks.len() != 1 {
            return Err(SyntaxError::new(
                text,
                &format!("expected a single extension set, got {}", chunks.len()),
            ));
        }
        parse_extension_set_lines(&chunks[0], store)
    }

    fn read_triple(
        &self,
        text: &str,
        store: &mut EntityStore,
    ) -> DecodingResult<[ExtensionSetId; 3]> {
        let chunks = split_extension_sets(text)?;
        if chunks.len() != 3 {
            return Err(SyntaxError::new(
                text,
                &format!("expected three extension sets, got {}", chunks.len()),
            ));
        }
        let grounded = parse_extension_set_lines(&chunks[0], store)?;
        let stable = parse_extension_set_lines(&chunks[1], store)?;
        let preferred = parse_extension_set_lines(&chunks[2], store)?;
        Ok([grounded, stable, preferred])
    }

    fn split_dynamic(&self, text: &str, query: Query) -> DecodingResult<Vec<String>> {
        match query {
            Query::EE => split_extension_sets(text),
            _ => Ok(text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect()),
        }
    }
}

/// Splits the answer into one chunk per extension set.
///
/// Chunks are delimited by tracking the bracket nesting depth across
/// lines: a set is closed when the depth returns to 0.
fn split_extension_sets(text: &str) -> DecodingResult<Vec<String>> {
    let mut chunks = Vec::new();
    let mut current = Vec::new();
    let mut depth = 0usize;
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match line {
            "[" => {
                depth += 1;
                current.push(line);
            }
            "]" => {
                if depth == 0 {
                    return Err(SyntaxError::new(text, "unbalanced brackets"));
                }
                depth -= 1;
                current.push(line);
                if depth == 0 {
                    chunks.push(current.join("\n"));
                    current.clear();
                }
            }
            "[]" if depth == 0 => chunks.push(line.to_string()),
            _ if depth == 0 => {
                return Err(SyntaxError::new(
                    text,
                    &format!(r#"unexpected line "{}" outside an extension set"#, line),
                ));
            }
            _ => current.push(line),
        }
    }
    if depth != 0 {
        return Err(SyntaxError::new(text, "unbalanced brackets"));
    }
    Ok(chunks)
}

/// Parses one extension-set chunk, line by line.
fn parse_extension_set_lines(
    text: &str,
    store: &mut EntityStore,
) -> DecodingResult<ExtensionSetId> {
    let lines = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<&str>>();
    if lines == ["[]"] {
        return Ok(store.extension_set(&[]));
    }
    if lines.len() < 2 || lines[0] != "[" || lines[lines.len() - 1] != "]" {
        return Err(SyntaxError::new(
            text,
            r#"an extension set must be delimited by "[" and "]" lines"#,
        ));
    }
    let extensions = lines[1..lines.len() - 1]
        .iter()
        .map(|line| parse_extension(line, store))
        .collect::<DecodingResult<Vec<ArgumentSetId>>>()?;
    Ok(store.extension_set(&extensions))
}
