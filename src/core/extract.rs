//! Best-effort recovery of structured data from raw model output.
//!
//! Generative text is not guaranteed well-formed: responses arrive wrapped in
//! markdown fences, sprinkled with comments, single-quoted, or with trailing
//! commas. Extraction is layered: the strictest interpretation is tried
//! first and each later step is more permissive. Callers treat a success as
//! plausible rather than guaranteed valid.

use regex::Regex;
use serde_json::Value;

use crate::core::FileMap;
use crate::core::error::ExtractError;

/// Recover a JSON value from raw model output.
///
/// Ordered attempts, first success wins: direct parse, parse after stripping
/// code fences, parse of the outermost `{ ... }` span, and finally a parse of
/// that span after loose-JSON normalization.
pub fn extract_json(raw: &str) -> Result<Value, ExtractError> {
    let trimmed = raw.trim();
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }

    let unfenced = strip_fences(trimmed);
    if let Ok(value) = serde_json::from_str(unfenced.trim()) {
        return Ok(value);
    }

    if let Some(span) = brace_span(&unfenced) {
        if let Ok(value) = serde_json::from_str(span) {
            return Ok(value);
        }
        let normalized = normalize_loose_json(span);
        if let Ok(value) = serde_json::from_str(&normalized) {
            return Ok(value);
        }
    }

    Err(ExtractError::no_json(raw))
}

/// Look up a required top-level key, failing with the key name when absent.
pub fn require_key<'a>(value: &'a Value, key: &'static str) -> Result<&'a Value, ExtractError> {
    value.get(key).ok_or(ExtractError::MissingKey { key })
}

/// Parse the repeating file-block convention the code-generation prompt asks
/// for:
///
/// ```text
/// filepath: src/app/foo.ts
/// ---
/// <content>
/// ---
/// ```
///
/// The closing delimiter may be omitted at end of input, and a new
/// `filepath:` marker implicitly closes the previous block.
pub fn extract_file_map(raw: &str) -> Result<FileMap, ExtractError> {
    let mut files = FileMap::new();
    let mut lines = raw.lines().peekable();

    while let Some(line) = lines.next() {
        let Some(path) = file_marker(line) else {
            continue;
        };
        // Optional blank lines, then the opening delimiter.
        while lines.peek().is_some_and(|l| l.trim().is_empty()) {
            lines.next();
        }
        if lines.peek().is_some_and(|l| l.trim() == "---") {
            lines.next();
        }

        let mut content = Vec::new();
        while let Some(peeked) = lines.peek() {
            if peeked.trim() == "---" {
                lines.next();
                break;
            }
            if file_marker(peeked).is_some() {
                break;
            }
            content.push(*peeked);
            lines.next();
        }
        files.insert(path, content.join("\n").trim().to_string());
    }

    if files.is_empty() {
        return Err(ExtractError::no_files(raw));
    }
    Ok(files)
}

fn file_marker(line: &str) -> Option<String> {
    let rest = line.trim().strip_prefix("filepath:")?;
    let path = rest.trim().trim_matches('`');
    if path.is_empty() {
        None
    } else {
        Some(path.to_string())
    }
}

/// Remove markdown code fences (```json / ```typescript / ```javascript or
/// untagged) without touching the fenced content.
fn strip_fences(text: &str) -> String {
    let re = Regex::new(r"```[A-Za-z]*\r?\n?").unwrap();
    re.replace_all(text, "").into_owned()
}

/// Greedy outermost-brace span: first `{` through last `}`.
fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Single tokenizing pass over pseudo-JSON: strips `//` and `/* */` comments,
/// converts single-quoted strings to double-quoted, quotes bare object keys,
/// and drops trailing commas before `}` / `]`. One pass replaces the layered
/// regex fixes this step historically needed, since quoting a key can itself
/// expose a trailing comma.
pub fn normalize_loose_json(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let n = chars.len();
    let mut out = String::with_capacity(input.len());
    let mut last_sig: Option<char> = None;
    let mut i = 0;

    let mut push = |out: &mut String, last_sig: &mut Option<char>, c: char| {
        out.push(c);
        if !c.is_whitespace() {
            *last_sig = Some(c);
        }
    };

    while i < n {
        let c = chars[i];
        match c {
            '"' => {
                push(&mut out, &mut last_sig, '"');
                i += 1;
                while i < n {
                    let sc = chars[i];
                    out.push(sc);
                    i += 1;
                    if sc == '\\' && i < n {
                        out.push(chars[i]);
                        i += 1;
                    } else if sc == '"' {
                        break;
                    }
                }
                last_sig = Some('"');
            }
            '\'' => {
                push(&mut out, &mut last_sig, '"');
                i += 1;
                while i < n && chars[i] != '\'' {
                    let sc = chars[i];
                    if sc == '\\' && i + 1 < n {
                        out.push(sc);
                        out.push(chars[i + 1]);
                        i += 2;
                    } else if sc == '"' {
                        out.push_str("\\\"");
                        i += 1;
                    } else {
                        out.push(sc);
                        i += 1;
                    }
                }
                i += 1; // closing quote
                out.push('"');
                last_sig = Some('"');
            }
            '/' if i + 1 < n && chars[i + 1] == '/' => {
                while i < n && chars[i] != '\n' {
                    i += 1;
                }
            }
            '/' if i + 1 < n && chars[i + 1] == '*' => {
                i += 2;
                while i + 1 < n && !(chars[i] == '*' && chars[i + 1] == '/') {
                    i += 1;
                }
                i = (i + 2).min(n);
            }
            ',' => {
                let j = skip_insignificant(&chars, i + 1);
                if j < n && (chars[j] == '}' || chars[j] == ']') {
                    i += 1; // trailing comma, drop it
                } else {
                    push(&mut out, &mut last_sig, ',');
                    i += 1;
                }
            }
            c if c.is_alphabetic() || c == '_' || c == '$' => {
                let start = i;
                while i < n && (chars[i].is_alphanumeric() || chars[i] == '_' || chars[i] == '$') {
                    i += 1;
                }
                let ident: String = chars[start..i].iter().collect();
                let j = skip_insignificant(&chars, i);
                let is_key = j < n
                    && chars[j] == ':'
                    && matches!(last_sig, Some('{') | Some(','));
                if is_key {
                    out.push('"');
                    out.push_str(&ident);
                    out.push('"');
                    last_sig = Some('"');
                } else {
                    out.push_str(&ident);
                    if let Some(sig) = ident.chars().last() {
                        last_sig = Some(sig);
                    }
                }
            }
            _ => {
                push(&mut out, &mut last_sig, c);
                i += 1;
            }
        }
    }

    out
}

/// Index of the next character that is neither whitespace nor part of a
/// comment, starting at `from`.
fn skip_insignificant(chars: &[char], from: usize) -> usize {
    let n = chars.len();
    let mut i = from;
    loop {
        while i < n && chars[i].is_whitespace() {
            i += 1;
        }
        if i + 1 < n && chars[i] == '/' && chars[i + 1] == '/' {
            while i < n && chars[i] != '\n' {
                i += 1;
            }
            continue;
        }
        if i + 1 < n && chars[i] == '/' && chars[i + 1] == '*' {
            i += 2;
            while i + 1 < n && !(chars[i] == '*' && chars[i + 1] == '/') {
                i += 1;
            }
            i = (i + 2).min(n);
            continue;
        }
        return i;
    }
}
