//! `.env` file format
//!
//! Parsing is delegated to `dotenvy`, so `export` prefixes, quoting, escapes,
//! inline comments and `$VAR` substitution follow its rules. Entry order is
//! preserved; a repeated key keeps its last value in the first key's
//! position. Nothing is loaded into the process environment.

use std::borrow::Cow;
use std::path::Path;

type EnvPairs = Vec<(String, String)>;

fn collect_pairs(
    items: impl Iterator<Item = Result<(String, String), dotenvy::Error>>,
) -> Result<EnvPairs, dotenvy::Error> {
    let mut entries: EnvPairs = Vec::new();
    for item in items {
        let (key, value) = item?;
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value,
            None => entries.push((key, value)),
        }
    }
    Ok(entries)
}

/// Parse `.env` content into ordered pairs
pub fn parse_env(content: &str) -> Result<EnvPairs, dotenvy::Error> {
    collect_pairs(dotenvy::from_read_iter(content.as_bytes()))
}

/// Read and parse a `.env` file; a missing file is empty.
pub fn read_env_file(path: &Path) -> Result<EnvPairs, dotenvy::Error> {
    match dotenvy::from_path_iter(path) {
        Ok(items) => collect_pairs(items),
        Err(e) if e.not_found() => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}

/// Quote `value` so `dotenvy` reads it back unchanged.
///
/// Single quotes are literal but cannot hold `'` or a newline; those values
/// fall back to double quotes with `\`, `"` and `$` escaped.
fn quote_value(value: &str) -> Cow<'_, str> {
    let plain = !value.chars().any(|c| {
        c.is_whitespace() || matches!(c, '\'' | '"' | '\\' | '$' | '#')
    });
    if plain {
        return Cow::Borrowed(value);
    }
    if !value.contains(['\'', '\n']) {
        return Cow::Owned(format!("'{value}'"));
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '\\' | '"' | '$' => {
                quoted.push('\\');
                quoted.push(c);
            }
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    Cow::Owned(quoted)
}

/// Render pairs back to `.env` content
pub fn render_env(entries: &[(String, String)]) -> String {
    let mut out = String::new();
    for (key, value) in entries {
        out.push_str(key);
        out.push('=');
        out.push_str(&quote_value(value));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(key: &str, value: &str) -> (String, String) {
        (key.to_string(), value.to_string())
    }

    #[test]
    fn parses_comments_quotes_and_blank_lines() {
        let content = "# comment\n\nLinuxHost = 10.0.0.2\nLinuxUser=\"ops\"\nLinuxPassword='p=w'\n";
        assert_eq!(
            parse_env(content).unwrap(),
            vec![
                pair("LinuxHost", "10.0.0.2"),
                pair("LinuxUser", "ops"),
                pair("LinuxPassword", "p=w"),
            ]
        );
    }

    #[test]
    fn export_prefix_and_inline_comment() {
        let entries = parse_env("export LinuxHost=10.0.0.9 # jump box\n").unwrap();
        assert_eq!(entries, vec![pair("LinuxHost", "10.0.0.9")]);
    }

    #[test]
    fn malformed_line_is_an_error() {
        assert!(parse_env("LinuxHost=10.0.0.2\nnot a pair\n").is_err());
    }

    #[test]
    fn repeated_key_keeps_last_value() {
        let entries = parse_env("A=1\nB=2\nA=3\n").unwrap();
        assert_eq!(entries[0], pair("A", "3"));
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn awkward_values_survive_a_rewrite() {
        let entries = vec![
            pair("LinuxPassword", "it's a $ecret # really"),
            pair("Banner", "two words"),
            pair("Path", r"C:\deploy"),
            pair("Empty", ""),
        ];
        let rendered = render_env(&entries);
        assert!(rendered.contains("Banner='two words'\n"));
        assert_eq!(parse_env(&rendered).unwrap(), entries);
    }

    #[test]
    fn json_values_survive() {
        let content = render_env(&[pair(
            "UNIT_621001_CONFIG_OVERRIDES",
            r#"{"unit.config":{"a":"b=c"}}"#,
        )]);
        assert_eq!(
            parse_env(&content).unwrap()[0].1,
            r#"{"unit.config":{"a":"b=c"}}"#
        );
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_env_file(&dir.path().join(".env")).unwrap().is_empty());
    }
}
