//! What the attached terminal can render

use is_terminal::IsTerminal;

/// Fallback when the terminal size cannot be queried (pipes, CI logs)
const FALLBACK_WIDTH: u16 = 80;

/// Environment variables whose presence marks a CI runner
const CI_MARKERS: [&str; 6] = [
    "CI",
    "GITHUB_ACTIONS",
    "TF_BUILD",
    "JENKINS_HOME",
    "BUILDKITE",
    "TEAMCITY_VERSION",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalCapabilities {
    pub is_tty: bool,
    pub supports_color: bool,
    pub supports_unicode: bool,
    pub is_ci: bool,
    /// Columns available for one console line
    pub width: u16,
}

pub fn detect_capabilities() -> TerminalCapabilities {
    let columns = crossterm::terminal::size().ok().map(|(cols, _)| cols);
    capabilities_from(
        |key| std::env::var(key).ok(),
        std::io::stdout().is_terminal(),
        columns,
    )
}

fn capabilities_from(
    env: impl Fn(&str) -> Option<String>,
    is_tty: bool,
    columns: Option<u16>,
) -> TerminalCapabilities {
    let dumb = env("TERM").is_some_and(|term| term.eq_ignore_ascii_case("dumb"));
    let is_ci = CI_MARKERS.iter().any(|key| env(*key).is_some());

    TerminalCapabilities {
        is_tty,
        supports_color: is_tty && !dumb && env("NO_COLOR").is_none(),
        supports_unicode: !dumb && utf8_console(&env),
        is_ci,
        width: columns.filter(|&c| c > 0).unwrap_or(FALLBACK_WIDTH),
    }
}

fn utf8_console(env: &impl Fn(&str) -> Option<String>) -> bool {
    let locale = ["LC_ALL", "LC_CTYPE", "LANG"]
        .iter()
        .find_map(|key| env(*key))
        .map(|value| value.to_ascii_lowercase());
    match locale {
        Some(value) if value.contains("utf-8") || value.contains("utf8") => true,
        // Windows Terminal sets WT_SESSION; legacy conhost gets ASCII.
        _ => !cfg!(windows) || env("WT_SESSION").is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps_with(vars: &[(&str, &str)], is_tty: bool, columns: Option<u16>) -> TerminalCapabilities {
        capabilities_from(
            |key| {
                vars.iter()
                    .find(|(k, _)| *k == key)
                    .map(|(_, v)| v.to_string())
            },
            is_tty,
            columns,
        )
    }

    #[test]
    fn no_color_wins_on_a_tty() {
        let caps = caps_with(&[("NO_COLOR", "1"), ("TERM", "xterm")], true, Some(132));
        assert!(!caps.supports_color);
        assert_eq!(caps.width, 132);
    }

    #[test]
    fn azure_pipelines_counts_as_ci() {
        let caps = caps_with(&[("TF_BUILD", "True")], true, None);
        assert!(caps.is_ci);
        assert_eq!(caps.width, FALLBACK_WIDTH);
    }

    #[test]
    fn dumb_terminal_gets_plain_ascii() {
        let caps = caps_with(&[("TERM", "dumb"), ("LANG", "en_US.UTF-8")], true, None);
        assert!(!caps.supports_color);
        assert!(!caps.supports_unicode);
    }

    #[test]
    fn piped_stdout_is_colorless() {
        let caps = caps_with(&[("TERM", "xterm")], false, Some(0));
        assert!(!caps.supports_color);
        assert_eq!(caps.width, FALLBACK_WIDTH);
    }
}
