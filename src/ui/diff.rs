use fleet_deploy::domain::services::{ConfigDiff, DiffTag};

use crate::ui::theme::{self, colors};

/// Unified diff with old/new line number columns
pub fn render_config_diff(identity: &str, diff: &ConfigDiff, color: bool) -> String {
    let old_max = diff.lines.iter().filter_map(|l| l.old_line).max().unwrap_or(1);
    let new_max = diff.lines.iter().filter_map(|l| l.new_line).max().unwrap_or(1);
    let width = old_max.max(new_max).to_string().len();

    let mut out = String::new();
    out.push_str(&theme::paint(&format!("--- a/{identity}"), colors::INFO, color));
    out.push('\n');
    out.push_str(&theme::paint(&format!("+++ b/{identity}"), colors::INFO, color));
    out.push('\n');

    for line in &diff.lines {
        let sign = match line.tag {
            DiffTag::Delete => "-",
            DiffTag::Insert => "+",
            DiffTag::Equal => " ",
        };
        let column = |n: Option<usize>| {
            n.map(|n| format!("{n:>width$}"))
                .unwrap_or_else(|| " ".repeat(width))
        };
        let text = format!(
            "{} {} {sign} {}",
            column(line.old_line),
            column(line.new_line),
            line.content
        );
        let tone = match line.tag {
            DiffTag::Delete => colors::ERROR,
            DiffTag::Insert => colors::SUCCESS,
            DiffTag::Equal => colors::DIM,
        };
        out.push_str(&theme::paint(&text, tone, color));
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_changed_lines_with_signs_and_numbers() {
        let diff = ConfigDiff::between("a\nb\n", "a\nc\n");
        let rendered = render_config_diff("app/unit.config", &diff, false);

        assert!(rendered.starts_with("--- a/app/unit.config\n+++ b/app/unit.config\n"));
        assert!(rendered.contains("1 1   a"));
        assert!(rendered.contains("2   - b"));
        assert!(rendered.contains("  2 + c"));
    }
}
