//! Config preview diffs
//!
//! Line diffs between a config file on disk and its resolved content, used to
//! preview template application before anything is written.

use similar::{ChangeTag, TextDiff};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffTag {
    Delete,
    Insert,
    Equal,
}

impl From<ChangeTag> for DiffTag {
    fn from(tag: ChangeTag) -> Self {
        match tag {
            ChangeTag::Delete => DiffTag::Delete,
            ChangeTag::Insert => DiffTag::Insert,
            ChangeTag::Equal => DiffTag::Equal,
        }
    }
}

/// One line of a config diff
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub tag: DiffTag,
    /// 1-based line in the file on disk
    pub old_line: Option<usize>,
    /// 1-based line in the resolved content
    pub new_line: Option<usize>,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDiff {
    pub lines: Vec<DiffLine>,
    pub additions: usize,
    pub deletions: usize,
}

impl ConfigDiff {
    pub fn between(current: &str, resolved: &str) -> Self {
        let mut diff = ConfigDiff::default();
        for change in TextDiff::from_lines(current, resolved).iter_all_changes() {
            let tag = DiffTag::from(change.tag());
            match tag {
                DiffTag::Delete => diff.deletions += 1,
                DiffTag::Insert => diff.additions += 1,
                DiffTag::Equal => {}
            }
            diff.lines.push(DiffLine {
                tag,
                old_line: change.old_index().map(|i| i + 1),
                new_line: change.new_index().map(|i| i + 1),
                content: change.value().trim_end_matches('\n').to_string(),
            });
        }
        diff
    }

    pub fn has_changes(&self) -> bool {
        self.additions > 0 || self.deletions > 0
    }

    pub fn changed_lines(&self) -> impl Iterator<Item = &DiffLine> {
        self.lines.iter().filter(|l| l.tag != DiffTag::Equal)
    }

    /// e.g. "+5, -3"
    pub fn summary(&self) -> String {
        format!("+{}, -{}", self.additions, self.deletions)
    }
}

/// Plain unified diff with `a/` and `b/` headers
pub fn unified_diff(identity: &str, current: &str, resolved: &str) -> String {
    TextDiff::from_lines(current, resolved)
        .unified_diff()
        .header(&format!("a/{identity}"), &format!("b/{identity}"))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_content_has_no_changes() {
        let diff = ConfigDiff::between("{\n  \"a\": 1\n}\n", "{\n  \"a\": 1\n}\n");
        assert!(!diff.has_changes());
        assert_eq!(diff.summary(), "+0, -0");
    }

    #[test]
    fn replaced_value_is_one_delete_and_one_insert() {
        let diff = ConfigDiff::between(
            "{\n  \"ip\": \"10.0.0.1\",\n  \"port\": 80\n}\n",
            "{\n  \"ip\": \"10.0.0.9\",\n  \"port\": 80\n}\n",
        );
        assert_eq!(diff.additions, 1);
        assert_eq!(diff.deletions, 1);

        let deleted = diff.lines.iter().find(|l| l.tag == DiffTag::Delete).unwrap();
        assert_eq!(deleted.old_line, Some(2));
        assert_eq!(deleted.content, "  \"ip\": \"10.0.0.1\",");
        assert_eq!(diff.changed_lines().count(), 2);
    }

    #[test]
    fn unified_diff_carries_identity_headers() {
        let out = unified_diff("gateway/unit.config", "a\n", "b\n");
        assert!(out.contains("--- a/gateway/unit.config"));
        assert!(out.contains("+++ b/gateway/unit.config"));
        assert!(out.contains("-a"));
        assert!(out.contains("+b"));
    }
}
