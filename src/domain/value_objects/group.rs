//! Group names

/// Sentinel group for units without an explicit assignment
pub const UNASSIGNED_GROUP: &str = "Unassigned";

/// Normalize a stored group value: absent or blank becomes [`UNASSIGNED_GROUP`].
pub fn normalize_group(group: Option<&str>) -> String {
    match group.map(str::trim) {
        Some(g) if !g.is_empty() => g.to_string(),
        _ => UNASSIGNED_GROUP.to_string(),
    }
}

/// Normalize user input for a group assignment.
///
/// Blank input and the sentinel itself both clear the assignment.
pub fn normalize_group_input(input: Option<&str>) -> Option<String> {
    let trimmed = input.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(UNASSIGNED_GROUP) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Whether a stored group value counts as unassigned
pub fn is_unassigned(group: Option<&str>) -> bool {
    normalize_group(group) == UNASSIGNED_GROUP
}
