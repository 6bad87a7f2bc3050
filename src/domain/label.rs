use std::fmt;

/// Direction of a label change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelAction {
    Add,
    Remove,
}

impl LabelAction {
    pub fn name(&self) -> &'static str {
        match self {
            LabelAction::Add => "add",
            LabelAction::Remove => "remove",
        }
    }
}

/// A single label change on a change request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelOperation {
    pub action: LabelAction,
    pub label: String,
}

impl LabelOperation {
    pub fn add(label: impl Into<String>) -> Self {
        LabelOperation {
            action: LabelAction::Add,
            label: label.into(),
        }
    }

    pub fn remove(label: impl Into<String>) -> Self {
        LabelOperation {
            action: LabelAction::Remove,
            label: label.into(),
        }
    }
}

impl fmt::Display for LabelOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.action.name().to_uppercase(), self.label)
    }
}

/// Compute the operations that turn `current` into `suggested`.
///
/// Additions come first, in suggestion order, followed by removals in
/// current order. Removals are only planned when `remove_outdated` is set.
pub fn plan_label_operations(
    current: &[String],
    suggested: &[String],
    remove_outdated: bool,
) -> Vec<LabelOperation> {
    let mut operations: Vec<LabelOperation> = Vec::new();

    for label in suggested {
        let planned = operations.iter().any(|op| &op.label == label);
        if !current.contains(label) && !planned {
            operations.push(LabelOperation::add(label.clone()));
        }
    }

    if remove_outdated {
        for label in current {
            let planned = operations.iter().any(|op| &op.label == label);
            if !suggested.contains(label) && !planned {
                operations.push(LabelOperation::remove(label.clone()));
            }
        }
    }

    operations
}

/// Apply planned operations to a label set, as the service would.
pub fn apply_operations(current: &[String], operations: &[LabelOperation]) -> Vec<String> {
    let mut labels: Vec<String> = current.to_vec();
    for op in operations {
        match op.action {
            LabelAction::Add => {
                if !labels.contains(&op.label) {
                    labels.push(op.label.clone());
                }
            }
            LabelAction::Remove => labels.retain(|l| l != &op.label),
        }
    }
    labels
}

/// Extract label names from the suggestion command's CSV output.
///
/// The first line containing a comma is taken as the CSV payload; progress
/// lines mentioning `Successfully` are ignored.
pub fn parse_suggested_labels(output: &str) -> Vec<String> {
    let output = output.trim();
    if output.is_empty() {
        return Vec::new();
    }

    let csv_line = output
        .lines()
        .find(|line| line.contains(',') && !line.contains("Successfully"))
        .unwrap_or(output);

    csv_line
        .split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty() && !label.contains("Successfully"))
        .map(str::to_string)
        .collect()
}

/// Merge suggested labels with a comma separated custom list, dropping duplicates.
pub fn merge_custom_labels(suggested: &[String], custom: &str) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();
    let custom_labels = custom.split(',').map(str::trim).filter(|l| !l.is_empty());

    for label in suggested.iter().map(String::as_str).chain(custom_labels) {
        if !merged.iter().any(|existing| existing == label) {
            merged.push(label.to_string());
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_plan_add_and_remove() {
        let ops = plan_label_operations(
            &labels(&["bug", "needs-review"]),
            &labels(&["bug", "feature"]),
            true,
        );
        assert_eq!(
            ops,
            vec![
                LabelOperation::add("feature"),
                LabelOperation::remove("needs-review")
            ]
        );
    }

    #[test]
    fn test_plan_without_removal() {
        let ops = plan_label_operations(&labels(&["stale"]), &labels(&["feature"]), false);
        assert_eq!(ops, vec![LabelOperation::add("feature")]);
    }

    #[test]
    fn test_plan_reaches_fixed_point() {
        let cases = vec![
            (labels(&[]), labels(&[])),
            (labels(&["a"]), labels(&[])),
            (labels(&[]), labels(&["a", "b"])),
            (labels(&["a", "b", "c"]), labels(&["c", "d", "d"])),
            (labels(&["scope:cart", "bug"]), labels(&["scope:checkout", "bug"])),
        ];

        for (current, suggested) in cases {
            let ops = plan_label_operations(&current, &suggested, true);
            let next = apply_operations(&current, &ops);
            let again = plan_label_operations(&next, &suggested, true);
            assert!(again.is_empty(), "not a fixed point for {:?} -> {:?}", current, suggested);
        }
    }

    #[test]
    fn test_operation_display() {
        assert_eq!(LabelOperation::add("feature").to_string(), "ADD: feature");
        assert_eq!(LabelOperation::remove("bug").to_string(), "REMOVE: bug");
    }

    #[test]
    fn test_parse_suggested_labels_skips_progress_lines() {
        let output = "Successfully analysed 4 files\nfeature, scope:cart ,size/S\n";
        assert_eq!(
            parse_suggested_labels(output),
            labels(&["feature", "scope:cart", "size/S"])
        );
    }

    #[test]
    fn test_parse_single_label() {
        assert_eq!(parse_suggested_labels("feature"), labels(&["feature"]));
        assert!(parse_suggested_labels("  ").is_empty());
    }

    #[test]
    fn test_merge_custom_labels_dedupes() {
        let merged = merge_custom_labels(&labels(&["feature", "bug"]), " bug, release ,,");
        assert_eq!(merged, labels(&["feature", "bug", "release"]));
    }
}
