//! The indexable-content composition rule.

use taskmem_core::TaskRecord;

/// Compose the text that represents a record in the index.
///
/// This single rule serves both live index sync and full reindexing, so two
/// passes over unchanged data produce bit-identical vectors: title, then the
/// description when present, then the comma-joined tag list, joined by
/// newlines.
pub fn indexable_content(record: &TaskRecord) -> String {
    let mut parts = vec![record.title.clone()];

    if let Some(description) = &record.description {
        if !description.is_empty() {
            parts.push(description.clone());
        }
    }

    if !record.tags.is_empty() {
        parts.push(record.tags.join(", "));
    }

    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use taskmem_core::{RecordId, RecordStatus};

    use super::*;

    fn record(title: &str, description: Option<&str>, tags: &[&str]) -> TaskRecord {
        TaskRecord {
            id: RecordId(1),
            title: title.into(),
            description: description.map(Into::into),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            status: RecordStatus::Pending,
        }
    }

    #[test]
    fn title_only() {
        assert_eq!(indexable_content(&record("Fix login", None, &[])), "Fix login");
    }

    #[test]
    fn all_fields_joined_by_newlines() {
        let r = record("Fix login", Some("redirect loops on SSO"), &["auth", "bug"]);
        assert_eq!(indexable_content(&r), "Fix login\nredirect loops on SSO\nauth, bug");
    }

    #[test]
    fn empty_description_is_skipped() {
        let r = record("Fix login", Some(""), &["auth"]);
        assert_eq!(indexable_content(&r), "Fix login\nauth");
    }

    #[test]
    fn composition_is_stable_across_calls() {
        let r = record("Fix login", Some("desc"), &["a", "b"]);
        assert_eq!(indexable_content(&r), indexable_content(&r));
    }
}
