use crate::config::FrontmatterDefaults;
use crate::frontmatter::Frontmatter;
use crate::types::{FieldValue, RequiredField};

/// Result of auto-correction: the corrected mapping and one note per change.
#[derive(Debug, Clone, PartialEq)]
pub struct Correction {
    pub frontmatter: Frontmatter,
    pub notes: Vec<String>,
}

impl Correction {
    pub fn changed(&self) -> bool {
        !self.notes.is_empty()
    }
}

/// Repair the required fields of `original`.
///
/// Missing fields are filled from `defaults` first; only fields that were
/// already present are then coerced, so no field is touched twice.
pub fn auto_correct(original: &Frontmatter, defaults: &FrontmatterDefaults) -> Correction {
    let mut fm = original.clone();
    let mut notes = Vec::new();
    let mut inserted = Vec::new();

    for &field in RequiredField::all() {
        if !fm.contains(field.as_str()) {
            fm.set_list(field, defaults.get(field));
            notes.push(format!("Added missing field: {field}."));
            inserted.push(field);
        }
    }

    for &field in RequiredField::all() {
        if inserted.contains(&field) {
            continue;
        }
        match fm.field(field) {
            Some(FieldValue::Text(s)) => {
                fm.set_list(field, &[s]);
                notes.push(format!("Converted {field} from string to list."));
            }
            Some(FieldValue::Other(_)) => {
                fm.set_list(field, defaults.get(field));
                notes.push(format!("Replaced invalid {field} with default value."));
            }
            Some(FieldValue::List {
                strings,
                non_strings,
            }) if !non_strings.is_empty() => {
                fm.set_list(field, &strings);
                notes.push(format!("Removed non-string items from {field}."));
            }
            _ => {}
        }
    }

    Correction {
        frontmatter: fm,
        notes,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontmatter::parse;
    use crate::validate::validate;

    fn defaults() -> FrontmatterDefaults {
        FrontmatterDefaults::default()
    }

    #[test]
    fn string_becomes_single_item_list() {
        let fm = parse("tags: \"doc\"\nprovides: []\nrequires: []").unwrap();
        let c = auto_correct(&fm, &defaults());
        assert_eq!(c.frontmatter.tags(), vec!["doc"]);
        assert_eq!(c.notes, vec!["Converted tags from string to list."]);
    }

    #[test]
    fn empty_mapping_gets_all_defaults() {
        let c = auto_correct(&Frontmatter::new(), &defaults());
        assert_eq!(c.frontmatter.tags(), vec!["draft"]);
        assert!(c.frontmatter.provides().is_empty());
        assert!(c.frontmatter.requires().is_empty());
        assert_eq!(c.notes.len(), 3);
        assert!(validate(&c.frontmatter).is_empty());
    }

    #[test]
    fn non_string_items_are_dropped() {
        let fm = parse("tags: [doc, 123, code]\nprovides: []\nrequires: []").unwrap();
        let c = auto_correct(&fm, &defaults());
        assert_eq!(c.frontmatter.tags(), vec!["doc", "code"]);
        assert_eq!(c.notes, vec!["Removed non-string items from tags."]);
    }

    #[test]
    fn mixed_problems_in_one_pass() {
        let fm = parse("tags: test\nprovides: 123\nrequires: {key: value}").unwrap();
        let c = auto_correct(&fm, &defaults());
        assert_eq!(c.frontmatter.tags(), vec!["test"]);
        assert!(c.frontmatter.provides().is_empty());
        assert!(c.frontmatter.requires().is_empty());
        assert_eq!(
            c.notes,
            vec![
                "Converted tags from string to list.",
                "Replaced invalid provides with default value.",
                "Replaced invalid requires with default value.",
            ]
        );
    }

    #[test]
    fn correction_is_idempotent() {
        let fm = parse("tags: doc\nrequires: [a, 1]").unwrap();
        let first = auto_correct(&fm, &defaults());
        assert!(first.changed());
        let second = auto_correct(&first.frontmatter, &defaults());
        assert!(!second.changed());
        assert_eq!(second.frontmatter, first.frontmatter);
    }

    #[test]
    fn valid_input_is_untouched() {
        let fm = parse("tags: [a]\nprovides: [b]\nrequires: [c]\nstatus: active").unwrap();
        let c = auto_correct(&fm, &defaults());
        assert!(!c.changed());
        assert_eq!(c.frontmatter, fm);
    }

    #[test]
    fn configured_defaults_are_used() {
        let custom = FrontmatterDefaults {
            tags: vec!["wip".to_string()],
            provides: vec![],
            requires: vec!["python".to_string()],
        };
        let fm = parse("provides: 42").unwrap();
        let c = auto_correct(&fm, &custom);
        assert_eq!(c.frontmatter.tags(), vec!["wip"]);
        assert_eq!(c.frontmatter.requires(), vec!["python"]);
        assert!(c.frontmatter.provides().is_empty());
        assert_eq!(c.notes.len(), 3);
    }

    #[test]
    fn other_keys_keep_their_order() {
        let fm = parse("title: Guide\ntags: doc\nstatus: active").unwrap();
        let c = auto_correct(&fm, &defaults());
        let keys: Vec<_> = c
            .frontmatter
            .mapping()
            .keys()
            .map(|k| k.as_str().unwrap().to_string())
            .collect();
        assert_eq!(keys, vec!["title", "tags", "status", "provides", "requires"]);
    }
}
