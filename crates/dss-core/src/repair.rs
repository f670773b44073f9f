//! Best-effort textual repair of frontmatter YAML that fails to parse.
//!
//! Fixups run in order and accumulate; the text is re-parsed after each one
//! and the first parse that yields a mapping wins. None of this is
//! guaranteed to recover the author's intent, so callers always report the
//! original `MalformedYaml` error alongside the repair.

use crate::config::FrontmatterDefaults;
use crate::frontmatter::{parse, Frontmatter};
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Fixup
// ---------------------------------------------------------------------------

/// A fn-pointer fixup. `apply` returns `None` when it has nothing to change.
pub struct Fixup {
    pub id: &'static str,
    pub apply: fn(&str) -> Option<String>,
}

pub fn default_fixups() -> Vec<Fixup> {
    vec![
        Fixup {
            id: "expand_tabs",
            apply: expand_tabs,
        },
        Fixup {
            id: "close_flow_sequences",
            apply: close_flow_sequences,
        },
        Fixup {
            id: "quote_plain_values",
            apply: quote_plain_values,
        },
        Fixup {
            id: "align_stray_indentation",
            apply: align_stray_indentation,
        },
    ]
}

// ---------------------------------------------------------------------------
// RepairOutcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum RepairOutcome {
    /// The fixups listed made the text parse.
    Repaired {
        frontmatter: Frontmatter,
        fixups: Vec<&'static str>,
    },
    /// Nothing helped; the minimal default block stands in.
    Fallback { frontmatter: Frontmatter },
}

impl RepairOutcome {
    pub fn frontmatter(&self) -> &Frontmatter {
        match self {
            RepairOutcome::Repaired { frontmatter, .. } => frontmatter,
            RepairOutcome::Fallback { frontmatter } => frontmatter,
        }
    }

    pub fn note(&self) -> String {
        match self {
            RepairOutcome::Repaired { fixups, .. } => {
                format!("Repaired malformed YAML ({}).", fixups.join(", "))
            }
            RepairOutcome::Fallback { .. } => {
                "Replaced unparseable frontmatter with the default block.".to_string()
            }
        }
    }
}

/// Run `fixups` against `yaml`, falling back to the defaults block.
pub fn repair_with(yaml: &str, fixups: &[Fixup], defaults: &FrontmatterDefaults) -> RepairOutcome {
    let mut text = yaml.to_string();
    let mut applied = Vec::new();

    for fixup in fixups {
        let Some(next) = (fixup.apply)(&text) else {
            continue;
        };
        text = next;
        applied.push(fixup.id);
        match parse(&text) {
            Ok(frontmatter) => {
                debug!(fixups = ?applied, "repaired malformed frontmatter");
                return RepairOutcome::Repaired {
                    frontmatter,
                    fixups: applied,
                };
            }
            Err(e) => debug!(fixup = fixup.id, error = %e, "still unparseable"),
        }
    }

    warn!(
        attempted = ?applied,
        "frontmatter could not be repaired; falling back to the default block"
    );
    RepairOutcome::Fallback {
        frontmatter: defaults.to_frontmatter(),
    }
}

pub fn repair(yaml: &str, defaults: &FrontmatterDefaults) -> RepairOutcome {
    repair_with(yaml, &default_fixups(), defaults)
}

// ---------------------------------------------------------------------------
// Fixups
// ---------------------------------------------------------------------------

static KEY_VALUE_RE: OnceLock<Regex> = OnceLock::new();
static BLOCK_INDICATOR_RE: OnceLock<Regex> = OnceLock::new();

fn key_value_re() -> &'static Regex {
    KEY_VALUE_RE.get_or_init(|| {
        Regex::new(r"^([ \t]*(?:-[ \t]+)?[A-Za-z_][\w\-]*:)[ \t]+(\S.*?)[ \t]*$").unwrap()
    })
}

fn block_indicator_re() -> &'static Regex {
    BLOCK_INDICATOR_RE.get_or_init(|| Regex::new(r"^[|>][-+0-9]*$").unwrap())
}

/// Rebuild `text` from `lines`, keeping a trailing newline if there was one.
fn join_lines(lines: &[String], original: &str) -> String {
    let mut out = lines.join("\n");
    if original.ends_with('\n') {
        out.push('\n');
    }
    out
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// Leading tabs become two spaces each. YAML forbids tab indentation.
fn expand_tabs(text: &str) -> Option<String> {
    let mut changed = false;
    let lines: Vec<String> = text
        .lines()
        .map(|line| {
            let body = line.trim_start_matches([' ', '\t']);
            let lead = &line[..line.len() - body.len()];
            if lead.contains('\t') {
                changed = true;
                format!("{}{}", lead.replace('\t', "  "), body)
            } else {
                line.to_string()
            }
        })
        .collect();
    changed.then(|| join_lines(&lines, text))
}

/// Append the `]` a flow sequence is missing, e.g. `tags: [a, b`.
fn close_flow_sequences(text: &str) -> Option<String> {
    let mut changed = false;
    let lines: Vec<String> = text
        .lines()
        .map(|line| {
            let opens = line.matches('[').count();
            let closes = line.matches(']').count();
            if opens > closes {
                changed = true;
                format!("{}{}", line.trim_end(), "]".repeat(opens - closes))
            } else {
                line.to_string()
            }
        })
        .collect();
    changed.then(|| join_lines(&lines, text))
}

fn needs_quoting(value: &str) -> bool {
    if value.starts_with(['"', '\'', '[', '{']) || block_indicator_re().is_match(value) {
        return false;
    }
    value.contains(": ")
        || value.contains(" #")
        || value.ends_with(':')
        || value.starts_with(['@', '`', '%', '|', '>', '*', '&', '!'])
}

/// Double-quote plain scalars that contain YAML syntax, e.g.
/// `title: Note: read this` → `title: "Note: read this"`.
fn quote_plain_values(text: &str) -> Option<String> {
    let mut changed = false;
    let lines: Vec<String> = text
        .lines()
        .map(|line| match key_value_re().captures(line) {
            Some(caps) if needs_quoting(&caps[2]) => {
                changed = true;
                let escaped = caps[2].replace('\\', "\\\\").replace('"', "\\\"");
                format!("{} \"{}\"", &caps[1], escaped)
            }
            _ => line.to_string(),
        })
        .collect();
    changed.then(|| join_lines(&lines, text))
}

/// Pull a `key: value` line back to its sibling's indentation when it is
/// indented under a line that cannot have children.
fn align_stray_indentation(text: &str) -> Option<String> {
    let mut changed = false;
    let mut lines: Vec<String> = Vec::new();
    let mut prev: Option<(usize, String)> = None;

    for line in text.lines() {
        if line.trim().is_empty() {
            lines.push(line.to_string());
            continue;
        }
        let mut current = line.to_string();
        if let Some((prev_indent, prev_body)) = &prev {
            let opens_block = prev_body.ends_with(':')
                || prev_body.starts_with('-')
                || prev_body
                    .rsplit_once(": ")
                    .is_some_and(|(_, v)| block_indicator_re().is_match(v.trim()));
            if indent_of(line) > *prev_indent && !opens_block && key_value_re().is_match(line) {
                changed = true;
                current = format!("{}{}", " ".repeat(*prev_indent), line.trim_start());
            }
        }
        prev = Some((indent_of(&current), current.trim().to_string()));
        lines.push(current);
    }

    changed.then(|| join_lines(&lines, text))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
