use crate::classifier::Classifier;
use crate::config::Config;
use crate::correct::auto_correct;
use crate::discover::Discovery;
use crate::error::Result;
use crate::frontmatter::{extract, parse};
use crate::repair::repair;
use crate::rewrite::{inject, rewrite};
use crate::types::{FileCategory, FileType};
use crate::validate::{validate, ValidationError};
use crate::{io, paths};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

// ---------------------------------------------------------------------------
// Options / report types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessOptions {
    pub auto_correct: bool,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Passed,
    Failed,
    Skipped,
}

impl FileStatus {
    pub fn marker(self) -> &'static str {
        match self {
            FileStatus::Passed => "pass",
            FileStatus::Failed => "fail",
            FileStatus::Skipped => "skip",
        }
    }
}

/// Outcome for one file. `Passed` describes the file as it was found, so a
/// file fixed by auto-correction still reports `Failed` for that run.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: String,
    pub file_type: Option<FileType>,
    pub category: Option<FileCategory>,
    pub status: FileStatus,
    pub errors: Vec<ValidationError>,
    pub corrections: Vec<String>,
    /// Corrections changed the content (in a dry run: would have).
    pub modified: bool,
    /// The new content reached disk.
    pub written: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
}

impl FileReport {
    fn new(path: &str, file_type: Option<FileType>, category: Option<FileCategory>) -> Self {
        Self {
            path: path.to_string(),
            file_type,
            category,
            status: FileStatus::Passed,
            errors: Vec::new(),
            corrections: Vec::new(),
            modified: false,
            written: false,
            skip_reason: None,
        }
    }

    fn skipped(mut self, reason: &str) -> Self {
        debug!(path = %self.path, reason, "skipping");
        self.status = FileStatus::Skipped;
        self.skip_reason = Some(reason.to_string());
        self
    }

    fn unreadable(mut self, message: String) -> Self {
        debug!(path = %self.path, error = %message, "unreadable");
        self.errors.push(ValidationError::Unreadable { message });
        self.status = FileStatus::Failed;
        self
    }

    pub fn passed(&self) -> bool {
        self.status == FileStatus::Passed
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub modified: usize,
}

impl RunSummary {
    pub fn record(&mut self, report: &FileReport) {
        self.total += 1;
        match report.status {
            FileStatus::Passed => self.passed += 1,
            FileStatus::Failed => self.failed += 1,
            FileStatus::Skipped => self.skipped += 1,
        }
        if report.modified {
            self.modified += 1;
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub files: Vec<FileReport>,
    pub summary: RunSummary,
}

impl RunReport {
    pub fn push(&mut self, report: FileReport) {
        self.summary.record(&report);
        self.files.push(report);
    }
}

// ---------------------------------------------------------------------------
// Content check (pure)
// ---------------------------------------------------------------------------

/// Result of checking one file's text.
#[derive(Debug, Clone, Default)]
pub struct ContentCheck {
    pub errors: Vec<ValidationError>,
    pub corrections: Vec<String>,
    /// Replacement text, when corrections produced one.
    pub updated: Option<String>,
}

/// Store the corrected text, or record why it could not be rendered. A
/// failed render drops the corrections, since none of them reach the file.
fn apply_rendered(check: &mut ContentCheck, rendered: Result<String>) {
    match rendered {
        Ok(text) => check.updated = Some(text),
        Err(e) => {
            check.corrections.clear();
            check.errors.push(ValidationError::RenderFailed {
                message: e.to_string(),
            });
        }
    }
}

/// Validate `content` and, if `fix` is set, compute the corrected text.
/// Touches no files.
pub fn check_content(
    content: &str,
    file_type: FileType,
    category: Option<FileCategory>,
    config: &Config,
    fix: bool,
) -> ContentCheck {
    let mut check = ContentCheck::default();

    let Some(block) = extract(content, file_type) else {
        check.errors.push(ValidationError::MissingFrontmatter);
        if fix {
            let fm = config.injection_frontmatter(category);
            check.corrections.push("Added default frontmatter.".to_string());
            apply_rendered(&mut check, inject(content, file_type, &fm));
        }
        return check;
    };

    match parse(&block.yaml) {
        Err(message) => {
            check.errors.push(ValidationError::MalformedYaml { message });
            if fix {
                let outcome = repair(&block.yaml, &config.defaults);
                check.corrections.push(outcome.note());
                let corrected = auto_correct(outcome.frontmatter(), &config.defaults);
                check.corrections.extend(corrected.notes);
                let rendered = rewrite(content, &block, file_type, &corrected.frontmatter);
                apply_rendered(&mut check, rendered);
            }
        }
        Ok(fm) => {
            check.errors.extend(validate(&fm));
            if fix && !check.errors.is_empty() {
                let corrected = auto_correct(&fm, &config.defaults);
                if corrected.changed() {
                    check.corrections.extend(corrected.notes);
                    let rendered = rewrite(content, &block, file_type, &corrected.frontmatter);
                    apply_rendered(&mut check, rendered);
                }
            }
        }
    }

    check
}

// ---------------------------------------------------------------------------
// Processor
// ---------------------------------------------------------------------------

/// Runs the per-file pipeline over a batch, one file at a time.
pub struct Processor<'a> {
    config: &'a Config,
    classifier: Classifier,
    options: ProcessOptions,
}

impl<'a> Processor<'a> {
    pub fn new(config: &'a Config, options: ProcessOptions) -> Result<Self> {
        Ok(Self {
            config,
            classifier: Classifier::new(config)?,
            options,
        })
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Process one file, shown in reports as `shown`. Never fails: read and
    /// write problems end up in the report and the batch carries on.
    pub fn process(&self, path: &Path, shown: &str) -> FileReport {
        let file_type = FileType::from_path(path);
        let category = self.classifier.classify(shown);
        let report = FileReport::new(shown, file_type, category);

        let Some(file_type) = file_type else {
            return report.skipped("unsupported file type");
        };
        if self.classifier.is_ignored(shown) {
            return report.skipped("ignored by config");
        }
        if category == Some(FileCategory::Binary) {
            return report.skipped("binary file");
        }

        let mut report = report;
        let content = match io::read_text(path) {
            Ok(c) => c,
            Err(e) => return report.unreadable(e.to_string()),
        };

        let check = check_content(
            &content,
            file_type,
            category,
            self.config,
            self.options.auto_correct,
        );
        report.errors = check.errors;
        report.corrections = check.corrections;

        if let Some(updated) = check.updated.filter(|u| *u != content) {
            report.modified = true;
            if self.options.dry_run {
                debug!(path = %shown, "dry run: not writing");
            } else {
                match io::atomic_write(path, updated.as_bytes()) {
                    Ok(()) => {
                        info!(path = %shown, "updated frontmatter");
                        report.written = true;
                    }
                    Err(e) => {
                        warn!(path = %shown, error = %e, "write failed");
                        report.errors.push(ValidationError::WriteFailed {
                            message: e.to_string(),
                        });
                    }
                }
            }
        }

        report.status = if report.errors.is_empty() {
            FileStatus::Passed
        } else {
            FileStatus::Failed
        };
        report
    }

    /// Process `files` in order; paths in reports are shown relative to
    /// `base`.
    pub fn run(&self, files: &[PathBuf], base: &Path) -> RunReport {
        let mut run = RunReport::default();
        for path in files {
            let shown = paths::relative_slash_path(path, base);
            run.push(self.process(path, &shown));
        }
        run
    }

    /// Process everything `discovery` found, then report each input that
    /// could not be reached as a failed file.
    pub fn run_discovery(&self, discovery: &Discovery, base: &Path) -> RunReport {
        let mut run = self.run(&discovery.files, base);
        for failure in &discovery.failures {
            let shown = paths::relative_slash_path(&failure.path, base);
            let report = FileReport::new(&shown, FileType::from_path(&failure.path), None);
            run.push(report.unreadable(failure.message.clone()));
        }
        run
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
