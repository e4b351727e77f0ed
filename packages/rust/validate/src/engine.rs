//! The batch validation engine.
//!
//! One [`Validator`] run scans every input file line by line, applies the
//! structural checks and the content rule battery to each record, tracks
//! per-file duplicate URLs and batch-wide duplicate ids, and produces the
//! per-file and batch accounting the report writer consumes. Nothing here
//! ever mutates a record and nothing aborts the batch: a corrupt line or an
//! unreadable file is recorded and the scan moves on.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use corpuskit_shared::{ErrorItem, MIN_TEXT_LEN, RuleTag};

use crate::rules::Ruleset;
use crate::structure::check_structure;

/// Minimum non-blank line count a file must carry in strict mode.
const STRICT_MIN_LINES: usize = 10_000;

/// Validation outcome for one input file.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub errors: Vec<ErrorItem>,
    /// Records examined (blank lines excluded).
    pub total: usize,
    /// Records that produced no new error items.
    pub passed: usize,
}

impl FileReport {
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.passed as f64 / self.total as f64 * 100.0
        }
    }
}

/// Validation outcome for one whole batch.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
    /// Cross-file findings (duplicate ids), attributed to the later
    /// occurrence in file-then-line order.
    pub cross_errors: Vec<ErrorItem>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.files.iter().map(|f| f.total).sum()
    }

    pub fn passed(&self) -> usize {
        self.files.iter().map(|f| f.passed).sum()
    }

    pub fn pass_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.passed() as f64 / total as f64 * 100.0
        }
    }

    /// Every finding in emission order: per-file items in file order, then
    /// the cross-file items.
    pub fn all_errors(&self) -> impl Iterator<Item = &ErrorItem> {
        self.files
            .iter()
            .flat_map(|f| f.errors.iter())
            .chain(self.cross_errors.iter())
    }
}

/// One record id observed during the scan, kept for the cross-file pass.
struct SeenId {
    id: String,
    path: String,
    line: usize,
}

/// The rule engine. Holds the immutable rule tables plus the strict-mode
/// flag for one batch run.
pub struct Validator {
    rules: Ruleset,
    strict: bool,
}

impl Validator {
    pub fn new(strict: bool) -> Self {
        Self {
            rules: Ruleset::default(),
            strict,
        }
    }

    pub fn with_rules(rules: Ruleset, strict: bool) -> Self {
        Self { rules, strict }
    }

    /// Validate every input file and resolve cross-file duplicate ids.
    pub fn run(&self, inputs: &[PathBuf]) -> BatchReport {
        let mut files = Vec::with_capacity(inputs.len());
        let mut seen_ids: Vec<SeenId> = Vec::new();

        for input in inputs {
            let report = self.validate_file(input, &mut seen_ids);
            info!(
                path = %input.display(),
                total = report.total,
                passed = report.passed,
                errors = report.errors.len(),
                "file validated"
            );
            files.push(report);
        }

        let cross_errors = duplicate_ids(&seen_ids);
        BatchReport {
            files,
            cross_errors,
        }
    }

    fn validate_file(&self, input: &Path, seen_ids: &mut Vec<SeenId>) -> FileReport {
        let path = input.display().to_string();
        let mut errors: Vec<ErrorItem> = Vec::new();

        let body = match fs::read_to_string(input) {
            Ok(body) => body,
            Err(e) => {
                warn!(path = %path, error = %e, "unreadable input file");
                errors.push(ErrorItem::new(
                    &path,
                    0,
                    RuleTag::R1,
                    format!("unreadable file: {e}"),
                ));
                return FileReport {
                    path: input.to_path_buf(),
                    errors,
                    total: 0,
                    passed: 0,
                };
            }
        };

        if self.strict {
            let non_blank = body.lines().filter(|l| !l.trim().is_empty()).count();
            if non_blank < STRICT_MIN_LINES {
                errors.push(ErrorItem::new(
                    &path,
                    0,
                    RuleTag::R1,
                    format!(
                        "strict mode: {non_blank} non-blank lines, minimum is {STRICT_MIN_LINES}"
                    ),
                ));
            }
        }

        let mut total = 0usize;
        let mut passed = 0usize;
        let mut urls: Vec<(String, usize)> = Vec::new();

        for (idx, raw) in body.lines().enumerate() {
            let line = idx + 1;

            // Blank lines are a finding but not a record.
            if raw.trim().is_empty() {
                errors.push(ErrorItem::new(&path, line, RuleTag::R1, "blank line"));
                continue;
            }
            total += 1;

            let obj: Value = match serde_json::from_str(raw) {
                Ok(v) => v,
                Err(e) => {
                    errors.push(ErrorItem::new(
                        &path,
                        line,
                        RuleTag::R1,
                        format!("invalid JSON: {e}"),
                    ));
                    continue;
                }
            };

            let errs_before = errors.len();
            self.check_record(&obj, &path, line, &mut errors);

            if let Some(url) = data_info_str(&obj, "url").filter(|u| !u.is_empty()) {
                urls.push((url.to_string(), line));
            }

            if let Some(id) = obj.get("id").and_then(Value::as_str).filter(|s| !s.is_empty()) {
                seen_ids.push(SeenId {
                    id: id.to_lowercase(),
                    path: path.clone(),
                    line,
                });
            }

            // Pass/fail is the error-count diff, not a dedicated flag, so a
            // file-level finding recorded earlier does not fail every record.
            if errors.len() == errs_before {
                passed += 1;
            }
        }

        // Duplicate URLs are a file-level scan after the per-record loop;
        // they do not count against any record's pass/fail.
        let mut seen_urls: HashMap<&str, usize> = HashMap::new();
        for (url, line) in &urls {
            match seen_urls.get(url.as_str()).copied() {
                Some(first) => errors.push(ErrorItem::new(
                    &path,
                    *line,
                    RuleTag::DupUrl,
                    format!("duplicate url \"{url}\" (first at line {first})"),
                )),
                None => {
                    seen_urls.insert(url.as_str(), *line);
                }
            }
        }

        debug!(path = %path, total, passed, "per-file scan complete");
        FileReport {
            path: input.to_path_buf(),
            errors,
            total,
            passed,
        }
    }

    /// Structural checks, the text-length rule, and the content battery for
    /// one parsed record.
    fn check_record(&self, obj: &Value, path: &str, line: usize, errors: &mut Vec<ErrorItem>) {
        for msg in check_structure(obj, &self.rules) {
            errors.push(ErrorItem::new(path, line, RuleTag::R1, msg));
        }

        // R9 runs on the text field; a missing field counts as empty. A
        // non-string value is structural, but the content battery still
        // runs below.
        let text = match obj.get("text") {
            None => Some(""),
            Some(Value::String(s)) => Some(s.as_str()),
            Some(_) => {
                errors.push(ErrorItem::new(path, line, RuleTag::R1, "text is not a string"));
                None
            }
        };
        if let Some(text) = text {
            let text_len = text.chars().count();
            if text_len < MIN_TEXT_LEN {
                errors.push(ErrorItem::new(
                    path,
                    line,
                    RuleTag::R9,
                    format!("text length {text_len} < {MIN_TEXT_LEN}"),
                ));
            }
        }

        let content = data_info_str(obj, "content").unwrap_or("");
        let lang = data_info_str(obj, "lang").unwrap_or("en");

        let battery: [(RuleTag, Vec<String>); 7] = [
            (RuleTag::R2, self.rules.check_r2(content)),
            (RuleTag::R3, self.rules.check_r3(content, lang)),
            (RuleTag::R4, self.rules.check_r4(content)),
            (RuleTag::R5, self.rules.check_r5(content)),
            (RuleTag::R6, self.rules.check_r6(content)),
            (RuleTag::R7, self.rules.check_r7(content)),
            (RuleTag::R8, self.rules.check_r8(content)),
        ];
        for (tag, msgs) in battery {
            for msg in msgs {
                errors.push(ErrorItem::new(path, line, tag, msg));
            }
        }
        for msg in self.rules.check_residue(content) {
            errors.push(ErrorItem::new(path, line, RuleTag::R3, msg));
        }
    }
}

fn data_info_str<'a>(obj: &'a Value, key: &str) -> Option<&'a str> {
    obj.get("meta")?
        .get("data_info")?
        .get(key)?
        .as_str()
}

/// Cross-file duplicate-id resolution, case-insensitive. The first
/// occurrence in file-then-line order is authoritative; every later one is
/// flagged and references the origin.
fn duplicate_ids(seen: &[SeenId]) -> Vec<ErrorItem> {
    let mut first: HashMap<&str, (&str, usize)> = HashMap::new();
    let mut out = Vec::new();
    for s in seen {
        match first.get(s.id.as_str()).copied() {
            Some((origin_path, origin_line)) => out.push(ErrorItem::new(
                &s.path,
                s.line,
                RuleTag::DupId,
                format!(
                    "duplicate id \"{}\" (first at {origin_path}:{origin_line})",
                    s.id
                ),
            )),
            None => {
                first.insert(s.id.as_str(), (s.path.as_str(), s.line));
            }
        }
    }
    out
}
