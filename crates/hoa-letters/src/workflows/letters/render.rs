use super::classifier::{LetterRecord, LetterVariant};
use super::export::ExportError;
use super::LetterBatch;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const PLAN_FILE_NAME: &str = "render_plan.json";
const UNSAFE_PATH_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Letter templates that exist on disk; a missing template disables its variant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderTemplates {
    pub letter1: Option<PathBuf>,
    pub letter2: Option<PathBuf>,
}

impl RenderTemplates {
    pub fn discover(letter1: &Path, letter2: &Path) -> Result<Self, ExportError> {
        let existing = |path: &Path| path.is_file().then(|| path.to_path_buf());
        let templates = Self {
            letter1: existing(letter1),
            letter2: existing(letter2),
        };

        if templates.letter1.is_none() && templates.letter2.is_none() {
            return Err(ExportError::NoTemplates {
                letter1: letter1.display().to_string(),
                letter2: letter2.display().to_string(),
            });
        }
        for (variant, path) in [(LetterVariant::Letter1, letter1), (LetterVariant::Letter2, letter2)] {
            if templates.template_for(variant).is_none() {
                warn!(template = %path.display(), variant = variant.label(), "template missing; these letters will be skipped");
            }
        }

        Ok(templates)
    }

    pub fn template_for(&self, variant: LetterVariant) -> Option<&Path> {
        match variant {
            LetterVariant::Letter1 => self.letter1.as_deref(),
            LetterVariant::Letter2 => self.letter2.as_deref(),
        }
    }
}

/// One document the external templating engine should produce.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderJob {
    pub variant: LetterVariant,
    pub template: PathBuf,
    pub folder: PathBuf,
    pub file_name: String,
    pub context: serde_json::Value,
}

impl RenderJob {
    pub fn output_path(&self) -> PathBuf {
        self.folder.join(&self.file_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLetter {
    pub account_number: String,
    pub association_name: String,
    pub variant: LetterVariant,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderPlan {
    pub jobs: Vec<RenderJob>,
    pub skipped: Vec<SkippedLetter>,
}

/// Hands a planned letter to a document generator and returns the written path.
pub trait LetterRenderer {
    fn render(&self, job: &RenderJob) -> Result<PathBuf, ExportError>;
}

/// Writes each job's substitution context as JSON beside where the document belongs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextFileRenderer;

impl LetterRenderer for ContextFileRenderer {
    fn render(&self, job: &RenderJob) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(&job.folder).map_err(|source| ExportError::io(&job.folder, source))?;
        let path = job.folder.join(format!("{}.json", job.file_name));
        let body = serde_json::to_vec_pretty(&job.context)?;
        std::fs::write(&path, body).map_err(|source| ExportError::io(&path, source))?;
        Ok(path)
    }
}

/// Replaces runs of characters that are invalid in Windows paths with `_`.
pub fn safe_folder_name(name: &str, fallback: &str) -> String {
    let trimmed = name.trim();
    let source = if trimmed.is_empty() { fallback } else { trimmed };

    let mut sanitized = String::with_capacity(source.len());
    let mut in_run = false;
    for ch in source.chars() {
        if UNSAFE_PATH_CHARS.contains(&ch) {
            if !in_run {
                sanitized.push('_');
            }
            in_run = true;
        } else {
            sanitized.push(ch);
            in_run = false;
        }
    }
    sanitized
}

/// Full month name of a letter date such as `October 16, 2026`, else of `fallback`.
pub fn letter_month(date: &str, fallback: NaiveDate) -> String {
    NaiveDate::parse_from_str(date.trim(), "%B %d, %Y")
        .unwrap_or(fallback)
        .format("%B")
        .to_string()
}

pub fn letter_file_name(record: &LetterRecord, month: &str) -> String {
    format!(
        "{} - {} - {}.docx",
        safe_folder_name(&record.account_number, "Unknown_Account"),
        month,
        record.variant().label()
    )
}

/// Lays out one render job per letter whose template is available.
pub fn plan_renders(
    batch: &LetterBatch,
    templates: &RenderTemplates,
    output_dir: &Path,
    today: NaiveDate,
) -> Result<RenderPlan, ExportError> {
    let mut plan = RenderPlan::default();

    for variant in LetterVariant::ordered() {
        for record in batch.records(variant) {
            let Some(template) = templates.template_for(variant) else {
                plan.skipped.push(SkippedLetter {
                    account_number: record.account_number.clone(),
                    association_name: record.association_name.clone(),
                    variant,
                });
                continue;
            };

            let month = letter_month(&record.date, today);
            plan.jobs.push(RenderJob {
                variant,
                template: template.to_path_buf(),
                folder: output_dir.join(safe_folder_name(
                    &record.association_name,
                    "Unknown_Association",
                )),
                file_name: letter_file_name(record, &month),
                context: serde_json::to_value(record)?,
            });
        }
    }

    Ok(plan)
}

/// Persists the plan as `render_plan.json` and renders every job.
pub fn execute_plan<R: LetterRenderer>(
    plan: &RenderPlan,
    renderer: &R,
    output_dir: &Path,
) -> Result<Vec<PathBuf>, ExportError> {
    std::fs::create_dir_all(output_dir).map_err(|source| ExportError::io(output_dir, source))?;
    let plan_path = output_dir.join(PLAN_FILE_NAME);
    let body = serde_json::to_vec_pretty(plan)?;
    std::fs::write(&plan_path, body).map_err(|source| ExportError::io(&plan_path, source))?;

    let mut written = Vec::with_capacity(plan.jobs.len());
    for job in &plan.jobs {
        let path = renderer.render(job)?;
        info!(path = %path.display(), variant = job.variant.label(), "letter rendered");
        written.push(path);
    }
    for skipped in &plan.skipped {
        warn!(
            account = %skipped.account_number,
            association = %skipped.association_name,
            variant = skipped.variant.label(),
            "letter skipped: no template"
        );
    }

    Ok(written)
}
