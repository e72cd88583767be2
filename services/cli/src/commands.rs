use chrono::{Local, NaiveDate};
use clap::Args;
use hoa_letters::config::AppConfig;
use hoa_letters::error::AppError;
use hoa_letters::workflows::letters::{
    build_letter_batch, execute_plan, export_batch, latest_export, plan_renders,
    AssociationEmailIndex, ContextFileRenderer, ExportSummary, LetterBatch, LetterError,
    LetterOptions, RawTable, RenderTemplates,
};
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Default, Clone)]
pub(crate) struct RunArgs {
    /// Ledger export to read. Defaults to the newest converted*.csv in HOA_BASE_DIR.
    #[arg(long)]
    pub(crate) input: Option<PathBuf>,
    /// Contact roster mapping association names to emails. Defaults to HOA_CONTACTS_PATH.
    #[arg(long)]
    pub(crate) contacts: Option<PathBuf>,
    /// Destination folder. Defaults to HOA_OUTPUT_DIR.
    #[arg(long)]
    pub(crate) output_dir: Option<PathBuf>,
    /// Letter date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Inclusive minimum balance for a letter. Defaults to HOA_MIN_BALANCE.
    #[arg(long)]
    pub(crate) min_balance: Option<Decimal>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ExportArgs {
    #[command(flatten)]
    pub(crate) run: RunArgs,
}

#[derive(Args, Debug, Default)]
pub(crate) struct PlanArgs {
    #[command(flatten)]
    pub(crate) run: RunArgs,
    /// Letter 1 template. Defaults to HOA_TEMPLATE_LETTER1.
    #[arg(long)]
    pub(crate) letter1_template: Option<PathBuf>,
    /// Letter 2 template. Defaults to HOA_TEMPLATE_LETTER2.
    #[arg(long)]
    pub(crate) letter2_template: Option<PathBuf>,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

struct PreparedRun {
    batch: LetterBatch,
    output_dir: PathBuf,
    today: NaiveDate,
}

fn prepare(config: &AppConfig, args: RunArgs) -> Result<PreparedRun, AppError> {
    let RunArgs {
        input,
        contacts,
        output_dir,
        today,
        min_balance,
    } = args;

    let input = match input {
        Some(path) => path,
        None => latest_export(&config.paths.base_dir)?,
    };
    info!(input = %input.display(), "opening ledger export");
    let ledger = RawTable::from_path(&input).map_err(LetterError::from)?;

    let contacts = contacts.unwrap_or_else(|| config.paths.contacts_path.clone());
    let emails = AssociationEmailIndex::from_optional_path(&contacts)?;

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let options = LetterOptions::new(today)
        .with_minimum_balance(min_balance.unwrap_or(config.letters.minimum_balance));
    let batch = build_letter_batch(&ledger, &emails, &options)?;

    Ok(PreparedRun {
        batch,
        output_dir: output_dir.unwrap_or_else(|| config.paths.output_dir.clone()),
        today,
    })
}

pub(crate) fn run_export(config: &AppConfig, args: ExportArgs) -> Result<ExportSummary, AppError> {
    let prepared = prepare(config, args.run)?;
    let summary = export_batch(&prepared.batch, &prepared.output_dir)?;

    println!("Letter export");
    println!(
        "- Letter 1: {} row(s) -> {}",
        summary.letter1_rows,
        summary.letter1_path.display()
    );
    println!(
        "- Letter 2: {} row(s) -> {}",
        summary.letter2_rows,
        summary.letter2_path.display()
    );

    Ok(summary)
}

pub(crate) fn run_plan(config: &AppConfig, args: PlanArgs) -> Result<Vec<PathBuf>, AppError> {
    let PlanArgs {
        run,
        letter1_template,
        letter2_template,
    } = args;

    let letter1 = letter1_template.unwrap_or_else(|| config.paths.letter1_template.clone());
    let letter2 = letter2_template.unwrap_or_else(|| config.paths.letter2_template.clone());
    let templates = RenderTemplates::discover(&letter1, &letter2)?;

    let prepared = prepare(config, run)?;
    let plan = plan_renders(
        &prepared.batch,
        &templates,
        &prepared.output_dir,
        prepared.today,
    )?;
    let written = execute_plan(&plan, &ContextFileRenderer, &prepared.output_dir)?;

    println!("Render plan");
    for job in &plan.jobs {
        println!(
            "- {} <- {}",
            job.output_path().display(),
            job.template.display()
        );
    }
    if !plan.skipped.is_empty() {
        println!("\nSkipped (template missing)");
        for skipped in &plan.skipped {
            println!(
                "- Account #{} ({}) {}",
                skipped.account_number,
                skipped.association_name,
                skipped.variant.label()
            );
        }
    }
    println!("\nDone. Planned {} letter(s).", written.len());

    Ok(written)
}
