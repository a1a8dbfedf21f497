use audit_scoring::error::AppError;
use audit_scoring::workflows::assessment::{write_category_csv, AnswerMutation, AuditSession};
use audit_scoring::workflows::intake::{AuditImporter, AuditTemplate, IngestError};
use clap::Args;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Audit record JSON export
    #[arg(long)]
    pub(crate) audit: PathBuf,
    /// Audit template JSON (reporting range, territory, ...)
    #[arg(long)]
    pub(crate) template: Option<PathBuf>,
    /// JSON array of answer mutations applied in order
    #[arg(long)]
    pub(crate) answers: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Audit record JSON export
    #[arg(long)]
    pub(crate) audit: PathBuf,
    /// JSON array of answer mutations applied before reporting
    #[arg(long)]
    pub(crate) answers: Option<PathBuf>,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    score_audit(args, io::stdout().lock())
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    report_audit(args, io::stdout().lock())
}

pub(crate) fn score_audit<W: Write>(args: ScoreArgs, mut out: W) -> Result<(), AppError> {
    let template = match args.template {
        Some(path) => AuditImporter::template_from_path(path)?,
        None => AuditTemplate::default(),
    };
    let session = load_session(&args.audit, template, args.answers.as_deref())?;

    serde_json::to_writer_pretty(&mut out, &session.outputs()).map_err(IngestError::Json)?;
    writeln!(out)?;
    Ok(())
}

pub(crate) fn report_audit<W: Write>(args: ReportArgs, out: W) -> Result<(), AppError> {
    let session = load_session(
        &args.audit,
        AuditTemplate::default(),
        args.answers.as_deref(),
    )?;
    write_category_csv(&session.category_summaries(), out)?;
    Ok(())
}

fn load_session(
    audit: &Path,
    template: AuditTemplate,
    answers: Option<&Path>,
) -> Result<AuditSession, AppError> {
    let record = AuditImporter::record_from_path(audit)?;
    let mut session = AuditSession::from_record(&record, template);

    if let Some(path) = answers {
        let mutations: Vec<AnswerMutation> = AuditImporter::from_reader(File::open(path)?)?;
        let applied = mutations
            .iter()
            .filter(|mutation| session.apply(mutation))
            .count();
        info!(
            audit_id = %session.audit_id(),
            applied,
            ignored = mutations.len() - applied,
            "applied answer file"
        );
    }

    Ok(session)
}
