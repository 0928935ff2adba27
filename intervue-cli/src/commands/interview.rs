//! Interview command handlers
//!
//! Handles registering interviews, requesting processing runs, following
//! their progress and printing reports.

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use colored::*;
use intervue_client::OrchestratorClient;
use intervue_core::domain::interview::{Interview, ProcessingStatus};
use intervue_core::domain::report::AnalysisReport;
use intervue_core::domain::step::{Step, StepStatus};
use intervue_core::dto::interview::{CreateInterview, StepsView};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::Config;
use crate::id_resolver::resolve_interview_id;
use crate::types::IdOrPrefix;

const WATCH_INTERVAL: Duration = Duration::from_secs(2);

/// Interview subcommands
#[derive(Subcommand)]
pub enum InterviewCommands {
    /// Register a new interview
    Create {
        /// Location of the recording, as understood by the transcription service
        #[arg(long)]
        audio: String,

        /// Job description text
        #[arg(long, conflicts_with = "job_description_file")]
        job_description: Option<String>,

        /// Read the job description from a file
        #[arg(long)]
        job_description_file: Option<PathBuf>,

        /// Read the candidate's resume from a file
        #[arg(long)]
        resume_file: Option<PathBuf>,

        /// Candidate name
        #[arg(long)]
        candidate: Option<String>,
    },
    /// List all interviews
    List,
    /// Get interview details
    Get {
        /// Interview ID or unambiguous prefix
        id: String,
    },
    /// Show the processing steps of an interview
    Steps {
        /// Interview ID or unambiguous prefix
        id: String,
    },
    /// Show the latest analysis report
    Report {
        /// Interview ID or unambiguous prefix
        id: String,

        /// Print the raw JSON report
        #[arg(long)]
        json: bool,
    },
    /// Start a processing run
    Process {
        /// Interview ID or unambiguous prefix
        id: String,

        /// Run the enhanced pipeline (PII, encryption, flow graph, alignment, explanations)
        #[arg(long)]
        enhanced: bool,

        /// Follow the run until it finishes
        #[arg(short, long)]
        watch: bool,
    },
}

/// Handle interview commands
pub async fn handle_interview_command(command: InterviewCommands, config: &Config) -> Result<()> {
    let client = config.client();

    match command {
        InterviewCommands::Create {
            audio,
            job_description,
            job_description_file,
            resume_file,
            candidate,
        } => {
            let job_description = match (job_description, job_description_file) {
                (Some(text), _) => text,
                (None, Some(path)) => read_file(&path)?,
                (None, None) => bail!("Provide --job-description or --job-description-file"),
            };
            let resume_text = resume_file.as_deref().map(read_file).transpose()?;

            let req = CreateInterview {
                candidate_name: candidate,
                audio_path: audio,
                resume_text,
                job_description,
            };
            create_interview(&client, req).await
        }
        InterviewCommands::List => list_interviews(&client).await,
        InterviewCommands::Get { id } => get_interview(&client, &id).await,
        InterviewCommands::Steps { id } => show_steps(&client, &id).await,
        InterviewCommands::Report { id, json } => show_report(&client, &id, json).await,
        InterviewCommands::Process {
            id,
            enhanced,
            watch,
        } => process_interview(&client, &id, enhanced, watch).await,
    }
}

fn read_file(path: &std::path::Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

async fn create_interview(client: &OrchestratorClient, req: CreateInterview) -> Result<()> {
    let interview = client.create_interview(req).await?;

    println!("{}", "✓ Interview created".green().bold());
    println!("  ID: {}", interview.id.to_string().cyan());
    println!(
        "  Run {} to analyze it.",
        format!("intervue interview process {}", &interview.id.to_string()[..8]).bold()
    );

    Ok(())
}

async fn list_interviews(client: &OrchestratorClient) -> Result<()> {
    let interviews = client.list_interviews().await?;

    if interviews.is_empty() {
        println!("{}", "No interviews found.".yellow());
        return Ok(());
    }

    println!("{}", format!("Found {} interview(s):", interviews.len()).bold());
    println!();
    for interview in interviews {
        println!(
            "  {} {} {}",
            "▸".cyan(),
            interview.id.to_string().dimmed(),
            interview.candidate_name.as_deref().unwrap_or("(unnamed)")
        );
        println!(
            "    Status:  {}",
            colorize_status(interview.processing_status)
        );
        println!(
            "    Created: {}",
            interview
                .created_at
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
                .dimmed()
        );
        println!();
    }

    Ok(())
}

async fn get_interview(client: &OrchestratorClient, id: &str) -> Result<()> {
    let uuid = resolve_interview_id(client, &IdOrPrefix::parse(id)).await?;
    let interview = client.get_interview(uuid).await?;

    print_interview_details(&interview);

    Ok(())
}

async fn show_steps(client: &OrchestratorClient, id: &str) -> Result<()> {
    let uuid = resolve_interview_id(client, &IdOrPrefix::parse(id)).await?;
    let view = client.get_steps(uuid).await?;

    print_steps(&view);

    Ok(())
}

async fn show_report(client: &OrchestratorClient, id: &str, json: bool) -> Result<()> {
    let uuid = resolve_interview_id(client, &IdOrPrefix::parse(id)).await?;

    let report = match client.get_report(uuid).await {
        Ok(report) => report,
        Err(e) if e.is_not_found() => {
            println!("{}", "No report yet. Has the interview been processed?".yellow());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

async fn process_interview(
    client: &OrchestratorClient,
    id: &str,
    enhanced: bool,
    watch: bool,
) -> Result<()> {
    let uuid = resolve_interview_id(client, &IdOrPrefix::parse(id)).await?;

    let accepted = match client.process_interview(uuid, enhanced).await {
        Ok(accepted) => accepted,
        Err(e) if e.is_conflict() => {
            println!("{}", "⚠ This interview is already being processed".yellow());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!(
        "{} {} run {} started",
        "✓".green(),
        accepted.pipeline,
        accepted.run_id.to_string().dimmed()
    );

    if !watch {
        return Ok(());
    }

    let mut last_current: Option<String> = None;
    let view = client
        .watch_steps(uuid, WATCH_INTERVAL, |view| {
            let current = view.current().map(|s| s.name.clone());
            if current != last_current {
                if let Some(step) = view.current() {
                    println!(
                        "  {} {}",
                        "▸".cyan(),
                        step.message.as_deref().unwrap_or(&step.name)
                    );
                }
                last_current = current;
            }
        })
        .await?;

    println!();
    print_steps(&view);

    if view.processing_status == ProcessingStatus::Error {
        bail!(
            "Processing failed: {}",
            view.error_message.as_deref().unwrap_or("unknown error")
        );
    }

    Ok(())
}

// =============================================================================
// Output
// =============================================================================

fn print_interview_details(interview: &Interview) {
    println!("{}", "Interview Details:".bold());
    println!("  ID:        {}", interview.id.to_string().cyan());
    if let Some(name) = &interview.candidate_name {
        println!("  Candidate: {}", name);
    }
    println!("  Audio:     {}", interview.audio_path);
    println!("  Status:    {}", colorize_status(interview.processing_status));
    println!(
        "  Created:   {}",
        interview.created_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!(
        "  Updated:   {}",
        interview.updated_at.format("%Y-%m-%d %H:%M:%S")
    );

    if let Some(transcript) = &interview.transcript {
        println!("  Segments:  {}", transcript.segments.len());
    }
    if interview.encrypted_transcript.is_some() {
        println!("  Transcript stored {}", "encrypted".green());
    }
    if let Some(error) = &interview.error_message {
        println!("  Error:     {}", error.red());
    }
}

fn print_steps(view: &StepsView) {
    println!(
        "{} {}",
        "Steps:".bold(),
        colorize_status(view.processing_status)
    );

    if view.steps.is_empty() {
        println!("  {}", "Not processed yet.".dimmed());
        return;
    }

    for step in &view.steps {
        print_step(step);
    }

    if let Some(error) = &view.error_message {
        println!();
        println!("  {} {}", "Error:".red().bold(), error);
    }
}

fn print_step(step: &Step) {
    let marker = match step.status {
        StepStatus::Pending => "○".dimmed(),
        StepStatus::Processing => "◐".yellow(),
        StepStatus::Complete => "●".green(),
        StepStatus::Error => "✗".red(),
    };

    let mut line = format!("  {} {}", marker, step.name);
    if let Some(ms) = step.duration_ms {
        line.push_str(&format!(" {}", format!("({:.1}s)", ms as f64 / 1000.0).dimmed()));
    }
    if step.api_calls > 0 {
        line.push_str(&format!(
            " {}",
            format!("[{} calls, {} tokens]", step.api_calls, step.tokens_used).dimmed()
        ));
    }
    println!("{}", line);

    if let Some(message) = &step.message
        && step.status != StepStatus::Pending
    {
        println!("      {}", message.dimmed());
    }
    if let Some(warning) = &step.warning {
        println!("      {} {}", "⚠".yellow(), warning.yellow());
    }
}

fn print_report(report: &AnalysisReport) {
    println!("{}", "Analysis Report:".bold());
    println!("  Pipeline:   {}", report.pipeline);
    println!(
        "  Created:    {}",
        report.created_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!();

    println!("{}", "Scores:".bold());
    println!(
        "  JD relevance: {} ({:?})",
        score(report.jd_relevance.overall_score),
        report.jd_relevance.recommended_action
    );
    println!("  Flow:         {}", score(report.flow.blended_score));
    println!(
        "  Sentiment:    {}",
        score(report.sentiment.overall_score())
    );

    let gaps = &report.jd_relevance.skill_gap_analysis;
    if !gaps.matched_skills.is_empty() {
        println!("  Matched:      {}", gaps.matched_skills.join(", ").green());
    }
    if !gaps.missing_skills.is_empty() {
        println!("  Missing:      {}", gaps.missing_skills.join(", ").red());
    }

    if let Some(conversation) = &report.flow.conversation {
        println!();
        println!("{}", "Conversation Flow:".bold());
        println!("  Logical score:    {}", score(conversation.logical_score));
        println!("  Topic threads:    {}", conversation.branches.len());
        println!(
            "  Missed follow-ups: {}",
            conversation.missed_follow_ups.len()
        );
        for missed in &conversation.missed_follow_ups {
            println!(
                "    {} after {} ({:?}): {}",
                "▸".cyan(),
                missed.after_node,
                missed.importance,
                missed.reasoning
            );
            for question in &missed.suggested_questions {
                println!("      {}", question.dimmed());
            }
        }
    }

    if let Some(count) = report.pii_entity_count {
        println!();
        println!("  PII entities redacted: {}", count);
    }

    if let Some(alignment) = &report.resume_alignment {
        println!();
        println!("{}", "Recruiter Summary:".bold());
        println!("  {}", alignment.recruiter_report.summary);
        println!(
            "  Recommendation: {}",
            alignment.recruiter_report.recommendation.bold()
        );
    }

    if let Some(embeddings) = &report.embedding_analysis {
        println!();
        println!(
            "  Semantic similarity: {:.2}",
            embeddings.semantic_similarity
        );
    }
}

fn score(value: f64) -> ColoredString {
    let text = format!("{:.1}", value);
    if value >= 75.0 {
        text.green()
    } else if value >= 50.0 {
        text.yellow()
    } else {
        text.red()
    }
}

fn colorize_status(status: ProcessingStatus) -> ColoredString {
    match status {
        ProcessingStatus::Pending => "pending".dimmed(),
        ProcessingStatus::Processing => "processing".yellow(),
        ProcessingStatus::Complete => "complete".green(),
        ProcessingStatus::Error => "error".red(),
    }
}
