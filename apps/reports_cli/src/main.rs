use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use shared::{
    domain::{MemberId, MessageInput, MessageType, ReportId, ReportInput, ReportStatus, Site},
    error::ApiError,
    protocol::{SessionEvent, SessionRequest},
};
use site_api::Session;
use storage::{load_snapshot, save_snapshot, system_clock, Clock};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::{load_settings, Settings, SETTINGS_FILE};

#[derive(Parser, Debug)]
#[command(name = "reports", version, about = "Erosion-control work reports and team feed")]
struct Cli {
    /// Session snapshot file; overrides settings and environment.
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Reports {
        #[command(subcommand)]
        command: ReportCommand,
    },
    Messages {
        #[command(subcommand)]
        command: MessageCommand,
    },
    Team {
        #[command(subcommand)]
        command: TeamCommand,
    },
    Dashboard,
    Sites,
    /// Replace the stored session with sample data, or with nothing.
    Reset {
        #[arg(long)]
        empty: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ReportCommand {
    List {
        #[arg(long)]
        site: Option<Site>,
        #[arg(long)]
        status: Option<ReportStatus>,
    },
    Submit {
        #[arg(long)]
        site: String,
        #[arg(long)]
        work_completed: String,
        #[arg(long, allow_negative_numbers = true)]
        progress: i64,
        #[arg(long)]
        work_remaining: String,
        #[arg(long)]
        engineer: Option<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        notes: Option<String>,
    },
    Status {
        id: ReportId,
        status: ReportStatus,
    },
    Remove {
        id: ReportId,
    },
}

#[derive(Subcommand, Debug)]
enum MessageCommand {
    List,
    Send {
        content: String,
        #[arg(long)]
        author: Option<String>,
        #[arg(long = "type")]
        kind: Option<MessageType>,
    },
}

#[derive(Subcommand, Debug)]
enum TeamCommand {
    List,
    Select { id: MemberId },
}

fn request_for(command: Command) -> Option<SessionRequest> {
    let request = match command {
        Command::Reports { command } => match command {
            ReportCommand::List { site, status } => SessionRequest::ListReports { site, status },
            ReportCommand::Submit {
                site,
                work_completed,
                progress,
                work_remaining,
                engineer,
                date,
                notes,
            } => SessionRequest::SubmitReport(ReportInput {
                site,
                work_completed,
                progress_percent: progress,
                work_remaining,
                engineer,
                date,
                notes,
            }),
            ReportCommand::Status { id, status } => {
                SessionRequest::SetReportStatus { id, status }
            }
            ReportCommand::Remove { id } => SessionRequest::RemoveReport { id },
        },
        Command::Messages { command } => match command {
            MessageCommand::List => SessionRequest::ListMessages,
            MessageCommand::Send {
                content,
                author,
                kind,
            } => SessionRequest::SendMessage(MessageInput {
                content,
                author,
                kind,
            }),
        },
        Command::Team { command } => match command {
            TeamCommand::List => SessionRequest::ListTeam,
            TeamCommand::Select { id } => SessionRequest::SelectMember { id },
        },
        Command::Dashboard => SessionRequest::Dashboard,
        Command::Sites | Command::Reset { .. } => return None,
    };
    Some(request)
}

fn open_session(settings: &Settings, clock: Arc<dyn Clock>) -> Result<Session> {
    let session = match load_snapshot(&settings.snapshot_path)? {
        Some(snapshot) => Session::restore(clock, snapshot).with_context(|| {
            format!(
                "snapshot '{}' could not be restored",
                settings.snapshot_path.display()
            )
        })?,
        None if settings.seed_on_empty => {
            info!("no snapshot yet, starting from sample data");
            Session::seeded(clock)
        }
        None => Session::new(clock),
    };
    Ok(session.with_attribution(
        settings.default_engineer.clone(),
        settings.default_author.clone(),
    ))
}

/// Applies one request and persists the session when it changed.
///
/// The outer error is an I/O failure while saving; the inner one is a
/// rejected operation, after which the snapshot file is left as it was.
fn run_request(
    session: &mut Session,
    request: SessionRequest,
    snapshot_path: &Path,
) -> Result<Result<SessionEvent, ApiError>> {
    let mutating = request.is_mutating();
    let event = match session.handle(request) {
        Ok(event) => event,
        Err(err) => return Ok(Err(err)),
    };
    if mutating {
        save_snapshot(snapshot_path, &session.snapshot())?;
    }
    Ok(Ok(event))
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let (mut settings, settings_error) = load_settings();
    if let Some(path) = cli.snapshot {
        settings.snapshot_path = path;
    }

    let filter =
        EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    if let Some(err) = settings_error {
        warn!(error = %err, file = SETTINGS_FILE, "ignoring unreadable settings file");
    }

    let clock = system_clock();

    if let Command::Reset { empty } = cli.command {
        let session = if empty {
            Session::new(clock)
        } else {
            Session::seeded(clock)
        };
        save_snapshot(&settings.snapshot_path, &session.snapshot())?;
        println!("reset session at {}", settings.snapshot_path.display());
        return Ok(ExitCode::SUCCESS);
    }
    if let Command::Sites = cli.command {
        println!("{}", render::sites());
        return Ok(ExitCode::SUCCESS);
    }

    let mut session = open_session(&settings, clock.clone())?;
    let Some(request) = request_for(cli.command) else {
        return Ok(ExitCode::SUCCESS);
    };

    match run_request(&mut session, request, &settings.snapshot_path)? {
        Ok(event) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&event)?);
            } else {
                println!("{}", render::event(&event, clock.now()));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&err)?);
            } else {
                eprintln!("{}", render::error(&err));
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
