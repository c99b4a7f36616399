//! Terminal front end for the risk dashboard.
//!
//! # Usage
//!
//! ```bash
//! # One-shot: upload, print the dashboard, exit
//! intellectus analyze --students students.csv \
//!     --academic academic_records.csv --activity activity_records.csv
//!
//! # Interactive: upload once, then list / view / notify students
//! intellectus session --students students.csv \
//!     --academic academic_records.csv --activity activity_records.csv
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio_util::sync::CancellationToken;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use intellectus::analysis::{AnalysisClient, AnalysisClientConfig, UploadFile, DEFAULT_BASE_URL};
use intellectus::dashboard::{
    confirmation_prompt, render_student_table, until_interrupted, DashboardView, RelayClient,
    StudentDetail, SummaryPanel, UploadCycle, UploadSelection, DEFAULT_RELAY_URL,
};

#[derive(Parser)]
#[command(name = "intellectus", about = "Student risk dashboard", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload the spreadsheets and print the dashboard
    Analyze {
        #[command(flatten)]
        upload: UploadArgs,
        /// Print the raw records as JSON instead of the dashboard
        #[arg(long)]
        json: bool,
    },
    /// Upload the spreadsheets, then browse and notify interactively
    Session {
        #[command(flatten)]
        upload: UploadArgs,
        /// Base URL of the notification relay
        #[arg(long, env = "RELAY_URL", default_value = DEFAULT_RELAY_URL)]
        relay_url: String,
        /// Send notifications without asking for confirmation
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args)]
struct UploadArgs {
    /// Students spreadsheet
    #[arg(long)]
    students: Option<PathBuf>,
    /// Academic records spreadsheet
    #[arg(long)]
    academic: Option<PathBuf>,
    /// Activity records spreadsheet
    #[arg(long)]
    activity: Option<PathBuf>,
    /// Base URL of the analysis service
    #[arg(long, env = "ANALYSIS_BASE_URL", default_value = DEFAULT_BASE_URL)]
    analysis_url: String,
    /// Per-request timeout in seconds (omitted or 0: no timeout)
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            std::env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::WARN),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut cycle = UploadCycle::new();

    match cli.command {
        Command::Analyze { upload, json } => {
            if !run_upload(&upload, &mut cycle).await? {
                std::process::exit(1);
            }
            if json {
                let output = serde_json::json!({
                    "students": cycle.students(),
                    "summary": cycle.summary(),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print_dashboard(&cycle);
            }
        }
        Command::Session {
            upload,
            relay_url,
            yes,
        } => {
            if !run_upload(&upload, &mut cycle).await? {
                std::process::exit(1);
            }
            print_dashboard(&cycle);
            let relay = RelayClient::new(&relay_url, None)?;
            run_session(&cycle, &relay, yes).await?;
        }
    }

    Ok(())
}

/// Run one upload cycle. Returns `false` when the user has already been told
/// why nothing was analysed.
async fn run_upload(args: &UploadArgs, cycle: &mut UploadCycle) -> anyhow::Result<bool> {
    let selection = UploadSelection {
        students: read_optional(args.students.as_ref()).await?,
        academic: read_optional(args.academic.as_ref()).await?,
        activity: read_optional(args.activity.as_ref()).await?,
    };
    let bundle = match selection.to_bundle() {
        Ok(bundle) => bundle,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(false);
        }
    };

    let client = AnalysisClient::new(AnalysisClientConfig {
        base_url: args.analysis_url.clone(),
        timeout: args.timeout_secs.filter(|secs| *secs > 0).map(Duration::from_secs),
    })?;

    cycle.begin()?;
    println!("Analyzing data, please wait...");

    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };
    let outcome = client.analyze_with_cancel(&bundle, &cancel).await;
    watcher.abort();

    match cycle.finish(outcome)? {
        Some(ack) => {
            eprintln!("{}", ack);
            Ok(false)
        }
        None => Ok(true),
    }
}

async fn read_optional(path: Option<&PathBuf>) -> anyhow::Result<Option<UploadFile>> {
    match path {
        Some(path) => Ok(Some(UploadFile::from_path(path).await?)),
        None => Ok(None),
    }
}

fn print_dashboard(cycle: &UploadCycle) {
    let students = cycle.students().unwrap_or_default();
    if let Some(summary) = cycle.summary() {
        println!("{}\n", SummaryPanel::new(students, summary));
        println!("{}\n", DashboardView::new(summary));
    }
    println!("Student Risk Overview");
    if students.is_empty() {
        println!("No students were returned by the analysis service.");
    } else {
        println!("{}", render_student_table(students));
    }
}

const SESSION_HELP: &str = "Commands: list | summary | view <student_id> | notify <student_id> | help | quit";

async fn run_session(cycle: &UploadCycle, relay: &RelayClient, yes: bool) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{}", SESSION_HELP);

    loop {
        let Some(line) = prompt(&mut lines, "> ").await? else {
            break;
        };
        let mut parts = line.split_whitespace();
        match (parts.next(), parts.next()) {
            (None, _) => continue,
            (Some("quit" | "exit"), _) => break,
            (Some("help"), _) => println!("{}", SESSION_HELP),
            (Some("list"), _) => {
                println!("{}", render_student_table(cycle.students().unwrap_or_default()))
            }
            (Some("summary"), _) => print_dashboard(cycle),
            (Some("view"), Some(id)) => match cycle.student(id) {
                Some(student) => println!("{}", StudentDetail::from(student)),
                None => println!("No student with id {}", id),
            },
            (Some("notify"), Some(id)) => {
                let Some(student) = cycle.student(id) else {
                    println!("No student with id {}", id);
                    continue;
                };
                if !yes {
                    let question = format!("{} [y/N] ", confirmation_prompt(student));
                    let Some(answer) = prompt(&mut lines, &question).await? else {
                        break;
                    };
                    if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
                        continue;
                    }
                }
                let outcome = relay.notify_student(student).await;
                println!("{}", outcome.acknowledgment(relay.port()));
            }
            _ => println!("{}", SESSION_HELP),
        }
    }

    Ok(())
}

/// Next input line; `None` on end of input or Ctrl-C.
async fn prompt(lines: &mut Lines<BufReader<Stdin>>, text: &str) -> anyhow::Result<Option<String>> {
    print!("{}", text);
    std::io::stdout().flush()?;
    let interrupt = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };
    match until_interrupted(lines.next_line(), interrupt).await {
        Some(line) => Ok(line?),
        None => {
            println!();
            Ok(None)
        }
    }
}
