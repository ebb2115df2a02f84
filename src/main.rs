//! coursedesk - batch administration from the terminal
//!
//! Thin command-line front end over the library: every command builds a
//! [`BatchBoard`] and goes through the same validation, optimistic update and
//! reconciliation paths the library exposes.

#![allow(missing_docs)]

use anyhow::{Context, bail};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use coursedesk::core::lesson::{Bookmark, Lesson};
use coursedesk::utils::logging::init_logging;
use coursedesk::{
    Batch, BatchApi, BatchBoard, BatchFilter, BatchStatus, BatchType, Curriculum, DeskConfig,
    FileStore, HttpBatchApi, LessonNotes, LoadSource, MemoryBatchApi, NewBatch,
    NewIndividualBatch, Notice, NoticeLevel, RefreshScheduler, ScheduleEntry, build_info,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

#[derive(Parser)]
#[command(name = "coursedesk", version, about = "Manage course batches on the platform")]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, env = "COURSEDESK_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Work against built-in sample data instead of the server
    #[arg(long, global = true)]
    offline: bool,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Batch listing and lifecycle
    Batches {
        #[command(subcommand)]
        command: BatchCommand,
    },
    /// List courses
    Courses,
    /// List instructors
    Instructors,
    /// List students
    Students {
        #[arg(long)]
        page: Option<u32>,
    },
    /// Keep the batch list fresh until interrupted
    Watch(WatchArgs),
    /// Lesson viewer helpers
    Lesson {
        #[command(subcommand)]
        command: LessonCommand,
    },
}

#[derive(Subcommand)]
enum BatchCommand {
    /// List batches
    List(ListArgs),
    /// Show one batch as the server has it
    Show { id: String },
    /// Create a group batch
    CreateGroup(CreateArgs),
    /// Create a 1:1 batch
    CreateIndividual {
        #[command(flatten)]
        batch: CreateArgs,
        /// Student to enroll right away
        #[arg(long)]
        student: Option<String>,
    },
    /// Move a batch to another status
    Status { id: String, status: BatchStatus },
    /// Delete a batch
    Delete {
        id: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args)]
struct ListArgs {
    #[arg(long)]
    course: Option<String>,
    #[arg(long)]
    status: Option<BatchStatus>,
    #[arg(long = "type")]
    batch_type: Option<BatchType>,
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    page: Option<u32>,
}

impl ListArgs {
    fn into_filter(self) -> BatchFilter {
        BatchFilter {
            course: self.course,
            status: self.status,
            batch_type: self.batch_type,
            search: self.search,
            page: self.page,
        }
    }
}

#[derive(Args)]
struct CreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    code: String,
    /// Course id
    #[arg(long)]
    course: String,
    /// Defaults to 20 for group batches and 1 for individual ones
    #[arg(long)]
    capacity: Option<u32>,
    /// YYYY-MM-DD
    #[arg(long)]
    start: NaiveDate,
    /// YYYY-MM-DD
    #[arg(long)]
    end: NaiveDate,
    /// Weekly slot such as "Monday 09:00-11:00"; repeatable
    #[arg(long = "slot", value_parser = parse_slot)]
    schedule: Vec<ScheduleEntry>,
    /// Instructor id
    #[arg(long)]
    instructor: Option<String>,
    #[arg(long, default_value = "Upcoming")]
    status: BatchStatus,
    #[arg(long)]
    description: Option<String>,
}

impl CreateArgs {
    fn into_new_batch(self, batch_type: BatchType) -> NewBatch {
        let default_capacity = match batch_type {
            BatchType::Group => 20,
            BatchType::Individual => 1,
        };
        NewBatch {
            name: self.name,
            code: self.code,
            course_id: self.course,
            capacity: self.capacity.unwrap_or(default_capacity),
            start_date: self.start,
            end_date: self.end,
            schedule: self.schedule,
            instructor_id: self.instructor,
            batch_type,
            status: self.status,
            description: self.description,
        }
    }
}

#[derive(Args)]
struct WatchArgs {
    /// Polling interval in seconds
    #[arg(long)]
    interval: Option<u64>,
    /// Start with polling switched off
    #[arg(long)]
    no_auto: bool,
}

#[derive(Subcommand)]
enum LessonCommand {
    /// Lesson after the given one
    Next { curriculum: PathBuf, lesson_id: String },
    /// Lesson before the given one
    Prev { curriculum: PathBuf, lesson_id: String },
    /// Show notes, or replace them when text is given (empty text clears)
    Note {
        lesson_id: String,
        text: Option<String>,
    },
    /// Bookmark a point in the lesson video
    Bookmark {
        lesson_id: String,
        time_secs: f64,
        label: String,
    },
    /// Mark a lesson completed and print curriculum progress
    Complete { curriculum: PathBuf, lesson_id: String },
}

fn parse_slot(value: &str) -> Result<ScheduleEntry, String> {
    let (day, times) = value
        .trim()
        .split_once(' ')
        .ok_or_else(|| format!("expected 'DAY HH:MM-HH:MM', got '{}'", value))?;
    let (start, end) = times
        .trim()
        .split_once('-')
        .ok_or_else(|| format!("expected 'HH:MM-HH:MM', got '{}'", times))?;
    Ok(ScheduleEntry::new(day, start.trim(), end.trim()))
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = DeskConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
        config.validate()?;
    }
    init_logging(&config.logging)?;
    debug!("coursedesk {}", build_info());

    let output = Output { json: cli.json };
    let api = || -> anyhow::Result<Arc<dyn BatchApi>> {
        if cli.offline {
            Ok(Arc::new(MemoryBatchApi::with_sample_data()))
        } else {
            Ok(Arc::new(HttpBatchApi::new(&config.api)?))
        }
    };

    match cli.command {
        Commands::Lesson { command } => run_lesson(&config, command, &output),
        Commands::Batches { command } => run_batches(api()?, command, &output).await,
        Commands::Courses => {
            let courses = BatchBoard::new(api()?).courses().await;
            output.list(&courses, |c| format!("{:<26} {}", c.id, c.title))
        }
        Commands::Instructors => {
            let instructors = BatchBoard::new(api()?).instructors().await;
            output.list(&instructors, |i| {
                format!("{:<26} {:<24} {}", i.id, i.name, i.email.as_deref().unwrap_or("-"))
            })
        }
        Commands::Students { page } => {
            let students = BatchBoard::new(api()?).students(page).await?;
            output.list(&students, |s| {
                format!("{:<26} {:<24} {}", s.id, s.name, s.email.as_deref().unwrap_or("-"))
            })
        }
        Commands::Watch(args) => watch(&config, api()?, args, &output).await,
    }
}

async fn run_batches(
    api: Arc<dyn BatchApi>,
    command: BatchCommand,
    output: &Output,
) -> anyhow::Result<()> {
    match command {
        BatchCommand::List(args) => {
            let board = BatchBoard::with_filter(api, args.into_filter());
            if board.load().await? == LoadSource::Fallback {
                output.banner(board.banner());
            }
            output.batches(&board.batches())
        }
        BatchCommand::Show { id } => {
            let batch = BatchBoard::new(api).fetch_batch(&id).await?;
            output.batch(&batch)
        }
        BatchCommand::CreateGroup(args) => {
            let board = BatchBoard::new(api);
            let request = args.into_new_batch(BatchType::Group);
            let result = board.create_group(&request).await;
            output.notices(board.take_notices());
            output.value(&result?)
        }
        BatchCommand::CreateIndividual { batch, student } => {
            let board = BatchBoard::new(api);
            let request = NewIndividualBatch {
                batch: batch.into_new_batch(BatchType::Individual),
                student_id: student,
            };
            let result = board.create_individual(&request).await;
            output.notices(board.take_notices());
            output.value(&result?)
        }
        BatchCommand::Status { id, status } => {
            let board = loaded_board(api).await?;
            let result = board.change_status(&id, status).await;
            output.notices(board.take_notices());
            result?;
            Ok(())
        }
        BatchCommand::Delete { id, yes } => {
            if !yes {
                bail!("refusing to delete batch {} without --yes", id);
            }
            let board = loaded_board(api).await?;
            let result = board.delete(&id).await;
            output.notices(board.take_notices());
            result?;
            Ok(())
        }
    }
}

/// A board loaded from the server; mutating sample data would be misleading
async fn loaded_board(api: Arc<dyn BatchApi>) -> anyhow::Result<BatchBoard> {
    let board = BatchBoard::new(api);
    if board.load().await? == LoadSource::Fallback {
        bail!(
            "{}",
            board
                .banner()
                .unwrap_or_else(|| "could not load batches".to_string())
        );
    }
    Ok(board)
}

async fn watch(
    config: &DeskConfig,
    api: Arc<dyn BatchApi>,
    args: WatchArgs,
    output: &Output,
) -> anyhow::Result<()> {
    let mut refresh = config.refresh.clone();
    if let Some(interval) = args.interval {
        refresh.interval_secs = interval;
    }
    if args.no_auto {
        refresh.auto_refresh = false;
    }
    refresh.validate()?;

    let board = Arc::new(BatchBoard::new(api));
    let mut revisions = board.subscribe();
    if board.load().await? == LoadSource::Fallback {
        output.banner(board.banner());
    }
    output.batches(&board.batches())?;
    let _ = revisions.borrow_and_update();

    let handle = RefreshScheduler::spawn(Arc::clone(&board), &refresh);
    let mut auto = refresh.auto_refresh;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    eprintln!("r: refresh  f: focus  v: visible  a: toggle auto refresh  q: quit");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = revisions.changed() => {
                if changed.is_err() {
                    break;
                }
                let revision = *revisions.borrow_and_update();
                eprintln!("-- refresh #{} --", revision);
                output.batches(&board.batches())?;
            }
            line = lines.next_line() => match line?.as_deref().map(str::trim) {
                None | Some("q") => break,
                Some("r") => {
                    if let Err(e) = handle.refresh_now().await {
                        eprintln!("Refresh failed: {}", e);
                    }
                }
                Some("f") => handle.notify_focus(),
                Some("v") => handle.notify_visibility(),
                Some("a") => {
                    auto = !auto;
                    handle.set_auto_refresh(auto);
                    eprintln!("Auto refresh {}", if auto { "on" } else { "off" });
                }
                Some(_) => {}
            },
        }
    }

    handle.unmount().await;
    Ok(())
}

fn run_lesson(config: &DeskConfig, command: LessonCommand, output: &Output) -> anyhow::Result<()> {
    let open_notes = || -> anyhow::Result<LessonNotes<FileStore>> {
        let store = FileStore::open(config.storage.lesson_store_path())?;
        Ok(LessonNotes::new(store))
    };

    match command {
        LessonCommand::Next {
            curriculum,
            lesson_id,
        } => {
            let curriculum = read_curriculum(&curriculum)?;
            let adjacent = curriculum
                .adjacent(&lesson_id)
                .with_context(|| format!("lesson {} is not in this curriculum", lesson_id))?;
            output.lesson(adjacent.next, "last lesson")
        }
        LessonCommand::Prev {
            curriculum,
            lesson_id,
        } => {
            let curriculum = read_curriculum(&curriculum)?;
            let adjacent = curriculum
                .adjacent(&lesson_id)
                .with_context(|| format!("lesson {} is not in this curriculum", lesson_id))?;
            output.lesson(adjacent.previous, "first lesson")
        }
        LessonCommand::Note { lesson_id, text } => {
            let notes = open_notes()?;
            match text {
                Some(text) => notes.save_notes(&lesson_id, &text)?,
                None => println!("{}", notes.notes(&lesson_id)),
            }
            Ok(())
        }
        LessonCommand::Bookmark {
            lesson_id,
            time_secs,
            label,
        } => {
            let bookmarks = open_notes()?.add_bookmark(&lesson_id, Bookmark::new(time_secs, label))?;
            output.list(&bookmarks, |b| format!("{:>8.1}s  {}", b.time_secs, b.label))
        }
        LessonCommand::Complete {
            curriculum,
            lesson_id,
        } => {
            let curriculum = read_curriculum(&curriculum)?;
            if curriculum.lesson(&lesson_id).is_none() {
                bail!("lesson {} is not in this curriculum", lesson_id);
            }
            let notes = open_notes()?;
            notes.mark_completed(&lesson_id, true)?;
            let done = notes.completed_lessons(&curriculum);
            println!(
                "{}/{} lessons completed ({:.0}%)",
                done.len(),
                curriculum.total_lessons(),
                curriculum.completion(&done) * 100.0
            );
            Ok(())
        }
    }
}

fn read_curriculum(path: &Path) -> anyhow::Result<Curriculum> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading curriculum {}", path.display()))?;
    Ok(Curriculum::from_json(&text)?)
}

struct Output {
    json: bool,
}

impl Output {
    fn value(&self, value: &serde_json::Value) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        Ok(())
    }

    fn list<T: serde::Serialize>(&self, items: &[T], row: impl Fn(&T) -> String) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(items)?);
        } else {
            for item in items {
                println!("{}", row(item));
            }
        }
        Ok(())
    }

    fn batches(&self, batches: &[Batch]) -> anyhow::Result<()> {
        if !self.json {
            println!(
                "{:<26} {:<28} {:<10} {:<10} {:>5}/{:<5}",
                "ID", "NAME", "TYPE", "STATUS", "ENR", "CAP"
            );
        }
        self.list(batches, |b| {
            format!(
                "{:<26} {:<28} {:<10} {:<10} {:>5}/{:<5}",
                b.id,
                truncate(&b.name, 28),
                b.batch_type,
                b.status,
                b.enrolled,
                b.capacity
            )
        })
    }

    fn batch(&self, batch: &Batch) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(batch)?);
            return Ok(());
        }
        println!("{} ({})", batch.name, batch.code);
        println!("  id:         {}", batch.id);
        println!(
            "  course:     {}",
            batch
                .course_name
                .as_deref()
                .or(batch.course_id.as_deref())
                .unwrap_or("-")
        );
        println!("  type:       {}", batch.batch_type);
        println!("  status:     {}", batch.status);
        println!("  seats:      {}/{}", batch.enrolled, batch.capacity);
        if let (Some(start), Some(end)) = (batch.start_date, batch.end_date) {
            println!("  dates:      {} .. {}", start, end);
        }
        let instructor = batch
            .instructor
            .display_name()
            .or(batch.instructor.id())
            .unwrap_or("unassigned");
        println!("  instructor: {}", instructor);
        for slot in &batch.schedule {
            println!("  slot:       {} {}-{}", slot.day, slot.start_time, slot.end_time);
        }
        let next: Vec<String> = batch.allowed_next().iter().map(|s| s.to_string()).collect();
        println!("  next:       {}", next.join(", "));
        Ok(())
    }

    fn lesson(&self, lesson: Option<&Lesson>, edge: &str) -> anyhow::Result<()> {
        match lesson {
            Some(lesson) if self.json => println!("{}", serde_json::to_string_pretty(lesson)?),
            Some(lesson) => println!("{}  {}", lesson.id, lesson.title),
            None => eprintln!("Already at the {}", edge),
        }
        Ok(())
    }

    fn banner(&self, banner: Option<String>) {
        if let Some(banner) = banner {
            eprintln!("! {}", banner);
        }
    }

    fn notices(&self, notices: Vec<Notice>) {
        for notice in notices {
            match notice.level {
                NoticeLevel::Success => eprintln!("ok: {}", notice.message),
                NoticeLevel::Error => eprintln!("error: {}", notice.message),
            }
        }
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let cut: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{}~", cut)
    }
}
