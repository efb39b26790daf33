//! kreport CLI - Korean official report generation and export tool

mod gemini;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use kreport::export::{PdfOptions, PrintSpooler, SpoolOutcome};
use kreport::render::{screen_page, to_json, to_text};
use kreport::session::SourceInput;
use kreport::{
    date, ExportFormat, ExportOptions, ExporterRegistry, GenerateRequest, JsonFormat, PrintStrategy,
    ReportForm, SourceFile, Theme, ThemeStore, Workflow,
};

use gemini::{GeminiClient, DEFAULT_MODEL};

/// File written next to the exports so a report can be refined later.
const SESSION_FILE: &str = "kreport-session.json";

#[derive(Parser)]
#[command(name = "kreport")]
#[command(author = "kreport contributors")]
#[command(version)]
#[command(about = "Generate, refine and export Korean official reports", long_about = None)]
struct Cli {
    /// Display theme for screen output (defaults to the saved preference)
    #[arg(long, global = true, env = "KREPORT_THEME")]
    theme: Option<Theme>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render report markdown to HTML, text or JSON
    Render {
        /// Report markdown file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "page")]
        format: RenderFormat,
    },

    /// Generate a report from a file or text with Gemini
    #[command(alias = "gen")]
    Generate {
        #[command(flatten)]
        form: FormArgs,

        #[command(flatten)]
        gemini: GeminiArgs,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = "report")]
        output: PathBuf,

        /// Export formats
        #[arg(long, value_delimiter = ',', default_value = "word,pdf")]
        formats: Vec<ExportFormat>,
    },

    /// Regenerate a report with a revision comment
    Refine {
        /// Directory written by `generate`
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Revision comment
        #[arg(short, long)]
        comment: String,

        #[command(flatten)]
        gemini: GeminiArgs,

        /// Export formats
        #[arg(long, value_delimiter = ',', default_value = "word,pdf")]
        formats: Vec<ExportFormat>,
    },

    /// Export report markdown to Word, print, PDF and other formats
    Export {
        /// Report markdown file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output: PathBuf,

        /// Export formats
        #[arg(long, value_delimiter = ',', default_value = "word,print,pdf")]
        formats: Vec<ExportFormat>,

        /// Produce the print output as PDF instead of HTML
        #[arg(long)]
        print_pdf: bool,
    },

    /// Send a report to the system print command
    Print {
        /// Report markdown file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print command
        #[arg(long, default_value = "lp")]
        command: String,

        /// Extra print command arguments
        #[arg(long = "arg", value_name = "ARG")]
        args: Vec<String>,

        /// Seconds to wait for the print command
        #[arg(long, default_value = "30")]
        timeout: u64,

        /// Print the PDF instead of the HTML print document
        #[arg(long)]
        pdf: bool,
    },

    /// Show report information
    Info {
        /// Report markdown file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show or change the saved theme
    Theme {
        /// New theme
        #[arg(value_enum)]
        action: Option<ThemeAction>,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum RenderFormat {
    /// Standalone themed HTML page
    Page,
    /// HTML fragment
    Html,
    /// Plain text
    Text,
    /// Pretty JSON
    Json,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ThemeAction {
    Light,
    Dark,
    Toggle,
}

#[derive(clap::Args)]
struct FormArgs {
    /// Source file (JPG, PNG, WEBP or PDF)
    #[arg(short, long, value_name = "FILE", conflicts_with = "text")]
    file: Option<PathBuf>,

    /// Source text
    #[arg(short, long)]
    text: Option<String>,

    /// Team name (팀명)
    #[arg(long)]
    team: String,

    /// Report date (일시), today if not specified
    #[arg(long)]
    date: Option<String>,

    /// Author (작성자)
    #[arg(long)]
    author: String,

    /// Approval line after the author, comma separated (결재라인)
    #[arg(long)]
    approval: String,

    /// Additional instructions (추가 지시사항)
    #[arg(long)]
    instructions: Option<String>,

    /// Template document whose structure the report should follow
    #[arg(long, value_name = "FILE")]
    template: Option<PathBuf>,
}

#[derive(clap::Args)]
struct GeminiArgs {
    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Gemini model
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,
}

/// Request and result of the last generation.
#[derive(Serialize, Deserialize)]
struct SavedSession {
    request: GenerateRequest,
    markdown: String,
}

type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let store = theme_store();
    let theme = cli
        .theme
        .unwrap_or_else(|| store.as_ref().map_or(Theme::Light, |s| s.load_or(Theme::Light)));

    let result = match cli.command {
        Some(Commands::Render {
            input,
            output,
            format,
        }) => cmd_render(&input, output.as_deref(), format, theme),
        Some(Commands::Generate {
            form,
            gemini,
            output,
            formats,
        }) => cmd_generate(form, &gemini, &output, &formats, theme),
        Some(Commands::Refine {
            dir,
            comment,
            gemini,
            formats,
        }) => cmd_refine(&dir, &comment, &gemini, &formats, theme),
        Some(Commands::Export {
            input,
            output,
            formats,
            print_pdf,
        }) => cmd_export(&input, &output, &formats, print_pdf, theme),
        Some(Commands::Print {
            input,
            command,
            args,
            timeout,
            pdf,
        }) => cmd_print(&input, &command, &args, timeout, pdf),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Theme { action }) => cmd_theme(store.as_ref(), action, theme),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: kreport <COMMAND>".yellow());
            println!("       kreport --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        let message = match e.downcast_ref::<kreport::Error>() {
            Some(err) => err.user_message(),
            None => e.to_string(),
        };
        eprintln!("{}: {}", "Error".red().bold(), message);
        std::process::exit(1);
    }
}

fn theme_store() -> Option<ThemeStore> {
    dirs::config_dir().map(|dir| ThemeStore::new(dir.join("kreport").join("settings.json")))
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn export_options(workflow: &Workflow, theme: Theme) -> ExportOptions {
    let mut pdf = PdfOptions::new();
    if let Some(report) = workflow.report() {
        let info = report.document().info();
        if let Some(title) = info.title {
            pdf = pdf.with_title(title);
        }
        if let Some(author) = info.author {
            pdf = pdf.with_author(author);
        }
    }
    ExportOptions::new().with_pdf_options(pdf).with_theme(theme)
}

fn write_exports(
    workflow: &mut Workflow,
    formats: &[ExportFormat],
    output: &Path,
    options: &ExportOptions,
) -> CliResult {
    fs::create_dir_all(output)?;
    let registry = ExporterRegistry::with_defaults();

    println!("\n{}", "Output files:".green().bold());
    for (i, format) in formats.iter().enumerate() {
        let artifact = workflow.export(format.name(), &registry, options)?;
        let path = artifact.write_to(output)?;
        let branch = if i + 1 == formats.len() { "└─" } else { "├─" };
        println!("  {} {}", branch.dimmed(), path.display());
    }
    Ok(())
}

fn save_session(dir: &Path, session: &SavedSession) -> CliResult {
    fs::create_dir_all(dir)?;
    fs::write(dir.join(SESSION_FILE), serde_json::to_string_pretty(session)?)?;
    fs::write(dir.join("report.md"), &session.markdown)?;
    Ok(())
}

fn cmd_render(
    input: &Path,
    output: Option<&Path>,
    format: RenderFormat,
    theme: Theme,
) -> CliResult {
    let markdown = fs::read_to_string(input)?;
    let report = kreport::render_report(&markdown)?;

    let content = match format {
        RenderFormat::Page => screen_page(&report, theme),
        RenderFormat::Html => report.fragment().to_string(),
        RenderFormat::Text => to_text(report.document(), &Default::default())?,
        RenderFormat::Json => to_json(report.document(), JsonFormat::Pretty)?,
    };

    if let Some(path) = output {
        fs::write(path, &content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }

    Ok(())
}

fn read_form(args: FormArgs) -> CliResult<ReportForm> {
    let mut form = ReportForm::new()
        .with_team(args.team)
        .with_author(args.author)
        .with_approval_line(args.approval);

    if let Some(date) = args.date {
        form = form.with_date(date::normalize_report_date(&date)?);
    }
    if let Some(instructions) = args.instructions {
        form = form.with_instructions(instructions);
    }
    if let Some(path) = args.template {
        form = form.with_template(fs::read_to_string(path)?);
    }
    form.source = match (args.file, args.text) {
        (Some(path), _) => Some(SourceInput::File(SourceFile::open(path)?)),
        (None, Some(text)) => Some(SourceInput::Text(text)),
        (None, None) => None,
    };
    Ok(form)
}

fn cmd_generate(
    args: FormArgs,
    gemini: &GeminiArgs,
    output: &Path,
    formats: &[ExportFormat],
    theme: Theme,
) -> CliResult {
    let client = GeminiClient::new(&gemini.api_key, gemini.model.as_str())?;
    let mut workflow = Workflow::new().with_theme(theme);
    *workflow.form_mut() = read_form(args)?;

    let pending = workflow.begin_generate()?;
    let pb = spinner(workflow.loading_message().unwrap_or_default());
    let result = pending.run(&client, &client);
    pb.finish_and_clear();
    workflow.complete(pending.token(), result)?;

    let source_text = workflow.source_text().unwrap_or_default().to_string();
    let session = SavedSession {
        request: workflow.form().to_request(source_text),
        markdown: workflow
            .report()
            .map(|r| r.source().to_string())
            .unwrap_or_default(),
    };
    save_session(output, &session)?;
    println!("{} {}", "Generated report with".green(), client.model());

    let options = export_options(&workflow, theme);
    write_exports(&mut workflow, formats, output, &options)
}

fn cmd_refine(
    dir: &Path,
    comment: &str,
    gemini: &GeminiArgs,
    formats: &[ExportFormat],
    theme: Theme,
) -> CliResult {
    let saved: SavedSession = serde_json::from_str(&fs::read_to_string(dir.join(SESSION_FILE))?)?;
    let client = GeminiClient::new(&gemini.api_key, gemini.model.as_str())?;

    let mut workflow = Workflow::new().with_theme(theme);
    *workflow.form_mut() = ReportForm::from_request(&saved.request);
    workflow.resume(&saved.request.source_text, &saved.markdown)?;

    let pending = workflow.begin_refine(comment)?;
    let pb = spinner(workflow.loading_message().unwrap_or_default());
    let result = pending.run(&client, &client);
    pb.finish_and_clear();
    workflow.complete(pending.token(), result)?;

    let session = SavedSession {
        markdown: workflow
            .report()
            .map(|r| r.source().to_string())
            .unwrap_or_default(),
        ..saved
    };
    save_session(dir, &session)?;
    println!("{}", "Report refined".green());

    let options = export_options(&workflow, theme);
    write_exports(&mut workflow, formats, dir, &options)
}

fn load_workflow(input: &Path, theme: Theme) -> CliResult<Workflow> {
    let markdown = fs::read_to_string(input)?;
    let mut workflow = Workflow::new().with_theme(theme);
    workflow.resume("", &markdown)?;
    Ok(workflow)
}

fn cmd_export(
    input: &Path,
    output: &Path,
    formats: &[ExportFormat],
    print_pdf: bool,
    theme: Theme,
) -> CliResult {
    let mut workflow = load_workflow(input, theme)?;
    let mut options = export_options(&workflow, theme);
    if print_pdf {
        options = options.with_print_strategy(PrintStrategy::Pdf);
    }
    write_exports(&mut workflow, formats, output, &options)
}

fn cmd_print(input: &Path, command: &str, args: &[String], timeout: u64, pdf: bool) -> CliResult {
    let mut workflow = load_workflow(input, Theme::Light)?;
    let mut options = export_options(&workflow, Theme::Light);
    if pdf {
        options = options.with_print_strategy(PrintStrategy::Pdf);
    }

    let spooler = args
        .iter()
        .fold(PrintSpooler::new(command), |s, arg| s.arg(arg.as_str()))
        .with_timeout(Duration::from_secs(timeout));

    let pb = spinner("인쇄 작업을 보내는 중...");
    let outcome = workflow.print(&spooler, &ExporterRegistry::with_defaults(), &options);
    pb.finish_and_clear();

    match outcome? {
        SpoolOutcome::Completed => println!("{} {}", "Sent to".green(), spooler.program()),
        SpoolOutcome::TimedOut => println!(
            "{} {} did not finish within {}s",
            "Warning:".yellow().bold(),
            spooler.program(),
            timeout
        ),
    }
    Ok(())
}

fn cmd_info(input: &Path) -> CliResult {
    let markdown = fs::read_to_string(input)?;
    let report = kreport::render_report(&markdown)?;
    let info = report.document().info();
    let stats = report.stats();

    println!("{}", "Report Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    if let Some(ref title) = info.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref team) = info.team {
        println!("{}: {}", "Team".bold(), team);
    }
    if let Some(ref date) = info.date {
        println!("{}: {}", "Date".bold(), date);
    }
    if let Some(ref author) = info.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if !info.approvers.is_empty() {
        println!("{}: {}", "Approval".bold(), info.approvers.join(" → "));
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Blocks".bold(), report.document().len());
    println!("{}: {}", "Tables".bold(), stats.table_count);
    for (depth, count) in stats.outline_counts.iter().enumerate() {
        println!("{}: {}", format!("Outline level {}", depth).bold(), count);
    }
    println!("{}: {}", "Paragraphs".bold(), stats.paragraph_count);
    println!("{}: {}", "Characters".bold(), stats.char_count);

    Ok(())
}

fn cmd_theme(store: Option<&ThemeStore>, action: Option<ThemeAction>, current: Theme) -> CliResult {
    let store = store.ok_or("No configuration directory available")?;
    let theme = match action {
        None => current,
        Some(ThemeAction::Toggle) => store.toggle(current)?,
        Some(ThemeAction::Light) => {
            store.save(Theme::Light)?;
            Theme::Light
        }
        Some(ThemeAction::Dark) => {
            store.save(Theme::Dark)?;
            Theme::Dark
        }
    };
    println!("{}: {}", "Theme".bold(), theme.to_string().cyan());
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "kreport".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Korean official report generation tool");
    println!();
    println!("Library: kreport {}", kreport::VERSION);
    println!("License: MIT");
}
