//! CLI binary for pdf2pptx.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use pdf2pptx::{
    convert, default_output_path, inspect, AspectRatioSetting, ConversionConfig,
    ConversionProgressCallback, ProgressCallback, RenderMode,
};
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live bar plus one log line per slide.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Start of the page currently being converted.
    page_started: Mutex<Option<Instant>>,
}

impl CliProgressCallback {
    /// Spinner until `on_conversion_start` tells us the page count.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            page_started: Mutex::new(None),
        })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} slides  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Converting");
        self.bar.reset_eta();
    }

    fn page_elapsed(&self) -> f64 {
        self.page_started
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    /// Remove the bar without a summary, e.g. after a failure.
    fn clear(&self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_pages: usize) {
        self.activate_bar(total_pages);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Converting {total_pages} pages to slides…"))
        ));
    }

    fn on_page_start(&self, page_num: usize, _total: usize) {
        *self
            .page_started
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(Instant::now());
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_complete(&self, page_num: usize, total: usize, links: usize) {
        let elapsed = self.page_elapsed();
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {:<8}  {}",
            green("✓"),
            page_num,
            total,
            dim(&format!("{links:>3} links")),
            dim(&format!("{elapsed:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_page_error(&self, page_num: usize, total: usize, error: &str) {
        let elapsed = self.page_elapsed();

        // keep the log line on one terminal row
        let first_line = error.lines().next().unwrap_or_default();
        let msg = if first_line.chars().count() > 80 {
            let cut: String = first_line.chars().take(79).collect();
            format!("{cut}\u{2026}")
        } else {
            first_line.to_string()
        };

        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}  {}",
            red("✗"),
            page_num,
            total,
            red(&msg),
            dim(&format!("{elapsed:.1}s")),
        ));
        self.bar.abandon();
    }

    fn on_conversion_complete(&self, total_pages: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} pages converted to slides",
            green("✔"),
            bold(&total_pages.to_string())
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Raster conversion at the default 600 DPI (writes slides.pptx)
  pdf2pptx slides.pdf

  # Explicit output, lower DPI
  pdf2pptx slides.pdf deck.pptx --dpi 200

  # Force a 16:9 presentation; pages are letterboxed to fit
  pdf2pptx report.pdf --aspect-ratio 16:9

  # Vector slides through Inkscape
  pdf2pptx -svg --inkscape-path /usr/bin/inkscape slides.pdf

  # Inspect page sizes and link counts
  pdf2pptx --inspect-only slides.pdf

  # Machine-readable statistics
  pdf2pptx --json slides.pdf > stats.json

ASPECT RATIO:
  auto      use the first page's ratio (default)
  W:H       e.g. 16:9, 4:3, 1.91:1
  DECIMAL   e.g. 1.5

ENVIRONMENT VARIABLES:
  RUST_LOG          Override the log filter (e.g. RUST_LOG=pdf2pptx=debug)
  PDFIUM_LIB_PATH   Path to libpdfium, or the directory containing it
"#;

/// Convert PDF files to PowerPoint presentations, one slide per page.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2pptx",
    version,
    about = "Convert PDF files to PowerPoint presentations, one slide per page",
    long_about = "Convert each page of a PDF into a slide of a .pptx presentation. Pages are \
embedded as high-resolution PNG pictures (pdfium) or as scalable EMF pictures (Inkscape), and \
hyperlinks are kept as clickable areas on top of them.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the PDF file.
    input: PathBuf,

    /// Output presentation. Default: the input path with a .pptx extension.
    output: Option<PathBuf>,

    /// Vector mode: convert pages with Inkscape and embed them as EMF.
    /// Also accepted as `-svg`.
    #[arg(long)]
    svg: bool,

    /// Rendering DPI for raster mode. Ignored with --svg.
    #[arg(long, default_value_t = 600, value_parser = clap::value_parser!(u32).range(1..))]
    dpi: u32,

    /// Slide aspect ratio: auto, W:H (e.g. 16:9) or a decimal.
    #[arg(long, default_value = "auto", value_parser = parse_aspect_ratio)]
    aspect_ratio: AspectRatioSetting,

    /// Inkscape executable. Required with --svg.
    #[arg(long)]
    inkscape_path: Option<PathBuf>,

    /// PDF user password for encrypted documents.
    #[arg(long, allow_hyphen_values = true)]
    password: Option<String>,

    /// Maximum rendered bitmap side in pixels.
    #[arg(long, default_value_t = 16_384, value_parser = clap::value_parser!(u32).range(16..))]
    max_pixels: u32,

    /// Per-page Inkscape timeout in seconds.
    #[arg(long = "vector-timeout", default_value_t = 300, value_parser = clap::value_parser!(u64).range(1..))]
    vector_timeout: u64,

    /// Print PDF metadata, page sizes and link counts only; no conversion.
    #[arg(long)]
    inspect_only: bool,

    /// Print statistics (or --inspect-only output) as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Disable progress bar.
    #[arg(long)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn parse_aspect_ratio(s: &str) -> std::result::Result<AspectRatioSetting, String> {
    s.parse::<AspectRatioSetting>().map_err(|e| e.to_string())
}

/// Accept the single-dash `-svg` spelling alongside `--svg`.
///
/// Only a `-svg` in option position is rewritten: the value of an option
/// (`--password -svg`) and anything after `--` are passed through.
fn normalise_args(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    let takes_value: Vec<String> = Cli::command()
        .get_arguments()
        .filter(|a| !a.is_positional() && a.get_action().takes_values())
        .flat_map(|a| {
            a.get_long()
                .map(|l| format!("--{l}"))
                .into_iter()
                .chain(a.get_short().map(|c| format!("-{c}")))
        })
        .collect();

    let mut out = Vec::new();
    let mut value_next = false;
    let mut positional_only = false;
    for arg in args {
        let is_value = std::mem::take(&mut value_next);
        if !is_value && !positional_only {
            if arg == "--" {
                positional_only = true;
            } else if arg == "-svg" {
                out.push(OsString::from("--svg"));
                continue;
            } else {
                value_next = takes_value.iter().any(|o| arg == o.as_str());
            }
        }
        out.push(arg);
    }
    out
}

fn main() -> Result<()> {
    let cli = Cli::parse_from(normalise_args(std::env::args_os()));

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.inspect_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        return print_inspection(&cli);
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress = show_progress.then(CliProgressCallback::new_dynamic);
    let config = build_config(
        &cli,
        progress
            .clone()
            .map(|cb| cb as Arc<dyn ConversionProgressCallback>),
    )?;

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.input));

    // ── Run conversion ───────────────────────────────────────────────────
    let result = convert(&cli.input, &output, &config);
    if let Some(ref p) = progress {
        p.clear();
    }
    let stats = result.with_context(|| {
        format!(
            "Failed to convert '{}' to '{}'",
            cli.input.display(),
            output.display()
        )
    })?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&stats).context("Failed to serialise statistics")?
        );
    } else if !cli.quiet {
        eprintln!(
            "{}  {} slides  {}  {}  {}ms  →  {}",
            green("✔"),
            stats.slides_written,
            dim(&format!("{} links", stats.links_written)),
            dim(&format!("{} {}", stats.render_mode, stats.aspect_ratio)),
            stats.total_duration_ms,
            bold(&output.display().to_string()),
        );
        if stats.links_skipped > 0 {
            eprintln!(
                "   {} {} links could not be reproduced",
                cyan("⚠"),
                stats.links_skipped
            );
        }
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mode = if cli.svg {
        RenderMode::Vector
    } else {
        RenderMode::Raster
    };

    let mut builder = ConversionConfig::builder()
        .render_mode(mode)
        .dpi(cli.dpi)
        .max_rendered_pixels(cli.max_pixels)
        .aspect_ratio(cli.aspect_ratio)
        .vector_timeout_secs(cli.vector_timeout);

    if let Some(ref path) = cli.inkscape_path {
        builder = builder.inkscape_path(path.clone());
    }
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

fn print_inspection(cli: &Cli) -> Result<()> {
    let info = inspect(&cli.input, cli.password.as_deref()).context("Failed to inspect PDF")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&info).context("Failed to serialize metadata")?
        );
        return Ok(());
    }

    println!("File:         {}", cli.input.display());
    if let Some(ref t) = info.title {
        println!("Title:        {}", t);
    }
    if let Some(ref a) = info.author {
        println!("Author:       {}", a);
    }
    if let Some(ref s) = info.subject {
        println!("Subject:      {}", s);
    }
    println!("Pages:        {}", info.page_count);
    println!("PDF Version:  {}", info.pdf_version);
    if let Some(ref r) = info.aspect_ratio {
        println!("Aspect ratio: {}", r);
    }
    if let Some(ref p) = info.producer {
        println!("Producer:     {}", p);
    }
    if let Some(ref c) = info.creator {
        println!("Creator:      {}", c);
    }
    for page in &info.pages {
        println!(
            "  page {:>4}  {:>7.1} x {:<7.1} pt  {} links",
            page.page_num, page.size.width, page.size.height, page.link_count
        );
    }
    Ok(())
}
