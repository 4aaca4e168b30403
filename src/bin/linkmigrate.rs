//! CLI binary for linkmigrate.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `RewriteOptions` / `EnhanceConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use linkmigrate::{
    find_department, process_html, write_html, EnhanceConfig, Enhancement, LlmEnhancer,
    MigrationOutput, Migrator, RewriteOptions, DEPARTMENTS,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Exit status when the URL phase succeeded but the enhancement pass failed.
const EXIT_ENHANCEMENT_FAILED: i32 = 2;

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

const AFTER_HELP: &str = r#"EXAMPLES:
  # Rewrite links of a saved page (stdout)
  linkmigrate pagina.html

  # Another department, with accent normalization and relative links
  linkmigrate -d seec --normalize-special-chars --relativize-links pagina.html -o nova.html

  # Read from stdin, show every rewrite step
  cat pagina.html | linkmigrate --debug -

  # Add aria-label attributes with an LLM after rewriting
  linkmigrate --enhance --provider openai --model gpt-4.1-mini pagina.html -o nova.html

  # JSON output: html, trace, count and {original, new} pairs
  linkmigrate --json pagina.html > resultado.json

  # Known department codes
  linkmigrate --list-departments

REWRITE RULES (first match wins):
  info.saude.df.gov.br, amamentabrasilia.saude.df.gov.br   left untouched
  http(s)://*.df.gov.br/...  (--relativize-links)           → /...
  .../documents/.../arquivo.pdf/...                         → /documents/d/{dept}/arquivo-pdf
  .../wp-content/... or .../wp-conteudo...                  → /documents/d/{dept}/arquivo-ext
  anything else                                             left untouched

  srcset and sizes attributes are always removed.

EXIT STATUS:
  0  success
  1  error (unreadable input, invalid options, output not written)
  2  links rewritten and written, but the --enhance pass failed

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY          OpenAI API key
  ANTHROPIC_API_KEY       Anthropic API key
  GEMINI_API_KEY          Google Gemini API key
  EDGEQUAKE_LLM_PROVIDER  Override provider (openai, anthropic, gemini, ollama)
  EDGEQUAKE_MODEL         Override model ID
  LINKMIGRATE_*           Any flag, e.g. LINKMIGRATE_DEPARTMENT=seec
"#;

/// Rewrite the links of legacy DF government pages for the new document scheme.
#[derive(Parser, Debug)]
#[command(
    name = "linkmigrate",
    version,
    about = "Rewrite links and image URLs of legacy DF government pages",
    long_about = "Rewrite href/src URLs in an HTML page to the /documents/d/{secretaria}/ \
document scheme, normalizing percent-encoded file names. Optionally run an LLM pass \
that adds aria-label attributes to every link.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// HTML file path, or `-` for stdin.
    #[arg(required_unless_present = "list_departments")]
    input: Option<String>,

    /// Department code used in rewritten paths (see --list-departments).
    #[arg(short, long, env = "LINKMIGRATE_DEPARTMENT", default_value = "saude")]
    department: String,

    /// Strip percent-encoded accents and symbols from file names.
    #[arg(long, env = "LINKMIGRATE_NORMALIZE_SPECIAL_CHARS")]
    normalize_special_chars: bool,

    /// Turn absolute *.df.gov.br URLs into relative paths.
    #[arg(long, env = "LINKMIGRATE_RELATIVIZE_LINKS")]
    relativize_links: bool,

    /// Run the LLM pass that adds aria-label attributes to links.
    #[arg(long, env = "LINKMIGRATE_ENHANCE")]
    enhance: bool,

    /// LLM provider: openai, anthropic, gemini, ollama, azure.
    #[arg(
        long,
        env = "LINKMIGRATE_PROVIDER",
        long_help = "LLM provider for --enhance. Auto-detected from API key env vars if not set.\n\
          Supported: openai, anthropic, gemini, azure, ollama, or any OpenAI-compatible URL."
    )]
    provider: Option<String>,

    /// LLM model ID (default: gpt-4.1-nano).
    #[arg(long, env = "LINKMIGRATE_MODEL")]
    model: Option<String>,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "LINKMIGRATE_TEMPERATURE", default_value_t = 0.2)]
    temperature: f32,

    /// Max tokens of the enhanced document.
    #[arg(long, env = "LINKMIGRATE_MAX_TOKENS", default_value_t = 2000)]
    max_tokens: usize,

    /// Write the resulting HTML to this file instead of stdout.
    #[arg(short, long, env = "LINKMIGRATE_OUTPUT")]
    output: Option<PathBuf>,

    /// Output structured JSON (MigrationOutput) instead of HTML.
    #[arg(long, env = "LINKMIGRATE_JSON")]
    json: bool,

    /// Print the rewrite trace to stderr.
    #[arg(long, env = "LINKMIGRATE_DEBUG")]
    debug: bool,

    /// Print the known department codes and exit.
    #[arg(long)]
    list_departments: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "LINKMIGRATE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "LINKMIGRATE_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || cli.json {
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

    // ── Catalog mode ─────────────────────────────────────────────────────
    if cli.list_departments {
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(DEPARTMENTS)
                    .context("Failed to serialize departments")?
            );
        } else {
            for d in DEPARTMENTS {
                println!("{:<12} {}", d.code, d.label);
            }
        }
        return Ok(());
    }

    let input = cli
        .input
        .as_deref()
        .context("INPUT is required unless --list-departments is given")?;
    let html = read_input(input).await?;

    let options = build_options(&cli)?;
    if find_department(&options.secretaria).is_none() {
        warn!(
            "Department '{}' is not in the catalog (see --list-departments)",
            options.secretaria
        );
    }

    // ── URL phase ────────────────────────────────────────────────────────
    let rewrite = process_html(&html, &options).context("Link rewrite failed")?;

    if cli.debug {
        eprint!("{}", rewrite.trace);
    }

    // ── Enhancement phase ────────────────────────────────────────────────
    let enhancement = if cli.enhance {
        let config = build_enhance_config(&cli)?;
        Some(run_enhancement(&cli, &config, &rewrite.html, &options.secretaria).await)
    } else {
        None
    };

    let output = MigrationOutput {
        rewrite,
        enhancement,
    };

    // ── Write results ────────────────────────────────────────────────────
    if let Some(ref output_path) = cli.output {
        write_html(output_path, output.final_html())
            .await
            .context("Failed to write output")?;
    }

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if cli.output.is_none() {
        let html = output.final_html();
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(html.as_bytes())
            .context("Failed to write to stdout")?;
        if !html.is_empty() && !html.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    }

    if !cli.quiet && !cli.json {
        print_summary(&cli, &output);
    }

    if output.enhancement_error().is_some() {
        io::stdout().flush().ok();
        std::process::exit(EXIT_ENHANCEMENT_FAILED);
    }

    Ok(())
}

/// Read the document from a file, or from stdin for `-`.
async fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut html = String::new();
        tokio::io::stdin()
            .read_to_string(&mut html)
            .await
            .context("Failed to read HTML from stdin")?;
        Ok(html)
    } else {
        tokio::fs::read_to_string(input)
            .await
            .with_context(|| format!("Failed to read HTML from {:?}", input))
    }
}

/// Map CLI args to `RewriteOptions`.
fn build_options(cli: &Cli) -> Result<RewriteOptions> {
    RewriteOptions::builder()
        .secretaria(cli.department.trim())
        .normalize_special_chars(cli.normalize_special_chars)
        .relativize_links(cli.relativize_links)
        .build()
        .context("Invalid configuration")
}

/// Map CLI args to `EnhanceConfig`.
fn build_enhance_config(cli: &Cli) -> Result<EnhanceConfig> {
    let mut builder = EnhanceConfig::builder()
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens);

    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider);
    }
    if let Some(ref model) = cli.model {
        builder = builder.model(model);
    }

    builder.build().context("Invalid configuration")
}

/// Resolve the provider and run the accessibility pass, reporting any
/// failure as [`Enhancement::Failed`].
async fn run_enhancement(
    cli: &Cli,
    config: &EnhanceConfig,
    html: &str,
    department: &str,
) -> Enhancement {
    let enhancer = match LlmEnhancer::from_config(config) {
        Ok(enhancer) => enhancer,
        Err(e) => {
            return Enhancement::Failed {
                error: e.to_string(),
            }
        }
    };

    let spinner = (!cli.quiet && !cli.json).then(|| {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  ⏱ {elapsed}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix("Enhancing");
        bar.set_message(format!("aria-labels via {}…", enhancer.provider_name()));
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    });

    let migrator = Migrator::new(enhancer);
    let result = migrator.interpret(html, department).await;

    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    match result {
        Ok(html) => Enhancement::Enhanced { html },
        Err(e) => Enhancement::Failed {
            error: e.to_string(),
        },
    }
}

/// Human-readable summary on stderr.
fn print_summary(cli: &Cli, output: &MigrationOutput) {
    let rewrite = &output.rewrite;

    eprintln!(
        "{} {} URL(s) rewritten for {}",
        green("✔"),
        bold(&rewrite.urls_normalized.to_string()),
        cyan(&cli.department)
    );
    for record in &rewrite.urls_processed {
        eprintln!("   {}", dim(&record.original));
        eprintln!("   → {}", record.rewritten);
    }

    match &output.enhancement {
        Some(Enhancement::Enhanced { .. }) => {
            eprintln!("{} aria-labels added", green("✔"));
        }
        Some(Enhancement::Failed { error }) => {
            eprintln!("{} {}", red("✘"), red(error));
            eprintln!("   {}", dim("links were rewritten; output contains the URL-phase HTML"));
        }
        None => {}
    }

    if let Some(ref path) = cli.output {
        eprintln!("   → {}", bold(&path.display().to_string()));
    }
}
