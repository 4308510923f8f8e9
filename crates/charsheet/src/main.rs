#![forbid(unsafe_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use charsheet_core::store::DirProfileStore;
use charsheet_core::ProfileStore;
use charsheet_engine::provider::openai::DEFAULT_BASE_URL;
use charsheet_engine::provider::{OpenAiGenerator, StubGenerator};
use charsheet_engine::{
    GenerationConfig, GenerationError, ProfileGenerator, ProfileService, ReasoningEffort,
    RetryPolicy, RetryingGenerator,
};
use charsheet_http::{build_router, AppState};

#[derive(Parser)]
#[command(
    name = "charsheet",
    version,
    about = "Structured character profiles from a single name."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Run the HTTP API.
    Serve {
        /// Address to listen on.
        #[arg(long, env = "CHARSHEET_BIND", default_value = "127.0.0.1:3000")]
        bind: SocketAddr,

        /// Directory of saved profile .json files.
        #[arg(long, env = "CHARSHEET_PROFILE_DIR", default_value = "./datas")]
        profile_dir: PathBuf,

        #[command(flatten)]
        gen: GenArgs,
    },

    /// Generate one profile and print it as JSON.
    Generate {
        /// Character name (trimmed, 1-100 UTF-16 code units).
        name: String,

        /// Write to file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print Markdown instead of JSON.
        #[arg(long)]
        markdown: bool,

        #[command(flatten)]
        gen: GenArgs,
    },

    /// Validate profile JSON files against the schema.
    Validate {
        /// One or more .json file paths.
        #[arg(required = true)]
        files: Vec<String>,
    },

    /// Schema check with a structured report.
    Check {
        /// Path to profile .json file.
        file: String,

        /// Output structured JSON report.
        #[arg(long)]
        json: bool,
    },

    /// Summarize saved profiles as a table.
    List {
        /// Directory containing saved profiles.
        #[arg(env = "CHARSHEET_PROFILE_DIR", default_value = "./datas")]
        dir: PathBuf,
    },

    /// Render a saved profile as Markdown.
    Show {
        /// Profile file name, e.g. `luffy.json`.
        file: String,

        /// Directory containing saved profiles.
        #[arg(long, env = "CHARSHEET_PROFILE_DIR", default_value = "./datas")]
        dir: PathBuf,

        /// Include only these sections (comma-separated).
        #[arg(long, value_delimiter = ',')]
        sections: Vec<String>,
    },

    /// Print the canonical profile schema.
    Schema,

    /// Print the system instruction sent to the provider.
    Prompt,
}

/// Generator settings shared by `serve` and `generate`.
#[derive(Args)]
struct GenArgs {
    /// OpenAI-compatible API base URL.
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// API key (required unless --stub).
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long, env = "CHARSHEET_MODEL", default_value = "gpt-5")]
    model: String,

    /// minimal, low, medium or high.
    #[arg(long, env = "CHARSHEET_REASONING_EFFORT", default_value = "low")]
    reasoning_effort: ReasoningEffort,

    /// Deadline for one generation, in seconds.
    #[arg(long, env = "CHARSHEET_TIMEOUT_SECS", default_value_t = 120)]
    timeout_secs: u64,

    /// Retries for transient provider errors (0 disables).
    #[arg(long, env = "CHARSHEET_MAX_RETRIES", default_value_t = 0)]
    max_retries: u32,

    /// Use the offline sample generator instead of a provider.
    #[arg(long, env = "CHARSHEET_STUB")]
    stub: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Cmd::Serve {
            bind,
            profile_dir,
            gen,
        } => cmd_serve(bind, profile_dir, &gen).await,

        Cmd::Generate {
            name,
            output,
            markdown,
            gen,
        } => cmd_generate(&name, output.as_deref(), markdown, &gen).await,

        Cmd::Validate { files } => cmd_validate(&files),

        Cmd::Check { file, json } => cmd_check(&file, json),

        Cmd::List { dir } => cmd_list(dir),

        Cmd::Show {
            file,
            dir,
            sections,
        } => cmd_show(&file, dir, &sections),

        Cmd::Schema => cmd_schema(),

        Cmd::Prompt => cmd_prompt(),
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "charsheet=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn with_retry<G: ProfileGenerator + 'static>(g: G, max_retries: u32) -> Arc<dyn ProfileGenerator> {
    if max_retries == 0 {
        Arc::new(g)
    } else {
        Arc::new(RetryingGenerator::new(g, RetryPolicy::with_max_retries(max_retries)))
    }
}

fn build_service(args: &GenArgs) -> Result<ProfileService> {
    let config = GenerationConfig {
        model: args.model.clone(),
        reasoning_effort: args.reasoning_effort,
        timeout: Duration::from_secs(args.timeout_secs),
    };

    let generator = if args.stub {
        tracing::warn!("using the offline stub generator");
        with_retry(StubGenerator, args.max_retries)
    } else {
        let Some(key) = args.api_key.as_deref().filter(|k| !k.is_empty()) else {
            bail!("OPENAI_API_KEY is required unless --stub is set");
        };
        let provider = OpenAiGenerator::new(&args.base_url, key, config.timeout)?;
        with_retry(provider, args.max_retries)
    };

    ProfileService::new(generator, config).context("cannot build the profile service")
}

async fn cmd_serve(bind: SocketAddr, profile_dir: PathBuf, gen: &GenArgs) -> Result<()> {
    let service = build_service(gen)?;
    let store = DirProfileStore::new(profile_dir);
    tracing::info!(dir = %store.dir().display(), "serving saved profiles");

    let app = build_router(AppState {
        service,
        store: Arc::new(store),
    });

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    tracing::info!(%bind, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    tracing::info!("shutdown complete");
    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("cannot listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("cannot listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received SIGINT, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}

async fn cmd_generate(
    name: &str,
    output: Option<&std::path::Path>,
    markdown: bool,
    gen: &GenArgs,
) -> Result<()> {
    let service = build_service(gen)?;
    let profile = match service.generate_for_name(name).await {
        Ok(p) => p,
        Err(e) => {
            report_generation_error(&e);
            bail!("{e}");
        }
    };

    let text = if markdown {
        charsheet_core::render::to_markdown(&profile, &[])
    } else {
        format!("{}\n", serde_json::to_string_pretty(&profile)?)
    };

    match output {
        Some(path) => {
            std::fs::write(path, &text)
                .with_context(|| format!("cannot write {}", path.display()))?;
            eprintln!("  wrote {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn report_generation_error(e: &GenerationError) {
    match e {
        GenerationError::InvalidInput(errs) => {
            if let Ok(flat) = serde_json::to_string_pretty(&errs.flatten()) {
                eprintln!("{flat}");
            }
        }
        GenerationError::GenerationFailed(charsheet_engine::FailureCause::NonConforming(vs)) => {
            for v in vs {
                eprintln!("       {v}");
            }
        }
        _ => {}
    }
}

fn cmd_validate(files: &[String]) -> Result<()> {
    let (passed, failed) = charsheet_core::schema::validate_files(files)?;
    eprintln!("\n{passed} passed, {failed} failed");
    if failed > 0 {
        bail!("{failed} file(s) failed validation");
    }
    Ok(())
}

fn cmd_check(file: &str, json_out: bool) -> Result<()> {
    let content = std::fs::read_to_string(file).with_context(|| format!("cannot read {file}"))?;
    let data: serde_json::Value =
        serde_json::from_str(&content).with_context(|| format!("{file}: invalid JSON"))?;

    let report = charsheet_core::schema::check(&data, file);

    if json_out {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        if report.pass {
            eprintln!("  ok  {file}");
        } else {
            eprintln!("  FAIL {file}");
        }
        for e in &report.errors {
            eprintln!(
                "  error {}: {} {}",
                e.code,
                e.message,
                e.path.as_deref().unwrap_or("")
            );
        }
    }

    if !report.pass {
        bail!("check failed for {file}");
    }
    Ok(())
}

fn cmd_list(dir: PathBuf) -> Result<()> {
    let store = DirProfileStore::new(dir);
    let rows = charsheet_core::list::scan(&store)?;
    charsheet_core::list::print_table(&rows);
    Ok(())
}

fn cmd_show(file: &str, dir: PathBuf, sections: &[String]) -> Result<()> {
    for s in sections {
        if !charsheet_core::render::SECTIONS.contains(&s.as_str()) {
            bail!(
                "unknown section '{s}' (expected one of: {})",
                charsheet_core::render::SECTIONS.join(", ")
            );
        }
    }
    let store = DirProfileStore::new(dir);
    let profile = store
        .read(file)
        .with_context(|| format!("cannot load {file}"))?;
    print!("{}", charsheet_core::render::to_markdown(&profile, sections));
    Ok(())
}

fn cmd_schema() -> Result<()> {
    print!("{}", charsheet_core::schema::SCHEMA_JSON);
    Ok(())
}

fn cmd_prompt() -> Result<()> {
    print!("{}", charsheet_core::prompt::system_instruction()?);
    Ok(())
}
