use crate::{
    backend::{self, Backend, http::HttpBackend},
    config::Config,
    controller::{App, Effect, Event},
    intake::read_incoming,
    model::Session,
    render::results_for,
    shell,
    util::{ensure_dir, now_rfc3339},
    workflow::Phase,
};
use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "docintel")]
#[command(about = "Persona-driven document section ranking client (upload + analyze)")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./docintel.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Query /api/health.
    Health {},
    /// Stage PDFs, submit them and print the ranked sections.
    Analyze {
        /// PDF to stage (3 to 10).
        #[arg(long = "file", required = true)]
        files: Vec<PathBuf>,
        /// Describe the user's background, expertise, and role.
        #[arg(long)]
        persona: Option<String>,
        /// Define the specific task or goal to accomplish.
        #[arg(long)]
        job: Option<String>,
        /// Prefill persona and job from a canned example (academic, business, education).
        #[arg(long)]
        sample: Option<String>,
        /// Print the raw analysis result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Interactive session with draft autosave.
    Shell {
        #[arg(long = "file")]
        files: Vec<PathBuf>,
    },
    /// Release server-side resources held for a session.
    Cleanup {
        #[arg(long)]
        session: String,
    },
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg = match resolve_config_path(args.config.as_deref()) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };
    let _guard = init_logging(&args, &cfg)?;

    match &args.cmd {
        Command::Health {} => health(&cfg),
        Command::Analyze {
            files,
            persona,
            job,
            sample,
            json,
        } => analyze(
            &cfg,
            files,
            persona.as_deref(),
            job.as_deref(),
            sample.as_deref(),
            *json || cfg.output.json,
        ),
        Command::Shell { files } => {
            let backend = HttpBackend::new(&cfg)?;
            shell::run(&cfg, &backend, files)
        }
        Command::Cleanup { session } => {
            let backend = HttpBackend::new(&cfg)?;
            backend
                .cleanup(session)
                .map_err(|e| anyhow!("cleanup failed: {e}"))?;
            info!(session_id = %session, "session cleaned up");
            Ok(())
        }
    }
}

fn resolve_config_path(user: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = user {
        return Some(p.to_path_buf());
    }
    let default = PathBuf::from("docintel.toml");
    default.exists().then_some(default)
}

/// Stderr keeps stdout free for rendered panels. The optional file layer
/// writes next to the draft slot unless `logging.file_path` names a file.
fn init_logging(args: &Args, cfg: &Config) -> Result<Option<WorkerGuard>> {
    let level = args.log_level.as_deref().unwrap_or(cfg.logging.level.as_str());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let console = if cfg.logging.json {
        console.json().boxed()
    } else {
        console.boxed()
    };

    let mut guard = None;
    let file_layer = match log_file_path(cfg) {
        Some(path) => {
            ensure_dir(path.parent().unwrap_or_else(|| Path::new(".")))?;
            let file = std::fs::File::create(&path)
                .with_context(|| format!("create log file: {}", path.display()))?;
            let (writer, g) = tracing_appender::non_blocking(file);
            guard = Some(g);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;
    Ok(guard)
}

fn log_file_path(cfg: &Config) -> Option<PathBuf> {
    let logging = &cfg.logging;
    match (logging.write_to_file, logging.file_path.as_str()) {
        (false, _) => None,
        (true, "") => Some(Path::new(&cfg.draft.state_dir).join("docintel.log")),
        (true, explicit) => Some(PathBuf::from(explicit)),
    }
}

fn health(cfg: &Config) -> Result<()> {
    let backend = HttpBackend::new(cfg)?;
    let (healthy, detail) = match backend.health() {
        Ok(h) => (h.is_healthy(), serde_json::to_value(&h)?),
        Err(e) => {
            warn!("health check failed: {e}");
            (false, serde_json::json!({ "error": e.to_string() }))
        }
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "base_url": cfg.backend.base_url,
            "checked_at": now_rfc3339(),
            "healthy": healthy,
            "response": detail,
        }))?
    );
    if !healthy {
        bail!("backend is not healthy: {}", cfg.backend.base_url);
    }
    Ok(())
}

fn analyze(
    cfg: &Config,
    paths: &[PathBuf],
    persona: Option<&str>,
    job: Option<&str>,
    sample: Option<&str>,
    json: bool,
) -> Result<()> {
    let backend = HttpBackend::new(cfg)?;
    let mut app = App::with_quiet_period(Session::new(), cfg.draft.quiet_period());
    info!(session_id = app.session().id(), "session created");

    if cfg.backend.check_health_on_start {
        log_status(&app.report_health(backend::check_health(&backend)));
    }

    let batch = paths
        .iter()
        .map(|p| read_incoming(p))
        .collect::<Result<Vec<_>>>()?;
    let now = Instant::now();
    fail_on_status(&app.dispatch(Event::Pick(batch), now))?;

    if let Some(name) = sample {
        if app.dispatch(Event::LoadSample(name.to_string()), now).is_empty() {
            bail!("unknown sample: {name}");
        }
    }
    if let Some(text) = persona {
        app.dispatch(Event::PersonaInput(text.to_string()), now);
    }
    if let Some(text) = job {
        app.dispatch(Event::JobInput(text.to_string()), now);
    }

    let gate = app.gate();
    if !gate.enabled {
        bail!("cannot analyze yet: {}", gate.label);
    }

    app.dispatch(Event::AnalyzeClicked, now);
    while app.in_flight() {
        eprint!("{}", results_for(&app));
        app.advance(&backend);
    }

    if cfg.output.cleanup_on_exit {
        backend::cleanup_session(&backend, app.session().id());
    }

    match app.phase() {
        Phase::Success(result) if json => {
            println!("{}", serde_json::to_string_pretty(result)?);
            Ok(())
        }
        Phase::Failed(msg) => {
            print!("{}", results_for(&app));
            Err(anyhow!("analysis failed: {msg}"))
        }
        _ => {
            print!("{}", results_for(&app));
            Ok(())
        }
    }
}

fn fail_on_status(effects: &[Effect]) -> Result<()> {
    for e in effects {
        if let Effect::Status(s) = e {
            if s.is_error() {
                bail!("{}", s.message);
            }
        }
    }
    Ok(())
}

/// One-shot mode has no banner area; notices go to the log.
fn log_status(effects: &[Effect]) {
    for e in effects {
        if let Effect::Status(s) = e {
            warn!("{s}");
        }
    }
}
