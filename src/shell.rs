//! Line-driven interactive front end. Each line becomes one controller
//! [`Event`]; the returned effects are rendered to the output stream.

use crate::{
    backend::{self, Backend},
    config::Config,
    controller::{App, Effect, Event, Key},
    draft::{DraftStore, FileDraftStore},
    intake::read_incoming,
    model::{IncomingFile, Session},
    render::{char_counter, file_rows, results_for},
    util::now_millis,
};
use anyhow::{Result, anyhow, bail};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

const HELP: &str = "\
commands:
  add <pdf>...      stage files (picker)
  drop <pdf>...     stage files (drag and drop)
  rm <index>        remove a staged file
  persona <text>    set the persona
  job <text>        set the job to be done
  sample <name>     load academic | business | education
  list              show files, inputs, button and results
  analyze           click the analyze button
  ^enter            ctrl+enter shortcut
  esc               clear a rendered result
  reset             try again / back to placeholder
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Add(Vec<PathBuf>),
    Drop(Vec<PathBuf>),
    Remove(usize),
    Persona(String),
    Job(String),
    Sample(String),
    List,
    Analyze,
    ModEnter,
    Escape,
    Reset,
    Help,
    Quit,
    Empty,
}

impl ShellCommand {
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim_end_matches(['\r', '\n']).trim_start();
        // Persona and job keep the raw remainder; trimming happens at submit.
        let (head, raw) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = raw.trim();
        let paths = || rest.split_whitespace().map(PathBuf::from).collect::<Vec<_>>();
        let cmd = match head {
            "" => ShellCommand::Empty,
            "add" => ShellCommand::Add(paths()),
            "drop" => ShellCommand::Drop(paths()),
            "rm" | "remove" => {
                let idx = rest
                    .parse::<usize>()
                    .map_err(|_| anyhow!("rm expects a file index, got {rest:?}"))?;
                ShellCommand::Remove(idx)
            }
            "persona" => ShellCommand::Persona(raw.to_string()),
            "job" => ShellCommand::Job(raw.to_string()),
            "sample" => ShellCommand::Sample(rest.to_string()),
            "list" | "status" => ShellCommand::List,
            "analyze" => ShellCommand::Analyze,
            "^enter" | "ctrl+enter" | "cmd+enter" => ShellCommand::ModEnter,
            "esc" | "escape" => ShellCommand::Escape,
            "reset" | "retry" => ShellCommand::Reset,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" | "q" => ShellCommand::Quit,
            other => bail!("unknown command: {other} (try `help`)"),
        };
        Ok(cmd)
    }
}

pub fn run<B: Backend>(cfg: &Config, backend: &B, files: &[PathBuf]) -> Result<()> {
    let store = FileDraftStore::new(Path::new(&cfg.draft.state_dir));
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_with(
        cfg,
        backend,
        &store,
        files,
        stdin.lock(),
        &mut stdout.lock(),
    )
}

pub fn run_with<B: Backend + ?Sized, R: BufRead, W: Write>(
    cfg: &Config,
    backend: &B,
    store: &dyn DraftStore,
    files: &[PathBuf],
    mut input: R,
    out: &mut W,
) -> Result<()> {
    let mut app = App::with_quiet_period(Session::new(), cfg.draft.quiet_period());
    tracing::info!(session_id = app.session().id(), "session created");

    if cfg.backend.check_health_on_start {
        let effects = app.report_health(backend::check_health(backend));
        apply(&app, &effects, out)?;
    }
    if cfg.draft.enabled {
        let effects = app.restore_draft(store, now_millis(), cfg.draft.max_age());
        apply(&app, &effects, out)?;
    }
    if !files.is_empty() {
        let effects = app.dispatch(Event::Pick(read_batch(files)?), Instant::now());
        apply(&app, &effects, out)?;
    }
    apply(&app, &[Effect::RenderResults, Effect::RenderGate], out)?;

    loop {
        write!(out, "> ")?;
        out.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        if cfg.draft.enabled {
            app.poll_draft(Instant::now(), store, now_millis());
        }

        let cmd = match ShellCommand::parse(&line) {
            Ok(cmd) => cmd,
            Err(err) => {
                writeln!(out, "{err}")?;
                continue;
            }
        };

        let now = Instant::now();
        let event = match cmd {
            ShellCommand::Quit => break,
            ShellCommand::Empty => continue,
            ShellCommand::Help => {
                writeln!(out, "{HELP}")?;
                continue;
            }
            ShellCommand::List => {
                let all = [
                    Effect::RenderFileList,
                    Effect::RenderInputs,
                    Effect::RenderGate,
                    Effect::RenderResults,
                ];
                apply(&app, &all, out)?;
                continue;
            }
            ShellCommand::Add(paths) | ShellCommand::Drop(paths) if paths.is_empty() => {
                writeln!(out, "no files given")?;
                continue;
            }
            ShellCommand::Add(paths) => match read_batch(&paths) {
                Ok(batch) => Event::Pick(batch),
                Err(err) => {
                    writeln!(out, "{err:#}")?;
                    continue;
                }
            },
            ShellCommand::Drop(paths) => match read_batch(&paths) {
                Ok(batch) => Event::Drop(batch),
                Err(err) => {
                    writeln!(out, "{err:#}")?;
                    continue;
                }
            },
            ShellCommand::Remove(idx) => Event::Remove(idx),
            ShellCommand::Persona(text) => Event::PersonaInput(text),
            ShellCommand::Job(text) => Event::JobInput(text),
            ShellCommand::Sample(name) => Event::LoadSample(name),
            ShellCommand::Analyze => Event::AnalyzeClicked,
            ShellCommand::ModEnter => Event::Key(Key::ModEnter),
            ShellCommand::Escape => Event::Key(Key::Escape),
            ShellCommand::Reset => Event::ResetClicked,
        };

        let effects = app.dispatch(event, now);
        apply(&app, &effects, out)?;
        while app.in_flight() {
            let effects = app.advance(backend);
            apply(&app, &effects, out)?;
        }
    }

    if cfg.draft.enabled {
        app.flush_draft(store, now_millis());
    }
    if cfg.output.cleanup_on_exit {
        backend::cleanup_session(backend, app.session().id());
    }
    Ok(())
}

fn read_batch(paths: &[PathBuf]) -> Result<Vec<IncomingFile>> {
    paths.iter().map(|p| read_incoming(p)).collect()
}

/// Renders each effect against the current state.
pub fn apply<W: Write>(app: &App, effects: &[Effect], out: &mut W) -> Result<()> {
    for effect in effects {
        match effect {
            Effect::Status(status) => writeln!(out, "{status}")?,
            Effect::RenderFileList => {
                if app.files().is_empty() {
                    writeln!(out, "(no files staged)")?;
                }
                for row in file_rows(app.files()) {
                    writeln!(out, "{row}")?;
                }
            }
            Effect::RenderGate => writeln!(out, "{}", app.gate())?,
            Effect::RenderInputs => {
                writeln!(out, "persona: {}", char_counter(app.persona()))?;
                writeln!(out, "job:     {}", char_counter(app.job()))?;
            }
            Effect::RenderResults => write!(out, "{}", results_for(app))?,
        }
    }
    Ok(())
}
