mod common;

use common::{MockBackend, result, section};
use docintel::{
    config::Config,
    draft::{DraftStore, FileDraftStore},
    shell::{ShellCommand, run_with},
};
use std::io::Cursor;
use std::path::PathBuf;

fn write_pdfs(dir: &std::path::Path, n: usize) -> Vec<PathBuf> {
    (0..n)
        .map(|i| {
            let p = dir.join(format!("report{i}.pdf"));
            std::fs::write(&p, format!("%PDF-1.4 body {i}")).unwrap();
            p
        })
        .collect()
}

#[test]
fn parses_commands() {
    assert_eq!(ShellCommand::parse("  \n").unwrap(), ShellCommand::Empty);
    assert_eq!(ShellCommand::parse("rm 2").unwrap(), ShellCommand::Remove(2));
    assert!(ShellCommand::parse("rm x").is_err());
    assert_eq!(
        ShellCommand::parse("persona  Senior analyst \n").unwrap(),
        ShellCommand::Persona(" Senior analyst ".into())
    );
    assert_eq!(
        ShellCommand::parse("add a.pdf b.pdf").unwrap(),
        ShellCommand::Add(vec!["a.pdf".into(), "b.pdf".into()])
    );
    assert_eq!(ShellCommand::parse("^enter").unwrap(), ShellCommand::ModEnter);
    assert_eq!(ShellCommand::parse("esc").unwrap(), ShellCommand::Escape);
    assert!(ShellCommand::parse("launch").is_err());
}

#[test]
fn scripted_session_runs_the_workflow() {
    let dir = tempfile::tempdir().unwrap();
    let files = write_pdfs(dir.path(), 3);
    let mut cfg = Config::default();
    cfg.draft.state_dir = dir.path().join("state").display().to_string();
    let store = FileDraftStore::new(&dir.path().join("state"));

    let backend = MockBackend::returning(result(
        vec![
            section("Budget", "report1.pdf", 2, Some(0.7)),
            section("Overview", "report0.pdf", 1, Some(0.9)),
        ],
        &["report0.pdf", "report1.pdf", "report2.pdf"],
    ));

    let script = "\
persona Senior investment analyst
job Compare R&D spending across filings
analyze
quit
";
    let mut out = Vec::new();
    run_with(&cfg, &backend, &store, &files, Cursor::new(script), &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("Added 3 PDF file(s)"));
    assert!(text.contains("Uploading files..."));
    assert!(text.contains("Found 2 highly relevant sections across 3 documents"));
    let budget = text.find("Budget").unwrap();
    let overview = text.find("Overview").unwrap();
    assert!(budget < overview);

    assert_eq!(backend.calls(), ["health", "upload", "analyze", "cleanup"]);
    let saved = store.load().unwrap().expect("draft flushed on exit");
    assert_eq!(saved.persona, "Senior investment analyst");
    assert_eq!(saved.job_to_be_done, "Compare R&D spending across filings");
}

#[test]
fn rejected_input_keeps_session_alive() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = Config::default();
    cfg.backend.check_health_on_start = false;
    cfg.draft.enabled = false;
    cfg.output.cleanup_on_exit = false;
    let store = FileDraftStore::new(dir.path());
    let notes = dir.path().join("notes.txt");
    std::fs::write(&notes, "plain").unwrap();

    let backend = MockBackend::returning(Default::default());
    let script = format!("add {}\nrm 0\nanalyze\nbogus\n", notes.display());
    let mut out = Vec::new();
    run_with(&cfg, &backend, &store, &[], Cursor::new(script), &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("Please select PDF files only"));
    assert!(text.contains("No file at position 0"));
    assert!(text.contains("Need 3 more file(s)"));
    assert!(text.contains("unknown command: bogus"));
    assert!(backend.calls().is_empty());
}

#[test]
fn padded_text_is_saved_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = Config::default();
    cfg.backend.check_health_on_start = false;
    cfg.output.cleanup_on_exit = false;
    let store = FileDraftStore::new(dir.path());

    let backend = MockBackend::returning(Default::default());
    let script = "persona   padded persona text   \njob\tgoal with tab\t\r\nquit\n";
    let mut out = Vec::new();
    run_with(&cfg, &backend, &store, &[], Cursor::new(script), &mut out).unwrap();

    let saved = store.load().unwrap().expect("draft flushed on exit");
    assert_eq!(saved.persona, "  padded persona text   ");
    assert_eq!(saved.job_to_be_done, "goal with tab\t");
    assert!(backend.calls().is_empty());
}
