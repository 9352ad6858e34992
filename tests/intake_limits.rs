mod common;

use common::{not_pdf, pdf, pdfs};
use docintel::{
    controller::{Effect, Status, StatusKind},
    intake::{MAX_FILES, StagedFiles},
};
use std::collections::HashSet;

fn status_of(effects: &[Effect]) -> Option<&Status> {
    effects.iter().find_map(|e| match e {
        Effect::Status(s) => Some(s),
        _ => None,
    })
}

fn assert_invariants(files: &StagedFiles) {
    assert!(files.len() <= MAX_FILES);
    let ids: HashSet<(String, u64)> = files.iter().map(|f| (f.name.clone(), f.size)).collect();
    assert_eq!(ids.len(), files.len(), "duplicate (name, size) staged");
}

#[test]
fn adds_pdfs_in_order() {
    let mut files = StagedFiles::new();
    let effects = files.add_files(pdfs(3, "doc"));
    assert_eq!(files.len(), 3);
    let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["doc0.pdf", "doc1.pdf", "doc2.pdf"]);
    assert!(effects.contains(&Effect::RenderFileList));
    assert!(effects.contains(&Effect::RenderGate));
    assert_eq!(status_of(&effects), Some(&Status::success("Added 3 PDF file(s)")));
}

#[test]
fn over_cap_batch_is_rejected_whole() {
    let mut files = StagedFiles::new();
    files.add_files(pdfs(8, "a"));
    let effects = files.add_files(pdfs(3, "b"));
    assert_eq!(files.len(), 8);
    assert!(files.iter().all(|f| f.name.starts_with('a')));
    assert_eq!(effects.len(), 1);
    assert_eq!(status_of(&effects), Some(&Status::error("Maximum 10 files allowed")));
}

#[test]
fn cap_check_counts_duplicates_in_batch() {
    let mut files = StagedFiles::new();
    files.add_files(pdfs(9, "a"));
    // Both are duplicates of staged files, but they still count against the cap.
    let effects = files.add_files(vec![pdf("a0.pdf", 100), pdf("a1.pdf", 101)]);
    assert_eq!(files.len(), 9);
    assert_eq!(status_of(&effects).map(|s| s.kind), Some(StatusKind::Error));
}

#[test]
fn empty_after_filter_is_an_error() {
    let mut files = StagedFiles::new();
    let effects = files.add_files(vec![not_pdf("notes.txt"), not_pdf("img.png")]);
    assert!(files.is_empty());
    assert_eq!(status_of(&effects), Some(&Status::error("Please select PDF files only")));
}

#[test]
fn mixed_batch_drops_non_pdfs_and_reports_pdf_count() {
    let mut files = StagedFiles::new();
    let effects = files.add_files(vec![pdf("a.pdf", 1), not_pdf("b.txt"), pdf("c.pdf", 2)]);
    assert_eq!(files.len(), 2);
    assert_eq!(status_of(&effects), Some(&Status::success("Added 2 PDF file(s)")));
}

#[test]
fn duplicates_by_name_and_size_are_skipped() {
    let mut files = StagedFiles::new();
    files.add_files(vec![pdf("report.pdf", 10)]);
    let effects = files.add_files(vec![
        pdf("report.pdf", 10),
        pdf("report.pdf", 11),
        pdf("other.pdf", 10),
    ]);
    assert_eq!(files.len(), 3);
    // Count reflects the offered batch, not what was admitted.
    assert_eq!(status_of(&effects), Some(&Status::success("Added 3 PDF file(s)")));
    assert_invariants(&files);
}

#[test]
fn fills_exactly_to_cap() {
    let mut files = StagedFiles::new();
    files.add_files(pdfs(4, "a"));
    files.add_files(pdfs(6, "b"));
    assert_eq!(files.len(), MAX_FILES);
    let effects = files.add_files(vec![pdf("late.pdf", 1)]);
    assert_eq!(files.len(), MAX_FILES);
    assert_eq!(status_of(&effects).map(|s| s.kind), Some(StatusKind::Error));
}

#[test]
fn invariants_hold_across_many_batches() {
    let mut files = StagedFiles::new();
    for round in 0..25usize {
        let batch = (0..(round % 4) + 1)
            .map(|i| pdf(&format!("f{}.pdf", (round + i) % 7), 10 + ((round * i) % 3)))
            .collect();
        files.add_files(batch);
        assert_invariants(&files);
        if round % 5 == 4 && !files.is_empty() {
            files.remove_file(0);
            assert_invariants(&files);
        }
    }
}

#[test]
fn remove_by_index() {
    let mut files = StagedFiles::new();
    files.add_files(pdfs(3, "doc"));
    let effects = files.remove_file(1);
    let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["doc0.pdf", "doc2.pdf"]);
    assert_eq!(status_of(&effects), Some(&Status::success("File removed")));
}

#[test]
fn remove_out_of_range_is_guarded() {
    let mut files = StagedFiles::new();
    files.add_files(pdfs(2, "doc"));
    let effects = files.remove_file(2);
    assert_eq!(files.len(), 2);
    assert_eq!(effects, vec![Effect::Status(Status::error("No file at position 2"))]);
}
