use anyhow::{Context, Result};
use rand::Rng;
use std::path::Path;
use time::format_description::well_known::Rfc3339;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub fn ensure_dir(p: &Path) -> Result<()> {
    std::fs::create_dir_all(p).with_context(|| format!("create_dir_all {}", p.display()))
}

pub fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

/// Wall-clock time as unix milliseconds.
pub fn now_millis() -> i64 {
    (time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

/// `session_<unix-millis>_<9 base-36 chars>`
pub fn new_session_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("session_{}_{}", now_millis(), suffix)
}

/// Human-readable size, base 1024, at most two decimals with trailing zeros dropped.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let mut i = 0usize;
    let mut whole = bytes;
    while whole >= 1024 && i < UNITS.len() - 1 {
        whole /= 1024;
        i += 1;
    }
    let value = bytes as f64 / 1024f64.powi(i as i32);
    let rounded = (value * 100.0).round() / 100.0;
    let mut s = format!("{rounded:.2}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    format!("{s} {}", UNITS[i])
}

pub fn is_pdf_path(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}
