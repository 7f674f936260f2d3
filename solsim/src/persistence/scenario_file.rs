//! Plain-text scenario files
//!
//! One body per line:
//!
//! ```text
//! <Kind> <display_radius> <color> <mass> <x> <y> <vx> <vy>
//! ```
//!
//! `Kind` is `Star` or `Planet` in any letter case. Blank lines and lines
//! starting with `#` are ignored. A bad line is reported in the
//! [`LoadReport`] and skipped; the rest of the file still loads.
//!
//! Writing keeps every field exactly as stored: the kind token is written
//! as `Star`/`Planet`, the colour verbatim, and numbers in Rust's shortest
//! round-trip form (`{:?}`, which switches to exponent notation for very
//! large or small magnitudes).
//!
//! Lines that are not valid UTF-8 are skipped like any other bad line, so a
//! file with comments in a legacy encoding still loads.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{SimError, SimResult};
use crate::simulation::scenario::Scenario;
use crate::simulation::states::{Body, BodyKind, NVec2};

/// A line that could not be turned into a body
#[derive(Debug)]
pub struct SkippedLine {
    pub line_no: usize, // 1-based
    pub text: String,
    pub error: SimError,
}

/// Result of a best-effort load
#[derive(Debug)]
pub struct LoadReport {
    pub scenario: Scenario,
    pub skipped: Vec<SkippedLine>,
}

/// Parse one non-comment line into a body
pub fn parse_body(line: &str) -> SimResult<Body> {
    let mut tokens = line.split_whitespace();

    let kind: BodyKind = tokens
        .next()
        .ok_or_else(|| SimError::Parse { field: "kind", reason: "empty line".to_string() })?
        .parse()?;

    let radius = parse_number(tokens.next(), "radius")?;
    let color = tokens
        .next()
        .ok_or_else(|| SimError::Parse { field: "color", reason: "missing".to_string() })?;
    let m = parse_number(tokens.next(), "mass")?;
    let x = parse_number(tokens.next(), "x")?;
    let y = parse_number(tokens.next(), "y")?;
    let vx = parse_number(tokens.next(), "vx")?;
    let vy = parse_number(tokens.next(), "vy")?;

    Body::new(kind, m, NVec2::new(x, y), NVec2::new(vx, vy), radius, color)
}

fn parse_number(token: Option<&str>, field: &'static str) -> SimResult<f64> {
    let token = token.ok_or_else(|| SimError::Parse { field, reason: "missing".to_string() })?;
    token.parse::<f64>().map_err(|e| SimError::Parse {
        field,
        reason: format!("`{token}`: {e}"),
    })
}

/// Render one body as a scenario line (no trailing newline)
pub fn format_body(body: &Body) -> String {
    format!(
        "{} {:?} {} {:?} {:?} {:?} {:?} {:?}",
        body.kind, body.radius, body.color, body.m, body.x.x, body.x.y, body.v.x, body.v.y
    )
}

/// Best-effort parse of a whole scenario from any buffered reader.
/// Only I/O failures are fatal; bad lines end up in `skipped`.
pub fn read_scenario<R: BufRead>(reader: R) -> SimResult<LoadReport> {
    let mut bodies = Vec::new();
    let mut skipped = Vec::new();

    for (i, raw) in reader.split(b'\n').enumerate() {
        let raw = raw?;
        let (line, parsed) = match String::from_utf8(raw) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() || trimmed.starts_with('#') {
                    continue;
                }
                let parsed = parse_body(trimmed);
                (line, parsed)
            }
            Err(e) => {
                let bytes = e.as_bytes();
                if bytes.iter().find(|b| !b.is_ascii_whitespace()) == Some(&b'#') {
                    continue;
                }
                let error = SimError::Parse {
                    field: "line",
                    reason: format!("not valid UTF-8: {}", e.utf8_error()),
                };
                (String::from_utf8_lossy(bytes).into_owned(), Err(error))
            }
        };

        match parsed {
            Ok(body) => bodies.push(body),
            Err(error) => {
                log::warn!("skipping scenario line {}: {error}", i + 1);
                skipped.push(SkippedLine {
                    line_no: i + 1,
                    text: line,
                    error,
                });
            }
        }
    }

    log::info!("loaded {} bodies ({} lines skipped)", bodies.len(), skipped.len());
    Ok(LoadReport {
        scenario: Scenario::new(bodies),
        skipped,
    })
}

/// Read and parse a scenario file. An I/O error anywhere fails the whole load.
pub fn load_scenario(path: &Path) -> SimResult<LoadReport> {
    let file = File::open(path)?;
    read_scenario(BufReader::new(file))
}

pub fn write_scenario<W: Write>(mut writer: W, scenario: &Scenario) -> SimResult<()> {
    for body in scenario.bodies() {
        writeln!(writer, "{}", format_body(body))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write to a sibling temp file and rename over `path`, so a failed save
/// never leaves a half-written scenario behind
pub fn save_scenario(path: &Path, scenario: &Scenario) -> SimResult<()> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = Path::new(&tmp_name);

    let result = File::create(tmp)
        .map_err(SimError::from)
        .and_then(|f| write_scenario(BufWriter::new(f), scenario))
        .and_then(|_| fs::rename(tmp, path).map_err(SimError::from));

    if result.is_err() {
        let _ = fs::remove_file(tmp);
    }
    result
}
