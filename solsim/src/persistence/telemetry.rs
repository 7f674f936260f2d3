//! Per-step telemetry for one tracked body
//!
//! Each record is one line: `<elapsed> <x> <y> <vx> <vy>`.

use std::cell::RefCell;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::SimResult;
use crate::simulation::states::Body;

pub trait TelemetrySink {
    /// A new run is starting; the next record starts a fresh log
    fn begin_run(&mut self);

    fn record(&mut self, elapsed: f64, body: &Body) -> SimResult<()>;
}

impl<T: TelemetrySink> TelemetrySink for Rc<RefCell<T>> {
    fn begin_run(&mut self) {
        self.borrow_mut().begin_run();
    }

    fn record(&mut self, elapsed: f64, body: &Body) -> SimResult<()> {
        self.borrow_mut().record(elapsed, body)
    }
}

pub fn format_record(elapsed: f64, body: &Body) -> String {
    format!("{} {} {} {} {}", elapsed, body.x.x, body.x.y, body.v.x, body.v.y)
}

/// Appends records to a text file. The first record of a run truncates it.
#[derive(Debug)]
pub struct FileTelemetry {
    path: PathBuf,
    fresh: bool,
}

impl FileTelemetry {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            fresh: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TelemetrySink for FileTelemetry {
    fn begin_run(&mut self) {
        self.fresh = true;
    }

    fn record(&mut self, elapsed: f64, body: &Body) -> SimResult<()> {
        let file: File = if self.fresh {
            File::create(&self.path)?
        } else {
            OpenOptions::new().append(true).create(true).open(&self.path)?
        };
        let mut out = BufWriter::new(file);
        writeln!(out, "{}", format_record(elapsed, body))?;
        out.flush()?;
        self.fresh = false;
        Ok(())
    }
}

/// Keeps records in memory as `(elapsed, body)` rows
#[derive(Debug, Default)]
pub struct MemoryTelemetry {
    pub rows: Vec<(f64, Body)>,
    pub runs: usize, // number of begin_run calls
}

impl TelemetrySink for MemoryTelemetry {
    fn begin_run(&mut self) {
        self.rows.clear();
        self.runs += 1;
    }

    fn record(&mut self, elapsed: f64, body: &Body) -> SimResult<()> {
        self.rows.push((elapsed, body.clone()));
        Ok(())
    }
}
