//! Terminal output: colored `[module]` prefixes and a live progress line.
//!
//! ```text
//! [build] target prod (https://example.com/)
//! [build] pages(12/40) files(3/9)          redrawn in place
//! [error] posts/a.md: footnote reference `#fn2` has no matching footnote entry
//! [done] 40 pages, 9 files in output
//! ```
//!
//! `log!("module"; ...)` always prints, `debug!("module"; ...)` only with
//! `--verbose`. A log line printed while a progress line is live replaces
//! it; the next counter update draws it again below.

use crossterm::{
    cursor, queue,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::{
    io::{StdoutLock, Write, stdout},
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// A progress line owns the current terminal row.
static PROGRESS_LIVE: AtomicBool = AtomicBool::new(false);

pub fn set_verbose(on: bool) {
    VERBOSE.store(on, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// Log a message with a colored module prefix.
///
/// ```ignore
/// log!("convert"; "{}: exit status {}", path.display(), code);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Like [`log!`], only shown with `--verbose`.
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

pub fn log(module: &str, message: &str) {
    let mut out = stdout().lock();
    if PROGRESS_LIVE.load(Ordering::Relaxed) {
        clear_row(&mut out);
    }
    writeln!(out, "{} {message}", prefix(module)).ok();
    out.flush().ok();
}

fn prefix(module: &str) -> String {
    let tag = format!("[{module}]");
    match module {
        "error" => tag.bright_red().bold().to_string(),
        "warning" => tag.yellow().bold().to_string(),
        "done" => tag.bright_green().bold().to_string(),
        "transform" | "sidenotes" => tag.bright_blue().bold().to_string(),
        _ => tag.bright_yellow().bold().to_string(),
    }
}

fn clear_row(out: &mut StdoutLock<'_>) {
    queue!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
}

// ============================================================================
// Progress line
// ============================================================================

/// One-row progress display with named counters, e.g. `pages(3/12) files(0/4)`.
///
/// Workers call [`ProgressLine::inc`] concurrently; a worker that finds the
/// row being drawn skips its redraw. Dropping the line prints its final
/// state and moves to the next row.
pub struct ProgressLine {
    module: &'static str,
    counters: Vec<Counter>,
    drawing: Mutex<()>,
}

struct Counter {
    name: &'static str,
    total: usize,
    done: AtomicUsize,
}

impl ProgressLine {
    /// Counters with a zero total are left out.
    pub fn new(module: &'static str, items: &[(&'static str, usize)]) -> Self {
        let counters = items
            .iter()
            .filter(|(_, total)| *total > 0)
            .map(|&(name, total)| Counter {
                name,
                total,
                done: AtomicUsize::new(0),
            })
            .collect();

        let progress = Self {
            module,
            counters,
            drawing: Mutex::new(()),
        };
        PROGRESS_LIVE.store(!progress.counters.is_empty(), Ordering::Relaxed);
        progress.draw(false);
        progress
    }

    pub fn inc(&self, name: &str) {
        let Some(counter) = self.counters.iter().find(|c| c.name == name) else {
            return;
        };
        counter.done.fetch_add(1, Ordering::Relaxed);
        if let Some(_guard) = self.drawing.try_lock() {
            self.draw(false);
        }
    }

    /// Print the final counts and release the row.
    pub fn finish(self) {}

    fn line(&self) -> String {
        self.counters
            .iter()
            .map(|c| format!("{}({}/{})", c.name, c.done.load(Ordering::Relaxed), c.total))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn draw(&self, last: bool) {
        if self.counters.is_empty() {
            return;
        }
        let mut out = stdout().lock();
        clear_row(&mut out);
        write!(out, "{} {}", prefix(self.module), self.line()).ok();
        if last {
            writeln!(out).ok();
        }
        out.flush().ok();
    }
}

impl Drop for ProgressLine {
    fn drop(&mut self) {
        let _guard = self.drawing.lock();
        PROGRESS_LIVE.store(false, Ordering::Relaxed);
        self.draw(true);
    }
}
