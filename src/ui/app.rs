use crate::domain::TickReport;
use crate::ui::components::gauge::{EMPTY, FILLED, SHADOW};
use crate::ui::components::{format_count, percentile_label, render_header, render_row, table_width};
use crate::ui::state::RateTracker;
use anyhow::{Context, Result};
use chrono::Local;
use crossterm::{
    cursor::MoveTo,
    queue,
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};

const TITLE: &str = "Block I/O Queue Monitor";
const TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S %Y";

/// Consumer of per-tick statistics. Must not touch sampler state.
pub trait Renderer {
    fn render(&mut self, report: &TickReport) -> Result<()>;

    /// Closing output once the loop has stopped
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Full-screen text report. Batch mode appends frames instead of redrawing,
/// for output redirected to a file.
pub struct TerminalRenderer<W: Write> {
    out: W,
    batch: bool,
    rate: RateTracker,
    total_samples: u64,
}

impl TerminalRenderer<io::Stdout> {
    pub fn stdout(batch: bool) -> Self {
        Self::new(io::stdout(), batch)
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, batch: bool) -> Self {
        Self {
            out,
            batch,
            rate: RateTracker::new(),
            total_samples: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn frame(&mut self, report: &TickReport) -> String {
        let per_sec = self.rate.update(report.total_samples(), report.timestamp);
        let timestamp = Local::now().format(TIMESTAMP_FORMAT);
        let width = table_width(&report.columns, report.bar_width);

        let mut frame = String::new();
        if self.batch {
            frame.push_str(&format!("[{}] {}\n", timestamp, TITLE));
        } else {
            frame.push_str(&format!("{} - {}\n", TITLE, timestamp));
        }
        frame.push_str(&"=".repeat(width));
        frame.push('\n');
        frame.push_str(&render_header(report.percentile, &report.columns, report.bar_width));
        frame.push('\n');
        frame.push_str(&"-".repeat(width));
        frame.push('\n');

        for device in &report.devices {
            frame.push_str(&render_row(device, report.bar_width));
            frame.push('\n');
        }
        if let Some(aggregate) = &report.aggregate {
            frame.push_str(&render_row(aggregate, report.bar_width));
            frame.push('\n');
        }

        frame.push('\n');
        frame.push_str(&format!(
            "Legend: {} = current  {} = {} (long-term)  {} = unused\n",
            FILLED,
            SHADOW,
            percentile_label(report.percentile).to_lowercase(),
            EMPTY
        ));
        frame.push_str(&format!(
            "Samples: {} total ({} in reservoir) @ {:.0}/sec\n",
            format_count(report.total_samples()),
            report.reservoir_fill(),
            per_sec
        ));
        if self.batch {
            frame.push('\n');
        }
        frame
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, report: &TickReport) -> Result<()> {
        self.total_samples = report.total_samples();
        let frame = self.frame(report);

        if !self.batch {
            queue!(self.out, MoveTo(0, 0), Clear(ClearType::All))
                .context("Failed to clear terminal")?;
        }
        // One write per frame keeps flicker down
        self.out.write_all(frame.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.batch {
            log::info!("Stopped after {} samples", self.total_samples);
        }
        writeln!(self.out, "\nStopped. Total samples: {}", self.total_samples)?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DeviceReport;
    use std::time::Instant;

    fn report() -> TickReport {
        let device = |label: &str, current, seen| DeviceReport {
            label: label.to_string(),
            size: None,
            current,
            percentile: 4,
            columns: Vec::new(),
            average: 1.0,
            utilization: 25.0,
            seen,
            reservoir_fill: 1_000,
            scale: 10,
        };
        TickReport {
            tick: 1,
            percentile: 90.0,
            bar_width: 10,
            columns: Vec::new(),
            devices: vec![device("sdc", 2, 12_345), device("sdd", 0, 12_345)],
            aggregate: None,
            timestamp: Instant::now(),
        }
    }

    fn render_to_string(batch: bool) -> String {
        let mut renderer = TerminalRenderer::new(Vec::new(), batch);
        renderer.render(&report()).unwrap();
        renderer.finish().unwrap();
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn batch_frame_has_rows_and_totals() {
        let out = render_to_string(true);
        assert!(out.starts_with('['));
        assert!(out.contains(TITLE));
        assert!(out.contains("P90"));
        assert!(out.contains("sdc"));
        assert!(out.contains("[██░░------]"));
        assert!(out.contains("[░░░░------]"));
        assert!(out.contains("p90 (long-term)"));
        assert!(out.contains("Samples: 12.3K total (1000 in reservoir)"));
        assert!(out.ends_with("Stopped. Total samples: 12345\n"));
        assert!(!out.contains('\u{1b}'));
    }

    #[test]
    fn finish_without_frames_reports_zero() {
        let mut renderer = TerminalRenderer::new(Vec::new(), false);
        renderer.finish().unwrap();
        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(out, "\nStopped. Total samples: 0\n");
    }

    #[test]
    fn interactive_frame_clears_screen() {
        let out = render_to_string(false);
        assert!(out.starts_with('\u{1b}'));
        assert!(out.contains(&format!("{} - ", TITLE)));
    }
}
