use anyhow::Result;
use std::time::{Duration, Instant};
use wfc_core::{ProgressInfo, WfcError};

/// Trait for reporting the progress of a generation run.
pub trait ProgressReporter: Send {
    /// Called after every step; implementations decide whether to emit anything.
    fn report(&mut self, info: &ProgressInfo) -> Result<()>;

    /// Called when an attempt completes successfully.
    fn finish(&mut self) -> Result<()>;

    /// Called when an attempt fails with an error.
    fn fail(&mut self, error: &WfcError) -> Result<()>;
}

/// A `ProgressReporter` that logs status lines, at most once per interval.
pub struct ConsoleProgressReporter {
    start_time: Instant,
    last_report_time: Option<Instant>,
    report_interval: Duration,
    reports_emitted: usize,
}

impl ConsoleProgressReporter {
    pub fn new(report_interval: Duration) -> Self {
        Self {
            start_time: Instant::now(),
            last_report_time: None,
            report_interval,
            reports_emitted: 0,
        }
    }

    /// Number of progress lines logged so far.
    pub fn reports_emitted(&self) -> usize {
        self.reports_emitted
    }

    fn format_duration(duration: Duration) -> String {
        format!("{}.{:03}s", duration.as_secs(), duration.subsec_millis())
    }

    fn percentage(info: &ProgressInfo) -> f32 {
        if info.total_cells > 0 {
            (info.collapsed_cells as f32 / info.total_cells as f32) * 100.0
        } else {
            100.0
        }
    }
}

impl ProgressReporter for ConsoleProgressReporter {
    fn report(&mut self, info: &ProgressInfo) -> Result<()> {
        let now = Instant::now();
        let due = self
            .last_report_time
            .map_or(true, |last| now.duration_since(last) >= self.report_interval);
        if !due {
            return Ok(());
        }

        let percentage = Self::percentage(info);
        let eta = if info.collapsed_cells > 0 && info.collapsed_cells < info.total_cells {
            let per_cell = info.elapsed_time.as_secs_f64() / info.collapsed_cells as f64;
            let remaining = (info.total_cells - info.collapsed_cells) as f64;
            Self::format_duration(Duration::from_secs_f64(per_cell * remaining))
        } else {
            "N/A".to_string()
        };

        log::info!(
            "Progress: Iter: {} | Collapsed: {}/{} ({:.1}%) | Elapsed: {} | ETA: {}",
            info.iterations,
            info.collapsed_cells,
            info.total_cells,
            percentage,
            Self::format_duration(info.elapsed_time),
            eta
        );
        self.last_report_time = Some(now);
        self.reports_emitted += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        log::info!(
            "Generation finished. Total time: {}",
            Self::format_duration(self.start_time.elapsed())
        );
        Ok(())
    }

    fn fail(&mut self, error: &WfcError) -> Result<()> {
        log::warn!(
            "Attempt failed: {}. Total time: {}",
            error,
            Self::format_duration(self.start_time.elapsed())
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn info(iterations: u64, collapsed_cells: usize, total_cells: usize) -> ProgressInfo {
        ProgressInfo {
            collapsed_cells,
            total_cells,
            elapsed_time: Duration::from_millis(iterations * 10),
            iterations,
        }
    }

    #[test]
    fn test_console_reporter_throttles() {
        let mut reporter = ConsoleProgressReporter::new(Duration::from_millis(50));
        reporter.report(&info(10, 50, 1000)).unwrap();
        assert_eq!(reporter.reports_emitted(), 1);

        // Immediately after: throttled.
        reporter.report(&info(11, 55, 1000)).unwrap();
        assert_eq!(reporter.reports_emitted(), 1);

        thread::sleep(Duration::from_millis(60));
        reporter.report(&info(20, 100, 1000)).unwrap();
        assert_eq!(reporter.reports_emitted(), 2);
        assert!(reporter.finish().is_ok());
    }

    #[test]
    fn test_console_reporter_zero_cells() {
        let mut reporter = ConsoleProgressReporter::new(Duration::ZERO);
        assert!(reporter.report(&info(0, 0, 0)).is_ok());
        assert!((ConsoleProgressReporter::percentage(&info(0, 0, 0)) - 100.0).abs() < f32::EPSILON);
        assert!(reporter.fail(&WfcError::Contradiction(1, 2)).is_ok());
    }
}
