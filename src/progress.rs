//! Progress bar display for the sync download queue

use indicatif::{ProgressBar, ProgressStyle};

/// Progress display for a sync run
pub struct ProgressDisplay {
    bar: ProgressBar,
}

impl ProgressDisplay {
    /// Create a new progress display sized for the download queue.
    pub fn new(total_downloads: u64) -> Self {
        let style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let bar = ProgressBar::new(total_downloads);
        bar.set_style(style);

        Self { bar }
    }

    /// Record one completed operation with its report line.
    pub fn step(&self, line: &str) {
        // Removal lines scroll above the bar; download lines advance it.
        if line.starts_with("Synced ") {
            self.bar.inc(1);
        }
        self.bar.set_message(truncate_tail(line, 50));
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    pub fn abandon(&self) {
        self.bar.abandon();
    }
}

/// Keep the tail of an over-long report line. Item names are arbitrary
/// front-matter text, so the cut must land on a char boundary, never a byte
/// offset.
fn truncate_tail(line: &str, max_chars: usize) -> String {
    let count = line.chars().count();
    if count <= max_chars {
        return line.to_string();
    }
    let skip = count - (max_chars - 3);
    let start = line
        .char_indices()
        .nth(skip)
        .map_or(line.len(), |(idx, _)| idx);
    format!("...{}", &line[start..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_lines_pass_through() {
        assert_eq!(truncate_tail("Synced 1/2: finder", 50), "Synced 1/2: finder");
    }

    #[test]
    fn test_long_lines_keep_the_tail() {
        let line = format!("Synced 12/20: {}", "x".repeat(60));
        let out = truncate_tail(&line, 50);
        assert_eq!(out.chars().count(), 50);
        assert!(out.starts_with("..."));
        assert!(out.ends_with("xxx"));
    }

    #[test]
    fn test_multibyte_names_cut_on_char_boundaries() {
        let line = format!("Synced 1/1: {}", "é".repeat(60));
        let out = truncate_tail(&line, 50);
        assert_eq!(out.chars().count(), 50);
        assert!(out.ends_with('é'));
    }

    #[test]
    fn test_step_accepts_multibyte_lines() {
        let display = ProgressDisplay::new(1);
        display.step(&format!("Synced 1/1: {}", "é".repeat(30)));
        display.finish();
    }
}
