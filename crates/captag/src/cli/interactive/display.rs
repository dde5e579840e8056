//! Rendering of the form's result area.

use captag_core::{FormState, PipelineState};
use console::Style;

const BAR_WIDTH: usize = 20;

/// Print the run status, the caption field, any warning or error, and the
/// ranked subjects. Prints nothing while a run is unfinished.
pub fn print_result(form: &FormState) {
    let status = form.status();
    let Some(marker) = status_marker(status) else {
        return;
    };
    let dim = Style::new().for_stderr().dim();
    let label = Style::new().for_stderr().bold();
    let marker_style = match marker {
        "✓" => Style::new().for_stderr().green(),
        "!" => Style::new().for_stderr().yellow(),
        _ => Style::new().for_stderr().red(),
    };

    eprintln!();
    eprintln!("  {} {}", marker_style.apply_to(marker), label.apply_to(status));
    if let Some(error) = form.error() {
        eprintln!("    {error}");
        eprintln!();
        return;
    }
    eprintln!();

    eprintln!("  {}", label.apply_to("Caption"));
    for line in form.caption().lines() {
        eprintln!("    {line}");
    }
    eprintln!();

    if let Some(warning) = form.warning() {
        eprintln!("  {} {warning}", marker_style.apply_to(marker));
        eprintln!();
        return;
    }

    let project = form
        .project()
        .map(|p| format!(" ({p})"))
        .unwrap_or_default();
    eprintln!("  {}{}", label.apply_to("Subjects"), dim.apply_to(project));
    let ranked = form.subjects().ranked();
    if ranked.is_empty() {
        eprintln!("    {}", dim.apply_to("No subjects suggested."));
    }
    let width = ranked.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    for (subject, score) in ranked {
        eprintln!(
            "    {:<width$}  {} {}",
            subject,
            Style::new().for_stderr().cyan().apply_to(score_bar(score)),
            dim.apply_to(format!("{score:.3}"))
        );
    }
    eprintln!();
}

/// Marker for a finished run; `None` while the run can still move on.
fn status_marker(status: PipelineState) -> Option<&'static str> {
    if !status.is_terminal() {
        return None;
    }
    Some(match status {
        PipelineState::SubjectsFailed => "!",
        s if s.is_success() => "✓",
        _ => "✗",
    })
}

/// Fixed-width bar for a score in `0.0..=1.0`; out-of-range values are clamped.
fn score_bar(score: f64) -> String {
    let filled = (score.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_bar() {
        assert_eq!(score_bar(0.0), "░".repeat(BAR_WIDTH));
        assert_eq!(score_bar(1.0), "█".repeat(BAR_WIDTH));
        assert_eq!(score_bar(0.5).chars().filter(|c| *c == '█').count(), 10);
        assert_eq!(score_bar(7.0), score_bar(1.0));
        assert_eq!(score_bar(-1.0).chars().count(), BAR_WIDTH);
    }

    #[test]
    fn test_status_marker() {
        assert_eq!(status_marker(PipelineState::SubjectsReady), Some("✓"));
        assert_eq!(status_marker(PipelineState::SubjectsFailed), Some("!"));
        assert_eq!(status_marker(PipelineState::CaptionFailed), Some("✗"));
        assert_eq!(status_marker(PipelineState::Idle), None);
        assert_eq!(status_marker(PipelineState::SubjectsInFlight), None);
    }
}
