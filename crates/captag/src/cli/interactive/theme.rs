//! Look of the interactive form.
//!
//! Prompts use a blue/magenta palette so the form stands apart from the
//! log lines `tracing` writes to the same terminal. The banner names the
//! model and Annif server the session talks to.

use captag_core::Captag;
use console::{style, Style};
use dialoguer::theme::ColorfulTheme;

/// Dialoguer theme for every prompt of the form.
pub fn captag_theme() -> ColorfulTheme {
    let blue = Style::new().for_stderr().blue();
    ColorfulTheme {
        prompt_prefix: style("◆".to_string()).for_stderr().magenta(),
        prompt_style: Style::new().for_stderr().bold(),
        active_item_prefix: style("→".to_string()).for_stderr().magenta(),
        active_item_style: blue.clone().bold(),
        inactive_item_style: Style::new().for_stderr().dim(),
        values_style: blue,
        ..ColorfulTheme::default()
    }
}

/// Print the session header to stderr.
pub fn print_banner(captag: &Captag) {
    let config = captag.config();
    let heading = Style::new().for_stderr().magenta().bold();
    let dim = Style::new().for_stderr().dim();

    eprintln!();
    let lines = banner_lines(captag_core::VERSION, &config.vlm.model, captag.annif().base_url());
    if let Some((first, rest)) = lines.split_first() {
        eprintln!("  {}", heading.apply_to(first));
        for line in rest {
            eprintln!("  {}", dim.apply_to(line));
        }
    }
    eprintln!();
}

fn banner_lines(version: &str, model: &str, annif: &str) -> Vec<String> {
    vec![
        format!("captag {version}"),
        format!("model {model}"),
        format!("annif {annif}"),
    ]
}
