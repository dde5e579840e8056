//! Interactive form for bare `captag` invocation.
//!
//! The menu mirrors the fields of a single submission form: image, language,
//! vocabulary and prompt, then submit or clear. All state lives in
//! [`FormState`]; this module only prompts and prints.

pub mod display;
pub mod theme;

use captag_core::{Captag, FormState, Language, SourceImage, Vocabulary};
use console::Style;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

/// Convert a dialoguer result into `Ok(Some(value))` on success, `Ok(None)` on
/// interrupt (Ctrl+C / terminal disconnect), and `Err` for other I/O failures.
fn handle_interrupt<T>(result: dialoguer::Result<T>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(dialoguer::Error::IO(e)) if e.kind() == std::io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Image,
    Language,
    Vocabulary,
    Prompt,
    Submit,
    Clear,
    Exit,
}

const ACTIONS: [Action; 7] = [
    Action::Image,
    Action::Language,
    Action::Vocabulary,
    Action::Prompt,
    Action::Submit,
    Action::Clear,
    Action::Exit,
];

/// Entry point for interactive mode.
pub async fn run(captag: &Captag) -> anyhow::Result<()> {
    theme::print_banner(captag);

    let theme = theme::captag_theme();
    let mut form = captag.new_form();
    let mut cursor = 0;

    loop {
        let items = menu_items(&form);
        let selection = Select::with_theme(&theme)
            .with_prompt("Caption form")
            .items(&items)
            .default(cursor)
            .interact_opt()?;

        let Some(index) = selection else { break };
        cursor = index;

        match ACTIONS.get(index).copied().unwrap_or(Action::Exit) {
            Action::Image => choose_image(&mut form).await?,
            Action::Language => choose_language(&mut form)?,
            Action::Vocabulary => choose_vocabulary(&mut form)?,
            Action::Prompt => edit_prompt(&mut form)?,
            Action::Submit => submit(captag, &mut form).await,
            Action::Clear => {
                form.clear();
                eprintln!("  Caption and prompt reset.");
            }
            Action::Exit => break,
        }
    }

    Ok(())
}

/// Menu labels reflecting the current field values.
fn menu_items(form: &FormState) -> Vec<String> {
    let image = form
        .image()
        .map(|i| i.name.clone())
        .unwrap_or_else(|| "(none)".to_string());
    let prompt = if form.prompt_is_custom() {
        "custom"
    } else {
        "default"
    };
    ACTIONS
        .iter()
        .map(|action| match action {
            Action::Image => format!("Image: {image}"),
            Action::Language => format!("Language: {}", form.language().label()),
            Action::Vocabulary => format!("Vocabulary: {}", form.vocabulary().code()),
            Action::Prompt => format!("Prompt: {prompt}"),
            Action::Submit if form.can_submit() => "Submit".to_string(),
            Action::Submit => "Submit (choose an image first)".to_string(),
            Action::Clear => "Clear".to_string(),
            Action::Exit => "Exit".to_string(),
        })
        .collect()
}

async fn choose_image(form: &mut FormState) -> anyhow::Result<()> {
    let theme = theme::captag_theme();
    let Some(raw_path) = handle_interrupt(
        Input::<String>::with_theme(&theme)
            .with_prompt("Path to image")
            .interact_text(),
    )?
    else {
        return Ok(());
    };

    let path = PathBuf::from(shellexpand::tilde(raw_path.trim()).into_owned());
    match SourceImage::from_path(&path).await {
        Ok(image) => form.set_image(image),
        Err(e) => {
            let warn = Style::new().for_stderr().yellow();
            eprintln!(
                "  {}",
                warn.apply_to(format!("Could not read {}: {e}", path.display()))
            );
        }
    }
    Ok(())
}

fn choose_language(form: &mut FormState) -> anyhow::Result<()> {
    let theme = theme::captag_theme();
    let labels: Vec<&str> = Language::ALL.iter().map(|l| l.label()).collect();
    let current = Language::ALL
        .iter()
        .position(|l| *l == form.language())
        .unwrap_or(0);

    let selection = Select::with_theme(&theme)
        .with_prompt("Language")
        .items(&labels)
        .default(current)
        .interact_opt()?;

    if let Some(language) = selection.and_then(|i| Language::ALL.get(i).copied()) {
        form.set_language(language);
    }
    Ok(())
}

fn choose_vocabulary(form: &mut FormState) -> anyhow::Result<()> {
    let theme = theme::captag_theme();
    let labels: Vec<String> = Vocabulary::ALL
        .iter()
        .map(|v| format!("{} - {}", v.code(), v.description()))
        .collect();
    let current = Vocabulary::ALL
        .iter()
        .position(|v| *v == form.vocabulary())
        .unwrap_or(0);

    let selection = Select::with_theme(&theme)
        .with_prompt("Vocabulary")
        .items(&labels)
        .default(current)
        .interact_opt()?;

    if let Some(vocabulary) = selection.and_then(|i| Vocabulary::ALL.get(i).copied()) {
        form.set_vocabulary(vocabulary);
    }
    Ok(())
}

fn edit_prompt(form: &mut FormState) -> anyhow::Result<()> {
    let theme = theme::captag_theme();
    let edited = handle_interrupt(
        Input::<String>::with_theme(&theme)
            .with_prompt("Prompt")
            .with_initial_text(form.prompt())
            .allow_empty(true)
            .interact_text(),
    )?;
    if let Some(prompt) = edited {
        form.set_prompt(prompt);
    }
    Ok(())
}

async fn submit(captag: &Captag, form: &mut FormState) {
    let Some(request) = form.submission() else {
        let warn = Style::new().for_stderr().yellow();
        eprintln!("  {}", warn.apply_to("Choose an image before submitting."));
        return;
    };
    form.begin();

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("  {spinner:.magenta} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));

    let outcome = captag
        .pipeline()
        .run_observed(&request, |state| {
            form.record_state(state);
            spinner.set_message(state.to_string());
        })
        .await;
    spinner.finish_and_clear();

    form.apply(outcome);
    display::print_result(form);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_items_follow_actions() {
        let form = FormState::new(Language::En, Vocabulary::Kauno);
        let items = menu_items(&form);
        assert_eq!(items.len(), ACTIONS.len());
        assert_eq!(items[0], "Image: (none)");
        assert_eq!(items[1], format!("Language: {}", Language::En.label()));
        assert_eq!(items[2], "Vocabulary: kauno");
        assert_eq!(items[3], "Prompt: default");
        assert_eq!(items[4], "Submit (choose an image first)");
    }

    #[test]
    fn test_menu_items_show_image_and_custom_prompt() {
        let mut form = FormState::default();
        form.set_image(SourceImage::from_bytes(vec![1, 2, 3], "cat.png"));
        form.set_prompt("Count the cats.");
        let items = menu_items(&form);
        assert_eq!(items[0], "Image: cat.png");
        assert_eq!(items[3], "Prompt: custom");
        assert_eq!(items[4], "Submit");
    }

    #[test]
    fn test_handle_interrupt() {
        let interrupted: dialoguer::Result<u8> = Err(dialoguer::Error::IO(std::io::Error::new(
            std::io::ErrorKind::Interrupted,
            "ctrl-c",
        )));
        assert!(handle_interrupt(interrupted).unwrap().is_none());
        assert_eq!(handle_interrupt(Ok(3u8)).unwrap(), Some(3));
    }
}
