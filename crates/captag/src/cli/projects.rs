//! The `captag projects` command: list indexing projects on the Annif server.

use anyhow::Context;
use captag_core::{Captag, Language, ProjectInfo};
use clap::Args;

use super::types::LanguageArg;

/// Arguments for the `projects` command.
#[derive(Args, Debug)]
pub struct ProjectsArgs {
    /// Only show projects for this language
    #[arg(short, long, value_enum)]
    pub language: Option<LanguageArg>,

    /// Print the project list as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the projects command.
pub async fn execute(captag: &Captag, args: ProjectsArgs) -> anyhow::Result<()> {
    let projects = captag
        .annif()
        .projects()
        .await
        .with_context(|| format!("Could not list projects at {}", captag.annif().base_url()))?;

    let language: Option<Language> = args.language.map(Into::into);
    let projects = filter_by_language(projects, language);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&projects)?);
    } else {
        print!("{}", render_table(&projects));
    }
    Ok(())
}

fn filter_by_language(projects: Vec<ProjectInfo>, language: Option<Language>) -> Vec<ProjectInfo> {
    match language {
        Some(lang) => projects
            .into_iter()
            .filter(|p| p.language == lang.code())
            .collect(),
        None => projects,
    }
}

fn render_table(projects: &[ProjectInfo]) -> String {
    if projects.is_empty() {
        return "No projects found.\n".to_string();
    }

    let id_width = projects
        .iter()
        .map(|p| p.project_id.len())
        .max()
        .unwrap_or(0)
        .max("PROJECT".len());

    let mut out = format!("{:<id_width$}  {:<4}  {}\n", "PROJECT", "LANG", "NAME");
    for p in projects {
        let name = match p.is_trained {
            Some(false) => format!("{} (not trained)", p.name),
            _ => p.name.clone(),
        };
        out.push_str(&format!(
            "{:<id_width$}  {:<4}  {}\n",
            p.project_id, p.language, name
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: &str, language: &str, trained: Option<bool>) -> ProjectInfo {
        ProjectInfo {
            project_id: id.to_string(),
            name: format!("{id} project"),
            language: language.to_string(),
            is_trained: trained,
        }
    }

    #[test]
    fn test_filter_by_language() {
        let all = vec![
            project("yso-fi", "fi", Some(true)),
            project("yso-en", "en", Some(true)),
            project("kauno-fi", "fi", None),
        ];
        let fi = filter_by_language(all.clone(), Some(Language::Fi));
        assert_eq!(fi.len(), 2);
        assert!(fi.iter().all(|p| p.language == "fi"));
        assert_eq!(filter_by_language(all, None).len(), 3);
    }

    #[test]
    fn test_render_table_marks_untrained() {
        let table = render_table(&[
            project("yso-fi", "fi", Some(true)),
            project("ykl-sv", "sv", Some(false)),
        ]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("PROJECT"));
        assert!(lines[1].starts_with("yso-fi "));
        assert!(lines[2].ends_with("ykl-sv project (not trained)"));
    }

    #[test]
    fn test_render_table_empty() {
        assert_eq!(render_table(&[]), "No projects found.\n");
    }
}
