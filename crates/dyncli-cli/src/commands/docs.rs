//! Markdown pages for the command tree, one file per command.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Command, CommandFactory};
use tracing::info;

use crate::cli::Cli;

pub fn generate(dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create docs directory: {}", dir.display()))?;

    let mut root = Cli::command();
    root.build();

    let mut written = Vec::new();
    write_tree(&mut root, &[], dir, &mut written)?;
    info!(dir = %dir.display(), pages = written.len(), "Generated command docs");
    Ok(written)
}

fn write_tree(
    cmd: &mut Command,
    parents: &[String],
    dir: &Path,
    written: &mut Vec<PathBuf>,
) -> Result<()> {
    let mut path: Vec<String> = parents.to_vec();
    path.push(cmd.get_name().to_string());

    let page = render_page(cmd, &path);
    let file = dir.join(page_name(&path));
    fs::write(&file, page).with_context(|| format!("Failed to write {}", file.display()))?;
    written.push(file);

    for sub in cmd.get_subcommands_mut() {
        if sub.get_name() == "help" {
            continue;
        }
        write_tree(sub, &path, dir, written)?;
    }
    Ok(())
}

fn page_name(path: &[String]) -> String {
    format!("{}.md", path.join("_"))
}

fn render_page(cmd: &mut Command, path: &[String]) -> String {
    let title = path.join(" ");
    let about = cmd.get_about().map(|s| s.to_string()).unwrap_or_default();
    let long_about = cmd
        .get_long_about()
        .map(|s| s.to_string())
        .unwrap_or_else(|| about.clone());

    let mut page = format!("## {title}\n\n{about}\n\n### Synopsis\n\n{long_about}\n\n");
    page.push_str(&format!("```\n{}\n```\n\n", cmd.render_long_help()));

    page.push_str("### SEE ALSO\n\n");
    if path.len() > 1 {
        let parent = &path[..path.len() - 1];
        page.push_str(&format!(
            "* [{}]({})\n",
            parent.join(" "),
            page_name(parent)
        ));
    }
    for sub in cmd.get_subcommands() {
        if sub.get_name() == "help" {
            continue;
        }
        let mut child = path.to_vec();
        child.push(sub.get_name().to_string());
        let about = sub.get_about().map(|s| s.to_string()).unwrap_or_default();
        page.push_str(&format!(
            "* [{}]({})\t - {}\n",
            child.join(" "),
            page_name(&child),
            about
        ));
    }
    page
}
