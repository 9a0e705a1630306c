//! `ety init`: create a project config and an empty language document.

use std::path::Path;

use anyhow::Context as _;
use clap::Args;
use etymon_core::document::LanguageDocument;
use serde::Serialize;

use crate::output::{CliError, OutputMode, fail, pretty_kv, render_mode};
use crate::project::Project;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Replace an existing language document with an empty one.
    #[arg(long)]
    pub force: bool,
}

const CONFIG_TOML: &str = "[document]\n\
    path = \"language.etymon.json\"\n\
    pretty = true\n\
    lock_timeout_ms = 2000\n";

#[derive(Debug, Serialize)]
struct InitOutput {
    ok: bool,
    document: String,
    config: String,
    created_config: bool,
}

/// Execute `ety init`. Creates:
///
/// ```text
/// .etymon/
///   config.toml            (default project config, kept if present)
/// language.etymon.json     (empty document, or the configured path)
/// ```
///
/// # Errors
///
/// Fails if the document already exists and `--force` is not set, or if any
/// filesystem operation fails.
pub fn run_init(args: &InitArgs, output: OutputMode, project: &Project) -> anyhow::Result<()> {
    if project.document.exists() && !args.force {
        return Err(fail(
            output,
            &CliError {
                message: format!("{} already exists", project.document.display()),
                suggestion: Some("Use `ety init --force` to start over with an empty document.".into()),
                error_code: None,
            },
        ));
    }

    let config_dir = project.config_dir();
    let config_path = config_dir.join("config.toml");
    let created_config = !config_path.exists();
    if created_config {
        std::fs::create_dir_all(&config_dir)
            .with_context(|| format!("Failed to create {}", config_dir.display()))?;
        std::fs::write(&config_path, CONFIG_TOML)
            .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
    }

    LanguageDocument::new()
        .save(&project.document, project.pretty())
        .map_err(|e| fail(output, &CliError::from(&e)))?;

    let result = InitOutput {
        ok: true,
        document: display_relative(&project.document, &project.root),
        config: display_relative(&config_path, &project.root),
        created_config,
    };

    render_mode(
        output,
        &result,
        |r, w| writeln!(w, "initialized {}", r.document),
        |r, w| {
            writeln!(w, "✓ Initialized etymon project.")?;
            writeln!(w)?;
            pretty_kv(w, "Document", &r.document)?;
            pretty_kv(w, "Config", &r.config)?;
            writeln!(w)?;
            writeln!(w, "Next steps:")?;
            writeln!(w, "  ety word add <word> --definition <gloss>")?;
            writeln!(w, "  ety relate <parent-id> <child-id>")
        },
    )
}

fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
