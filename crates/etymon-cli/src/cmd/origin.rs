//! `ety origin`: donor words from other languages. `ety origins`:
//! the language-wide catalog of donor-word labels.
//!
//! `origin add` goes through the staging buffer the way an interactive editor
//! does: stage the child, fill the draft, commit.


use clap::{Args, Subcommand};
use etymon_core::model::{ExternalKey, ExternalParent, WordId};
use serde::Serialize;

use crate::output::{OutputMode, pretty_section, render, render_mode};
use crate::project::{Project, require_word};

// ---------------------------------------------------------------------------
// Clap types
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct OriginArgs {
    #[command(subcommand)]
    pub command: OriginCommand,
}

#[derive(Subcommand, Debug)]
pub enum OriginCommand {
    #[command(
        about = "Attach a donor word to a word",
        after_help = "EXAMPLES:\n    # Word 1 comes from Latin aqua\n    ety origin add 1 --word aqua --language Latin --definition water"
    )]
    Add(OriginAddArgs),

    #[command(
        about = "Detach a donor word from a word",
        after_help = "EXAMPLES:\n    ety origin rm 1 --word aqua --language Latin"
    )]
    Rm(OriginRmArgs),
}

#[derive(Args, Debug)]
pub struct OriginAddArgs {
    /// Id of the word that borrows from the donor.
    pub child: WordId,

    /// The donor word as written in its language.
    #[arg(long)]
    pub word: String,

    /// The donor word's language.
    #[arg(long)]
    pub language: String,

    /// Gloss of the donor word.
    #[arg(long, default_value = "")]
    pub definition: String,
}

#[derive(Args, Debug)]
pub struct OriginRmArgs {
    /// Id of the word to detach from.
    pub child: WordId,

    #[arg(long)]
    pub word: String,

    #[arg(long)]
    pub language: String,
}

#[derive(Args, Debug)]
pub struct OriginsArgs {
    /// Only show labels containing this text (case-insensitive).
    #[arg(long)]
    pub filter: Option<String>,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct OriginAddOutput {
    ok: bool,
    child: WordId,
    origin: ExternalParent,
    replaced: bool,
}

#[derive(Debug, Serialize)]
struct OriginRmOutput {
    ok: bool,
    child: WordId,
    word: String,
    language: String,
    removed: bool,
}

#[derive(Debug, Serialize)]
struct CatalogEntry {
    label: String,
    words: Vec<WordId>,
}

// ---------------------------------------------------------------------------
// Command runners
// ---------------------------------------------------------------------------

/// Execute `ety origin <subcommand>`.
///
/// # Errors
///
/// Fails if the child word does not exist (add only) or the document cannot
/// be loaded or saved.
pub fn run_origin(args: &OriginArgs, output: OutputMode, project: &Project) -> anyhow::Result<()> {
    match &args.command {
        OriginCommand::Add(a) => run_origin_add(a, output, project),
        OriginCommand::Rm(a) => run_origin_rm(a, output, project),
    }
}

fn run_origin_add(args: &OriginAddArgs, output: OutputMode, project: &Project) -> anyhow::Result<()> {
    let result = project.edit(output, |doc| {
        require_word(doc, args.child, output)?;

        let key = ExternalKey::new(args.word.clone(), args.language.clone());
        let replaced = doc.etymology.externals().get(&key, args.child).is_some();

        doc.etymology.set_pending_child(args.child);
        let draft = doc.etymology.draft_external_mut();
        draft.word.clone_from(&args.word);
        draft.language.clone_from(&args.language);
        draft.definition.clone_from(&args.definition);
        doc.etymology.commit_external(&doc.words);

        Ok(OriginAddOutput {
            ok: true,
            child: args.child,
            origin: ExternalParent::new(
                args.word.clone(),
                args.language.clone(),
                args.definition.clone(),
            ),
            replaced,
        })
    })?;

    render(output, &result, |r, w| {
        let verb = if r.replaced { "updated" } else { "added" };
        writeln!(w, "{verb} origin {} for word {}", r.origin.label(), r.child)
    })
}

fn run_origin_rm(args: &OriginRmArgs, output: OutputMode, project: &Project) -> anyhow::Result<()> {
    let result = project.edit(output, |doc| {
        let key = ExternalKey::new(args.word.clone(), args.language.clone());
        let removed = doc.etymology.externals().get(&key, args.child).is_some();
        doc.etymology.del_external_relation(&key, args.child);
        Ok(OriginRmOutput {
            ok: true,
            child: args.child,
            word: key.word,
            language: key.language,
            removed,
        })
    })?;

    render(output, &result, |r, w| {
        if r.removed {
            writeln!(w, "removed origin {} ({}) from word {}", r.word, r.language, r.child)
        } else {
            writeln!(w, "word {} has no origin {} ({})", r.child, r.word, r.language)
        }
    })
}

/// Execute `ety origins [--filter <text>]`.
///
/// # Errors
///
/// Fails if the document cannot be loaded.
pub fn run_origins(args: &OriginsArgs, output: OutputMode, project: &Project) -> anyhow::Result<()> {
    let doc = project.load(output)?;
    let needle = args.filter.as_deref().map(str::to_lowercase);

    let entries: Vec<CatalogEntry> = doc
        .etymology
        .external_catalog()
        .into_iter()
        .filter(|label| {
            needle
                .as_deref()
                .is_none_or(|needle| label.to_lowercase().contains(needle))
        })
        .map(|label| CatalogEntry {
            label: label.to_string(),
            words: words_with_label(&doc.etymology, label),
        })
        .collect();

    render_mode(
        output,
        &entries,
        |entries, w| {
            for entry in entries {
                writeln!(w, "{}", entry.label)?;
            }
            Ok(())
        },
        |entries, w| {
            pretty_section(w, &format!("Origins ({})", entries.len()))?;
            for entry in entries {
                let ids: Vec<String> = entry.words.iter().map(ToString::to_string).collect();
                writeln!(w, "{:<32} words: {}", entry.label, ids.join(", "))?;
            }
            Ok(())
        },
    )
}

/// Every word carrying a donor word that renders as `label`.
fn words_with_label(graph: &etymon_core::EtymologyGraph, label: &str) -> Vec<WordId> {
    let mut words: Vec<WordId> = graph
        .externals()
        .keys()
        .filter(|key| key.label() == label)
        .flat_map(|key| graph.children_for(key).iter().copied())
        .collect();
    words.sort_unstable();
    words.dedup();
    words
}
