//! `ety word`: manage lexicon entries.
//!
//! Subcommands:
//! - `ety word add <value> [--definition <gloss>]`
//! - `ety word rm <id>`, which also drops every relation touching the word
//! - `ety word list`


use clap::{Args, Subcommand};
use etymon_core::document::LanguageDocument;
use etymon_core::lexicon::Word;
use etymon_core::model::WordId;
use serde::Serialize;

use crate::output::{OutputMode, pretty_section, render, render_mode};
use crate::project::{Project, require_word};

// ---------------------------------------------------------------------------
// Clap types
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct WordArgs {
    #[command(subcommand)]
    pub command: WordCommand,
}

#[derive(Subcommand, Debug)]
pub enum WordCommand {
    #[command(
        about = "Add a word to the lexicon",
        after_help = "EXAMPLES:\n    # Add a root word\n    ety word add kal --definition water"
    )]
    Add(WordAddArgs),

    #[command(
        about = "Remove a word and all of its relations",
        after_help = "EXAMPLES:\n    # Remove word 3\n    ety word rm 3"
    )]
    Rm(WordRmArgs),

    #[command(
        about = "List every word in the lexicon",
        after_help = "EXAMPLES:\n    ety word list\n    ety word list --json"
    )]
    List,
}

#[derive(Args, Debug)]
pub struct WordAddArgs {
    /// Spelling in the constructed language.
    pub value: String,

    /// Gloss or meaning.
    #[arg(long, short, default_value = "")]
    pub definition: String,
}

#[derive(Args, Debug)]
pub struct WordRmArgs {
    /// Id of the word to remove.
    pub id: WordId,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct WordRmOutput {
    ok: bool,
    id: WordId,
    value: String,
    relations_removed: usize,
}

#[derive(Debug, Serialize)]
struct WordRow {
    id: WordId,
    value: String,
    definition: String,
    parents: usize,
    children: usize,
    origins: usize,
}

fn word_row(doc: &LanguageDocument, word: &Word) -> WordRow {
    WordRow {
        id: word.id,
        value: word.value.clone(),
        definition: word.definition.clone(),
        parents: doc.etymology.parents(word.id).len(),
        children: doc.etymology.children(word.id).len(),
        origins: doc.etymology.word_external_parents(word.id).len(),
    }
}

// ---------------------------------------------------------------------------
// Command runners
// ---------------------------------------------------------------------------

/// Execute `ety word <subcommand>`.
///
/// # Errors
///
/// Returns an error if the document cannot be loaded or saved, or if the
/// word to remove does not exist.
pub fn run_word(args: &WordArgs, output: OutputMode, project: &Project) -> anyhow::Result<()> {
    match &args.command {
        WordCommand::Add(a) => run_word_add(a, output, project),
        WordCommand::Rm(a) => run_word_rm(a, output, project),
        WordCommand::List => run_word_list(output, project),
    }
}

fn run_word_add(args: &WordAddArgs, output: OutputMode, project: &Project) -> anyhow::Result<()> {
    let word = project.edit(output, |doc| {
        let id = doc.add_word(args.value.clone(), args.definition.clone());
        Ok(doc.words.get(id).cloned())
    })?;
    let word = word.ok_or_else(|| anyhow::anyhow!("word vanished after insert"))?;

    render(output, &word, |word, w| {
        writeln!(w, "added word {} {}", word.id, word.value)
    })
}

fn run_word_rm(args: &WordRmArgs, output: OutputMode, project: &Project) -> anyhow::Result<()> {
    let result = project.edit(output, |doc| {
        require_word(doc, args.id, output)?;
        let relations_removed = doc.etymology.parents(args.id).len()
            + doc.etymology.children(args.id).len()
            + doc.etymology.word_external_parents(args.id).len();
        let word = doc
            .delete_word(args.id)
            .ok_or_else(|| anyhow::anyhow!("word {} vanished during removal", args.id))?;
        Ok(WordRmOutput {
            ok: true,
            id: word.id,
            value: word.value,
            relations_removed,
        })
    })?;

    render(output, &result, |r, w| {
        writeln!(
            w,
            "removed word {} {} ({} relations dropped)",
            r.id, r.value, r.relations_removed
        )
    })
}

fn run_word_list(output: OutputMode, project: &Project) -> anyhow::Result<()> {
    let doc = project.load(output)?;
    let rows: Vec<WordRow> = doc.words.iter().map(|word| word_row(&doc, word)).collect();

    render_mode(
        output,
        &rows,
        |rows, w| {
            for row in rows {
                writeln!(w, "{}\t{}\t{}", row.id, row.value, row.definition)?;
            }
            Ok(())
        },
        |rows, w| {
            pretty_section(w, &format!("Words ({})", rows.len()))?;
            if rows.is_empty() {
                return writeln!(w, "(no words yet; add one with `ety word add`)");
            }
            for row in rows {
                writeln!(
                    w,
                    "{:>5}  {:<20} {:<24} ↑{} ↓{} ⟵{}",
                    row.id.to_string(),
                    row.value,
                    row.definition,
                    row.parents,
                    row.children,
                    row.origins
                )?;
            }
            Ok(())
        },
    )
}
