//! `ety relate` / `ety unrelate`: internal derivation links between words.
//!
//! `relate` surfaces an etymology loop as error `E2003` and leaves the
//! document untouched.


use clap::Args;
use etymon_core::model::WordId;
use serde::Serialize;

use crate::output::{CliError, OutputMode, fail, render};
use crate::project::{Project, require_word};

/// Arguments for `ety relate`.
#[derive(Args, Debug)]
pub struct RelateArgs {
    /// Id of the source word.
    pub parent: WordId,

    /// Ids of the words derived from it.
    #[arg(required = true, num_args = 1..)]
    pub children: Vec<WordId>,
}

/// Arguments for `ety unrelate`.
#[derive(Args, Debug)]
pub struct UnrelateArgs {
    /// Id of the source word.
    pub parent: WordId,

    /// Id of the derived word.
    pub child: WordId,
}

#[derive(Debug, Serialize)]
struct RelateOutput {
    ok: bool,
    parent: WordId,
    children: Vec<WordId>,
}

#[derive(Debug, Serialize)]
struct UnrelateOutput {
    ok: bool,
    parent: WordId,
    child: WordId,
    removed: bool,
}

/// Execute `ety relate <parent> <child>...`.
///
/// Every child is validated before any edge is recorded, so a loop through
/// one child rejects the whole command.
///
/// # Errors
///
/// Fails if a word does not exist, if an edge would close a loop, or if the
/// document cannot be loaded or saved.
pub fn run_relate(args: &RelateArgs, output: OutputMode, project: &Project) -> anyhow::Result<()> {
    let result = project.edit(output, |doc| {
        require_word(doc, args.parent, output)?;
        for &child in &args.children {
            require_word(doc, child, output)?;
        }

        for &child in &args.children {
            if let Some(err) = doc.etymology.check_relation(&doc.words, args.parent, child) {
                return Err(fail(output, &CliError::from(&err)));
            }
        }

        for &child in &args.children {
            doc.etymology
                .add_relation(&doc.words, args.parent, child)
                .map_err(|err| fail(output, &CliError::from(&err)))?;
        }

        Ok(RelateOutput {
            ok: true,
            parent: args.parent,
            children: args.children.clone(),
        })
    })?;

    render(output, &result, |r, w| {
        let children: Vec<String> = r.children.iter().map(ToString::to_string).collect();
        writeln!(w, "related {} -> {}", r.parent, children.join(", "))
    })
}

/// Execute `ety unrelate <parent> <child>`. Removing a missing link succeeds.
///
/// # Errors
///
/// Fails if the document cannot be loaded or saved.
pub fn run_unrelate(
    args: &UnrelateArgs,
    output: OutputMode,
    project: &Project,
) -> anyhow::Result<()> {
    let result = project.edit(output, |doc| {
        let removed = doc.etymology.relations().contains(args.parent, args.child);
        doc.etymology.del_relation(args.parent, args.child);
        Ok(UnrelateOutput {
            ok: true,
            parent: args.parent,
            child: args.child,
            removed,
        })
    })?;

    render(output, &result, |r, w| {
        if r.removed {
            writeln!(w, "unrelated {} -> {}", r.parent, r.child)
        } else {
            writeln!(w, "no relation {} -> {}", r.parent, r.child)
        }
    })
}
