//! `ety show`: one word with its full etymology.

use std::io::Write;

use clap::Args;
use etymon_core::document::LanguageDocument;
use etymon_core::model::{ExternalParent, WordId};
use serde::Serialize;

use crate::output::{OutputMode, pretty_kv, pretty_rule, pretty_section, render_mode};
use crate::project::{Project, require_word};

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Id of the word to display.
    pub id: WordId,
}

/// Word detail as returned in JSON output.
#[derive(Debug, Serialize)]
pub struct ShowWord {
    pub id: WordId,
    pub value: String,
    pub definition: String,
    pub parents: Vec<WordRef>,
    pub children: Vec<WordRef>,
    pub origins: Vec<ExternalParent>,
    /// Every word this one descends from, nearest first.
    pub ancestors: Vec<WordRef>,
    /// Every word descending from this one, nearest first.
    pub descendants: Vec<WordRef>,
}

/// A word mentioned by id, with its spelling when it still exists.
#[derive(Debug, Serialize)]
pub struct WordRef {
    pub id: WordId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl WordRef {
    fn describe(&self) -> String {
        self.value
            .as_ref()
            .map_or_else(|| format!("{} (deleted)", self.id), |value| format!("{} {value}", self.id))
    }
}

fn word_refs(doc: &LanguageDocument, ids: &[WordId]) -> Vec<WordRef> {
    ids.iter()
        .map(|&id| WordRef {
            id,
            value: doc.words.get(id).map(|w| w.value.clone()),
        })
        .collect()
}

fn join_refs(refs: &[WordRef]) -> String {
    refs.iter().map(WordRef::describe).collect::<Vec<_>>().join(", ")
}

/// Execute `ety show <id>`.
///
/// # Errors
///
/// Fails if the word does not exist or the document cannot be loaded.
pub fn run_show(args: &ShowArgs, output: OutputMode, project: &Project) -> anyhow::Result<()> {
    let doc = project.load(output)?;
    require_word(&doc, args.id, output)?;

    let graph = &doc.etymology;
    let show = ShowWord {
        id: args.id,
        value: doc.words.get(args.id).map(|w| w.value.clone()).unwrap_or_default(),
        definition: doc
            .words
            .get(args.id)
            .map(|w| w.definition.clone())
            .unwrap_or_default(),
        parents: word_refs(&doc, graph.parents(args.id)),
        children: word_refs(&doc, graph.children(args.id)),
        origins: graph
            .word_external_parents(args.id)
            .into_iter()
            .cloned()
            .collect(),
        ancestors: word_refs(&doc, &graph.ancestors(args.id)),
        descendants: word_refs(&doc, &graph.descendants(args.id)),
    };

    render_mode(output, &show, render_show_text, render_show_human)
}

fn render_show_human(word: &ShowWord, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, &format!("Word {}", word.id))?;
    writeln!(w, "{}", word.value)?;
    pretty_rule(w)?;
    if !word.definition.is_empty() {
        pretty_kv(w, "definition", &word.definition)?;
    }
    if !word.parents.is_empty() {
        pretty_kv(w, "parents", join_refs(&word.parents))?;
    }
    if !word.children.is_empty() {
        pretty_kv(w, "children", join_refs(&word.children))?;
    }
    if word.ancestors.len() > word.parents.len() {
        pretty_kv(w, "ancestors", join_refs(&word.ancestors))?;
    }
    if word.descendants.len() > word.children.len() {
        pretty_kv(w, "descendants", join_refs(&word.descendants))?;
    }

    if !word.origins.is_empty() {
        writeln!(w)?;
        pretty_section(w, &format!("Origins ({})", word.origins.len()))?;
        for origin in &word.origins {
            if origin.definition.is_empty() {
                writeln!(w, "{}", origin.label())?;
            } else {
                writeln!(w, "{}: {}", origin.label(), origin.definition)?;
            }
        }
    }
    Ok(())
}

fn render_show_text(word: &ShowWord, w: &mut dyn Write) -> std::io::Result<()> {
    let ids = |refs: &[WordRef]| {
        refs.iter()
            .map(|r| r.id.to_string())
            .collect::<Vec<_>>()
            .join(",")
    };
    writeln!(w, "word        {} {}", word.id, word.value)?;
    writeln!(w, "definition  {}", word.definition)?;
    writeln!(w, "parents     {}", ids(&word.parents))?;
    writeln!(w, "children    {}", ids(&word.children))?;
    writeln!(w, "ancestors   {}", ids(&word.ancestors))?;
    writeln!(w, "descendants {}", ids(&word.descendants))?;
    for origin in &word.origins {
        writeln!(w, "origin      {}\t{}", origin.label(), origin.definition)?;
    }
    Ok(())
}
