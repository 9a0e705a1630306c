//! End-to-end scenarios for the etymology graph driven through a real
//! [`LanguageDocument`]: guarded inserts, cascades, donor words, staging,
//! and reload behaviour.

use etymon_core::document::LanguageDocument;
use etymon_core::error::ErrorCode;
use etymon_core::graph::EtymologyGraph;
use etymon_core::lexicon::WordStore;
use etymon_core::model::{ExternalKey, ExternalParent, WordId};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn three_words() -> (WordStore, WordId, WordId, WordId) {
    let mut words = WordStore::new();
    let a = words.add("kal", "water");
    let b = words.add("kalan", "river");
    let c = words.add("kalani", "delta");
    (words, a, b, c)
}

fn reload(doc: &LanguageDocument) -> LanguageDocument {
    let json = doc.to_json(false).expect("serialize document");
    LanguageDocument::from_json(&json).expect("reload document")
}

// ---------------------------------------------------------------------------
// Internal relations
// ---------------------------------------------------------------------------

#[test]
fn chain_scenario_from_three_entries() {
    let (words, a, b, c) = three_words();
    let mut graph = EtymologyGraph::new();

    graph.add_relation(&words, a, b).expect("1 -> 2");
    graph.add_relation(&words, b, c).expect("2 -> 3");
    assert_eq!(graph.children(a), &[b]);
    assert_eq!(graph.children(b), &[c]);
    assert_eq!(graph.parents(c), &[b]);

    let err = graph.add_relation(&words, c, a).expect_err("3 -> 1 closes a loop");
    assert_eq!(err.code(), ErrorCode::CycleDetected);
    assert_eq!(err.cycle_path, vec![a, b, c, a]);

    graph.add_relation(&words, a, c).expect("1 -> 3 is a shortcut, not a loop");
    assert_eq!(graph.parents(c), &[b, a]);
}

#[test]
fn loop_through_middle_of_chain_is_rejected() {
    let (words, a, b, c) = three_words();
    let mut graph = EtymologyGraph::new();
    graph.add_relation(&words, a, b).expect("1 -> 2");
    graph.add_relation(&words, b, c).expect("2 -> 3");

    assert!(graph.add_relation(&words, c, b).is_err());
    assert!(graph.add_relation(&words, c, a).is_err());
    assert!(graph.children(c).is_empty());
}

#[test]
fn loop_detected_across_a_diamond() {
    let mut words = WordStore::new();
    let root = words.add("ka", "");
    let left = words.add("kal", "");
    let right = words.add("kar", "");
    let leaf = words.add("kalar", "");

    let mut graph = EtymologyGraph::new();
    graph.add_relation(&words, root, left).expect("root -> left");
    graph.add_relation(&words, root, right).expect("root -> right");
    graph.add_relation(&words, left, leaf).expect("left -> leaf");
    graph.add_relation(&words, right, leaf).expect("right -> leaf");

    let err = graph.add_relation(&words, leaf, root).expect_err("leaf -> root loops");
    assert_eq!(err.cycle_path.first(), Some(&root));
    assert_eq!(err.cycle_path.last(), Some(&root));
    assert_eq!(graph.ancestors(leaf).len(), 3);
    assert_eq!(graph.descendants(root).len(), 3);
}

#[test]
fn self_relation_always_fails() {
    let (words, a, _, _) = three_words();
    let mut graph = EtymologyGraph::new();
    let err = graph.add_relation(&words, a, a).expect_err("self relation");
    assert!(err.is_self_relation());
    assert_eq!(err.cycle_len(), 1);
}

#[test]
fn duplicate_relation_is_recorded_once() {
    let (words, a, b, _) = three_words();
    let mut graph = EtymologyGraph::new();
    graph.add_relation(&words, a, b).expect("first");
    graph.add_relation(&words, a, b).expect("second");
    assert_eq!(graph.children(a), &[b]);
    assert_eq!(graph.parents(b), &[a]);
    assert_eq!(graph.relations().edge_count(), 1);
}

#[test]
fn delete_then_add_replaces_an_edge() {
    let (words, a, b, c) = three_words();
    let mut graph = EtymologyGraph::new();
    graph.add_relation(&words, a, b).expect("1 -> 2");
    graph.del_relation(a, b);
    graph.del_relation(a, b);
    graph.add_relation(&words, a, c).expect("1 -> 3");

    assert_eq!(graph.children(a), &[c]);
    assert!(graph.parents(b).is_empty());
    assert!(graph.is_consistent());
}

// ---------------------------------------------------------------------------
// Donor words
// ---------------------------------------------------------------------------

#[test]
fn same_key_on_one_child_keeps_last_write() {
    let (words, a, b, _) = three_words();
    let mut graph = EtymologyGraph::new();
    graph.add_external_relation(&words, ExternalParent::new("aqua", "Latin", "water"), a);
    graph.add_external_relation(&words, ExternalParent::new("aqua", "Latin", "rain"), a);
    graph.add_external_relation(&words, ExternalParent::new("aqua", "Latin", "water"), b);

    let on_a = graph.word_external_parents(a);
    assert_eq!(on_a.len(), 1);
    assert_eq!(on_a[0].definition, "rain");
    assert_eq!(graph.word_external_parents(b)[0].definition, "water");
    assert_eq!(graph.children_for(&ExternalKey::new("aqua", "Latin")), &[a, b]);
}

#[test]
fn external_relation_to_unknown_child_changes_nothing() {
    let (words, _, _, _) = three_words();
    let mut graph = EtymologyGraph::new();
    graph.add_external_relation(&words, ExternalParent::new("aqua", "Latin", ""), WordId::new(99));
    assert!(graph.externals().is_empty());
    assert!(graph.external_catalog().is_empty());
}

#[test]
fn catalog_label_survives_until_last_child_detaches() {
    let (words, a, b, _) = three_words();
    let aqua = ExternalParent::new("aqua", "Latin", "");
    let mut graph = EtymologyGraph::new();
    graph.add_external_relation(&words, ExternalParent::new("hydor", "Greek", ""), a);
    graph.add_external_relation(&words, aqua.clone(), a);
    graph.add_external_relation(&words, aqua.clone(), b);
    assert_eq!(graph.external_catalog(), vec!["aqua (Latin)", "hydor (Greek)"]);

    graph.del_external_relation(&aqua.key(), a);
    assert_eq!(graph.external_catalog(), vec!["aqua (Latin)", "hydor (Greek)"]);

    graph.del_external_relation(&aqua.key(), b);
    assert_eq!(graph.external_catalog(), vec!["hydor (Greek)"]);
}

// ---------------------------------------------------------------------------
// Staging
// ---------------------------------------------------------------------------

#[test]
fn staged_session_attaches_several_children() {
    let (words, a, b, c) = three_words();
    let mut graph = EtymologyGraph::new();

    graph.set_pending_parent(a);
    for child in [b, c] {
        graph.set_pending_child(child);
        graph.commit_internal(&words);
    }
    assert_eq!(graph.children(a), &[b, c]);

    // A loop through the staging path is dropped, not raised.
    graph.set_pending_parent(c);
    graph.set_pending_child(a);
    graph.commit_internal(&words);
    assert!(graph.children(c).is_empty());

    graph.set_pending_child(b);
    let draft = graph.draft_external_mut();
    draft.word = "wasser".into();
    draft.language = "German".into();
    graph.commit_external(&words);
    assert_eq!(graph.external_catalog(), vec!["wasser (German)"]);
    assert!(graph.staging().draft().word.is_empty());
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

#[test]
fn deleting_a_word_cascades_and_reload_agrees() {
    let mut doc = LanguageDocument::new();
    let a = doc.add_word("kal", "water");
    let b = doc.add_word("kalan", "river");
    let c = doc.add_word("kalani", "delta");
    doc.etymology.add_relation(&doc.words, a, b).expect("1 -> 2");
    doc.etymology.add_relation(&doc.words, b, c).expect("2 -> 3");
    doc.etymology
        .add_external_relation(&doc.words, ExternalParent::new("aqua", "Latin", ""), b);

    doc.delete_word(b).expect("word 2 exists");
    let reloaded = reload(&doc);

    for graph in [&doc.etymology, &reloaded.etymology] {
        assert!(graph.children(a).is_empty());
        assert!(graph.parents(c).is_empty());
        assert!(graph.word_external_parents(b).is_empty());
        assert!(graph.external_catalog().is_empty());
    }
}

#[test]
fn stale_ids_do_not_reappear_after_reload() {
    let mut doc = LanguageDocument::new();
    let a = doc.add_word("kal", "water");
    let b = doc.add_word("kalan", "river");
    doc.etymology.add_relation(&doc.words, a, b).expect("1 -> 2");

    // Remove the entry behind the graph's back; no cascade.
    doc.words.remove(b);
    assert_eq!(doc.etymology.children(a), &[b]);

    let reloaded = reload(&doc);
    assert!(reloaded.etymology.children(a).is_empty());
    assert!(reloaded.etymology.parents(b).is_empty());
}

#[test]
fn reload_reproduces_lookups_for_live_ids() {
    let mut doc = LanguageDocument::new();
    let ids: Vec<WordId> = ["ka", "kal", "kar", "kalar", "sefa"]
        .into_iter()
        .map(|value| doc.add_word(value, ""))
        .collect();
    // Higher-numbered parents first, so parent lists are not in id order.
    for (p, c) in [(2, 3), (0, 2), (1, 3), (0, 1), (4, 3)] {
        doc.etymology
            .add_relation(&doc.words, ids[p], ids[c])
            .expect("acyclic");
    }
    doc.etymology
        .add_external_relation(&doc.words, ExternalParent::new("aqua", "Latin", "water"), ids[4]);
    doc.etymology
        .add_external_relation(&doc.words, ExternalParent::new("hydor", "Greek", ""), ids[4]);

    let reloaded = reload(&doc);
    for id in &ids {
        assert_eq!(reloaded.etymology.children(*id), doc.etymology.children(*id));
        assert_eq!(reloaded.etymology.parents(*id), doc.etymology.parents(*id));
        assert_eq!(
            reloaded.etymology.word_external_parents(*id),
            doc.etymology.word_external_parents(*id)
        );
    }
    assert_eq!(reloaded.etymology.parents(ids[3]), &[ids[2], ids[1], ids[4]]);
    assert_eq!(reloaded.etymology.children(ids[0]), &[ids[2], ids[1]]);
    assert_eq!(
        reloaded.etymology.external_catalog(),
        vec!["aqua (Latin)", "hydor (Greek)"]
    );
}

#[test]
fn chain_with_shortcut_keeps_parent_order_across_reload() {
    let mut doc = LanguageDocument::new();
    let a = doc.add_word("kal", "water");
    let b = doc.add_word("kalan", "river");
    let c = doc.add_word("kalani", "delta");
    doc.etymology.add_relation(&doc.words, a, b).expect("a -> b");
    doc.etymology.add_relation(&doc.words, b, c).expect("b -> c");
    doc.etymology.add_relation(&doc.words, a, c).expect("a -> c");
    assert_eq!(doc.etymology.parents(c), &[b, a]);

    let reloaded = reload(&doc);
    assert_eq!(reloaded.etymology.parents(c), &[b, a]);
    assert_eq!(reloaded.etymology.children(a), &[b, c]);
    assert_eq!(reloaded.etymology.word_parent_ids(c), &[b, a]);
}
