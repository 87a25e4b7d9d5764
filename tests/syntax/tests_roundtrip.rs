//! Round-trip and structural property tests.

use indexmap::IndexMap;
use mmd::model::{TopicTree, attributes::GENERATOR_ID};
use mmd::parser::{TokenKind, tokenize};
use mmd::{Extra, ExtraType, FileLink, MindMap, parse, serialize};
use proptest::prelude::*;

use crate::helpers::assertions::parse_clean;
use crate::helpers::fixtures::{SAMPLE_DOCUMENT, child_texts, map_from_tree};

// ============================================================================
// Documented examples
// ============================================================================

#[test]
fn test_document_attribute_and_child_survive() {
    let mut map = MindMap::new();
    let root = map.root();
    map.set_document_attribute(GENERATOR_ID, Some("x")).unwrap();
    map.add_topic(root, "Child").unwrap();

    let reparsed = parse_clean(&serialize(&map));
    assert_eq!(reparsed.document_attribute(GENERATOR_ID), Some("x"));
    assert_eq!(child_texts(&reparsed, reparsed.root()), vec!["Child"]);
    assert_eq!(reparsed.to_tree(), map.to_tree());
}

#[test]
fn test_file_and_link_with_replaced_file() {
    let mut map = MindMap::new();
    let root = map.root();
    map.set_extra(root, Extra::file(FileLink::new("first.txt"))).unwrap();
    map.set_extra(root, Extra::link("https://x.org")).unwrap();
    map.set_extra(root, Extra::file(FileLink::new("second.txt"))).unwrap();

    let reparsed = parse_clean(&serialize(&map));
    let topic = reparsed.topic(reparsed.root()).unwrap();
    assert_eq!(topic.extras().count(), 2);
    assert_eq!(
        topic.extra(ExtraType::File),
        Some(&Extra::file(FileLink::new("second.txt")))
    );
    assert_eq!(topic.extra(ExtraType::Link), Some(&Extra::link("https://x.org")));
}

#[test]
fn test_sample_document_is_stable() {
    let first = serialize(&parse_clean(SAMPLE_DOCUMENT));
    let second = serialize(&parse_clean(&first));
    assert_eq!(first, second);
}

#[test]
fn test_padded_and_control_titles_read_back() {
    let mut map = MindMap::new();
    let root = map.root();
    map.add_topic(root, " lead").unwrap();
    map.add_topic(root, "a\tb").unwrap();
    map.add_topic(root, "trail  ").unwrap();

    let text = serialize(&map);
    assert!(text.ends_with("## lead\n## a b\n## trail  \n"), "{text}");
    let reparsed = parse_clean(&text);
    assert_eq!(child_texts(&reparsed, reparsed.root()), vec!["lead", "a b", "trail  "]);
    assert_eq!(reparsed.to_tree(), map.to_tree());
}

#[test]
fn test_file_path_with_question_mark_reads_back() {
    let mut map = MindMap::new();
    let root = map.root();
    let plain = map.add_topic(root, "plain").unwrap();
    let with_line = map.add_topic(root, "line").unwrap();
    map.set_extra(plain, Extra::file(FileLink::new("dir/a?b.txt"))).unwrap();
    map.set_extra(with_line, Extra::file(FileLink::new("a?b").with_line(7)))
        .unwrap();

    let reparsed = parse_clean(&serialize(&map));
    assert_eq!(reparsed.to_tree(), map.to_tree());
    let children = reparsed.children(reparsed.root()).unwrap();
    match reparsed.topic(children[0]).unwrap().extra(ExtraType::File) {
        Some(Extra::File(link)) => {
            assert_eq!(link.uri(), "dir/a?b.txt");
            assert!(link.params().is_empty());
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_padded_link_and_blank_uid() {
    let mut map = MindMap::new();
    let root = map.root();
    map.set_extra(root, Extra::link(" https://x.org")).unwrap();
    assert!(map.set_extra(root, Extra::topic_link("")).is_err());

    let reparsed = parse_clean(&serialize(&map));
    let topic = reparsed.topic(reparsed.root()).unwrap();
    assert_eq!(topic.extras().collect::<Vec<_>>(), vec![&Extra::link("https://x.org")]);
    assert_eq!(reparsed.to_tree(), map.to_tree());
}

#[test]
fn test_multiline_attribute_values_are_flattened() {
    let mut map = MindMap::new();
    let root = map.root();
    map.set_attribute(root, "comment", Some("a\nb")).unwrap();
    let reparsed = parse_clean(&serialize(&map));
    assert_eq!(reparsed.attribute(reparsed.root(), "comment"), Some("a b"));
}

// ============================================================================
// Strategies
// ============================================================================

fn title() -> impl Strategy<Value = String> {
    "[ -~\\t\\r\\n\\x{7}\\x{a0}é]{0,14}"
}

/// Non-blank printable text, possibly padded
fn padded_value(max: usize) -> impl Strategy<Value = String> {
    proptest::string::string_regex(&format!("[ -~\\t]{{1,{max}}}"))
        .expect("valid regex")
        .prop_filter("blank value", |s| !s.trim().is_empty())
}

fn attributes() -> impl Strategy<Value = IndexMap<String, String>> {
    prop::collection::vec(("[a-zA-Z][a-zA-Z0-9.]{0,8}", "[ -~]{0,10}"), 0..3)
        .prop_map(|pairs| pairs.into_iter().collect())
}

fn extras() -> impl Strategy<Value = Vec<Extra>> {
    let file = (
        "[ -~]{1,12}".prop_filter("blank path", |s| !s.trim().is_empty()),
        prop::option::of(1u32..500),
        prop::collection::vec(("[a-z]{1,4}", "[ -~]{0,6}"), 0..2),
    )
        .prop_map(|(uri, line, params)| {
            let mut link = FileLink::new(uri);
            if let Some(line) = line {
                link = link.with_line(line);
            }
            for (key, value) in params {
                link = link.with_param(key, value);
            }
            Extra::file(link)
        });
    let link = padded_value(14).prop_map(Extra::link);
    let note = "[ -~\\t\\r\\n]{0,20}".prop_map(Extra::note);
    let topic = padded_value(10).prop_map(Extra::topic_link);
    (
        prop::option::of(file),
        prop::option::of(link),
        prop::option::of(note),
        prop::option::of(topic),
    )
        .prop_map(|(file, link, note, topic)| {
            [file, link, note, topic].into_iter().flatten().collect()
        })
}

fn snippets() -> impl Strategy<Value = IndexMap<String, String>> {
    let body = prop::collection::vec("[a-z ;(){}=]{0,12}", 0..3).prop_map(|lines| lines.join("\n"));
    prop::collection::vec(("[a-z]{1,6}", body), 0..2).prop_map(|pairs| pairs.into_iter().collect())
}

fn topic_tree() -> impl Strategy<Value = TopicTree> {
    let leaf = (title(), attributes(), extras(), snippets()).prop_map(
        |(text, attributes, extras, code_snippets)| TopicTree {
            text,
            attributes,
            extras,
            code_snippets,
            children: Vec::new(),
        },
    );
    leaf.prop_recursive(4, 24, 4, |inner| {
        (inner.clone(), prop::collection::vec(inner, 0..4))
            .prop_map(|(node, children)| node.with_children(children))
    })
}

/// Pre-order depths of a tree
fn depths(tree: &TopicTree, depth: usize, out: &mut Vec<usize>) {
    out.push(depth);
    for child in &tree.children {
        depths(child, depth + 1, out);
    }
}

#[derive(Debug, Clone)]
enum Edit {
    Add(usize),
    Move(usize, usize),
    Remove(usize),
    SetExtra(usize, ExtraType),
}

fn edits() -> impl Strategy<Value = Vec<Edit>> {
    let extra_type = prop::sample::select(ExtraType::ALL.to_vec());
    let edit = prop_oneof![
        (0usize..64).prop_map(Edit::Add),
        (0usize..64, 0usize..64).prop_map(|(a, b)| Edit::Move(a, b)),
        (0usize..64).prop_map(Edit::Remove),
        (0usize..64, extra_type).prop_map(|(a, ty)| Edit::SetExtra(a, ty)),
    ];
    prop::collection::vec(edit, 0..40)
}

fn sample_extra(extra_type: ExtraType) -> Extra {
    match extra_type {
        ExtraType::File => Extra::file(FileLink::new("f.txt")),
        ExtraType::Link => Extra::link("https://x.org"),
        ExtraType::Note => Extra::note("note"),
        ExtraType::Topic => Extra::topic_link("UID"),
    }
}

fn pick(map: &MindMap, index: usize) -> mmd::TopicId {
    let ids: Vec<_> = map.iter().map(|(id, _)| id).collect();
    ids[index % ids.len()]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_round_trip_preserves_tree(
        tree in topic_tree(),
        document in attributes(),
    ) {
        let mut map = map_from_tree(&tree);
        for (key, value) in &document {
            map.set_document_attribute(key, Some(value)).unwrap();
        }
        let text = serialize(&map);
        let parse = parse(&text).unwrap();
        prop_assert!(parse.ok(), "diagnostics {:?} for\n{}", parse.diagnostics, text);
        prop_assert_eq!(parse.map.to_tree(), map.to_tree());
    }

    #[test]
    fn test_topic_levels_match_depth(tree in topic_tree()) {
        let map = map_from_tree(&tree);
        let text = serialize(&map);
        let levels: Vec<usize> = tokenize(&text)
            .iter()
            .filter(|t| t.kind == TokenKind::TOPIC)
            .map(|t| t.text.chars().take_while(|c| *c == '#').count())
            .collect();

        let mut expected = Vec::new();
        depths(&tree, 0, &mut expected);
        prop_assert_eq!(levels, expected.iter().map(|d| d + 1).collect::<Vec<_>>());

        for (id, topic) in map.iter() {
            if let Some(parent) = topic.parent() {
                prop_assert_eq!(map.depth(id).unwrap(), map.depth(parent).unwrap() + 1);
            }
        }
    }

    #[test]
    fn test_edits_keep_tree_acyclic(edits in edits()) {
        let mut map = MindMap::new();
        for edit in edits {
            match edit {
                Edit::Add(a) => {
                    let parent = pick(&map, a);
                    map.add_child(parent, None).unwrap();
                }
                Edit::Move(a, b) => {
                    let (id, target) = (pick(&map, a), pick(&map, b));
                    let _ = map.move_topic(id, target, None);
                }
                Edit::Remove(a) => {
                    let id = pick(&map, a);
                    map.remove_subtree(id).unwrap();
                }
                Edit::SetExtra(a, extra_type) => {
                    let id = pick(&map, a);
                    map.set_extra(id, sample_extra(extra_type)).unwrap();
                }
            }

            let count = map.topic_count();
            prop_assert_eq!(map.iter().count(), count);
            for (id, topic) in map.iter() {
                prop_assert!(map.path(id).unwrap().len() <= count);
                prop_assert_eq!(map.path(id).unwrap()[0], map.root());
                let mut types: Vec<_> = topic.extras().map(Extra::extra_type).collect();
                let total = types.len();
                types.dedup();
                prop_assert_eq!(types.len(), total);
            }
        }
    }
}
