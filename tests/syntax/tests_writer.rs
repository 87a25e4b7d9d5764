//! Serializer output tests.

use mmd::model::attributes::GENERATOR_ID;
use mmd::{Extra, ExtraType, FileLink, LineEnding, MindMap, SerializeOptions, serialize, serialize_with};
use rstest::rstest;

use crate::helpers::assertions::parse_clean;

fn single_topic(text: &str) -> MindMap {
    let mut map = MindMap::new();
    let root = map.root();
    map.topic_mut(root).unwrap().set_text(text);
    map
}

#[test]
fn test_default_header() {
    let text = serialize(&single_topic("Root"));
    assert_eq!(text, "Mind Map generated by mmd-base\n---\n# Root\n");
}

#[test]
fn test_custom_header_and_delimiter() {
    let mut map = single_topic("Root");
    map.set_document_attribute(GENERATOR_ID, Some("tool")).unwrap();
    let options = SerializeOptions {
        header: Some("My\nMap".to_string()),
        delimiter_width: 0,
        line_ending: LineEnding::Lf,
    };
    assert_eq!(
        serialize_with(&map, &options),
        "My Map\n> generatorId=`tool`\n-\n# Root\n"
    );
}

#[test]
fn test_crlf_output_parses_back() {
    let mut map = single_topic("Root");
    let root = map.root();
    map.add_topic(root, "Child").unwrap();
    map.set_extra(root, Extra::note("line 1\nline 2")).unwrap();
    let options = SerializeOptions {
        line_ending: LineEnding::CrLf,
        ..SerializeOptions::default()
    };
    let text = serialize_with(&map, &options);
    assert!(text.contains("# Root\r\n- NOTE\r\n<pre>line 1\nline 2</pre>\r\n## Child\r\n"));
    assert_eq!(parse_clean(&text).to_tree(), map.to_tree());
}

#[rstest]
#[case("plain", "plain")]
#[case("#hash", "\\#hash")]
#[case("a <b> c", "a \\<b\\> c")]
#[case("two\nlines", "two lines")]
#[case("back\\slash", "back\\\\slash")]
fn test_title_escaping(#[case] title: &str, #[case] expected: &str) {
    let text = serialize_with(
        &single_topic(title),
        &SerializeOptions {
            header: None,
            ..SerializeOptions::default()
        },
    );
    assert_eq!(text, format!("---\n# {expected}\n"));
}

#[rstest]
#[case(Extra::link("https://example.com"), "https://example.com\n")]
#[case(Extra::link("<weird>"), "<pre>&lt;weird&gt;</pre>\n")]
#[case(Extra::topic_link("ABC"), "ABC\n")]
#[case(Extra::topic_link("# not a topic"), "<pre># not a topic</pre>\n")]
#[case(Extra::file(FileLink::new("a b.txt").with_use_system(true)), "a b.txt?useSystem=true\n")]
#[case(Extra::file(FileLink::new("- list")), "<pre>- list</pre>\n")]
#[case(Extra::note("bare"), "<pre>bare</pre>\n")]
fn test_extra_bodies(#[case] extra: Extra, #[case] expected_body: &str) {
    let mut map = single_topic("T");
    let extra_type = extra.extra_type();
    map.set_extra(map.root(), extra.clone()).unwrap();
    let text = map.to_text();
    let expected = format!("# T\n- {extra_type}\n{expected_body}");
    assert!(text.ends_with(&expected), "unexpected output:\n{text}");

    let reparsed = parse_clean(&text);
    assert_eq!(reparsed.topic(reparsed.root()).unwrap().extra(extra_type), Some(&extra));
}

#[test]
fn test_extras_written_in_type_order() {
    let mut map = single_topic("T");
    let root = map.root();
    for extra in [
        Extra::topic_link("UID"),
        Extra::note("n"),
        Extra::link("l"),
        Extra::file(FileLink::new("f")),
    ] {
        map.set_extra(root, extra).unwrap();
    }
    let text = map.to_text();
    let order: Vec<_> = ExtraType::ALL
        .iter()
        .map(|ty| text.find(&format!("- {ty}\n")).unwrap())
        .collect();
    assert!(order.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn test_snippets_follow_extras() {
    let mut map = single_topic("T");
    let root = map.root();
    let topic = map.topic_mut(root).unwrap();
    topic.set_code_snippet("sql", Some("SELECT 1;\n")).unwrap();
    topic.set_code_snippet("empty", Some("")).unwrap();
    map.set_extra(root, Extra::link("l")).unwrap();

    let text = map.to_text();
    assert!(text.ends_with("- LINK\nl\n```sql\nSELECT 1;\n\n```\n```empty\n```\n"));
    let reparsed = parse_clean(&text);
    let topic = reparsed.topic(reparsed.root()).unwrap();
    assert_eq!(topic.code_snippet("sql"), Some("SELECT 1;\n"));
    assert_eq!(topic.code_snippet("empty"), Some(""));
}
