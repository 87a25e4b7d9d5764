//! Sample documents and map builders.

use mmd::MindMap;
use mmd::model::{TopicId, TopicTree};

/// A document exercising every token kind.
pub const SAMPLE_DOCUMENT: &str = "Mind Map generated by mmd-base\n\
> generatorId=`com.example`\n\
---\n\
# Root Title\n\
> fillColor=`#FFFFFF`\n\
- NOTE\n\
<pre>multi-line\nnote body</pre>\n\
- FILE\n\
path/to/file.txt?line=12\n\
```Java\n\
System.exit(0);\n\
```\n\
## Child Title\n\
- LINK\n\
https://example.com\n\
## Second\n\
### Grandchild\n";

/// Build a map whose tree equals `tree`.
pub fn map_from_tree(tree: &TopicTree) -> MindMap {
    let mut map = MindMap::new();
    let root = map.root();
    fill_topic(&mut map, root, tree);
    map
}

fn fill_topic(map: &mut MindMap, id: TopicId, tree: &TopicTree) {
    let topic = map.topic_mut(id).unwrap();
    topic.set_text(&tree.text);
    for (key, value) in &tree.attributes {
        topic.set_attribute(key, Some(value)).unwrap();
    }
    for extra in &tree.extras {
        topic.set_extra(extra.clone()).unwrap();
    }
    for (language, body) in &tree.code_snippets {
        topic.set_code_snippet(language, Some(body)).unwrap();
    }
    for child in &tree.children {
        let child_id = map.add_child(id, None).unwrap();
        fill_topic(map, child_id, child);
    }
}

/// Titles of the children of `id`.
pub fn child_texts(map: &MindMap, id: TopicId) -> Vec<String> {
    map.children(id)
        .unwrap()
        .iter()
        .map(|child| map.topic(*child).unwrap().text().to_string())
        .collect()
}
