use vdf::{Document, NodeId, Value};

fn names(doc: &Document, parent: NodeId) -> Vec<String> {
    doc.node(parent)
        .children()
        .map(|c| c.name().to_owned())
        .collect()
}

fn build(doc: &mut Document, parent: NodeId, leaves: &[&str]) -> Vec<NodeId> {
    leaves
        .iter()
        .map(|name| {
            let id = doc.create_leaf(*name, *name);
            doc.append(parent, id);
            id
        })
        .collect()
}

#[test]
fn append_remove_matrix() {
    let mut doc = Document::new();
    let root = doc.root_id();
    let ids = build(&mut doc, root, &["a", "b", "c", "d"]);
    assert_eq!(names(&doc, root), ["a", "b", "c", "d"]);

    doc.remove(ids[0]);
    assert_eq!(names(&doc, root), ["b", "c", "d"]);
    assert!(!doc.node(ids[1]).prev_child().exists());

    doc.remove(ids[3]);
    assert_eq!(names(&doc, root), ["b", "c"]);
    assert_eq!(doc.root().last_child().name(), "c");
    assert!(!doc.node(ids[2]).next_child().exists());

    doc.remove(ids[0]);
    assert_eq!(names(&doc, root), ["b", "c"]);

    let holder = doc.create_node("holder");
    doc.append(root, holder);
    doc.append(holder, ids[0]);
    doc.append(holder, ids[3]);
    assert_eq!(names(&doc, holder), ["a", "d"]);
    assert_eq!(doc.node(ids[0]).parent().name(), "holder");
    assert_eq!(names(&doc, root), ["b", "c", "holder"]);

    doc.remove(ids[1]);
    doc.remove(ids[2]);
    doc.remove(holder);
    assert_eq!(doc.root().children().count(), 0);
    assert!(!doc.root().first_child().exists());
    assert!(!doc.root().last_child().exists());
}

#[test]
fn removed_subtree_stays_intact() {
    let mut doc = Document::from_text("a { b { c 1 } d 2 } e 3").unwrap();
    let b = doc.root().first_child().first_child().id().unwrap();
    doc.remove(b);
    let removed = doc.node(b);
    assert!(!removed.parent().exists());
    assert!(!removed.next_child().exists());
    assert_eq!(removed.first_child().int(), 1);
    assert_eq!(doc.root().first_child().first_child().name(), "d");

    let root = doc.root_id();
    doc.append(root, b);
    assert_eq!(doc.root().last_child().first_by_name("c").int(), 1);
}

#[test]
#[should_panic(expected = "document root")]
fn append_root_panics() {
    let mut doc = Document::new();
    let a = doc.create_node("a");
    let root = doc.root_id();
    doc.append(a, root);
}

#[test]
fn navigation_by_kind_and_name() {
    let doc = Document::from_text(
        "Key 1\nsub { }\nkey 2\nother 3\nSUB { x y }\nKEY 4\n",
    )
    .unwrap();
    let root = doc.root();

    let values: Vec<i32> = std::iter::successors(Some(root.first_by_name("key")), |n| {
        Some(n.next_by_name("KeY"))
    })
    .take_while(|n| n.exists())
    .map(|n| n.int())
    .collect();
    assert_eq!(values, [1, 2, 4]);

    let subtree = root.first_subtree();
    assert_eq!(subtree.name(), "sub");
    assert_eq!(subtree.next_subtree().name(), "SUB");
    assert!(!subtree.next_subtree().next_subtree().exists());

    let value = root.first_value();
    assert_eq!(value.name(), "Key");
    assert_eq!(value.next_value().name(), "key");
    assert_eq!(value.next_value().next_value().name(), "other");
    assert_eq!(
        value.next_value().next_value().next_value().name(),
        "KEY"
    );
}

#[test]
fn unicode_names_match_without_case() {
    let doc = Document::from_text("\"\u{00C9}T\u{00C9}\" 1").unwrap();
    assert_eq!(doc.root().first_by_name("\u{00E9}t\u{00E9}").int(), 1);
}

#[test]
fn set_value_switches_between_leaf_and_interior() {
    let mut doc = Document::from_text("a { b 1 c 2 }").unwrap();
    let a = doc.root().first_child().id().unwrap();
    let b = doc.root().first_child().first_child().id().unwrap();

    doc.node_mut(a).set_int(5);
    assert!(doc.node(a).is_leaf());
    assert!(!doc.node(a).first_child().exists());
    assert!(!doc.node(b).parent().exists());

    doc.node_mut(a).set_value(Value::None);
    assert!(doc.node(a).is_interior());
    assert_eq!(doc.node(a).string(), "");

    doc.node_mut(a).append(b);
    assert_eq!(doc.node(a).first_child().int(), 1);
}

#[test]
fn clear_formatting_on_a_subtree() {
    let mut doc = Document::from_text("// keep\nkeep 1\nsub { x 1 }\n").unwrap();
    let sub = doc.root().first_by_name("sub").id().unwrap();
    doc.node_mut(sub).clear_formatting();
    assert!(doc.root().first_child().has_formatting());
    assert!(!doc.node(sub).first_child().has_formatting());
    assert_eq!(
        doc.to_text(),
        "// keep\nkeep 1\n\"sub\"\n{\n\t\"x\" \"1\"\n}\n"
    );
}

#[test]
fn node_identity() {
    let doc = Document::from_text("a 1\nb 2").unwrap();
    let a = doc.root().first_child();
    assert_eq!(a, doc.root().first_by_name("a"));
    assert_ne!(a, a.next_child());
    assert_eq!(a.next_child().prev_child(), a);
    assert_eq!(a.document().node_count(), 3);
    assert_eq!(a.parent(), doc.root());
}

#[test]
fn documents_are_shareable_across_threads() {
    let doc = Document::from_text("a { b 7 }").unwrap();
    let total: i32 = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| doc.root().first_child().first_child().int()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).sum()
    });
    assert_eq!(total, 28);
}
