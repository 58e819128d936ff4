//! Box-drawing debug dump of a subtree.

use crate::document::NodeRef;

fn header(node: NodeRef<'_>) -> String {
    let mut out = format!("{:?}", node.name());
    if !node.condition().is_empty() {
        out.push_str(&format!(" [{}]", node.condition()));
    }
    if node.is_leaf() {
        out.push_str(&format!(
            " = {} ({})",
            node.string(),
            node.value().type_name()
        ));
    }
    out
}

/// Renders `node` on the first line and its descendants below it, each
/// continuation line prefixed by `tab`.
pub(crate) fn print_node(node: NodeRef<'_>, tab: &str) -> String {
    let mut out = header(node);
    let mut children = node.children().peekable();
    while let Some(child) = children.next() {
        let is_last = children.peek().is_none();
        let child_tab = format!("{tab}{}  ", if is_last { " " } else { "│" });
        out.push('\n');
        out.push_str(tab);
        out.push_str(if is_last { "└─ " } else { "├─ " });
        out.push_str(&print_node(child, &child_tab));
    }
    out
}

#[cfg(test)]
mod tests {
    use crate::Document;

    #[test]
    fn dump_layout() {
        let doc = Document::from_text(
            "\"a\" [$X] { \"b\" \"1\" \"c\" { \"d\" \"x y\" } }\n\"e\" \"2\" [!$Y]\n",
        )
        .unwrap();
        assert_eq!(
            doc.root().print_tree(""),
            concat!(
                "\"\"\n",
                "├─ \"a\" [$X]\n",
                "│  ├─ \"b\" = 1 (string)\n",
                "│  └─ \"c\"\n",
                "│     └─ \"d\" = x y (string)\n",
                "└─ \"e\" [!$Y] = 2 (string)",
            )
        );
    }

    #[test]
    fn absent_node_prints_as_empty_interior() {
        let doc = Document::new();
        assert_eq!(doc.root().first_child().print_tree("  "), "\"\"");
    }
}
