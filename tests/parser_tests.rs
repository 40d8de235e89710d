//! Parser robustness and universal invariants through the public API.

mod common;

use common::init_logging;
use placard::render::inline::split_words;
use placard::{parse, Node, NodeContext, NodeKind};

fn walk(node: &Node, f: &mut impl FnMut(&Node)) {
    f(node);
    for child in &node.children {
        walk(child, f);
    }
}

#[test]
fn test_every_node_has_a_legal_context() {
    init_logging();
    let doc = parse(
        "<h1>T</h1><p>a <b>b</b> <a href=\"u\">c</a></p><ul><li>d</li></ul>\
         <table><tr><td>e</td></tr></table><div class=\"note\">f</div><pre>g</pre>",
    );

    walk(&doc.root, &mut |node| match node.kind {
        NodeKind::DocumentRoot => assert_eq!(node.context, NodeContext::Root),
        NodeKind::Text => {
            assert!(node.children.is_empty(), "text nodes never have children")
        }
        NodeKind::Element => {
            assert_ne!(node.context, NodeContext::Root, "only the root is Root")
        }
    });
}

#[test]
fn test_paragraph_and_list_item_subtrees_are_inline() {
    init_logging();
    let doc = parse(
        "<p>x <span><b>y</b></span> <code>z</code></p>\
         <ul><li>a <div>block-tag inside li</div></li></ul>",
    );

    fn assert_descendants_inline(node: &Node) {
        for child in &node.children {
            if child.is_element() {
                assert_eq!(
                    child.context,
                    NodeContext::Inline,
                    "<{}> under p/li must be inline",
                    child.tag
                );
            }
            assert_descendants_inline(child);
        }
    }

    for top in &doc.root.children {
        if top.tag == "p" {
            assert_descendants_inline(top);
        }
        if top.tag == "ul" {
            for li in &top.children {
                assert_descendants_inline(li);
            }
        }
    }
}

#[test]
fn test_hostile_inputs_terminate_with_bounded_depth() {
    init_logging();
    let cases = [
        "<".repeat(5000),
        ">".repeat(5000),
        "<p".repeat(2000),
        "</".repeat(3000),
        "<a href=".repeat(1000),
        format!("<!--{}", "-".repeat(5000)),
        "<div ".repeat(1000) + &"x=y ".repeat(1000),
        "text < more > text << done".to_string(),
    ];

    fn depth_of(node: &Node) -> usize {
        1 + node.children.iter().map(depth_of).max().unwrap_or(0)
    }

    for case in cases {
        let doc = parse(&case);
        assert!(depth_of(&doc.root) <= 60, "tree depth stays bounded");
    }
}

#[test]
fn test_one_megabyte_input_is_truncated_not_rejected() {
    init_logging();
    let body = "lorem ipsum dolor sit amet ".repeat(60_000);
    let input = format!("<p>{body}</p>");
    assert!(input.chars().count() > 1_000_000);

    let doc = parse(&input);
    let projected = doc.root.deep_text();
    assert!(projected.chars().count() <= 1_000_000);
    assert!(projected.starts_with("lorem ipsum"));
}

#[test]
fn test_entities_are_not_decoded() {
    init_logging();
    let doc = parse("<p>a &amp; b &lt;tag&gt;</p>");
    assert_eq!(doc.root.children[0].text_content(), "a &amp; b &lt;tag&gt;");
}

#[test]
fn test_text_projection_preserved_across_formatting() {
    init_logging();
    let doc = parse("<p>The <b>quick</b> <i>brown</i> fox</p>");
    assert_eq!(doc.root.children[0].deep_text(), "The quick brown fox");
}

#[test]
fn test_end_tag_matches_original_spelling_of_normalized_tags() {
    init_logging();
    // <strong> became a span, but </strong> must still close it: "after"
    // belongs to the paragraph, not the span.
    let doc = parse("<p><strong>hit</strong>after</p>");
    let p = &doc.root.children[0];
    assert_eq!(p.children.len(), 2);
    assert_eq!(p.children[0].tag, "span");
    assert_eq!(p.children[0].deep_text(), "hit");
    assert_eq!(p.children[1].content, "after");
}

// Word splitter properties (shared by every wrapping handler).

#[test]
fn test_splitter_returns_short_tokens_unchanged() {
    for len in [1, 10, 29, 30] {
        let token = "x".repeat(len);
        assert_eq!(split_words(&token), vec![token.clone()]);
    }
}

#[test]
fn test_splitter_bounds_plain_long_tokens() {
    for len in [31, 40, 75, 200] {
        let token = "y".repeat(len);
        let pieces = split_words(&token);
        assert!(
            pieces.iter().all(|p| p.chars().count() <= 25),
            "pieces of a {len}-char token must be at most 25 chars"
        );
        assert_eq!(pieces.concat(), token);
    }
}

#[test]
fn test_splitter_reassembles_urls() {
    let urls = [
        "https://docs.example.org/reference/api/v2/endpoints?expand=all&format=json",
        "www.example.com/a-very-long-path-with-many-dashes-in-the-middle-of-it",
        "file:///usr/local/share/applications/some.desktop.entry.name.here",
    ];
    for url in urls {
        let pieces = split_words(url);
        assert_eq!(pieces.concat(), url, "fragments must reassemble exactly");
        assert!(pieces.len() > 1);
    }
}

#[test]
fn test_splitter_on_whitespace_mixes() {
    assert!(split_words("   ").is_empty());
    assert_eq!(split_words("  a  \t b \n c "), vec!["a", "b", "c"]);
}
