//! Integration tests for box tree construction and layout.

use marten_css::layout::split_lines;
use marten_css::{
    ApproximateFontMetrics, BoxDimensions, BoxType, Declaration, FontDescriptor, FontMetrics,
    LayoutBox, LayoutError, PAD_END_MARKER, Rule, SimpleSelector, StyleTree, StyledNode,
    Stylesheet, Value, layout_tree,
};
use marten_dom::{DomTree, ElementData, NodeId};

/// Every character advances 10px (zero-width spaces excepted), lines are 20px.
struct FixedMetrics;

impl FontMetrics for FixedMetrics {
    #[allow(clippy::cast_precision_loss)]
    fn text_width(&self, text: &str, _font: &FontDescriptor) -> f32 {
        text.chars().filter(|&ch| ch != PAD_END_MARKER).count() as f32 * 10.0
    }

    fn line_height(&self, _font: &FontDescriptor) -> f32 {
        20.0
    }
}

/// A font backend that measures everything as zero width.
struct ZeroWidthMetrics;

impl FontMetrics for ZeroWidthMetrics {
    fn text_width(&self, _text: &str, _font: &FontDescriptor) -> f32 {
        0.0
    }

    fn line_height(&self, _font: &FontDescriptor) -> f32 {
        20.0
    }
}

fn rule(tag: &str, declarations: &[(&str, Value)]) -> Rule {
    Rule::new(
        vec![SimpleSelector::new().tag(tag).into()],
        declarations
            .iter()
            .map(|(name, value)| Declaration::new(name, value.clone()))
            .collect(),
    )
}

fn style(tree: &DomTree, rules: Vec<Rule>) -> StyledNode {
    let sheet = Stylesheet::with_user_agent_defaults(Stylesheet::new(rules));
    StyleTree::build(tree, &sheet).unwrap()
}

/// A document holding only `<html>`.
fn html_only() -> DomTree {
    let mut tree = DomTree::new();
    let _ = tree.append_element(NodeId::ROOT, ElementData::new("html"));
    tree
}

/// `<html>` holding a single text node.
fn html_with_text(text: &str) -> DomTree {
    let mut tree = DomTree::new();
    let html = tree.append_element(NodeId::ROOT, ElementData::new("html"));
    let _ = tree.append_text(html, text);
    tree
}

fn text_of<'a>(layout_box: &'a LayoutBox<'_>) -> &'a str {
    match &layout_box.box_type {
        BoxType::Inline(inline) => &inline.text,
        BoxType::Block(_) | BoxType::Anonymous => "",
    }
}

fn horizontal_sum(d: &BoxDimensions) -> f32 {
    d.content.width
        + d.margin.left
        + d.margin.right
        + d.border.left
        + d.border.right
        + d.padding.left
        + d.padding.right
}

// ---------------------------------------------------------------------------
// Block widths
// ---------------------------------------------------------------------------

#[test]
fn test_overconstrained_width_goes_to_right_margin() {
    let styled = style(
        &html_only(),
        vec![rule(
            "html",
            &[
                ("width", Value::px(500.0)),
                ("margin-left", Value::px(100.0)),
                ("margin-right", Value::px(50.0)),
                ("padding", Value::px(10.0)),
                ("border-width", Value::px(2.0)),
            ],
        )],
    );
    let mut viewport = BoxDimensions::viewport(960.0);
    let root = layout_tree(&styled, &mut viewport, &ApproximateFontMetrics).unwrap();

    let d = root.dimensions;
    assert_eq!(d.content.width, 500.0);
    assert_eq!(d.margin.left, 100.0);
    assert_eq!(d.margin.right, 336.0);
    assert_eq!(d.padding.left, 10.0);
    assert_eq!(d.border.right, 2.0);
    assert_eq!(horizontal_sum(&d), 960.0);
    assert_eq!(d.content.x, 112.0);
}

#[test]
fn test_auto_margins_center_the_block() {
    let styled = style(
        &html_only(),
        vec![rule(
            "html",
            &[
                ("width", Value::px(400.0)),
                ("margin-left", Value::keyword("auto")),
                ("margin-right", Value::keyword("auto")),
            ],
        )],
    );
    let mut viewport = BoxDimensions::viewport(960.0);
    let root = layout_tree(&styled, &mut viewport, &ApproximateFontMetrics).unwrap();

    assert_eq!(root.dimensions.margin.left, 280.0);
    assert_eq!(root.dimensions.margin.right, 280.0);
    assert_eq!(root.dimensions.content.x, 280.0);
}

#[test]
fn test_single_auto_margin_takes_the_rest() {
    let left_auto = style(
        &html_only(),
        vec![rule(
            "html",
            &[
                ("width", Value::px(500.0)),
                ("margin-left", Value::keyword("auto")),
                ("margin-right", Value::px(50.0)),
            ],
        )],
    );
    let mut viewport = BoxDimensions::viewport(960.0);
    let root = layout_tree(&left_auto, &mut viewport, &ApproximateFontMetrics).unwrap();
    assert_eq!(root.dimensions.margin.left, 410.0);
    assert_eq!(root.dimensions.margin.right, 50.0);

    let right_auto = style(
        &html_only(),
        vec![rule(
            "html",
            &[
                ("width", Value::px(500.0)),
                ("margin", Value::px(100.0)),
                ("margin-right", Value::keyword("auto")),
            ],
        )],
    );
    let root = layout_tree(&right_auto, &mut viewport, &ApproximateFontMetrics).unwrap();
    assert_eq!(root.dimensions.margin.left, 100.0);
    assert_eq!(root.dimensions.margin.right, 360.0);
    assert_eq!(horizontal_sum(&root.dimensions), 960.0);
}

#[test]
fn test_auto_width_fills_container() {
    let styled = style(
        &html_only(),
        vec![rule(
            "html",
            &[
                ("padding", Value::px(10.0)),
                ("margin-left", Value::keyword("auto")),
            ],
        )],
    );
    let mut viewport = BoxDimensions::viewport(960.0);
    let root = layout_tree(&styled, &mut viewport, &ApproximateFontMetrics).unwrap();

    // The auto margin becomes 0 once width is auto.
    assert_eq!(root.dimensions.margin.left, 0.0);
    assert_eq!(root.dimensions.content.width, 940.0);
}

#[test]
fn test_auto_width_overflow_shrinks_right_margin() {
    let styled = style(
        &html_only(),
        vec![rule(
            "html",
            &[
                ("margin-left", Value::px(600.0)),
                ("margin-right", Value::px(600.0)),
            ],
        )],
    );
    let mut viewport = BoxDimensions::viewport(960.0);
    let root = layout_tree(&styled, &mut viewport, &ApproximateFontMetrics).unwrap();

    assert_eq!(root.dimensions.content.width, 0.0);
    assert_eq!(root.dimensions.margin.right, 360.0);
}

#[test]
fn test_non_length_width_is_auto() {
    let styled = style(
        &html_only(),
        vec![rule("html", &[("width", Value::keyword("wide"))])],
    );
    let mut viewport = BoxDimensions::viewport(640.0);
    let root = layout_tree(&styled, &mut viewport, &ApproximateFontMetrics).unwrap();
    assert_eq!(root.dimensions.content.width, 640.0);
}

// ---------------------------------------------------------------------------
// Block position and height
// ---------------------------------------------------------------------------

#[test]
fn test_blocks_stack_vertically() {
    let mut tree = DomTree::new();
    let html = tree.append_element(NodeId::ROOT, ElementData::new("html"));
    let _ = tree.append_element(html, ElementData::new("div").with_attr("id", "a"));
    let _ = tree.append_element(html, ElementData::new("p"));
    let styled = style(
        &tree,
        vec![
            rule("div", &[("height", Value::px(50.0))]),
            rule("p", &[("height", Value::px(30.0)), ("margin", Value::px(5.0))]),
        ],
    );

    let mut viewport = BoxDimensions::viewport(800.0);
    let root = layout_tree(&styled, &mut viewport, &ApproximateFontMetrics).unwrap();

    assert_eq!(root.children.len(), 2);
    let div = &root.children[0].dimensions;
    let p = &root.children[1].dimensions;
    assert_eq!(div.content.y, 0.0);
    assert_eq!(div.content.height, 50.0);
    assert_eq!(p.content.y, 55.0);
    assert_eq!(p.content.x, 5.0);
    assert_eq!(p.content.width, 790.0);

    assert_eq!(root.dimensions.content.height, 90.0);
    assert_eq!(viewport.content.height, 90.0);
}

#[test]
fn test_vertical_offset_uses_bottom_padding_and_border() {
    let mut tree = DomTree::new();
    let html = tree.append_element(NodeId::ROOT, ElementData::new("html"));
    let _ = tree.append_element(html, ElementData::new("div"));
    let styled = style(
        &tree,
        vec![rule(
            "div",
            &[
                ("margin-top", Value::px(2.0)),
                ("padding-top", Value::px(5.0)),
                ("padding-bottom", Value::px(7.0)),
                ("border-bottom-width", Value::px(3.0)),
            ],
        )],
    );

    let mut viewport = BoxDimensions::viewport(800.0);
    let root = layout_tree(&styled, &mut viewport, &ApproximateFontMetrics).unwrap();
    assert_eq!(root.children[0].dimensions.content.y, 12.0);
}

#[test]
fn test_specified_height_is_a_minimum() {
    let mut tree = DomTree::new();
    let html = tree.append_element(NodeId::ROOT, ElementData::new("html"));
    let _ = tree.append_element(html, ElementData::new("div"));
    let styled = style(
        &tree,
        vec![
            rule("html", &[("height", Value::px(10.0))]),
            rule("div", &[("height", Value::px(40.0))]),
        ],
    );

    let mut viewport = BoxDimensions::viewport(800.0);
    let root = layout_tree(&styled, &mut viewport, &ApproximateFontMetrics).unwrap();
    assert_eq!(root.dimensions.content.height, 40.0);
}

// ---------------------------------------------------------------------------
// Box tree construction
// ---------------------------------------------------------------------------

#[test]
fn test_inline_runs_share_one_anonymous_box() {
    let mut tree = DomTree::new();
    let html = tree.append_element(NodeId::ROOT, ElementData::new("html"));
    let _ = tree.append_text(html, "a");
    let _ = tree.append_element(html, ElementData::new("div"));
    let _ = tree.append_text(html, "b");
    let span = tree.append_element(html, ElementData::new("span"));
    let _ = tree.append_text(span, "c");
    let styled = style(&tree, vec![]);

    let root = LayoutBox::build(&styled).unwrap();

    assert!(matches!(root.box_type, BoxType::Block(node) if node.tag_name == "html"));
    assert_eq!(root.children.len(), 3);
    assert_eq!(root.children[0].box_type, BoxType::Anonymous);
    assert_eq!(root.children[0].children.len(), 1);
    assert!(matches!(root.children[1].box_type, BoxType::Block(_)));
    assert_eq!(root.children[2].box_type, BoxType::Anonymous);
    assert_eq!(root.children[2].children.len(), 2);

    // The inline span holds its own inline children directly.
    let span_box = &root.children[2].children[1];
    assert_eq!(span_box.children.len(), 1);
    assert_eq!(text_of(&span_box.children[0]), "c");
}

#[test]
fn test_display_none_generates_no_box() {
    let mut tree = DomTree::new();
    let html = tree.append_element(NodeId::ROOT, ElementData::new("html"));
    let head = tree.append_element(html, ElementData::new("head"));
    let _ = tree.append_element(head, ElementData::new("title"));
    let _ = tree.append_element(html, ElementData::new("body"));
    let styled = style(&tree, vec![]);

    let root = LayoutBox::build(&styled).unwrap();
    assert_eq!(root.children.len(), 1);
    assert!(matches!(root.children[0].box_type, BoxType::Block(node) if node.tag_name == "body"));
}

#[test]
fn test_hidden_root_is_an_error() {
    let styled = style(
        &html_only(),
        vec![rule("html", &[("display", Value::keyword("none"))])],
    );
    let mut viewport = BoxDimensions::viewport(800.0);

    assert_eq!(
        layout_tree(&styled, &mut viewport, &ApproximateFontMetrics),
        Err(LayoutError::RootNotRendered {
            tag: "html".to_string()
        })
    );
}

// ---------------------------------------------------------------------------
// Inline layout
// ---------------------------------------------------------------------------

#[test]
fn test_first_inline_run_starts_a_new_line() {
    let styled = style(&html_with_text("abc"), vec![]);
    let mut viewport = BoxDimensions::viewport(100.0);
    let root = layout_tree(&styled, &mut viewport, &FixedMetrics).unwrap();

    let text = &root.children[0].children[0];
    assert_eq!(text.dimensions.content.x, 0.0);
    assert_eq!(text.dimensions.content.y, 20.0);
    assert_eq!(text.dimensions.content.width, 30.0);
    assert_eq!(text.dimensions.content.height, 20.0);
    assert_eq!(root.dimensions.content.height, 20.0);
}

#[test]
fn test_block_after_inline_run_starts_below_it() {
    let mut tree = html_with_text("abc");
    let html = tree.document_element().unwrap();
    let _ = tree.append_element(html, ElementData::new("div"));
    let styled = style(&tree, vec![rule("div", &[("height", Value::px(10.0))])]);

    let mut viewport = BoxDimensions::viewport(100.0);
    let root = layout_tree(&styled, &mut viewport, &FixedMetrics).unwrap();

    assert_eq!(root.children[1].dimensions.content.y, 20.0);
    assert_eq!(root.dimensions.content.height, 30.0);
}

#[test]
fn test_overflowing_text_splits_into_two_fragments() {
    let original = "abcdefghijklmnopqrst";
    let styled = style(&html_with_text(original), vec![]);
    let mut viewport = BoxDimensions::viewport(100.0);
    let root = layout_tree(&styled, &mut viewport, &FixedMetrics).unwrap();

    let anonymous = &root.children[0];
    assert_eq!(anonymous.children.len(), 2);
    let first = &anonymous.children[0];
    let second = &anonymous.children[1];

    assert_eq!(text_of(first), "abcdefghij");
    assert_eq!(text_of(second), "klmnopqrst");
    assert_eq!(format!("{}{}", text_of(first), text_of(second)), original);

    // Both fragments belong to the same styled text node.
    assert_eq!(first.styled_node(), second.styled_node());

    assert_eq!(first.dimensions.content.y, 20.0);
    assert_eq!(second.dimensions.content.x, 0.0);
    assert_eq!(second.dimensions.content.y, 40.0);
    assert_eq!(second.dimensions.content.width, 100.0);
}

#[test]
fn test_forced_break_moves_text_to_next_line() {
    let styled = style(&html_with_text("ab\u{2028}cd"), vec![]);
    let mut viewport = BoxDimensions::viewport(100.0);
    let root = layout_tree(&styled, &mut viewport, &FixedMetrics).unwrap();

    let anonymous = &root.children[0];
    assert_eq!(anonymous.children.len(), 2);
    assert_eq!(text_of(&anonymous.children[0]).trim_end(), "ab");
    assert_eq!(text_of(&anonymous.children[1]), "cd");
    assert_eq!(anonymous.children[1].dimensions.content.x, 0.0);
    assert_eq!(anonymous.children[1].dimensions.content.y, 40.0);
}

#[test]
fn test_zero_width_text_is_never_split() {
    let lines = split_lines(
        "abc",
        100.0,
        150.0,
        &FontDescriptor::fallback(),
        &ZeroWidthMetrics,
    );
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].0, "abc");
}

#[test]
fn test_zero_width_text_after_wide_image_is_one_box() {
    let mut tree = DomTree::new();
    let html = tree.append_element(NodeId::ROOT, ElementData::new("html"));
    let _ = tree.append_element(
        html,
        ElementData::new("img")
            .with_attr("width", "150")
            .with_attr("height", "30"),
    );
    let _ = tree.append_text(html, "abc");
    let styled = style(&tree, vec![]);

    let mut viewport = BoxDimensions::viewport(100.0);
    let root = layout_tree(&styled, &mut viewport, &ZeroWidthMetrics).unwrap();

    let anonymous = &root.children[0];
    assert_eq!(anonymous.children.len(), 2);
    assert_eq!(text_of(&anonymous.children[1]), "abc");
    assert_eq!(anonymous.children[1].dimensions.content.x, 150.0);
}

// ---------------------------------------------------------------------------
// Inline images
// ---------------------------------------------------------------------------

#[test]
fn test_images_wrap_then_flow_inline() {
    let mut tree = DomTree::new();
    let html = tree.append_element(NodeId::ROOT, ElementData::new("html"));
    for _ in 0..2 {
        let _ = tree.append_element(
            html,
            ElementData::new("img")
                .with_attr("width", "\"40\"")
                .with_attr("height", "30"),
        );
    }
    let styled = style(&tree, vec![]);

    let mut viewport = BoxDimensions::viewport(100.0);
    let root = layout_tree(&styled, &mut viewport, &FixedMetrics).unwrap();
    let anonymous = &root.children[0];

    // The cursor starts at the line end, so the first image drops down.
    let first = anonymous.children[0].dimensions.content;
    assert_eq!((first.x, first.y, first.width, first.height), (0.0, 30.0, 40.0, 30.0));

    let second = anonymous.children[1].dimensions.content;
    assert_eq!((second.x, second.y), (40.0, 30.0));

    assert_eq!(root.dimensions.content.height, 60.0);
}

#[test]
fn test_image_without_size_has_no_geometry() {
    let mut tree = DomTree::new();
    let html = tree.append_element(NodeId::ROOT, ElementData::new("html"));
    let _ = tree.append_element(html, ElementData::new("img").with_attr("width", "40"));
    let _ = tree.append_element(
        html,
        ElementData::new("img")
            .with_attr("width", "forty")
            .with_attr("height", "30"),
    );
    let styled = style(&tree, vec![]);

    let mut viewport = BoxDimensions::viewport(100.0);
    let root = layout_tree(&styled, &mut viewport, &FixedMetrics).unwrap();

    for image in &root.children[0].children {
        assert_eq!(image.dimensions, BoxDimensions::default());
    }
    assert_eq!(root.dimensions.content.height, 0.0);
}

// ---------------------------------------------------------------------------
// Whole-tree properties
// ---------------------------------------------------------------------------

#[test]
fn test_layout_is_idempotent() {
    let mut tree = DomTree::new();
    let html = tree.append_element(NodeId::ROOT, ElementData::new("html"));
    let body = tree.append_element(html, ElementData::new("body"));
    let p = tree.append_element(body, ElementData::new("p"));
    let _ = tree.append_text(p, "The quick brown fox jumps over the lazy dog. ");
    let b = tree.append_element(p, ElementData::new("b"));
    let _ = tree.append_text(b, "Again and again and again.");
    let styled = style(
        &tree,
        vec![
            rule("body", &[("margin", Value::px(8.0))]),
            rule("p", &[("padding", Value::px(4.0))]),
        ],
    );

    let mut first_viewport = BoxDimensions::viewport(200.0);
    let first = layout_tree(&styled, &mut first_viewport, &ApproximateFontMetrics).unwrap();
    let mut second_viewport = BoxDimensions::viewport(200.0);
    let second = layout_tree(&styled, &mut second_viewport, &ApproximateFontMetrics).unwrap();

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    assert_eq!(first_viewport, second_viewport);
}
