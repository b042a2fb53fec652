//! Restricted-Markdown lesson renderer.
//!
//! Understands exactly four line types plus inline bold:
//!
//! | line (marker)                    | block          |
//! |----------------------------------|----------------|
//! | `- ` / `* ` (may be indented)    | list item      |
//! | `# `, `## `, `### ` (column 0)   | heading 1..=3  |
//! | `> ` (may be indented)           | quote          |
//! | anything else non-blank          | paragraph      |
//!
//! Contiguous list items are grouped into one [`Block::List`]; any other
//! line, including a blank one, closes the open list. Everything else in
//! Markdown is left as literal paragraph text. The transformation is total:
//! every input produces a block sequence.

use once_cell::sync::Lazy;
use regex::Regex;

static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*.*?\*\*").expect("valid bold pattern"));

/// An inline run of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Plain(String),
    Bold(String),
}

impl Inline {
    pub fn text(&self) -> &str {
        match self {
            Inline::Plain(text) | Inline::Bold(text) => text,
        }
    }
}

/// A display block, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, spans: Vec<Inline> },
    List { items: Vec<Vec<Inline>> },
    Quote(Vec<Inline>),
    Paragraph(Vec<Inline>),
}

/// How a single raw line is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind<'a> {
    ListItem(&'a str),
    Heading(u8, &'a str),
    Quote(&'a str),
    Paragraph(&'a str),
    Blank,
}

fn classify(line: &str) -> LineKind<'_> {
    let trimmed = line.trim();

    if let Some(rest) = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
    {
        return LineKind::ListItem(rest);
    }
    if let Some(rest) = line.strip_prefix("### ") {
        return LineKind::Heading(3, rest);
    }
    if let Some(rest) = line.strip_prefix("## ") {
        return LineKind::Heading(2, rest);
    }
    if let Some(rest) = line.strip_prefix("# ") {
        return LineKind::Heading(1, rest);
    }
    if let Some(rest) = trimmed.strip_prefix("> ") {
        return LineKind::Quote(rest);
    }
    if trimmed.is_empty() {
        LineKind::Blank
    } else {
        LineKind::Paragraph(line)
    }
}

/// Renderer state between lines.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListState {
    #[default]
    NoOpenList,
    OpenList(Vec<Vec<Inline>>),
}

impl ListState {
    /// Close the open list, if any.
    fn flush(self) -> Option<Block> {
        match self {
            ListState::NoOpenList => None,
            ListState::OpenList(items) => Some(Block::List { items }),
        }
    }
}

/// Feed one line to the renderer.
///
/// Returns the next state and the blocks completed by this line (at most
/// two: a closed list followed by the line's own block).
pub fn step(state: ListState, line: &str) -> (ListState, Vec<Block>) {
    let kind = classify(line);

    if let LineKind::ListItem(rest) = kind {
        let spans = parse_inline_styles(rest);
        let items = match state {
            ListState::NoOpenList => vec![spans],
            ListState::OpenList(mut items) => {
                items.push(spans);
                items
            }
        };
        return (ListState::OpenList(items), Vec::new());
    }

    let mut emitted: Vec<Block> = state.flush().into_iter().collect();
    match kind {
        LineKind::Heading(level, rest) => emitted.push(Block::Heading {
            level,
            spans: parse_inline_styles(rest),
        }),
        LineKind::Quote(rest) => emitted.push(Block::Quote(parse_inline_styles(rest))),
        LineKind::Paragraph(raw) => emitted.push(Block::Paragraph(parse_inline_styles(raw))),
        LineKind::Blank | LineKind::ListItem(_) => {}
    }
    (ListState::NoOpenList, emitted)
}

/// Turn a lesson into display blocks.
pub fn render(text: &str) -> Vec<Block> {
    let (state, mut blocks) = text.split('\n').fold(
        (ListState::NoOpenList, Vec::new()),
        |(state, mut blocks), line| {
            let (next, emitted) = step(state, line);
            blocks.extend(emitted);
            (next, blocks)
        },
    );
    blocks.extend(state.flush());
    blocks
}

/// Split a line into plain and bold runs.
///
/// `**...**` pairs become [`Inline::Bold`] with the markers removed. Plain
/// runs between, before and after them are always emitted, even when empty,
/// so `"**a**"` yields `[Plain(""), Bold("a"), Plain("")]`. An unpaired `**`
/// stays inside a plain run.
pub fn parse_inline_styles(text: &str) -> Vec<Inline> {
    let mut spans = Vec::new();
    let mut last = 0;

    for m in BOLD.find_iter(text) {
        spans.push(Inline::Plain(text[last..m.start()].to_string()));
        let inner = &text[m.start() + 2..m.end() - 2];
        spans.push(Inline::Bold(inner.to_string()));
        last = m.end();
    }
    spans.push(Inline::Plain(text[last..].to_string()));

    spans
}

/// Concatenated text of `spans` without markers.
pub fn spans_text(spans: &[Inline]) -> String {
    spans.iter().map(Inline::text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(s: &str) -> Inline {
        Inline::Plain(s.to_string())
    }

    fn bold(s: &str) -> Inline {
        Inline::Bold(s.to_string())
    }

    #[test]
    fn test_heading_levels_in_order() {
        let blocks = render("# Title\n## Sub\n### Detail");
        let headings: Vec<(u8, String)> = blocks
            .iter()
            .map(|b| match b {
                Block::Heading { level, spans } => (*level, spans_text(spans)),
                other => panic!("unexpected block {other:?}"),
            })
            .collect();

        assert_eq!(
            headings,
            vec![
                (1, "Title".to_string()),
                (2, "Sub".to_string()),
                (3, "Detail".to_string())
            ]
        );
    }

    #[test]
    fn test_blank_line_closes_list() {
        let blocks = render("- a\n- b\n\n- c");
        assert_eq!(
            blocks,
            vec![
                Block::List {
                    items: vec![vec![plain("a")], vec![plain("b")]]
                },
                Block::List {
                    items: vec![vec![plain("c")]]
                },
            ]
        );
    }

    #[test]
    fn test_bold_split_keeps_trailing_empty_plain() {
        let blocks = render("Hello **world** and **you**");
        assert_eq!(
            blocks,
            vec![Block::Paragraph(vec![
                plain("Hello "),
                bold("world"),
                plain(" and "),
                bold("you"),
                plain(""),
            ])]
        );
    }

    #[test]
    fn test_blockquote() {
        let blocks = render("> Insight here");
        assert_eq!(blocks, vec![Block::Quote(vec![plain("Insight here")])]);
    }

    #[test]
    fn test_indented_markers() {
        let blocks = render("   * star item\n\t> quoted\n  # not a heading");
        assert_eq!(
            blocks,
            vec![
                Block::List {
                    items: vec![vec![plain("star item")]]
                },
                Block::Quote(vec![plain("quoted")]),
                Block::Paragraph(vec![plain("  # not a heading")]),
            ]
        );
    }

    #[test]
    fn test_paragraph_keeps_raw_line() {
        let blocks = render("  leading space  ");
        assert_eq!(blocks, vec![Block::Paragraph(vec![plain("  leading space  ")])]);
    }

    #[test]
    fn test_heading_interrupts_list() {
        let blocks = render("- one\n## Next\n- two");
        assert_eq!(blocks.len(), 3);
        assert!(matches!(&blocks[0], Block::List { items } if items.len() == 1));
        assert!(matches!(&blocks[1], Block::Heading { level: 2, .. }));
        assert!(matches!(&blocks[2], Block::List { items } if items.len() == 1));
    }

    #[test]
    fn test_list_items_carry_bold() {
        let blocks = render("- **Power rule**: n·xⁿ⁻¹");
        assert_eq!(
            blocks,
            vec![Block::List {
                items: vec![vec![plain(""), bold("Power rule"), plain(": n·xⁿ⁻¹")]]
            }]
        );
    }

    #[test]
    fn test_marker_without_space_is_paragraph() {
        let blocks = render("#Title\n-item\n>quote");
        assert_eq!(blocks.len(), 3);
        assert!(blocks.iter().all(|b| matches!(b, Block::Paragraph(_))));
    }

    #[test]
    fn test_unpaired_bold_marker_is_literal() {
        assert_eq!(
            parse_inline_styles("a ** b"),
            vec![plain("a ** b")]
        );
        assert_eq!(
            parse_inline_styles("**x** then **y"),
            vec![plain(""), bold("x"), plain(" then **y")]
        );
    }

    #[test]
    fn test_empty_and_blank_inputs() {
        assert!(render("").is_empty());
        assert!(render("\n\n   \n\t").is_empty());
    }

    #[test]
    fn test_crlf_lines() {
        let blocks = render("# Title\r\n- a\r\n- b\r\n");
        assert_eq!(blocks.len(), 2);
        assert!(matches!(&blocks[1], Block::List { items } if items.len() == 2));
    }

    #[test]
    fn test_step_transitions() {
        let (state, emitted) = step(ListState::NoOpenList, "- a");
        assert!(emitted.is_empty());
        assert_eq!(state, ListState::OpenList(vec![vec![plain("a")]]));

        let (state, emitted) = step(state, "");
        assert_eq!(state, ListState::NoOpenList);
        assert_eq!(
            emitted,
            vec![Block::List {
                items: vec![vec![plain("a")]]
            }]
        );

        let (state, emitted) = step(state, "");
        assert_eq!(state, ListState::NoOpenList);
        assert!(emitted.is_empty());
    }

    mod properties {
        use super::super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(256))]

            /// Any string renders, and never into more blocks than lines.
            #[test]
            fn prop_render_is_total(text in "(?s).{0,400}") {
                let blocks = render(&text);
                prop_assert!(blocks.len() <= text.split('\n').count());
            }

            /// Markdown-ish soup renders without panicking.
            #[test]
            fn prop_render_markdown_soup(
                lines in proptest::collection::vec(
                    prop_oneof![
                        Just("# ".to_string()),
                        Just("## **".to_string()),
                        Just("- item **bold".to_string()),
                        Just("* ".to_string()),
                        Just("> ".to_string()),
                        Just("".to_string()),
                        Just("****".to_string()),
                        "[ *#>-]{0,12}",
                    ],
                    0..30,
                )
            ) {
                let text = lines.join("\n");
                let _ = render(&text);
            }

            /// Removing markers from the spans loses no plain text.
            #[test]
            fn prop_inline_preserves_text_without_markers(text in "[a-z *]{0,60}") {
                let spans = parse_inline_styles(&text);
                let bold_pairs = spans.iter().filter(|s| matches!(s, Inline::Bold(_))).count();
                prop_assert_eq!(spans_text(&spans).len() + bold_pairs * 4, text.len());
            }
        }
    }
}
