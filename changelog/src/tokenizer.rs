//! Markdown to token stream conversion.
//!
//! Only top-level blocks get structure: headings, paragraphs, bullet lists
//! and thematic breaks. Every other block is carried as a single `Raw` token
//! holding its source text, so it renders back exactly as written.

use std::ops::Range;

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag};

use crate::renderer::LinkReference;
use crate::token::Token;

type Spanned<'a> = (Event<'a>, Range<usize>);

/// Token stream plus the link reference definitions found in the source
#[derive(Debug, Clone, Default)]
pub struct Tokenized {
    pub tokens: Vec<Token>,
    /// Definitions in source order
    pub references: Vec<LinkReference>,
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

pub fn tokenize(text: &str) -> Tokenized {
    let parser = Parser::new_ext(text, parser_options());

    let mut definitions: Vec<(usize, LinkReference)> = parser
        .reference_definitions()
        .iter()
        .map(|(label, definition)| {
            let source = definition_source(label, &definition.dest, definition.title.as_deref());
            (definition.span.start, LinkReference::new(label, source))
        })
        .collect();
    definitions.sort_by_key(|(start, _)| *start);

    let events: Vec<Spanned<'_>> = parser.into_offset_iter().collect();
    let mut tokens = Vec::with_capacity(events.len());
    let mut cursor = 0;
    while cursor < events.len() {
        let end = block_end(&events, cursor);
        push_block(text, &events[cursor..=end], &mut tokens);
        cursor = end + 1;
    }

    Tokenized {
        tokens,
        references: definitions
            .into_iter()
            .map(|(_, reference)| reference)
            .collect(),
    }
}

/// `[label]: destination "title"` for a parsed definition
fn definition_source(label: &str, destination: &str, title: Option<&str>) -> String {
    let mut source = if destination.is_empty() || destination.contains(char::is_whitespace) {
        format!("[{label}]: <{destination}>")
    } else {
        format!("[{label}]: {destination}")
    };
    match title {
        Some(title) if title.contains('"') => source.push_str(&format!(" '{title}'")),
        Some(title) => source.push_str(&format!(" \"{title}\"")),
        None => {}
    }
    source
}

/// Index of the event closing the block that starts at `start`
fn block_end(events: &[Spanned<'_>], start: usize) -> usize {
    let mut depth = 0usize;
    for (offset, (event, _)) in events[start..].iter().enumerate() {
        match event {
            Event::Start(_) => depth += 1,
            Event::End(_) => depth = depth.saturating_sub(1),
            _ => {}
        }
        if depth == 0 {
            return start + offset;
        }
    }
    events.len() - 1
}

fn push_block(text: &str, block: &[Spanned<'_>], tokens: &mut Vec<Token>) {
    let Some((event, range)) = block.first() else {
        return;
    };

    match event {
        Event::Start(Tag::Heading { level, .. }) => {
            let level = heading_level(*level);
            tokens.push(Token::heading_open(level));
            tokens.push(Token::inline(inline_source(text, inner(block))));
            tokens.push(Token::heading_close(level));
        }
        Event::Start(Tag::Paragraph) => {
            tokens.push(Token::paragraph_open());
            tokens.push(Token::inline(inline_source(text, inner(block))));
            tokens.push(Token::paragraph_close());
        }
        Event::Start(Tag::List(None)) => push_bullet_list(text, inner(block), tokens),
        Event::Rule => tokens.push(Token::hr()),
        _ => tokens.push(Token::raw(block_source(text, range))),
    }
}

fn push_bullet_list(text: &str, items: &[Spanned<'_>], tokens: &mut Vec<Token>) {
    tokens.push(Token::bullet_list_open());
    let mut cursor = 0;
    while cursor < items.len() {
        let end = block_end(items, cursor);
        if let (Event::Start(Tag::Item), range) = &items[cursor] {
            tokens.push(Token::list_item_open());
            tokens.push(Token::raw(list_item_body(text, range)));
            tokens.push(Token::list_item_close());
        }
        cursor = end + 1;
    }
    tokens.push(Token::bullet_list_close());
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Events strictly between a block's start and end
fn inner<'b, 'a>(block: &'b [Spanned<'a>]) -> &'b [Spanned<'a>] {
    if block.len() < 2 {
        &[]
    } else {
        &block[1..block.len() - 1]
    }
}

/// Source text covered by inline events, one line per source line with the
/// continuation indentation removed
fn inline_source(text: &str, events: &[Spanned<'_>]) -> String {
    let start = events.iter().map(|(_, range)| range.start).min();
    let end = events.iter().map(|(_, range)| range.end).max();
    let (Some(start), Some(end)) = (start, end) else {
        return String::new();
    };

    text[start..end]
        .lines()
        .map(str::trim_start)
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string()
}

fn line_start(text: &str, offset: usize) -> usize {
    text[..offset].rfind('\n').map_or(0, |index| index + 1)
}

/// Verbatim source of a block, including indentation before its first line
fn block_source(text: &str, range: &Range<usize>) -> String {
    let start = line_start(text, range.start);
    let start = if text[start..range.start].trim().is_empty() {
        start
    } else {
        range.start
    };

    text[start..range.end]
        .lines()
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string()
}

/// Body of a list item with the marker and the item's content indentation
/// removed from every line
fn list_item_body(text: &str, range: &Range<usize>) -> String {
    let start = line_start(text, range.start);
    let mut lines = text[start..range.end].lines();
    let first = lines.next().unwrap_or_default();

    let marker_column = first.len() - first.trim_start().len();
    let after_marker = first.get(marker_column + 1..).unwrap_or_default();
    let spacing = after_marker.len() - after_marker.trim_start_matches(' ').len();

    // A marker followed by nothing, or by a code block, puts content at
    // one column past the marker
    let (head, content_offset) = if after_marker.trim().is_empty() {
        ("", 2)
    } else if spacing > 4 {
        (&after_marker[1..], 2)
    } else {
        (&after_marker[spacing..], spacing + 1)
    };
    let indent = marker_column + content_offset;

    let mut body: Vec<&str> = Vec::new();
    if !head.is_empty() {
        body.push(head);
    }
    body.extend(lines.map(|line| strip_indent(line, indent)));
    while body.last().is_some_and(|line| line.trim().is_empty()) {
        body.pop();
    }
    while body.first().is_some_and(|line| line.trim().is_empty()) {
        body.remove(0);
    }

    body.join("\n").trim_end().to_string()
}

fn strip_indent(line: &str, indent: usize) -> &str {
    let spaces = line.len() - line.trim_start_matches(' ').len();
    &line[spaces.min(indent)..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|token| token.kind).collect()
    }

    #[test]
    fn structures_top_level_blocks() {
        let text = "# Changelog\n\nSome intro\ntext here.\n\n---\n\n## [1.0.0] - 2020-01-01\n\n- one\n- two\n";
        let tokenized = tokenize(text);

        assert_eq!(
            kinds(&tokenized.tokens),
            vec![
                TokenKind::HeadingOpen,
                TokenKind::Inline,
                TokenKind::HeadingClose,
                TokenKind::ParagraphOpen,
                TokenKind::Inline,
                TokenKind::ParagraphClose,
                TokenKind::Hr,
                TokenKind::HeadingOpen,
                TokenKind::Inline,
                TokenKind::HeadingClose,
                TokenKind::BulletListOpen,
                TokenKind::ListItemOpen,
                TokenKind::Raw,
                TokenKind::ListItemClose,
                TokenKind::ListItemOpen,
                TokenKind::Raw,
                TokenKind::ListItemClose,
                TokenKind::BulletListClose,
            ]
        );
        assert_eq!(tokenized.tokens[0].tag, "h1");
        assert_eq!(tokenized.tokens[1].content, "Changelog");
        assert_eq!(tokenized.tokens[4].content, "Some intro\ntext here.");
        assert_eq!(tokenized.tokens[7].tag, "h2");
        assert_eq!(tokenized.tokens[8].content, "[1.0.0] - 2020-01-01");
        assert_eq!(tokenized.tokens[12].content, "one");
        assert_eq!(tokenized.tokens[15].content, "two");
    }

    #[test]
    fn setext_heading_keeps_text_only() {
        let tokenized = tokenize("Project History\n===============\n");
        assert_eq!(tokenized.tokens[0].tag, "h1");
        assert_eq!(tokenized.tokens[1].content, "Project History");
    }

    #[test]
    fn list_items_are_deindented() {
        let text = "* Handle missing `HOME`\n  on minimal containers\n\n  Second paragraph\n* Nested\n  - child\n";
        let tokenized = tokenize(text);
        let bodies: Vec<&str> = tokenized
            .tokens
            .iter()
            .filter(|token| token.kind == TokenKind::Raw)
            .map(|token| token.content.as_str())
            .collect();

        assert_eq!(
            bodies,
            vec![
                "Handle missing `HOME`\non minimal containers\n\nSecond paragraph",
                "Nested\n- child",
            ]
        );
    }

    #[test]
    fn other_blocks_are_raw() {
        let text = "1. first\n2. second\n\n```\ncode\n```\n\n> quoted\n";
        let tokenized = tokenize(text);
        let contents: Vec<&str> = tokenized
            .tokens
            .iter()
            .map(|token| token.content.as_str())
            .collect();

        assert_eq!(
            contents,
            vec!["1. first\n2. second", "```\ncode\n```", "> quoted"]
        );
        assert!(
            tokenized
                .tokens
                .iter()
                .all(|token| token.kind == TokenKind::Raw)
        );
    }

    #[test]
    fn collects_reference_definitions_in_source_order() {
        let text = "See [docs] and [api].\n\n[docs]: https://example.com/docs\n[API]: https://example.com/api \"Api\"\n";
        let tokenized = tokenize(text);

        let definitions: Vec<&str> = tokenized
            .references
            .iter()
            .map(|reference| reference.source.as_str())
            .collect();
        assert_eq!(
            definitions,
            vec![
                "[docs]: https://example.com/docs",
                "[API]: https://example.com/api \"Api\"",
            ]
        );
        assert_eq!(kinds(&tokenized.tokens).len(), 3);
    }

    #[test]
    fn empty_input_has_no_tokens() {
        let tokenized = tokenize("");
        assert!(tokenized.tokens.is_empty());
        assert!(tokenized.references.is_empty());
    }
}
