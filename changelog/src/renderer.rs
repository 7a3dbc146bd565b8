//! Token stream to canonical markdown.
//!
//! The output is deliberately narrow: ATX headings, tight `-` bullet lists,
//! one blank line between blocks and a trailing block of link reference
//! definitions for every reference label a rendered link used.

use crate::token::{Token, TokenKind, balanced_len};

fn same_label(left: &str, right: &str) -> bool {
    left.to_lowercase() == right.to_lowercase()
}

/// A link reference definition carried verbatim from the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkReference {
    pub label: String,
    pub source: String,
}

impl LinkReference {
    pub fn new(label: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            source: source.into(),
        }
    }

    pub fn matches(&self, label: &str) -> bool {
        same_label(&self.label, label)
    }
}

/// Reference label table used while rendering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct References {
    links: Vec<(String, String)>,
    preserved: Vec<LinkReference>,
}

impl References {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the destination of a label, replacing any label that differs only
    /// in case
    pub fn insert(&mut self, label: impl Into<String>, href: impl Into<String>) {
        let label = label.into();
        let href = href.into();
        match self
            .links
            .iter_mut()
            .find(|(existing, _)| same_label(existing, &label))
        {
            Some(entry) => entry.1 = href,
            None => self.links.push((label, href)),
        }
    }

    pub fn href(&self, label: &str) -> Option<&str> {
        self.links
            .iter()
            .find(|(existing, _)| same_label(existing, label))
            .map(|(_, href)| href.as_str())
    }

    /// Keep a source definition that is emitted after the generated ones
    pub fn preserve(&mut self, reference: LinkReference) {
        self.preserved.push(reference);
    }

    pub fn preserved(&self) -> &[LinkReference] {
        &self.preserved
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

pub fn render(tokens: &[Token], references: &References) -> String {
    let mut renderer = Renderer {
        references,
        used: Vec::new(),
    };

    let mut blocks = renderer.blocks(tokens);
    let definitions = renderer.definitions();
    if !definitions.is_empty() {
        blocks.push(definitions.join("\n"));
    }

    if blocks.is_empty() {
        return String::new();
    }
    let mut output = blocks.join("\n\n");
    output.push('\n');
    output
}

struct Renderer<'r> {
    references: &'r References,
    used: Vec<String>,
}

impl Renderer<'_> {
    fn blocks(&mut self, tokens: &[Token]) -> Vec<String> {
        let mut blocks = Vec::new();
        let mut cursor = 0;
        while cursor < tokens.len() {
            let remaining = &tokens[cursor..];
            let length = balanced_len(remaining).unwrap_or(remaining.len());
            if let Some(block) = self.block(&remaining[..length]) {
                blocks.push(block);
            }
            cursor += length;
        }
        blocks
    }

    fn block(&mut self, block: &[Token]) -> Option<String> {
        let first = block.first()?;
        let inner: &[Token] = if block.len() >= 2 {
            &block[1..block.len() - 1]
        } else {
            &[]
        };

        match first.kind {
            TokenKind::HeadingOpen => {
                let marker = "#".repeat(usize::from(first.heading_level().unwrap_or(1)));
                let text = self.inlines(inner);
                if text.is_empty() {
                    Some(marker)
                } else {
                    Some(format!("{marker} {text}"))
                }
            }
            TokenKind::ParagraphOpen => Some(self.inlines(inner)),
            TokenKind::BulletListOpen => Some(self.bullet_list(inner)),
            TokenKind::ListItemOpen => Some(self.list_item(inner)),
            TokenKind::Hr => Some("---".to_string()),
            TokenKind::Raw => Some(first.content.clone()),
            TokenKind::Inline => Some(self.inline(first)),
            _ => None,
        }
    }

    fn inlines(&mut self, tokens: &[Token]) -> String {
        let mut text = String::new();
        for token in tokens.iter().filter(|token| token.kind == TokenKind::Inline) {
            text.push_str(&self.inline(token));
        }
        text
    }

    fn bullet_list(&mut self, items: &[Token]) -> String {
        self.blocks(items).join("\n")
    }

    fn list_item(&mut self, body: &[Token]) -> String {
        let body = self.blocks(body).join("\n\n");
        let mut lines = body.lines();

        let mut item = match lines.next() {
            Some(first) if !first.is_empty() => format!("- {first}"),
            _ => "-".to_string(),
        };
        for line in lines {
            item.push('\n');
            if !line.is_empty() {
                item.push_str("  ");
                item.push_str(line);
            }
        }
        item
    }

    fn inline(&mut self, token: &Token) -> String {
        if token.children.is_empty() {
            return token.content.clone();
        }

        let mut output = String::new();
        let mut open_links: Vec<(&Token, usize)> = Vec::new();
        for child in &token.children {
            match child.kind {
                TokenKind::LinkOpen => {
                    open_links.push((child, output.len()));
                    output.push('[');
                }
                TokenKind::LinkClose => {
                    if let Some((open, start)) = open_links.pop() {
                        let text = output[start + 1..].to_string();
                        self.close_link(&mut output, open, &text);
                    }
                }
                _ => output.push_str(&child.content),
            }
        }
        output
    }

    fn close_link(&mut self, output: &mut String, open: &Token, text: &str) {
        match (&open.href, &open.label) {
            (Some(href), _) => {
                output.push_str("](");
                output.push_str(href);
                output.push(')');
            }
            (None, Some(label)) => {
                self.mark_used(label);
                if same_label(text, label) {
                    output.push(']');
                } else {
                    output.push_str("][");
                    output.push_str(&label.to_lowercase());
                    output.push(']');
                }
            }
            (None, None) => output.push(']'),
        }
    }

    fn mark_used(&mut self, label: &str) {
        if !self.used.iter().any(|used| same_label(used, label)) {
            self.used.push(label.to_string());
        }
    }

    fn definitions(&self) -> Vec<String> {
        let mut definitions: Vec<String> = self
            .used
            .iter()
            .filter_map(|label| {
                self.references
                    .href(label)
                    .map(|href| format!("[{}]: {href}", label.to_lowercase()))
            })
            .collect();

        definitions.extend(
            self.references
                .preserved()
                .iter()
                .filter(|reference| !self.used.iter().any(|used| reference.matches(used)))
                .map(|reference| reference.source.clone()),
        );
        definitions
    }
}
