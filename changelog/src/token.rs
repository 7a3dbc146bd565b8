/// Kind of a markdown token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    HeadingOpen,
    HeadingClose,
    ParagraphOpen,
    ParagraphClose,
    BulletListOpen,
    BulletListClose,
    ListItemOpen,
    ListItemClose,
    /// Inline content of a heading or paragraph
    Inline,
    Hr,
    /// A block carried verbatim (code, quotes, tables, list item bodies)
    Raw,
    // Inline children
    Text,
    LinkOpen,
    LinkClose,
}

/// A single node of the markdown token stream.
///
/// Open tokens carry `nesting = 1`, close tokens `nesting = -1` and
/// self-contained tokens `nesting = 0`, so any well-formed run of tokens sums
/// to zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub tag: String,
    pub nesting: i8,
    pub markup: String,
    pub content: String,
    pub children: Vec<Token>,
    /// Inline link destination, for `LinkOpen`
    pub href: Option<String>,
    /// Reference label, for `LinkOpen` without a destination
    pub label: Option<String>,
}

impl Token {
    pub fn new(kind: TokenKind, tag: impl Into<String>, nesting: i8) -> Self {
        Self {
            kind,
            tag: tag.into(),
            nesting,
            markup: String::new(),
            content: String::new(),
            children: Vec::new(),
            href: None,
            label: None,
        }
    }

    pub fn heading_open(level: u8) -> Self {
        let mut token = Self::new(TokenKind::HeadingOpen, "", 1);
        token.set_heading_level(level);
        token
    }

    pub fn heading_close(level: u8) -> Self {
        let mut token = Self::new(TokenKind::HeadingClose, "", -1);
        token.set_heading_level(level);
        token
    }

    pub fn paragraph_open() -> Self {
        Self::new(TokenKind::ParagraphOpen, "p", 1)
    }

    pub fn paragraph_close() -> Self {
        Self::new(TokenKind::ParagraphClose, "p", -1)
    }

    pub fn bullet_list_open() -> Self {
        Self::new(TokenKind::BulletListOpen, "ul", 1).with_markup("-")
    }

    pub fn bullet_list_close() -> Self {
        Self::new(TokenKind::BulletListClose, "ul", -1).with_markup("-")
    }

    pub fn list_item_open() -> Self {
        Self::new(TokenKind::ListItemOpen, "li", 1).with_markup("-")
    }

    pub fn list_item_close() -> Self {
        Self::new(TokenKind::ListItemClose, "li", -1).with_markup("-")
    }

    pub fn hr() -> Self {
        Self::new(TokenKind::Hr, "hr", 0).with_markup("---")
    }

    /// Inline content known only as its literal markdown source
    pub fn inline(content: impl Into<String>) -> Self {
        Self::new(TokenKind::Inline, "", 0).with_content(content)
    }

    /// Inline content built from child tokens
    pub fn inline_children(children: Vec<Token>) -> Self {
        let content = children
            .iter()
            .filter(|child| child.kind == TokenKind::Text)
            .map(|child| child.content.as_str())
            .collect::<String>();
        let mut token = Self::new(TokenKind::Inline, "", 0).with_content(content);
        token.children = children;
        token
    }

    pub fn raw(content: impl Into<String>) -> Self {
        Self::new(TokenKind::Raw, "", 0).with_content(content)
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::new(TokenKind::Text, "", 0).with_content(content)
    }

    pub fn link_to(href: impl Into<String>) -> Self {
        let mut token = Self::new(TokenKind::LinkOpen, "a", 1);
        token.href = Some(href.into());
        token
    }

    pub fn link_reference(label: impl Into<String>) -> Self {
        let mut token = Self::new(TokenKind::LinkOpen, "a", 1);
        token.label = Some(label.into());
        token
    }

    pub fn link_close() -> Self {
        Self::new(TokenKind::LinkClose, "a", -1)
    }

    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    #[must_use]
    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.markup = markup.into();
        self
    }

    /// Level of a heading token, parsed from its `hN` tag
    #[must_use]
    pub fn heading_level(&self) -> Option<u8> {
        self.tag.strip_prefix('h')?.parse().ok()
    }

    pub fn set_heading_level(&mut self, level: u8) {
        self.tag = format!("h{level}");
        self.markup = "#".repeat(usize::from(level));
    }
}

/// Three tokens making up a heading of the given level
pub fn heading(level: u8, children: Vec<Token>) -> Vec<Token> {
    vec![
        Token::heading_open(level),
        Token::inline_children(children),
        Token::heading_close(level),
    ]
}

/// Number of tokens from the front of `tokens` that form one balanced block.
///
/// A self-contained or closing token on its own counts as a block of one.
/// Returns `None` when the opening token is never closed.
pub fn balanced_len(tokens: &[Token]) -> Option<usize> {
    let first = tokens.first()?;
    if first.nesting <= 0 {
        return Some(1);
    }

    let mut depth = 0i32;
    for (index, token) in tokens.iter().enumerate() {
        depth += i32::from(token.nesting);
        if depth == 0 {
            return Some(index + 1);
        }
    }
    None
}

/// Read position over an immutable token slice
#[derive(Debug, Clone)]
pub struct TokenCursor<'a> {
    tokens: &'a [Token],
    position: usize,
}

impl<'a> TokenCursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    pub fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.position)
    }

    pub fn remaining(&self) -> &'a [Token] {
        &self.tokens[self.position..]
    }

    pub fn is_exhausted(&self) -> bool {
        self.position >= self.tokens.len()
    }

    pub fn take(&mut self, count: usize) -> &'a [Token] {
        let end = (self.position + count).min(self.tokens.len());
        let taken = &self.tokens[self.position..end];
        self.position = end;
        taken
    }

    /// Consume one balanced block, leaving the cursor untouched if the block
    /// never closes
    pub fn take_balanced(&mut self) -> Option<&'a [Token]> {
        let length = balanced_len(self.remaining())?;
        Some(self.take(length))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> Vec<Token> {
        vec![
            Token::bullet_list_open(),
            Token::list_item_open(),
            Token::raw("one"),
            Token::list_item_close(),
            Token::list_item_open(),
            Token::raw("two"),
            Token::list_item_close(),
            Token::bullet_list_close(),
            Token::hr(),
        ]
    }

    #[test]
    fn balanced_len_stops_at_matching_close() {
        let tokens = list();
        assert_eq!(balanced_len(&tokens), Some(8));
        assert_eq!(balanced_len(&tokens[1..]), Some(3));
        assert_eq!(balanced_len(&tokens[8..]), Some(1));
        assert_eq!(balanced_len(&tokens[..7]), None);
        assert_eq!(balanced_len(&[]), None);
    }

    #[test]
    fn cursor_keeps_position_on_unbalanced_block() {
        let tokens = list();
        let mut cursor = TokenCursor::new(&tokens[..5]);
        assert!(cursor.take_balanced().is_none());
        assert_eq!(cursor.remaining().len(), 5);

        let mut cursor = TokenCursor::new(&tokens);
        assert_eq!(cursor.take_balanced().map(<[Token]>::len), Some(8));
        assert_eq!(cursor.peek().map(|token| token.kind), Some(TokenKind::Hr));
        cursor.take(10);
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn heading_level_follows_tag() {
        let mut token = Token::heading_open(1);
        assert_eq!(token.heading_level(), Some(1));
        assert_eq!(token.markup, "#");

        token.set_heading_level(3);
        assert_eq!(token.tag, "h3");
        assert_eq!(token.markup, "###");
        assert_eq!(Token::paragraph_open().heading_level(), None);
    }

    #[test]
    fn inline_children_collects_text_content() {
        let inline = Token::inline_children(vec![
            Token::link_reference("1.0.0"),
            Token::text("1.0.0"),
            Token::link_close(),
            Token::text(" - 2020-01-01"),
        ]);
        assert_eq!(inline.content, "1.0.0 - 2020-01-01");
        assert_eq!(inline.children.len(), 4);
    }
}
