use crate::category::{Category, Sections};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::ChangelogError;
use crate::token::{Token, TokenCursor, TokenKind, heading};
use crate::types::{Result, TokenGroup};
use crate::utils::{HEADING_PATTERN, LEADING_V_PATTERN, LINKED_HEADING_PATTERN};

/// Identifier of the section collecting changes not yet released
pub const UNRELEASED: &str = "Unreleased";

/// One release section of a changelog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogVersion {
    pub identifier: String,
    pub date: Option<String>,
    /// Heading link that takes precedence over the generated one
    pub link: Option<String>,
    /// Paragraphs between the heading and the first category
    pub notices: Vec<TokenGroup>,
    pub sections: Sections,
}

struct VersionHeading {
    label: String,
    link: Option<String>,
    date: Option<String>,
}

impl VersionHeading {
    fn parse(text: &str) -> Option<Self> {
        let non_empty = |value: regex::Match<'_>| {
            let value = value.as_str().trim();
            (!value.is_empty()).then(|| value.to_string())
        };

        if let Some(captures) = LINKED_HEADING_PATTERN.captures(text) {
            return Some(Self {
                label: captures["version"].to_string(),
                link: captures.name("link").and_then(non_empty),
                date: captures.name("date").and_then(non_empty),
            });
        }

        HEADING_PATTERN.captures(text).map(|captures| Self {
            label: captures["version"].to_string(),
            link: None,
            date: captures.name("date").and_then(non_empty),
        })
    }
}

/// Result of reading a bullet list after a category heading
enum BulletList {
    Items(Vec<TokenGroup>),
    /// No list, or a list without items; the heading is dropped
    EmptySectionSkip,
}

/// Version label with a `v`/`V` prefix before a digit removed
pub fn normalize_label(label: &str) -> &str {
    if LEADING_V_PATTERN.is_match(label) {
        &label[1..]
    } else {
        label
    }
}

impl ChangelogVersion {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            date: None,
            link: None,
            notices: Vec::new(),
            sections: Sections::default(),
        }
    }

    pub fn blank_unreleased() -> Self {
        Self::new(UNRELEASED)
    }

    #[must_use]
    pub fn is_unreleased(&self) -> bool {
        self.identifier == UNRELEASED
    }

    /// Build a release from the tokens of one `h2` section
    ///
    /// # Errors
    /// Returns `ChangelogError::Structure` when the tokens do not follow the
    /// release schema
    pub fn from_tokens(tokens: &[Token], sink: &mut dyn DiagnosticSink) -> Result<Self> {
        let starts_with_heading = tokens.len() >= 3
            && tokens[0].kind == TokenKind::HeadingOpen
            && tokens[0].tag == "h2"
            && tokens[1].kind == TokenKind::Inline
            && tokens[2].kind == TokenKind::HeadingClose;
        if !starts_with_heading {
            return Err(ChangelogError::structure("Invalid version section"));
        }

        let text = &tokens[1].content;
        let heading = VersionHeading::parse(text).ok_or_else(|| {
            ChangelogError::structure(format!("Invalid section heading: `{text}`"))
        })?;

        sink.emit(Diagnostic::ParsedVersion {
            identifier: heading.label.clone(),
        });

        let identifier = normalize_label(&heading.label);
        if identifier != heading.label {
            sink.emit(Diagnostic::StrippedLeadingV {
                label: heading.label.clone(),
            });
        }

        let mut version = Self::new(identifier);
        version.link = heading.link;
        version.date = heading.date;

        let body: Vec<Token> = tokens[3..]
            .iter()
            .filter(|token| token.kind != TokenKind::Hr)
            .cloned()
            .collect();
        version.read_body(&body)?;

        Ok(version)
    }

    fn read_body(&mut self, body: &[Token]) -> Result<()> {
        let mut cursor = TokenCursor::new(body);

        while let Some(front) = cursor.peek() {
            match front.kind {
                TokenKind::HeadingOpen => {
                    let heading = take_heading(&mut cursor)?;
                    let BulletList::Items(items) = take_bullet_list(&mut cursor)? else {
                        continue;
                    };
                    let category = Category::from_heading(&heading.content).ok_or_else(|| {
                        ChangelogError::structure(format!(
                            "Unknown section `{}` in version {}",
                            heading.content, self.identifier
                        ))
                    })?;
                    self.sections.get_mut(category).extend(items);
                }
                TokenKind::ParagraphOpen => {
                    let notice = cursor
                        .take_balanced()
                        .ok_or_else(|| ChangelogError::structure("Paragraph is malformed!"))?;
                    self.notices.push(notice.to_vec());
                }
                TokenKind::BulletListOpen => {
                    if let BulletList::Items(items) = take_bullet_list(&mut cursor)? {
                        self.sections.changed.extend(items);
                    }
                }
                _ => {
                    return Err(ChangelogError::structure(format!(
                        "Don't know how to handle these tokens in version {}: {:?}",
                        self.identifier,
                        cursor
                            .remaining()
                            .iter()
                            .map(|token| token.kind)
                            .collect::<Vec<_>>()
                    )));
                }
            }
        }

        if !cursor.is_exhausted() {
            return Err(ChangelogError::structure("Leftover tokens!"));
        }
        Ok(())
    }

    /// Token stream for this release, the inverse of [`Self::from_tokens`]
    pub fn serialize(&self) -> Vec<Token> {
        let link = match &self.link {
            Some(href) => Token::link_to(href),
            None => Token::link_reference(&self.identifier),
        };
        let mut title = vec![link, Token::text(&self.identifier), Token::link_close()];
        if let Some(date) = &self.date {
            title.push(Token::text(format!(" - {date}")));
        }

        let mut tokens = heading(2, title);
        for notice in &self.notices {
            tokens.extend(notice.iter().cloned());
        }

        for (category, items) in self.sections.iter() {
            tokens.extend(heading(3, vec![Token::text(category.title())]));
            tokens.push(Token::bullet_list_open());
            for item in items {
                tokens.extend(item.iter().cloned());
            }
            tokens.push(Token::bullet_list_close());
        }
        tokens
    }
}

fn take_heading<'a>(cursor: &mut TokenCursor<'a>) -> Result<&'a Token> {
    let heading = cursor.remaining();
    let well_formed = heading.len() >= 3
        && heading[0].kind == TokenKind::HeadingOpen
        && heading[1].kind == TokenKind::Inline
        && heading[2].kind == TokenKind::HeadingClose;
    if !well_formed {
        return Err(ChangelogError::structure("Invalid section heading"));
    }
    Ok(&cursor.take(3)[1])
}

fn take_bullet_list(cursor: &mut TokenCursor<'_>) -> Result<BulletList> {
    if cursor.peek().map(|token| token.kind) != Some(TokenKind::BulletListOpen) {
        return Ok(BulletList::EmptySectionSkip);
    }

    let malformed = || ChangelogError::structure("Bullet list is malformed!");
    let list = cursor.take_balanced().ok_or_else(malformed)?;
    if list.last().map(|token| token.kind) != Some(TokenKind::BulletListClose) {
        return Err(malformed());
    }

    let mut items = TokenCursor::new(&list[1..list.len() - 1]);
    let mut groups = Vec::new();
    while !items.is_exhausted() {
        let item = items.take_balanced().ok_or_else(malformed)?;
        groups.push(item.to_vec());
    }

    if groups.is_empty() {
        Ok(BulletList::EmptySectionSkip)
    } else {
        Ok(BulletList::Items(groups))
    }
}
