use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::error::ChangelogError;
use crate::release::{ChangelogVersion, normalize_label};
use crate::renderer::{LinkReference, References, render};
use crate::token::{Token, TokenKind};
use crate::tokenizer::tokenize;
use crate::types::Result;
use crate::utils::{MISPLACED_CATEGORY_HEADING_PATTERN, MISPLACED_VERSION_HEADING_PATTERN};
use chrono::NaiveDate;
use std::fs;
use std::path::Path;

/// A parsed changelog: free-form header followed by releases, newest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Changelog {
    repo_url: String,
    header: Vec<Token>,
    versions: Vec<ChangelogVersion>,
    references: Vec<LinkReference>,
}

impl Changelog {
    /// Parses changelog text, reporting repairs through `tracing`
    ///
    /// # Errors
    /// Returns error if the text does not follow the changelog schema
    pub fn parse(text: &str, repo_url: &str) -> Result<Self> {
        Self::parse_with_sink(text, repo_url, &mut TracingSink)
    }

    /// Parses changelog text, reporting repairs to `sink`
    ///
    /// # Errors
    /// Returns error if the text does not follow the changelog schema
    pub fn parse_with_sink(
        text: &str,
        repo_url: &str,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Self> {
        let tokenized = tokenize(text);
        let mut groups = group_sections(tokenized.tokens, sink)?.into_iter();

        let header: Vec<Token> = groups
            .next()
            .unwrap_or_default()
            .into_iter()
            .filter(|token| token.kind != TokenKind::Hr)
            .collect();

        let versions = groups
            .map(|group| ChangelogVersion::from_tokens(&group, sink))
            .collect::<Result<Vec<_>>>()?;
        if versions.is_empty() {
            return Err(ChangelogError::structure("No versions!"));
        }

        // Release link definitions are regenerated on render
        let references = tokenized
            .references
            .into_iter()
            .filter(|reference| {
                let label = normalize_label(&reference.label).to_lowercase();
                !versions
                    .iter()
                    .any(|version| version.identifier.to_lowercase() == label)
            })
            .collect();

        Ok(Self {
            repo_url: repo_url.trim_end_matches('/').to_string(),
            header,
            versions,
            references,
        })
    }

    /// Reads and parses a changelog file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn from_path(path: impl AsRef<Path>, repo_url: &str) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            ChangelogError::from(e).with_context(format!("Failed to read {}", path.display()))
        })?;
        Self::parse(&text, repo_url)
    }

    /// Turns the Unreleased section into release `next` dated `date`
    pub fn update_version(&mut self, next: &str, date: NaiveDate) {
        self.update_version_with_sink(next, date, &mut TracingSink);
    }

    pub fn update_version_with_sink(
        &mut self,
        next: &str,
        date: NaiveDate,
        sink: &mut dyn DiagnosticSink,
    ) {
        if !self.versions.first().is_some_and(ChangelogVersion::is_unreleased) {
            sink.emit(Diagnostic::MissingUnreleased);
            self.versions.insert(0, ChangelogVersion::blank_unreleased());
        }

        let release = &mut self.versions[0];
        release.identifier = next.to_string();
        release.date = Some(date.format("%Y-%m-%d").to_string());
        release.link = None;
    }

    /// Reference links for every release, keyed by identifier
    pub fn link_references(&self) -> References {
        let mut references = References::new();
        let mut prior_tag: Option<String> = None;

        for version in self.versions.iter().rev() {
            let tag = (!version.is_unreleased())
                .then(|| ::version::version_to_tag(&version.identifier));

            let href = match (&prior_tag, &tag) {
                (Some(prior), Some(tag)) => format!("{}/compare/{prior}...{tag}", self.repo_url),
                (Some(prior), None) => format!("{}/compare/{prior}...HEAD", self.repo_url),
                (None, Some(tag)) => format!("{}/releases/tag/{tag}", self.repo_url),
                (None, None) => format!("{}/commits/HEAD", self.repo_url),
            };
            references.insert(&version.identifier, href);
            prior_tag = tag;
        }

        for reference in &self.references {
            references.preserve(reference.clone());
        }
        references
    }

    /// Canonical markdown for the whole changelog
    pub fn render(&self) -> String {
        let mut tokens = self.header.clone();
        for version in &self.versions {
            tokens.extend(version.serialize());
        }
        render(&tokens, &self.link_references())
    }

    /// Renders the changelog into `path`
    ///
    /// # Errors
    /// Returns error if the file cannot be written
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.render()).map_err(|e| {
            ChangelogError::from(e).with_context(format!("Failed to write {}", path.display()))
        })
    }

    pub fn repo_url(&self) -> &str {
        &self.repo_url
    }

    pub fn header(&self) -> &[Token] {
        &self.header
    }

    pub fn versions(&self) -> &[ChangelogVersion] {
        &self.versions
    }

    pub fn references(&self) -> &[LinkReference] {
        &self.references
    }

    pub fn unreleased(&self) -> Option<&ChangelogVersion> {
        self.versions.first().filter(|version| version.is_unreleased())
    }
}

/// Split the token stream at each release heading, repairing headings
/// written one level too high
fn group_sections(tokens: Vec<Token>, sink: &mut dyn DiagnosticSink) -> Result<Vec<Vec<Token>>> {
    let mut groups = Vec::new();
    let mut current = Vec::new();
    // Level applied to the close of a heading repaired at its open token
    let mut retag: Option<u8> = None;
    let mut tokens = tokens.into_iter().peekable();

    while let Some(mut token) = tokens.next() {
        match token.kind {
            TokenKind::HeadingOpen => {
                let Some(inline) = tokens.peek() else {
                    return Err(ChangelogError::structure("Changelog ends with a heading"));
                };
                let text = inline.content.clone();

                if token.tag == "h1" && MISPLACED_VERSION_HEADING_PATTERN.is_match(&text) {
                    sink.emit(Diagnostic::HeadingDowngraded {
                        text: text.clone(),
                        from: 1,
                        to: 2,
                    });
                    token.set_heading_level(2);
                    retag = Some(2);
                }

                if token.tag == "h2" {
                    if MISPLACED_CATEGORY_HEADING_PATTERN.is_match(&text) {
                        sink.emit(Diagnostic::HeadingDowngraded { text, from: 2, to: 3 });
                        token.set_heading_level(3);
                        retag = Some(3);
                    } else {
                        groups.push(std::mem::take(&mut current));
                    }
                }
            }
            TokenKind::HeadingClose => {
                if let Some(level) = retag.take() {
                    token.set_heading_level(level);
                }
            }
            _ => {}
        }
        current.push(token);
    }

    groups.push(current);
    Ok(groups)
}
