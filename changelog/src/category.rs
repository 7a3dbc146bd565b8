use std::fmt::{self, Display, Formatter};

use crate::types::TokenGroup;
use crate::utils::CATEGORY_NAME_PATTERN;

/// Change categories of a release, in canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Added,
    Changed,
    Deprecated,
    Removed,
    Fixed,
    Security,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Added,
        Category::Changed,
        Category::Deprecated,
        Category::Removed,
        Category::Fixed,
        Category::Security,
    ];

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Added => "Added",
            Self::Changed => "Changed",
            Self::Deprecated => "Deprecated",
            Self::Removed => "Removed",
            Self::Fixed => "Fixed",
            Self::Security => "Security",
        }
    }

    /// Resolve a section heading such as `[Added]`, `Fix:` or `Updated`.
    ///
    /// Brackets and one trailing colon are ignored, case is ignored, and the
    /// aliases `update`, `updated`, `change`, `add` and `fix` map onto their
    /// canonical category.
    #[must_use]
    pub fn from_heading(heading: &str) -> Option<Self> {
        let name = CATEGORY_NAME_PATTERN
            .captures(heading)
            .and_then(|captures| captures.get(1))
            .map_or(heading, |name| name.as_str())
            .to_lowercase();

        match name.as_str() {
            "added" | "add" => Some(Self::Added),
            "changed" | "change" | "updated" | "update" => Some(Self::Changed),
            "deprecated" => Some(Self::Deprecated),
            "removed" => Some(Self::Removed),
            "fixed" | "fix" => Some(Self::Fixed),
            "security" => Some(Self::Security),
            _ => None,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// List items of a release, one bucket per category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections {
    pub added: Vec<TokenGroup>,
    pub changed: Vec<TokenGroup>,
    pub deprecated: Vec<TokenGroup>,
    pub removed: Vec<TokenGroup>,
    pub fixed: Vec<TokenGroup>,
    pub security: Vec<TokenGroup>,
}

impl Sections {
    pub fn get(&self, category: Category) -> &[TokenGroup] {
        match category {
            Category::Added => &self.added,
            Category::Changed => &self.changed,
            Category::Deprecated => &self.deprecated,
            Category::Removed => &self.removed,
            Category::Fixed => &self.fixed,
            Category::Security => &self.security,
        }
    }

    pub fn get_mut(&mut self, category: Category) -> &mut Vec<TokenGroup> {
        match category {
            Category::Added => &mut self.added,
            Category::Changed => &mut self.changed,
            Category::Deprecated => &mut self.deprecated,
            Category::Removed => &mut self.removed,
            Category::Fixed => &mut self.fixed,
            Category::Security => &mut self.security,
        }
    }

    /// Non-empty buckets in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[TokenGroup])> {
        Category::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
            .filter(|(_, items)| !items.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Token;

    #[test]
    fn resolves_aliases_and_decorations() {
        let cases = [
            ("Added", Some(Category::Added)),
            ("[Add]", Some(Category::Added)),
            ("Fixed:", Some(Category::Fixed)),
            ("fix", Some(Category::Fixed)),
            ("Update", Some(Category::Changed)),
            ("Updated", Some(Category::Changed)),
            ("CHANGE", Some(Category::Changed)),
            ("[Security]:", Some(Category::Security)),
            ("Deprecated", Some(Category::Deprecated)),
            ("Removed", Some(Category::Removed)),
            ("Remove", None),
            ("Miscellaneous", None),
        ];

        for (heading, expected) in cases {
            assert_eq!(Category::from_heading(heading), expected, "{heading}");
        }
    }

    #[test]
    fn iterates_non_empty_buckets_in_canonical_order() {
        let mut sections = Sections::default();
        assert!(sections.is_empty());

        sections.get_mut(Category::Security).push(vec![Token::raw("cve")]);
        sections.get_mut(Category::Added).push(vec![Token::raw("new")]);

        let order: Vec<Category> = sections.iter().map(|(category, _)| category).collect();
        assert_eq!(order, vec![Category::Added, Category::Security]);
        assert!(!sections.is_empty());
    }
}
