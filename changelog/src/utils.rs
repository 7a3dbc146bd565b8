use once_cell::sync::Lazy;
use regex::Regex;

/// `[1.0.0](https://...) - 2020-01-01`
pub static LINKED_HEADING_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[(?P<version>.+?)\]\((?P<link>.+?)\)(?:\s+-\s+(?P<date>.*))?$")
        .expect("Failed to compile linked heading regex")
});

/// `[1.0.0] - 2020-01-01` or `1.0.0 - 2020-01-01`
pub static HEADING_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[?(?P<version>.+?)\]?(?:\s+-\s+(?P<date>.*))?$")
        .expect("Failed to compile heading regex")
});

pub static LEADING_V_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[vV]\d").expect("Failed to compile leading v regex"));

/// Release headings written at h1
pub static MISPLACED_VERSION_HEADING_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[v?\d").expect("Failed to compile misplaced version heading regex")
});

/// Category headings written at h2
pub static MISPLACED_CATEGORY_HEADING_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(Add|Fix|Change|Remove)")
        .expect("Failed to compile misplaced category heading regex")
});

pub static CATEGORY_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[?(.*?)\]?:?$").expect("Failed to compile category regex"));
