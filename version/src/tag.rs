/// Git tag for a release version: `v` followed by the version with any
/// leading `v`s removed
pub fn version_to_tag(version: &str) -> String {
    format!("v{}", version.trim_start_matches('v'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_to_tag() {
        assert_eq!(version_to_tag("1.2.3"), "v1.2.3");
        assert_eq!(version_to_tag("v1.2.3"), "v1.2.3");
        assert_eq!(version_to_tag("vv2.0.0-rc.1"), "v2.0.0-rc.1");
        assert_eq!(version_to_tag(""), "v");
    }
}
