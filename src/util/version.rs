use semver::Version;
use thiserror::Error;

pub const APP_NAME: &str = "Marketplace Pricer";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Error, Debug, PartialEq)]
pub enum VersionError {
    #[error("invalid version format: {0}")]
    InvalidVersion(String),
}

pub fn parse_version_str(input: &str) -> Result<Version, VersionError> {
    let trimmed = input.trim().trim_start_matches(|ch| ch == 'v' || ch == 'V');
    Version::parse(trimmed).map_err(|err| VersionError::InvalidVersion(err.to_string()))
}

pub fn current_version() -> Result<Version, VersionError> {
    parse_version_str(APP_VERSION)
}

/// True when `written_by` names a release newer than this binary, i.e. a file
/// may carry fields this version does not understand.
pub fn is_newer_than_current(written_by: &str) -> bool {
    match (parse_version_str(written_by), current_version()) {
        (Ok(other), Ok(current)) => other > current,
        _ => false,
    }
}

pub fn version_label() -> String {
    format!("v{}", APP_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_tag_prefixes() {
        assert_eq!(parse_version_str("v1.2.3").unwrap(), Version::new(1, 2, 3));
        assert!(parse_version_str("banana").is_err());
    }

    #[test]
    fn compares_against_the_running_binary() {
        assert!(is_newer_than_current("999.0.0"));
        assert!(!is_newer_than_current("0.0.1"));
        assert!(!is_newer_than_current("not-a-version"));
    }
}
