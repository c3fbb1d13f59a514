//! Semantic version parsing and formatting
//!
//! Versions are found inside image tags (`v1.2.3`, `1.2.3-alpine`), version
//! labels (`3.3.3`) and Helm chart labels (`mychart-1.2.3_build.5`).

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::VersionError;

static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\.(\d+)\.(\d+)(?:-([0-9A-Za-z.\-]+))?(?:\+(\S+))?")
        .expect("version pattern is valid")
});

/// A parsed semantic version
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre_release: Option<String>,
    pub build: Option<String>,
}

impl Version {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            pre_release: None,
            build: None,
        }
    }

    pub fn with_build(mut self, build: impl Into<String>) -> Self {
        self.build = Some(build.into());
        self
    }

    pub fn with_pre_release(mut self, pre_release: impl Into<String>) -> Self {
        self.pre_release = Some(pre_release.into());
        self
    }

    /// Parse the first `major.minor.patch` triple found in `input`
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let caps = VERSION_PATTERN
            .captures(input)
            .ok_or_else(|| VersionError::NoVersion(input.to_string()))?;

        let component = |i: usize| -> Result<u64, VersionError> {
            let raw = &caps[i];
            raw.parse::<u64>()
                .map_err(|_| VersionError::OutOfRange(raw.to_string()))
        };

        Ok(Self {
            major: component(1)?,
            minor: component(2)?,
            patch: component(3)?,
            pre_release: caps.get(4).map(|m| m.as_str().to_string()),
            build: caps.get(5).map(|m| m.as_str().to_string()),
        })
    }

    /// Parse a `helm.sh/chart` label value.
    ///
    /// Helm replaces `+` with `_` in chart labels, so the last underscore is
    /// turned back into the build separator before parsing.
    pub fn parse_helm_chart(label: &str) -> Result<Self, VersionError> {
        match label.rfind('_') {
            Some(index) => {
                let rewritten = format!("{}+{}", &label[..index], &label[index + 1..]);
                Self::parse(&rewritten)
            }
            None => Self::parse(label),
        }
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(ref pre) = self.pre_release {
            write!(f, "-{}", pre)?;
        }
        if let Some(ref build) = self.build {
            write!(f, "+{}", build)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_triple() {
        let v = Version::parse("1.2.3").unwrap();
        assert_eq!(v, Version::new(1, 2, 3));
    }

    #[test]
    fn test_parse_with_leading_v() {
        assert_eq!(Version::parse("v10.0.7").unwrap(), Version::new(10, 0, 7));
    }

    #[test]
    fn test_parse_with_build() {
        let v = Version::parse("1.2.3+abc").unwrap();
        assert_eq!(v, Version::new(1, 2, 3).with_build("abc"));
    }

    #[test]
    fn test_parse_with_pre_release_and_build() {
        let v = Version::parse("2.0.0-rc.1+sha.5114f85").unwrap();
        assert_eq!(v.pre_release.as_deref(), Some("rc.1"));
        assert_eq!(v.build.as_deref(), Some("sha.5114f85"));
    }

    #[test]
    fn test_parse_rejects_two_components() {
        assert_eq!(
            Version::parse("1.2"),
            Err(VersionError::NoVersion("1.2".to_string()))
        );
    }

    #[test]
    fn test_parse_rejects_text() {
        assert!(Version::parse("latest").is_err());
        assert!(Version::parse("").is_err());
    }

    #[test]
    fn test_parse_rejects_overflow() {
        let err = Version::parse("99999999999999999999999.0.0").unwrap_err();
        assert!(matches!(err, VersionError::OutOfRange(_)));
    }

    #[test]
    fn test_helm_chart_label_rewrites_last_underscore() {
        let v = Version::parse_helm_chart("my_chart-1.2.3_abc").unwrap();
        assert_eq!(v, Version::new(1, 2, 3).with_build("abc"));
    }

    #[test]
    fn test_helm_chart_label_without_underscore() {
        let v = Version::parse_helm_chart("redis-17.3.11").unwrap();
        assert_eq!(v, Version::new(17, 3, 11));
    }

    #[test]
    fn test_helm_chart_label_with_digits_in_name() {
        let v = Version::parse_helm_chart("app2-0.4.1").unwrap();
        assert_eq!(v, Version::new(0, 4, 1));
    }

    #[test]
    fn test_format_round_trip() {
        for (major, minor, patch) in [(0, 0, 0), (1, 2, 3), (10, 20, 30), (3, 0, 141)] {
            let v = Version::new(major, minor, patch);
            assert_eq!(Version::parse(&v.to_string()).unwrap(), v);
        }
    }

    #[test]
    fn test_format_with_suffixes() {
        let v = Version::new(1, 0, 0).with_pre_release("beta").with_build("7");
        assert_eq!(v.to_string(), "1.0.0-beta+7");
        assert_eq!(Version::parse(&v.to_string()).unwrap(), v);
    }

    #[test]
    fn test_fieldwise_ordering() {
        assert!(Version::new(1, 2, 3) < Version::new(1, 3, 0));
        assert!(Version::new(2, 0, 0) > Version::new(1, 99, 99));
    }

    #[test]
    fn test_from_str() {
        let v: Version = "4.5.6".parse().unwrap();
        assert_eq!(v, Version::new(4, 5, 6));
    }
}
