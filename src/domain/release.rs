use std::fmt;

/// Magnitude of the version increment a batch of commits warrants.
///
/// Ordered `None < Patch < Minor < Major`, so the level for a batch is the
/// maximum over its commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ReleaseLevel {
    #[default]
    None,
    Patch,
    Minor,
    Major,
}

impl ReleaseLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseLevel::None => "none",
            ReleaseLevel::Patch => "patch",
            ReleaseLevel::Minor => "minor",
            ReleaseLevel::Major => "major",
        }
    }
}

impl fmt::Display for ReleaseLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_level_ordering() {
        assert!(ReleaseLevel::None < ReleaseLevel::Patch);
        assert!(ReleaseLevel::Patch < ReleaseLevel::Minor);
        assert!(ReleaseLevel::Minor < ReleaseLevel::Major);
        assert_eq!(ReleaseLevel::default(), ReleaseLevel::None);
    }

    #[test]
    fn test_release_level_display() {
        assert_eq!(ReleaseLevel::Major.to_string(), "major");
        assert_eq!(ReleaseLevel::None.to_string(), "none");
    }
}
