use std::fmt;

use regex::Regex;

use crate::error::{ReleaseError, Result};

/// Kind of version bump requested by the change request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseKind {
    Major,
    Minor,
    Patch,
    Prerelease,
}

impl ReleaseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseKind::Major => "major",
            ReleaseKind::Minor => "minor",
            ReleaseKind::Patch => "patch",
            ReleaseKind::Prerelease => "prerelease",
        }
    }
}

impl fmt::Display for ReleaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Changelog heading the release notes are recorded under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangelogSection {
    Added,
    Changed,
    Fixed,
    Major,
}

impl ChangelogSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangelogSection::Added => "Added",
            ChangelogSection::Changed => "Changed",
            ChangelogSection::Fixed => "Fixed",
            ChangelogSection::Major => "Major",
        }
    }
}

impl fmt::Display for ChangelogSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Release category derived from a change-request title
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseClassification {
    pub release_kind: ReleaseKind,
    pub changelog_section: ChangelogSection,
    pub skip_beta: bool,
    pub skip_publish: bool,
}

impl ReleaseClassification {
    /// Classification effective for the requested channel.
    ///
    /// Beta releases are always published as prereleases recorded under
    /// `Added`, whatever primary tag the title carries.
    pub fn for_channel(self, beta: bool) -> Self {
        if beta {
            ReleaseClassification {
                release_kind: ReleaseKind::Prerelease,
                changelog_section: ChangelogSection::Added,
                ..self
            }
        } else {
            self
        }
    }
}

const PRIMARY_TAG_PATTERN: &str = r"(?i)\[(minor|patch|major|changed)\]";
const NO_BETA_PATTERN: &str = r"(?i)\[no-beta\]";
const NO_PUBLISH_PATTERN: &str = r"(?i)\[no-publish\]";

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| ReleaseError::classification(format!("invalid pattern {}: {}", pattern, e)))
}

/// Classify a change-request title by its bracketed tags.
///
/// The leftmost primary tag (`[major]`, `[minor]`, `[changed]`, `[patch]`,
/// case-insensitive) decides the release kind and changelog section.
/// `[no-beta]` and `[no-publish]` are detected anywhere in the title,
/// independently of the primary tag. A title without a primary tag is an
/// error.
pub fn classify(title: &str) -> Result<ReleaseClassification> {
    let primary = compile(PRIMARY_TAG_PATTERN)?;

    let tag = primary
        .captures(title)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_ascii_lowercase())
        .ok_or_else(|| {
            ReleaseError::classification(format!(
                "Could not get release type from pull request title '{}'",
                title
            ))
        })?;

    let (release_kind, changelog_section) = match tag.as_str() {
        "major" => (ReleaseKind::Major, ChangelogSection::Major),
        "minor" => (ReleaseKind::Minor, ChangelogSection::Added),
        "changed" => (ReleaseKind::Minor, ChangelogSection::Changed),
        "patch" => (ReleaseKind::Patch, ChangelogSection::Fixed),
        other => {
            return Err(ReleaseError::classification(format!(
                "Unrecognized release tag '{}'",
                other
            )))
        }
    };

    log::info!("Release type: {}", tag);

    let skips = skip_tags(title)?;
    Ok(ReleaseClassification {
        release_kind,
        changelog_section,
        skip_beta: skips.skip_beta,
        skip_publish: skips.skip_publish,
    })
}

/// `[no-beta]` / `[no-publish]` markers of a title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SkipTags {
    pub skip_beta: bool,
    pub skip_publish: bool,
}

/// Detect the skip markers; they do not require a primary tag.
pub fn skip_tags(title: &str) -> Result<SkipTags> {
    Ok(SkipTags {
        skip_beta: compile(NO_BETA_PATTERN)?.is_match(title),
        skip_publish: compile(NO_PUBLISH_PATTERN)?.is_match(title),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_table() {
        let cases = vec![
            ("[major] Drop legacy checkout", ReleaseKind::Major, ChangelogSection::Major),
            ("[minor] Add cart feature", ReleaseKind::Minor, ChangelogSection::Added),
            ("[changed] Rework pricing", ReleaseKind::Minor, ChangelogSection::Changed),
            ("[patch] Fix price rounding", ReleaseKind::Patch, ChangelogSection::Fixed),
        ];

        for (title, kind, section) in cases {
            let c = classify(title).unwrap();
            assert_eq!(c.release_kind, kind, "title: {}", title);
            assert_eq!(c.changelog_section, section, "title: {}", title);
        }
    }

    #[test]
    fn test_case_insensitive_with_surrounding_text() {
        let c = classify("Merge feature/cart into main [MINOR] please").unwrap();
        assert_eq!(c.release_kind, ReleaseKind::Minor);
        assert_eq!(c.changelog_section, ChangelogSection::Added);
    }

    #[test]
    fn test_leftmost_tag_wins() {
        let c = classify("[patch] then [major]").unwrap();
        assert_eq!(c.release_kind, ReleaseKind::Patch);
    }

    #[test]
    fn test_non_matching_titles_fail() {
        for title in ["Add cart feature", "minor: cart", "[feature] cart", "[no-beta] cart", ""] {
            let err = classify(title).unwrap_err();
            assert!(matches!(err, ReleaseError::Classification(_)), "title: {}", title);
        }
    }

    #[test]
    fn test_skip_flags_are_independent() {
        let c = classify("[patch] Fix price rounding [no-publish]").unwrap();
        assert!(c.skip_publish);
        assert!(!c.skip_beta);

        let c = classify("[no-beta] [minor] Add cart").unwrap();
        assert!(c.skip_beta);
        assert!(!c.skip_publish);
    }

    #[test]
    fn test_skip_tags_without_primary_tag() {
        let skips = skip_tags("[no-beta] Update docs").unwrap();
        assert!(skips.skip_beta);
        assert!(!skips.skip_publish);
        assert_eq!(skip_tags("Update docs").unwrap(), SkipTags::default());
    }

    #[test]
    fn test_beta_channel_overrides_kind() {
        let c = classify("[major] Drop legacy checkout").unwrap().for_channel(true);
        assert_eq!(c.release_kind, ReleaseKind::Prerelease);
        assert_eq!(c.changelog_section, ChangelogSection::Added);

        let stable = classify("[major] Drop legacy checkout").unwrap().for_channel(false);
        assert_eq!(stable.release_kind, ReleaseKind::Major);
    }
}
