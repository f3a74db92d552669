//! Data model for analyzed projects and their outdated dependencies.

use semver::Version;
use std::path::PathBuf;

/// Severity of a version jump between the resolved and latest versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeSeverity {
    Major,
    Minor,
    Patch,
    Unknown,
}

impl UpgradeSeverity {
    /// Classify the jump from `resolved` to `latest`. Versions that do not
    /// parse as semver (four-part or otherwise exotic schemes) are Unknown.
    pub fn between(resolved: &str, latest: &str) -> Self {
        let (Ok(resolved), Ok(latest)) =
            (Version::parse(resolved), Version::parse(latest))
        else {
            return Self::Unknown;
        };

        if latest.major != resolved.major || !latest.pre.is_empty() {
            Self::Major
        } else if latest.minor != resolved.minor {
            Self::Minor
        } else if latest.patch != resolved.patch {
            Self::Patch
        } else {
            Self::Unknown
        }
    }
}

/// A project file found in the working copy, before analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredProject {
    /// Project name, typically the manifest file stem.
    pub name: String,
    /// Absolute path to the project manifest.
    pub file_path: PathBuf,
}

/// One outdated dependency as reported by the analyzer. Read-only input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzedDependency {
    pub name: String,
    pub resolved_version: String,
    pub latest_version: String,
    pub severity: UpgradeSeverity,
    pub transitive: bool,
    pub auto_reference: bool,
}

impl AnalyzedDependency {
    pub fn new(
        name: impl Into<String>,
        resolved_version: impl Into<String>,
        latest_version: impl Into<String>,
    ) -> Self {
        let resolved_version = resolved_version.into();
        let latest_version = latest_version.into();
        let severity =
            UpgradeSeverity::between(&resolved_version, &latest_version);

        Self {
            name: name.into(),
            resolved_version,
            latest_version,
            severity,
            transitive: false,
            auto_reference: false,
        }
    }
}

/// Outdated dependencies grouped under one target framework.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzedTargetFramework {
    pub name: String,
    pub dependencies: Vec<AnalyzedDependency>,
}

/// A project with at least one outdated dependency. Tree-shaped, immutable
/// input to consolidation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzedProject {
    pub name: String,
    pub file_path: PathBuf,
    /// Whether this project's package versions are declared centrally for
    /// the whole solution rather than per project.
    pub centrally_managed: bool,
    pub target_frameworks: Vec<AnalyzedTargetFramework>,
}
