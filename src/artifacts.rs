//! Materialization of deployment artifacts into a project directory.
//!
//! Each artifact is a verbatim copy of its template, overwriting whatever is
//! at the destination. Failures are recorded per artifact and never stop the
//! remaining ones.
use crate::model::PackageManager;
use crate::templates::TemplateSource;
use anyhow::{Context, Result};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// The three generated deployment files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ArtifactKind {
    Dockerfile,
    Compose,
    Workflow,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [
        ArtifactKind::Dockerfile,
        ArtifactKind::Compose,
        ArtifactKind::Workflow,
    ];

    /// File name inside a package manager's template set.
    pub fn template_file_name(self) -> &'static str {
        match self {
            ArtifactKind::Dockerfile => "Dockerfile",
            ArtifactKind::Compose => "docker-compose.yml",
            ArtifactKind::Workflow => "deploy.yml",
        }
    }

    /// Destination relative to the project root.
    pub fn destination_rel(self) -> &'static str {
        match self {
            ArtifactKind::Dockerfile => "Dockerfile",
            ArtifactKind::Compose => "docker-compose.yml",
            ArtifactKind::Workflow => ".github/workflows/deploy.yml",
        }
    }

    /// Operator-facing name used in update prompts.
    pub fn label(self) -> &'static str {
        match self {
            ArtifactKind::Dockerfile => "Dockerfile",
            ArtifactKind::Compose => "docker-compose.yml",
            ArtifactKind::Workflow => "GitHub Actions workflow file",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.destination_rel())
    }
}

/// Per-artifact result of one materialization call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializationOutcome {
    pub kind: ArtifactKind,
    pub package_manager: PackageManager,
    pub succeeded: bool,
    pub error: Option<String>,
}

/// Copies templates for one package manager into a project root.
pub struct ArtifactMaterializer<'a> {
    project_root: PathBuf,
    package_manager: PackageManager,
    templates: &'a dyn TemplateSource,
    secret_names: Vec<String>,
}

impl<'a> ArtifactMaterializer<'a> {
    pub fn new(
        project_root: &Path,
        package_manager: PackageManager,
        templates: &'a dyn TemplateSource,
    ) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            package_manager,
            templates,
            secret_names: Vec::new(),
        }
    }

    /// Record the variable names the secret store accepted.
    pub fn with_secret_names(mut self, names: Vec<String>) -> Self {
        self.secret_names = names;
        self
    }

    pub fn destination(&self, kind: ArtifactKind) -> PathBuf {
        self.project_root.join(kind.destination_rel())
    }

    pub fn materialize(&self, kind: ArtifactKind) -> MaterializationOutcome {
        let error = match self.copy_template(kind) {
            Ok(()) => None,
            Err(err) => {
                let message = format!("{err:#}");
                tracing::warn!(artifact = %kind, error = %message, "materialize failed");
                Some(message)
            }
        };
        MaterializationOutcome {
            kind,
            package_manager: self.package_manager,
            succeeded: error.is_none(),
            error,
        }
    }

    fn copy_template(&self, kind: ArtifactKind) -> Result<()> {
        let bytes = self.templates.load(self.package_manager, kind).with_context(|| {
            format!(
                "load template {}",
                self.templates.describe(self.package_manager, kind)
            )
        })?;
        let dest = self.destination(kind);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        fs::write(&dest, &bytes).with_context(|| format!("write {}", dest.display()))?;
        tracing::debug!(
            artifact = %kind,
            package_manager = %self.package_manager,
            bytes = bytes.len(),
            secrets = self.secret_names.len(),
            "materialized artifact"
        );
        Ok(())
    }
}
