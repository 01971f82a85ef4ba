//! Template resolution for deployment artifacts.
//!
//! Templates are opaque bytes keyed by `(package manager, artifact)`. The
//! bundled set is compiled into the binary; a directory laid out as
//! `<root>/<pm>/<file>` can replace it.
use crate::artifacts::ArtifactKind;
use crate::model::PackageManager;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub const PIP_DOCKERFILE: &str = include_str!("../templates/pip/Dockerfile");
pub const PIP_DOCKER_COMPOSE_YML: &str = include_str!("../templates/pip/docker-compose.yml");
pub const PIP_DEPLOY_YML: &str = include_str!("../templates/pip/deploy.yml");
pub const UV_DOCKERFILE: &str = include_str!("../templates/uv/Dockerfile");
pub const UV_DOCKER_COMPOSE_YML: &str = include_str!("../templates/uv/docker-compose.yml");
pub const UV_DEPLOY_YML: &str = include_str!("../templates/uv/deploy.yml");

/// Source of template bytes; the workflow never knows which backs it.
pub trait TemplateSource {
    /// Where the template comes from, for error messages.
    fn describe(&self, package_manager: PackageManager, kind: ArtifactKind) -> String;

    fn load(&self, package_manager: PackageManager, kind: ArtifactKind) -> Result<Vec<u8>>;
}

/// Templates compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedTemplates;

impl TemplateSource for EmbeddedTemplates {
    fn describe(&self, package_manager: PackageManager, kind: ArtifactKind) -> String {
        format!("<embedded>/{package_manager}/{}", kind.template_file_name())
    }

    fn load(&self, package_manager: PackageManager, kind: ArtifactKind) -> Result<Vec<u8>> {
        Ok(embedded(package_manager, kind).as_bytes().to_vec())
    }
}

fn embedded(package_manager: PackageManager, kind: ArtifactKind) -> &'static str {
    match (package_manager, kind) {
        (PackageManager::Pip, ArtifactKind::Dockerfile) => PIP_DOCKERFILE,
        (PackageManager::Pip, ArtifactKind::Compose) => PIP_DOCKER_COMPOSE_YML,
        (PackageManager::Pip, ArtifactKind::Workflow) => PIP_DEPLOY_YML,
        (PackageManager::Uv, ArtifactKind::Dockerfile) => UV_DOCKERFILE,
        (PackageManager::Uv, ArtifactKind::Compose) => UV_DOCKER_COMPOSE_YML,
        (PackageManager::Uv, ArtifactKind::Workflow) => UV_DEPLOY_YML,
    }
}

/// Templates read from `<root>/<pm>/<file>` on each load.
#[derive(Debug, Clone)]
pub struct DirectoryTemplates {
    root: PathBuf,
}

impl DirectoryTemplates {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn path(&self, package_manager: PackageManager, kind: ArtifactKind) -> PathBuf {
        self.root
            .join(package_manager.as_str())
            .join(kind.template_file_name())
    }
}

impl TemplateSource for DirectoryTemplates {
    fn describe(&self, package_manager: PackageManager, kind: ArtifactKind) -> String {
        self.path(package_manager, kind).display().to_string()
    }

    fn load(&self, package_manager: PackageManager, kind: ArtifactKind) -> Result<Vec<u8>> {
        let path = self.path(package_manager, kind);
        fs::read(&path).with_context(|| format!("read template {}", path.display()))
    }
}
