//! Interactive setup workflows.
//!
//! `init` walks the operator through package manager, `.env` checks,
//! repository credentials, secret upload and artifact materialization.
//! `update` re-materializes a chosen subset of artifacts. Steps run strictly
//! in order and never roll back earlier side effects; the only way to stop a
//! run early is declining one of the two `.env` confirmations in `init`.
mod init;
mod summary;
mod update;
mod validate;

#[cfg(test)]
mod testing;

use crate::model::PackageManager;
use crate::prompt::Interaction;
use crate::secrets::SecretStore;
use crate::templates::TemplateSource;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub use init::{AbortPoint, InitOutcome};
pub use summary::{RunSummary, UpdateSummary};

pub const DEFAULT_ENV_PATH: &str = ".env";

/// Drives `init` and `update` against its collaborators.
pub struct SetupOrchestrator<'a> {
    prompt: &'a mut dyn Interaction,
    secrets: &'a dyn SecretStore,
    templates: &'a dyn TemplateSource,
    project_root: PathBuf,
}

impl<'a> SetupOrchestrator<'a> {
    pub fn new(
        prompt: &'a mut dyn Interaction,
        secrets: &'a dyn SecretStore,
        templates: &'a dyn TemplateSource,
        project_root: &Path,
    ) -> Self {
        Self {
            prompt,
            secrets,
            templates,
            project_root: project_root.to_path_buf(),
        }
    }

    fn choose_package_manager(&mut self, question: &str) -> Result<PackageManager> {
        let choices = PackageManager::ALL.map(PackageManager::as_str);
        let default = PackageManager::ALL
            .iter()
            .position(|pm| *pm == PackageManager::DEFAULT)
            .unwrap_or_default();
        let index = self.prompt.select(question, &choices, default)?;
        Ok(PackageManager::ALL
            .get(index)
            .copied()
            .unwrap_or(PackageManager::DEFAULT))
    }

    /// Ask for the `.env` path; relative answers resolve against the project root.
    fn ask_env_path(&mut self) -> Result<PathBuf> {
        let answer = self
            .prompt
            .input("Enter path to your .env file", Some(DEFAULT_ENV_PATH))?;
        let path = PathBuf::from(answer);
        Ok(if path.is_absolute() {
            path
        } else {
            self.project_root.join(path)
        })
    }
}
