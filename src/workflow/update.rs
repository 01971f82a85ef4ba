//! Workflow update step: re-materialize the artifacts the operator selects.
use super::summary::UpdateSummary;
use super::SetupOrchestrator;
use crate::artifacts::{ArtifactKind, ArtifactMaterializer};
use crate::env_file::{self, REQUIRED_VARIABLES};
use crate::prompt::Tone;
use anyhow::Result;

impl SetupOrchestrator<'_> {
    /// Run selective re-materialization. A missing or incomplete `.env` is only a warning.
    pub fn update(&mut self) -> Result<UpdateSummary> {
        self.prompt.tell(
            Tone::Heading,
            "\nFastAPI Deploy CLI - Update your deployment configuration\n",
        );
        let package_manager =
            self.choose_package_manager("Select package manager to update configuration for:")?;
        let env_path = self.ask_env_path()?;

        if env_file::file_exists(&env_path) {
            self.prompt.tell(
                Tone::Success,
                &format!("Found .env file at {}", env_path.display()),
            );
            let missing = env_file::missing_required_variables(&env_path, &REQUIRED_VARIABLES);
            if !missing.is_empty() {
                let names: Vec<&str> = missing.iter().map(String::as_str).collect();
                self.prompt.tell(
                    Tone::Warning,
                    &format!(
                        "Warning: missing required variables: {}. Deployments will fail until they are added.",
                        names.join(", ")
                    ),
                );
            }
        } else {
            self.prompt.tell(
                Tone::Warning,
                &format!(
                    "Warning: No .env file found at {}. Continuing anyway.",
                    env_path.display()
                ),
            );
        }

        let mut selected = Vec::new();
        for kind in ArtifactKind::ALL {
            if self
                .prompt
                .confirm(&format!("Update {}?", kind.label()), true)?
            {
                selected.push(kind);
            }
        }

        let materializer =
            ArtifactMaterializer::new(&self.project_root, package_manager, self.templates);
        let mut artifacts = Vec::with_capacity(selected.len());
        for kind in selected {
            let outcome = materializer.materialize(kind);
            match &outcome.error {
                None => self.prompt.tell(
                    Tone::Success,
                    &format!(
                        "Updated {} ({} template)",
                        kind.label(),
                        outcome.package_manager
                    ),
                ),
                Some(error) => self.prompt.tell(
                    Tone::Error,
                    &format!("Failed to update {}: {error}", kind.label()),
                ),
            }
            artifacts.push(outcome);
        }

        if artifacts.is_empty() {
            self.prompt
                .tell(Tone::Plain, "\nNo files selected; nothing to update.");
        } else if artifacts.iter().all(|outcome| outcome.succeeded) {
            self.prompt.tell(Tone::Success, "\nUpdate Complete!");
        } else {
            self.prompt
                .tell(Tone::Warning, "\nUpdate finished with errors.");
        }

        Ok(UpdateSummary {
            package_manager,
            env_path,
            artifacts,
        })
    }
}

#[cfg(test)]
#[path = "update_tests.rs"]
mod tests;
