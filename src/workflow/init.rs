//! Workflow init step.
//!
//! States run in this order:
//! ChoosePackageManager, InspectEnv, (WarnMissingEnv | WarnMissingVars),
//! CollectRepoCredential, SubmitSecrets, MaterializeArtifacts, Summarize.
//! A declined `.env` confirmation ends the run in `Aborted` before any
//! network or file side effect.
use super::summary::RunSummary;
use super::validate::{validate_credential, validate_repository};
use super::SetupOrchestrator;
use crate::artifacts::{ArtifactKind, ArtifactMaterializer};
use crate::env_file::{self, EnvFileStatus, RECOMMENDED_VARIABLES, REQUIRED_VARIABLES};
use crate::model::DeploymentChoice;
use crate::prompt::{ask_validated, Tone};
use crate::secrets::SecretUploadResult;
use anyhow::Result;
use std::path::Path;

/// Terminal state of one `init` run.
#[derive(Debug, Clone)]
pub enum InitOutcome {
    Completed(Box<RunSummary>),
    Aborted(AbortPoint),
}

/// Which confirmation the operator declined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortPoint {
    EnvFileMissing,
    RequiredVariablesMissing,
}

impl SetupOrchestrator<'_> {
    /// Run first-time setup.
    pub fn init(&mut self) -> Result<InitOutcome> {
        self.prompt.tell(
            Tone::Heading,
            "\nFastAPI Deploy CLI - Setup your deployment configuration\n",
        );

        self.prompt
            .tell(Tone::Heading, "Step 1: Choose your package manager");
        let package_manager = self.choose_package_manager("Select package manager:")?;

        self.prompt
            .tell(Tone::Heading, "\nStep 2: Environment file configuration");
        let env_path = self.ask_env_path()?;
        let status = env_file::inspect(&env_path, &REQUIRED_VARIABLES);
        if let Some(point) = self.review_env_file(&env_path, &status)? {
            self.prompt.tell(Tone::Error, "Setup cancelled.");
            return Ok(InitOutcome::Aborted(point));
        }

        self.prompt
            .tell(Tone::Heading, "\nStep 3: GitHub repository configuration");
        let repository = ask_validated(
            &mut *self.prompt,
            "Enter GitHub repository in format 'username/repo-name'",
            validate_repository,
        )?;
        let credential = ask_validated(
            &mut *self.prompt,
            "Enter GitHub Personal Access Token (PAT)",
            validate_credential,
        )?;
        let choice = DeploymentChoice {
            package_manager,
            env_path,
            repository,
            credential,
        };

        self.prompt.tell(
            Tone::Heading,
            "\nStep 4: Adding environment variables to GitHub secrets",
        );
        let upload = self
            .secrets
            .submit(&choice.repository, &choice.credential, &choice.env_path);
        self.report_upload(&upload);

        self.prompt
            .tell(Tone::Heading, "\nStep 5: Setting up deployment files");
        let materializer =
            ArtifactMaterializer::new(&self.project_root, choice.package_manager, self.templates)
                .with_secret_names(upload.uploaded_variables.clone());
        let mut artifacts = Vec::with_capacity(ArtifactKind::ALL.len());
        for kind in ArtifactKind::ALL {
            let outcome = materializer.materialize(kind);
            if let Some(error) = &outcome.error {
                self.prompt
                    .tell(Tone::Error, &format!("Error creating {kind}: {error}"));
            }
            artifacts.push(outcome);
        }

        let summary = RunSummary {
            choice,
            upload,
            artifacts,
        };
        summary.report(&mut *self.prompt);
        Ok(InitOutcome::Completed(Box::new(summary)))
    }

    /// Warn about a missing or incomplete `.env`; `Some` means the operator declined.
    fn review_env_file(
        &mut self,
        env_path: &Path,
        status: &EnvFileStatus,
    ) -> Result<Option<AbortPoint>> {
        if let Some(warning) = &status.read_warning {
            self.prompt.tell(Tone::Warning, &format!("Warning: {warning}"));
        }
        if !status.exists {
            self.prompt.tell(
                Tone::Warning,
                &format!("No .env file found at {}.", env_path.display()),
            );
            self.prompt.tell(
                Tone::Warning,
                "Please create an .env file at the specified path with the following variables:",
            );
            self.prompt
                .tell(Tone::Plain, "\nRequired environment variables:");
            for (name, description) in RECOMMENDED_VARIABLES {
                self.prompt
                    .tell(Tone::Plain, &format!("- {name}: {description}"));
            }
            let proceed = self
                .prompt
                .confirm("Continue after creating the .env file?", true)?;
            return Ok((!proceed).then_some(AbortPoint::EnvFileMissing));
        }

        self.prompt.tell(
            Tone::Success,
            &format!("Found .env file at {}", env_path.display()),
        );
        if status.missing_required.is_empty() {
            return Ok(None);
        }
        self.prompt.tell(
            Tone::Warning,
            "The following required variables are missing in your .env file:",
        );
        for name in &status.missing_required {
            self.prompt.tell(Tone::Plain, &format!("- {name}"));
        }
        self.prompt.tell(
            Tone::Warning,
            "Please add these variables to your .env file before continuing.",
        );
        let proceed = self
            .prompt
            .confirm("Continue after updating the .env file?", true)?;
        Ok((!proceed).then_some(AbortPoint::RequiredVariablesMissing))
    }

    fn report_upload(&mut self, upload: &SecretUploadResult) {
        if upload.success {
            self.prompt.tell(
                Tone::Success,
                "Successfully added environment variables to GitHub secrets",
            );
            self.prompt.tell(
                Tone::Detail,
                &format!("Variables added: {}", upload.uploaded_variables.join(", ")),
            );
            if !upload.failed_variables.is_empty() {
                self.prompt.tell(
                    Tone::Warning,
                    &format!("Failed variables: {}", upload.failed_variables.join(", ")),
                );
            }
            return;
        }
        self.prompt.tell(
            Tone::Error,
            "Failed to add environment variables to GitHub secrets",
        );
        if !upload.failed_variables.is_empty() {
            self.prompt.tell(
                Tone::Plain,
                &format!("Failed variables: {}", upload.failed_variables.join(", ")),
            );
        }
        if let Some(error) = &upload.error {
            self.prompt.tell(Tone::Plain, &format!("Error: {error}"));
        }
    }
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
