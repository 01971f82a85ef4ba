//! End-of-run reporting.
use crate::artifacts::MaterializationOutcome;
use crate::model::{DeploymentChoice, PackageManager};
use crate::prompt::{Interaction, Tone};
use crate::secrets::SecretUploadResult;
use std::path::PathBuf;

/// Everything one completed `init` produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub choice: DeploymentChoice,
    pub upload: SecretUploadResult,
    pub artifacts: Vec<MaterializationOutcome>,
}

/// Everything one `update` produced; `artifacts` holds only selected kinds.
#[derive(Debug, Clone)]
pub struct UpdateSummary {
    pub package_manager: PackageManager,
    pub env_path: PathBuf,
    pub artifacts: Vec<MaterializationOutcome>,
}

impl RunSummary {
    pub fn all_succeeded(&self) -> bool {
        self.upload.success && self.artifacts.iter().all(|outcome| outcome.succeeded)
    }

    pub fn report(&self, prompt: &mut dyn Interaction) {
        if self.all_succeeded() {
            prompt.tell(Tone::Success, "\nSetup Complete!");
        } else {
            prompt.tell(Tone::Warning, "\nSetup finished with errors.");
        }
        prompt.tell(Tone::Heading, "\nSummary:");
        prompt.tell(
            Tone::Plain,
            &format!("Package manager: {}", self.choice.package_manager),
        );
        prompt.tell(
            Tone::Plain,
            &format!("Environment file: {}", self.choice.env_path.display()),
        );
        prompt.tell(
            Tone::Plain,
            &format!("GitHub repository: {}", self.choice.repository),
        );
        prompt.tell(
            Tone::Plain,
            &format!("GitHub secrets uploaded: {}", mark(self.upload.success)),
        );
        prompt.tell(Tone::Plain, "Created deployment files:");
        for outcome in &self.artifacts {
            prompt.tell(
                Tone::Plain,
                &format!("   - {} {}", outcome.kind, mark(outcome.succeeded)),
            );
        }

        prompt.tell(Tone::Heading, "\nNext steps:");
        prompt.tell(Tone::Plain, "1. Commit and push your code to GitHub");
        prompt.tell(
            Tone::Plain,
            "2. Monitor GitHub Actions for deployment progress",
        );
        prompt.tell(
            Tone::Plain,
            "3. Your app will be deployed to your server automatically",
        );
    }
}

fn mark(ok: bool) -> &'static str {
    if ok {
        "✓"
    } else {
        "✗"
    }
}
