//! Values shared by the init/update flows.
use std::fmt;
use std::path::PathBuf;

/// Python package manager whose template set is materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Pip,
    Uv,
}

impl PackageManager {
    /// Menu order; `uv` is the default selection.
    pub const ALL: [PackageManager; 2] = [PackageManager::Pip, PackageManager::Uv];
    pub const DEFAULT: PackageManager = PackageManager::Uv;

    /// Directory name of this manager's template set.
    pub fn as_str(self) -> &'static str {
        match self {
            PackageManager::Pip => "pip",
            PackageManager::Uv => "uv",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operator answers collected by `init`, validated before construction.
#[derive(Clone)]
pub struct DeploymentChoice {
    pub package_manager: PackageManager,
    pub env_path: PathBuf,
    pub repository: String,
    pub credential: String,
}

impl fmt::Debug for DeploymentChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeploymentChoice")
            .field("package_manager", &self.package_manager)
            .field("env_path", &self.env_path)
            .field("repository", &self.repository)
            .field("credential", &format_args!("<{} chars>", self.credential.len()))
            .finish()
    }
}
