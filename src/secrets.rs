//! Secret submission to the remote secret-storage endpoint.
//!
//! The `.env` file is forwarded as raw bytes in a single multipart POST
//! together with the repository and access token. Every failure mode
//! (missing file, transport error, unparsable reply) is returned as a
//! [`SecretUploadResult`] value; nothing here returns `Err` to the workflow.
//!
//! There is exactly one attempt per call. The request carries a credential
//! and mutates remote state, so a retry is left to the operator.
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

/// Normalized reply from the secret store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretUploadResult {
    pub success: bool,
    pub uploaded_variables: Vec<String>,
    pub failed_variables: Vec<String>,
    pub error: Option<String>,
}

impl SecretUploadResult {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// Destination for the one-shot secret upload.
pub trait SecretStore {
    fn submit(&self, repository: &str, credential: &str, env_path: &Path) -> SecretUploadResult;
}

/// Secret store reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSecretStore {
    url: String,
    timeout: Duration,
}

impl HttpSecretStore {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }

    fn post(&self, form: Form) -> reqwest::Result<(u16, String)> {
        let client = Client::builder().timeout(self.timeout).build()?;
        let response = client.post(self.url.as_str()).multipart(form).send()?;
        let status = response.status().as_u16();
        let text = response.text()?;
        Ok((status, text))
    }
}

impl SecretStore for HttpSecretStore {
    fn submit(&self, repository: &str, credential: &str, env_path: &Path) -> SecretUploadResult {
        if !env_path.is_file() {
            return SecretUploadResult::failure(format!(
                "Environment file not found: {}",
                env_path.display()
            ));
        }
        let env_bytes = match fs::read(env_path) {
            Ok(bytes) => bytes,
            Err(err) => {
                return SecretUploadResult::failure(format!(
                    "read {}: {err}",
                    env_path.display()
                ))
            }
        };
        let filename = env_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| ".env".to_string());

        let request_bytes = env_bytes.len();
        let env_part = match Part::bytes(env_bytes)
            .file_name(filename)
            .mime_str("text/plain")
        {
            Ok(part) => part,
            Err(err) => return SecretUploadResult::failure(err.to_string()),
        };
        let form = Form::new()
            .text("repo", repository.to_string())
            .text("pat", credential.to_string())
            .part("env", env_part);

        let start = Instant::now();
        let outcome = self.post(form);
        let elapsed_ms = start.elapsed().as_millis();
        match outcome {
            Ok((status, text)) => {
                tracing::info!(
                    elapsed_ms,
                    status,
                    request_bytes,
                    response_bytes = text.len(),
                    credential_len = credential.len(),
                    "secret upload complete"
                );
                parse_upload_response(&text)
            }
            Err(err) => {
                tracing::warn!(elapsed_ms, error = %err, "secret upload transport failure");
                SecretUploadResult::failure(err.to_string())
            }
        }
    }
}

/// Interpret a response body from the secret store.
///
/// `variables` lists accepted names on success and failed names otherwise,
/// unless `failedVariables` is given explicitly. Unknown keys are ignored and
/// absent or mistyped keys fall back to empty/false.
pub fn parse_upload_response(body: &str) -> SecretUploadResult {
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => return SecretUploadResult::failure(format!("Invalid JSON response: {body}")),
    };
    let Some(object) = value.as_object() else {
        return SecretUploadResult::failure(format!("Unexpected response: {body}"));
    };

    let success = object
        .get("success")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let variables = string_list(object.get("variables"));
    let explicit_failed = object
        .get("failedVariables")
        .or_else(|| object.get("failed_variables"))
        .map(|value| string_list(Some(value)));
    let error = object.get("error").and_then(|value| match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    });

    let (uploaded_variables, failed_variables) = match (success, explicit_failed) {
        (true, failed) => (variables, failed.unwrap_or_default()),
        (false, Some(failed)) => (Vec::new(), failed),
        (false, None) => (Vec::new(), variables),
    };
    SecretUploadResult {
        success,
        uploaded_variables,
        failed_variables,
        error,
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "secrets_tests.rs"]
mod tests;
