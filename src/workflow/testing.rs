//! Scripted collaborators for workflow tests.
use crate::artifacts::ArtifactKind;
use crate::model::PackageManager;
use crate::prompt::{Interaction, Tone};
use crate::secrets::{SecretStore, SecretUploadResult};
use crate::templates::{EmbeddedTemplates, TemplateSource};
use anyhow::{anyhow, Result};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub(crate) enum Answer {
    Select(usize),
    Input(String),
    Default,
    Confirm(bool),
}

pub(crate) fn input(value: &str) -> Answer {
    Answer::Input(value.to_string())
}

/// Replays answers in order and records every question and message.
#[derive(Debug, Default)]
pub(crate) struct ScriptedPrompt {
    answers: VecDeque<Answer>,
    pub(crate) questions: Vec<String>,
    pub(crate) messages: Vec<(Tone, String)>,
}

impl ScriptedPrompt {
    pub(crate) fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            ..Self::default()
        }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.answers.len()
    }

    pub(crate) fn said(&self, needle: &str) -> bool {
        self.messages.iter().any(|(_, text)| text.contains(needle))
    }

    pub(crate) fn said_with(&self, tone: Tone, needle: &str) -> bool {
        self.messages
            .iter()
            .any(|(said_tone, text)| *said_tone == tone && text.contains(needle))
    }

    fn next(&mut self, question: &str) -> Result<Answer> {
        self.questions.push(question.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| anyhow!("script exhausted at {question:?}"))
    }
}

impl Interaction for ScriptedPrompt {
    fn select(&mut self, question: &str, choices: &[&str], default: usize) -> Result<usize> {
        match self.next(question)? {
            Answer::Select(index) if index < choices.len() => Ok(index),
            Answer::Default => Ok(default),
            other => Err(anyhow!("expected selection for {question:?}, got {other:?}")),
        }
    }

    fn input(&mut self, question: &str, default: Option<&str>) -> Result<String> {
        match (self.next(question)?, default) {
            (Answer::Input(value), _) => Ok(value),
            (Answer::Default, Some(default)) => Ok(default.to_string()),
            (other, _) => Err(anyhow!("expected input for {question:?}, got {other:?}")),
        }
    }

    fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        match self.next(question)? {
            Answer::Confirm(value) => Ok(value),
            Answer::Default => Ok(default),
            other => Err(anyhow!("expected confirmation for {question:?}, got {other:?}")),
        }
    }

    fn tell(&mut self, tone: Tone, message: &str) {
        self.messages.push((tone, message.to_string()));
    }
}

/// Returns a canned result and records each submission.
pub(crate) struct RecordingSecretStore {
    reply: SecretUploadResult,
    pub(crate) calls: RefCell<Vec<(String, String, PathBuf)>>,
}

impl RecordingSecretStore {
    pub(crate) fn replying(reply: SecretUploadResult) -> Self {
        Self {
            reply,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl SecretStore for RecordingSecretStore {
    fn submit(&self, repository: &str, credential: &str, env_path: &Path) -> SecretUploadResult {
        self.calls.borrow_mut().push((
            repository.to_string(),
            credential.to_string(),
            env_path.to_path_buf(),
        ));
        self.reply.clone()
    }
}

/// Embedded templates that remember which were requested.
#[derive(Default)]
pub(crate) struct RecordingTemplates {
    pub(crate) loads: RefCell<Vec<(PackageManager, ArtifactKind)>>,
}

impl TemplateSource for RecordingTemplates {
    fn describe(&self, package_manager: PackageManager, kind: ArtifactKind) -> String {
        EmbeddedTemplates.describe(package_manager, kind)
    }

    fn load(&self, package_manager: PackageManager, kind: ArtifactKind) -> Result<Vec<u8>> {
        self.loads.borrow_mut().push((package_manager, kind));
        EmbeddedTemplates.load(package_manager, kind)
    }
}

/// A `.env` holding every required key.
pub(crate) fn write_complete_env(path: &Path) {
    std::fs::write(path, "SERVER_HOST=x\nSERVER_USER=y\nSSH_PRIVATE_KEY=z\n")
        .expect("write env file");
}

pub(crate) fn token() -> String {
    "a".repeat(40)
}
