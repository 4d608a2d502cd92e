use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::errors::AppError;
use crate::models::issue::IssueDraft;

/// Somewhere alerts get filed
#[async_trait]
pub trait IssueTracker: Send + Sync {
    async fn create_issue(&self, issue: &IssueDraft) -> Result<(), AppError>;
}

/// Files issues through the GitHub CLI (`gh issue create`), which handles
/// auth via `GH_TOKEN`/`GITHUB_TOKEN` and notifies mentioned users
#[derive(Debug, Clone)]
pub struct GhCliTracker {
    program: String,
    repo: Option<String>,
}

impl GhCliTracker {
    pub fn new(repo: Option<String>) -> Self {
        Self {
            program: "gh".to_string(),
            repo,
        }
    }

    /// Use a different executable in place of `gh`
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn build_args(&self, issue: &IssueDraft) -> Vec<String> {
        let mut args = vec![
            "issue".to_string(),
            "create".to_string(),
            "--title".to_string(),
            issue.title.clone(),
            "--body".to_string(),
            issue.body.clone(),
        ];
        for label in &issue.labels {
            args.push("--label".to_string());
            args.push(label.clone());
        }
        if let Some(ref repo) = self.repo {
            args.push("--repo".to_string());
            args.push(repo.clone());
        }
        args
    }
}

impl Default for GhCliTracker {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl IssueTracker for GhCliTracker {
    async fn create_issue(&self, issue: &IssueDraft) -> Result<(), AppError> {
        let output = Command::new(&self.program)
            .args(self.build_args(issue))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| AppError::ExternalCall(format!("failed to run {}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::ExternalCall(format!(
                "{} issue create exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let url = String::from_utf8_lossy(&output.stdout);
        tracing::info!("Created issue \"{}\" {}", issue.title, url.trim());
        Ok(())
    }
}
