//! Shell-command dump adapter.

use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

use crate::backend::adapter::{AdapterError, DumpAdapter};

/// Runs a configured dump command, substituting `{path}` with the target
/// artifact path (e.g. `pg_dump mydb > {path}`).
#[derive(Debug, Clone)]
pub struct CommandDumpAdapter {
    template: String,
}

impl CommandDumpAdapter {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }
}

#[async_trait]
impl DumpAdapter for CommandDumpAdapter {
    async fn dump(&self, target: &Path) -> Result<u64, AdapterError> {
        let command = self
            .template
            .replace("{path}", &target.display().to_string());

        let output = Command::new("sh")
            .arg("-c")
            .arg(&command)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AdapterError::Other(format!(
                "dump command exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let meta = tokio::fs::metadata(target).await.map_err(|_| {
            AdapterError::Other("dump command produced no artifact".to_string())
        })?;
        Ok(meta.len())
    }
}
