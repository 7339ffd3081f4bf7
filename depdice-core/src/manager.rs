pub mod types;

pub use types::{License, PackageCredits, PackageDetails, Person, PublishTimes};

use crate::lockfile::{LockfileKind, PackageIdentity};
use crate::{DepdiceConfig, DepdiceError, Result};
use serde_json::Value;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Npm,
    Yarn,
}

impl PackageManager {
    pub fn name(self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
        }
    }
}

impl From<LockfileKind> for PackageManager {
    fn from(kind: LockfileKind) -> Self {
        match kind {
            LockfileKind::Npm => PackageManager::Npm,
            LockfileKind::Yarn => PackageManager::Yarn,
        }
    }
}

/// Where package metadata and usage explanations come from.
pub trait MetadataSource {
    fn describe(&self, package: &PackageIdentity) -> impl Future<Output = Result<PackageDetails>>;

    fn usage(&self, package: &PackageIdentity) -> impl Future<Output = Result<String>>;
}

/// Asks the installed `npm` / `yarn` binaries about a package.
#[derive(Debug, Clone)]
pub struct CommandSource {
    config: DepdiceConfig,
    manager: PackageManager,
    root: PathBuf,
}

impl CommandSource {
    pub fn new(config: DepdiceConfig, manager: PackageManager, root: &Path) -> Self {
        CommandSource {
            config,
            manager,
            root: root.to_path_buf(),
        }
    }
}

impl MetadataSource for CommandSource {
    async fn describe(&self, package: &PackageIdentity) -> Result<PackageDetails> {
        let spec = package.to_string();
        let mut command = Command::new(&self.config.npm_bin);
        command
            .arg("view")
            .arg(&spec)
            .arg("--json")
            .arg("--prefix")
            .arg(&self.root);

        let label = format!("{} view {} --json", self.config.npm_bin, spec);
        let stdout = run_command(command, &label, self.config.command_timeout)
            .await
            .map_err(|err| DepdiceError::MetadataNotFound {
                package: spec.clone(),
                reason: err.to_string(),
            })?;

        parse_view(&spec, &stdout)
    }

    async fn usage(&self, package: &PackageIdentity) -> Result<String> {
        match self.manager {
            PackageManager::Npm => {
                let mut command = Command::new(&self.config.npm_bin);
                command
                    .arg("ls")
                    .arg(&package.name)
                    .arg("--prefix")
                    .arg(&self.root);

                let label = format!("{} ls {}", self.config.npm_bin, package.name);
                let stdout = run_command(command, &label, self.config.command_timeout).await?;
                Ok(stdout.trim().to_string())
            }
            PackageManager::Yarn => {
                let mut command = Command::new(&self.config.yarn_bin);
                command
                    .current_dir(&self.root)
                    .arg("why")
                    .arg(&package.name)
                    .arg("--json");

                let label = format!("{} why {} --json", self.config.yarn_bin, package.name);
                let stdout = run_command(command, &label, self.config.command_timeout).await?;
                parse_yarn_why(&package.name, &stdout)
            }
        }
    }
}

async fn run_command(mut command: Command, label: &str, timeout: Duration) -> Result<String> {
    command.stdin(Stdio::null()).kill_on_drop(true);
    debug!("running `{}`", label);

    let output = match tokio::time::timeout(timeout, command.output()).await {
        Ok(result) => result.map_err(|source| DepdiceError::CommandSpawn {
            command: label.to_string(),
            source,
        })?,
        Err(_) => {
            warn!("`{}` timed out after {:?}", label, timeout);
            return Err(DepdiceError::CommandTimeout {
                command: label.to_string(),
                seconds: timeout.as_secs(),
            });
        }
    };

    if !output.status.success() {
        return Err(DepdiceError::CommandFailed {
            command: label.to_string(),
            code: output.status.code().unwrap_or(1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// `npm view --json` prints an array when several versions match.
pub fn parse_view(spec: &str, stdout: &str) -> Result<PackageDetails> {
    let not_found = |reason: String| DepdiceError::MetadataNotFound {
        package: spec.to_string(),
        reason,
    };

    let value: Value = serde_json::from_str(stdout.trim()).map_err(|e| not_found(e.to_string()))?;

    let document = match value {
        Value::Array(mut items) => items
            .pop()
            .ok_or_else(|| not_found("empty response".to_string()))?,
        other => other,
    };

    serde_json::from_value(document).map_err(|e| not_found(e.to_string()))
}

/// Turns `yarn why --json` output (one JSON document per line) into text.
///
/// Yarn classic prints typed events and puts the reasons in a `list` event.
/// Yarn berry prints one `{value, children}` tree per dependent package;
/// every root-to-leaf path becomes one `a => b => c` line.
pub fn parse_yarn_why(name: &str, stdout: &str) -> Result<String> {
    let unusable = |reason: String| DepdiceError::UsageOutput {
        package: name.to_string(),
        reason,
    };

    let mut lines = Vec::new();

    for line in stdout.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let value: Value = serde_json::from_str(line).map_err(|e| unusable(e.to_string()))?;
        lines.push(value);
    }

    if lines.is_empty() {
        return Err(unusable("no output".to_string()));
    }

    if lines.iter().any(|line| line.get("type").is_some()) {
        return classic_reasons(name, &lines)
            .ok_or_else(|| unusable("list entry has no items".to_string()));
    }

    let mut paths = Vec::new();
    for line in &lines {
        if let Some(root) = line.get("value").and_then(Value::as_str) {
            collect_berry_paths(vec![root.to_string()], line.get("children"), &mut paths);
        }
    }

    if paths.is_empty() {
        return Err(unusable("no dependency paths in output".to_string()));
    }

    Ok(paths.join("\n"))
}

fn classic_reasons(name: &str, lines: &[Value]) -> Option<String> {
    let list = lines
        .iter()
        .find(|line| line.get("type").and_then(Value::as_str) == Some("list"));

    let Some(list) = list else {
        return Some(format!("{} is a direct dependency of the project.", name));
    };

    let items = list.pointer("/data/items").and_then(Value::as_array)?;

    let reasons: Vec<String> = items
        .iter()
        .filter_map(Value::as_str)
        .map(|item| item.replace('"', "").replace('#', " => "))
        .collect();

    Some(reasons.join("\n"))
}

fn collect_berry_paths(trail: Vec<String>, children: Option<&Value>, paths: &mut Vec<String>) {
    let children = match children {
        Some(Value::Object(children)) if !children.is_empty() => children,
        _ => {
            if trail.len() > 1 {
                paths.push(trail.join(" => "));
            }
            return;
        }
    };

    for (locator, child) in children {
        let mut next = trail.clone();
        next.push(locator.clone());
        collect_berry_paths(next, child.get("children"), paths);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_array_uses_last_document() {
        let stdout = r#"[{"name":"ms","version":"2.0.0"},{"name":"ms","version":"2.1.3","description":"tiny"}]"#;
        let details = parse_view("ms@2", stdout).unwrap();
        assert_eq!(details.description.as_deref(), Some("tiny"));
    }

    #[test]
    fn unparsable_view_is_not_found() {
        let err = parse_view("ghost@1.0.0", "").unwrap_err();
        assert!(matches!(err, DepdiceError::MetadataNotFound { .. }));

        let err = parse_view("ghost@1.0.0", "[]").unwrap_err();
        assert!(matches!(err, DepdiceError::MetadataNotFound { .. }));
    }

    #[test]
    fn yarn_why_lists_reasons() {
        let stdout = concat!(
            r#"{"type":"step","data":{"message":"Why do we have the module \"ms\"...?","current":1,"total":4}}"#,
            "\n",
            r#"{"type":"info","data":"\r=> Found \"debug#ms@2.1.3\""}"#,
            "\n",
            r#"{"type":"list","data":{"type":"reasons","items":["This module exists because \"debug\" depends on it.","Hoisted from \"debug#ms\""]}}"#,
            "\n"
        );

        assert_eq!(
            parse_yarn_why("ms", stdout).unwrap(),
            "This module exists because debug depends on it.\nHoisted from debug => ms"
        );
    }

    #[test]
    fn yarn_why_without_list_is_direct() {
        let stdout = r#"{"type":"info","data":"Has been hoisted to \"left-pad\""}"#;
        assert_eq!(
            parse_yarn_why("left-pad", stdout).unwrap(),
            "left-pad is a direct dependency of the project."
        );
    }

    #[test]
    fn yarn_why_renders_berry_paths() {
        let stdout = concat!(
            r#"{"value":"my-app@workspace:.","children":{"debug@npm:4.3.4":{"value":{"locator":"debug@npm:4.3.4","descriptor":"debug@npm:^4.3.4"},"children":{"ms@npm:2.1.2":{"value":{"locator":"ms@npm:2.1.2","descriptor":"ms@npm:2.1.2"},"children":{}}}}}}"#,
            "\n",
            r#"{"value":"send@npm:0.18.0","children":{"ms@npm:2.1.3":{"descriptor":"ms@npm:2.1.3","locator":"ms@npm:2.1.3"}}}"#,
            "\n"
        );

        assert_eq!(
            parse_yarn_why("ms", stdout).unwrap(),
            "my-app@workspace:. => debug@npm:4.3.4 => ms@npm:2.1.2\nsend@npm:0.18.0 => ms@npm:2.1.3"
        );
    }

    #[test]
    fn yarn_why_without_paths_is_unusable() {
        let err = parse_yarn_why("ms", "").unwrap_err();
        assert!(matches!(err, DepdiceError::UsageOutput { .. }));

        let err = parse_yarn_why("ms", r#"{"value":"my-app@workspace:.","children":{}}"#).unwrap_err();
        assert!(matches!(err, DepdiceError::UsageOutput { .. }));
    }

    #[test]
    fn yarn_why_rejects_garbage() {
        let err = parse_yarn_why("left-pad", "warning: something\n").unwrap_err();
        assert!(matches!(err, DepdiceError::UsageOutput { .. }));
    }

    #[tokio::test]
    async fn missing_binary_fails_to_spawn() {
        let command = Command::new("depdice-definitely-not-a-real-binary");
        let err = run_command(command, "ghost", Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, DepdiceError::CommandSpawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn slow_commands_time_out() {
        let mut command = Command::new("sleep");
        command.arg("5");
        let err = run_command(command, "sleep 5", Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(matches!(err, DepdiceError::CommandTimeout { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn nonzero_exit_is_a_failure() {
        let mut command = Command::new("sh");
        command.arg("-c").arg("echo oops >&2; exit 3");
        let err = run_command(command, "sh", Duration::from_secs(5))
            .await
            .unwrap_err();

        match err {
            DepdiceError::CommandFailed { code, stderr, .. } => {
                assert_eq!(code, 3);
                assert_eq!(stderr, "oops");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
