use super::types::{PackageIdentity, PackageSet};
use std::collections::BTreeMap;

/// One entry of a `yarn.lock`, keyed by `<name>@<range>` in [`FlatLock`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlatEntry {
    pub version: Option<String>,
}

pub type FlatLock = BTreeMap<String, FlatEntry>;

/// A `<name>@<range>` lockfile key split into its parts.
///
/// Grammar:
///
/// ```text
/// key   := name "@" range
/// name  := "@" scope "/" ident | ident
/// range := one or more characters (may itself contain "@")
/// ```
///
/// The separator is the first `@` after the optional scope marker, so alias
/// ranges such as `npm:@scope/pkg@^1.0.0` stay in the range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LockKey<'a> {
    pub name: &'a str,
    pub range: &'a str,
}

pub fn parse_key(key: &str) -> Option<LockKey<'_>> {
    let key = key.trim();
    let scoped = key.starts_with('@');
    let offset = usize::from(scoped);

    let sep = key[offset..].find('@')? + offset;
    let name = &key[..sep];
    let range = &key[sep + 1..];

    if name.len() == offset || range.is_empty() {
        return None;
    }

    if scoped {
        let (scope, ident) = name[1..].split_once('/')?;
        if scope.is_empty() || ident.is_empty() {
            return None;
        }
    }

    Some(LockKey { name, range })
}

/// Turns a flat lockfile map into package identities, pairing each key's
/// name with the entry's resolved version. Malformed keys are skipped.
pub fn extract_flat(lock: &FlatLock) -> PackageSet {
    let mut packages = PackageSet::new();

    for (key, entry) in lock {
        let Some(parsed) = parse_key(key) else {
            continue;
        };

        // The project's own workspaces are not installed packages.
        if parsed.range.starts_with("workspace:") {
            continue;
        }

        if let Some(version) = entry.version.as_deref() {
            packages.insert(PackageIdentity::new(parsed.name, version));
        }
    }

    packages
}

pub fn is_berry(content: &str) -> bool {
    content
        .lines()
        .any(|line| line.starts_with("__metadata:") || line.starts_with("\"__metadata\":"))
}

/// Parses the yarn classic (v1) lockfile syntax.
pub fn parse_classic(content: &str) -> FlatLock {
    let mut lock = FlatLock::new();
    let mut current: Vec<String> = Vec::new();

    for raw in content.lines() {
        let line = raw.trim_end_matches('\r');
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if !line.starts_with([' ', '\t']) {
            let header = trimmed.strip_suffix(':').unwrap_or(trimmed);
            current = split_keys(header);
            for key in &current {
                lock.entry(key.clone()).or_default();
            }
            continue;
        }

        // Only direct fields of an entry; nested blocks sit deeper.
        let indent = line.len() - line.trim_start().len();
        if indent != 2 || current.is_empty() {
            continue;
        }

        let Some((field, value)) = trimmed.split_once(char::is_whitespace) else {
            continue;
        };

        if field.trim_end_matches(':') != "version" {
            continue;
        }

        let version = unquote(value.trim());
        for key in &current {
            if let Some(entry) = lock.get_mut(key) {
                entry.version = Some(version.to_string());
            }
        }
    }

    lock
}

/// Parses the YAML lockfile written by yarn berry (v2+).
pub fn parse_berry(content: &str) -> Result<FlatLock, serde_yaml::Error> {
    let raw: BTreeMap<String, serde_yaml::Value> = serde_yaml::from_str(content)?;
    let mut lock = FlatLock::new();

    for (header, value) in raw {
        if header == "__metadata" {
            continue;
        }

        let version = value
            .get("version")
            .and_then(|v| match v {
                serde_yaml::Value::String(s) => Some(s.clone()),
                serde_yaml::Value::Number(n) => Some(n.to_string()),
                _ => None,
            });

        for key in split_keys(&header) {
            lock.insert(
                key,
                FlatEntry {
                    version: version.clone(),
                },
            );
        }
    }

    Ok(lock)
}

fn split_keys(header: &str) -> Vec<String> {
    let mut keys = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for ch in header.chars() {
        match ch {
            '"' => quoted = !quoted,
            ',' if !quoted => {
                push_key(&mut keys, &current);
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    push_key(&mut keys, &current);
    keys
}

fn push_key(keys: &mut Vec<String>, raw: &str) {
    let key = raw.trim();
    if !key.is_empty() {
        keys.push(key.to_string());
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
