use super::types::{PackageIdentity, PackageSet};
use serde_json::{Map, Value};

const NODE_MODULES: &str = "node_modules/";

/// Flattens a `package-lock.json` document into the set of installed packages.
///
/// Lockfiles that carry a nested `dependencies` tree (v1 and v2) are walked
/// recursively; the unnamed root never contributes an identity. Lockfiles
/// that only carry the flat `packages` map (v3) are read from that map.
pub fn extract_nested(root: &Value) -> PackageSet {
    let mut packages = PackageSet::new();

    match root.get("dependencies") {
        Some(Value::Object(deps)) => walk_dependencies(deps, &mut packages),
        Some(_) => {}
        None => {
            if let Some(Value::Object(entries)) = root.get("packages") {
                collect_package_entries(entries, &mut packages);
            }
        }
    }

    packages
}

fn walk_dependencies(deps: &Map<String, Value>, packages: &mut PackageSet) {
    for (name, node) in deps {
        if let Some(version) = node.get("version").and_then(Value::as_str) {
            packages.insert(PackageIdentity::new(name.as_str(), version));
        }

        // Anything other than a mapping makes this node a leaf.
        if let Some(Value::Object(children)) = node.get("dependencies") {
            walk_dependencies(children, packages);
        }
    }
}

fn collect_package_entries(entries: &Map<String, Value>, packages: &mut PackageSet) {
    for (key, entry) in entries {
        let Some(idx) = key.rfind(NODE_MODULES) else {
            continue;
        };

        let name = &key[idx + NODE_MODULES.len()..];
        if name.is_empty() {
            continue;
        }

        if entry.get("link").and_then(Value::as_bool).unwrap_or(false) {
            continue;
        }

        if let Some(version) = entry.get("version").and_then(Value::as_str) {
            packages.insert(PackageIdentity::new(name, version));
        }
    }
}
