//! package-lock.json parser
//!
//! Lockfile v2/v3 list every installed package under `packages`, keyed by
//! install path (`node_modules/a/node_modules/@scope/b`). Lockfile v1 only
//! has the nested `dependencies` tree.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::parser::traits::{ParseError, Parser};
use crate::parser::types::Requirement;

const NODE_MODULES: &str = "node_modules/";

#[derive(Debug, Deserialize)]
struct PackageLock {
    packages: Option<IndexMap<String, LockedPackage>>,
    dependencies: Option<IndexMap<String, LegacyDependency>>,
}

#[derive(Debug, Deserialize)]
struct LockedPackage {
    version: Option<String>,
    #[serde(default)]
    link: bool,
}

#[derive(Debug, Deserialize)]
struct LegacyDependency {
    version: Option<String>,
    #[serde(default)]
    dependencies: IndexMap<String, LegacyDependency>,
}

/// Parser for package-lock.json files
#[derive(Default)]
pub struct PackageLockParser;

impl PackageLockParser {
    /// Package name of an install path: the part after the last `node_modules/`
    fn package_name(install_path: &str) -> Option<&str> {
        let (_, name) = install_path.rsplit_once(NODE_MODULES)?;
        (!name.is_empty()).then_some(name)
    }

    fn collect_legacy(
        dependencies: IndexMap<String, LegacyDependency>,
        results: &mut Vec<Requirement>,
    ) {
        for (name, dependency) in dependencies {
            if let Some(version) = dependency.version {
                results.push(Requirement::new(name, version));
            }
            Self::collect_legacy(dependency.dependencies, results);
        }
    }
}

impl Parser for PackageLockParser {
    fn parse(&self, content: &str) -> Result<Vec<Requirement>, ParseError> {
        let lock: PackageLock =
            serde_json::from_str(content).map_err(|e| ParseError::InvalidSyntax(e.to_string()))?;

        let mut found = Vec::new();
        match (lock.packages, lock.dependencies) {
            (Some(packages), _) => {
                for (install_path, package) in packages {
                    // the root project is keyed by ""; links point at workspace sources
                    if package.link {
                        continue;
                    }
                    let (Some(name), Some(version)) =
                        (Self::package_name(&install_path), package.version)
                    else {
                        continue;
                    };
                    found.push(Requirement::new(name, version));
                }
            }
            (None, Some(dependencies)) => Self::collect_legacy(dependencies, &mut found),
            (None, None) => {
                return Err(ParseError::ParseFailed(
                    "neither `packages` nor `dependencies` present".to_string(),
                ));
            }
        }

        let mut seen = HashSet::new();
        found.retain(|req| seen.insert((req.name.clone(), req.version.clone())));
        Ok(found)
    }
}
