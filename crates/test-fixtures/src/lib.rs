//! Test fixture loader for causa network fixtures, benchmarks, and integration scenarios.
//!
//! Fixtures live under `crates/test-fixtures/networks/` as JSON. Each one is a
//! [`NetworkFixture`]: a serialized Bayesian network plus the latent
//! confounders declared over it.

use std::path::PathBuf;

use causa_core::{BayesNet, BayesNetSpec};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Root directory of the test-fixtures folder.
fn fixtures_root() -> PathBuf {
    // Works from any crate in the workspace: walk up to find test-fixtures.
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);

    while !path.join("test-fixtures").join("networks").exists() {
        if !path.pop() {
            panic!(
                "Could not find test-fixtures directory from CARGO_MANIFEST_DIR={}",
                manifest_dir
            );
        }
    }
    path.join("test-fixtures")
}

/// A network fixture. `L` is the latent descriptor type of the caller;
/// `hidden` names variables of `network` that play the role of explicit
/// latent causes (used to compute ground-truth interventions).
#[derive(Debug, Clone, Deserialize)]
#[serde(bound = "L: DeserializeOwned")]
pub struct NetworkFixture<L = serde_json::Value> {
    pub description: String,
    pub network: BayesNetSpec,
    #[serde(default)]
    pub latents: Vec<L>,
    #[serde(default)]
    pub keep_arcs: bool,
    #[serde(default)]
    pub hidden: Vec<String>,
}

impl<L> NetworkFixture<L> {
    /// Build the fixture network, hidden variables included.
    ///
    /// # Panics
    /// Panics if the serialized network is invalid.
    pub fn bayes_net(&self) -> BayesNet {
        build(&self.network)
    }

    /// The network over the observed variables only: hidden variables and
    /// their arcs are dropped, and children of hidden variables keep a
    /// uniform CPT. Hidden variables must be listed last so the observed ids
    /// match [`NetworkFixture::bayes_net`].
    ///
    /// # Panics
    /// Panics if a hidden variable is listed before an observed one.
    pub fn observable_net(&self) -> BayesNet {
        if self.hidden.is_empty() {
            return self.bayes_net();
        }
        let is_hidden = |name: &str| self.hidden.iter().any(|h| h == name);
        let first_hidden = self
            .network
            .variables
            .iter()
            .position(|v| is_hidden(&v.name))
            .unwrap_or(self.network.variables.len());
        assert!(
            self.network.variables[first_hidden..].iter().all(|v| is_hidden(&v.name)),
            "hidden variables of {} must come last",
            self.network.name
        );

        let affected: Vec<&str> = self
            .network
            .arcs
            .iter()
            .filter(|(p, _)| is_hidden(p))
            .map(|(_, c)| c.as_str())
            .collect();
        let spec = BayesNetSpec {
            name: self.network.name.clone(),
            variables: self.network.variables[..first_hidden].to_vec(),
            arcs: self
                .network
                .arcs
                .iter()
                .filter(|(p, c)| !is_hidden(p) && !is_hidden(c))
                .cloned()
                .collect(),
            cpts: self
                .network
                .cpts
                .iter()
                .filter(|(name, _)| !is_hidden(name) && !affected.contains(&name.as_str()))
                .map(|(name, values)| (name.clone(), values.clone()))
                .collect(),
        };
        build(&spec)
    }
}

fn build(spec: &BayesNetSpec) -> BayesNet {
    spec.build()
        .unwrap_or_else(|e| panic!("Invalid fixture network {}: {}", spec.name, e))
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Load `networks/<name>.json`.
pub fn load_network<L: DeserializeOwned>(name: &str) -> NetworkFixture<L> {
    load_fixture(&format!("networks/{name}.json"))
}

/// Load a fixture file as raw JSON Value.
pub fn load_fixture_value(relative_path: &str) -> serde_json::Value {
    load_fixture(relative_path)
}

/// Check that a fixture file exists.
pub fn fixture_exists(relative_path: &str) -> bool {
    fixtures_root().join(relative_path).exists()
}

/// Get the absolute path to a fixture file.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

/// List all JSON files in a fixture subdirectory, sorted by name.
pub fn list_fixtures(subdir: &str) -> Vec<PathBuf> {
    let dir = fixtures_root().join(subdir);
    if !dir.exists() {
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)
        .unwrap_or_else(|e| panic!("Failed to read directory {}: {}", dir.display(), e))
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                Some(path)
            } else {
                None
            }
        })
        .collect();
    files.sort();
    files
}
