use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::CliArgs;
use crate::k8s::KubeSelection;

const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, Deserialize, Default, Eq, PartialEq)]
pub struct JanitorConfig {
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub kubeconfig: Option<PathBuf>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub cluster: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default, alias = "no-headers")]
    pub no_headers: bool,
    #[serde(default, alias = "log-filter")]
    pub log_filter: Option<String>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Settings {
    pub source: Option<String>,
    pub namespace: Option<String>,
    pub all_namespaces: bool,
    pub no_headers: bool,
    pub kube: KubeSelection,
    pub log_filter: String,
}

impl JanitorConfig {
    pub fn load() -> Result<(Self, Option<PathBuf>)> {
        let Some(path) = discover_config_path() else {
            return Ok((Self::default(), None));
        };
        let config = Self::load_from(&path)?;
        Ok((config, Some(path)))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("failed to parse config {}", path.display()))
    }

    fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn merge(self, args: &CliArgs, source: Option<&Path>) -> Settings {
        Settings {
            source: source.map(|path| path.display().to_string()),
            namespace: args
                .namespace
                .clone()
                .or(self.namespace)
                .filter(|namespace| !namespace.trim().is_empty()),
            all_namespaces: args.all_namespaces,
            no_headers: args.no_headers || self.no_headers,
            kube: KubeSelection {
                kubeconfig: args.kubeconfig.clone().or(self.kubeconfig),
                context: args.context.clone().or(self.context),
                cluster: args.cluster.clone().or(self.cluster),
                user: args.user.clone().or(self.user),
            },
            log_filter: args
                .log_filter
                .clone()
                .or(self.log_filter)
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }
}

fn discover_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("JANITOR_CONFIG")
        && !path.trim().is_empty()
    {
        return Some(PathBuf::from(path));
    }

    let cwd_candidates = [
        PathBuf::from("janitor.yaml"),
        PathBuf::from("janitor.yml"),
        PathBuf::from(".janitor.yaml"),
    ];
    for candidate in cwd_candidates {
        if candidate.exists() {
            return Some(candidate);
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        let user_candidates = [
            PathBuf::from(&home).join(".config/janitor/config.yaml"),
            PathBuf::from(&home).join(".config/janitor/config.yml"),
            PathBuf::from(&home).join(".janitor.yaml"),
        ];
        for candidate in user_candidates {
            if candidate.exists() {
                return Some(candidate);
            }
        }
    }

    None
}
