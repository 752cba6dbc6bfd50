mod age;
mod cli;
mod config;
mod diagnostics;
mod k8s;
mod model;
mod relations;
mod render;
mod status;
#[cfg(test)]
mod test_utils;

use anyhow::{Context, Result};
use clap::Parser;
use cli::CliArgs;
use config::{JanitorConfig, Settings};
use diagnostics::RunContext;
use k8s::KubeGateway;
use model::{NamespaceScope, RenderOptions};
use std::io::{self, Write};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    let (config, source) = JanitorConfig::load()?;
    let settings = config.merge(&args, source.as_deref());
    init_tracing(&settings.log_filter)?;

    if let Some(source) = &settings.source {
        debug!(config = %source, "loaded defaults");
    }
    if settings.all_namespaces && settings.namespace.is_some() {
        warn!("both --all-namespaces and --namespace were provided, using all namespaces");
    }

    let diagnostic = args.command.diagnostic();
    let gateway = KubeGateway::connect(&settings.kube).await?;
    let scope = resolve_namespace_scope(&settings, gateway.default_namespace());
    debug!(context = gateway.context(), scope = %scope, diagnostic = diagnostic.title(), "running");

    let ctx = RunContext::new(scope.clone());
    let report = gateway
        .report(diagnostic, &ctx)
        .await
        .with_context(|| format!("failed to find {}", diagnostic.title()))?;

    let options = RenderOptions {
        scope,
        no_headers: settings.no_headers,
    };
    let output = render::render(&report, &options)?;

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(output.as_bytes())
        .context("failed to write report")?;
    stdout.flush().context("failed to write report")?;
    Ok(())
}

fn init_tracing(level_filter: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level_filter)
        .or_else(|_| EnvFilter::try_new("info"))
        .context("failed to initialize tracing filter")?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .with_writer(io::stderr)
        .try_init();

    Ok(())
}

fn resolve_namespace_scope(settings: &Settings, default_namespace: &str) -> NamespaceScope {
    if settings.all_namespaces {
        NamespaceScope::All
    } else if let Some(namespace) = &settings.namespace {
        NamespaceScope::Named(namespace.clone())
    } else {
        NamespaceScope::Named(default_namespace.to_string())
    }
}
