use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::diagnostics::Diagnostic;

const EXAMPLES: &str = "\
Examples:
  # List Pods that are in a pending state (waiting to be scheduled)
  kubectl janitor pods unscheduled

  # List Pods in an unhealthy state
  kubectl janitor pods unhealthy

  # List Pods that are running but not ready
  kubectl janitor pods unready

  # List the current statuses of the Pods and their respective count
  kubectl janitor pods status

  # List Jobs that have failed to run and have restartPolicy: Never
  kubectl janitor jobs failed

  # List PersistentVolumes that are available for claim
  kubectl janitor pvs unclaimed

  # List PersistentVolumeClaims in a pending state (unbound)
  kubectl janitor pvcs pending

  # List Services without Endpoints
  kubectl janitor svcs no-endpoints

  # List Ingresses pointing at missing Services
  kubectl janitor ings no-service";

#[derive(Debug, Clone, Parser)]
#[command(
    name = "kubectl-janitor",
    version,
    about = "Find objects in a problematic state in your Kubernetes cluster.",
    after_help = EXAMPLES
)]
pub struct CliArgs {
    /// Namespace to inspect
    #[arg(short, long, global = true)]
    pub namespace: Option<String>,

    /// Inspect all namespaces
    #[arg(short = 'A', long, global = true)]
    pub all_namespaces: bool,

    /// Don't print headers
    #[arg(long, global = true)]
    pub no_headers: bool,

    /// Path to the kubeconfig file to use
    #[arg(long, global = true)]
    pub kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use
    #[arg(long, global = true)]
    pub context: Option<String>,

    /// Kubeconfig cluster to use
    #[arg(long, global = true)]
    pub cluster: Option<String>,

    /// Kubeconfig user to use
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// tracing filter (for example: warn,debug,trace)
    #[arg(long, global = true)]
    pub log_filter: Option<String>,

    #[command(subcommand)]
    pub command: ResourceCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ResourceCommand {
    /// Find Pods in a problematic state
    Pods {
        #[command(subcommand)]
        command: PodsCommand,
    },
    /// Find Jobs in a problematic state
    Jobs {
        #[command(subcommand)]
        command: JobsCommand,
    },
    /// Find PersistentVolumeClaims in a problematic state
    Pvcs {
        #[command(subcommand)]
        command: PvcsCommand,
    },
    /// Find PersistentVolumes in a problematic state
    Pvs {
        #[command(subcommand)]
        command: PvsCommand,
    },
    /// Find Services in a problematic state
    Svcs {
        #[command(subcommand)]
        command: SvcsCommand,
    },
    /// Find Ingresses in a problematic state
    Ings {
        #[command(subcommand)]
        command: IngsCommand,
    },
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum PodsCommand {
    /// List Pods in an unhealthy state
    Unhealthy,
    /// List Pods that are currently running but not ready for some reason
    Unready,
    /// List the current statuses of the Pods and their respective count
    Status,
    /// List Pods that are in a pending state (waiting to be scheduled)
    Unscheduled,
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum JobsCommand {
    /// List Jobs that have failed to run and have restartPolicy: Never
    Failed,
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum PvcsCommand {
    /// List PersistentVolumeClaims in a pending state (unbound)
    Pending,
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum PvsCommand {
    /// List PersistentVolumes that are available for claim
    Unclaimed,
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum SvcsCommand {
    /// List Services without Endpoints
    NoEndpoints,
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum IngsCommand {
    /// List Ingresses whose rules point at missing Services
    NoService,
}

impl ResourceCommand {
    pub fn diagnostic(&self) -> Diagnostic {
        match self {
            Self::Pods { command } => match command {
                PodsCommand::Unhealthy => Diagnostic::UnhealthyPods,
                PodsCommand::Unready => Diagnostic::UnreadyPods,
                PodsCommand::Status => Diagnostic::PodStatuses,
                PodsCommand::Unscheduled => Diagnostic::UnscheduledPods,
            },
            Self::Jobs {
                command: JobsCommand::Failed,
            } => Diagnostic::FailedJobs,
            Self::Pvcs {
                command: PvcsCommand::Pending,
            } => Diagnostic::PendingClaims,
            Self::Pvs {
                command: PvsCommand::Unclaimed,
            } => Diagnostic::UnclaimedVolumes,
            Self::Svcs {
                command: SvcsCommand::NoEndpoints,
            } => Diagnostic::ServicesWithoutEndpoints,
            Self::Ings {
                command: IngsCommand::NoService,
            } => Diagnostic::IngressesWithoutService,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CliArgs;
    use crate::diagnostics::Diagnostic;
    use clap::Parser;
    use rstest::rstest;
    use std::path::PathBuf;

    #[rstest]
    #[case(&["pods", "unhealthy"], Diagnostic::UnhealthyPods)]
    #[case(&["pods", "unready"], Diagnostic::UnreadyPods)]
    #[case(&["pods", "status"], Diagnostic::PodStatuses)]
    #[case(&["pods", "unscheduled"], Diagnostic::UnscheduledPods)]
    #[case(&["jobs", "failed"], Diagnostic::FailedJobs)]
    #[case(&["pvcs", "pending"], Diagnostic::PendingClaims)]
    #[case(&["pvs", "unclaimed"], Diagnostic::UnclaimedVolumes)]
    #[case(&["svcs", "no-endpoints"], Diagnostic::ServicesWithoutEndpoints)]
    #[case(&["ings", "no-service"], Diagnostic::IngressesWithoutService)]
    fn subcommands_map_to_diagnostics(#[case] args: &[&str], #[case] expected: Diagnostic) {
        let argv = std::iter::once("kubectl-janitor").chain(args.iter().copied());
        let cli = CliArgs::try_parse_from(argv).unwrap();
        assert_eq!(cli.command.diagnostic(), expected);
    }

    #[test]
    fn global_flags_are_accepted_after_subcommand() {
        let cli = CliArgs::try_parse_from([
            "kubectl-janitor",
            "pods",
            "unhealthy",
            "-A",
            "--no-headers",
            "-n",
            "prod",
        ])
        .unwrap();
        assert!(cli.all_namespaces);
        assert!(cli.no_headers);
        assert_eq!(cli.namespace.as_deref(), Some("prod"));
    }

    #[test]
    fn cluster_selection_flags_are_global() {
        let cli = CliArgs::try_parse_from([
            "kubectl-janitor",
            "--kubeconfig",
            "/tmp/kubeconfig",
            "pvs",
            "unclaimed",
            "--context",
            "staging",
            "--cluster",
            "east",
            "--user",
            "admin",
        ])
        .unwrap();
        assert_eq!(cli.kubeconfig, Some(PathBuf::from("/tmp/kubeconfig")));
        assert_eq!(cli.context.as_deref(), Some("staging"));
        assert_eq!(cli.cluster.as_deref(), Some("east"));
        assert_eq!(cli.user.as_deref(), Some("admin"));
    }

    #[test]
    fn resource_group_requires_subcommand() {
        assert!(CliArgs::try_parse_from(["kubectl-janitor", "pods"]).is_err());
        assert!(CliArgs::try_parse_from(["kubectl-janitor", "svcs", "unknown"]).is_err());
    }
}
