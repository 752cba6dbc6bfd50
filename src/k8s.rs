use anyhow::{Context, Result};
use k8s_openapi::api::batch::v1::Job;
use k8s_openapi::api::core::v1::{
    Endpoints, PersistentVolume, PersistentVolumeClaim, Pod, Service,
};
use k8s_openapi::api::networking::v1::Ingress;
use k8s_openapi::{ClusterResourceScope, NamespaceResourceScope};
use kube::api::ListParams;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client, Config, Resource};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::path::PathBuf;
use tracing::debug;

use crate::diagnostics::{self, Diagnostic, RunContext};
use crate::model::{NamespaceScope, Report};

const PAGE_SIZE: u32 = 500;
const RUNNING_PODS: &str = "status.phase=Running";
const PENDING_PODS: &str = "status.phase=Pending";

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct KubeSelection {
    pub kubeconfig: Option<PathBuf>,
    pub context: Option<String>,
    pub cluster: Option<String>,
    pub user: Option<String>,
}

impl KubeSelection {
    fn options(&self) -> KubeConfigOptions {
        KubeConfigOptions {
            context: self.context.clone(),
            cluster: self.cluster.clone(),
            user: self.user.clone(),
        }
    }

    fn overrides_kubeconfig(&self) -> bool {
        self.context.is_some() || self.cluster.is_some() || self.user.is_some()
    }
}

#[derive(Clone)]
pub struct KubeGateway {
    client: Client,
    context: String,
    default_namespace: String,
}

impl KubeGateway {
    pub async fn connect(selection: &KubeSelection) -> Result<Self> {
        let kubeconfig = match &selection.kubeconfig {
            Some(path) => Some(
                Kubeconfig::read_from(path)
                    .with_context(|| format!("failed to read kubeconfig {}", path.display()))?,
            ),
            None => Kubeconfig::read().ok(),
        };

        let config = if let Some(kubeconfig_value) = kubeconfig.clone() {
            Config::from_custom_kubeconfig(kubeconfig_value, &selection.options())
                .await
                .context("failed to infer Kubernetes configuration")?
        } else {
            if selection.overrides_kubeconfig() {
                anyhow::bail!(
                    "kubeconfig not found; --context, --cluster and --user are unavailable"
                );
            }
            Config::infer()
                .await
                .context("failed to infer Kubernetes configuration")?
        };

        let default_namespace = config.default_namespace.clone();
        let client = Client::try_from(config).context("failed to initialize Kubernetes client")?;

        let active_context = selection
            .context
            .clone()
            .or_else(|| {
                kubeconfig
                    .as_ref()
                    .and_then(|cfg| cfg.current_context.clone())
            })
            .unwrap_or_else(|| "in-cluster".to_string());
        debug!(context = %active_context, namespace = %default_namespace, "connected");

        Ok(Self {
            client,
            context: active_context,
            default_namespace,
        })
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn default_namespace(&self) -> &str {
        &self.default_namespace
    }

    pub async fn report(&self, diagnostic: Diagnostic, ctx: &RunContext) -> Result<Report> {
        let scope = &ctx.scope;
        let report = match diagnostic {
            Diagnostic::UnhealthyPods => {
                let pods = self.list::<Pod>(scope, None).await?;
                diagnostics::unhealthy_pods(&pods, ctx)
            }
            Diagnostic::UnreadyPods => {
                let pods = self.list::<Pod>(scope, Some(RUNNING_PODS)).await?;
                diagnostics::unready_pods(&pods, ctx)
            }
            Diagnostic::UnscheduledPods => {
                let pods = self.list::<Pod>(scope, Some(PENDING_PODS)).await?;
                diagnostics::unscheduled_pods(&pods, ctx)
            }
            Diagnostic::PodStatuses => {
                let pods = self.list::<Pod>(scope, None).await?;
                diagnostics::pod_statuses(&pods, ctx)
            }
            Diagnostic::FailedJobs => {
                let jobs = self.list::<Job>(scope, None).await?;
                diagnostics::failed_jobs(&jobs, ctx)
            }
            Diagnostic::PendingClaims => {
                let claims = self.list::<PersistentVolumeClaim>(scope, None).await?;
                diagnostics::pending_claims(&claims, ctx)
            }
            Diagnostic::UnclaimedVolumes => {
                let volumes = self.list_cluster::<PersistentVolume>().await?;
                diagnostics::unclaimed_volumes(&volumes, ctx)
            }
            Diagnostic::ServicesWithoutEndpoints => {
                let services = self.list::<Service>(scope, None).await?;
                let endpoints = self.list::<Endpoints>(scope, None).await?;
                diagnostics::services_without_endpoints(&services, &endpoints, ctx)
            }
            Diagnostic::IngressesWithoutService => {
                let ingresses = self.list::<Ingress>(scope, None).await?;
                let services = self.list::<Service>(scope, None).await?;
                diagnostics::ingresses_without_service(&ingresses, &services, ctx)
            }
        };

        debug!(
            diagnostic = diagnostic.title(),
            rows = report.rows.len(),
            "report built"
        );
        Ok(report)
    }

    async fn list<K>(&self, scope: &NamespaceScope, field_selector: Option<&str>) -> Result<Vec<K>>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + Debug,
        K::DynamicType: Default,
    {
        let api: Api<K> = match scope {
            NamespaceScope::All => Api::all(self.client.clone()),
            NamespaceScope::Named(namespace) => Api::namespaced(self.client.clone(), namespace),
        };
        list_pages(&api, field_selector).await
    }

    async fn list_cluster<K>(&self) -> Result<Vec<K>>
    where
        K: Resource<Scope = ClusterResourceScope> + Clone + DeserializeOwned + Debug,
        K::DynamicType: Default,
    {
        let api: Api<K> = Api::all(self.client.clone());
        list_pages(&api, None).await
    }
}

async fn list_pages<K>(api: &Api<K>, field_selector: Option<&str>) -> Result<Vec<K>>
where
    K: Resource + Clone + DeserializeOwned + Debug,
    K::DynamicType: Default,
{
    let plural = K::plural(&K::DynamicType::default()).to_string();
    let mut items = Vec::new();
    let mut continue_token: Option<String> = None;

    loop {
        let mut params = list_params(field_selector);
        if let Some(token) = continue_token.as_deref() {
            params = params.continue_token(token);
        }

        let page = api
            .list(&params)
            .await
            .with_context(|| format!("failed to list {plural}"))?;
        items.extend(page.items);

        match page.metadata.continue_ {
            Some(token) if !token.is_empty() => continue_token = Some(token),
            _ => break,
        }
    }

    debug!(resource = %plural, count = items.len(), "listed");
    Ok(items)
}

fn list_params(field_selector: Option<&str>) -> ListParams {
    let params = ListParams::default().limit(PAGE_SIZE);
    match field_selector {
        Some(selector) => params.fields(selector),
        None => params,
    }
}

#[cfg(test)]
mod tests {
    use super::{KubeSelection, list_params};

    #[test]
    fn list_params_page_and_filter() {
        let params = list_params(Some("status.phase=Running"));
        assert_eq!(params.limit, Some(500));
        assert_eq!(params.field_selector.as_deref(), Some("status.phase=Running"));

        let params = list_params(None);
        assert_eq!(params.field_selector, None);
    }

    #[test]
    fn selection_threads_cluster_and_user_into_kubeconfig_options() {
        let selection = KubeSelection {
            kubeconfig: None,
            context: Some("staging".to_string()),
            cluster: Some("east".to_string()),
            user: Some("admin".to_string()),
        };
        let options = selection.options();
        assert_eq!(options.context.as_deref(), Some("staging"));
        assert_eq!(options.cluster.as_deref(), Some("east"));
        assert_eq!(options.user.as_deref(), Some("admin"));
        assert!(selection.overrides_kubeconfig());
    }

    #[test]
    fn default_selection_keeps_current_context() {
        let selection = KubeSelection::default();
        let options = selection.options();
        assert_eq!(options.context, None);
        assert_eq!(options.cluster, None);
        assert_eq!(options.user, None);
        assert!(!selection.overrides_kubeconfig());
    }
}
