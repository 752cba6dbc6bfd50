use k8s_openapi::api::core::v1::{Endpoints, Service};
use k8s_openapi::api::networking::v1::Ingress;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IngressPath<'a> {
    pub ingress: &'a Ingress,
    pub host: &'a str,
    pub path: &'a str,
    pub service: &'a str,
}

/// Hash join of `left` against `right` on name. Returns the left items whose
/// counterpart is missing, or present but rejected by `satisfies`, in left
/// order. Duplicate right-side names resolve to the last item.
pub fn unmatched<'l, 'r, L, R>(
    left: impl IntoIterator<Item = &'l L>,
    left_key: impl Fn(&'l L) -> &'l str,
    right: &'r [R],
    right_key: impl Fn(&'r R) -> &'r str,
    satisfies: impl Fn(&R) -> bool,
) -> Vec<&'l L>
where
    L: 'l,
{
    let right_by_name = right
        .iter()
        .map(|item| (right_key(item), item))
        .collect::<HashMap<_, _>>();

    left.into_iter()
        .filter(|item| {
            right_by_name
                .get(left_key(*item))
                .is_none_or(|matched| !satisfies(matched))
        })
        .collect()
}

pub fn services_without_endpoints<'a>(
    services: &'a [Service],
    endpoints: &[Endpoints],
) -> Vec<&'a Service> {
    unmatched(
        services,
        |service| object_name(&service.metadata),
        endpoints,
        |endpoints| object_name(&endpoints.metadata),
        has_subsets,
    )
}

pub fn ingress_paths_without_service<'a>(
    ingresses: &'a [Ingress],
    services: &[Service],
) -> Vec<IngressPath<'a>> {
    let paths = ingress_paths(ingresses);
    unmatched(
        &paths,
        |path| path.service,
        services,
        |service| object_name(&service.metadata),
        |_| true,
    )
    .into_iter()
    .copied()
    .collect()
}

// Rules without an http block and resource backends yield nothing.
pub fn ingress_paths(ingresses: &[Ingress]) -> Vec<IngressPath<'_>> {
    let mut paths = Vec::new();
    for ingress in ingresses {
        let rules = ingress
            .spec
            .as_ref()
            .and_then(|spec| spec.rules.as_deref())
            .unwrap_or(&[]);
        for rule in rules {
            let Some(http) = rule.http.as_ref() else {
                continue;
            };
            for path in &http.paths {
                let Some(service) = path.backend.service.as_ref() else {
                    continue;
                };
                paths.push(IngressPath {
                    ingress,
                    host: rule.host.as_deref().unwrap_or_default(),
                    path: path.path.as_deref().unwrap_or_default(),
                    service: &service.name,
                });
            }
        }
    }
    paths
}

fn has_subsets(endpoints: &Endpoints) -> bool {
    endpoints
        .subsets
        .as_ref()
        .is_some_and(|subsets| !subsets.is_empty())
}

fn object_name(metadata: &ObjectMeta) -> &str {
    metadata.name.as_deref().unwrap_or_default()
}
