use k8s_openapi::api::batch::v1::Job;
use k8s_openapi::api::core::v1::{
    Endpoints, PersistentVolume, PersistentVolumeClaim, Pod, Service,
};
use k8s_openapi::api::networking::v1::Ingress;
use k8s_openapi::jiff::Timestamp;
use kube::ResourceExt;
use std::collections::BTreeMap;

use crate::age::human_age_at;
use crate::model::{NamespaceScope, PodPhase, Report};
use crate::relations;
use crate::status::{
    failed_job_conditions, is_pod_healthy, is_pod_ready, is_pv_unclaimed, is_pvc_pending,
    pod_phase, pod_status, unscheduled_conditions,
};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Diagnostic {
    UnhealthyPods,
    UnreadyPods,
    UnscheduledPods,
    PodStatuses,
    FailedJobs,
    PendingClaims,
    UnclaimedVolumes,
    ServicesWithoutEndpoints,
    IngressesWithoutService,
}

impl Diagnostic {
    pub fn title(self) -> &'static str {
        match self {
            Self::UnhealthyPods => "unhealthy pods",
            Self::UnreadyPods => "unready pods",
            Self::UnscheduledPods => "unscheduled pods",
            Self::PodStatuses => "pod statuses",
            Self::FailedJobs => "failed jobs",
            Self::PendingClaims => "pending persistent volume claims",
            Self::UnclaimedVolumes => "unclaimed persistent volumes",
            Self::ServicesWithoutEndpoints => "services without endpoints",
            Self::IngressesWithoutService => "ingresses without service",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunContext {
    pub scope: NamespaceScope,
    pub now: Timestamp,
}

impl RunContext {
    pub fn new(scope: NamespaceScope) -> Self {
        Self {
            scope,
            now: Timestamp::now(),
        }
    }
}

pub fn unhealthy_pods(pods: &[Pod], ctx: &RunContext) -> Report {
    let mut report = Report::new(&["NAME", "STATUS", "AGE"]);
    for pod in pods.iter().filter(|pod| !is_pod_healthy(pod)) {
        report.push_row(
            &ctx.scope,
            pod.namespace(),
            vec![
                pod.name_any(),
                pod_status(pod),
                human_age_at(pod.metadata.creation_timestamp.as_ref(), ctx.now),
            ],
        );
    }
    report
}

// Phase filters repeat the list call's field selector.
pub fn unready_pods(pods: &[Pod], ctx: &RunContext) -> Report {
    let mut report = Report::new(&["NAME", "STATUS", "AGE"]);
    for pod in pods
        .iter()
        .filter(|pod| pod_phase(pod) == PodPhase::Running && !is_pod_ready(pod))
    {
        report.push_row(
            &ctx.scope,
            pod.namespace(),
            vec![
                pod.name_any(),
                pod_status(pod),
                human_age_at(pod.metadata.creation_timestamp.as_ref(), ctx.now),
            ],
        );
    }
    report
}

pub fn unscheduled_pods(pods: &[Pod], ctx: &RunContext) -> Report {
    let mut report = Report::new(&["NAME", "REASON", "MESSAGE", "AGE"]);
    for pod in pods.iter().filter(|pod| pod_phase(pod) == PodPhase::Pending) {
        for condition in unscheduled_conditions(pod) {
            report.push_row(
                &ctx.scope,
                pod.namespace(),
                vec![
                    pod.name_any(),
                    condition.reason.clone().unwrap_or_default(),
                    condition.message.clone().unwrap_or_default(),
                    human_age_at(pod.metadata.creation_timestamp.as_ref(), ctx.now),
                ],
            );
        }
    }
    report
}

pub fn pod_statuses(pods: &[Pod], ctx: &RunContext) -> Report {
    let mut counts = BTreeMap::<(String, String), usize>::new();
    for pod in pods {
        let key = (pod.namespace().unwrap_or_default(), pod_status(pod));
        *counts.entry(key).or_default() += 1;
    }

    let mut report = Report::new(&["STATUS", "COUNT"]);
    for ((namespace, status), count) in counts {
        report.push_row(&ctx.scope, Some(namespace), vec![status, count.to_string()]);
    }
    report
}

pub fn failed_jobs(jobs: &[Job], ctx: &RunContext) -> Report {
    let mut report = Report::new(&["NAME", "REASON", "MESSAGE", "AGE"]);
    for job in jobs {
        for condition in failed_job_conditions(job) {
            report.push_row(
                &ctx.scope,
                job.namespace(),
                vec![
                    job.name_any(),
                    condition.reason.clone().unwrap_or_default(),
                    condition.message.clone().unwrap_or_default(),
                    human_age_at(job.metadata.creation_timestamp.as_ref(), ctx.now),
                ],
            );
        }
    }
    report
}

pub fn pending_claims(claims: &[PersistentVolumeClaim], ctx: &RunContext) -> Report {
    let mut report = Report::new(&["NAME", "AGE"]);
    for claim in claims.iter().filter(|claim| is_pvc_pending(claim)) {
        report.push_row(
            &ctx.scope,
            claim.namespace(),
            vec![
                claim.name_any(),
                human_age_at(claim.metadata.creation_timestamp.as_ref(), ctx.now),
            ],
        );
    }
    report
}

pub fn unclaimed_volumes(volumes: &[PersistentVolume], ctx: &RunContext) -> Report {
    let mut report = Report::new(&["NAME", "RECLAIM POLICY", "STORAGECLASS", "AGE"]);
    for volume in volumes.iter().filter(|volume| is_pv_unclaimed(volume)) {
        let spec = volume.spec.as_ref();
        report.push_row(
            &ctx.scope,
            volume.namespace(),
            vec![
                volume.name_any(),
                spec.and_then(|spec| spec.persistent_volume_reclaim_policy.clone())
                    .unwrap_or_default(),
                spec.and_then(|spec| spec.storage_class_name.clone())
                    .unwrap_or_default(),
                human_age_at(volume.metadata.creation_timestamp.as_ref(), ctx.now),
            ],
        );
    }
    report
}

pub fn services_without_endpoints(
    services: &[Service],
    endpoints: &[Endpoints],
    ctx: &RunContext,
) -> Report {
    let mut report = Report::new(&["NAME"]);
    for service in relations::services_without_endpoints(services, endpoints) {
        report.push_row(&ctx.scope, service.namespace(), vec![service.name_any()]);
    }
    report
}

pub fn ingresses_without_service(
    ingresses: &[Ingress],
    services: &[Service],
    ctx: &RunContext,
) -> Report {
    let mut report = Report::new(&["NAME", "HOST", "PATH"]);
    for path in relations::ingress_paths_without_service(ingresses, services) {
        report.push_row(
            &ctx.scope,
            path.ingress.namespace(),
            vec![
                path.ingress.name_any(),
                path.host.to_string(),
                path.path.to_string(),
            ],
        );
    }
    report
}
