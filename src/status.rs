use k8s_openapi::api::batch::v1::{Job, JobCondition};
use k8s_openapi::api::core::v1::{
    ContainerStateTerminated, ContainerStateWaiting, ContainerStatus, PersistentVolume,
    PersistentVolumeClaim, Pod, PodCondition,
};

use crate::model::PodPhase;

pub const INIT_ERROR: &str = "Init:Error";
pub const TERMINATING: &str = "Terminating";

const TERMINAL_JOB_REASONS: [&str; 2] = ["BackoffLimitExceeded", "DeadlineExceeded"];

pub fn pod_phase(pod: &Pod) -> PodPhase {
    PodPhase::parse(
        pod.status
            .as_ref()
            .and_then(|status| status.phase.as_deref())
            .unwrap_or_default(),
    )
}

/// Display status for a pod, mirroring the STATUS column of `kubectl get pods`.
///
/// Container scans are first-match in API order. A terminated container with
/// no reason yields an empty string rather than a placeholder.
pub fn pod_status(pod: &Pod) -> String {
    let containers = container_statuses(pod);
    let phase = pod_phase(pod);
    let reason = match &phase {
        PodPhase::Succeeded => first_terminated(containers).map(terminated_reason),
        PodPhase::Failed => {
            if has_condition(pod_conditions(pod), "Initialized", "False") {
                Some(INIT_ERROR.to_string())
            } else {
                first_terminated(containers).map(terminated_reason)
            }
        }
        PodPhase::Running | PodPhase::Pending => first_waiting(containers).map(waiting_reason),
        PodPhase::Other(_) => pod
            .metadata
            .deletion_timestamp
            .is_some()
            .then(|| TERMINATING.to_string()),
    };

    reason.unwrap_or_else(|| phase.as_str().to_string())
}

/// Health verdict for a pod. Only `Succeeded`, `Pending` and `Running` can be
/// healthy; every other phase is reported.
pub fn is_pod_healthy(pod: &Pod) -> bool {
    let containers = container_statuses(pod);
    match pod_phase(pod) {
        PodPhase::Succeeded => !containers
            .iter()
            .filter_map(terminated_state)
            .any(|terminated| terminated.exit_code != 0),
        PodPhase::Pending => first_waiting(containers).is_none(),
        PodPhase::Running => {
            !pod_conditions(pod)
                .iter()
                .any(|condition| condition.status == "False")
                && first_waiting(containers).is_none()
        }
        PodPhase::Failed | PodPhase::Other(_) => false,
    }
}

pub fn is_pod_ready(pod: &Pod) -> bool {
    has_condition(pod_conditions(pod), "Ready", "True")
}

pub fn unscheduled_conditions(pod: &Pod) -> impl Iterator<Item = &PodCondition> {
    pod_conditions(pod)
        .iter()
        .filter(|condition| condition.type_ == "PodScheduled" && condition.status == "False")
}

pub fn failed_job_conditions(job: &Job) -> Vec<&JobCondition> {
    let restart_policy = job
        .spec
        .as_ref()
        .and_then(|spec| spec.template.spec.as_ref())
        .and_then(|spec| spec.restart_policy.as_deref());
    if restart_policy != Some("Never") {
        return Vec::new();
    }

    job.status
        .as_ref()
        .and_then(|status| status.conditions.as_deref())
        .unwrap_or(&[])
        .iter()
        .filter(|condition| {
            condition
                .reason
                .as_deref()
                .is_some_and(|reason| TERMINAL_JOB_REASONS.contains(&reason))
        })
        .collect()
}

pub fn is_pvc_pending(pvc: &PersistentVolumeClaim) -> bool {
    pvc.status
        .as_ref()
        .and_then(|status| status.phase.as_deref())
        == Some("Pending")
}

pub fn is_pv_unclaimed(pv: &PersistentVolume) -> bool {
    pv.status
        .as_ref()
        .and_then(|status| status.phase.as_deref())
        == Some("Available")
}

fn pod_conditions(pod: &Pod) -> &[PodCondition] {
    pod.status
        .as_ref()
        .and_then(|status| status.conditions.as_deref())
        .unwrap_or(&[])
}

fn container_statuses(pod: &Pod) -> &[ContainerStatus] {
    pod.status
        .as_ref()
        .and_then(|status| status.container_statuses.as_deref())
        .unwrap_or(&[])
}

fn has_condition(conditions: &[PodCondition], type_: &str, status: &str) -> bool {
    conditions
        .iter()
        .any(|condition| condition.type_ == type_ && condition.status == status)
}

fn terminated_state(container: &ContainerStatus) -> Option<&ContainerStateTerminated> {
    container
        .state
        .as_ref()
        .and_then(|state| state.terminated.as_ref())
}

fn waiting_state(container: &ContainerStatus) -> Option<&ContainerStateWaiting> {
    container
        .state
        .as_ref()
        .and_then(|state| state.waiting.as_ref())
}

fn first_terminated(containers: &[ContainerStatus]) -> Option<&ContainerStateTerminated> {
    containers.iter().find_map(terminated_state)
}

fn first_waiting(containers: &[ContainerStatus]) -> Option<&ContainerStateWaiting> {
    containers.iter().find_map(waiting_state)
}

fn terminated_reason(terminated: &ContainerStateTerminated) -> String {
    terminated.reason.clone().unwrap_or_default()
}

fn waiting_reason(waiting: &ContainerStateWaiting) -> String {
    waiting.reason.clone().unwrap_or_default()
}
