use k8s_openapi::api::batch::v1::Job;
use k8s_openapi::api::core::v1::{
    Endpoints, PersistentVolume, PersistentVolumeClaim, Pod, Service,
};
use k8s_openapi::api::networking::v1::Ingress;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

fn resource<T: DeserializeOwned>(api_version: &str, kind: &str, mut body: Value) -> T {
    body["apiVersion"] = json!(api_version);
    body["kind"] = json!(kind);
    serde_json::from_value(body).unwrap_or_else(|error| panic!("invalid {kind} fixture: {error}"))
}

pub fn pod(body: Value) -> Pod {
    resource("v1", "Pod", body)
}

pub fn job(body: Value) -> Job {
    resource("batch/v1", "Job", body)
}

pub fn pvc(body: Value) -> PersistentVolumeClaim {
    resource("v1", "PersistentVolumeClaim", body)
}

pub fn pv(body: Value) -> PersistentVolume {
    resource("v1", "PersistentVolume", body)
}

pub fn service(namespace: &str, name: &str) -> Service {
    resource(
        "v1",
        "Service",
        json!({ "metadata": { "name": name, "namespace": namespace } }),
    )
}

pub fn endpoints(namespace: &str, name: &str, subsets: Value) -> Endpoints {
    resource(
        "v1",
        "Endpoints",
        json!({ "metadata": { "name": name, "namespace": namespace }, "subsets": subsets }),
    )
}

pub fn ingress(namespace: &str, name: &str, rules: Value) -> Ingress {
    resource(
        "networking.k8s.io/v1",
        "Ingress",
        json!({
            "metadata": { "name": name, "namespace": namespace },
            "spec": { "rules": rules },
        }),
    )
}

pub fn container_status(name: &str, state: Value) -> Value {
    json!({
        "name": name,
        "image": "busybox",
        "imageID": "",
        "ready": false,
        "restartCount": 0,
        "state": state,
    })
}

pub fn condition(type_: &str, status: &str) -> Value {
    json!({ "type": type_, "status": status })
}

pub fn pod_with(phase: &str, conditions: Value, containers: Value) -> Pod {
    pod(json!({
        "metadata": { "name": "tester", "namespace": "default" },
        "status": {
            "phase": phase,
            "conditions": conditions,
            "containerStatuses": containers,
        },
    }))
}
