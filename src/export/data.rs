//! Export schema served to the inventory/CMDB tool.
//!
//! Every type here is a reduced, read-only projection of a cluster object.
//! Label maps always serialize as objects (empty when unset) and resource
//! sequences are always present (empty when the kind is absent or its
//! listing failed), so consumers never need null checks. Optional scalar
//! fields are omitted from the JSON instead of being emitted as null.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One point-in-time aggregated export of cluster inventory.
#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub namespaces: Vec<NamespaceRecord>,
    pub last_update: DateTime<Utc>,
}

/// One cluster namespace's inventory.
#[derive(Clone, Debug, Default, Serialize)]
pub struct NamespaceRecord {
    pub name: String,
    pub labels: BTreeMap<String, String>,
    pub pods: Vec<PodRecord>,
    pub services: Vec<ServiceRecord>,
    pub deployments: Vec<DeploymentRecord>,
    pub daemon_sets: Vec<DaemonSetRecord>,
    pub stateful_sets: Vec<StatefulSetRecord>,
    pub cron_jobs: Vec<CronJobRecord>,
    pub ingresses: Vec<IngressRecord>,
    pub network_policies: Vec<NetworkPolicyRecord>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PodRecord {
    pub name: String,
    pub labels: BTreeMap<String, String>,
    pub phase: String,
    pub container_statuses: Vec<ContainerStatusRecord>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ContainerStatusRecord {
    pub name: String,
    pub ready: bool,
    pub restart_count: i32,
    pub image: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ServiceRecord {
    pub name: String,
    pub labels: BTreeMap<String, String>,
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_ip: Option<String>,
    pub ports: Vec<ServicePortRecord>,
    pub selector: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ServicePortRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub port: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_port: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DeploymentRecord {
    pub name: String,
    pub labels: BTreeMap<String, String>,
    pub replicas: i32,
    pub ready_replicas: i32,
    pub available_replicas: i32,
    pub selector: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DaemonSetRecord {
    pub name: String,
    pub labels: BTreeMap<String, String>,
    pub selector: BTreeMap<String, String>,
    pub template: PodTemplateRecord,
    pub desired_number_scheduled: i32,
    pub number_ready: i32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct StatefulSetRecord {
    pub name: String,
    pub labels: BTreeMap<String, String>,
    pub selector: BTreeMap<String, String>,
    pub replicas: i32,
    pub ready_replicas: i32,
    pub template: PodTemplateRecord,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CronJobRecord {
    pub name: String,
    pub labels: BTreeMap<String, String>,
    pub schedule: String,
    pub suspend: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_schedule_time: Option<DateTime<Utc>>,
    pub job_template: JobTemplateRecord,
}

/// Reduced `JobTemplateSpec`: the job's labels plus its pod template.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct JobTemplateRecord {
    pub labels: BTreeMap<String, String>,
    pub template: PodTemplateRecord,
}

/// Reduced `PodTemplateSpec` as embedded in workload controllers.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PodTemplateRecord {
    pub labels: BTreeMap<String, String>,
    pub containers: Vec<ContainerRecord>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ContainerRecord {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct IngressRecord {
    pub name: String,
    pub labels: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingress_class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_backend: Option<IngressBackendRecord>,
    pub rules: Vec<IngressRuleRecord>,
    pub tls: Vec<IngressTlsRecord>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct IngressRuleRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    pub paths: Vec<IngressPathRecord>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct IngressPathRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub path_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_port: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct IngressBackendRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_port: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct IngressTlsRecord {
    pub hosts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_name: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct NetworkPolicyRecord {
    pub name: String,
    pub labels: BTreeMap<String, String>,
    pub pod_selector: BTreeMap<String, String>,
    pub policy_types: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_record_renames_type_and_omits_absent_cluster_ip() {
        let record = ServiceRecord {
            name: "web".to_string(),
            type_: "ClusterIP".to_string(),
            cluster_ip: None,
            ..ServiceRecord::default()
        };
        let value = serde_json::to_value(&record).expect("serializable");
        assert_eq!(value["type"], "ClusterIP");
        assert!(value.get("cluster_ip").is_none());
        assert!(value.get("type_").is_none());
    }

    #[test]
    fn test_empty_namespace_record_serializes_all_sequences() {
        let record = NamespaceRecord {
            name: "default".to_string(),
            ..NamespaceRecord::default()
        };
        let value = serde_json::to_value(&record).expect("serializable");
        for kind in [
            "pods",
            "services",
            "deployments",
            "daemon_sets",
            "stateful_sets",
            "cron_jobs",
            "ingresses",
            "network_policies",
        ] {
            let section = value
                .get(kind)
                .unwrap_or_else(|| panic!("missing {kind} section"));
            assert!(section.is_array(), "{kind} must be an array");
        }
        assert!(value["labels"].is_object());
    }

    #[test]
    fn test_snapshot_last_update_is_rfc3339() {
        let snapshot = Snapshot {
            namespaces: vec![],
            last_update: Utc::now(),
        };
        let value = serde_json::to_value(&snapshot).expect("serializable");
        let stamp = value["last_update"].as_str().expect("string timestamp");
        assert!(DateTime::parse_from_rfc3339(stamp).is_ok());
    }

    #[test]
    fn test_optional_port_fields_are_omitted_not_null() {
        let record = ServicePortRecord {
            name: None,
            port: 80,
            protocol: None,
            target_port: None,
        };
        let value = serde_json::to_value(&record).expect("serializable");
        assert_eq!(value.as_object().expect("object").len(), 1);
        assert_eq!(value["port"], 80);
    }
}
