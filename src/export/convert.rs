//! Pure projections from cluster objects to export records.
//!
//! No I/O happens here. Every optional field on the source object is
//! defaulted to the kind's zero value, so a half-populated object coming
//! back from the API server can never produce a null in the export.

use std::collections::BTreeMap;

use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, StatefulSet};
use k8s_openapi::api::batch::v1::CronJob;
use k8s_openapi::api::core::v1::{Pod, PodTemplateSpec, Service};
use k8s_openapi::api::networking::v1::{Ingress, IngressBackend, NetworkPolicy};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

use crate::export::data::{
    ContainerRecord, ContainerStatusRecord, CronJobRecord, DaemonSetRecord, DeploymentRecord,
    IngressBackendRecord, IngressPathRecord, IngressRecord, IngressRuleRecord, IngressTlsRecord,
    JobTemplateRecord, NetworkPolicyRecord, PodRecord, PodTemplateRecord, ServicePortRecord,
    ServiceRecord, StatefulSetRecord,
};

fn meta_name(meta: &ObjectMeta) -> String {
    meta.name.clone().unwrap_or_else(|| "unknown".to_string())
}

fn meta_labels(meta: &ObjectMeta) -> BTreeMap<String, String> {
    meta.labels.clone().unwrap_or_default()
}

fn match_labels(selector: &LabelSelector) -> BTreeMap<String, String> {
    selector.match_labels.clone().unwrap_or_default()
}

fn int_or_string(value: &IntOrString) -> String {
    match value {
        IntOrString::Int(i) => i.to_string(),
        IntOrString::String(s) => s.clone(),
    }
}

fn pod_template(template: &PodTemplateSpec) -> PodTemplateRecord {
    let labels = template
        .metadata
        .as_ref()
        .map_or_else(BTreeMap::new, meta_labels);

    let containers = template.spec.as_ref().map_or_else(Vec::new, |spec| {
        spec.containers
            .iter()
            .map(|c| ContainerRecord {
                name: c.name.clone(),
                image: c.image.clone(),
            })
            .collect()
    });

    PodTemplateRecord { labels, containers }
}

fn ingress_backend(backend: &IngressBackend) -> IngressBackendRecord {
    backend
        .service
        .as_ref()
        .map_or_else(IngressBackendRecord::default, |service| {
            IngressBackendRecord {
                service_name: Some(service.name.clone()),
                service_port: service.port.as_ref().and_then(|port| {
                    port.number
                        .map(|n| n.to_string())
                        .or_else(|| port.name.clone())
                }),
            }
        })
}

#[must_use]
pub fn pod(pod: Pod) -> PodRecord {
    let phase = pod
        .status
        .as_ref()
        .and_then(|status| status.phase.clone())
        .unwrap_or_else(|| "Unknown".to_string());

    let container_statuses = pod
        .status
        .as_ref()
        .and_then(|status| status.container_statuses.clone())
        .unwrap_or_default()
        .into_iter()
        .map(|cs| ContainerStatusRecord {
            name: cs.name,
            ready: cs.ready,
            restart_count: cs.restart_count,
            image: cs.image,
        })
        .collect();

    PodRecord {
        name: meta_name(&pod.metadata),
        labels: meta_labels(&pod.metadata),
        phase,
        container_statuses,
    }
}

#[must_use]
pub fn service(service: Service) -> ServiceRecord {
    let spec = service.spec.unwrap_or_default();

    let ports = spec
        .ports
        .unwrap_or_default()
        .into_iter()
        .map(|p| ServicePortRecord {
            name: p.name,
            port: p.port,
            protocol: p.protocol,
            target_port: p.target_port.as_ref().map(int_or_string),
        })
        .collect();

    ServiceRecord {
        name: meta_name(&service.metadata),
        labels: meta_labels(&service.metadata),
        type_: spec.type_.unwrap_or_else(|| "ClusterIP".to_string()),
        cluster_ip: spec.cluster_ip,
        ports,
        selector: spec.selector.unwrap_or_default(),
    }
}

#[must_use]
pub fn deployment(deployment: Deployment) -> DeploymentRecord {
    let status = deployment.status.unwrap_or_default();

    let (replicas, selector, strategy) = deployment.spec.map_or_else(
        || (0, BTreeMap::new(), None),
        |spec| {
            (
                spec.replicas.unwrap_or(0),
                match_labels(&spec.selector),
                spec.strategy.and_then(|s| s.type_),
            )
        },
    );

    DeploymentRecord {
        name: meta_name(&deployment.metadata),
        labels: meta_labels(&deployment.metadata),
        replicas,
        ready_replicas: status.ready_replicas.unwrap_or(0),
        available_replicas: status.available_replicas.unwrap_or(0),
        selector,
        strategy,
    }
}

#[must_use]
pub fn daemon_set(daemon_set: DaemonSet) -> DaemonSetRecord {
    let status = daemon_set.status.unwrap_or_default();

    let (selector, template) = daemon_set.spec.as_ref().map_or_else(
        || (BTreeMap::new(), PodTemplateRecord::default()),
        |spec| (match_labels(&spec.selector), pod_template(&spec.template)),
    );

    DaemonSetRecord {
        name: meta_name(&daemon_set.metadata),
        labels: meta_labels(&daemon_set.metadata),
        selector,
        template,
        desired_number_scheduled: status.desired_number_scheduled,
        number_ready: status.number_ready,
    }
}

#[must_use]
pub fn stateful_set(stateful_set: StatefulSet) -> StatefulSetRecord {
    let status = stateful_set.status.unwrap_or_default();

    let (selector, replicas, template) = stateful_set.spec.as_ref().map_or_else(
        || (BTreeMap::new(), 0, PodTemplateRecord::default()),
        |spec| {
            (
                match_labels(&spec.selector),
                spec.replicas.unwrap_or(0),
                pod_template(&spec.template),
            )
        },
    );

    StatefulSetRecord {
        name: meta_name(&stateful_set.metadata),
        labels: meta_labels(&stateful_set.metadata),
        selector,
        replicas,
        ready_replicas: status.ready_replicas.unwrap_or(0),
        template,
    }
}

#[must_use]
pub fn cron_job(cron_job: CronJob) -> CronJobRecord {
    let last_schedule_time = cron_job
        .status
        .as_ref()
        .and_then(|status| status.last_schedule_time.as_ref())
        .map(|t| t.0);

    let (schedule, suspend, job_template) = cron_job.spec.map_or_else(
        || (String::new(), false, JobTemplateRecord::default()),
        |spec| {
            let job_template = JobTemplateRecord {
                labels: spec
                    .job_template
                    .metadata
                    .as_ref()
                    .map_or_else(BTreeMap::new, meta_labels),
                template: spec
                    .job_template
                    .spec
                    .as_ref()
                    .map_or_else(PodTemplateRecord::default, |job_spec| {
                        pod_template(&job_spec.template)
                    }),
            };
            (spec.schedule, spec.suspend.unwrap_or(false), job_template)
        },
    );

    CronJobRecord {
        name: meta_name(&cron_job.metadata),
        labels: meta_labels(&cron_job.metadata),
        schedule,
        suspend,
        last_schedule_time,
        job_template,
    }
}

#[must_use]
pub fn ingress(ingress: Ingress) -> IngressRecord {
    let spec = ingress.spec.unwrap_or_default();

    let rules = spec
        .rules
        .unwrap_or_default()
        .iter()
        .map(|rule| IngressRuleRecord {
            host: rule.host.clone(),
            paths: rule.http.as_ref().map_or_else(Vec::new, |http| {
                http.paths
                    .iter()
                    .map(|p| {
                        let backend = ingress_backend(&p.backend);
                        IngressPathRecord {
                            path: p.path.clone(),
                            path_type: p.path_type.clone(),
                            service_name: backend.service_name,
                            service_port: backend.service_port,
                        }
                    })
                    .collect()
            }),
        })
        .collect();

    let tls = spec
        .tls
        .unwrap_or_default()
        .into_iter()
        .map(|t| IngressTlsRecord {
            hosts: t.hosts.unwrap_or_default(),
            secret_name: t.secret_name,
        })
        .collect();

    IngressRecord {
        name: meta_name(&ingress.metadata),
        labels: meta_labels(&ingress.metadata),
        ingress_class_name: spec.ingress_class_name,
        default_backend: spec.default_backend.as_ref().map(ingress_backend),
        rules,
        tls,
    }
}

#[must_use]
pub fn network_policy(network_policy: NetworkPolicy) -> NetworkPolicyRecord {
    let (pod_selector, policy_types) = network_policy.spec.map_or_else(
        || (BTreeMap::new(), Vec::new()),
        |spec| {
            (
                spec.pod_selector.as_ref().map(match_labels).unwrap_or_default(),
                spec.policy_types.unwrap_or_default(),
            )
        },
    );

    NetworkPolicyRecord {
        name: meta_name(&network_policy.metadata),
        labels: meta_labels(&network_policy.metadata),
        pod_selector,
        policy_types,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::apps::v1::DaemonSetSpec;
    use k8s_openapi::api::core::v1::{ContainerStatus, PodStatus, ServicePort, ServiceSpec};

    fn meta(name: &str) -> ObjectMeta {
        ObjectMeta {
            name: Some(name.to_string()),
            ..ObjectMeta::default()
        }
    }

    #[test]
    fn test_pod_defaults_phase_and_statuses() {
        let record = pod(Pod {
            metadata: meta("web-0"),
            ..Pod::default()
        });
        assert_eq!(record.name, "web-0");
        assert_eq!(record.phase, "Unknown");
        assert!(record.labels.is_empty());
        assert!(record.container_statuses.is_empty());
    }

    #[test]
    fn test_pod_projects_container_statuses() {
        let record = pod(Pod {
            metadata: meta("web-0"),
            status: Some(PodStatus {
                phase: Some("Running".to_string()),
                container_statuses: Some(vec![ContainerStatus {
                    name: "web".to_string(),
                    ready: true,
                    restart_count: 3,
                    image: "nginx:1.27".to_string(),
                    ..ContainerStatus::default()
                }]),
                ..PodStatus::default()
            }),
            ..Pod::default()
        });
        assert_eq!(record.phase, "Running");
        assert_eq!(
            record.container_statuses,
            vec![ContainerStatusRecord {
                name: "web".to_string(),
                ready: true,
                restart_count: 3,
                image: "nginx:1.27".to_string(),
            }]
        );
    }

    #[test]
    fn test_service_ports_and_target_port_forms() {
        let record = service(Service {
            metadata: meta("web"),
            spec: Some(ServiceSpec {
                type_: Some("NodePort".to_string()),
                ports: Some(vec![
                    ServicePort {
                        name: Some("http".to_string()),
                        port: 80,
                        target_port: Some(IntOrString::Int(8080)),
                        ..ServicePort::default()
                    },
                    ServicePort {
                        port: 443,
                        target_port: Some(IntOrString::String("https".to_string())),
                        ..ServicePort::default()
                    },
                ]),
                ..ServiceSpec::default()
            }),
            ..Service::default()
        });
        assert_eq!(record.type_, "NodePort");
        assert_eq!(record.ports[0].target_port.as_deref(), Some("8080"));
        assert_eq!(record.ports[1].target_port.as_deref(), Some("https"));
    }

    #[test]
    fn test_service_without_spec_defaults_to_cluster_ip_type() {
        let record = service(Service {
            metadata: meta("headless"),
            ..Service::default()
        });
        assert_eq!(record.type_, "ClusterIP");
        assert!(record.cluster_ip.is_none());
        assert!(record.ports.is_empty());
        assert!(record.selector.is_empty());
    }

    // A daemon set with no explicit pod-template labels still exports an
    // empty label map, not a missing field.
    #[test]
    fn test_daemon_set_template_labels_default_to_empty_map() {
        let record = daemon_set(DaemonSet {
            metadata: meta("node-agent"),
            spec: Some(DaemonSetSpec::default()),
            ..DaemonSet::default()
        });
        assert!(record.template.labels.is_empty());
        let value = serde_json::to_value(&record).expect("serializable");
        assert!(value["template"]["labels"].is_object());
    }

    #[test]
    fn test_daemon_set_without_spec_defaults_everything() {
        let record = daemon_set(DaemonSet {
            metadata: meta("node-agent"),
            ..DaemonSet::default()
        });
        assert!(record.selector.is_empty());
        assert_eq!(record.template, PodTemplateRecord::default());
        assert_eq!(record.desired_number_scheduled, 0);
    }

    #[test]
    fn test_ingress_without_spec_has_empty_rules() {
        let record = ingress(Ingress {
            metadata: meta("web"),
            ..Ingress::default()
        });
        assert!(record.rules.is_empty());
        assert!(record.tls.is_empty());
        assert!(record.default_backend.is_none());
    }

    #[test]
    fn test_network_policy_without_spec_defaults() {
        let record = network_policy(NetworkPolicy {
            metadata: meta("deny-all"),
            ..NetworkPolicy::default()
        });
        assert!(record.pod_selector.is_empty());
        assert!(record.policy_types.is_empty());
    }

    #[test]
    fn test_missing_name_defaults_to_unknown() {
        let record = pod(Pod::default());
        assert_eq!(record.name, "unknown");
    }
}
