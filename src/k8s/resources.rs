//! Cluster resource listing behind a trait seam.
//!
//! The aggregator only sees `ClusterResources`, so tests substitute a fake
//! client instead of a live cluster. The kube-backed implementation runs the
//! raw objects through the pure converters in [`crate::export::convert`]
//! before returning, keeping conversion out of the aggregation path.

use std::collections::BTreeMap;

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, StatefulSet};
use k8s_openapi::api::batch::v1::CronJob;
use k8s_openapi::api::core::v1::{Namespace, Pod, Service};
use k8s_openapi::api::networking::v1::{Ingress, NetworkPolicy};
use kube::api::ListParams;
use kube::{Api, Client};
use tracing::debug;

use crate::error::Result;
use crate::export::convert;
use crate::export::data::{
    CronJobRecord, DaemonSetRecord, DeploymentRecord, IngressRecord, NetworkPolicyRecord,
    PodRecord, ServiceRecord, StatefulSetRecord,
};

/// Name and labels of a namespace as returned by the cluster listing.
#[derive(Clone, Debug)]
pub struct NamespaceMeta {
    pub name: String,
    pub labels: BTreeMap<String, String>,
}

/// Read-only listing capabilities against the current cluster with ambient
/// credentials. All per-kind calls are scoped to one namespace.
#[async_trait]
pub trait ClusterResources: Send + Sync {
    async fn list_namespaces(&self) -> Result<Vec<NamespaceMeta>>;
    async fn list_pods(&self, namespace: &str) -> Result<Vec<PodRecord>>;
    async fn list_services(&self, namespace: &str) -> Result<Vec<ServiceRecord>>;
    async fn list_deployments(&self, namespace: &str) -> Result<Vec<DeploymentRecord>>;
    async fn list_daemon_sets(&self, namespace: &str) -> Result<Vec<DaemonSetRecord>>;
    async fn list_stateful_sets(&self, namespace: &str) -> Result<Vec<StatefulSetRecord>>;
    async fn list_cron_jobs(&self, namespace: &str) -> Result<Vec<CronJobRecord>>;
    async fn list_ingresses(&self, namespace: &str) -> Result<Vec<IngressRecord>>;
    async fn list_network_policies(&self, namespace: &str) -> Result<Vec<NetworkPolicyRecord>>;
}

/// `ClusterResources` backed by a live `kube::Client`.
///
/// The client is long-lived and safe for concurrent reuse; each listing is
/// a single `Api::namespaced(..).list(..)` call with default parameters.
pub struct KubeResources {
    client: Client,
}

impl KubeResources {
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }

    async fn list_kind<K>(&self, namespace: &str) -> Result<Vec<K>>
    where
        K: kube::Resource<Scope = k8s_openapi::NamespaceResourceScope>
            + Clone
            + std::fmt::Debug
            + serde::de::DeserializeOwned,
        K::DynamicType: Default,
    {
        let api: Api<K> = Api::namespaced(self.client.clone(), namespace);
        let list = api.list(&ListParams::default()).await?;
        Ok(list.items)
    }
}

#[async_trait]
impl ClusterResources for KubeResources {
    async fn list_namespaces(&self) -> Result<Vec<NamespaceMeta>> {
        // Namespaces are cluster-scoped, so we use Api::all
        let api: Api<Namespace> = Api::all(self.client.clone());
        let ns_list = api.list(&ListParams::default()).await?;
        debug!("listed {} namespaces", ns_list.items.len());

        Ok(ns_list
            .items
            .into_iter()
            .map(|ns| NamespaceMeta {
                name: ns.metadata.name.unwrap_or_else(|| "unknown".to_string()),
                labels: ns.metadata.labels.unwrap_or_default(),
            })
            .collect())
    }

    async fn list_pods(&self, namespace: &str) -> Result<Vec<PodRecord>> {
        let items = self.list_kind::<Pod>(namespace).await?;
        Ok(items.into_iter().map(convert::pod).collect())
    }

    async fn list_services(&self, namespace: &str) -> Result<Vec<ServiceRecord>> {
        let items = self.list_kind::<Service>(namespace).await?;
        Ok(items.into_iter().map(convert::service).collect())
    }

    async fn list_deployments(&self, namespace: &str) -> Result<Vec<DeploymentRecord>> {
        let items = self.list_kind::<Deployment>(namespace).await?;
        Ok(items.into_iter().map(convert::deployment).collect())
    }

    async fn list_daemon_sets(&self, namespace: &str) -> Result<Vec<DaemonSetRecord>> {
        let items = self.list_kind::<DaemonSet>(namespace).await?;
        Ok(items.into_iter().map(convert::daemon_set).collect())
    }

    async fn list_stateful_sets(&self, namespace: &str) -> Result<Vec<StatefulSetRecord>> {
        let items = self.list_kind::<StatefulSet>(namespace).await?;
        Ok(items.into_iter().map(convert::stateful_set).collect())
    }

    async fn list_cron_jobs(&self, namespace: &str) -> Result<Vec<CronJobRecord>> {
        let items = self.list_kind::<CronJob>(namespace).await?;
        Ok(items.into_iter().map(convert::cron_job).collect())
    }

    async fn list_ingresses(&self, namespace: &str) -> Result<Vec<IngressRecord>> {
        let items = self.list_kind::<Ingress>(namespace).await?;
        Ok(items.into_iter().map(convert::ingress).collect())
    }

    async fn list_network_policies(&self, namespace: &str) -> Result<Vec<NetworkPolicyRecord>> {
        let items = self.list_kind::<NetworkPolicy>(namespace).await?;
        Ok(items.into_iter().map(convert::network_policy).collect())
    }
}
