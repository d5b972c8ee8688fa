//! Namespace resource aggregator.
//!
//! One `snapshot` call walks every non-excluded namespace and lists the
//! eight exported resource kinds. Only the namespace listing itself is
//! fatal; a failed per-kind listing is logged at warning level and exported
//! as an empty section, so a broken RBAC rule or missing API group for one
//! kind never hides the rest of the cluster from the CMDB.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use futures::join;
use tracing::{debug, error, warn};

use crate::error::Result;
use crate::export::data::{NamespaceRecord, Snapshot};
use crate::k8s::resources::{ClusterResources, NamespaceMeta};

/// Stateless per-call aggregator over an injected cluster client.
pub struct Aggregator {
    resources: Arc<dyn ClusterResources>,
}

/// Reduce one per-kind listing outcome into its export section, emitting
/// the warning for the failed case. Failed kinds export as empty, never
/// null, and are attempted exactly once per snapshot.
fn reduce_kind<T>(outcome: Result<Vec<T>>, kind: &str, namespace: &str) -> Vec<T> {
    match outcome {
        Ok(items) => items,
        Err(err) => {
            warn!(
                kind,
                namespace,
                error = %err,
                "listing failed, exporting empty section"
            );
            Vec::new()
        }
    }
}

impl Aggregator {
    #[must_use]
    pub fn new(resources: Arc<dyn ClusterResources>) -> Self {
        Self { resources }
    }

    /// Produce one consistent snapshot of the cluster inventory.
    ///
    /// Namespaces named in `excludes` are skipped entirely (exact match).
    /// Record order follows the namespace listing order. The capture
    /// timestamp is stamped once, after all namespaces are processed.
    ///
    /// # Errors
    ///
    /// Will return `Err` only if the namespace listing itself fails; there
    /// is no partial result without a namespace list.
    pub async fn snapshot(&self, excludes: &BTreeSet<String>) -> Result<Snapshot> {
        let namespaces = self.resources.list_namespaces().await.map_err(|e| {
            error!("failed to list namespaces: {e}");
            e
        })?;

        let mut records = Vec::with_capacity(namespaces.len());
        for ns in namespaces {
            if excludes.contains(&ns.name) {
                debug!(namespace = %ns.name, "skipping excluded namespace");
                continue;
            }
            records.push(self.namespace_record(ns).await);
        }

        Ok(Snapshot {
            namespaces: records,
            last_update: Utc::now(),
        })
    }

    /// List all eight kinds for one namespace concurrently and assemble the
    /// record from whatever succeeded.
    async fn namespace_record(&self, ns: NamespaceMeta) -> NamespaceRecord {
        let name = ns.name.as_str();
        let r = self.resources.as_ref();

        let (
            pods,
            services,
            deployments,
            daemon_sets,
            stateful_sets,
            cron_jobs,
            ingresses,
            network_policies,
        ) = join!(
            r.list_pods(name),
            r.list_services(name),
            r.list_deployments(name),
            r.list_daemon_sets(name),
            r.list_stateful_sets(name),
            r.list_cron_jobs(name),
            r.list_ingresses(name),
            r.list_network_policies(name),
        );

        NamespaceRecord {
            pods: reduce_kind(pods, "pods", name),
            services: reduce_kind(services, "services", name),
            deployments: reduce_kind(deployments, "deployments", name),
            daemon_sets: reduce_kind(daemon_sets, "daemon_sets", name),
            stateful_sets: reduce_kind(stateful_sets, "stateful_sets", name),
            cron_jobs: reduce_kind(cron_jobs, "cron_jobs", name),
            ingresses: reduce_kind(ingresses, "ingresses", name),
            network_policies: reduce_kind(network_policies, "network_policies", name),
            name: ns.name,
            labels: ns.labels,
        }
    }
}
