// Client creation with custom user-agent support for kube 2.x
use crate::error::Result;
use hyper::http::{HeaderName, HeaderValue};
use kube::{Client, Config};

/// Create a new k8s client to interact with the k8s cluster api
///
/// `Config::infer()` covers both in-cluster service-account credentials and
/// a local kubeconfig, so the exporter runs unchanged inside and outside the
/// cluster.
///
/// # Errors
///
/// Will return `Err` if no cluster configuration can be inferred
pub async fn new(custom_user_agent: Option<&str>) -> Result<Client> {
    let mut config = Config::infer().await?;

    // Identify exporter traffic in API server logs. An invalid header value
    // falls back to the default user-agent rather than failing startup.
    if let Some(user_agent) = custom_user_agent {
        if let Ok(header_value) = HeaderValue::from_str(user_agent) {
            config
                .headers
                .push((HeaderName::from_static("user-agent"), header_value));
        }
    }

    let client = Client::try_from(config)?;

    Ok(client)
}
