pub mod client;
pub mod resources;

/// Default user agent for `kubesnap` - automatically uses the package version
///
/// All cluster API calls go through `client::new(Some(USER_AGENT))` so the
/// exporter's list traffic is identifiable in API server audit logs.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
