//! MaxScale (k8s.mariadb.com/v1alpha1)
//!
//! MaxScale is a database proxy in front of a MariaDB replication or Galera
//! cluster. The spec describes the servers it routes to, the services and
//! listeners it exposes, the monitor tracking server state, and the pod
//! template it runs in.

use std::collections::{BTreeMap, HashSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::common::{
    Affinity, EnvFromSource, EnvVar, ImagePullPolicy, IntOrString, LocalObjectReference,
    MariaDbRef, Metadata, PersistentVolumeClaimSpec, PodDisruptionBudget, PodSecurityContext,
    Probe, ResourceRequirements, SecretKeySelector, SecurityContext, ServiceMonitor, Toleration,
    TopologySpreadConstraint, VolumeMount,
};
use crate::types::ManifestSpec;
use crate::validation::{Validate, Validator};

/// MaxScale router module.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Router {
    #[default]
    Readwritesplit,
    Readconnroute,
}

/// MaxScale monitor module.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MonitorModule {
    Mariadbmon,
    Galeramon,
}

/// Cooperative monitoring mode, used when running more than one MaxScale
/// replica.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CooperativeMonitoring {
    MajorityOfAll,
    MajorityOfRunning,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum UpdateStrategyType {
    RollingUpdate,
    OnDelete,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum ServiceType {
    ClusterIP,
    NodePort,
    LoadBalancer,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum ExternalTrafficPolicy {
    Cluster,
    Local,
}

/// A MariaDB server MaxScale routes to.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MaxScaleServer {
    /// Identifier of the server in MaxScale.
    #[schemars(length(min = 1))]
    pub name: String,

    /// Network address of the server.
    #[schemars(length(min = 1))]
    pub address: String,

    /// Port of the server. Defaults to 3306.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 0))]
    pub port: Option<i64>,

    /// Protocol to connect with the server. Defaults to MariaDBBackend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    /// Puts the server in maintenance mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance: Option<bool>,

    /// Extra server parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<BTreeMap<String, String>>,
}

impl Validate for MaxScaleServer {
    fn validate(&self, v: &mut Validator) {
        v.min_length("name", Some(self.name.as_str()), 1)
            .min_length("address", Some(self.address.as_str()), 1)
            .at_least("port", self.port, 0);
    }
}

/// Listener exposing a MaxScale service.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MaxScaleListener {
    /// Identifier of the listener. Defaults to the service name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Port to listen on.
    #[schemars(range(min = 0))]
    pub port: i64,

    /// Protocol of the listener. Defaults to MariaDBProtocol.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    /// Extra listener parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<BTreeMap<String, String>>,

    /// Disables the listener.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspend: Option<bool>,
}

impl Validate for MaxScaleListener {
    fn validate(&self, v: &mut Validator) {
        v.at_least("port", Some(self.port), 0);
    }
}

/// A MaxScale service: a router plus the listener clients connect to.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MaxScaleService {
    /// Identifier of the service.
    #[schemars(length(min = 1))]
    pub name: String,

    /// Router module used by the service.
    pub router: Router,

    pub listener: MaxScaleListener,

    /// Extra service parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<BTreeMap<String, String>>,

    /// Disables the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspend: Option<bool>,
}

impl Validate for MaxScaleService {
    fn validate(&self, v: &mut Validator) {
        v.min_length("name", Some(self.name.as_str()), 1)
            .field("listener", &self.listener);
    }
}

/// Monitor tracking the state of the servers.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MaxScaleMonitor {
    /// Identifier of the monitor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Monitor module to use.
    pub module: MonitorModule,

    /// Interval used to monitor the servers, as a Go duration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooperative_monitoring: Option<CooperativeMonitoring>,

    /// Extra monitor parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<BTreeMap<String, String>>,

    /// Stops the monitor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspend: Option<bool>,
}

/// Admin REST API and GUI.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MaxScaleAdmin {
    /// Port where the admin REST API and GUI are exposed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 0))]
    pub port: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gui_enabled: Option<bool>,
}

impl Validate for MaxScaleAdmin {
    fn validate(&self, v: &mut Validator) {
        v.at_least("port", self.port, 0);
    }
}

/// Synchronization of MaxScale configuration across replicas.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MaxScaleConfigSync {
    /// Database used to store the synced configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MaxScaleConfig {
    /// Global MaxScale parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<BTreeMap<String, String>>,

    /// PersistentVolumeClaim used to persist runtime changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_claim_template: Option<PersistentVolumeClaimSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync: Option<MaxScaleConfigSync>,
}

/// Credentials MaxScale uses for its own users.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MaxScaleAuth {
    /// Generate the users in the referred MariaDB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generate: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_password_secret_key_ref: Option<SecretKeySelector>,

    /// Deletes the default admin user created by MaxScale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_default_admin: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_password_secret_key_ref: Option<SecretKeySelector>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 0))]
    pub client_max_connections: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_password_secret_key_ref: Option<SecretKeySelector>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 0))]
    pub server_max_connections: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitor_username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitor_password_secret_key_ref: Option<SecretKeySelector>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 0))]
    pub monitor_max_connections: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_password_secret_key_ref: Option<SecretKeySelector>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 0))]
    pub sync_max_connections: Option<i64>,
}

impl Validate for MaxScaleAuth {
    fn validate(&self, v: &mut Validator) {
        v.at_least("clientMaxConnections", self.client_max_connections, 0)
            .at_least("serverMaxConnections", self.server_max_connections, 0)
            .at_least("monitorMaxConnections", self.monitor_max_connections, 0)
            .at_least("syncMaxConnections", self.sync_max_connections, 0);
    }
}

/// Prometheus exporter sidecar.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Exporter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_pull_policy: Option<ImagePullPolicy>,

    /// Port where the exporter serves metrics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 0))]
    pub port: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceRequirements>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_context: Option<SecurityContext>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_metadata: Option<Metadata>,
}

impl Validate for Exporter {
    fn validate(&self, v: &mut Validator) {
        v.at_least("port", self.port, 0)
            .field("podMetadata", &self.pod_metadata);
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MaxScaleMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exporter: Option<Exporter>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_monitor: Option<ServiceMonitor>,
}

impl Validate for MaxScaleMetrics {
    fn validate(&self, v: &mut Validator) {
        v.field("exporter", &self.exporter);
    }
}

/// TLS configuration for the admin API, listeners and server connections.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MaxScaleTls {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// TLS versions supported by the admin REST API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_versions: Option<Vec<String>>,

    /// TLS versions supported when connecting to the servers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_versions: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_ca_secret_ref: Option<LocalObjectReference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_cert_secret_ref: Option<LocalObjectReference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listener_ca_secret_ref: Option<LocalObjectReference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listener_cert_secret_ref: Option<LocalObjectReference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_ca_secret_ref: Option<LocalObjectReference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_cert_secret_ref: Option<LocalObjectReference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verify_peer_certificate: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verify_peer_host: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_ssl_enabled: Option<bool>,
}

/// Template for the connection Secret.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SecretTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,

    /// Key used to store the DSN.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Go template used to render the DSN.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_key: Option<String>,
}

impl Validate for SecretTemplate {
    fn validate(&self, v: &mut Validator) {
        v.field("metadata", &self.metadata);
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HealthCheck {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_interval: Option<String>,
}

/// Connection object created to reach MaxScale.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConnectionTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_template: Option<SecretTemplate>,

    /// Port of the listener to connect to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 0))]
    pub port: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,

    /// Extra DSN parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check: Option<HealthCheck>,
}

impl Validate for ConnectionTemplate {
    fn validate(&self, v: &mut Validator) {
        v.field("secretTemplate", &self.secret_template)
            .at_least("port", self.port, 0);
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RollingUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_unavailable: Option<IntOrString>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 0))]
    pub partition: Option<i64>,
}

/// StatefulSet update strategy.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateStrategy {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<UpdateStrategyType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rolling_update: Option<RollingUpdate>,
}

impl Validate for UpdateStrategy {
    fn validate(&self, v: &mut Validator) {
        if let Some(rolling_update) = &self.rolling_update {
            v.at_least("rollingUpdate.partition", rolling_update.partition, 0);
            if self.type_ == Some(UpdateStrategyType::OnDelete) {
                v.error("rollingUpdate", "only allowed when type is RollingUpdate");
            }
        }
    }
}

/// Template for a Kubernetes Service.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ServiceTemplate {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<ServiceType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,

    #[serde(default, rename = "loadBalancerIP", skip_serializing_if = "Option::is_none")]
    pub load_balancer_ip: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_balancer_source_ranges: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_traffic_policy: Option<ExternalTrafficPolicy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_affinity: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocate_load_balancer_node_ports: Option<bool>,
}

impl Validate for ServiceTemplate {
    fn validate(&self, v: &mut Validator) {
        v.field("metadata", &self.metadata);
    }
}

/// MaxScaleSpec defines the desired state of MaxScale.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MaxScaleSpec {
    /// Reference to the MariaDB that MaxScale points to. Used to derive the
    /// servers, services and monitor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maria_db_ref: Option<MariaDbRef>,

    /// Servers that are part of the MaxScale topology.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servers: Option<Vec<MaxScaleServer>>,

    /// Services exposed by MaxScale. Names must be unique.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<MaxScaleService>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitor: Option<MaxScaleMonitor>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin: Option<MaxScaleAdmin>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<MaxScaleConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<MaxScaleAuth>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<MaxScaleMetrics>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<MaxScaleTls>,

    /// Template for the Connection object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<ConnectionTemplate>,

    /// Number of MaxScale replicas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 0))]
    pub replicas: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_disruption_budget: Option<PodDisruptionBudget>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_strategy: Option<UpdateStrategy>,

    /// Template for the Kubernetes Service of the listeners.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubernetes_service: Option<ServiceTemplate>,

    /// Template for the Kubernetes Service of the GUI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gui_kubernetes_service: Option<ServiceTemplate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requeue_interval: Option<String>,

    /// Disables reconciliation of the object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspend: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_pull_policy: Option<ImagePullPolicy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_pull_secrets: Option<Vec<LocalObjectReference>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<Vec<EnvVar>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_from: Option<Vec<EnvFromSource>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_mounts: Option<Vec<VolumeMount>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liveness_probe: Option<Probe>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readiness_probe: Option<Probe>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceRequirements>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_context: Option<SecurityContext>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_security_context: Option<PodSecurityContext>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affinity: Option<Affinity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_selector: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerations: Option<Vec<Toleration>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topology_spread_constraints: Option<Vec<TopologySpreadConstraint>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_class_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherit_metadata: Option<Metadata>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_metadata: Option<Metadata>,
}

impl Validate for MaxScaleSpec {
    fn validate(&self, v: &mut Validator) {
        v.field("mariaDbRef", &self.maria_db_ref)
            .field("servers", &self.servers)
            .field("services", &self.services);

        let mut seen = HashSet::new();
        for (i, service) in self.services.iter().flatten().enumerate() {
            if !seen.insert(service.name.as_str()) {
                v.error(
                    &format!("services[{i}].name"),
                    format!("duplicate service name '{}'", service.name),
                );
            }
        }

        v.field("admin", &self.admin)
            .field("auth", &self.auth)
            .field("metrics", &self.metrics)
            .field("connection", &self.connection)
            .at_least("replicas", self.replicas, 0)
            .field("podDisruptionBudget", &self.pod_disruption_budget)
            .field("updateStrategy", &self.update_strategy)
            .field("kubernetesService", &self.kubernetes_service)
            .field("guiKubernetesService", &self.gui_kubernetes_service)
            .field("livenessProbe", &self.liveness_probe)
            .field("readinessProbe", &self.readiness_probe)
            .field("affinity", &self.affinity)
            .field("topologySpreadConstraints", &self.topology_spread_constraints)
            .field("inheritMetadata", &self.inherit_metadata)
            .field("podMetadata", &self.pod_metadata);
    }
}

impl ManifestSpec for MaxScaleSpec {
    const KIND: &'static str = "MaxScale";
    const TYPE_NAME: &'static str = "k8s_mariadb_com_max_scale_v1alpha1_manifest";
    const DESCRIPTION: &'static str = "MaxScale is the Schema for the maxscales API. It is used to define MaxScale clusters.";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_spec(yaml: &str) -> MaxScaleSpec {
        serde_yaml::from_str(yaml).expect("valid maxscale spec")
    }

    fn violations(spec: &MaxScaleSpec) -> Vec<String> {
        let mut v = Validator::new();
        v.field("spec", spec);
        v.finish().err().unwrap_or_default()
    }

    #[test]
    fn replication_topology() {
        let spec = parse_spec(
            r#"
replicas: 3
servers:
  - name: mariadb-0
    address: mariadb-0.mariadb-internal.default.svc.cluster.local
  - name: mariadb-1
    address: mariadb-1.mariadb-internal.default.svc.cluster.local
    port: 3306
    maintenance: true
services:
  - name: rw-router
    router: readwritesplit
    params:
      transaction_replay: "true"
    listener:
      port: 3306
  - name: rconn-slave-router
    router: readconnroute
    listener:
      port: 3308
      params:
        router_options: slave
monitor:
  module: mariadbmon
  interval: 2s
  cooperativeMonitoring: majority_of_all
admin:
  port: 8989
  guiEnabled: true
kubernetesService:
  type: LoadBalancer
  loadBalancerIP: 172.18.0.224
podDisruptionBudget:
  maxUnavailable: "33%"
"#,
        );
        assert_eq!(spec.servers.as_ref().unwrap().len(), 2);
        let services = spec.services.as_ref().unwrap();
        assert_eq!(services[1].router, Router::Readconnroute);
        assert_eq!(services[1].listener.port, 3308);
        let monitor = spec.monitor.as_ref().unwrap();
        assert_eq!(monitor.module, MonitorModule::Mariadbmon);
        assert_eq!(monitor.cooperative_monitoring, Some(CooperativeMonitoring::MajorityOfAll));
        let svc = spec.kubernetes_service.as_ref().unwrap();
        assert_eq!(svc.type_, Some(ServiceType::LoadBalancer));
        assert_eq!(svc.load_balancer_ip.as_deref(), Some("172.18.0.224"));
        assert!(violations(&spec).is_empty());
    }

    #[test]
    fn listener_port_is_required() {
        let err = serde_yaml::from_str::<MaxScaleSpec>(
            "services:\n  - name: rw\n    router: readwritesplit\n    listener: {}\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("port"));
    }

    #[test]
    fn monitor_module_is_an_enum() {
        assert!(serde_yaml::from_str::<MaxScaleSpec>("monitor:\n  module: csmon\n").is_err());
        assert!(serde_yaml::from_str::<MaxScaleSpec>("monitor:\n  module: galeramon\n").is_ok());
    }

    #[test]
    fn duplicate_service_names_are_reported() {
        let spec = parse_spec(
            r#"
services:
  - name: rw
    router: readwritesplit
    listener: {port: 3306}
  - name: rw
    router: readconnroute
    listener: {port: -1}
"#,
        );
        assert_eq!(
            violations(&spec),
            [
                "spec.services[1].listener.port: must be at least 0, got -1",
                "spec.services[1].name: duplicate service name 'rw'",
            ]
        );
    }

    #[test]
    fn server_address_must_not_be_empty() {
        let spec = parse_spec("servers:\n  - name: mariadb-0\n    address: \"\"\n    port: -5\n");
        assert_eq!(
            violations(&spec),
            [
                "spec.servers[0].address: must be at least 1 characters",
                "spec.servers[0].port: must be at least 0, got -5",
            ]
        );
    }

    #[test]
    fn rolling_update_requires_rolling_strategy() {
        let spec = parse_spec(
            "updateStrategy:\n  type: OnDelete\n  rollingUpdate:\n    partition: -1\n",
        );
        assert_eq!(
            violations(&spec),
            [
                "spec.updateStrategy.rollingUpdate.partition: must be at least 0, got -1",
                "spec.updateStrategy.rollingUpdate: only allowed when type is RollingUpdate",
            ]
        );
    }

    #[test]
    fn auth_connection_limits() {
        let spec = parse_spec(
            r#"
auth:
  generate: true
  adminUsername: mariadb-operator
  adminPasswordSecretKeyRef:
    name: maxscale
    key: password
  clientMaxConnections: -1
"#,
        );
        assert_eq!(
            violations(&spec),
            ["spec.auth.clientMaxConnections: must be at least 0, got -1"]
        );
    }
}
