//! Building blocks shared across the k8s.mariadb.com CRDs.
//!
//! Most of these mirror Kubernetes core types, trimmed to the fields the
//! mariadb-operator CRDs expose.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::validation::{Validate, Validator};

/// Integer or string value, as used by ports and disruption budgets.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(untagged)]
pub enum IntOrString {
    Int(i64),
    String(String),
}

impl Default for IntOrString {
    fn default() -> Self {
        Self::Int(0)
    }
}

/// Image pull policy for a container.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum ImagePullPolicy {
    Always,
    Never,
    IfNotPresent,
}

/// Restart policy for Job pods.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum RestartPolicy {
    Always,
    OnFailure,
    Never,
}

/// Defines the behavior of the SQL resource on the database when the object
/// is deleted.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum CleanupPolicy {
    /// Leave the database resource in place.
    Skip,
    /// Drop the database resource.
    Delete,
}

/// Reference to a MariaDB object.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MariaDbRef {
    /// Name of the referent.
    #[schemars(length(min = 1))]
    pub name: String,

    /// Namespace of the referent. Defaults to the namespace of the object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Indicates whether the controller should wait for the MariaDB to be
    /// ready before proceeding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_for_it: Option<bool>,
}

impl Validate for MariaDbRef {
    fn validate(&self, v: &mut Validator) {
        v.min_length("name", Some(self.name.as_str()), 1);
    }
}

/// Reference to an object in the same namespace.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LocalObjectReference {
    /// Name of the referent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Selects a key of a Secret.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SecretKeySelector {
    /// Name of the referent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The key of the secret to select from.
    pub key: String,

    /// Specify whether the Secret or its key must be defined.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
}

/// Selects a key from a ConfigMap.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigMapKeySelector {
    /// Name of the referent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The key to select.
    pub key: String,

    /// Specify whether the ConfigMap or its key must be defined.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
}

/// Labels and annotations applied to child objects.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Metadata {
    /// Labels to be added to children resources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,

    /// Annotations to be added to children resources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,
}

impl Validate for Metadata {
    fn validate(&self, v: &mut Validator) {
        v.labels("labels", self.labels.as_ref())
            .annotations("annotations", self.annotations.as_ref());
    }
}

/// Compute resources required by a container.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ResourceRequirements {
    /// Maximum amount of compute resources allowed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<BTreeMap<String, String>>,

    /// Minimum amount of compute resources required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests: Option<BTreeMap<String, String>>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Toleration {
    /// Taint effect to match. Empty means match all taint effects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,

    /// Taint key that the toleration applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Key's relationship to the value. Valid operators are Exists and Equal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,

    /// Period of time the toleration tolerates the taint, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toleration_seconds: Option<i64>,

    /// Taint value the toleration matches to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// A selector requirement: a key, an operator and a set of values.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SelectorRequirement {
    pub key: String,

    /// One of In, NotIn, Exists, DoesNotExist (Gt and Lt for node selectors).
    pub operator: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
}

/// Label query over a set of resources.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LabelSelector {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_expressions: Option<Vec<SelectorRequirement>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_labels: Option<BTreeMap<String, String>>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NodeSelectorTerm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_expressions: Option<Vec<SelectorRequirement>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_fields: Option<Vec<SelectorRequirement>>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NodeSelector {
    pub node_selector_terms: Vec<NodeSelectorTerm>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PreferredSchedulingTerm {
    pub preference: NodeSelectorTerm,

    /// Weight associated with matching the term, in the range 1-100.
    #[schemars(range(min = 1, max = 100))]
    pub weight: i64,
}

impl Validate for PreferredSchedulingTerm {
    fn validate(&self, v: &mut Validator) {
        v.at_least("weight", Some(self.weight), 1);
        if self.weight > 100 {
            v.error("weight", format!("must be at most 100, got {}", self.weight));
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NodeAffinity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_during_scheduling_ignored_during_execution: Option<Vec<PreferredSchedulingTerm>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_during_scheduling_ignored_during_execution: Option<NodeSelector>,
}

impl Validate for NodeAffinity {
    fn validate(&self, v: &mut Validator) {
        v.field(
            "preferredDuringSchedulingIgnoredDuringExecution",
            &self.preferred_during_scheduling_ignored_during_execution,
        );
    }
}

/// Scheduling constraints for the Pod.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Affinity {
    /// Configures PodAntiAffinity so each Pod is scheduled in a different
    /// Node, enabling HA.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anti_affinity_enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_affinity: Option<NodeAffinity>,
}

impl Validate for Affinity {
    fn validate(&self, v: &mut Validator) {
        v.field("nodeAffinity", &self.node_affinity);
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Capabilities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drop: Option<Vec<String>>,
}

/// Container-level security attributes.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SecurityContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_privilege_escalation: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<Capabilities>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privileged: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only_root_filesystem: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_as_group: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_as_non_root: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_as_user: Option<i64>,
}

/// Pod-level security attributes.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PodSecurityContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fs_group: Option<i64>,

    /// Behavior of changing ownership and permission of the volume: OnRootMismatch or Always.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fs_group_change_policy: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_as_group: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_as_non_root: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_as_user: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplemental_groups: Option<Vec<i64>>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ObjectFieldSelector {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    pub field_path: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EnvVarSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_map_key_ref: Option<ConfigMapKeySelector>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_ref: Option<ObjectFieldSelector>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key_ref: Option<SecretKeySelector>,
}

/// Environment variable present in a container.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EnvVar {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_from: Option<EnvVarSource>,
}

/// Source to populate environment variables in the container.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EnvFromSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_map_ref: Option<LocalObjectReference>,

    /// Identifier to prepend to each key in the referenced source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_ref: Option<LocalObjectReference>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VolumeMount {
    pub mount_path: String,

    /// Must match the name of a volume.
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_path: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EmptyDirVolumeSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_limit: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NfsVolumeSource {
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,

    pub server: String,
}

impl Validate for NfsVolumeSource {
    fn validate(&self, v: &mut Validator) {
        v.min_length("path", Some(self.path.as_str()), 1)
            .min_length("server", Some(self.server.as_str()), 1);
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PersistentVolumeClaimVolumeSource {
    pub claim_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
}

impl Validate for PersistentVolumeClaimVolumeSource {
    fn validate(&self, v: &mut Validator) {
        v.min_length("claimName", Some(self.claim_name.as_str()), 1);
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SecretVolumeSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_mode: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_name: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigMapVolumeSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_mode: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CsiVolumeSource {
    pub driver: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fs_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_attributes: Option<BTreeMap<String, String>>,
}

impl Validate for CsiVolumeSource {
    fn validate(&self, v: &mut Validator) {
        v.min_length("driver", Some(self.driver.as_str()), 1);
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HostPathVolumeSource {
    pub path: String,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
}

/// Storage for a pod volume. Exactly one source should be set.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VolumeSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_map: Option<ConfigMapVolumeSource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csi: Option<CsiVolumeSource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empty_dir: Option<EmptyDirVolumeSource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_path: Option<HostPathVolumeSource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nfs: Option<NfsVolumeSource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent_volume_claim: Option<PersistentVolumeClaimVolumeSource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<SecretVolumeSource>,
}

fn check_single_source(v: &mut Validator, sources: [bool; 7]) {
    if sources.iter().filter(|&&set| set).count() > 1 {
        v.error("", "only one volume source may be specified");
    }
}

impl Validate for VolumeSource {
    fn validate(&self, v: &mut Validator) {
        check_single_source(
            v,
            [
                self.config_map.is_some(),
                self.csi.is_some(),
                self.empty_dir.is_some(),
                self.host_path.is_some(),
                self.nfs.is_some(),
                self.persistent_volume_claim.is_some(),
                self.secret.is_some(),
            ],
        );
        v.field("csi", &self.csi)
            .field("nfs", &self.nfs)
            .field("persistentVolumeClaim", &self.persistent_volume_claim);
    }
}

/// Named volume that may be mounted by containers in the Pod.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Volume {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_map: Option<ConfigMapVolumeSource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csi: Option<CsiVolumeSource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empty_dir: Option<EmptyDirVolumeSource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_path: Option<HostPathVolumeSource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nfs: Option<NfsVolumeSource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent_volume_claim: Option<PersistentVolumeClaimVolumeSource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<SecretVolumeSource>,
}

impl Validate for Volume {
    fn validate(&self, v: &mut Validator) {
        check_single_source(
            v,
            [
                self.config_map.is_some(),
                self.csi.is_some(),
                self.empty_dir.is_some(),
                self.host_path.is_some(),
                self.nfs.is_some(),
                self.persistent_volume_claim.is_some(),
                self.secret.is_some(),
            ],
        );
        v.dns_label("name", &self.name)
            .field("csi", &self.csi)
            .field("nfs", &self.nfs)
            .field("persistentVolumeClaim", &self.persistent_volume_claim);
    }
}

/// Desired characteristics of a volume requested by a claim.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PersistentVolumeClaimSpec {
    /// Desired access modes the volume should have, e.g. ReadWriteOnce.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_modes: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceRequirements>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<LabelSelector>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_class_name: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExecAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HttpGetAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    pub port: IntOrString,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TcpSocketAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    pub port: IntOrString,
}

/// Health check performed against a container.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Probe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exec: Option<ExecAction>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_get: Option<HttpGetAction>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcp_socket: Option<TcpSocketAction>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 0))]
    pub initial_delay_seconds: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 1))]
    pub timeout_seconds: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 1))]
    pub period_seconds: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 1))]
    pub success_threshold: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 1))]
    pub failure_threshold: Option<i64>,
}

impl Validate for Probe {
    fn validate(&self, v: &mut Validator) {
        v.at_least("initialDelaySeconds", self.initial_delay_seconds, 0)
            .at_least("timeoutSeconds", self.timeout_seconds, 1)
            .at_least("periodSeconds", self.period_seconds, 1)
            .at_least("successThreshold", self.success_threshold, 1)
            .at_least("failureThreshold", self.failure_threshold, 1);
    }
}

/// How a group of pods ought to spread across topology domains.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TopologySpreadConstraint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_selector: Option<LabelSelector>,

    /// Degree to which pods may be unevenly distributed.
    #[schemars(range(min = 1))]
    pub max_skew: i64,

    /// Key of node labels. Nodes that have a label with this key and
    /// identical values are considered to be in the same topology.
    pub topology_key: String,

    /// How to deal with a pod if it doesn't satisfy the spread constraint:
    /// DoNotSchedule or ScheduleAnyway.
    pub when_unsatisfiable: String,
}

impl Validate for TopologySpreadConstraint {
    fn validate(&self, v: &mut Validator) {
        v.at_least("maxSkew", Some(self.max_skew), 1)
            .min_length("topologyKey", Some(self.topology_key.as_str()), 1);
    }
}

/// Prometheus ServiceMonitor configuration.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ServiceMonitor {
    /// Interval for scraping metrics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,

    /// Label used to identify the job in Prometheus.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_label: Option<String>,

    /// Release label used by Prometheus to select ServiceMonitors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prometheus_release: Option<String>,

    /// Timeout for scraping metrics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scrape_timeout: Option<String>,
}

/// PodDisruptionBudget configuration.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PodDisruptionBudget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_unavailable: Option<IntOrString>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_available: Option<IntOrString>,
}

impl Validate for PodDisruptionBudget {
    fn validate(&self, v: &mut Validator) {
        if self.max_unavailable.is_some() && self.min_available.is_some() {
            v.error("", "minAvailable and maxUnavailable are mutually exclusive");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_or_string_keeps_its_form() {
        let pdb: PodDisruptionBudget =
            serde_json::from_str(r#"{"maxUnavailable": 1, "minAvailable": "50%"}"#).unwrap();
        assert_eq!(pdb.max_unavailable, Some(IntOrString::Int(1)));
        assert_eq!(pdb.min_available, Some(IntOrString::String("50%".into())));

        let mut v = Validator::new();
        v.field("podDisruptionBudget", &pdb);
        assert_eq!(
            v.errors(),
            ["podDisruptionBudget: minAvailable and maxUnavailable are mutually exclusive"]
        );
    }

    #[test]
    fn image_pull_policy_rejects_unknown_values() {
        assert_eq!(
            serde_json::from_str::<ImagePullPolicy>(r#""IfNotPresent""#).unwrap(),
            ImagePullPolicy::IfNotPresent
        );
        assert!(serde_json::from_str::<ImagePullPolicy>(r#""Sometimes""#).is_err());
        assert!(serde_json::from_str::<CleanupPolicy>(r#""Retain""#).is_err());
    }

    #[test]
    fn secret_key_selector_requires_key() {
        let err = serde_json::from_str::<SecretKeySelector>(r#"{"name": "mariadb"}"#).unwrap_err();
        assert!(err.to_string().contains("key"));
    }

    #[test]
    fn volume_source_allows_a_single_source() {
        let source = VolumeSource {
            empty_dir: Some(EmptyDirVolumeSource::default()),
            nfs: Some(NfsVolumeSource {
                path: "/backups".into(),
                server: "nas.local".into(),
                read_only: None,
            }),
            ..Default::default()
        };
        let mut v = Validator::new();
        v.field("volume", &source);
        assert_eq!(v.errors(), ["volume: only one volume source may be specified"]);
    }

    #[test]
    fn pod_volume_allows_a_single_source() {
        let volumes: Vec<Volume> = serde_json::from_str(
            r#"[{"name": "data", "emptyDir": {}, "nfs": {"path": "/x", "server": "nas"}}]"#,
        )
        .unwrap();
        let mut v = Validator::new();
        v.field("volumes", &volumes);
        assert_eq!(v.errors(), ["volumes[0]: only one volume source may be specified"]);

        let single: Volume = serde_json::from_str(r#"{"name": "data", "emptyDir": {}}"#).unwrap();
        let mut v = Validator::new();
        v.field("volumes", &single);
        assert!(v.errors().is_empty());
    }

    #[test]
    fn probe_thresholds_have_lower_bounds() {
        let probe = Probe {
            period_seconds: Some(0),
            initial_delay_seconds: Some(0),
            ..Default::default()
        };
        let mut v = Validator::new();
        v.field("livenessProbe", &probe);
        assert_eq!(v.errors(), ["livenessProbe.periodSeconds: must be at least 1, got 0"]);
    }

    #[test]
    fn host_path_type_uses_its_json_name() {
        let source = HostPathVolumeSource {
            path: "/var/lib/backups".into(),
            type_: Some("DirectoryOrCreate".into()),
        };
        let json = serde_json::to_value(&source).unwrap();
        assert_eq!(json["type"], "DirectoryOrCreate");
    }
}
