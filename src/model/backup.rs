//! Backup (k8s.mariadb.com/v1alpha1)
//!
//! A Backup takes a logical dump of a MariaDB, either once or on a cron
//! schedule, and ships it to S3, a PersistentVolumeClaim or a volume.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::common::{
    Affinity, LocalObjectReference, MariaDbRef, Metadata, PersistentVolumeClaimSpec,
    PodSecurityContext, ResourceRequirements, RestartPolicy, SecretKeySelector, SecurityContext,
    Toleration, Volume, VolumeSource,
};
use crate::types::ManifestSpec;
use crate::validation::{Validate, Validator};

/// Compression algorithm applied to the backup file.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    None,
    Bzip2,
    Gzip,
}

/// TLS settings for the S3 connection.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct S3Tls {
    /// Indicates whether TLS is used to connect to S3.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Reference to a Secret key containing a CA bundle in PEM format used to
    /// establish TLS connections with S3.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_secret_key_ref: Option<SecretKeySelector>,
}

/// S3-compatible object storage.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct S3 {
    /// Name of the bucket to store backups.
    #[schemars(length(min = 1))]
    pub bucket: String,

    /// S3 API endpoint without scheme.
    #[schemars(length(min = 1))]
    pub endpoint: String,

    /// Folder within the bucket where backups are stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    /// S3 region name to use.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Reference to a Secret key containing the S3 access key id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key_id_secret_key_ref: Option<SecretKeySelector>,

    /// Reference to a Secret key containing the S3 secret access key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_access_key_secret_key_ref: Option<SecretKeySelector>,

    /// Reference to a Secret key containing the S3 session token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_token_secret_key_ref: Option<SecretKeySelector>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<S3Tls>,
}

impl Validate for S3 {
    fn validate(&self, v: &mut Validator) {
        v.min_length("bucket", Some(self.bucket.as_str()), 1)
            .min_length("endpoint", Some(self.endpoint.as_str()), 1);
    }
}

/// Where backups are stored. Exactly one of the storage types must be set.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BackupStorage {
    /// S3-compatible storage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3: Option<S3>,

    /// A PersistentVolumeClaim created for the backups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent_volume_claim: Option<PersistentVolumeClaimSpec>,

    /// A Kubernetes volume to store the backups in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<VolumeSource>,
}

impl Validate for BackupStorage {
    fn validate(&self, v: &mut Validator) {
        let configured = [
            self.s3.is_some(),
            self.persistent_volume_claim.is_some(),
            self.volume.is_some(),
        ]
        .iter()
        .filter(|&&set| set)
        .count();
        if configured != 1 {
            v.error(
                "",
                "exactly one of s3, persistentVolumeClaim or volume must be specified",
            );
        }
        v.field("s3", &self.s3).field("volume", &self.volume);
    }
}

/// Temporary storage used while backups are taken or restored.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BackupStagingStorage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent_volume_claim: Option<PersistentVolumeClaimSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<VolumeSource>,
}

impl Validate for BackupStagingStorage {
    fn validate(&self, v: &mut Validator) {
        if self.persistent_volume_claim.is_some() && self.volume.is_some() {
            v.error("", "persistentVolumeClaim and volume are mutually exclusive");
        }
        v.field("volume", &self.volume);
    }
}

/// Cron schedule for periodic backups.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Schedule {
    /// Cron expression.
    #[schemars(length(min = 1))]
    pub cron: String,

    /// Suspends the schedule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspend: Option<bool>,
}

impl Validate for Schedule {
    fn validate(&self, v: &mut Validator) {
        v.min_length("cron", Some(self.cron.as_str()), 1);
    }
}

/// BackupSpec defines the desired state of Backup.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BackupSpec {
    /// Reference to the MariaDB to back up.
    pub maria_db_ref: MariaDbRef,

    /// Where the backup files are stored.
    pub storage: BackupStorage,

    /// Temporary storage used during the backup process. Defaults to an
    /// emptyDir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staging_storage: Option<BackupStagingStorage>,

    /// Algorithm used to compress the backup file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression: Option<Compression>,

    /// Logical databases to back up. All databases when empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub databases: Option<Vec<String>>,

    /// Skips the backup of the mysql.global_priv table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_global_priv: Option<bool>,

    /// Log level of the backup container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Retention period for old backups, as a Go duration (e.g. 720h).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retention: Option<String>,

    /// Schedule for periodic backups. A single backup is taken when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Schedule>,

    /// Number of successful Jobs to keep.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 0))]
    pub successful_jobs_history_limit: Option<i64>,

    /// Number of failed Jobs to keep.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 0))]
    pub failed_jobs_history_limit: Option<i64>,

    /// Time zone name for the cron schedule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,

    /// Number of retries before marking the Job as failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 0))]
    pub backoff_limit: Option<i64>,

    /// Restart policy of the Job pods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restart_policy: Option<RestartPolicy>,

    /// Extra arguments passed to the backup command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affinity: Option<Affinity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_selector: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerations: Option<Vec<Toleration>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceRequirements>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_context: Option<SecurityContext>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_security_context: Option<PodSecurityContext>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_pull_secrets: Option<Vec<LocalObjectReference>>,

    /// Metadata propagated to the children objects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherit_metadata: Option<Metadata>,

    /// Metadata added to the Job pods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_metadata: Option<Metadata>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_class_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volumes: Option<Vec<Volume>>,
}

impl Validate for BackupSpec {
    fn validate(&self, v: &mut Validator) {
        v.field("mariaDbRef", &self.maria_db_ref)
            .field("storage", &self.storage)
            .field("stagingStorage", &self.staging_storage)
            .field("schedule", &self.schedule)
            .at_least("successfulJobsHistoryLimit", self.successful_jobs_history_limit, 0)
            .at_least("failedJobsHistoryLimit", self.failed_jobs_history_limit, 0)
            .at_least("backoffLimit", self.backoff_limit, 0)
            .field("affinity", &self.affinity)
            .field("inheritMetadata", &self.inherit_metadata)
            .field("podMetadata", &self.pod_metadata)
            .field("volumes", &self.volumes);
    }
}

impl ManifestSpec for BackupSpec {
    const KIND: &'static str = "Backup";
    const TYPE_NAME: &'static str = "k8s_mariadb_com_backup_v1alpha1_manifest";
    const DESCRIPTION: &'static str =
        "Backup is the Schema for the backups API. It is used to define backup jobs and its storage.";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_spec(yaml: &str) -> BackupSpec {
        serde_yaml::from_str(yaml).expect("valid backup spec")
    }

    fn violations(spec: &BackupSpec) -> Vec<String> {
        let mut v = Validator::new();
        v.field("spec", spec);
        v.finish().err().unwrap_or_default()
    }

    #[test]
    fn s3_backup_with_schedule() {
        let spec = parse_spec(
            r#"
mariaDbRef:
  name: mariadb
storage:
  s3:
    bucket: backups
    endpoint: minio.minio.svc.cluster.local:9000
    prefix: mariadb
    accessKeyIdSecretKeyRef:
      name: minio
      key: access-key-id
    tls:
      enabled: true
compression: gzip
schedule:
  cron: "*/5 * * * *"
maxRetention: 720h
"#,
        );
        let s3 = spec.storage.s3.as_ref().unwrap();
        assert_eq!(s3.bucket, "backups");
        assert_eq!(s3.access_key_id_secret_key_ref.as_ref().unwrap().key, "access-key-id");
        assert_eq!(spec.compression, Some(Compression::Gzip));
        assert!(violations(&spec).is_empty());
    }

    #[test]
    fn compression_accepts_only_known_algorithms() {
        for algorithm in ["none", "bzip2", "gzip"] {
            let yaml = format!(
                "mariaDbRef: {{name: mariadb}}\nstorage: {{volume: {{emptyDir: {{}}}}}}\ncompression: {algorithm}\n"
            );
            assert!(serde_yaml::from_str::<BackupSpec>(&yaml).is_ok(), "{algorithm}");
        }
        let err = serde_yaml::from_str::<BackupSpec>(
            "mariaDbRef: {name: mariadb}\nstorage: {volume: {emptyDir: {}}}\ncompression: zip\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("zip"));
    }

    #[test]
    fn storage_is_required() {
        let err = serde_yaml::from_str::<BackupSpec>("mariaDbRef: {name: mariadb}\n").unwrap_err();
        assert!(err.to_string().contains("storage"));
    }

    #[test]
    fn storage_requires_exactly_one_backend() {
        let spec = parse_spec(
            r#"
mariaDbRef:
  name: mariadb
storage: {}
"#,
        );
        assert_eq!(
            violations(&spec),
            ["spec.storage: exactly one of s3, persistentVolumeClaim or volume must be specified"]
        );
    }

    #[test]
    fn history_limits_cannot_be_negative() {
        let spec = parse_spec(
            r#"
mariaDbRef:
  name: mariadb
storage:
  persistentVolumeClaim:
    resources:
      requests:
        storage: 1Gi
    accessModes: [ReadWriteOnce]
successfulJobsHistoryLimit: -1
failedJobsHistoryLimit: 0
backoffLimit: -3
schedule:
  cron: ""
"#,
        );
        assert_eq!(
            violations(&spec),
            [
                "spec.schedule.cron: must be at least 1 characters",
                "spec.successfulJobsHistoryLimit: must be at least 0, got -1",
                "spec.backoffLimit: must be at least 0, got -3",
            ]
        );
    }

    #[test]
    fn restart_policy_is_an_enum() {
        let spec = parse_spec(
            "mariaDbRef: {name: mariadb}\nstorage: {volume: {emptyDir: {}}}\nrestartPolicy: OnFailure\n",
        );
        assert_eq!(spec.restart_policy, Some(RestartPolicy::OnFailure));
        assert!(serde_yaml::from_str::<BackupSpec>(
            "mariaDbRef: {name: mariadb}\nstorage: {volume: {emptyDir: {}}}\nrestartPolicy: Sometimes\n",
        )
        .is_err());
    }
}
