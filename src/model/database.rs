//! Database (k8s.mariadb.com/v1alpha1)

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::common::{CleanupPolicy, MariaDbRef};
use crate::types::ManifestSpec;
use crate::validation::{Validate, Validator};

/// DatabaseSpec defines the desired state of Database.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DatabaseSpec {
    /// Reference to a MariaDB object.
    pub maria_db_ref: MariaDbRef,

    /// Character set to use in the Database.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_set: Option<String>,

    /// Collation to use in the Database.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collate: Option<String>,

    /// Name overrides the default Database name provided by metadata.name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(length(max = 64))]
    pub name: Option<String>,

    /// Defines the behavior of the Database in the MariaDB when the object is
    /// deleted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleanup_policy: Option<CleanupPolicy>,

    /// Time interval used to periodically check the Database, as a Go
    /// duration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requeue_interval: Option<String>,

    /// Time interval used to retry after a failure, as a Go duration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_interval: Option<String>,
}

impl Validate for DatabaseSpec {
    fn validate(&self, v: &mut Validator) {
        v.field("mariaDbRef", &self.maria_db_ref)
            .max_length("name", self.name.as_deref(), 64);
    }
}

impl ManifestSpec for DatabaseSpec {
    const KIND: &'static str = "Database";
    const TYPE_NAME: &'static str = "k8s_mariadb_com_database_v1alpha1_manifest";
    const DESCRIPTION: &'static str = "Database is the Schema for the databases API. It is used to define a logical database as if you were running a 'CREATE DATABASE' statement.";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_with_charset() {
        let spec: DatabaseSpec = serde_yaml::from_str(
            r#"
mariaDbRef:
  name: mariadb
  waitForIt: true
characterSet: utf8mb4
collate: utf8mb4_general_ci
cleanupPolicy: Delete
requeueInterval: 30s
"#,
        )
        .unwrap();
        assert_eq!(spec.maria_db_ref.wait_for_it, Some(true));
        assert_eq!(spec.character_set.as_deref(), Some("utf8mb4"));
        assert_eq!(spec.cleanup_policy, Some(CleanupPolicy::Delete));

        let mut v = Validator::new();
        v.field("spec", &spec);
        assert!(v.finish().is_ok());
    }

    #[test]
    fn maria_db_ref_is_required() {
        let err = serde_yaml::from_str::<DatabaseSpec>("characterSet: utf8\n").unwrap_err();
        assert!(err.to_string().contains("mariaDbRef"));
    }

    #[test]
    fn empty_maria_db_ref_name_is_rejected() {
        let spec: DatabaseSpec = serde_yaml::from_str("mariaDbRef:\n  name: \"\"\n").unwrap();
        let mut v = Validator::new();
        v.field("spec", &spec);
        assert_eq!(
            v.finish().unwrap_err(),
            ["spec.mariaDbRef.name: must be at least 1 characters"]
        );
    }

    #[test]
    fn unknown_cleanup_policy_is_rejected() {
        assert!(serde_yaml::from_str::<DatabaseSpec>(
            "mariaDbRef: {name: mariadb}\ncleanupPolicy: Retain\n"
        )
        .is_err());
    }
}
