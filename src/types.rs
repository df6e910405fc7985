// Shared types for the manifest data sources: the API group, the per-kind
// catalog, and the config/state shapes every data source reads and returns.

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::model::{BackupSpec, DatabaseSpec, MaxScaleSpec, ObjectMeta, UserSpec};
use crate::validation::Validate;

pub const API_VERSION: &str = "k8s.mariadb.com/v1alpha1";

/// A CRD spec that can be rendered as a manifest.
pub trait ManifestSpec: Serialize + DeserializeOwned + JsonSchema + Validate + Clone {
    /// Kind stamped into the manifest.
    const KIND: &'static str;
    /// Name of the data source, `<group>_<kind>_<version>_manifest` in snake case.
    const TYPE_NAME: &'static str;
    const DESCRIPTION: &'static str;
}

/// Attributes supplied to a data source.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DataSourceConfig<S> {
    pub metadata: ObjectMeta,
    pub spec: S,
}

/// Result of a read: the config plus the computed YAML document.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct DataSourceState<S> {
    pub metadata: ObjectMeta,
    pub spec: S,
    pub yaml: String,
}

/// A full manifest, as parsed back from YAML.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Manifest<S> {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: S,
}

/// Every data source in the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataSourceKind {
    Backup,
    Database,
    MaxScale,
    User,
}

impl DataSourceKind {
    pub const ALL: [Self; 4] = [Self::Backup, Self::Database, Self::MaxScale, Self::User];

    pub fn kind(self) -> &'static str {
        match self {
            Self::Backup => BackupSpec::KIND,
            Self::Database => DatabaseSpec::KIND,
            Self::MaxScale => MaxScaleSpec::KIND,
            Self::User => UserSpec::KIND,
        }
    }

    pub fn type_name(self) -> &'static str {
        match self {
            Self::Backup => BackupSpec::TYPE_NAME,
            Self::Database => DatabaseSpec::TYPE_NAME,
            Self::MaxScale => MaxScaleSpec::TYPE_NAME,
            Self::User => UserSpec::TYPE_NAME,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Backup => BackupSpec::DESCRIPTION,
            Self::Database => DatabaseSpec::DESCRIPTION,
            Self::MaxScale => MaxScaleSpec::DESCRIPTION,
            Self::User => UserSpec::DESCRIPTION,
        }
    }

    pub fn from_kind(kind: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.kind() == kind)
    }

    pub fn from_type_name(type_name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.type_name() == type_name)
    }
}

impl std::fmt::Display for DataSourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names_follow_group_kind_version() {
        let names: Vec<_> = DataSourceKind::ALL.iter().map(|k| k.type_name()).collect();
        assert_eq!(
            names,
            [
                "k8s_mariadb_com_backup_v1alpha1_manifest",
                "k8s_mariadb_com_database_v1alpha1_manifest",
                "k8s_mariadb_com_max_scale_v1alpha1_manifest",
                "k8s_mariadb_com_user_v1alpha1_manifest",
            ]
        );
    }

    #[test]
    fn lookup_by_kind_and_type_name() {
        assert_eq!(DataSourceKind::from_kind("MaxScale"), Some(DataSourceKind::MaxScale));
        assert_eq!(DataSourceKind::from_kind("maxscale"), None);
        assert_eq!(
            DataSourceKind::from_type_name("k8s_mariadb_com_user_v1alpha1_manifest"),
            Some(DataSourceKind::User)
        );
        assert_eq!(DataSourceKind::from_type_name("k8s_mariadb_com_grant_v1alpha1_manifest"), None);
        assert_eq!(DataSourceKind::Database.to_string(), "Database");
    }

    #[test]
    fn config_requires_metadata_and_spec() {
        let err = serde_json::from_str::<DataSourceConfig<DatabaseSpec>>(
            r#"{"metadata": {"name": "db", "namespace": "default"}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("spec"));
    }
}
