//! Object metadata shared by every manifest data source.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::validation::{Validate, Validator};

/// Data that helps uniquely identify this object.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ObjectMeta {
    /// Unique identifier for this object within its namespace. Must be a
    /// lowercase RFC 1123 subdomain.
    #[schemars(length(min = 1, max = 253))]
    pub name: String,

    /// Namespace the object lives in. Must be a lowercase RFC 1123 label.
    #[schemars(length(min = 1, max = 63))]
    pub namespace: String,

    /// Map of string keys and values that can be used to organize and
    /// categorize objects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,

    /// Unstructured key value map stored with a resource that may be set by
    /// external tools to store and retrieve arbitrary metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,
}

impl Validate for ObjectMeta {
    fn validate(&self, v: &mut Validator) {
        v.dns_subdomain("name", &self.name)
            .dns_label("namespace", &self.namespace)
            .labels("labels", self.labels.as_ref())
            .annotations("annotations", self.annotations.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(name: &str, namespace: &str) -> ObjectMeta {
        ObjectMeta {
            name: name.to_string(),
            namespace: namespace.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn valid_metadata_passes() {
        let mut m = meta("mariadb-backup", "databases");
        m.labels = Some(BTreeMap::from([(
            "app.kubernetes.io/part-of".to_string(),
            "mariadb".to_string(),
        )]));
        let mut v = Validator::new();
        v.field("metadata", &m);
        assert!(v.finish().is_ok());
    }

    #[test]
    fn name_and_namespace_are_checked() {
        let mut v = Validator::new();
        v.field("metadata", &meta("Backup_1", "a.b"));
        let errors = v.finish().unwrap_err();
        assert!(errors.iter().any(|e| e.starts_with("metadata.name:")));
        assert!(errors.iter().any(|e| e.starts_with("metadata.namespace:")));
    }

    #[test]
    fn name_and_namespace_are_required() {
        let err = serde_json::from_str::<ObjectMeta>(r#"{"name": "db"}"#).unwrap_err();
        assert!(err.to_string().contains("namespace"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = serde_json::from_str::<ObjectMeta>(
            r#"{"name": "db", "namespace": "default", "uid": "1234"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("uid"));
    }
}
