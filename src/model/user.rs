//! User (k8s.mariadb.com/v1alpha1)

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::common::{CleanupPolicy, MariaDbRef, SecretKeySelector};
use crate::types::ManifestSpec;
use crate::validation::{Validate, Validator};

/// Authentication plugin used to identify the user.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PasswordPlugin {
    /// Reference to the Secret key containing the plugin name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_name_secret_key_ref: Option<SecretKeySelector>,

    /// Reference to the Secret key containing the plugin argument.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_arg_secret_key_ref: Option<SecretKeySelector>,
}

/// UserSpec defines the desired state of User.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserSpec {
    /// Reference to a MariaDB object.
    pub maria_db_ref: MariaDbRef,

    /// Reference to the Secret key containing the password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_secret_key_ref: Option<SecretKeySelector>,

    /// Reference to the Secret key containing the password hash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash_secret_key_ref: Option<SecretKeySelector>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_plugin: Option<PasswordPlugin>,

    /// Maximum number of connections the User can establish.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 0))]
    pub max_user_connections: Option<i64>,

    /// Name overrides the default name provided by metadata.name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(length(max = 80))]
    pub name: Option<String>,

    /// Host related to the User.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(length(max = 255))]
    pub host: Option<String>,

    /// Defines the behavior of the User in the MariaDB when the object is
    /// deleted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleanup_policy: Option<CleanupPolicy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requeue_interval: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_interval: Option<String>,
}

impl Validate for UserSpec {
    fn validate(&self, v: &mut Validator) {
        v.field("mariaDbRef", &self.maria_db_ref)
            .at_least("maxUserConnections", self.max_user_connections, 0)
            .max_length("name", self.name.as_deref(), 80)
            .max_length("host", self.host.as_deref(), 255);
        if self.password_secret_key_ref.is_some() && self.password_hash_secret_key_ref.is_some() {
            v.error(
                "passwordHashSecretKeyRef",
                "cannot be set together with passwordSecretKeyRef",
            );
        }
    }
}

impl ManifestSpec for UserSpec {
    const KIND: &'static str = "User";
    const TYPE_NAME: &'static str = "k8s_mariadb_com_user_v1alpha1_manifest";
    const DESCRIPTION: &'static str = "User is the Schema for the users API. It is used to define grants as if you were running a 'CREATE USER' statement.";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn violations(spec: &UserSpec) -> Vec<String> {
        let mut v = Validator::new();
        v.field("spec", spec);
        v.finish().err().unwrap_or_default()
    }

    #[test]
    fn user_with_password_secret() {
        let spec: UserSpec = serde_yaml::from_str(
            r#"
mariaDbRef:
  name: mariadb
passwordSecretKeyRef:
  name: user-password
  key: password
maxUserConnections: 20
host: "%"
cleanupPolicy: Skip
"#,
        )
        .unwrap();
        assert_eq!(spec.password_secret_key_ref.as_ref().unwrap().key, "password");
        assert_eq!(spec.max_user_connections, Some(20));
        assert!(violations(&spec).is_empty());
    }

    #[test]
    fn name_and_host_lengths_are_bounded() {
        let spec = UserSpec {
            maria_db_ref: MariaDbRef {
                name: "mariadb".into(),
                ..Default::default()
            },
            name: Some("u".repeat(81)),
            host: Some("h".repeat(256)),
            max_user_connections: Some(-1),
            ..Default::default()
        };
        assert_eq!(
            violations(&spec),
            [
                "spec.maxUserConnections: must be at least 0, got -1",
                "spec.name: must be at most 80 characters",
                "spec.host: must be at most 255 characters",
            ]
        );
    }

    #[test]
    fn password_and_hash_are_exclusive() {
        let spec: UserSpec = serde_yaml::from_str(
            r#"
mariaDbRef: {name: mariadb}
passwordSecretKeyRef: {name: s, key: password}
passwordHashSecretKeyRef: {name: s, key: hash}
"#,
        )
        .unwrap();
        assert_eq!(
            violations(&spec),
            ["spec.passwordHashSecretKeyRef: cannot be set together with passwordSecretKeyRef"]
        );
    }
}
