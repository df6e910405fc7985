//! Error types for manifest data sources

use thiserror::Error;

/// Main error type for data source operations
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The manifest could not be encoded as YAML
    #[error("unable to marshal manifest: {0}")]
    Serialize(#[from] serde_yaml::Error),

    /// One or more attribute constraints were violated
    #[error("invalid configuration:\n{}", .0.join("\n"))]
    Validation(Vec<String>),

    /// No data source is registered under the given type name
    #[error("unknown data source '{0}'")]
    UnknownDataSource(String),
}

impl Error {
    /// Messages suitable for returning as diagnostics, one per line item
    pub fn diagnostics(&self) -> Vec<String> {
        match self {
            Self::Validation(errors) => errors.clone(),
            other => vec![other.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_lists_every_violation() {
        let err = Error::Validation(vec![
            "metadata.name: must not be empty".to_string(),
            "spec.mariaDbRef.name: must be at least 1 characters".to_string(),
        ]);
        let msg = err.to_string();
        assert!(msg.starts_with("invalid configuration:"));
        assert!(msg.contains("metadata.name"));
        assert!(msg.contains("spec.mariaDbRef.name"));
        assert_eq!(err.diagnostics().len(), 2);
    }

    #[test]
    fn unknown_data_source_names_the_type() {
        let err = Error::UnknownDataSource("k8s_mariadb_com_grant_v1alpha1_manifest".into());
        assert_eq!(
            err.to_string(),
            "unknown data source 'k8s_mariadb_com_grant_v1alpha1_manifest'"
        );
        assert_eq!(err.diagnostics(), vec![err.to_string()]);
    }
}
