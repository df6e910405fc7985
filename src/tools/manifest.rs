// Read, validate and render manifests for the k8s.mariadb.com data sources.

use serde::Serialize;

use crate::error::Error;
use crate::model::{BackupSpec, DatabaseSpec, MaxScaleSpec, ObjectMeta, UserSpec};
use crate::types::{
    DataSourceConfig, DataSourceKind, DataSourceState, Manifest, ManifestSpec, API_VERSION,
};
use crate::validation::Validator;

/// Document layout written by `read`: field order is the key order.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ManifestRef<'a, S> {
    api_version: &'static str,
    kind: &'static str,
    metadata: &'a ObjectMeta,
    spec: &'a S,
}

/// Stamps apiVersion and kind onto the config and serializes it to YAML.
/// The config is expected to have passed `validate` already.
pub fn read<S: ManifestSpec>(config: DataSourceConfig<S>) -> Result<DataSourceState<S>, Error> {
    let yaml = serde_yaml::to_string(&ManifestRef {
        api_version: API_VERSION,
        kind: S::KIND,
        metadata: &config.metadata,
        spec: &config.spec,
    })?;
    Ok(DataSourceState {
        metadata: config.metadata,
        spec: config.spec,
        yaml,
    })
}

/// Checks every attribute constraint, returning all violations at once.
pub fn validate<S: ManifestSpec>(config: &DataSourceConfig<S>) -> Result<(), Error> {
    let mut v = Validator::new();
    v.field("metadata", &config.metadata)
        .field("spec", &config.spec);
    v.finish().map_err(Error::Validation)
}

/// Validates the config and returns the rendered YAML document.
pub fn render<S: ManifestSpec>(config: DataSourceConfig<S>) -> Result<String, Error> {
    if let Err(err) = validate(&config) {
        tracing::warn!(
            data_source = S::TYPE_NAME,
            violations = err.diagnostics().len(),
            "rejected invalid configuration"
        );
        return Err(err);
    }
    let name = config.metadata.name.clone();
    let namespace = config.metadata.namespace.clone();
    let state = read(config)?;
    tracing::info!(data_source = S::TYPE_NAME, %name, %namespace, "rendered manifest");
    tracing::debug!(bytes = state.yaml.len(), "manifest size");
    Ok(state.yaml)
}

/// Validates an existing manifest: parsing, apiVersion/kind, the typed shape of
/// the kind, and the same attribute constraints the data sources enforce.
pub fn validate_manifest(config_yaml: &str) -> Result<DataSourceKind, Vec<String>> {
    let value: serde_yaml::Value =
        serde_yaml::from_str(config_yaml).map_err(|e| vec![format!("YAML parse error: {}", e)])?;
    if !value.is_mapping() {
        return Err(vec!["manifest must be a YAML mapping".to_string()]);
    }

    let mut errors = Vec::new();
    if value.get("apiVersion").and_then(|v| v.as_str()) != Some(API_VERSION) {
        errors.push(format!("apiVersion must be '{}'", API_VERSION));
    }
    let kind = value
        .get("kind")
        .and_then(|v| v.as_str())
        .and_then(DataSourceKind::from_kind);
    let Some(kind) = kind else {
        let kinds: Vec<_> = DataSourceKind::ALL.iter().map(|k| k.kind()).collect();
        errors.push(format!("kind must be one of: {}", kinds.join(", ")));
        return Err(errors);
    };
    if !errors.is_empty() {
        return Err(errors);
    }

    match kind {
        DataSourceKind::Backup => check_manifest::<BackupSpec>(value)?,
        DataSourceKind::Database => check_manifest::<DatabaseSpec>(value)?,
        DataSourceKind::MaxScale => check_manifest::<MaxScaleSpec>(value)?,
        DataSourceKind::User => check_manifest::<UserSpec>(value)?,
    }
    Ok(kind)
}

fn check_manifest<S: ManifestSpec>(value: serde_yaml::Value) -> Result<(), Vec<String>> {
    let manifest: Manifest<S> = serde_yaml::from_value(value)
        .map_err(|e| vec![format!("{} manifest is malformed: {}", S::KIND, e)])?;
    let mut v = Validator::new();
    v.field("metadata", &manifest.metadata)
        .field("spec", &manifest.spec);
    v.finish()
}
