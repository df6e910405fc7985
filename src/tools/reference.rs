// Catalog of data sources (list_data_sources, get_data_source_schema).

use schemars::Schema;
use serde_json::{json, Value};

use crate::error::Error;
use crate::model::{BackupSpec, DatabaseSpec, MaxScaleSpec, UserSpec};
use crate::types::{DataSourceConfig, DataSourceKind, ManifestSpec, API_VERSION};

pub fn list_data_sources_json() -> String {
    let data_sources: Vec<Value> = DataSourceKind::ALL
        .iter()
        .map(|kind| {
            json!({
                "typeName": kind.type_name(),
                "apiVersion": API_VERSION,
                "kind": kind.kind(),
                "description": kind.description(),
            })
        })
        .collect();
    format!("{:#}", Value::Array(data_sources))
}

/// JSON Schema of the attributes accepted by the named data source.
pub fn data_source_schema(type_name: &str) -> Result<Schema, Error> {
    let kind = DataSourceKind::from_type_name(type_name)
        .ok_or_else(|| Error::UnknownDataSource(type_name.to_string()))?;
    Ok(match kind {
        DataSourceKind::Backup => config_schema::<BackupSpec>(),
        DataSourceKind::Database => config_schema::<DatabaseSpec>(),
        DataSourceKind::MaxScale => config_schema::<MaxScaleSpec>(),
        DataSourceKind::User => config_schema::<UserSpec>(),
    })
}

pub fn data_source_schema_json(type_name: &str) -> Result<String, Error> {
    data_source_schema(type_name).map(|schema| format!("{:#}", schema.as_value()))
}

fn config_schema<S: ManifestSpec>() -> Schema {
    let mut schema = schemars::schema_for!(DataSourceConfig<S>);
    schema.insert("description".to_string(), Value::String(S::DESCRIPTION.to_string()));
    schema
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_data_source() {
        let listed: Value = serde_json::from_str(&list_data_sources_json()).unwrap();
        let listed = listed.as_array().unwrap();
        assert_eq!(listed.len(), 4);
        assert_eq!(listed[0]["typeName"], "k8s_mariadb_com_backup_v1alpha1_manifest");
        assert_eq!(listed[2]["kind"], "MaxScale");
        assert!(listed.iter().all(|d| d["apiVersion"] == "k8s.mariadb.com/v1alpha1"));
    }

    #[test]
    fn schema_describes_required_attributes() {
        let schema = data_source_schema("k8s_mariadb_com_database_v1alpha1_manifest").unwrap();
        let value = schema.as_value();
        let required: Vec<_> = value["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert!(required.contains(&"metadata"));
        assert!(required.contains(&"spec"));
        assert!(value["description"].as_str().unwrap().starts_with("Database is the Schema"));
    }

    #[test]
    fn schema_lists_enum_values() {
        let json = data_source_schema_json("k8s_mariadb_com_backup_v1alpha1_manifest").unwrap();
        for value in ["\"none\"", "\"bzip2\"", "\"gzip\"", "\"OnFailure\""] {
            assert!(json.contains(value), "{value} missing from schema");
        }
    }

    #[test]
    fn unknown_data_source() {
        let err = data_source_schema_json("k8s_mariadb_com_grant_v1alpha1_manifest").unwrap_err();
        assert!(matches!(err, Error::UnknownDataSource(_)));
    }
}
