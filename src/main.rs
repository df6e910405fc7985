//! k8s.mariadb.com MCP server: render and validate MariaDB operator manifests.

mod error;
mod model;
mod telemetry;
mod tools;
mod types;
mod validation;

use rmcp::{
    handler::server::ServerHandler,
    model::{CallToolResult, Content},
    tool, tool_handler, tool_router,
    transport::stdio,
    ServiceExt,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::{BackupSpec, DatabaseSpec, MaxScaleSpec, UserSpec};
use crate::telemetry::TelemetryConfig;
use crate::types::{DataSourceConfig, DataSourceKind};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct ValidateParams {
    /// YAML manifest to validate
    config: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct SchemaParams {
    /// Data source type name, e.g. k8s_mariadb_com_backup_v1alpha1_manifest
    type_name: String,
}

fn render_result(rendered: Result<String, Error>) -> CallToolResult {
    match rendered {
        Ok(yaml) => CallToolResult::success(vec![Content::text(yaml)]),
        Err(e) => CallToolResult::error(vec![Content::text(e.diagnostics().join("\n"))]),
    }
}

#[derive(Clone)]
struct MariaDbManifestService {
    tool_router: rmcp::handler::server::tool::ToolRouter<Self>,
}

#[tool_router]
impl MariaDbManifestService {
    fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Render a k8s.mariadb.com/v1alpha1 Backup manifest as YAML")]
    async fn k8s_mariadb_com_backup_v1alpha1_manifest(
        &self,
        params: rmcp::handler::server::wrapper::Parameters<DataSourceConfig<BackupSpec>>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        Ok(render_result(tools::manifest::render(params.0)))
    }

    #[tool(description = "Render a k8s.mariadb.com/v1alpha1 Database manifest as YAML")]
    async fn k8s_mariadb_com_database_v1alpha1_manifest(
        &self,
        params: rmcp::handler::server::wrapper::Parameters<DataSourceConfig<DatabaseSpec>>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        Ok(render_result(tools::manifest::render(params.0)))
    }

    #[tool(description = "Render a k8s.mariadb.com/v1alpha1 MaxScale manifest as YAML")]
    async fn k8s_mariadb_com_max_scale_v1alpha1_manifest(
        &self,
        params: rmcp::handler::server::wrapper::Parameters<DataSourceConfig<MaxScaleSpec>>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        Ok(render_result(tools::manifest::render(params.0)))
    }

    #[tool(description = "Render a k8s.mariadb.com/v1alpha1 User manifest as YAML")]
    async fn k8s_mariadb_com_user_v1alpha1_manifest(
        &self,
        params: rmcp::handler::server::wrapper::Parameters<DataSourceConfig<UserSpec>>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        Ok(render_result(tools::manifest::render(params.0)))
    }

    #[tool(description = "Validate a k8s.mariadb.com/v1alpha1 YAML manifest (apiVersion, kind, spec shape and constraints)")]
    async fn validate_mariadb_manifest(
        &self,
        params: rmcp::handler::server::wrapper::Parameters<ValidateParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let config = params.0.config;
        match tools::manifest::validate_manifest(&config) {
            Ok(kind) => Ok(CallToolResult::success(vec![Content::text(format!(
                "{} manifest is valid.",
                kind
            ))])),
            Err(errors) => {
                tracing::warn!(errors = errors.len(), "manifest failed validation");
                Ok(CallToolResult::error(vec![Content::text(format!(
                    "Validation errors:\n{}",
                    errors.join("\n")
                ))]))
            }
        }
    }

    #[tool(description = "List the manifest data sources with their apiVersion and kind")]
    async fn list_data_sources(&self) -> Result<CallToolResult, rmcp::ErrorData> {
        let out = tools::reference::list_data_sources_json();
        Ok(CallToolResult::success(vec![Content::text(out)]))
    }

    #[tool(description = "Get the JSON Schema of a data source's attributes")]
    async fn get_data_source_schema(
        &self,
        params: rmcp::handler::server::wrapper::Parameters<SchemaParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        Ok(render_result(tools::reference::data_source_schema_json(
            &params.0.type_name,
        )))
    }
}

#[tool_handler]
impl ServerHandler for MariaDbManifestService {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo::new(
            rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
        )
        .with_instructions(
            "Manifest data sources for k8s.mariadb.com/v1alpha1: render Backup, Database, MaxScale and User manifests as YAML, and validate existing manifests.",
        )
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    telemetry::init_telemetry(&TelemetryConfig::from_env())?;
    tracing::info!(
        data_sources = DataSourceKind::ALL.len(),
        "starting k8s-mariadb-manifests MCP server on stdio"
    );

    let service = MariaDbManifestService::new();
    let transport = stdio();
    let server = service.serve(transport).await?;
    server.waiting().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_result_reports_each_diagnostic() {
        let result = render_result(Err(Error::Validation(vec![
            "metadata.name: must not be empty".to_string(),
            "spec.mariaDbRef.name: must be at least 1 characters".to_string(),
        ])));
        assert_eq!(result.is_error, Some(true));
    }

    #[test]
    fn render_result_success() {
        let result = render_result(Ok("kind: Database\n".to_string()));
        assert_eq!(result.is_error, Some(false));
        assert_eq!(result.content.len(), 1);
    }
}
