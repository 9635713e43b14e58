//! Runs one lifecycle operation against one resource or data source instance.

use serde::Serialize;
use std::path::Path;
use tokio::io::AsyncReadExt;
use tracing::{info_span, Instrument};

use crate::{
    client::FusionAuthClient,
    config::{Kind, Operation, RunArgs},
    diagnostics::{Diagnostic, Diagnostics},
    error::ProviderError,
    provider::Provider,
    schema::Schema,
    state::ResourceData,
};

#[derive(Debug, Clone)]
pub struct Request {
    pub kind: Kind,
    pub type_name: String,
    pub op: Operation,
    pub data: ResourceData,
    pub schema_version: i64,
    pub import_id: Option<String>,
}

/// Outcome of an operation. `state` is `None` once the object no longer exists.
#[derive(Debug, Serialize)]
pub struct Response {
    pub state: Option<ResourceData>,
    pub diagnostics: Diagnostics,
}

impl Response {
    fn failed(diagnostics: Diagnostics, state: Option<ResourceData>) -> Self {
        Response { state, diagnostics }
    }
}

/// Fills in defaults unless validation already failed. Returns false on any error.
fn prepare(schema: &Schema, data: &mut ResourceData, diagnostics: &Diagnostics) -> bool {
    if diagnostics.has_errors() {
        return false;
    }
    schema.block.apply_defaults(&mut data.attributes);
    true
}

async fn execute_resource(
    provider: &Provider,
    client: &FusionAuthClient,
    request: Request,
) -> Result<Response, ProviderError> {
    let resource = provider.resource(&request.type_name)?;
    let schema = resource.schema();
    let mut data = request.data;
    let mut diagnostics = Diagnostics::new();

    match request.op {
        Operation::Validate => {
            diagnostics.extend(schema.validate(&data.attributes));
        }
        Operation::Create => {
            diagnostics.extend(schema.validate_state(&data.attributes));
            if !prepare(&schema, &mut data, &diagnostics) {
                return Ok(Response::failed(diagnostics, Some(data)));
            }
            resource.create(client, &mut data).await?;
        }
        Operation::Read => {
            resource.read(client, &mut data).await?;
            if data.id().is_none() {
                return Ok(Response {
                    state: None,
                    diagnostics,
                });
            }
        }
        Operation::Update => {
            diagnostics.extend(schema.validate_state(&data.attributes));
            if !prepare(&schema, &mut data, &diagnostics) {
                return Ok(Response::failed(diagnostics, Some(data)));
            }
            resource.update(client, &mut data).await?;
        }
        Operation::Delete => {
            resource.delete(client, &data).await?;
            return Ok(Response {
                state: None,
                diagnostics,
            });
        }
        Operation::Import => {
            let id = request
                .import_id
                .or_else(|| data.id.clone())
                .ok_or(ProviderError::MissingId)?;
            data = resource.import(client, &id).await?;
        }
        Operation::Upgrade => {
            data.attributes = resource.upgrade_state(request.schema_version, data.attributes)?;
        }
    }
    Ok(Response {
        state: Some(data),
        diagnostics,
    })
}

async fn execute_data_source(
    provider: &Provider,
    client: &FusionAuthClient,
    request: Request,
) -> Result<Response, ProviderError> {
    let data_source = provider.data_source(&request.type_name)?;
    let schema = data_source.schema();
    let mut data = request.data;
    let mut diagnostics = Diagnostics::new();

    match request.op {
        Operation::Validate => {
            diagnostics.extend(schema.validate(&data.attributes));
        }
        Operation::Read => {
            diagnostics.extend(schema.validate(&data.attributes));
            if !prepare(&schema, &mut data, &diagnostics) {
                return Ok(Response::failed(diagnostics, Some(data)));
            }
            data_source.read(client, &mut data).await?;
        }
        op => {
            diagnostics.push(Diagnostic::error(format!(
                "Data sources only support validate and read, not {op:?}"
            )));
            return Ok(Response::failed(diagnostics, Some(data)));
        }
    }
    Ok(Response {
        state: Some(data),
        diagnostics,
    })
}

/// Runs a request. Failures are reported as diagnostics, with the input state
/// handed back unchanged.
pub async fn execute(provider: &Provider, client: &FusionAuthClient, request: Request) -> Response {
    let span = info_span!("operation", type_name = %request.type_name, op = ?request.op);
    let input = request.data.clone();
    let result = async {
        match request.kind {
            Kind::Resource => execute_resource(provider, client, request).await,
            Kind::Data => execute_data_source(provider, client, request).await,
        }
    }
    .instrument(span)
    .await;
    match result {
        Ok(response) => response,
        Err(error) => {
            tracing::error!(reason = %error, "Operation failed");
            Response::failed(error.into(), Some(input))
        }
    }
}

async fn read_input(path: Option<&Path>) -> Result<String, std::io::Error> {
    match path {
        Some(path) => tokio::fs::read_to_string(path).await,
        None => {
            let mut input = String::new();
            tokio::io::stdin().read_to_string(&mut input).await?;
            Ok(input)
        }
    }
}

/// Parses instance JSON. Empty input is an instance with no id and no attributes.
pub fn parse_state(input: &str) -> Result<ResourceData, ProviderError> {
    if input.trim().is_empty() {
        return Ok(ResourceData::default());
    }
    Ok(serde_json::from_str(input)?)
}

/// Entry point of the `run` command. Prints the response as JSON on stdout and
/// fails when it carries an error diagnostic.
pub async fn run(args: RunArgs) -> Result<(), ()> {
    let input = match read_input(args.state.as_deref()).await {
        Ok(input) => input,
        Err(error) => {
            tracing::error!(reason = %error, path = ?args.state, "Could not read instance state");
            return Err(());
        }
    };

    let response = match (parse_state(&input), FusionAuthClient::from_args(&args.connection)) {
        (Ok(data), Ok(client)) => {
            let request = Request {
                kind: args.kind,
                type_name: args.type_name,
                op: args.op,
                data,
                schema_version: args.schema_version,
                import_id: args.id,
            };
            execute(&Provider::new(), &client, request).await
        }
        (Err(error), _) | (_, Err(error)) => Response::failed(error.into(), None),
    };

    match serde_json::to_string_pretty(&response) {
        Ok(output) => println!("{output}"),
        Err(error) => {
            tracing::error!(reason = %error, "Could not serialize response");
            return Err(());
        }
    }
    if response.diagnostics.has_errors() {
        Err(())
    } else {
        Ok(())
    }
}
