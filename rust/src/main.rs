mod config;
mod telemetry;

use std::io::Read;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use securelend::{SecureLend, SecureLendError};

use crate::config::{parse_cli_config, CliConfig, Operation, RequestSource};

#[tokio::main]
async fn main() {
    let config = match parse_cli_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("[securelend] Error: {err}");
            std::process::exit(1);
        }
    };

    telemetry::init_tracing(config.log_level);

    if let Err(err) = run(config).await {
        eprintln!("[securelend] Error ({}): {}", err.kind(), err.message());
        if let Some(details) = err.details() {
            tracing::debug!("error details: {details}");
        }
        std::process::exit(1);
    }
}

async fn run(config: CliConfig) -> Result<(), SecureLendError> {
    let mut builder = SecureLend::builder(config.api_key.as_str())
        .transport(config.transport)
        .debug(config.debug);
    if let Some(mcp_url) = &config.mcp_url {
        builder = builder.mcp_url(mcp_url.as_str());
    }
    let client = builder.build()?;

    tracing::debug!(
        "Running {} against {}",
        config.operation.label(),
        client.mcp().endpoint()
    );

    let request = config.request.as_ref();
    let output = match &config.operation {
        Operation::LoansCompare => {
            let request = read_request(request)?;
            to_output(&client.loans().compare(&request).await?)?
        }
        Operation::LoansCalculate => {
            let params = read_request(request)?;
            to_output(&client.loans().calculate(&params).await?)?
        }
        Operation::BankingCompare => {
            let request = read_request(request)?;
            to_output(&client.banking().compare(&request).await?)?
        }
        Operation::CardsCompare => {
            let request = read_request(request)?;
            to_output(&client.credit_cards().compare(&request).await?)?
        }
        Operation::ToolsList => to_output(&client.mcp().list_tools().await?)?,
        Operation::ToolsCall { name } => {
            let arguments = match request {
                Some(_) => read_request::<Value>(request)?,
                None => Value::Object(Default::default()),
            };
            client.mcp().call_tool(name, arguments).await?.to_value()
        }
    };

    client.mcp().disconnect().await;

    let rendered = serde_json::to_string_pretty(&output).map_err(|err| {
        SecureLendError::validation(format!("Failed to render output: {err}"))
    })?;
    println!("{rendered}");
    Ok(())
}

fn read_request<T: DeserializeOwned>(source: Option<&RequestSource>) -> Result<T, SecureLendError> {
    let (label, body) = match source {
        Some(RequestSource::File(path)) => {
            let body = std::fs::read_to_string(path).map_err(|err| {
                SecureLendError::validation(format!(
                    "Failed to read request file {}: {err}",
                    path.display()
                ))
            })?;
            (path.display().to_string(), body)
        }
        Some(RequestSource::Stdin) => {
            let mut body = String::new();
            std::io::stdin().read_to_string(&mut body).map_err(|err| {
                SecureLendError::validation(format!("Failed to read request from stdin: {err}"))
            })?;
            ("stdin".to_string(), body)
        }
        None => return Err(SecureLendError::validation("A request is required")),
    };

    serde_json::from_str(&body).map_err(|err| {
        SecureLendError::validation(format!("Invalid request JSON in {label}: {err}"))
    })
}

fn to_output<T: Serialize>(value: &T) -> Result<Value, SecureLendError> {
    serde_json::to_value(value)
        .map_err(|err| SecureLendError::validation(format!("Failed to render output: {err}")))
}
