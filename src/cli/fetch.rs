use super::ui;
use crate::core::config::AppConfig;
use crate::core::handler::{RequestHandler, ResponseEnvelope};
use crate::providers::ProviderKind;
use crate::providers::http::ReqwestExecutor;
use anyhow::{Result, anyhow};
use axum::http::Method;
use comfy_table::Cell;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Arguments of the `fetch` subcommand.
#[derive(Debug, Clone)]
pub struct FetchArgs {
    pub provider: ProviderKind,
    pub indicator: String,
    pub country: String,
    pub start_year: String,
    pub end_year: String,
    pub json: bool,
}

impl FetchArgs {
    fn query(&self) -> HashMap<String, String> {
        HashMap::from([
            ("indicator".to_string(), self.indicator.clone()),
            ("country".to_string(), self.country.clone()),
            ("startYear".to_string(), self.start_year.clone()),
            ("endYear".to_string(), self.end_year.clone()),
        ])
    }
}

/// Collects every `year -> number` leaf below `values`. World Bank bodies
/// are flat; IMF bodies nest the years under indicator and country.
pub fn collect_year_values(body: &Value) -> BTreeMap<String, f64> {
    fn walk(node: &Value, out: &mut BTreeMap<String, f64>) {
        if let Value::Object(map) = node {
            for (key, child) in map {
                match child.as_f64() {
                    Some(number) => {
                        out.insert(key.clone(), number);
                    }
                    None => walk(child, out),
                }
            }
        }
    }

    let mut out = BTreeMap::new();
    if let Some(values) = body.get("values") {
        walk(values, &mut out);
    }
    out
}

/// Renders a successful envelope body as a year/value table.
pub fn render_table(args: &FetchArgs, body: &Value) -> String {
    let rows = collect_year_values(body);

    let mut output = format!(
        "{} {} ({}-{})\n\n",
        ui::style_text(&args.indicator, ui::StyleType::Title),
        args.country,
        args.start_year,
        args.end_year
    );

    if rows.is_empty() {
        output.push_str(&ui::style_text("No observations", ui::StyleType::Subtle));
        return output;
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Year"), ui::header_cell("Value")]);
    for (year, value) in rows {
        table.add_row(vec![Cell::new(year), ui::value_cell(value)]);
    }
    output.push_str(&table.to_string());
    output
}

fn envelope_failure(envelope: &ResponseEnvelope) -> anyhow::Error {
    let message = serde_json::from_str::<Value>(&envelope.body)
        .ok()
        .map(|body| {
            let error = body["error"].as_str().unwrap_or("Request failed").to_string();
            match body["message"].as_str() {
                Some(message) => format!("{error}: {message}"),
                None => error,
            }
        })
        .unwrap_or_else(|| envelope.body.clone());
    anyhow!(
        "{} (status {})",
        ui::style_text(&message, ui::StyleType::Error),
        envelope.status_code
    )
}

/// Runs one request through the proxy pipeline and returns the output text.
pub async fn fetch(config: &AppConfig, args: &FetchArgs) -> Result<String> {
    let handler = RequestHandler::new(
        args.provider.adapter(&config.providers),
        Arc::new(ReqwestExecutor::new()?),
        config.timeout(),
    );

    let spinner = ui::new_spinner(format!("Fetching from {}", handler.provider_name()));
    let envelope = handler.handle(&Method::GET, &args.query()).await;
    spinner.finish_and_clear();

    if envelope.status_code != 200 {
        return Err(envelope_failure(&envelope));
    }

    let body: Value = serde_json::from_str(&envelope.body)?;
    if args.json {
        return Ok(serde_json::to_string_pretty(&body)?);
    }
    Ok(render_table(args, &body))
}
