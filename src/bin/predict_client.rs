//! Example client for the ML Inference Service
//!
//! Usage: `predict-client [--url http://localhost:8000]` (or set `API_URL`)

use anyhow::Context;
use clap::Parser;
use reqwest::Client;
use serde_json::{json, Value};

struct Example {
    name: &'static str,
    features: [f64; 4],
    expected_class: u64,
}

const EXAMPLES: &[Example] = &[
    Example { name: "Iris Setosa", features: [5.1, 3.5, 1.4, 0.2], expected_class: 0 },
    Example { name: "Iris Versicolor", features: [6.4, 3.2, 4.5, 1.5], expected_class: 1 },
    Example { name: "Iris Virginica", features: [6.3, 3.3, 6.0, 2.5], expected_class: 2 },
];

#[derive(Parser, Debug)]
#[command(name = "predict-client")]
#[command(about = "Exercise a running ML Inference Service")]
struct Args {
    /// Base URL of the service
    #[arg(long, env = "API_URL", default_value = "http://localhost:8000")]
    url: String,
}

impl Args {
    fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let base = args.base_url().to_string();
    let client = Client::new();

    println!("{}", "=".repeat(50));
    println!("ML Inference Service - Client Examples");
    println!("{}", "=".repeat(50));

    println!("\n1. Health Check");
    get(&client, &format!("{}/health", base)).await?;

    println!("\n2. Readiness Check");
    get(&client, &format!("{}/ready", base)).await?;

    for (i, example) in EXAMPLES.iter().enumerate() {
        println!("\n{}. Prediction - {}", i + 3, example.name);
        let request_id = format!("example-{:03}", i + 1);
        if let Some(result) = predict(&client, &base, &example.features, &request_id).await? {
            println!(
                "   Expected: {}, Predicted: {}, Confidence: {:.3}",
                example.expected_class,
                result["prediction"],
                result["confidence"].as_f64().unwrap_or_default()
            );
        }
    }

    println!("\n{}. Invalid Request (should fail)", EXAMPLES.len() + 3);
    predict(&client, &base, &[5.1, 3.5], "invalid-001").await?;

    println!("\n{}", "=".repeat(50));
    println!("All examples completed!");
    Ok(())
}

async fn get(client: &Client, url: &str) -> anyhow::Result<()> {
    let response = client.get(url).send().await.with_context(|| format!("GET {}", url))?;
    println!("Status: {}", response.status().as_u16());
    let body: Value = response.json().await?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

async fn predict(
    client: &Client,
    base: &str,
    features: &[f64],
    request_id: &str,
) -> anyhow::Result<Option<Value>> {
    let payload = json!({ "features": features, "request_id": request_id });
    let response = client
        .post(format!("{}/predict", base))
        .json(&payload)
        .send()
        .await
        .context("POST /predict")?;

    let status = response.status();
    println!("Prediction Request: {}", request_id);
    println!("Status: {}", status.as_u16());

    let body: Value = response.json().await?;
    if status.is_success() {
        println!("{}", serde_json::to_string_pretty(&body)?);
        Ok(Some(body))
    } else {
        println!("Error: {}", body);
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_flag_forms() {
        let args = Args::try_parse_from(["predict-client", "--url=http://h:9000/"]).unwrap();
        assert_eq!(args.base_url(), "http://h:9000");

        let args = Args::try_parse_from(["predict-client", "--url", "http://h:9001"]).unwrap();
        assert_eq!(args.base_url(), "http://h:9001");
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        assert!(Args::try_parse_from(["predict-client", "--port", "9000"]).is_err());
    }
}
