//! Survey nearby Decawave DWM1001 nodes and save the report
//!
//! Run with: cargo run --example survey [OUTPUT_PATH]

use decawave_ble_survey::{BleScanner, Result, Survey, SurveyConfig, TextReportWriter};
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("decawave_ble_survey=info".parse().unwrap()),
        )
        .init();

    let mut config = SurveyConfig::default();
    if let Some(path) = env::args().nth(1) {
        config = config.with_output_path(path);
    }

    println!(
        "Scanning for {:?} for devices named {}*...\n",
        config.scan_duration, config.name_prefix
    );

    let scanner = BleScanner::new(&config).await?;
    let survey = Survey::new(scanner, &config)?;
    let writer = TextReportWriter::new(&config.output_path);

    let outcome = survey.run(&writer).await?;

    println!("\n--- Survey Complete ---");
    println!("Advertisements seen: {}", outcome.scanned);
    println!(
        "Decawave devices reported: {} of {}",
        outcome.succeeded(),
        outcome.attempted()
    );

    for device in &outcome.report.devices {
        println!(
            "  {} {} - {} services, {} characteristics",
            device.address(),
            device.device_name().unwrap_or("<unnamed>"),
            device.services.len(),
            device.characteristic_count()
        );
        if let Some(cause) = &device.discovery_failure {
            println!("    service discovery failed: {}", cause);
        }
        for characteristic in device.services.iter().flat_map(|s| &s.characteristics) {
            if let Some(value) = &characteristic.value {
                println!("    {}: {}", characteristic.uuid, value);
            }
        }
    }

    for failure in &outcome.failures {
        println!("  FAILED {}", failure);
    }

    println!("\nReport saved to {}", writer.path().display());

    Ok(())
}
