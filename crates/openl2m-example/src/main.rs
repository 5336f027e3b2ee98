//! OpenL2M client walkthrough.
//!
//! Reads `OPENL2M_URL` and `OPENL2M_TOKEN` (plus the optional
//! `OPENL2M_VERIFY_TLS` and `OPENL2M_TIMEOUT_SECS`), then prints server
//! statistics, the device listing and the interfaces of the first device.
//!
//! Setting `OPENL2M_EXAMPLE_INTERFACE` and `OPENL2M_EXAMPLE_DESCRIPTION` also
//! changes that interface's description on the first writable device.
//! Log output is controlled with `RUST_LOG`, e.g. `RUST_LOG=openl2m_client=trace`.

use anyhow::{Context, Result};
use openl2m_client::{DeviceFilter, Server, ServerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ServerConfig::from_env().context("loading OpenL2M settings")?;
    let server = Server::from_config(&config)?;
    info!(url = %server.base_url(), "connected");

    let stats = server.stats().await.context("reading server stats")?;
    println!("Server statistics:");
    for (key, value) in stats.iter() {
        println!("  {key}: {value}");
    }

    let environment = server
        .environment()
        .await
        .context("reading server environment")?;
    println!("Server environment:");
    for (key, value) in environment.iter() {
        println!("  {key}: {value}");
    }

    let devices = server
        .list_devices(&DeviceFilter::all())
        .await
        .context("listing devices")?;
    for group in devices.groups() {
        println!("Group {}: {}", group.id, group.display_name);
        for device in devices.in_group(group.id) {
            println!("  Device {}: {} - {}", device.id, device.name, device.url);
        }
    }

    let Some(first) = devices.iter().next() else {
        println!("No devices available to this token.");
        return Ok(());
    };

    let detail = first
        .handle(&server)
        .get()
        .await
        .with_context(|| format!("reading device {}", first.name))?;
    println!(
        "\nHostname: {}",
        detail.hostname().unwrap_or(first.name.as_str())
    );
    for interface in &detail.interfaces {
        println!(
            "id={}: {} - {}",
            interface.id,
            interface.name,
            interface.description.as_deref().unwrap_or("")
        );
    }

    if let (Ok(interface), Ok(description)) = (
        std::env::var("OPENL2M_EXAMPLE_INTERFACE"),
        std::env::var("OPENL2M_EXAMPLE_DESCRIPTION"),
    ) {
        let target = devices
            .iter()
            .find(|device| device.read_only != Some(true))
            .context("no writable device available")?;
        let result = target
            .handle(&server)
            .set_interface_description(interface.as_str(), description)
            .await
            .with_context(|| format!("changing description on {}", target.name))?;
        println!(
            "Description changed on {}: {}",
            target.name,
            result.message.as_deref().unwrap_or("OK")
        );
    }

    Ok(())
}
