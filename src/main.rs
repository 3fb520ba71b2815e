use anyhow::{Context, Result};
use clap::Parser;
use qdepth::collectors::{BlockDeviceCollector, InflightCollector};
use qdepth::config::{
    Config, DisplayRead, DEFAULT_CAPACITY, DEFAULT_INTERVAL_SECS, DEFAULT_PERCENTILE,
    DEFAULT_SCALE, DEFAULT_SYSFS_ROOT,
};
use qdepth::domain::Entity;
use qdepth::monitor::{SamplingLoop, ShutdownSignal};
use qdepth::ui::TerminalRenderer;
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "qdepth")]
#[command(about = "Block device queue depth monitor - current in-flight I/O against its long-term percentile")]
#[command(version)]
struct Args {
    /// Devices to monitor (e.g. sdc nvme0n1); all block devices if omitted
    devices: Vec<String>,

    /// Sampling interval in seconds
    #[arg(short, long, default_value_t = DEFAULT_INTERVAL_SECS)]
    interval: f64,

    /// Samples kept per device for percentile estimation
    #[arg(short, long, default_value_t = DEFAULT_CAPACITY)]
    capacity: usize,

    /// Queue depth shown as a full bar
    #[arg(short, long, default_value_t = DEFAULT_SCALE)]
    scale: i64,

    /// Percentile shown as the long-term shadow
    #[arg(short, long, default_value_t = DEFAULT_PERCENTILE)]
    percentile: f64,

    /// Extra interpolated percentile columns, e.g. 50,99,99.9
    #[arg(long, value_delimiter = ',')]
    columns: Vec<f64>,

    /// Add a row tracking the summed queue depth of all devices
    #[arg(long, value_name = "LABEL")]
    aggregate: Option<String>,

    /// Re-read devices after sampling so the display shows the freshest value
    #[arg(long)]
    reread: bool,

    /// Append frames instead of redrawing the screen (for nohup / logs)
    #[arg(long)]
    batch: bool,

    /// Root of the block device tree in sysfs
    #[arg(long, default_value = DEFAULT_SYSFS_ROOT)]
    sysfs_root: PathBuf,
}

fn resolve_entities(args: &Args, block: &BlockDeviceCollector) -> Result<Vec<Entity>> {
    if args.devices.is_empty() {
        return block
            .discover()
            .context("Failed to discover block devices");
    }

    let requested: Vec<Entity> = args.devices.iter().map(|d| Entity::new(d.as_str())).collect();
    Ok(block.resolve(&requested))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    let block = BlockDeviceCollector::new(&args.sysfs_root);
    let entities = resolve_entities(&args, &block)?;

    let config = Config {
        entities,
        interval_secs: args.interval,
        capacity: args.capacity,
        scale: args.scale,
        percentile: args.percentile,
        columns: args.columns.clone(),
        aggregate: args.aggregate.clone(),
        display_read: if args.reread { DisplayRead::Fresh } else { DisplayRead::Recorded },
        batch: args.batch,
        sysfs_root: args.sysfs_root.clone(),
    };
    config.validate().context("Invalid configuration")?;

    log::info!(
        "Monitoring {} devices every {:.3}s (reservoir {}, P{})",
        config.entities.len(),
        config.interval_secs,
        config.capacity,
        config.percentile
    );

    // Capacity labels are static, read them once
    let sizes: HashMap<Entity, String> = config
        .entities
        .iter()
        .map(|e| (e.clone(), block.size_label(e)))
        .collect();

    let source = InflightCollector::new(&config.sysfs_root);
    let mut sampling = SamplingLoop::new(&config, source).with_sizes(sizes);
    let mut renderer = TerminalRenderer::stdout(config.batch);

    if config.batch {
        log::info!("Starting in batch mode");
    } else {
        println!("Block I/O Queue Monitor - Ctrl+C to stop");
        println!("Building initial sample set...");
    }

    let shutdown = ShutdownSignal::listen().context("Failed to install signal handlers")?;
    let ticks = sampling.run(&mut renderer, shutdown.recv()).await?;
    log::info!("Collected {} ticks", ticks);

    Ok(())
}
