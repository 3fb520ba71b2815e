use crate::collectors::MetricSource;
use crate::config::{Config, DisplayRead};
use crate::domain::{percentile, percentiles_interpolated, DeviceReport, Entity, ReservoirSampler, TickReport};
use crate::ui::Renderer;
use anyhow::Result;
use log::{error, info};
use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;

/// Process signals that end the sampling loop: Ctrl+C and, on unix, SIGTERM
/// (the usual stop for a `nohup`ed batch run).
pub struct ShutdownSignal {
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
}

impl ShutdownSignal {
    /// Install the handlers now so a signal arriving before `recv()` is kept
    pub fn listen() -> std::io::Result<Self> {
        Ok(Self {
            #[cfg(unix)]
            terminate: tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?,
        })
    }

    #[cfg(unix)]
    pub async fn recv(mut self) {
        let interrupt = tokio::select! {
            result = tokio::signal::ctrl_c() => Some(result),
            _ = self.terminate.recv() => None,
        };

        match interrupt {
            Some(Ok(())) => info!("Received interrupt"),
            Some(Err(e)) => {
                error!("Failed to listen for Ctrl+C: {}", e);
                self.terminate.recv().await;
                info!("Received SIGTERM");
            }
            None => info!("Received SIGTERM"),
        }
    }

    #[cfg(not(unix))]
    pub async fn recv(self) {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

struct Monitored {
    entity: Entity,
    size: Option<String>,
    sampler: ReservoirSampler,
}

struct Aggregate {
    label: String,
    sampler: ReservoirSampler,
}

/// Polls every entity at a fixed cadence, feeds its reservoir and hands a
/// report to the renderer. Owns all samplers; nothing is shared.
pub struct SamplingLoop<S> {
    source: S,
    devices: Vec<Monitored>,
    aggregate: Option<Aggregate>,
    interval: Duration,
    percentile: f64,
    columns: Vec<f64>,
    scale: i64,
    display_read: DisplayRead,
    state: LoopState,
    ticks: u64,
}

impl<S: MetricSource> SamplingLoop<S> {
    pub fn new(config: &Config, source: S) -> Self {
        let devices = config
            .entities
            .iter()
            .map(|entity| Monitored {
                entity: entity.clone(),
                size: None,
                sampler: ReservoirSampler::new(config.capacity),
            })
            .collect();

        let aggregate = config.aggregate.as_ref().map(|label| Aggregate {
            label: label.clone(),
            sampler: ReservoirSampler::new(config.capacity),
        });

        Self {
            source,
            devices,
            aggregate,
            interval: config.interval(),
            percentile: config.percentile,
            columns: config.columns.clone(),
            scale: config.scale,
            display_read: config.display_read,
            state: LoopState::Running,
            ticks: 0,
        }
    }

    /// Attach capacity labels shown next to device names
    pub fn with_sizes(mut self, mut sizes: HashMap<Entity, String>) -> Self {
        for device in &mut self.devices {
            device.size = sizes.remove(&device.entity);
        }
        self
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn sampler(&self, entity: &Entity) -> Option<&ReservoirSampler> {
        self.devices
            .iter()
            .find(|d| &d.entity == entity)
            .map(|d| &d.sampler)
    }

    pub fn aggregate_sampler(&self) -> Option<&ReservoirSampler> {
        self.aggregate.as_ref().map(|a| &a.sampler)
    }

    /// Terminal: a stopped loop never runs again
    pub fn stop(&mut self) {
        if self.state == LoopState::Running {
            info!("Stopping after {} ticks", self.ticks);
        }
        self.state = LoopState::Stopped;
    }

    /// One sampling pass over every entity
    pub fn tick(&mut self) -> TickReport {
        self.ticks += 1;

        // Feed samplers strictly in configuration order
        let mut recorded = Vec::with_capacity(self.devices.len());
        for device in &mut self.devices {
            let value = self.source.sample(&device.entity);
            device.sampler.add(value);
            recorded.push(value);
        }

        let aggregate_current: i64 = recorded.iter().sum();
        if let Some(aggregate) = &mut self.aggregate {
            aggregate.sampler.add(aggregate_current);
        }

        let devices = self
            .devices
            .iter()
            .zip(&recorded)
            .map(|(device, &value)| {
                let current = match self.display_read {
                    DisplayRead::Recorded => value,
                    DisplayRead::Fresh => self.source.sample(&device.entity),
                };
                self.report(device.entity.to_string(), device.size.clone(), current, &device.sampler, self.scale)
            })
            .collect();

        let aggregate = self.aggregate.as_ref().map(|a| {
            let scale = self.scale.saturating_mul(self.devices.len() as i64);
            self.report(a.label.clone(), None, aggregate_current, &a.sampler, scale)
        });

        TickReport {
            tick: self.ticks,
            percentile: self.percentile,
            bar_width: self.scale,
            columns: self.columns.clone(),
            devices,
            aggregate,
            timestamp: Instant::now(),
        }
    }

    fn report(
        &self,
        label: String,
        size: Option<String>,
        current: i64,
        sampler: &ReservoirSampler,
        scale: i64,
    ) -> DeviceReport {
        let samples = sampler.samples();
        DeviceReport {
            label,
            size,
            current,
            percentile: percentile(samples, self.percentile),
            columns: if self.columns.is_empty() {
                Vec::new()
            } else {
                percentiles_interpolated(samples, &self.columns)
            },
            average: sampler.average(),
            utilization: sampler.utilization(),
            seen: sampler.count(),
            reservoir_fill: sampler.len(),
            scale,
        }
    }

    /// Tick until `shutdown` resolves, then let the renderer print its
    /// closing frame. Returns the number of ticks taken.
    pub async fn run<R, F>(&mut self, renderer: &mut R, shutdown: F) -> Result<u64>
    where
        R: Renderer,
        F: Future<Output = ()>,
    {
        // tokio panics on a zero period
        let mut interval = tokio::time::interval(self.interval.max(Duration::from_micros(1)));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        while self.state == LoopState::Running {
            tokio::select! {
                biased;
                _ = &mut shutdown => self.stop(),
                _ = interval.tick() => {
                    let report = self.tick();
                    if let Err(e) = renderer.render(&report) {
                        error!("Failed to render tick {}: {:#}", report.tick, e);
                    }
                }
            }
        }

        renderer.finish()?;
        Ok(self.ticks)
    }
}
