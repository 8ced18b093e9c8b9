// Demo binary: runs one unit of work through every delivery surface.
//
// Usage: storo-method-demo [pool.toml]
// Set RUST_LOG=debug to see the worker pool and callback worker logs.

use anyhow::{Context, Result};
use log::{error, info};
use std::thread;
use std::time::Duration;
use storo_method::{Method, PoolConfig, WorkerPool, with_failure};

/// Pretends to load a record from slow storage.
struct LoadRecord {
    key: String,
    delay: Duration,
}

impl Method for LoadRecord {
    type Output = String;
    type Error = std::io::Error;

    fn execute(&self) -> Result<String, std::io::Error> {
        thread::sleep(self.delay);
        if self.key.is_empty() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "empty key",
            ));
        }
        Ok(format!("record:{}", self.key))
    }
}

fn load(key: &str) -> LoadRecord {
    LoadRecord {
        key: key.to_string(),
        delay: Duration::from_millis(50),
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => PoolConfig::from_file(&path)
            .with_context(|| format!("Failed to load pool config from {path}"))?,
        None => PoolConfig::default(),
    };
    let pool = WorkerPool::with_config(&config).context("Failed to start worker pool")?;

    let value = load("inline").execute()?;
    info!("execute: {value}");

    let stream = load("streamed").as_stream(&pool);
    let streamed = pool
        .handle()
        .block_on(stream.subscribe().value())
        .context("stream subscription failed")?;
    info!("as_stream: {streamed}");

    let handle = load("called-back").as_callback(Some(with_failure(
        |value: String| info!("as_callback: {value}"),
        |err: &storo_method::MethodError<std::io::Error>| error!("as_callback failed: {err}"),
    )))?;
    handle.join()?;

    // Failures reach the failure half of the listener, never the success half.
    let handle = load("").as_callback(Some(|value: String| info!("unexpected: {value}")))?;
    if let Err(err) = handle.join() {
        info!("failing callback reported: {err}");
    }

    Ok(())
}
