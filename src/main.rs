//! ringlog demo binary
//!
//! Constructs an `AsyncLogger` from a config file (writing sane defaults
//! if one doesn't exist yet), logs at each level, exercises the
//! producer-side level filter, and prints the resulting statistics
//! snapshot once the worker has drained.

use ringlog::{ AsyncLogger, ConfigLoader, Level };

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("ringlog - async logging engine demo");
    println!("====================================");

    let config_path = std::env::args().nth(1).unwrap_or_else(|| "ringlog.conf".to_string());
    let config = ConfigLoader::load(&config_path)?;
    println!("loaded config from {config_path} (defaults written if it didn't exist)");

    let logger = AsyncLogger::new(config)?;

    logger.debug(format_args!("demo starting up"));
    logger.info(format_args!("ringlog {}", ringlog::VERSION));

    for i in 0..1000 {
        logger.info(format_args!("processing item {i}"));
        if i % 250 == 0 {
            logger.warn(format_args!("item {i} took longer than expected"));
        }
    }

    logger.error(format_args!("simulated failure on shutdown path"));

    // The worker drains concurrently; give it a moment before reading
    // stats (Drop below will also block until it has fully drained).
    std::thread::sleep(std::time::Duration::from_millis(50));

    let stats = logger.stats();
    println!("\nstats snapshot:");
    println!("  processed: {}", stats.processed);
    println!("  dropped:   {}", stats.dropped);
    println!("  rotations: {}", stats.rotations);
    println!("  worker state: {:?}", logger.worker_state());

    logger.set_level(Level::Warn);
    logger.info(format_args!("this is filtered out at the producer"));
    logger.warn(format_args!("this still gets through"));

    drop(logger);
    println!("\nshutdown complete");

    Ok(())
}
