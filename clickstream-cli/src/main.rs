use std::error::Error;
use std::io;
use std::time::Duration;

use clap::Parser;
use log::info;
use rand::thread_rng;

use clickstream::catalog::Catalog;
use clickstream::event::EventGenerator;
use clickstream::kinesis::{KinesisSink, DEFAULT_REGION};
use clickstream::publisher::{MemorySink, Publisher, Sink, DEFAULT_STREAM_NAME};
use clickstream::simulator::{Simulator, DEFAULT_DELAY, DEFAULT_EVENT_COUNT};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Number of events to publish
    #[clap(short, long, default_value_t = DEFAULT_EVENT_COUNT)]
    pub(crate) count: usize,
    /// Pause between events, in seconds
    #[clap(short, long, default_value_t = DEFAULT_DELAY.as_secs_f64())]
    pub(crate) delay: f64,
    /// Kinesis stream receiving the events
    #[clap(long, default_value = DEFAULT_STREAM_NAME)]
    pub(crate) stream_name: String,
    /// AWS region of the stream
    #[clap(long, default_value = DEFAULT_REGION)]
    pub(crate) region: String,
    /// Publish into an in-memory sink instead of Kinesis
    #[clap(long)]
    pub(crate) dry_run: bool,
}

fn simulate<S: Sink>(cli: &Cli, sink: S) -> Result<usize, Box<dyn Error>> {
    let delay = Duration::try_from_secs_f64(cli.delay)?;
    let mut rng = thread_rng();
    let catalog = Catalog::new(&mut rng);
    let generator = EventGenerator::new(&catalog)?;
    let mut publisher = Publisher::new(sink, cli.stream_name.as_str());

    let sent = Simulator::new(cli.count, delay).run(
        &generator,
        &mut publisher,
        &mut rng,
        &mut io::stdout().lock(),
    )?;
    Ok(sent)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let sent = if cli.dry_run {
        info!("Dry run: events stay in memory");
        simulate(&cli, MemorySink::new())?
    } else {
        simulate(&cli, KinesisSink::connect(&cli.region)?)?
    };
    info!("Run finished after {} events", sent);

    Ok(())
}
