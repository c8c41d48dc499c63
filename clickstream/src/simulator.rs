use std::io::Write;
use std::thread;
use std::time::Duration;

use log::info;
use rand::Rng;

use crate::error::SimError;
use crate::event::EventGenerator;
use crate::publisher::{Publisher, Sink};

pub const DEFAULT_EVENT_COUNT: usize = 100;
pub const DEFAULT_DELAY: Duration = Duration::from_millis(200);

/// Publishes a fixed number of generated events, pausing between each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Simulator {
    count: usize,
    delay: Duration,
}

impl Default for Simulator {
    fn default() -> Self {
        Simulator::new(DEFAULT_EVENT_COUNT, DEFAULT_DELAY)
    }
}

impl Simulator {
    #[must_use]
    pub fn new(count: usize, delay: Duration) -> Self {
        Simulator { count, delay }
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Generates and publishes `count` events, writing progress to `out`.
    /// Returns the number of events published.
    ///
    /// # Errors
    /// Errors on the first failed publish or console write. No event after
    /// the failing one is generated or sent.
    pub fn run<S, R, W>(
        &self,
        generator: &EventGenerator<'_>,
        publisher: &mut Publisher<S>,
        rng: &mut R,
        out: &mut W,
    ) -> Result<usize, SimError>
    where
        S: Sink,
        R: Rng + ?Sized,
        W: Write,
    {
        info!(
            "Simulating {} events against '{}' every {:?}",
            self.count,
            publisher.stream_name(),
            self.delay
        );
        writeln!(
            out,
            "Starting to send {} events to Kinesis stream '{}'...",
            self.count,
            publisher.stream_name()
        )?;

        for sent in 0..self.count {
            let event = generator.generate(rng);
            let receipt = publisher.publish(&event)?;
            writeln!(
                out,
                "Event {}/{} sent to Kinesis. Sequence number: {}",
                sent + 1,
                self.count,
                receipt.sequence_number
            )?;
            writeln!(out, "Event data: {}", serde_json::to_string_pretty(&event)?)?;
            if !self.delay.is_zero() {
                thread::sleep(self.delay);
            }
        }

        writeln!(out, "Done sending events.")?;
        info!("Published {} events", self.count);
        Ok(self.count)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::catalog::Catalog;
    use crate::publisher::MemorySink;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_simulator() {
        let simulator = Simulator::default();
        assert_eq!(simulator.count(), 100);
        assert_eq!(simulator.delay(), Duration::from_millis(200));
    }

    #[test]
    fn test_console_output() {
        let mut rng = StdRng::seed_from_u64(11);
        let catalog = Catalog::new(&mut rng);
        let generator = EventGenerator::new(&catalog).unwrap();
        let mut publisher = Publisher::new(MemorySink::new(), "ecommerce-events");
        let mut out = Vec::new();

        let sent = Simulator::new(3, Duration::ZERO)
            .run(&generator, &mut publisher, &mut rng, &mut out)
            .unwrap();
        assert_eq!(sent, 3);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "Starting to send 3 events to Kinesis stream 'ecommerce-events'..."
        );
        assert_eq!(
            lines[1],
            format!(
                "Event 1/3 sent to Kinesis. Sequence number: {}",
                publisher.sink().records()[0].sequence_number
            )
        );
        assert_eq!(lines[2], "Event data: {");
        assert!(text.contains("Event 3/3 sent to Kinesis."));
        assert!(text.contains("\"event_type\": "));
        assert_eq!(lines.last(), Some(&"Done sending events."));
    }

    #[test]
    fn test_zero_events() {
        let mut rng = StdRng::seed_from_u64(12);
        let catalog = Catalog::new(&mut rng);
        let generator = EventGenerator::new(&catalog).unwrap();
        let mut publisher = Publisher::new(MemorySink::new(), "ecommerce-events");
        let mut out = Vec::new();

        let sent = Simulator::new(0, Duration::ZERO)
            .run(&generator, &mut publisher, &mut rng, &mut out)
            .unwrap();
        assert_eq!(sent, 0);
        assert_eq!(publisher.sink().calls(), 0);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Starting to send 0 events to Kinesis stream 'ecommerce-events'...\nDone sending events.\n"
        );
    }

    #[test]
    fn test_stops_on_failed_publish() {
        let mut rng = StdRng::seed_from_u64(13);
        let catalog = Catalog::new(&mut rng);
        let generator = EventGenerator::new(&catalog).unwrap();
        let mut publisher = Publisher::new(MemorySink::failing_at(2), "ecommerce-events");
        let mut out = Vec::new();

        let res = Simulator::new(5, Duration::ZERO).run(&generator, &mut publisher, &mut rng, &mut out);
        assert!(matches!(res, Err(SimError::Sink { .. })));
        assert_eq!(publisher.sink().calls(), 2);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Event 1/5 sent"));
        assert!(!text.contains("Event 2/5 sent"));
        assert!(!text.contains("Done sending events."));
    }
}
