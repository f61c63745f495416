/* src/server/core/rust/src/measure.rs */

use std::time::{Duration, Instant};

use tracing::debug;

struct Phase {
  name: &'static str,
  started: Instant,
  elapsed: Option<Duration>,
}

/// Collects named phase durations for one request. Purely observational.
#[derive(Default)]
pub struct Measure {
  phases: Vec<Phase>,
}

impl Measure {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn start(&mut self, name: &'static str) {
    self.phases.push(Phase { name, started: Instant::now(), elapsed: None });
  }

  /// Close the most recent open phase called `name`. Unknown names are ignored.
  pub fn stop(&mut self, name: &'static str) {
    if let Some(phase) = self.phases.iter_mut().rev().find(|p| p.name == name && p.elapsed.is_none()) {
      phase.elapsed = Some(phase.started.elapsed());
    }
  }

  /// Duration of the most recent finished phase called `name`.
  pub fn elapsed(&self, name: &str) -> Option<Duration> {
    self.phases.iter().rev().filter(|p| p.name == name).find_map(|p| p.elapsed)
  }

  /// Finished phases in start order.
  pub fn finished(&self) -> Vec<(&'static str, Duration)> {
    self.phases.iter().filter_map(|p| p.elapsed.map(|d| (p.name, d))).collect()
  }

  /// One `name: 1.234ms` line per finished phase.
  pub fn report(&self) -> String {
    self
      .finished()
      .iter()
      .map(|(name, d)| format!("{name}: {:.3}ms", d.as_secs_f64() * 1000.0))
      .collect::<Vec<_>>()
      .join("\n")
  }

  pub fn print(&self) {
    debug!(phases = %self.report().replace('\n', ", "), "render timings");
  }
}
