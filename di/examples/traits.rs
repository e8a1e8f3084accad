use fibre_di::{BindConfig, CallConfig, Registry, ResolveConfig};
use std::sync::Arc;

trait Logger: Send + Sync {
  fn log(&self, message: &str);
}

struct ConsoleLogger;
impl Logger for ConsoleLogger {
  fn log(&self, message: &str) {
    println!("[CONSOLE LOG]: {}", message);
  }
}

// Depends on the abstraction only.
struct ReportService {
  logger: Arc<dyn Logger>,
}

impl ReportService {
  fn generate_report(&self) -> usize {
    self.logger.log("Starting report generation.");
    self.logger.log("Finished report generation.");
    42
  }
}

fn main() -> fibre_di::Result<()> {
  let registry = Registry::new();
  registry.bind_singleton(|| Arc::new(ConsoleLogger) as Arc<dyn Logger>, BindConfig::new())?;

  // The logger parameter is resolved from the binding above.
  registry.bind_singleton(
    |logger: Arc<dyn Logger>| Arc::new(ReportService { logger }),
    BindConfig::new(),
  )?;

  let resolver = registry.resolver();
  let report_service = resolver.resolve::<ReportService>(ResolveConfig::default())?;
  report_service.generate_report();

  // Functions can be called with their parameters resolved as well.
  let mut lines: Option<usize> = None;
  resolver.call(
    |service: Arc<ReportService>| (service.generate_report(),),
    CallConfig::new().returning(&mut lines),
  )?;
  println!("Report has {} lines.", lines.unwrap_or_default());
  Ok(())
}
