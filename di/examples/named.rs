use fibre_di::{install, resolve, BindConfig, Registry};
use std::sync::Arc;

// --- Abstraction and Implementations ---
trait MessageSender: Send + Sync {
  fn send(&self, to: &str, message: &str) -> String;
}

struct EmailSender;
impl MessageSender for EmailSender {
  fn send(&self, to: &str, message: &str) -> String {
    format!("Sending email to {}: '{}'", to, message)
  }
}

struct SmsSender;
impl MessageSender for SmsSender {
  fn send(&self, to: &str, message: &str) -> String {
    format!("Sending SMS to {}: '{}'", to, message)
  }
}

fn main() -> fibre_di::Result<()> {
  // --- Registration ---
  let registry = Registry::new();
  registry.bind_singleton(
    || Arc::new(EmailSender) as Arc<dyn MessageSender>,
    BindConfig::named("email"),
  )?;
  registry.bind_singleton(
    || Arc::new(SmsSender) as Arc<dyn MessageSender>,
    BindConfig::new().names(["sms", "text"]),
  )?;
  install(registry.resolver());

  // --- Resolution ---
  let email_notifier = resolve!(dyn MessageSender, "email")?;
  let sms_notifier = resolve!(dyn MessageSender, "text")?;

  let result1 = email_notifier.send("test@example.com", "Hello from Fibre!");
  let result2 = sms_notifier.send("+123456789", "Hello from Fibre!");

  println!("{}", result1);
  println!("{}", result2);

  assert!(result1.contains("email"));
  assert!(result2.contains("SMS"));
  Ok(())
}
