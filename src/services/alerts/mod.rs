//! Price-move alert rules, their periodic scanner and notification delivery.

pub mod notifier;
pub mod scanner;
pub mod store;

pub use notifier::{AlertInbox, LogSink, NotificationSink};
pub use scanner::AlertScanner;
pub use store::AlertStore;
