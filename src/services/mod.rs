pub mod alerts;
pub mod coins;
pub mod sessions;
pub mod signals;

pub use alerts::{AlertInbox, AlertScanner, AlertStore, LogSink, NotificationSink};
pub use coins::CoinDirectory;
pub use sessions::SessionStore;
pub use signals::{analyze, Analyzer, ExtremaWaveDetector};
