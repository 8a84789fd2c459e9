pub mod alert;
pub mod coin;
pub mod price;
pub mod session;
pub mod signals;

pub use alert::*;
pub use coin::*;
pub use price::*;
pub use session::*;
pub use signals::*;
