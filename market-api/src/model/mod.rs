pub mod account;
pub mod controls;
pub mod history;
pub mod instrument;
pub mod trade;

pub use account::*;
pub use controls::*;
pub use history::*;
pub use instrument::*;
pub use trade::*;
