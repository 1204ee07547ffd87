mod cleanup;
pub mod decision;
pub mod describe;
mod entry;
mod error;
mod filter;
pub mod fs;
mod rank;
pub mod remove;
pub mod scan;
pub mod style;
pub mod utils;

pub use cleanup::*;
pub use entry::*;
pub use error::*;
pub use filter::*;
pub use rank::*;
