pub mod error;
pub mod facade;
pub mod fs;
pub mod numerics;
pub mod statistics;

pub use error::{LaneError, LoadError};
pub use facade::{add, add_scalars, broadcast, load, store};
