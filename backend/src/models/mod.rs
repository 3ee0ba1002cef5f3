pub mod celestial;

pub use celestial::*;
