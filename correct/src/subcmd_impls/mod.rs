pub mod args;
pub mod batch;
mod dice;
pub mod discover;
mod pair;
pub mod report;
mod threshold;
pub mod utils;
pub mod volume_io;
