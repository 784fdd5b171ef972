pub mod algorithms;
pub mod batch;
pub mod config;
pub mod grid;
pub mod intervals;
pub mod obstacle;
pub mod replay;
pub mod scenario;
pub mod statistics;
