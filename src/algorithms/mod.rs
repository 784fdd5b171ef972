pub mod a_star;
pub mod common;
pub mod sipp;
