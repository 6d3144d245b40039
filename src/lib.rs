pub mod cli;
pub mod sesamo;
