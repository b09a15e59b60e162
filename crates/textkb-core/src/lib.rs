#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod chunker;
pub mod config;
pub mod embedding;
pub mod error;
pub mod ids;
pub mod traits;
pub mod types;
