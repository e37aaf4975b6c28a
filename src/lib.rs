pub mod analysis;
pub mod cli;
pub mod ctx;
pub mod deg;
pub mod index;
pub mod pipeline;
pub mod report;
pub mod summarize;
