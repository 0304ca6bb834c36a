// Output generation module

pub mod diagrams;
pub mod report;

pub use diagrams::*;
pub use report::*;
