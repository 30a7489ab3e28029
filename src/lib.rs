pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod site;
pub mod table;
pub mod traffic;
pub mod units;
