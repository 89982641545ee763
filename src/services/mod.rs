pub mod aggregation;
pub mod chat;
pub mod dashboard;
pub mod detail;
pub mod export;
pub mod table;
