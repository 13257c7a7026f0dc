// Library for tests to access modules

pub mod alert_log;
pub mod config;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod history;
pub mod metric_source;
pub mod models;
pub mod rate;
pub mod routes;
pub mod scheduler;
pub mod sink;
pub mod thresholds;
pub mod version;
pub mod worker;
