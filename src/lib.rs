pub mod batch;
pub mod client;
pub mod config;
pub mod inputs;
pub mod observability;
pub mod retry;
pub mod scheduler;
pub mod worker;
