/// Monitoring engine module - the check, evaluate, notify loop
///
/// This module is responsible for:
/// - Probing the target over HTTP/HTTPS
/// - Classifying each outcome against the policy
/// - Scheduling cycles until shutdown
pub mod checker;
pub mod evaluator;
pub mod executor;
pub mod scheduler;
pub mod types;

pub use checker::HttpChecker;
pub use executor::MonitoringExecutor;
pub use scheduler::MonitoringScheduler;
