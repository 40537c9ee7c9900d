pub mod dashboard;
pub mod recorder;
pub mod resolver;
pub mod rules;

pub use dashboard::DashboardAggregator;
pub use recorder::BetRecorder;
pub use resolver::BetResolver;
pub use rules::RulesProvider;
