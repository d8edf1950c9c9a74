pub mod composite;
pub mod freshness;
pub mod orchestrator;
pub mod raw_fetcher;
pub mod seeder;
pub mod synthetic;
pub mod timeseries;
pub mod transform;
