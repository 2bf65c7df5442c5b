pub mod cache;
pub mod game_resolver;
pub mod schedule_aggregator;
pub mod schedule_normalizer;
pub mod score_normalizer;
