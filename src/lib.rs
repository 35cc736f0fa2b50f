pub mod analysis;
pub mod config;
pub mod error;
pub mod fpl_fetch;
pub mod history;
pub mod http_cache;
pub mod http_client;
pub mod player_pool;
pub mod render;
pub mod squad_ranker;
pub mod state;
pub mod transfer_recommender;
pub mod worker;

pub use analysis::{TeamReport, analyze_team};
pub use error::AnalysisError;
pub use player_pool::{Player, PlayerPool, RawPlayerRecord};
pub use squad_ranker::{RankedSubset, partition};
pub use transfer_recommender::{TransferCandidateSet, recommend};
