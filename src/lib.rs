pub mod chain;
pub mod config;
pub mod error;
pub mod hash_table;
pub mod heap;
pub mod mapping;
pub mod output;
pub mod ranking;
pub mod record;
pub mod report;
pub mod sequence;
pub mod types;

pub use error::{ContainerError, Result};
pub use hash_table::{HashTable, TableConfig};
pub use heap::{Compare, MinHeap, RankOrder};
pub use mapping::Mapping;
pub use ranking::{
    build_discount_ranking, build_popularity_ranking, build_ranking, build_velocity_ranking,
    build_weighted_popularity_ranking, PopularityWeights, Ranking,
};
pub use record::{ProductRecord, Rankable};
pub use sequence::Sequence;
