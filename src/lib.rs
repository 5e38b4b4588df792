pub mod chord_export;
pub mod config;
pub mod data_mapper;
pub mod error;
pub mod format;
pub mod goal_record;
pub mod palette;
pub mod viewer;

pub use data_mapper::{ChordEdge, ConnectionMode, DataMapper, PlayerEntry};
pub use error::MapperError;
pub use goal_record::GoalRecord;
