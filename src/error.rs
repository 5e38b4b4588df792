use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapperError {
    #[error("a data source must be set before any data manipulations can be made")]
    SourceNotSet,

    #[error("the data source contains no goals")]
    EmptySource,

    #[error("no player at index {index} (network has {players} players)")]
    UnknownPlayer { index: usize, players: usize },
}
