mod player;
mod snapshot;

pub use player::*;
pub use snapshot::*;
