mod geo;
mod place;
mod search;
mod snapshot;
mod views;

pub use geo::*;
pub use place::*;
pub use search::*;
pub use snapshot::*;
pub use views::*;
