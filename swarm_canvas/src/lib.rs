pub mod canvas;
pub mod error;
pub mod noise;
pub mod robot;
pub mod stats;
pub mod swarm;

pub mod prelude {
    pub use crate::canvas::*;
    pub use crate::error::*;
    pub use crate::noise::*;
    pub use crate::robot::*;
    pub use crate::stats::*;
    pub use crate::swarm::*;
}
