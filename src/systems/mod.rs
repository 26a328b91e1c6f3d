pub mod colony;
mod orbit;
pub mod population;

pub use colony::{QueenSystem, WorkerSystem};
pub use orbit::OrbitSystem;
pub use population::PopulationSystem;
