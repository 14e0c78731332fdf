//! Concrete `CommandRunner` implementations.

pub mod local_process;
pub mod simulate;

pub use local_process::LocalProcessWorker;
pub use simulate::SimulateWorker;
