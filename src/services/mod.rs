//! Service layer for separating concerns
//!
//! Services that handle I/O independently of the orchestration logic.

pub mod io;

pub use io::PayloadIOService;
