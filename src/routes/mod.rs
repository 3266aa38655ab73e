//! Route handlers for the command surface — one module per concern,
//! dispatched from the router in `lib.rs`.

pub mod feedback;
pub mod log;
pub mod scan;
pub mod session;
pub mod sw;
pub mod util;
