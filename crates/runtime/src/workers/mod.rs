//! Background tasks internal to the crate.

mod session;

pub(crate) use session::{Command, SessionWorker};
