//! In-process stand-ins for the oracle's external collaborators.
//!
//! Everything here is deterministic and steerable from test code, e.g.
//! [`NullStore::fail_next_commit`] to exercise rollback. The CLI's scenario
//! replay runs entirely on these.

pub mod clock;
pub mod encoder;
pub mod store;

pub use clock::NullClock;
pub use encoder::NullEncoder;
pub use store::NullStore;
