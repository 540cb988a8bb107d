//! tern_std — the Tern container/ownership runtime, under one roof.
//!
//! Each container lives in its own crate; this facade re-exports the
//! producer-side types and the boundary function table so embedders pull
//! in a single dependency. Native callers link against `tern_rt` and use
//! only its exported symbols.

pub use tern_arc::Arc;
pub use tern_map::{HashMap, KeyValue};
pub use tern_opt::Option;
pub use tern_own::{OwnedSlice, OwnedStr};
pub use tern_ptr::NonNull;
pub use tern_vec::{String, Vec};

pub use tern_rt as rt;
