//! Internal implementation details.

pub(crate) mod circular;
pub(crate) mod sync;

pub(crate) use circular::BuildGuard;
pub(crate) use sync::{Map, RwLock};
