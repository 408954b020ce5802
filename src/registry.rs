//! Process-wide descriptor cache.
//!
//! Each record type is validated on first use and the outcome, a descriptor or the
//! configuration error, is kept for the life of the process. Misses are computed
//! outside the lock and published first-writer-wins, so concurrent first callers may
//! build twice but all of them see the same entry.

use crate::descriptor::RecordDescriptor;
use crate::record::Record;
use crate::Result;
use log::{debug, warn};
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

type Entry = Result<Arc<RecordDescriptor>>;

static REGISTRY: OnceLock<RwLock<HashMap<TypeId, Entry>>> = OnceLock::new();

fn registry() -> &'static RwLock<HashMap<TypeId, Entry>> {
    REGISTRY.get_or_init(|| RwLock::new(HashMap::new()))
}

/// The validated descriptor of `T`, building it on first use.
pub fn descriptor<T: Record>() -> Result<Arc<RecordDescriptor>> {
    let key = TypeId::of::<T>();
    if let Some(entry) = registry()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
    {
        return entry.clone();
    }

    let built = RecordDescriptor::build(T::record_shape()).map(Arc::new);
    match &built {
        Ok(descriptor) => debug!(
            "registered record {} with {} fields",
            descriptor.name,
            descriptor.fields.len()
        ),
        Err(err) => warn!("rejected record {}: {}", T::record_name(), err),
    }

    // entries are only ever inserted whole, so a poisoned map is still consistent
    registry()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .entry(key)
        .or_insert(built)
        .clone()
}

/// Returns `true` if `T` has been looked up before, whether it validated or not.
pub fn is_registered<T: Record>() -> bool {
    registry()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .contains_key(&TypeId::of::<T>())
}
