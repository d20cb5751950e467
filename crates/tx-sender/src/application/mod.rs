//! Application layer: lock registry, resolution gate, lifecycle observer,
//! outcome classifier and the sender service.

pub mod classifier;
pub mod gate;
pub mod key_lock;
pub mod observer;
pub mod service;

pub use classifier::{classify, resolve_failure};
pub use gate::{ResolutionGate, Submission};
pub use key_lock::{KeyGuard, KeyedLockRegistry};
pub use observer::{LifecycleObserver, Transition, Watch};
pub use service::TransactionSender;
