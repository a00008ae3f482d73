//! Runtime orchestration: deferral, resize delivery, truncation state, measurement.

pub mod measure;
pub mod resize;
pub mod scheduler;
pub mod truncation;
