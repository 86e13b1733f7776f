//! Startup-loaded, immutable in-memory tables.
//!
//! Both stores are built once before the server accepts traffic and are
//! read-only for the lifetime of the process, so they can be shared across
//! request tasks without locking.

pub mod patients;
pub mod specialists;

pub use patients::PatientStore;
pub use specialists::SpecialistDirectory;
