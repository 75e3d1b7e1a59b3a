//! Application ports (traits) for external dependencies.
//!
//! Ports define what the application needs from the outside world. Adapters
//! in `strata-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: called by the application, implemented by infrastructure
//!   - `Filesystem`: file operations
//!   - `TemplateSource`: coordinate resolution and listing
//!   - `RemoteRepository`: probe/list/download against a hosted repository
//!
//! - **Driving (Input) Ports**: called by the outside world, implemented by services
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    DirEntry, EntryKind, Filesystem, Listing, Probe, RemoteEntry, RemoteError, RemoteRepository,
    TemplateSource,
};
