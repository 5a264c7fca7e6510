//! Seams between the verification engine and its collaborators.

pub mod cancellation;
pub mod collaborators;

pub use cancellation::{Cancellable, CancellationToken};
pub use collaborators::{ChildOutput, DiversionCheck, ManifestProvider, NoDiversions, PackageResolver, Remediator};
