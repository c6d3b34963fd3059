//! Version handling for index releases
//!
//! # Modules
//!
//! - [`ordering`]: PEP 440 ordering with a lexical fallback for legacy strings
//! - [`spec`]: requirement tokens (`name`, `name==1.0`, `name>=1,<2`)
//! - [`resolver`]: picks the release(s) matching a requirement
//! - [`error`]: error types shared by the index and resolution layers

pub mod error;
pub mod ordering;
pub mod resolver;
pub mod spec;

pub use error::{QypiError, TransportError};
pub use resolver::{Project, ResolveOptions};
pub use spec::VersionSpec;
