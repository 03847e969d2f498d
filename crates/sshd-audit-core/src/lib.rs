//! Core types and errors for the sshd audit probe.
//!
//! This crate holds the data model shared by the probe library and the CLI:
//!
//! - **Types**: the resolved binary, probe results, configuration records
//!   and module identities
//! - **Errors**: the [`AuditError`] taxonomy
//!
//! # Example
//!
//! ```rust
//! use sshd_audit_core::{ModuleIdentity, SSHD_MODULE_NAME};
//!
//! let identity = ModuleIdentity::new("ossindex", "OpenSSH_9.6p1");
//! assert_eq!(identity.module_name, SSHD_MODULE_NAME);
//! ```

mod error;
pub mod types;

pub use error::{AuditError, Result};
pub use types::*;
