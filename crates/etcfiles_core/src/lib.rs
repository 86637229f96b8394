//! # etcfiles core
//!
//! Uniform read access, and on flat-file platforms uniform transactional
//! write access, to the account databases: `passwd`, `group`, `shadow`,
//! and `gshadow`.
//!
//! This crate provides:
//! - Change-set computation between a proposed record set and the file on
//!   disk ([`ChangeSet`])
//! - A process-exclusive advisory lock serializing all writers
//!   ([`PasswdLock`])
//! - Backup-then-atomic-replace file writes ([`atomic`])
//! - A per-database write engine with dry-run support ([`WriteEngine`],
//!   [`DryRunResult`])
//! - A backend trait with a per-kind capability surface and an explicit
//!   registry ([`AccountBackend`], [`Capabilities`], [`BackendRegistry`])
//!
//! ## Write discipline
//!
//! Writes are full-replace: the caller supplies the complete desired record
//! set for one file, and the engine replaces the file atomically under the
//! system password lock. A reader never observes a half-written file; a
//! failed write leaves the previous file exactly as it was.
//!
//! ## Example
//!
//! ```no_run
//! use etcfiles_codec::User;
//! use etcfiles_core::{AccountBackend, FilesBackend, FilesConfig, WriteOptions};
//!
//! let backend = FilesBackend::new(FilesConfig::default());
//! let mut users = backend.users()?;
//! users.push(User::new("svc", "x", 990, 990, "service", "/var/empty", "/usr/sbin/nologin"));
//!
//! // Inspect the would-be write without touching the file.
//! let report = backend
//!     .write_passwd(&users, &WriteOptions::new().dry_run(true))?
//!     .unwrap();
//! println!("{}", report.summary());
//! # Ok::<(), etcfiles_core::CoreError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod atomic;
mod backend;
mod capabilities;
mod changeset;
mod config;
mod dry_run;
mod engine;
mod error;
mod files;
mod lock;
mod platform;
mod registry;

pub use backend::{AccountBackend, GroupQuery, UserQuery};
pub use capabilities::{Capabilities, Capability, Feature};
pub use changeset::{Change, ChangeKind, ChangeSet, ChangeSummary};
pub use config::{file_mode, FilesConfig};
pub use dry_run::DryRunResult;
pub use engine::{WriteEngine, WriteOptions};
pub use error::{CoreError, CoreResult};
pub use files::FilesBackend;
pub use lock::{PasswdLock, DEFAULT_LOCK_TIMEOUT};
pub use platform::Platform;
pub use registry::BackendRegistry;
