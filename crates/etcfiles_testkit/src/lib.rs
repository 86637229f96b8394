//! # etcfiles testkit
//!
//! Shared fixtures for testing against a throwaway account database:
//! sample file content mirroring a small but realistic system, and a
//! [`TestFiles`] helper that lays the four databases out under a
//! temporary directory with the conventional names.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod fixtures;

pub use fixtures::{TestFiles, GROUP_SAMPLE, GSHADOW_SAMPLE, PASSWD_SAMPLE, SHADOW_SAMPLE};
