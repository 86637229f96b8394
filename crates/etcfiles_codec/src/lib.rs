//! # etcfiles codec
//!
//! Record types and line codec for the four flat-file account databases:
//! `passwd`, `group`, `shadow`, and `gshadow`.
//!
//! This crate is pure: it parses one colon-delimited text line into a
//! structured record and serializes a record back to the exact line format.
//! It performs no I/O and holds no state.
//!
//! ## Round-trip guarantee
//!
//! For any syntactically valid line, `parse` followed by `to_line` reproduces
//! the original line byte-for-byte. List fields (group members, gshadow
//! admins) keep their source order; numeric fields that were empty in the
//! source serialize back to an empty field, never to `0`.
//!
//! ## Example
//!
//! ```
//! use etcfiles_codec::{Record, User};
//!
//! let user = User::parse("root:x:0:0:root:/root:/bin/bash").unwrap();
//! assert_eq!(user.uid, 0);
//! assert_eq!(user.shell, "/bin/bash");
//! assert_eq!(user.to_line(), "root:x:0:0:root:/root:/bin/bash");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod group;
mod gshadow;
mod record;
mod shadow;
mod user;

pub use error::{ParseError, ParseResult};
pub use group::Group;
pub use gshadow::GShadow;
pub use record::{Record, RecordKind};
pub use shadow::Shadow;
pub use user::{User, UserExtension};
