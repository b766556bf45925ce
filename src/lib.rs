//! # Kampuso (Campus Administration Backend)
//!
//! `kampuso` is the administrative backend for a campus management system. It
//! authenticates administrators, issues signed session tokens, and manages the
//! institution's organizational hierarchy.
//!
//! ## Organizational Units
//!
//! The institution is modeled as a forest of units (institution, college,
//! department, ...) connected by a single self-referencing parent link.
//!
//! - **Shallow Projections:** Reads annotate each unit with one level of
//!   parent/child context; there is no deep-tree traversal API.
//! - **Reparent Safety:** Moving a unit under one of its own descendants is
//!   rejected so the hierarchy stays acyclic.
//! - **No Cascades:** Deleting a unit that other rows still reference fails
//!   with a conflict; dependencies must be removed first.
//!
//! ## Authentication
//!
//! Administrators register with a bcrypt-hashed password and log in with
//! email/password. A successful login mints a signed token (24 hour expiry)
//! delivered as an `HttpOnly` cookie named `token`.
//!
//! The `/admin`, `/dashboard`, and `/protected` path prefixes are gated: a
//! request without a valid, unexpired token is redirected to the login page.
//! Invalid credentials return a single non-specific error so account
//! existence cannot be probed.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
