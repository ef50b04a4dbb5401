//! Photo storage for subjects.
//!
//! Images live on disk under a media root, one file per subject and view
//! (`<root>/<id>_<view><ext>`); the database only holds their paths.
//! [`register_subject`] ties a subject insert to its photo uploads.

mod dir;
mod register;

pub mod error;

pub use dir::{MediaDir, PhotoUpload, extension_of};
pub use error::{Error, Result};
pub use register::{MediaFailure, Registration, register_subject};
