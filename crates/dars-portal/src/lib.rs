//! `dars-portal` — downloads the weekly schedule export from the school portal.
//!
//! Each fetch logs in with a fresh cookie jar, then requests the export URL
//! with the session cookies the login produced. All failures collapse into a
//! single opaque fetch error at the [`dars_timetable::ExportFetcher`] seam.

pub mod client;
pub mod error;

pub use client::PortalFetcher;
pub use error::{PortalError, Result};
