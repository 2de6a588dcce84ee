//! # Remote Media-Control Provider
//!
//! Client for the remote service that owns playlists, tracks, soundboards and
//! sounds.
//!
//! ## Overview
//!
//! This crate provides:
//! - The [`RemoteClient`] trait, one method per remote capability
//! - [`HttpRemoteClient`], the JSON-over-HTTP connector built on
//!   `bridge_traits::HttpClient`
//! - URL helpers shared with path classification ([`file_url`], [`clean_url`])
//! - Wire types for request bodies and list responses

pub mod client;
pub mod connector;
pub mod error;
pub mod types;
pub mod urls;

pub use client::{RemoteClient, SoundOptions};
pub use connector::HttpRemoteClient;
pub use error::{RemoteError, Result};
pub use types::{RemotePlaylist, RemoteSoundboard};
pub use urls::{clean_url, file_url};
