//! Zeabur GraphQL control plane.

mod client;
pub mod dto;
pub mod query;

pub use client::ZeaburClient;
