// src/lib.rs — Library root for Quill

pub mod cli;
pub mod infra;
pub mod provider;
pub mod session;
