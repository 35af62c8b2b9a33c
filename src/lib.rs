//! Cache-aside snippet store for template substitution.
//!
//! Template callers read through [`cache::SnippetCache::resolve_text`];
//! writers go through [`application::snippets::SnippetService`], which
//! refreshes the cache after each committed change.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
