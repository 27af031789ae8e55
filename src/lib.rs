//! Packs customer orders into boxes from a fixed catalog.
//!
//! `dispatcher::pack_batch` is the entry point for whole batches; it runs
//! `optimizer::pack_order` for every order on a pool of worker threads.

pub mod api;
pub mod catalog;
pub mod config;
pub mod dispatcher;
pub mod geometry;
pub mod model;
pub mod optimizer;
pub mod types;
