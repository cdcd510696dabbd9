//! Document Lifecycle - Controlled document control core
//!
//! This crate implements the lifecycle of controlled documents: a guarded
//! review/approval workflow, version families with supersession, a
//! version-aware dependency graph that blocks unsafe retirement, a
//! hash-chained audit trail and a date-driven scheduler.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
