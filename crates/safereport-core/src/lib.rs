//! Core types and trait definitions for SafeReport.
//!
//! This crate has no HTTP or database dependencies. It owns
//! the report lifecycle rules, the public identifier scheme and the contract
//! for image classification; storage and transport live in other crates.

// Native `async fn` in traits; the store trait spells out `Send` futures
// where it matters.
#![allow(async_fn_in_trait)]

pub mod account;
pub mod classify;
pub mod error;
pub mod intake;
pub mod lifecycle;
pub mod report;
pub mod report_id;
pub mod service;
pub mod store;

pub use error::{Error, Result, ValidationError};
