//! Core business logic for Tenor.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `lending` - Credit limits, installment schedules, vouchers, payments,
//!   and the loan/contract state machines

pub mod lending;
