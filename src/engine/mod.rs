// src/engine/mod.rs
//
// The computation core: pure, synchronous functions over plain data.
// Handlers snapshot the store, call in here, and decide what to persist.

pub mod accrual;
pub mod export;
pub mod lifecycle;
pub mod money;
pub mod payroll;
pub mod schedule;
