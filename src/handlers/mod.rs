// src/handlers/mod.rs

pub mod employee;
pub mod general;
pub mod payroll;
pub mod schedule;
