#![deny(warnings)]

pub mod measurements;
pub mod tasks;
