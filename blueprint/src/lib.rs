#![doc = include_str!("../README.md")]

pub mod blueprint;
pub mod circuits;
pub mod components;
pub mod error;
pub mod field_helpers;

#[cfg(test)]
mod tests;
