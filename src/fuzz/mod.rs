//! Random instance generation for differential testing

pub mod generator;

pub use generator::{GeneratorConfig, InstanceGenerator};
