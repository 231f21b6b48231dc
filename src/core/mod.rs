//! Módulo core - Estágios do pipeline de build do MicroKernel

pub mod archive;
pub mod backend;
pub mod builder;
pub mod config;
pub mod error;
pub mod manifest;
pub mod options;
pub mod packager;
pub mod pipeline;
pub mod recipe;
pub mod requirements;
pub mod toolchain;
pub mod utils;
pub mod validate;
