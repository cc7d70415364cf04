#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::return_self_not_must_use)]

//! Core of webcfg.
//!
//! A typed model of bundler configurations and the web configuration
//! augmenter, which appends stylesheet rules and browser build plugins to a
//! base configuration without modifying it.

pub mod bundler;
pub mod config;
pub mod env;
pub mod error;
pub mod load;
pub mod loader;
pub mod paths;
pub mod project;
pub mod version;
pub mod web;

pub use bundler::Configuration;
pub use config::Config;
pub use env::{EnvSource, LayeredEnv, ProcessEnv};
pub use error::Error;
pub use loader::{BareLoaderResolver, LoaderResolver, NodeModulesLoaderResolver};
pub use project::{BuildOptions, ExecutorContext, ProjectGraph, SharedConfigContext};
pub use version::VERSION;
pub use web::{augment, WithWeb, WithWebOptions};
