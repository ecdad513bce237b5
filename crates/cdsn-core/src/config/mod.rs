//! Configuration for the notation toolchain
//!
//! Every setting is optional and falls back to a default, so an empty file
//! or no file at all is a valid configuration.
//!
//! ## Configuration Discovery
//!
//! When no explicit config path is given, the loader looks for
//! `.cdsnrc.toml`, `.cdsnrc.json`, `cdsn.yaml`, `cdsn.yml` or `cdsn.json`,
//! starting in the current directory and moving up to the filesystem root.
//!
//! ## Example Configuration
//!
//! ```yaml
//! scanner:
//!   queueCapacity: 16
//! formatter:
//!   indentSize: 2
//! analyzer:
//!   delimiterName: delimiter
//! ```

mod cdsn_config;
mod loader;

pub use cdsn_config::{
    AnalyzerConfiguration, CdsnConfig, FormatterConfiguration, ScannerConfiguration,
};
pub use loader::{CONFIG_FILE_NAMES, ConfigLoader};
