//! OpenTelemetry tracing with file-based OTLP export.
//!
//! ```text
//! tracing macros → tracing-opentelemetry → SDK tracer → OtlpFileExporter → jsonland-otlp.json
//! ```
//!
//! Each finished span is written as one OTLP/JSON line. The trace file rotates
//! at 10 MiB and keeps three numbered backups.
//!
//! # Configuration
//!
//! The level comes from `RUST_LOG` if set, then `trace_level` in the config
//! file, then `info`.
//!
//! # Modules
//!
//! - `init`: Subscriber setup
//! - `exporter`: OTLP JSON span exporter and tracer provider
//! - `file_writer`: Rotating line writer

mod exporter;
mod file_writer;
mod init;

pub use init::{init_tracing, DEFAULT_TRACE_LEVEL};
