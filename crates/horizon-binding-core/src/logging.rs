//! Logging facilities for Horizon Binding.
//!
//! Horizon Binding uses the `tracing` crate for instrumentation and never
//! installs a subscriber itself. To see logs, install one in your
//! application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_binding=debug")
//!     .init();
//! ```
//!
//! Binding misses (absent properties, mistyped values) are logged at
//! `trace` level because controls hit them constantly while rendering;
//! rebinds and children preparation are logged at `debug`.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core primitives target.
    pub const CORE: &str = "horizon_binding_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_binding_core::signal";
    /// Reflection registry and property access target.
    pub const REFLECT: &str = "horizon_binding_core::reflect";
    /// Collection adaptation and rebinding target.
    pub const COLLECTION: &str = "horizon_binding::collection";
    /// Flat list / list-view adapters target.
    pub const LIST: &str = "horizon_binding::list";
    /// Tree adapter target.
    pub const TREE: &str = "horizon_binding::tree";
    /// Data grid adapter target.
    pub const GRID: &str = "horizon_binding::grid";
    /// Binding configuration target.
    pub const CONFIG: &str = "horizon_binding::config";
}

/// Span names used for tracing.
pub mod span_names {
    /// Rebinding an adapter to a new item source.
    pub const REBIND: &str = "horizon_binding::rebind";
    /// Materializing a tree node's children.
    pub const PREPARE_CHILDREN: &str = "horizon_binding::prepare_children";
}
