//! Logging and debugging facilities for Horizon Controls.
//!
//! This module provides:
//! - Target names for filtering the `tracing` output of each subsystem
//! - A generic tree formatter used to dump control hierarchies
//! - A performance span guard
//!
//! # Tracing Integration
//!
//! Horizon Controls uses the `tracing` crate for instrumentation. To see logs,
//! install a subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_controls::input=trace")
//!     .init();
//! ```

use std::fmt::{self, Write as FmtWrite};

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "horizon_controls_core";
    /// Signal emission target.
    pub const SIGNAL: &str = "horizon_controls_core::signal";
    /// Animated values and movement strategies.
    pub const ANIMATION: &str = "horizon_controls::animation";
    /// Widget tree membership and traversal.
    pub const TREE: &str = "horizon_controls::tree";
    /// Content load/unload lifecycle.
    pub const CONTENT: &str = "horizon_controls::content";
    /// Pointer and keyboard routing.
    pub const INPUT: &str = "horizon_controls::input";
    /// Keyboard focus changes.
    pub const FOCUS: &str = "horizon_controls::focus";
    /// Background data loading.
    pub const LOADER: &str = "horizon_controls::loader";
    /// Performance spans.
    pub const PERF: &str = "horizon_controls::perf";
}

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Compact single-line representation.
    Compact,
}

/// Configuration for tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to show node IDs.
    pub show_ids: bool,
    /// Whether to show type names.
    pub show_types: bool,
    /// Whether to show per-node detail (e.g. content state).
    pub show_details: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
    /// Indent size for each level.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: true,
            show_types: true,
            show_details: false,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Create options for detailed debugging output.
    pub fn detailed() -> Self {
        Self {
            show_details: true,
            ..Default::default()
        }
    }

    /// Create options for minimal output.
    pub fn minimal() -> Self {
        Self {
            show_ids: false,
            show_types: false,
            show_details: false,
            ..Default::default()
        }
    }
}

/// A hierarchy that can be rendered by [`format_tree`].
pub trait TreeDebug {
    /// Node handle type.
    type Id: Copy + fmt::Debug;

    /// Display name of a node. Empty names print as `(unnamed)`.
    fn node_name(&self, id: Self::Id) -> String;

    /// Concrete type name of a node.
    fn node_type_name(&self, id: Self::Id) -> &'static str;

    /// Extra detail printed in braces when [`TreeFormatOptions::show_details`] is set.
    fn node_details(&self, _id: Self::Id) -> Option<String> {
        None
    }

    /// Children in order.
    fn node_children(&self, id: Self::Id) -> Vec<Self::Id>;
}

/// Format the subtree rooted at `root`.
pub fn format_tree<T: TreeDebug>(tree: &T, root: T::Id, options: &TreeFormatOptions) -> String {
    let mut output = String::new();
    // Writing into a String cannot fail.
    let _ = format_subtree_into(tree, root, 0, true, options, &mut output);
    output
}

fn format_subtree_into<T: TreeDebug, W: FmtWrite>(
    tree: &T,
    id: T::Id,
    depth: usize,
    is_last: bool,
    options: &TreeFormatOptions,
    output: &mut W,
) -> fmt::Result {
    if options.max_depth.is_some_and(|max| depth > max) {
        return Ok(());
    }

    output.write_str(&build_prefix(options, depth, is_last))?;

    let name = tree.node_name(id);
    output.write_str(if name.is_empty() { "(unnamed)" } else { &name })?;

    if options.show_ids {
        write!(output, " [{id:?}]")?;
    }

    if options.show_types {
        let type_name = tree.node_type_name(id);
        // Strip the module path for readability.
        let short_type = type_name.rsplit("::").next().unwrap_or(type_name);
        write!(output, " ({short_type})")?;
    }

    if options.show_details {
        if let Some(details) = tree.node_details(id) {
            write!(output, " {{{details}}}")?;
        }
    }

    output.write_char('\n')?;

    let children = tree.node_children(id);
    let child_count = children.len();
    for (i, child) in children.into_iter().enumerate() {
        format_subtree_into(tree, child, depth + 1, i + 1 == child_count, options, output)?;
    }

    Ok(())
}

fn build_prefix(options: &TreeFormatOptions, depth: usize, is_last: bool) -> String {
    if depth == 0 {
        return String::new();
    }

    let (branch, tee, corner) = match options.style {
        TreeStyle::Ascii => ("|", "+--", "`--"),
        TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500}", "\u{2514}\u{2500}\u{2500}"),
        TreeStyle::Compact => ("", "-", "-"),
    };

    let mut prefix = String::new();
    for _ in 0..(depth - 1) {
        prefix.push_str(branch);
        prefix.extend(std::iter::repeat_n(' ', options.indent_size));
    }
    prefix.push_str(if is_last { corner } else { tee });
    prefix.push(' ');
    prefix
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Useful for measuring how long a frame phase takes.
#[derive(Debug)]
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, "perf", operation = name);
        Self {
            _span: span.entered(),
        }
    }
}
