//! Chart composition: selection types, the figure model and the composer.

pub mod composer;
pub mod figure;
pub mod selection;

pub use composer::{compose, compose_comparison};
pub use figure::{Figure, FigureLayout, LineMode, LineTrace, OhlcTrace, ScatterTrace, Trace};
pub use selection::{ChartKind, OverlayKind, OverlaySet};
