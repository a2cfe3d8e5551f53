//! Geometry solver and redraw engine for panelreel.
//!
//! This crate turns a [`panelreel_model::Ring`] plus a current
//! [`panelreel_model::Focus`] into on-screen draw orders (the geometry
//! solver), then executes those orders against a
//! [`panelreel_term::DrawingSurface`] (the redraw engine). Both stages are
//! whole-reel: there is no partial-diff or dirty-region tracking here,
//! matching the single Non-goal that scopes this crate down from the
//! teacher's original partial-repaint architecture.

pub mod render_engine;

pub use render_engine::{redraw, solve, BorderMask, DrawOrder, RedrawOptions, RedrawOutcome};
