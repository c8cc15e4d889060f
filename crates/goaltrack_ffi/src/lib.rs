//! Flutter bridge crate for GoalTrack.
//!
//! Exposes the goal list screen API from `goaltrack_core` to Dart.

pub mod api;
