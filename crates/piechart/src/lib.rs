//! Core of a rotatable pie-chart wheel: slice layout, rotation, selection under a fixed
//! pointer, gesture translation and animated motion. Drawing is left to the host, which reads
//! a [`render::RenderState`] whenever the chart reports it was invalidated.

pub mod angle;
pub mod chart;
pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod layout;
pub mod model;
pub mod motion;
pub mod render;

pub use chart::{ChartEvent, ChartOptions, PieChart, SubscriptionId};
pub use color::Color;
pub use error::ChartError;
