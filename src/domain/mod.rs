//! Core domain types and logic.

pub mod column;
pub mod dataset;
pub mod sort;
pub mod selection;
pub mod table_view;
pub mod choice;
pub mod heatmap;
pub mod chart;
pub mod table_config;
pub mod error;
