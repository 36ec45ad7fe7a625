pub mod chart_panel;
pub mod controls;
pub mod stats_table;
