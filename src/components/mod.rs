pub mod metric_card;
pub mod navbar;
pub mod token_chart;
