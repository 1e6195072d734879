pub mod chart_service;
pub mod dashboard_service;
pub mod export_service;
pub mod fetch_service;
pub mod options_service;
pub mod ping_service;
pub mod series_service;
