pub mod accordion;
pub mod chart;
pub mod config;
pub mod dashboard;
pub mod feed;
pub mod http_client;
pub mod leaders;
pub mod news;
pub mod render;
pub mod scoreboard;
pub mod sections;
pub mod standings;
pub mod surface;
pub mod tabs;
pub mod view;
