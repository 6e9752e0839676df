pub mod virality_service;
pub mod youtube_service;
