pub mod feed_service;
pub mod follow_service;
pub mod user_service;
pub mod mailer;
