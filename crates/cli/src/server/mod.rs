pub mod dns;
pub mod web;

pub use dns::start_dns_listeners;
pub use web::start_web_server;
