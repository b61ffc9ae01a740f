mod dns_query;
mod resolve;

pub use dns_query::{get_dns_query, post_dns_query, DnsQueryParams};
pub use resolve::resolve_json;
