mod cors;

pub use cors::{build_cors, ip_cors_headers};
