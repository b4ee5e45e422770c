mod config_gen;
mod database;
mod lookup;

pub use config_gen::config_generate;
pub use database::update_database;
pub use lookup::{lookup_ip, refresh_ips};
