use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

#[derive(Debug)]
pub struct Config {
    // http server configuration
    /// address for the API server to listen on.
    ///  if not set then 0.0.0.0:3000 will be used
    pub listen_addr: SocketAddr,

    // data store configuration
    /// a path to a sqlite database, if not set then an
    ///  in-memory database will be used
    pub sqlite_path: Option<PathBuf>,
    /// a directory for uploaded image bytes, if not set
    ///  then an in-memory store will be used
    pub uploads_path: Option<PathBuf>,

    // session tokens
    /// the token signing secret, loaded once at startup;
    ///  if not set then a random secret is generated and
    ///  sessions do not survive a restart
    pub token_secret: Option<String>,

    // misc
    pub log_level: tracing::Level,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)), 3000),
            sqlite_path: None,
            uploads_path: None,
            token_secret: None,
            log_level: tracing::Level::INFO,
        }
    }
}
