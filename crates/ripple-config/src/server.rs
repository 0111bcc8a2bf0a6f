use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    #[serde(default = "Server::default_ip")]
    pub ip: IpAddr,
    #[serde(default = "Server::default_port")]
    pub port: u16,
    /// How many runtime worker threads to spin up. Defaults to at
    /// most 4 or half of the available cores, whichever is smaller.
    #[serde(default = "Server::default_workers")]
    pub workers: usize,
}

impl Server {
    fn default_ip() -> IpAddr {
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    }

    fn default_port() -> u16 {
        8080
    }

    fn default_workers() -> usize {
        let cores = num_cpus::get();
        if cores > 4 {
            4
        } else {
            (cores / 2).max(1)
        }
    }
}

impl Default for Server {
    fn default() -> Self {
        Self {
            ip: Self::default_ip(),
            port: Self::default_port(),
            workers: Self::default_workers(),
        }
    }
}
