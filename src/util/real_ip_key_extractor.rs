use crate::AppState;
use actix_governor::{KeyExtractor, SimpleKeyExtractionError};
use actix_web::dev::ServiceRequest;
use actix_web::web;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

/// Rate-limit key: the client address, read from forwarding headers only
/// when the request arrived through the trusted reverse proxy.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RealIpKeyExtractor;

fn parse_ip(value: &str) -> Option<IpAddr> {
    SocketAddr::from_str(value)
        .map(|socket| socket.ip())
        .or_else(|_| IpAddr::from_str(value))
        .ok()
}

impl KeyExtractor for RealIpKeyExtractor {
    type Key = IpAddr;
    type KeyExtractionError = SimpleKeyExtractionError<&'static str>;

    fn extract(&self, req: &ServiceRequest) -> Result<Self::Key, Self::KeyExtractionError> {
        let reverse_proxy_ip = req
            .app_data::<web::Data<AppState>>()
            .map(|data| data.config.trusted_reverse_proxy_ip)
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

        let peer_ip = req.peer_addr().map(|socket| socket.ip());
        let connection_info = req.connection_info();

        match peer_ip {
            Some(peer) if peer == reverse_proxy_ip => connection_info
                .realip_remote_addr()
                .and_then(parse_ip)
                .ok_or_else(|| {
                    SimpleKeyExtractionError::new("Could not extract real IP address from request")
                }),
            _ => peer_ip.ok_or_else(|| {
                SimpleKeyExtractionError::new("Could not extract peer IP address from request")
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::parse_ip;
    use std::net::IpAddr;

    #[test]
    fn parses_addresses_with_and_without_port() {
        assert_eq!(parse_ip("203.0.113.9:443"), Some(IpAddr::from([203, 0, 113, 9])));
        assert_eq!(parse_ip("203.0.113.9"), Some(IpAddr::from([203, 0, 113, 9])));
        assert_eq!(parse_ip("not an ip"), None);
    }
}
