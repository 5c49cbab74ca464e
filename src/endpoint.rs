use thiserror::Error;
use url::Url;

/// Address of the conversion service when the page is served from localhost
pub const LOCAL_ENDPOINT: &str = "http://localhost:8000/tomd";

/// Origin assumed when none is configured
pub const DEFAULT_ORIGIN: &str = "http://localhost";

const CONVERT_PATH: &str = "/tomd";

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Invalid origin '{origin}': {source}")]
    Parse {
        origin: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Origin '{0}' has no hostname")]
    MissingHost(String),
}

/// The protocol and hostname the client acts as if it were served from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    /// Scheme including the trailing colon, e.g. "https:"
    pub protocol: String,
    pub hostname: String,
}

impl PageLocation {
    pub fn new(protocol: impl Into<String>, hostname: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            hostname: hostname.into(),
        }
    }

    /// Parse an origin such as "https://docs2md.example.com"
    pub fn parse(origin: &str) -> Result<Self, LocationError> {
        let url = Url::parse(origin).map_err(|source| LocationError::Parse {
            origin: origin.to_string(),
            source,
        })?;

        let hostname = url
            .host_str()
            .ok_or_else(|| LocationError::MissingHost(origin.to_string()))?;

        Ok(Self::new(format!("{}:", url.scheme()), hostname))
    }

    pub fn is_localhost(&self) -> bool {
        self.hostname == "localhost"
    }

    /// Conversion endpoint for this location
    pub fn endpoint(&self) -> Result<Url, LocationError> {
        if self.is_localhost() {
            return parse_url(LOCAL_ENDPOINT);
        }
        parse_url(&format!(
            "{}//api.{}{}",
            self.protocol, self.hostname, CONVERT_PATH
        ))
    }

    /// Root of the conversion service, which describes the service
    pub fn service_root(&self) -> Result<Url, LocationError> {
        let mut url = self.endpoint()?;
        url.set_path("/");
        Ok(url)
    }
}

fn parse_url(raw: &str) -> Result<Url, LocationError> {
    Url::parse(raw).map_err(|source| LocationError::Parse {
        origin: raw.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localhost_uses_fixed_endpoint() {
        let location = PageLocation::parse("http://localhost:5173").unwrap();
        assert_eq!(
            location.endpoint().unwrap().as_str(),
            "http://localhost:8000/tomd"
        );

        // Protocol of the page does not matter for localhost
        let location = PageLocation::new("https:", "localhost");
        assert_eq!(
            location.endpoint().unwrap().as_str(),
            "http://localhost:8000/tomd"
        );
    }

    #[test]
    fn test_remote_host_gets_api_subdomain() {
        let location = PageLocation::new("https:", "example.com");
        assert_eq!(
            location.endpoint().unwrap().as_str(),
            "https://api.example.com/tomd"
        );
    }

    #[test]
    fn test_parse_drops_port_and_path() {
        let location = PageLocation::parse("http://docs.internal:8080/app/").unwrap();
        assert_eq!(location, PageLocation::new("http:", "docs.internal"));
        assert_eq!(
            location.endpoint().unwrap().as_str(),
            "http://api.docs.internal/tomd"
        );
    }

    #[test]
    fn test_service_root() {
        let location = PageLocation::new("https:", "example.com");
        assert_eq!(
            location.service_root().unwrap().as_str(),
            "https://api.example.com/"
        );
        let local = PageLocation::new("http:", "localhost");
        assert_eq!(
            local.service_root().unwrap().as_str(),
            "http://localhost:8000/"
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            PageLocation::parse("not a url"),
            Err(LocationError::Parse { .. })
        ));
        assert!(matches!(
            PageLocation::parse("mailto:someone@example.com"),
            Err(LocationError::MissingHost(_))
        ));
    }
}
