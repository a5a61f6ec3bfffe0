use std::io;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct DataPath {
    pub root: PathBuf,
}

impl DataPath {
    pub fn new(data_path: Option<PathBuf>) -> io::Result<Self> {
        let root = match data_path {
            Some(path) => path,
            None => dirs::home_dir()
                .ok_or_else(|| {
                    io::Error::new(
                        io::ErrorKind::NotFound,
                        "Home directory not found. Please specify --data-path.",
                    )
                })?
                .join(".auctionr"),
        };

        Ok(Self { root })
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.toml")
    }
}

pub fn validate_auction_id(id: &str) -> io::Result<()> {
    if id.trim().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "Auction ID cannot be empty",
        ));
    }

    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "Auction ID may only contain letters, digits, '-' and '_'",
        ));
    }

    if id.len() > 64 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "Auction ID too long (max 64 characters)",
        ));
    }

    Ok(())
}

pub fn validate_base_url(base_url: &str) -> io::Result<()> {
    let parsed = url::Url::parse(base_url).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Invalid base URL: {e}"),
        )
    })?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "Base URL must use http:// or https://",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_typical_auction_ids() {
        assert!(validate_auction_id("auction-7").is_ok());
        assert!(validate_auction_id("EV_2024_031").is_ok());
    }

    #[test]
    fn rejects_empty_and_oversized_ids() {
        assert!(validate_auction_id("").is_err());
        assert!(validate_auction_id("   ").is_err());
        assert!(validate_auction_id(&"x".repeat(65)).is_err());
    }

    #[test]
    fn rejects_ids_with_path_characters() {
        assert!(validate_auction_id("a/b").is_err());
        assert!(validate_auction_id("a b").is_err());
        assert!(validate_auction_id("a?b").is_err());
    }

    #[test]
    fn validates_base_urls() {
        assert!(validate_base_url("https://auctions.example.com").is_ok());
        assert!(validate_base_url("http://localhost:8000").is_ok());
        assert!(validate_base_url("ftp://example.com").is_err());
        assert!(validate_base_url("not a url").is_err());
    }
}
