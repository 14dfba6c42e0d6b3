//! Streaming platforms a streamer can broadcast on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Platform a streamer (or a single activity sample) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitch,
    YouTube,
    Kick,
}

impl Platform {
    /// All known platforms, in display order.
    pub const ALL: [Platform; 3] = [Platform::Twitch, Platform::YouTube, Platform::Kick];

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Twitch => "twitch",
            Platform::YouTube => "youtube",
            Platform::Kick => "kick",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "twitch" => Ok(Self::Twitch),
            "youtube" | "yt" => Ok(Self::YouTube),
            "kick" => Ok(Self::Kick),
            other => Err(format!("Unknown platform: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Platform;

    #[test]
    fn test_parse_platform_case_insensitive() {
        assert_eq!("Twitch".parse::<Platform>().unwrap(), Platform::Twitch);
        assert_eq!("YOUTUBE".parse::<Platform>().unwrap(), Platform::YouTube);
        assert_eq!("yt".parse::<Platform>().unwrap(), Platform::YouTube);
        assert_eq!(" kick ".parse::<Platform>().unwrap(), Platform::Kick);
    }

    #[test]
    fn test_parse_unknown_platform() {
        assert!("myspace".parse::<Platform>().is_err());
    }

    #[test]
    fn test_display_matches_serde_name() {
        for platform in Platform::ALL {
            let json = serde_json::to_string(&platform).unwrap();
            assert_eq!(json, format!("\"{}\"", platform));
        }
    }
}
