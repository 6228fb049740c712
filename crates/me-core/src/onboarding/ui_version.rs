use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Front-end experience a tutorial configuration belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UiVersion {
    #[serde(rename = "original")]
    Original,
    #[default]
    #[serde(rename = "v2")]
    V2,
    #[serde(rename = "images-mvp")]
    ImagesMvp,
}

impl UiVersion {
    pub const ALL: [UiVersion; 3] = [UiVersion::Original, UiVersion::V2, UiVersion::ImagesMvp];

    pub fn as_str(&self) -> &'static str {
        match self {
            UiVersion::Original => "original",
            UiVersion::V2 => "v2",
            UiVersion::ImagesMvp => "images-mvp",
        }
    }
}

impl fmt::Display for UiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown ui version '{0}' (expected original, v2 or images-mvp)")]
pub struct UnknownUiVersion(pub String);

impl FromStr for UiVersion {
    type Err = UnknownUiVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UiVersion::ALL
            .into_iter()
            .find(|version| version.as_str() == s)
            .ok_or_else(|| UnknownUiVersion(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_versions() {
        assert_eq!("original".parse::<UiVersion>().unwrap(), UiVersion::Original);
        assert_eq!("v2".parse::<UiVersion>().unwrap(), UiVersion::V2);
        assert_eq!("images-mvp".parse::<UiVersion>().unwrap(), UiVersion::ImagesMvp);
    }

    #[test]
    fn test_parse_unknown_version_fails() {
        let err = "v3".parse::<UiVersion>().unwrap_err();
        assert_eq!(err, UnknownUiVersion("v3".to_string()));
    }

    #[test]
    fn test_serde_uses_wire_tags() {
        assert_eq!(
            serde_json::to_string(&UiVersion::ImagesMvp).unwrap(),
            "\"images-mvp\""
        );
    }
}
