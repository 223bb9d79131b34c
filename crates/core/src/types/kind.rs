//! Fixed enumerations shared with the backend.

use serde::{Deserialize, Serialize};

/// Jewelry piece a design is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesignType {
    Necklace,
    Bracelet,
    Earrings,
    Ring,
}

impl DesignType {
    /// Wire name of the design type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Necklace => "necklace",
            Self::Bracelet => "bracelet",
            Self::Earrings => "earrings",
            Self::Ring => "ring",
        }
    }
}

impl std::fmt::Display for DesignType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DesignType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "necklace" => Ok(Self::Necklace),
            "bracelet" => Ok(Self::Bracelet),
            "earrings" => Ok(Self::Earrings),
            "ring" => Ok(Self::Ring),
            _ => Err(format!("invalid design type: {s}")),
        }
    }
}

/// Notification category, one per channel preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    #[default]
    System,
    Transactional,
    Social,
    Reminder,
}

impl std::str::FromStr for NotificationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(Self::System),
            "transactional" => Ok(Self::Transactional),
            "social" => Ok(Self::Social),
            "reminder" => Ok(Self::Reminder),
            _ => Err(format!("invalid notification type: {s}")),
        }
    }
}

/// Account role assigned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[default]
    User,
    Designer,
    Admin,
}

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}
