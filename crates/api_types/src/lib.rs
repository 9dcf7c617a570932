use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub mod shipment {
    use std::{fmt, str::FromStr};

    use super::*;

    /// Transport mode of a shipment.
    ///
    /// Serialized in upper case, matching the server enum.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum ShipmentType {
        #[default]
        Air,
        Sea,
        Road,
    }

    impl ShipmentType {
        pub const ALL: [ShipmentType; 3] = [Self::Air, Self::Sea, Self::Road];

        /// Returns the canonical wire string.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Air => "AIR",
                Self::Sea => "SEA",
                Self::Road => "ROAD",
            }
        }

        /// Cycles through the variants, used by selectors.
        pub fn next(self) -> Self {
            match self {
                Self::Air => Self::Sea,
                Self::Sea => Self::Road,
                Self::Road => Self::Air,
            }
        }
    }

    impl fmt::Display for ShipmentType {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct UnknownShipmentType(pub String);

    impl fmt::Display for UnknownShipmentType {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "unknown shipment type \"{}\"", self.0)
        }
    }

    impl std::error::Error for UnknownShipmentType {}

    impl FromStr for ShipmentType {
        type Err = UnknownShipmentType;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.trim() {
                "AIR" => Ok(Self::Air),
                "SEA" => Ok(Self::Sea),
                "ROAD" => Ok(Self::Road),
                other => Err(UnknownShipmentType(other.to_string())),
            }
        }
    }

    /// A shipment as returned by the server.
    ///
    /// The client never edits one in place: after a create or update the
    /// whole record is replaced by the server's response.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Shipment {
        pub id: i64,
        pub shipment_title: String,
        #[serde(default)]
        pub shipment_description: Option<String>,
        pub shipment_type: ShipmentType,
        pub cost: f64,
        pub shipment_date: NaiveDate,
        #[serde(alias = "delivered")]
        pub is_delivered: bool,
    }

    /// Body of `POST /shipments` and `PUT /shipments/{id}`.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ShipmentRequest {
        pub shipment_title: String,
        /// May be empty, the server stores it as a non-null column.
        pub shipment_description: String,
        pub shipment_type: ShipmentType,
        pub is_delivered: bool,
        /// Must be > 0.
        pub cost: f64,
        pub shipment_date: NaiveDate,
    }

    /// Body of `POST /shipments/filter`.
    ///
    /// A `None` field means "no constraint" and is left out of the JSON
    /// body entirely.
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ShipmentFilter {
        /// Case-insensitive substring of title or description.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub keyword: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub shipment_type: Option<ShipmentType>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub start_date: Option<NaiveDate>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub end_date: Option<NaiveDate>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub min_cost: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub max_cost: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub is_delivered: Option<bool>,
    }

    impl ShipmentFilter {
        pub fn is_empty(&self) -> bool {
            self == &Self::default()
        }
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum SortDir {
        Asc,
        #[default]
        Desc,
    }

    pub const DEFAULT_SORT_BY: &str = "shipmentDate";

    /// Query string shared by the listing and filter endpoints.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PageQuery {
        /// Zero-based page index.
        pub page: u32,
        pub size: u32,
        pub sort_by: String,
        pub sort_dir: SortDir,
    }

    impl PageQuery {
        /// Newest shipments first.
        pub fn newest_first(page: u32, size: u32) -> Self {
            Self {
                page,
                size,
                sort_by: DEFAULT_SORT_BY.to_string(),
                sort_dir: SortDir::Desc,
            }
        }
    }

    /// Server-paginated envelope.
    ///
    /// The server sends more bookkeeping fields (`pageable`, `sort`, ...);
    /// they are ignored.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PageResult<T> {
        pub content: Vec<T>,
        pub total_pages: u32,
        pub total_elements: u64,
    }

    impl<T> Default for PageResult<T> {
        fn default() -> Self {
            Self {
                content: Vec::new(),
                total_pages: 0,
                total_elements: 0,
            }
        }
    }
}

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginRequest {
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RegisterRequest {
        pub name: String,
        pub email: String,
        pub password: String,
    }

    /// Body returned by `/login`. The session itself travels in the `jwt`
    /// cookie set on the same response.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AuthResponse {
        pub email: String,
        pub token: String,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Profile {
        pub user_id: String,
        pub name: String,
        pub email: String,
        #[serde(default)]
        pub is_account_verified: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct VerifyOtpRequest {
        pub otp: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResetPasswordRequest {
        pub email: String,
        pub otp: String,
        pub new_password: String,
    }
}
