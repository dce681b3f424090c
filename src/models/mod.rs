pub mod dto;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Declares a closed vocabulary serialized by its symbolic name.
///
/// `from_name` is the only way back from a token: an unknown name is `None`,
/// never a default variant.
macro_rules! vocabulary {
    ($(#[$meta:meta])* $name:ident { $($variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }

            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $(stringify!($variant) => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

vocabulary! {
    /// Cities an offer can be listed in
    City { Paris, Cologne, Brussels, Amsterdam, Hamburg, Dusseldorf }
}

vocabulary! {
    /// Kind of accommodation
    OfferType { Apartment, House, Room, Hotel }
}

vocabulary! {
    /// Amenity tags attachable to an offer
    Feature {
        Breakfast,
        AirConditioning,
        LaptopFriendlyWorkspace,
        BabySeat,
        Washer,
        Towels,
        Fridge,
    }
}

vocabulary! {
    /// Account kind of the offer author
    UserType { Pro, Regular }
}

/// City used by the compact layout when the city token is unknown
pub const DEFAULT_CITY: City = City::Paris;

/// Geographic position of an offer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// User embedded in a generated offer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeedUser {
    pub name: String,
    pub email: String,
    pub avatar_path: String,
    pub password: String,
    pub user_type: UserType,
}

/// A synthetic offer as drawn by the generator, before it becomes a line of text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MockOffer {
    pub title: String,
    pub description: String,
    pub post_date: DateTime<Utc>,
    /// Taken verbatim from the city pool, so it may not name a known city
    pub city: String,
    pub preview_image: String,
    pub detail_images: Vec<String>,
    pub is_premium: bool,
    pub rating: u32,
    pub offer_type: OfferType,
    pub rooms_number: u32,
    pub guests_number: u32,
    pub price: u32,
    pub features: Vec<String>,
    pub user: SeedUser,
    pub comments_number: u32,
    pub comment_text: String,
    pub location: Location,
}

/// Position as decoded from a record line; unparsable degrees are `None`
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct LocationRecord {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<Location> for LocationRecord {
    fn from(location: Location) -> Self {
        Self {
            latitude: Some(location.latitude),
            longitude: Some(location.longitude),
        }
    }
}

/// Offer fields shared by both record layouts.
///
/// Every field that needs parsing is optional: decoding never fails, it
/// leaves the field empty instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OfferDetails {
    pub title: String,
    pub description: String,
    pub post_date: Option<DateTime<Utc>>,
    pub city: Option<City>,
    pub preview_image: String,
    pub detail_images: Vec<String>,
    pub is_premium: Option<bool>,
    pub rating: Option<u32>,
    pub offer_type: Option<OfferType>,
    pub rooms_number: Option<u32>,
    pub guests_number: Option<u32>,
    pub price: Option<u32>,
    /// One entry per token, `None` where the token names no known feature
    pub features: Vec<Option<Feature>>,
    pub location: LocationRecord,
}

/// Seed user as decoded from a full record line
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeedUserRecord {
    pub name: String,
    pub email: String,
    pub avatar_path: String,
    pub password: String,
    pub user_type: Option<UserType>,
}

/// Decoded full (22 field) record
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OfferRecord {
    #[serde(flatten)]
    pub offer: OfferDetails,
    pub user: SeedUserRecord,
    pub comments_number: Option<u32>,
    pub comment_text: String,
}

/// Decoded compact (17 field) record, referencing its author by id
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompactOfferRecord {
    #[serde(flatten)]
    pub offer: OfferDetails,
    pub user_id: String,
    pub comments_number: Option<u32>,
}

/// Pools the generator draws offer values from
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct MockData {
    pub titles: Vec<String>,
    pub descriptions: Vec<String>,
    pub cities: Vec<String>,
    pub preview_images: Vec<String>,
    pub detail_images: Vec<String>,
    pub features: Vec<String>,
    pub names: Vec<String>,
    pub emails: Vec<String>,
    pub avatar_paths: Vec<String>,
    pub comments_text: Vec<String>,
}

impl MockData {
    /// Small offline pool set, shaped like what the mock server returns
    pub fn sample() -> Self {
        fn owned(items: &[&str]) -> Vec<String> {
            items.iter().map(|item| item.to_string()).collect()
        }

        Self {
            titles: owned(&[
                "Beautiful & luxurious studio at great location",
                "Wood and stone place near the old harbour",
                "Canal View Prinsengracht with a sunny terrace",
                "Nice, cozy, warm big bed apartment",
                "The house among olive trees in the city",
            ]),
            descriptions: owned(&[
                "A quiet cozy and picturesque place that hides behind a river by the unique lightness of the city.",
                "Spacious rooms with high ceilings, a fully equipped kitchen and a view over the old town.",
                "Bright loft close to the central station, perfect for business travellers and couples.",
            ]),
            cities: City::ALL.iter().map(|city| city.to_string()).collect(),
            preview_images: owned(&["apartment-01.jpg", "apartment-02.jpg", "apartment-03.jpg"]),
            detail_images: owned(&[
                "apartment-01.jpg",
                "apartment-02.jpg",
                "apartment-03.jpg",
                "room.jpg",
                "studio-01.jpg",
                "apartment-small-03.jpg",
            ]),
            features: Feature::ALL.iter().map(|feature| feature.to_string()).collect(),
            names: owned(&["Angelina", "Max", "Oliver", "Sophie", "Lukas"]),
            emails: owned(&[
                "angelina@example.com",
                "max@example.com",
                "oliver@example.com",
                "sophie@example.com",
            ]),
            avatar_paths: owned(&["avatar-angelina.jpg", "avatar-max.jpg", "default-avatar.jpg"]),
            comments_text: owned(&[
                "A quiet cozy and picturesque place.",
                "The apartment was clean and the host was very helpful.",
                "Great location, would stay again.",
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_resolves_every_variant() {
        for city in City::ALL {
            assert_eq!(City::from_name(city.as_str()), Some(*city));
        }
        for feature in Feature::ALL {
            assert_eq!(Feature::from_name(&feature.to_string()), Some(*feature));
        }
    }

    #[test]
    fn test_from_name_unknown_is_none() {
        assert_eq!(OfferType::from_name("Bungalow"), None);
        assert_eq!(City::from_name("paris"), None);
        assert_eq!(UserType::from_name(""), None);
    }

    #[test]
    fn test_mock_data_missing_pools_deserialize_empty() {
        let data: MockData = serde_json::from_str(r#"{"titles": ["One"]}"#).unwrap();
        assert_eq!(data.titles, vec!["One".to_string()]);
        assert!(data.comments_text.is_empty());
    }

    #[test]
    fn test_offer_record_serializes_flat_camel_case() {
        let record = OfferRecord {
            offer: OfferDetails {
                title: "Loft".to_string(),
                city: Some(City::Hamburg),
                ..Default::default()
            },
            comments_number: Some(3),
            ..Default::default()
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["title"], "Loft");
        assert_eq!(json["city"], "Hamburg");
        assert_eq!(json["commentsNumber"], 3);
        assert!(json["user"]["avatarPath"].is_string());
    }
}
