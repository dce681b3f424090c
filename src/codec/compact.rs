use super::tokenizer::{format_timestamp, join_fields, join_list, RecordTokens};
use super::{check_field_count, RecordParser};
use crate::models::{
    City, CompactOfferRecord, Feature, LocationRecord, MockOffer, OfferDetails, OfferType,
    DEFAULT_CITY,
};
use tracing::debug;

/// Compact layout: offer with a bare user id and no comment text (17 fields)
pub struct CompactRecordParser;

impl CompactRecordParser {
    /// Encode a generated offer in the compact layout, authored by `user_id`
    pub fn encode(offer: &MockOffer, user_id: &str) -> String {
        join_fields(&[
            offer.title.clone(),
            offer.description.clone(),
            format_timestamp(&offer.post_date),
            offer.city.clone(),
            offer.preview_image.clone(),
            join_list(&offer.detail_images),
            offer.is_premium.to_string(),
            offer.rating.to_string(),
            offer.offer_type.to_string(),
            offer.rooms_number.to_string(),
            offer.guests_number.to_string(),
            offer.price.to_string(),
            join_list(&offer.features),
            user_id.to_string(),
            offer.comments_number.to_string(),
            offer.location.latitude.to_string(),
            offer.location.longitude.to_string(),
        ])
    }
}

impl RecordParser for CompactRecordParser {
    type Record = CompactOfferRecord;

    const FIELD_COUNT: usize = 17;
    const NAME: &'static str = "compact";

    fn parse(line: &str) -> CompactOfferRecord {
        let tokens = RecordTokens::split(line);
        check_field_count(Self::NAME, Self::FIELD_COUNT, tokens.len());

        let city_token = tokens.text(3);
        let city = City::from_name(&city_token).unwrap_or_else(|| {
            debug!("Unknown city {:?}, falling back to {}", city_token, DEFAULT_CITY);
            DEFAULT_CITY
        });

        CompactOfferRecord {
            offer: OfferDetails {
                title: tokens.text(0),
                description: tokens.text(1),
                post_date: tokens.timestamp(2),
                city: Some(city),
                preview_image: tokens.text(4),
                detail_images: tokens.list(5),
                is_premium: tokens.boolean(6),
                rating: tokens.int(7),
                offer_type: tokens.token(8).and_then(OfferType::from_name),
                rooms_number: tokens.int(9),
                guests_number: tokens.int(10),
                price: tokens.int(11),
                features: tokens
                    .list(12)
                    .iter()
                    .map(|name| Feature::from_name(name))
                    .collect(),
                location: LocationRecord {
                    latitude: tokens.float(15),
                    longitude: tokens.float(16),
                },
            },
            user_id: tokens.text(13),
            comments_number: tokens.int(14),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::FullRecordParser;
    use crate::generator::TsvOfferGenerator;
    use crate::models::MockData;

    const USER_ID: &str = "65f1c0ffee0000000000beef";

    #[test]
    fn test_compact_round_trip() {
        let mut generator = TsvOfferGenerator::seeded(MockData::sample(), 11);

        for _ in 0..20 {
            let offer = generator.generate_offer().unwrap();
            let line = CompactRecordParser::encode(&offer, USER_ID);
            assert_eq!(line.split('\t').count(), CompactRecordParser::FIELD_COUNT);

            let compact = CompactRecordParser::parse(&line);
            let full = FullRecordParser::parse(&FullRecordParser::encode(&offer));
            assert_eq!(compact.offer, full.offer);
            assert_eq!(compact.user_id, USER_ID);
            assert_eq!(compact.comments_number, Some(offer.comments_number));
        }
    }

    #[test]
    fn test_unknown_city_falls_back_to_default() {
        let mut generator = TsvOfferGenerator::seeded(MockData::sample(), 5);
        let mut offer = generator.generate_offer().unwrap();
        offer.city = "Atlantis".to_string();

        let record = CompactRecordParser::parse(&CompactRecordParser::encode(&offer, USER_ID));
        assert_eq!(record.offer.city, Some(DEFAULT_CITY));
    }

    #[test]
    fn test_full_line_is_not_a_compact_line() {
        let mut generator = TsvOfferGenerator::seeded(MockData::sample(), 8);
        let offer = generator.generate_offer().unwrap();

        let record = CompactRecordParser::parse(&FullRecordParser::encode(&offer));
        assert_eq!(record.user_id, offer.user.name);
        assert_eq!(record.comments_number, None);
    }
}
