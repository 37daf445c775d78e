#[cfg(test)]
mod tests {
    use crate::{ExtractError, Fragment, PriceRecord, PriceSeries, RecordExtractor, StreamReassembler};

    fn fragments(body: &[u8]) -> Vec<Fragment> {
        let mut reassembler = StreamReassembler::new();
        let fragments = reassembler.feed(body).unwrap();
        reassembler.finish().unwrap();
        fragments
    }

    fn single(body: &[u8]) -> Fragment {
        fragments(body).remove(0)
    }

    #[test]
    fn test_string_encoded_price() {
        let extractor = RecordExtractor::default();
        let records = extractor
            .decode(single(br#"[{"aikaleima_suomi":"2024-01-01T00:00","hinta":"3.971"}]"#))
            .unwrap();
        assert_eq!(
            records,
            vec![PriceRecord {
                price: 3.971,
                timestamp: Some("2024-01-01T00:00".to_string()),
            }]
        );
    }

    #[test]
    fn test_numeric_price_and_missing_timestamp() {
        let extractor = RecordExtractor::default();
        let records = extractor.decode(single(br#"[{"hinta":-0.25}]"#)).unwrap();
        assert_eq!(records[0].price, -0.25);
        assert_eq!(records[0].timestamp, None);

        let records = extractor.decode(single(br#"[{"hinta":7}]"#)).unwrap();
        assert_eq!(records[0].price, 7.0);
    }

    #[test]
    fn test_custom_field_names() {
        let extractor = RecordExtractor::new("price", Some("at".to_string()));
        let records = extractor
            .decode(single(br#"[{"at":"noon","price":" 12.5 "}]"#))
            .unwrap();
        assert_eq!(records[0].price, 12.5);
        assert_eq!(records[0].timestamp.as_deref(), Some("noon"));
    }

    #[test]
    fn test_malformed_price_string() {
        let extractor = RecordExtractor::default();
        let err = extractor.decode(single(br#"[{"hinta":"1,5"}]"#)).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidPrice { ref raw } if raw == "1,5"));

        let err = extractor.decode(single(br#"[{"hinta":"NaN"}]"#)).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidPrice { .. }));

        let err = extractor.decode(single(br#"[{"hinta":true}]"#)).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidPrice { .. }));
    }

    #[test]
    fn test_missing_price_field() {
        let extractor = RecordExtractor::default();
        let err = extractor.decode(single(br#"[{"price":"1.0"}]"#)).unwrap_err();
        assert!(matches!(err, ExtractError::MissingField { ref field } if field == "hinta"));
    }

    #[test]
    fn test_invalid_json_inside_element() {
        // Delimited correctly, but not valid JSON.
        let extractor = RecordExtractor::default();
        let err = extractor.decode(single(b"[{hinta: 1}]")).unwrap_err();
        assert!(matches!(err, ExtractError::Json(_)));
        assert!(err.to_string().contains("JSON parsing error"));
    }

    #[test]
    fn test_decode_errors_are_counted_not_fatal() {
        let extractor = RecordExtractor::default();
        let mut series = PriceSeries::default();
        let body = br#"[{"hinta":"1.0"},{"hinta":"oops"},{"hinta":"3.0"},{"x":1}]"#;
        for fragment in fragments(body) {
            extractor.decode_into(fragment, &mut series);
        }
        assert_eq!(series.prices(), vec![1.0, 3.0]);
        assert_eq!(series.skipped, 2);
    }

    #[test]
    fn test_cheapest() {
        let extractor = RecordExtractor::default();
        let mut series = PriceSeries::default();
        assert!(series.cheapest().is_none());
        for fragment in fragments(br#"[{"hinta":"4.2"},{"hinta":"-1.1"},{"hinta":"0.3"}]"#) {
            extractor.decode_into(fragment, &mut series);
        }
        assert_eq!(series.cheapest().map(|record| record.price), Some(-1.1));
        assert_eq!(series.len(), 3);
    }
}
