use simd_json::base::{ValueAsContainer, ValueAsScalar};
use simd_json::derived::ValueObjectAccess;
use simd_json::OwnedValue;
use tracing::warn;

use crate::{metrics, ExtractError, Fragment};

/// One decoded price point.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRecord {
    pub price: f64,
    pub timestamp: Option<String>,
}

/// Prices of one response, in arrival order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    pub records: Vec<PriceRecord>,
    /// Fragments that could not be decoded.
    pub skipped: usize,
}

impl PriceSeries {
    pub fn prices(&self) -> Vec<f64> {
        self.records.iter().map(|record| record.price).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Cheapest record, ignoring ties after the first.
    pub fn cheapest(&self) -> Option<&PriceRecord> {
        self.records
            .iter()
            .min_by(|a, b| a.price.total_cmp(&b.price))
    }
}

#[derive(Debug, Clone)]
pub struct RecordExtractor {
    price_field: String,
    timestamp_field: Option<String>,
}

impl Default for RecordExtractor {
    fn default() -> Self {
        Self::new("hinta", Some("aikaleima_suomi".to_string()))
    }
}

impl RecordExtractor {
    pub fn new(price_field: impl Into<String>, timestamp_field: Option<String>) -> Self {
        Self {
            price_field: price_field.into(),
            timestamp_field,
        }
    }

    /// Decodes a fragment and pulls the price out of each element in it.
    pub fn decode(&self, fragment: Fragment) -> Result<Vec<PriceRecord>, ExtractError> {
        let mut bytes = fragment.into_bytes();
        let value = simd_json::to_owned_value(&mut bytes)?;
        let elements = value.as_array().ok_or(ExtractError::NotAnArray)?;
        elements.iter().map(|element| self.extract(element)).collect()
    }

    /// Decodes a fragment into `series`, counting it as skipped on failure.
    pub fn decode_into(&self, fragment: Fragment, series: &mut PriceSeries) {
        match self.decode(fragment) {
            Ok(records) => series.records.extend(records),
            Err(e) => {
                warn!("Skipping undecodable element: {}", e);
                metrics::record_skipped();
                series.skipped += 1;
            }
        }
    }

    fn extract(&self, element: &OwnedValue) -> Result<PriceRecord, ExtractError> {
        let raw = element
            .get(self.price_field.as_str())
            .ok_or_else(|| ExtractError::MissingField {
                field: self.price_field.clone(),
            })?;

        let price = match raw.as_str() {
            Some(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| ExtractError::InvalidPrice { raw: text.to_string() })?,
            None => raw
                .cast_f64()
                .ok_or_else(|| ExtractError::InvalidPrice { raw: raw.to_string() })?,
        };
        if !price.is_finite() {
            return Err(ExtractError::InvalidPrice { raw: raw.to_string() });
        }

        let timestamp = self
            .timestamp_field
            .as_deref()
            .and_then(|field| element.get(field))
            .and_then(|value| value.as_str())
            .map(str::to_string);

        Ok(PriceRecord { price, timestamp })
    }
}
