//! Prediction query type

use serde::{Deserialize, Serialize};

/// A single car to price
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuery {
    pub year: i32,
    pub brand: String,
    pub model: String,
    pub package: String,
}

impl PriceQuery {
    pub fn new(
        year: i32,
        brand: impl Into<String>,
        model: impl Into<String>,
        package: impl Into<String>,
    ) -> Self {
        Self {
            year,
            brand: brand.into(),
            model: model.into(),
            package: package.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_round_trips_through_json() {
        let query = PriceQuery::new(2024, "Toyota", "Corolla", "Dream");
        let json = serde_json::to_string(&query).unwrap();
        let back: PriceQuery = serde_json::from_str(&json).unwrap();
        assert_eq!(back, query);
    }
}
