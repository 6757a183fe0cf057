use crate::models::Property;
use std::fmt;
use std::str::FromStr;

/// Client-side ordering of the fetched list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Most recently created first
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::PriceAsc => "price-asc",
            SortKey::PriceDesc => "price-desc",
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "newest" => Ok(SortKey::Newest),
            "price-asc" => Ok(SortKey::PriceAsc),
            "price-desc" => Ok(SortKey::PriceDesc),
            other => Err(format!(
                "unknown sort key '{}' (expected newest, price-asc or price-desc)",
                other
            )),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Return a sorted copy of `list`; equal keys keep their fetch order.
pub fn sort_properties(list: &[Property], key: SortKey) -> Vec<Property> {
    let mut sorted = list.to_vec();
    // sort_by is stable
    match key {
        SortKey::Newest => sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::PriceAsc => sorted.sort_by(|a, b| a.price.amount().total_cmp(&b.price.amount())),
        SortKey::PriceDesc => sorted.sort_by(|a, b| b.price.amount().total_cmp(&a.price.amount())),
    }
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::rental;

    fn ids(list: &[Property]) -> Vec<&str> {
        list.iter().map(|p| p.id.as_str()).collect()
    }

    fn sample() -> Vec<Property> {
        vec![
            rental("a", 1500.0, 3),
            rental("b", 900.0, 10),
            rental("c", 1500.0, 1),
            rental("d", 2200.0, 10),
            rental("e", 900.0, 5),
        ]
    }

    #[test]
    fn test_newest_first() {
        let sorted = sort_properties(&sample(), SortKey::Newest);
        // b and d share a creation date
        assert_eq!(ids(&sorted), vec!["b", "d", "e", "a", "c"]);
    }

    #[test]
    fn test_price_ascending_is_stable() {
        let sorted = sort_properties(&sample(), SortKey::PriceAsc);
        assert_eq!(ids(&sorted), vec!["b", "e", "a", "c", "d"]);
    }

    #[test]
    fn test_asc_then_desc_reverses_price_order() {
        let asc = sort_properties(&sample(), SortKey::PriceAsc);
        let desc = sort_properties(&asc, SortKey::PriceDesc);

        assert_eq!(ids(&desc), vec!["d", "a", "c", "b", "e"]);
        let prices: Vec<f64> = desc.iter().map(|p| p.price.amount()).collect();
        assert_eq!(prices, vec![2200.0, 1500.0, 1500.0, 900.0, 900.0]);
    }

    #[test]
    fn test_sorting_is_idempotent() {
        let list = sample();
        for key in [SortKey::Newest, SortKey::PriceAsc, SortKey::PriceDesc] {
            let once = sort_properties(&list, key);
            let twice = sort_properties(&once, key);
            assert_eq!(once, twice, "key: {}", key);
        }
    }

    #[test]
    fn test_input_is_not_mutated() {
        let list = sample();
        let _ = sort_properties(&list, SortKey::PriceDesc);
        assert_eq!(ids(&list), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_empty_list() {
        assert!(sort_properties(&[], SortKey::Newest).is_empty());
    }

    #[test]
    fn test_key_round_trips_through_text() {
        for key in [SortKey::Newest, SortKey::PriceAsc, SortKey::PriceDesc] {
            assert_eq!(key.as_str().parse::<SortKey>().unwrap(), key);
        }
        assert!("price".parse::<SortKey>().is_err());
    }
}
