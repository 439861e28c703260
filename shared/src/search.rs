use crate::models::Level;

pub const PRICE_FLOOR: u32 = 0;
pub const PRICE_CEILING: u32 = 5000;

/// Display names; the query value is the lowercased name.
pub const CATEGORIES: [&str; 8] = [
    "Programming",
    "Design",
    "Marketing",
    "Business",
    "Photography",
    "Music",
    "Health & Fitness",
    "Development",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ordering {
    PriceAsc,
    PriceDesc,
    Newest,
    TopRated,
}

impl Ordering {
    pub const ALL: [Self; 4] = [Self::PriceAsc, Self::PriceDesc, Self::Newest, Self::TopRated];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PriceAsc => "price",
            Self::PriceDesc => "-price",
            Self::Newest => "-created_at",
            Self::TopRated => "-rating",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::PriceAsc => "Price (Low → High)",
            Self::PriceDesc => "Price (High → Low)",
            Self::Newest => "Newest First",
            Self::TopRated => "Top Rated",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.as_str() == s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    pub search: String,
    pub level: Option<Level>,
    pub category: Option<String>,
    pub price_min: u32,
    pub price_max: u32,
    pub ordering: Option<Ordering>,
}

impl Default for SearchFilter {
    fn default() -> Self {
        Self {
            search: String::new(),
            level: None,
            category: None,
            price_min: PRICE_FLOOR,
            price_max: PRICE_CEILING,
            ordering: None,
        }
    }
}

impl SearchFilter {
    /// Query pairs in a stable order. Unset and boundary values are left out.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let search = self.search.trim();
        if !search.is_empty() {
            pairs.push(("search", search.to_string()));
        }
        if let Some(level) = self.level {
            pairs.push(("level", level.as_str().to_string()));
        }
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            pairs.push(("category", category.to_lowercase()));
        }
        if self.price_min > PRICE_FLOOR {
            pairs.push(("price_min", self.price_min.to_string()));
        }
        if self.price_max < PRICE_CEILING {
            pairs.push(("price_max", self.price_max.to_string()));
        }
        if let Some(ordering) = self.ordering {
            pairs.push(("ordering", ordering.as_str().to_string()));
        }
        pairs
    }

    /// Keep `price_min <= price_max` after either slider moves.
    pub fn set_price_min(&mut self, value: u32) {
        self.price_min = value.min(PRICE_CEILING);
        self.price_max = self.price_max.max(self.price_min);
    }

    pub fn set_price_max(&mut self, value: u32) {
        self.price_max = value.min(PRICE_CEILING);
        self.price_min = self.price_min.min(self.price_max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_sends_nothing() {
        assert!(SearchFilter::default().query_pairs().is_empty());
    }

    #[test]
    fn price_bounds_only_when_narrowed() {
        let mut filter = SearchFilter::default();
        filter.set_price_min(100);
        filter.set_price_max(5000);
        assert_eq!(filter.query_pairs(), [("price_min", "100".to_string())]);

        filter.set_price_max(800);
        assert_eq!(
            filter.query_pairs(),
            [("price_min", "100".to_string()), ("price_max", "800".to_string())]
        );
    }

    #[test]
    fn full_filter() {
        let filter = SearchFilter {
            search: " rust ".into(),
            level: Some(Level::Advanced),
            category: Some("Health & Fitness".into()),
            ordering: Some(Ordering::TopRated),
            ..Default::default()
        };
        assert_eq!(
            filter.query_pairs(),
            [
                ("search", "rust".to_string()),
                ("level", "advanced".to_string()),
                ("category", "health & fitness".to_string()),
                ("ordering", "-rating".to_string()),
            ]
        );
    }

    #[test]
    fn sliders_cannot_cross() {
        let mut filter = SearchFilter::default();
        filter.set_price_max(300);
        filter.set_price_min(900);
        assert_eq!((filter.price_min, filter.price_max), (900, 900));
    }

    #[test]
    fn ordering_values() {
        let values: Vec<_> = Ordering::ALL.iter().map(|o| o.as_str()).collect();
        assert_eq!(values, ["price", "-price", "-created_at", "-rating"]);
        assert_eq!(Ordering::parse("-created_at"), Some(Ordering::Newest));
    }
}
