use crate::domain::shipment::CoreData;

/// A single optional field predicate.
///
/// `Any` is the explicit unset sentinel: it is NOT the same thing as
/// `Value("")`. Form input decodes empty strings to `Any` at the router
/// boundary, so an accidentally empty dropdown can never turn into an
/// exact-match-on-empty filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldFilter {
    #[default]
    Any,
    Value(String),
}

impl FieldFilter {
    /// Decode a form value: empty means "no filter".
    pub fn from_form_value(raw: &str) -> Self {
        if raw.is_empty() {
            FieldFilter::Any
        } else {
            FieldFilter::Value(raw.to_string())
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            FieldFilter::Any => None,
            FieldFilter::Value(v) => Some(v),
        }
    }

    /// An unset predicate matches everything; a set one requires exact match.
    pub fn matches(&self, actual: &str) -> bool {
        match self {
            FieldFilter::Any => true,
            FieldFilter::Value(v) => v == actual,
        }
    }
}

/// Pagination cursor. `skip` is what goes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub index: usize,
    pub size: usize,
}

impl Page {
    pub fn first(size: usize) -> Self {
        Self { index: 0, size }
    }

    pub fn skip(&self) -> usize {
        self.index * self.size
    }
}

impl Default for Page {
    fn default() -> Self {
        Page::first(10)
    }
}

/// Composite criteria for one fetch: per-field predicates, the settled
/// free-text query, and pagination.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub delivery_preferences: FieldFilter,
    pub delivery_time: FieldFilter,
    pub seller: FieldFilter,
    pub seller_address: FieldFilter,
    pub status: FieldFilter,
    /// Settled (debounced) free-text query. `None` when the box is empty.
    pub query: Option<String>,
    pub page: Page,
}

impl FilterCriteria {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: Page::first(page_size),
            ..Self::default()
        }
    }

    /// Whether a record satisfies every set predicate plus the free-text
    /// query. The backend applies the same semantics server-side; this is
    /// the reference implementation of the contract.
    pub fn matches(&self, core: &CoreData) -> bool {
        if !self.delivery_preferences.matches(&core.delivery_preferences) {
            return false;
        }
        if !self.delivery_time.matches(core.delivery_time.as_deref().unwrap_or("")) {
            return false;
        }
        if !self.seller.matches(&core.seller) {
            return false;
        }
        if !self.seller_address.matches(&core.seller_address) {
            return false;
        }
        if !self.status.matches(&core.status) {
            return false;
        }
        match &self.query {
            None => true,
            Some(q) => query_matches(q, core),
        }
    }

    /// Wire query parameters for the list endpoint. Unset predicates are
    /// omitted entirely rather than sent as empty strings.
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("limit", self.page.size.to_string()),
            ("skip", self.page.skip().to_string()),
        ];

        if let Some(v) = self.seller_address.value() {
            params.push(("sellerAddress", v.to_string()));
        }
        if let Some(v) = self.seller.value() {
            params.push(("seller", v.to_string()));
        }
        if let Some(v) = self.delivery_time.value() {
            params.push(("deliveryTime", v.to_string()));
        }
        if let Some(v) = self.delivery_preferences.value() {
            params.push(("deliveryPreferences", v.to_string()));
        }
        if let Some(v) = self.status.value() {
            params.push(("status", v.to_string()));
        }
        if let Some(q) = &self.query {
            params.push(("q", q.clone()));
        }

        params
    }
}

/// Case-insensitive substring match over the fixed free-text field set:
/// seller, address, buyer, id, order, deliveryPreferences.
fn query_matches(query: &str, core: &CoreData) -> bool {
    let needle = query.to_lowercase();

    contains_ci(&core.seller, &needle)
        || contains_ci(&core.address, &needle)
        || contains_ci(&core.buyer, &needle)
        || contains_ci(&core.id.to_string(), &needle)
        || contains_ci(core.order.as_deref().unwrap_or(""), &needle)
        || contains_ci(&core.delivery_preferences, &needle)
}

fn contains_ci(haystack: &str, lowercased_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowercased_needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CoreData {
        CoreData {
            id: 48213,
            buyer: "María Pérez".to_string(),
            address: "Av. Corrientes 1234".to_string(),
            zip_code: "C1043".to_string(),
            seller: "Acme Depot".to_string(),
            seller_address: "Parque Industrial Sur".to_string(),
            delivery_preferences: "residential".to_string(),
            status: "pending".to_string(),
            order: Some("OV-9931".to_string()),
            ..CoreData::default()
        }
    }

    #[test]
    fn empty_form_value_is_unset_not_empty_match() {
        assert_eq!(FieldFilter::from_form_value(""), FieldFilter::Any);
        assert_eq!(
            FieldFilter::from_form_value("business"),
            FieldFilter::Value("business".to_string())
        );

        // A deliberate Value("") only matches the empty string.
        assert!(FieldFilter::Any.matches("anything"));
        assert!(!FieldFilter::Value(String::new()).matches("anything"));
        assert!(FieldFilter::Value(String::new()).matches(""));
    }

    #[test]
    fn unset_predicates_match_everything() {
        let criteria = FilterCriteria::default();
        assert!(criteria.matches(&sample()));
    }

    #[test]
    fn set_predicate_requires_exact_match() {
        let mut criteria = FilterCriteria::default();
        criteria.status = FieldFilter::Value("pending".to_string());
        assert!(criteria.matches(&sample()));

        criteria.status = FieldFilter::Value("delivered".to_string());
        assert!(!criteria.matches(&sample()));

        // Exact, not substring.
        criteria.status = FieldFilter::Value("pend".to_string());
        assert!(!criteria.matches(&sample()));
    }

    #[test]
    fn status_and_query_combine() {
        let mut criteria = FilterCriteria::default();
        criteria.status = FieldFilter::Value("pending".to_string());
        criteria.query = Some("acme".to_string());

        assert!(criteria.matches(&sample()));

        let mut other_status = sample();
        other_status.status = "delivered".to_string();
        assert!(!criteria.matches(&other_status));

        let mut no_acme = sample();
        no_acme.seller = "Norte Logística".to_string();
        assert!(!criteria.matches(&no_acme));
    }

    #[test]
    fn query_searches_the_fixed_field_set() {
        let criteria = |q: &str| FilterCriteria {
            query: Some(q.to_string()),
            ..FilterCriteria::default()
        };

        // seller, address, buyer, id, order, deliveryPreferences
        assert!(criteria("ACME").matches(&sample()));
        assert!(criteria("corrientes").matches(&sample()));
        assert!(criteria("pérez").matches(&sample()));
        assert!(criteria("48213").matches(&sample()));
        assert!(criteria("ov-9931").matches(&sample()));
        assert!(criteria("resid").matches(&sample()));

        // zip code is not part of the free-text field set
        assert!(!criteria("C1043").matches(&sample()));
    }

    #[test]
    fn wire_params_omit_unset_fields() {
        let mut criteria = FilterCriteria::new(25);
        criteria.page.index = 2;
        criteria.seller = FieldFilter::Value("Acme Depot".to_string());
        criteria.query = Some("sur".to_string());

        let params = criteria.to_query_params();
        assert_eq!(
            params,
            vec![
                ("limit", "25".to_string()),
                ("skip", "50".to_string()),
                ("seller", "Acme Depot".to_string()),
                ("q", "sur".to_string()),
            ]
        );
    }

    #[test]
    fn page_skip_math() {
        assert_eq!(Page::first(10).skip(), 0);
        assert_eq!(Page { index: 3, size: 25 }.skip(), 75);
    }
}
