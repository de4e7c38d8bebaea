//! Attribute and price filtering over the catalog

use std::cmp::Ordering;

use goods_core::{ProductRecord, QueryConstraints};

use crate::catalog::Catalog;

/// Select records matching the constraints, cheapest first
///
/// A record matches when it carries every attribute as a tag, or when its
/// type contains any attribute. With no attributes the tag condition holds
/// for every record. A price threshold excludes records without a price.
/// Records without a price sort after priced ones; ties keep catalog order.
pub fn match_products<'a>(
    catalog: &'a Catalog,
    constraints: &QueryConstraints,
) -> Vec<&'a ProductRecord> {
    let attributes = &constraints.attributes;

    let mut matches: Vec<&ProductRecord> = catalog
        .iter()
        .filter(|r| r.has_all_tags(attributes) || r.type_contains_any(attributes))
        .filter(|r| match constraints.min_price {
            Some(min) => r.price.is_some_and(|price| price >= min),
            None => true,
        })
        .collect();

    matches.sort_by(|a, b| compare_price(a.price, b.price));
    matches
}

fn compare_price(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, product_type: &str, tags: &[&str], price: Option<f64>) -> ProductRecord {
        ProductRecord {
            id: title.to_lowercase(),
            title: title.to_string(),
            description: String::new(),
            cleaned_description: title.to_string(),
            normalized_description: title.to_lowercase(),
            vendor: "Acme".to_string(),
            product_type: product_type.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            price,
            entities: Vec::new(),
        }
    }

    fn attrs(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn titles(records: &[&ProductRecord]) -> Vec<String> {
        records.iter().map(|r| r.title.clone()).collect()
    }

    fn lotion_and_soap() -> Catalog {
        Catalog::from_records(vec![
            record("Eco Lotion", "lotion", &["eco", "skincare"], Some(25.0)),
            record("Plain Soap", "soap", &["basic"], Some(15.0)),
        ])
    }

    #[test]
    fn test_tag_match_with_price_threshold() {
        let catalog = lotion_and_soap();
        let constraints = QueryConstraints::new(attrs(&["eco"]), Some(20.0));

        let results = match_products(&catalog, &constraints);
        assert_eq!(titles(&results), vec!["Eco Lotion"]);
    }

    #[test]
    fn test_empty_attributes_match_everything_sorted_by_price() {
        let catalog = lotion_and_soap();
        let constraints = QueryConstraints::new(vec![], Some(10.0));

        let results = match_products(&catalog, &constraints);
        assert_eq!(titles(&results), vec!["Plain Soap", "Eco Lotion"]);
    }

    #[test]
    fn test_type_match_alone_is_enough() {
        // Either condition admits a record: "soap" is not a tag here, only the type.
        let catalog = Catalog::from_records(vec![
            record("Bar", "soap", &["basic"], Some(5.0)),
            record("Tagged", "lotion", &["eco", "vegan"], Some(9.0)),
        ]);

        let by_type = match_products(&catalog, &QueryConstraints::new(attrs(&["eco", "Soap"]), None));
        assert_eq!(titles(&by_type), vec!["Bar"]);

        let by_tags = match_products(&catalog, &QueryConstraints::new(attrs(&["eco", "vegan"]), None));
        assert_eq!(titles(&by_tags), vec!["Tagged"]);
    }

    #[test]
    fn test_tag_match_is_case_sensitive() {
        let catalog = lotion_and_soap();
        let results = match_products(&catalog, &QueryConstraints::new(attrs(&["Eco"]), None));
        assert!(results.is_empty());
    }

    #[test]
    fn test_threshold_excludes_missing_prices() {
        let catalog = Catalog::from_records(vec![
            record("Unpriced", "soap", &[], None),
            record("Priced", "soap", &[], Some(12.0)),
        ]);

        let results = match_products(&catalog, &QueryConstraints::new(vec![], Some(0.0)));
        assert_eq!(titles(&results), vec!["Priced"]);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let catalog = lotion_and_soap();
        let results = match_products(&catalog, &QueryConstraints::new(vec![], Some(25.0)));
        assert_eq!(titles(&results), vec!["Eco Lotion"]);
    }

    #[test]
    fn test_missing_prices_sort_last_and_ties_keep_order() {
        let catalog = Catalog::from_records(vec![
            record("Unpriced", "soap", &[], None),
            record("First Ten", "soap", &[], Some(10.0)),
            record("Cheap", "soap", &[], Some(2.0)),
            record("Second Ten", "soap", &[], Some(10.0)),
        ]);

        let results = match_products(&catalog, &QueryConstraints::default());
        assert_eq!(
            titles(&results),
            vec!["Cheap", "First Ten", "Second Ten", "Unpriced"]
        );
    }

    #[test]
    fn test_untyped_records_only_match_by_tags() {
        let catalog = Catalog::from_records(vec![record("Mystery", "", &["gift"], Some(3.0))]);

        assert!(match_products(&catalog, &QueryConstraints::new(attrs(&["soap"]), None)).is_empty());
        assert_eq!(
            match_products(&catalog, &QueryConstraints::new(attrs(&["gift"]), None)).len(),
            1
        );
    }
}
