//! # Join Resolver
//!
//! Decides which related tables a Sale search must join, and attaches each
//! relationship predicate to its join.
//!
//! ## Resolution
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SaleCriteria                         JoinSet                           │
//! │  ────────────                         ───────                           │
//! │  customer_id   = X     ──┐                                              │
//! │                          ├──►  Customer ─ [c.id = X,                    │
//! │  customer_name = "DOE" ──┘                 c.name_folded ∋ "doe"]       │
//! │                                                                         │
//! │  product_ids   = [a,b] ────►  Products ─ [p.id IN (a, b)]               │
//! │                                                                         │
//! │  none of the above     ────►  {}  (no filtering joins at all)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A relation is joined at most once. Every predicate that needs it is
//! pushed onto that one join.

use std::collections::BTreeMap;

use crate::criteria::SaleCriteria;
use crate::field::{CustomerField, ProductField, SortableField};
use crate::filter::Predicate;
use crate::types::EntityKind;
use crate::validation::{canonical_id, present};

/// A relation reachable from a Sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Relation {
    /// Many-to-one: `sales.customer_id → customers.id`.
    Customer,
    /// Many-to-many through `sale_products`.
    Products,
}

impl Relation {
    /// The entity on the far side of the relation.
    pub const fn target(&self) -> EntityKind {
        match self {
            Relation::Customer => EntityKind::Customer,
            Relation::Products => EntityKind::Product,
        }
    }

    /// To-many joins can repeat root rows, so the query must be DISTINCT.
    pub const fn is_to_many(&self) -> bool {
        matches!(self, Relation::Products)
    }
}

/// One inner join and the predicates evaluated against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    relation: Relation,
    predicates: Vec<Predicate>,
}

impl Join {
    pub fn relation(&self) -> Relation {
        self.relation
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn push(&mut self, predicate: Predicate) {
        self.predicates.push(predicate);
    }
}

/// The set of joins required by a query, keyed by relation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinSet {
    joins: BTreeMap<Relation, Join>,
}

impl JoinSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the join for `relation`, creating it on first use.
    pub fn require(&mut self, relation: Relation) -> &mut Join {
        self.joins.entry(relation).or_insert_with(|| Join {
            relation,
            predicates: Vec::new(),
        })
    }

    pub fn get(&self, relation: Relation) -> Option<&Join> {
        self.joins.get(&relation)
    }

    /// Joins in a stable order (Customer before Products).
    pub fn iter(&self) -> impl Iterator<Item = &Join> {
        self.joins.values()
    }

    pub fn len(&self) -> usize {
        self.joins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joins.is_empty()
    }

    /// Whether any join may multiply root rows.
    pub fn needs_distinct(&self) -> bool {
        self.joins.keys().any(Relation::is_to_many)
    }
}

/// Collects the joins a Sale search needs.
pub fn resolve_sale_joins(criteria: &SaleCriteria) -> JoinSet {
    let mut joins = JoinSet::new();

    if let Some(customer_id) = present(criteria.customer_id.as_deref()) {
        joins
            .require(Relation::Customer)
            .push(Predicate::eq(CustomerField::Id.column(), canonical_id(customer_id)));
    }

    if let Some(name) = present(criteria.customer_name.as_deref()) {
        joins
            .require(Relation::Customer)
            .push(Predicate::contains_ignore_case(CustomerField::folded_name(), name));
    }

    if let Some(ids) = criteria.product_ids.as_deref().filter(|ids| !ids.is_empty()) {
        joins.require(Relation::Products).push(Predicate::in_list(
            ProductField::Id.column(),
            ids.iter().map(String::as_str).map(canonical_id),
        ));
    }

    joins
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_relationship_filters_no_joins() {
        let criteria = SaleCriteria {
            id: Some("s-1".to_string()),
            ..Default::default()
        };
        assert!(resolve_sale_joins(&criteria).is_empty());
    }

    #[test]
    fn test_customer_filters_share_one_join() {
        let criteria = SaleCriteria {
            customer_id: Some("c-1".to_string()),
            customer_name: Some("doe".to_string()),
            ..Default::default()
        };
        let joins = resolve_sale_joins(&criteria);

        assert_eq!(joins.len(), 1);
        let customer = joins.get(Relation::Customer).unwrap();
        assert_eq!(customer.predicates().len(), 2);
        assert!(!joins.needs_distinct());
    }

    #[test]
    fn test_empty_product_list_is_absent() {
        let criteria = SaleCriteria {
            product_ids: Some(Vec::new()),
            ..Default::default()
        };
        assert!(resolve_sale_joins(&criteria).is_empty());
    }

    #[test]
    fn test_product_membership_join() {
        let criteria = SaleCriteria {
            product_ids: Some(vec!["p-1".to_string(), "p-2".to_string()]),
            ..Default::default()
        };
        let joins = resolve_sale_joins(&criteria);
        let products = joins.get(Relation::Products).unwrap();

        assert_eq!(
            products.predicates(),
            &[Predicate::in_list(ProductField::Id.column(), ["p-1", "p-2"])]
        );
        assert!(joins.needs_distinct());
        assert_eq!(products.relation().target(), EntityKind::Product);
    }

    #[test]
    fn test_joins_iterate_in_stable_order() {
        let mut joins = JoinSet::new();
        joins.require(Relation::Products);
        joins.require(Relation::Customer);
        joins.require(Relation::Products);

        let order: Vec<Relation> = joins.iter().map(Join::relation).collect();
        assert_eq!(order, vec![Relation::Customer, Relation::Products]);
    }

    #[test]
    fn test_relationship_ids_are_canonicalized() {
        let criteria = SaleCriteria {
            customer_id: Some("550E8400-E29B-41D4-A716-446655440000".to_string()),
            product_ids: Some(vec!["urn:uuid:6BA7B810-9DAD-11D1-80B4-00C04FD430C8".to_string()]),
            ..Default::default()
        };
        let joins = resolve_sale_joins(&criteria);

        assert_eq!(
            joins.get(Relation::Customer).unwrap().predicates(),
            &[Predicate::eq(
                CustomerField::Id.column(),
                "550e8400-e29b-41d4-a716-446655440000"
            )]
        );
        assert_eq!(
            joins.get(Relation::Products).unwrap().predicates(),
            &[Predicate::in_list(
                ProductField::Id.column(),
                ["6ba7b810-9dad-11d1-80b4-00c04fd430c8"]
            )]
        );
    }

    #[test]
    fn test_customer_name_targets_folded_column() {
        let criteria = SaleCriteria {
            customer_name: Some("NÚÑEZ".to_string()),
            ..Default::default()
        };
        let joins = resolve_sale_joins(&criteria);

        assert_eq!(
            joins.get(Relation::Customer).unwrap().predicates(),
            &[Predicate::ContainsIgnoreCase {
                column: CustomerField::folded_name(),
                needle: "núñez".to_string(),
            }]
        );
    }
}
