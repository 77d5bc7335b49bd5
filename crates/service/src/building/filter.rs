use sea_orm::{ColumnTrait, Condition};
use serde::Deserialize;

use models::building;

/// Optional listing criteria. Only the supplied ones become predicates,
/// always combined with AND.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct BuildingFilter {
    pub name: Option<String>,
    pub location: Option<String>,
    pub max_price: Option<i64>,
    pub approved: Option<bool>,
}

impl BuildingFilter {
    /// Fold the supplied criteria into a conjunction. An empty string for
    /// name or location counts as absent, not as "match the empty string".
    /// Name and location match exactly; `max_price` is an inclusive upper
    /// bound. No criteria at all yields an empty condition (every row).
    pub fn to_condition(&self) -> Condition {
        let mut cond = Condition::all();
        if let Some(name) = self.name.as_deref().filter(|s| !s.is_empty()) {
            cond = cond.add(building::Column::Name.eq(name));
        }
        if let Some(location) = self.location.as_deref().filter(|s| !s.is_empty()) {
            cond = cond.add(building::Column::Location.eq(location));
        }
        if let Some(max_price) = self.max_price {
            cond = cond.add(building::Column::Price.lte(max_price));
        }
        if let Some(approved) = self.approved {
            cond = cond.add(building::Column::Approved.eq(approved));
        }
        cond
    }
}

#[cfg(test)]
mod tests {
    use super::BuildingFilter;
    use models::building;
    use sea_orm::{DbBackend, EntityTrait, QueryFilter, QueryTrait};

    fn render(filter: &BuildingFilter) -> String {
        building::Entity::find()
            .filter(filter.to_condition())
            .build(DbBackend::Postgres)
            .to_string()
    }

    #[test]
    fn no_criteria_renders_no_where_clause() {
        let sql = render(&BuildingFilter::default());
        assert!(!sql.contains("WHERE"), "unexpected WHERE in: {sql}");
    }

    #[test]
    fn name_criterion_is_an_exact_match() {
        let filter = BuildingFilter { name: Some("Loft".into()), ..Default::default() };
        let sql = render(&filter);
        assert!(sql.contains(r#""building"."name" = 'Loft'"#), "got: {sql}");
        assert!(!sql.contains("LIKE"));
    }

    #[test]
    fn empty_string_name_is_treated_as_absent() {
        let filter = BuildingFilter { name: Some(String::new()), ..Default::default() };
        let sql = render(&filter);
        assert!(!sql.contains("WHERE"), "unexpected WHERE in: {sql}");
    }

    #[test]
    fn max_price_is_an_inclusive_upper_bound() {
        let filter = BuildingFilter { max_price: Some(1500), ..Default::default() };
        let sql = render(&filter);
        assert!(sql.contains(r#""building"."price" <= 1500"#), "got: {sql}");
    }

    #[test]
    fn supplied_criteria_combine_with_and() {
        let filter = BuildingFilter {
            name: Some("Loft".into()),
            location: Some("Springfield".into()),
            max_price: Some(2000),
            approved: Some(true),
        };
        let sql = render(&filter);
        assert!(sql.contains(r#""building"."name" = 'Loft'"#), "got: {sql}");
        assert!(sql.contains(r#""building"."location" = 'Springfield'"#), "got: {sql}");
        assert!(sql.contains(r#""building"."price" <= 2000"#), "got: {sql}");
        assert!(sql.contains(r#""building"."approved" = TRUE"#), "got: {sql}");
        assert_eq!(sql.matches(" AND ").count(), 3, "got: {sql}");
        assert!(!sql.contains(" OR "), "got: {sql}");
    }
}
