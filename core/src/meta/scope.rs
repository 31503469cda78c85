//! Meta query scopes
//!
//! Builds the predicate trees used to filter owners by their meta rows. Every
//! filter becomes its own `EXISTS (SELECT 1 FROM <meta> WHERE <fk> = <owner
//! key> AND ...)` sub-query, so conjoined filters may be satisfied by
//! different rows of the same owner.

use sea_orm::sea_query::{Alias, Expr, Query, SimpleExpr};
use sea_orm::Condition;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{MetaRelation, MetaValue};
use crate::shared::errors::{MetaError, Result};

const META_KEY: &str = "meta_key";
const META_VALUE: &str = "meta_value";

/// Comparison applied to `meta_value` (or to `meta_key` for key-only filters)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetaOperator {
	#[default]
	Eq,
	Ne,
	Lt,
	Lte,
	Gt,
	Gte,
	Like,
	NotLike,
}

impl MetaOperator {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Eq => "=",
			Self::Ne => "!=",
			Self::Lt => "<",
			Self::Lte => "<=",
			Self::Gt => ">",
			Self::Gte => ">=",
			Self::Like => "like",
			Self::NotLike => "not like",
		}
	}

	fn apply(self, column: Expr, value: String) -> SimpleExpr {
		match self {
			Self::Eq => column.eq(value),
			Self::Ne => column.ne(value),
			Self::Lt => column.lt(value),
			Self::Lte => column.lte(value),
			Self::Gt => column.gt(value),
			Self::Gte => column.gte(value),
			Self::Like => column.like(value),
			Self::NotLike => column.not_like(value),
		}
	}
}

impl fmt::Display for MetaOperator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for MetaOperator {
	type Err = MetaError;

	fn from_str(s: &str) -> Result<Self> {
		let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
		match normalized.as_str() {
			"=" | "==" => Ok(Self::Eq),
			"!=" | "<>" => Ok(Self::Ne),
			"<" => Ok(Self::Lt),
			"<=" => Ok(Self::Lte),
			">" => Ok(Self::Gt),
			">=" => Ok(Self::Gte),
			"like" => Ok(Self::Like),
			"not like" => Ok(Self::NotLike),
			_ => Err(MetaError::InvalidOperator(s.to_owned())),
		}
	}
}

/// One entry of a meta filter
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MetaFilter {
	/// Bare key: the operator is applied to `meta_key` itself
	Key(String),
	/// `meta_key = key AND meta_value <op> value`
	Value { key: String, value: String },
}

impl MetaFilter {
	/// A NULL value degrades to a key-only filter
	pub fn new(key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
		let key = key.into();
		match value.into().into_inner() {
			Some(value) => Self::Value { key, value },
			None => Self::Key(key),
		}
	}

	pub fn key(&self) -> &str {
		match self {
			Self::Key(key) | Self::Value { key, .. } => key,
		}
	}
}

impl From<&str> for MetaFilter {
	fn from(key: &str) -> Self {
		Self::Key(key.to_owned())
	}
}

impl From<String> for MetaFilter {
	fn from(key: String) -> Self {
		Self::Key(key)
	}
}

impl<K: Into<String>, V: Into<MetaValue>> From<(K, V)> for MetaFilter {
	fn from((key, value): (K, V)) -> Self {
		Self::new(key, value)
	}
}

/// Qualified `meta_table.column` reference
pub(super) fn meta_column(relation: &MetaRelation, column: &str) -> Expr {
	Expr::col((Alias::new(&relation.meta_table), Alias::new(column)))
}

/// `EXISTS` over the owner's meta rows matching `predicate`
fn exists(relation: &MetaRelation, predicate: Condition) -> SimpleExpr {
	let meta = Alias::new(&relation.meta_table);
	let join = Expr::col((meta.clone(), Alias::new(&relation.foreign_key))).equals((
		Alias::new(&relation.owner_table),
		Alias::new(&relation.owner_key),
	));

	let mut query = Query::select();
	query
		.expr(Expr::val(1))
		.from(meta)
		.cond_where(Condition::all().add(join).add(predicate));

	Expr::exists(query)
}

/// Predicate for a single filter entry, without the `EXISTS` wrapper
pub fn filter_predicate(
	relation: &MetaRelation,
	filter: &MetaFilter,
	op: MetaOperator,
) -> Condition {
	match filter {
		MetaFilter::Key(key) => {
			Condition::all().add(op.apply(meta_column(relation, META_KEY), key.clone()))
		}
		MetaFilter::Value { key, value } => Condition::all()
			.add(meta_column(relation, META_KEY).eq(key.as_str()))
			.add(op.apply(meta_column(relation, META_VALUE), value.clone())),
	}
}

/// Owners with at least one meta row matching `filter`
pub fn has_meta(relation: &MetaRelation, filter: &MetaFilter, op: MetaOperator) -> SimpleExpr {
	exists(relation, filter_predicate(relation, filter, op))
}

/// Owners satisfying every filter, each through its own sub-query
pub fn has_meta_all<I>(relation: &MetaRelation, filters: I, op: MetaOperator) -> Condition
where
	I: IntoIterator,
	I::Item: Into<MetaFilter>,
{
	filters
		.into_iter()
		.fold(Condition::all(), |condition, filter| {
			condition.add(has_meta(relation, &filter.into(), op))
		})
}

/// Owners with a `key` row whose value is one of `values`.
///
/// An empty `values` matches nothing rather than failing, so the scope stays
/// composable.
pub fn has_meta_in<I, V>(relation: &MetaRelation, key: &str, values: I) -> SimpleExpr
where
	I: IntoIterator<Item = V>,
	V: Into<MetaValue>,
{
	let values = values
		.into_iter()
		.filter_map(|value| value.into().into_inner())
		.collect::<Vec<_>>();

	if values.is_empty() {
		return Expr::val(1).eq(0);
	}

	exists(
		relation,
		Condition::all()
			.add(meta_column(relation, META_KEY).eq(key))
			.add(meta_column(relation, META_VALUE).is_in(values)),
	)
}

/// [`has_meta`] with a `LIKE` comparison; `pattern` is passed through as-is
pub fn has_meta_like(relation: &MetaRelation, key: &str, pattern: &str) -> SimpleExpr {
	has_meta(relation, &MetaFilter::new(key, pattern), MetaOperator::Like)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::infra::db::entities::post;
	use crate::meta::OwnerKind;
	use sea_orm::{DbBackend, EntityTrait, QueryFilter, QueryTrait};

	fn post_sql(condition: impl sea_orm::sea_query::IntoCondition) -> String {
		post::Entity::find()
			.filter(condition)
			.build(DbBackend::Sqlite)
			.to_string()
	}

	fn relation() -> MetaRelation {
		MetaRelation::for_kind(OwnerKind::Post)
	}

	#[test]
	fn parses_operators() {
		assert_eq!("=".parse::<MetaOperator>().unwrap(), MetaOperator::Eq);
		assert_eq!("<>".parse::<MetaOperator>().unwrap(), MetaOperator::Ne);
		assert_eq!("LIKE".parse::<MetaOperator>().unwrap(), MetaOperator::Like);
		assert_eq!("not   like".parse::<MetaOperator>().unwrap(), MetaOperator::NotLike);
		assert!(matches!(
			"~=".parse::<MetaOperator>(),
			Err(MetaError::InvalidOperator(op)) if op == "~="
		));
	}

	#[test]
	fn null_values_become_key_filters() {
		assert_eq!(MetaFilter::new("color", None::<&str>), MetaFilter::Key("color".into()));
		assert_eq!(
			MetaFilter::from(("size", 3)),
			MetaFilter::Value { key: "size".into(), value: "3".into() }
		);
		assert_eq!(MetaFilter::from("color").key(), "color");
	}

	#[test]
	fn key_value_filter_correlates_with_the_owner() {
		let filter = MetaFilter::new("color", "red");
		let sql = post_sql(has_meta(&relation(), &filter, MetaOperator::Eq));
		assert!(sql.contains(r#"EXISTS(SELECT 1 FROM "postmeta""#), "{sql}");
		assert!(sql.contains(r#""postmeta"."post_id" = "posts"."ID""#), "{sql}");
		assert!(sql.contains(r#""postmeta"."meta_key" = 'color'"#), "{sql}");
		assert!(sql.contains(r#""postmeta"."meta_value" = 'red'"#), "{sql}");
	}

	#[test]
	fn key_filter_applies_the_operator_to_the_key() {
		let sql = post_sql(has_meta(&relation(), &MetaFilter::from("col%"), MetaOperator::Like));
		assert!(sql.contains(r#""postmeta"."meta_key" LIKE 'col%'"#), "{sql}");
		assert!(!sql.contains("meta_value"), "{sql}");
	}

	#[test]
	fn each_filter_gets_its_own_sub_query() {
		let sql = post_sql(has_meta_all(
			&relation(),
			[("color", "red"), ("size", "m")],
			MetaOperator::Eq,
		));
		assert_eq!(sql.matches("EXISTS(").count(), 2, "{sql}");
		assert!(sql.contains(" AND EXISTS("), "{sql}");
	}

	#[test]
	fn membership_uses_in() {
		let sql = post_sql(has_meta_in(&relation(), "color", ["red", "blue"]));
		assert!(sql.contains(r#""postmeta"."meta_value" IN ('red', 'blue')"#), "{sql}");
	}

	#[test]
	fn empty_membership_matches_nothing() {
		let sql = post_sql(has_meta_in(&relation(), "color", Vec::<String>::new()));
		assert!(sql.contains("1 = 0"), "{sql}");
		assert!(!sql.contains("EXISTS"), "{sql}");
	}

	#[test]
	fn like_passes_the_pattern_through() {
		let sql = post_sql(has_meta_like(&relation(), "color", "%re%"));
		assert!(sql.contains(r#""postmeta"."meta_key" = 'color'"#), "{sql}");
		assert!(sql.contains(r#""postmeta"."meta_value" LIKE '%re%'"#), "{sql}");
	}
}
