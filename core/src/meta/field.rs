//! Meta values and the cached meta collection

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::shared::errors::Result;

/// A value in its stored text form. `None` is stored as SQL NULL.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetaValue(Option<String>);

impl MetaValue {
	pub fn null() -> Self {
		Self(None)
	}

	/// Encode any serializable value as JSON text
	pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
		Ok(Self::from(serde_json::to_value(value)?))
	}

	pub fn as_str(&self) -> Option<&str> {
		self.0.as_deref()
	}

	pub fn is_null(&self) -> bool {
		self.0.is_none()
	}

	pub fn into_inner(self) -> Option<String> {
		self.0
	}
}

impl From<String> for MetaValue {
	fn from(value: String) -> Self {
		Self(Some(value))
	}
}

impl From<&str> for MetaValue {
	fn from(value: &str) -> Self {
		Self(Some(value.to_owned()))
	}
}

impl From<&String> for MetaValue {
	fn from(value: &String) -> Self {
		Self(Some(value.clone()))
	}
}

impl From<bool> for MetaValue {
	fn from(value: bool) -> Self {
		Self(Some(if value { "1" } else { "0" }.to_owned()))
	}
}

macro_rules! display_value {
	($($ty:ty),*) => {
		$(
			impl From<$ty> for MetaValue {
				fn from(value: $ty) -> Self {
					Self(Some(value.to_string()))
				}
			}
		)*
	};
}

display_value!(i32, i64, u32, u64, usize, f32, f64);

impl From<serde_json::Value> for MetaValue {
	fn from(value: serde_json::Value) -> Self {
		match value {
			serde_json::Value::Null => Self(None),
			serde_json::Value::String(s) => Self(Some(s)),
			other => Self(Some(other.to_string())),
		}
	}
}

impl<T: Into<MetaValue>> From<Option<T>> for MetaValue {
	fn from(value: Option<T>) -> Self {
		value.map(Into::into).unwrap_or_default()
	}
}

/// A single persisted meta row
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaField {
	pub id: i64,
	pub owner_id: i64,
	pub key: String,
	pub value: Option<String>,
}

impl MetaField {
	pub fn value(&self) -> Option<&str> {
		self.value.as_deref()
	}

	/// Decode the stored text, trying JSON first and falling back to the raw
	/// string so that plain text values still decode into `String`.
	pub fn value_as<T: DeserializeOwned>(&self) -> Option<T> {
		let raw = self.value.as_deref()?;
		serde_json::from_str(raw)
			.or_else(|_| serde_json::from_value(serde_json::Value::String(raw.to_owned())))
			.ok()
	}
}

/// In-memory snapshot of one owner's meta rows, ordered by primary key
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetaCollection {
	fields: Vec<MetaField>,
}

impl MetaCollection {
	pub fn new(mut fields: Vec<MetaField>) -> Self {
		fields.sort_by_key(|field| field.id);
		Self { fields }
	}

	/// First row stored under `key`
	pub fn get(&self, key: &str) -> Option<&MetaField> {
		self.fields.iter().find(|field| field.key == key)
	}

	/// Value of the first row stored under `key`; absent keys and NULL values
	/// both yield `None`
	pub fn value(&self, key: &str) -> Option<&str> {
		self.get(key).and_then(MetaField::value)
	}

	/// Every row stored under `key`
	pub fn all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a MetaField> + 'a {
		self.fields.iter().filter(move |field| field.key == key)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.get(key).is_some()
	}

	/// Distinct keys in first-seen order
	pub fn keys(&self) -> Vec<&str> {
		let mut keys: Vec<&str> = Vec::new();
		for field in &self.fields {
			if !keys.contains(&field.key.as_str()) {
				keys.push(&field.key);
			}
		}
		keys
	}

	/// Key to value map; for duplicated keys the first row wins
	pub fn to_map(&self) -> HashMap<String, Option<String>> {
		let mut map = HashMap::with_capacity(self.fields.len());
		for field in &self.fields {
			map.entry(field.key.clone())
				.or_insert_with(|| field.value.clone());
		}
		map
	}

	pub fn iter(&self) -> std::slice::Iter<'_, MetaField> {
		self.fields.iter()
	}

	pub fn len(&self) -> usize {
		self.fields.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}
}

impl<'a> IntoIterator for &'a MetaCollection {
	type Item = &'a MetaField;
	type IntoIter = std::slice::Iter<'a, MetaField>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}
