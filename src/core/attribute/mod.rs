use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};


#[remain::sorted]
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum Err {
	/// The name is not in the component count table.
	#[error("Attribute name {0:?} has no known component count")]
	UnknownAttributeName(String),
}

/// Describes where one vertex attribute lives inside the vertex buffers of a sub-mesh and
/// how its components are encoded. One attribute may be known under several names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDescriptor {
	/// aliases of the attribute, e.g. `["Position0"]` or `["map1", "uvSet"]`
	pub names: Vec<String>,

	/// which vertex buffer holds the values. Buffer 1 uses the secondary offset and stride
	/// of the sub-mesh; every other index uses the primary ones.
	pub buffer_index: u32,

	/// byte offset of the first component within one vertex
	pub buffer_offset: u32,

	pub format: AttributeFormat,
}

impl AttributeDescriptor {
	pub fn new<S: Into<String>>(name: S, buffer_index: u32, buffer_offset: u32, format: AttributeFormat) -> Self {
		Self {
			names: vec![name.into()],
			buffer_index,
			buffer_offset,
			format,
		}
	}

	/// Adds another name the attribute can be looked up by.
	pub fn with_alias<S: Into<String>>(mut self, alias: S) -> Self {
		self.names.push(alias.into());
		self
	}

	#[inline]
	pub fn has_name(&self, name: &str) -> bool {
		self.names.iter().any(|n| n == name)
	}
}


/// Encoding of a single attribute component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeFormat {
	Float,
	Byte,
	HalfFloat,
	HalfFloat2,
	/// Any other id. Decoded as a single byte.
	Unknown(u32),
}

impl AttributeFormat {
	pub fn from_id(id: u32) -> Self {
		match id {
			0 => AttributeFormat::Float,
			2 => AttributeFormat::Byte,
			5 => AttributeFormat::HalfFloat,
			8 => AttributeFormat::HalfFloat2,
			other => AttributeFormat::Unknown(other),
		}
	}

	pub fn id(self) -> u32 {
		match self {
			AttributeFormat::Float => 0,
			AttributeFormat::Byte => 2,
			AttributeFormat::HalfFloat => 5,
			AttributeFormat::HalfFloat2 => 8,
			AttributeFormat::Unknown(id) => id,
		}
	}

	/// returns the size of one component in bytes e.g. 4 for `Float`
	pub fn size(self) -> usize {
		match self {
			AttributeFormat::Float => 4,
			AttributeFormat::HalfFloat | AttributeFormat::HalfFloat2 => 2,
			AttributeFormat::Byte | AttributeFormat::Unknown(_) => 1,
		}
	}
}

impl fmt::Display for AttributeFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			AttributeFormat::Unknown(id) => write!(f, "Unknown({})", id),
			other => fmt::Debug::fmt(other, f),
		}
	}
}

// Serialized as the numeric data type id the container stores.
impl Serialize for AttributeFormat {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_u32(self.id())
	}
}

impl<'de> Deserialize<'de> for AttributeFormat {
	fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		u32::deserialize(deserializer).map(AttributeFormat::from_id)
	}
}


/// How the number of components of an attribute is derived from the name it is queried by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentCountPolicy {
	/// Look the name up in [`component_count_table`]; unlisted names are an error.
	#[default]
	Table,
	/// Substring rules of the legacy tool: `colorSet*` has 4 components, `map1`, `bake1`
	/// and `*uvSet*` have 2, everything else has 3.
	NamePattern,
}

impl ComponentCountPolicy {
	pub fn component_count(self, name: &str) -> Result<usize, Err> {
		match self {
			ComponentCountPolicy::Table => COMPONENT_COUNTS.get(name)
				.copied()
				.ok_or_else(|| Err::UnknownAttributeName(name.to_owned())),
			ComponentCountPolicy::NamePattern => Ok(component_count_from_pattern(name)),
		}
	}
}

fn component_count_from_pattern(name: &str) -> usize {
	if name == "map1" || name == "bake1" || name.contains("uvSet") {
		2
	} else if name.contains("colorSet") {
		4
	} else {
		3
	}
}

lazy_static! {
	static ref COMPONENT_COUNTS: HashMap<&'static str, usize> = {
		let mut table = HashMap::new();
		for name in [
			"Position0", "position0",
			"Normal0", "normal0",
			"Tangent0", "tangent0",
		] {
			table.insert(name, 3);
		}
		for name in ["map1", "bake1", "uvSet", "uvSet1", "uvSet2", "uvSet3"] {
			table.insert(name, 2);
		}
		for name in [
			"colorSet1", "colorSet2", "colorSet2_1", "colorSet2_2", "colorSet2_3",
			"colorSet3", "colorSet4", "colorSet5", "colorSet6", "colorSet7",
		] {
			table.insert(name, 4);
		}
		table
	};
}

/// The canonical attribute names and their component counts, sorted by name.
pub fn component_count_table() -> Vec<(&'static str, usize)> {
	let mut out = COMPONENT_COUNTS.iter()
		.map(|(&name, &count)| (name, count))
		.collect::<Vec<_>>();
	out.sort_unstable();
	out
}


/// One decoded attribute value. Components beyond the attribute's component count are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VertexValue {
	pub x: f32,
	pub y: f32,
	pub z: f32,
	pub w: f32,
}

impl VertexValue {
	pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0, w: 0.0 };

	pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
		Self { x, y, z, w }
	}

	#[inline]
	pub(crate) fn set(&mut self, component: usize, value: f32) {
		match component {
			0 => self.x = value,
			1 => self.y = value,
			2 => self.z = value,
			3 => self.w = value,
			_ => unreachable!("vertex values have at most 4 components"),
		}
	}
}

impl From<VertexValue> for [f32; 4] {
	fn from(v: VertexValue) -> Self {
		[v.x, v.y, v.z, v.w]
	}
}

impl From<[f32; 4]> for VertexValue {
	fn from([x, y, z, w]: [f32; 4]) -> Self {
		Self { x, y, z, w }
	}
}

impl fmt::Display for VertexValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "({}, {}, {}, {})", self.x, self.y, self.z, self.w)
	}
}


#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn format_ids() {
		for format in [AttributeFormat::Float, AttributeFormat::Byte, AttributeFormat::HalfFloat, AttributeFormat::HalfFloat2] {
			assert_eq!(AttributeFormat::from_id(format.id()), format);
		}
		assert_eq!(AttributeFormat::from_id(3), AttributeFormat::Unknown(3));
		assert_eq!(AttributeFormat::Unknown(3).size(), 1);
		assert_eq!(AttributeFormat::HalfFloat2.size(), 2);
	}

	#[test]
	fn format_serializes_as_id() {
		let json = serde_json::to_string(&AttributeFormat::HalfFloat).unwrap();
		assert_eq!(json, "5");
		let format: AttributeFormat = serde_json::from_str("7").unwrap();
		assert_eq!(format, AttributeFormat::Unknown(7));
	}

	#[test]
	fn table_counts() {
		let policy = ComponentCountPolicy::Table;
		assert_eq!(policy.component_count("Position0"), Ok(3));
		assert_eq!(policy.component_count("normal0"), Ok(3));
		assert_eq!(policy.component_count("map1"), Ok(2));
		assert_eq!(policy.component_count("uvSet2"), Ok(2));
		assert_eq!(policy.component_count("colorSet2_3"), Ok(4));
		assert_eq!(
			policy.component_count("boneWeights"),
			Err(Err::UnknownAttributeName("boneWeights".to_owned()))
		);
	}

	#[test]
	fn pattern_counts() {
		let policy = ComponentCountPolicy::NamePattern;
		assert_eq!(policy.component_count("map1"), Ok(2));
		assert_eq!(policy.component_count("bake1"), Ok(2));
		assert_eq!(policy.component_count("uvSet9"), Ok(2));
		assert_eq!(policy.component_count("colorSet9"), Ok(4));
		assert_eq!(policy.component_count("map2"), Ok(3));
		assert_eq!(policy.component_count("anything"), Ok(3));
	}

	#[test]
	fn table_agrees_with_patterns() {
		for (name, count) in component_count_table() {
			assert_eq!(component_count_from_pattern(name), count, "{}", name);
		}
	}

	#[test]
	fn lookup_by_alias() {
		let att = AttributeDescriptor::new("map1", 0, 12, AttributeFormat::HalfFloat)
			.with_alias("uvSet");
		assert!(att.has_name("map1"));
		assert!(att.has_name("uvSet"));
		assert!(!att.has_name("uvSet1"));
	}
}
