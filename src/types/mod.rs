//! Normalized Type Tree
//!
//! Describes what a document position may contain. Named types reference each
//! other by name through a [`TypeRegistry`], so cyclic definitions (a Schema
//! whose `items` is a Schema) are plain lookups rather than owned recursion.
//!
//! Slots whose content depends on the document instance are closed
//! `Fixed | Computed` variants; computed slots are plain function pointers.

pub mod common;
pub mod oas2;
pub mod oas3;

use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use crate::error::{LintError, Result};
use crate::location::Key;
use crate::matcher::{JsonType, JsonTypes};
use crate::version::OasVersion;

/// Type name of a [`NodeType`]
pub type TypeName = &'static str;

/// Effective schema of one property
#[derive(Debug, Clone, PartialEq)]
pub enum PropSchema {
    /// Validated when the walker descends into the value
    Named(TypeName),
    /// Leaf constraint, validated inline by the owning object
    Scalar(ScalarSchema),
    /// Declared, never checked
    Unchecked,
}

/// Computes the schema of a property from its value and name;
/// `None` means the property is not expected
pub type PropertyFn = fn(&Value, &str) -> Option<PropSchema>;

/// Computes the required field names of an object from the object itself
/// and its key in the parent
pub type RequiredFn = fn(&Map<String, Value>, Option<&Key>) -> Vec<&'static str>;

#[derive(Debug, Clone)]
pub enum PropertySlot {
    Fixed(PropSchema),
    Computed(PropertyFn),
}

impl PropertySlot {
    /// Effective schema for this property instance
    pub fn resolve(&self, value: &Value, name: &str) -> Option<Cow<'_, PropSchema>> {
        match self {
            PropertySlot::Fixed(schema) => Some(Cow::Borrowed(schema)),
            PropertySlot::Computed(f) => f(value, name).map(Cow::Owned),
        }
    }

    fn static_named(&self) -> Option<TypeName> {
        match self {
            PropertySlot::Fixed(PropSchema::Named(name)) => Some(*name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum RequiredSlot {
    Fixed(Vec<&'static str>),
    Computed(RequiredFn),
}

impl RequiredSlot {
    pub fn resolve(&self, node: &Map<String, Value>, key: Option<&Key>) -> Vec<&'static str> {
        match self {
            RequiredSlot::Fixed(names) => names.clone(),
            RequiredSlot::Computed(f) => f(node, key),
        }
    }
}

/// Leaf constraint for a property value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScalarSchema {
    pub type_: Option<JsonTypes>,
    pub enum_: Option<Vec<Value>>,
    /// Primitive type of each element when the value is an array
    pub items: Option<JsonTypes>,
    /// Resolve `$ref` values before checking
    pub referenceable: bool,
}

impl ScalarSchema {
    pub fn of(type_: JsonType) -> Self {
        Self {
            type_: Some(type_.into()),
            ..Default::default()
        }
    }

    pub fn any_of(types: &[JsonType]) -> Self {
        Self {
            type_: Some(JsonTypes::AnyOf(types.to_vec())),
            ..Default::default()
        }
    }

    pub fn one_of_strings(values: &[&str]) -> Self {
        Self {
            enum_: Some(values.iter().map(|v| Value::from(*v)).collect()),
            ..Default::default()
        }
    }

    pub fn array_of(item: JsonType) -> Self {
        Self {
            type_: Some(JsonType::Array.into()),
            items: Some(item.into()),
            ..Default::default()
        }
    }

    pub fn referenceable(mut self) -> Self {
        self.referenceable = true;
        self
    }
}

/// A named type in the tree
#[derive(Debug, Clone)]
pub struct NodeType {
    pub name: TypeName,
    /// Declared properties, in declaration order
    pub properties: Vec<(&'static str, PropertySlot)>,
    /// Used for property names without an explicit entry
    pub additional_properties: Option<PropertySlot>,
    pub required: Option<RequiredSlot>,
    /// Set for array-shaped types: the named type of every element
    pub items: Option<TypeName>,
}

impl NodeType {
    /// An object-shaped type with no properties yet
    pub fn object(name: TypeName) -> Self {
        Self {
            name,
            properties: Vec::new(),
            additional_properties: None,
            required: None,
            items: None,
        }
    }

    /// An array-shaped type whose elements are `item`
    pub fn list(name: TypeName, item: TypeName) -> Self {
        Self {
            items: Some(item),
            ..Self::object(name)
        }
    }

    /// An object whose every value is `value`
    pub fn map(name: TypeName, value: TypeName) -> Self {
        Self::object(name).additional(named(value))
    }

    pub fn prop(mut self, name: &'static str, slot: PropertySlot) -> Self {
        self.properties.push((name, slot));
        self
    }

    pub fn additional(mut self, slot: PropertySlot) -> Self {
        self.additional_properties = Some(slot);
        self
    }

    pub fn required(mut self, names: &[&'static str]) -> Self {
        self.required = Some(RequiredSlot::Fixed(names.to_vec()));
        self
    }

    pub fn required_by(mut self, f: RequiredFn) -> Self {
        self.required = Some(RequiredSlot::Computed(f));
        self
    }

    pub fn is_array(&self) -> bool {
        self.items.is_some()
    }

    /// Slot for `name`, falling back to additional properties
    pub fn property(&self, name: &str) -> Option<&PropertySlot> {
        self.properties
            .iter()
            .find(|(prop, _)| *prop == name)
            .map(|(_, slot)| slot)
            .or(self.additional_properties.as_ref())
    }

    /// Declared property names, in declaration order
    pub fn property_names(&self) -> Vec<&'static str> {
        self.properties.iter().map(|(name, _)| *name).collect()
    }

    fn static_references(&self) -> impl Iterator<Item = TypeName> + '_ {
        self.properties
            .iter()
            .map(|(_, slot)| slot)
            .chain(self.additional_properties.iter())
            .filter_map(PropertySlot::static_named)
            .chain(self.items)
    }
}

// Slot constructors used by the type tables

pub fn named(name: TypeName) -> PropertySlot {
    PropertySlot::Fixed(PropSchema::Named(name))
}

pub fn scalar(schema: ScalarSchema) -> PropertySlot {
    PropertySlot::Fixed(PropSchema::Scalar(schema))
}

pub fn unchecked() -> PropertySlot {
    PropertySlot::Fixed(PropSchema::Unchecked)
}

pub fn computed(f: PropertyFn) -> PropertySlot {
    PropertySlot::Computed(f)
}

pub fn string() -> PropertySlot {
    scalar(ScalarSchema::of(JsonType::String))
}

pub fn boolean() -> PropertySlot {
    scalar(ScalarSchema::of(JsonType::Boolean))
}

pub fn number() -> PropertySlot {
    scalar(ScalarSchema::of(JsonType::Number))
}

pub fn integer() -> PropertySlot {
    scalar(ScalarSchema::of(JsonType::Integer))
}

pub fn string_list() -> PropertySlot {
    scalar(ScalarSchema::array_of(JsonType::String))
}

pub fn one_of(values: &[&str]) -> PropertySlot {
    scalar(ScalarSchema::one_of_strings(values))
}

/// All named types of one document version, keyed by name
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    root: TypeName,
    types: HashMap<TypeName, NodeType>,
}

impl TypeRegistry {
    /// Build a registry, checking that the tree is closed
    ///
    /// Every statically named reference must point at a defined type, and
    /// type names must be unique.
    pub fn new(root: TypeName, types: Vec<NodeType>) -> Result<Self> {
        let mut by_name = HashMap::with_capacity(types.len());
        for node_type in types {
            let name = node_type.name;
            if by_name.insert(name, node_type).is_some() {
                return Err(LintError::SchemaDefinition(format!(
                    "type '{}' is defined twice",
                    name
                )));
            }
        }

        if !by_name.contains_key(root) {
            return Err(LintError::SchemaDefinition(format!(
                "root type '{}' is not defined",
                root
            )));
        }

        let mut missing: HashSet<(TypeName, TypeName)> = HashSet::new();
        for node_type in by_name.values() {
            for reference in node_type.static_references() {
                if !by_name.contains_key(reference) {
                    missing.insert((node_type.name, reference));
                }
            }
        }
        if let Some((owner, reference)) = missing.into_iter().min() {
            return Err(LintError::SchemaDefinition(format!(
                "type '{}' references undefined type '{}'",
                owner, reference
            )));
        }

        Ok(Self {
            root,
            types: by_name,
        })
    }

    pub fn root(&self) -> &NodeType {
        &self.types[self.root]
    }

    pub fn get(&self, name: &str) -> Option<&NodeType> {
        self.types.get(name)
    }

    /// Look up a type reached at traversal time
    ///
    /// Computed slots can name types the static check never saw, so a miss
    /// here is a definition error.
    pub fn expect(&self, name: &str) -> Result<&NodeType> {
        self.get(name).ok_or_else(|| {
            LintError::SchemaDefinition(format!("type '{}' is not defined", name))
        })
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Type registry for a document version
pub fn for_version(version: OasVersion) -> Result<TypeRegistry> {
    match version {
        OasVersion::Oas2 => TypeRegistry::new("Root", oas2::types()),
        OasVersion::Oas3 => TypeRegistry::new("Root", oas3::types()),
    }
}
