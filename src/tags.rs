//! Rules describing what to do at each tag, level by level.

use crate::mutator::{CollectionMutator, Mutator};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What to do with the elements of one tag under the current root.
///
/// ```
/// use xml_modify::{ModificationTags, Mutator, Rule};
///
/// // set the colour of the third data point of a series
/// let tags = ModificationTags::new().tag(
///     "c:dPt",
///     Rule::at(2)
///         .mutator(Mutator::value(2, None))
///         .children(ModificationTags::new().tag(
///             "a:srgbClr",
///             Rule::new().mutator(Mutator::attribute("val", "FF0000")),
///         )),
/// );
/// assert_eq!(tags.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Occurrence among the same-tag elements under the root.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub index: usize,
    /// Only decides whether a failed resolution is logged.
    #[serde(default = "default_required", skip_serializing_if = "is_true")]
    pub is_required: bool,
    #[serde(
        default,
        rename = "modify",
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub mutators: Vec<Mutator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<ModificationTags>,
    /// When present, even empty, the rule works on the whole collection and ends its level.
    #[serde(
        default,
        deserialize_with = "some_one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub collection: Option<Vec<CollectionMutator>>,
    /// Clone the last existing sibling instead of the cached template.
    #[serde(default, skip_serializing_if = "is_false")]
    pub from_previous: bool,
}

fn default_required() -> bool {
    true
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

fn is_true(b: &bool) -> bool {
    *b
}

fn is_false(b: &bool) -> bool {
    !*b
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(item) => vec![item],
        OneOrMany::Many(items) => items,
    })
}

fn some_one_or_many<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    one_or_many(deserializer).map(Some)
}

impl Default for Rule {
    fn default() -> Self {
        Rule {
            index: 0,
            is_required: true,
            mutators: Vec::new(),
            children: None,
            collection: None,
            from_previous: false,
        }
    }
}

impl Rule {
    /// Rule for the first occurrence.
    pub fn new() -> Rule {
        Rule::default()
    }

    /// Rule for the occurrence at `index`.
    pub fn at(index: usize) -> Rule {
        Rule {
            index,
            ..Rule::default()
        }
    }

    /// Rule for the whole collection.
    pub fn collection(mutator: CollectionMutator) -> Rule {
        Rule {
            collection: Some(vec![mutator]),
            ..Rule::default()
        }
    }

    pub fn index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    pub fn optional(mut self) -> Self {
        self.is_required = false;
        self
    }

    pub fn from_previous(mut self) -> Self {
        self.from_previous = true;
        self
    }

    pub fn mutator(mut self, mutator: Mutator) -> Self {
        self.mutators.push(mutator);
        self
    }

    pub fn mutators<I: IntoIterator<Item = Mutator>>(mut self, mutators: I) -> Self {
        self.mutators.extend(mutators);
        self
    }

    pub fn collection_mutator(mut self, mutator: CollectionMutator) -> Self {
        self.collection.get_or_insert_with(Vec::new).push(mutator);
        self
    }

    pub fn children(mut self, children: ModificationTags) -> Self {
        self.children = Some(children);
        self
    }

    pub fn is_collection(&self) -> bool {
        self.collection.is_some()
    }
}

/// Ordered mapping of tag to [`Rule`] for one level of the tree.
///
/// Order matters: a collection rule ends its level, later tags are not processed.
/// Serialized as a map; the order of keys is kept when deserializing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModificationTags {
    entries: Vec<(String, Rule)>,
}

impl ModificationTags {
    pub fn new() -> ModificationTags {
        ModificationTags::default()
    }

    /// Builder version of [`ModificationTags::insert`].
    pub fn tag<S: Into<String>>(mut self, tag: S, rule: Rule) -> Self {
        self.insert(tag, rule);
        self
    }

    /// Add a rule for `tag`. An existing rule for the same tag is replaced in place
    /// and returned.
    pub fn insert<S: Into<String>>(&mut self, tag: S, rule: Rule) -> Option<Rule> {
        let tag = tag.into();
        match self.entries.iter_mut().find(|(t, _)| *t == tag) {
            Some((_, existing)) => Some(std::mem::replace(existing, rule)),
            None => {
                self.entries.push((tag, rule));
                None
            }
        }
    }

    pub fn get(&self, tag: &str) -> Option<&Rule> {
        self.entries.iter().find(|(t, _)| t == tag).map(|(_, r)| r)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.entries.iter().map(|(t, r)| (t.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ModificationTags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (tag, rule) in &self.entries {
            map.serialize_entry(tag, rule)?;
        }
        map.end()
    }
}

struct TagsVisitor;

impl<'de> Visitor<'de> for TagsVisitor {
    type Value = ModificationTags;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of tag names to rules")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut tags = ModificationTags::new();
        while let Some((tag, rule)) = access.next_entry::<String, Rule>()? {
            tags.insert(tag, rule);
        }
        Ok(tags)
    }
}

impl<'de> Deserialize<'de> for ModificationTags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(TagsVisitor)
    }
}
