use serde::{Deserialize, Serialize};

use skuforge_core::{AttributeId, Entity, Snapshot};

/// A configurable product dimension (e.g. "Size") and its allowed values.
///
/// `values` keeps insertion order and may contain duplicates or empty-string
/// slots; the editor does not validate user input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDefinition {
    pub id: AttributeId,
    pub name: String,
    pub values: Vec<String>,
}

impl AttributeDefinition {
    pub fn new<N, I, V>(id: AttributeId, name: N, values: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            id,
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// A freshly added attribute: no name, one empty value slot.
    pub fn blank(id: AttributeId) -> Self {
        Self {
            id,
            name: String::new(),
            values: vec![String::new()],
        }
    }

    /// Values that have been filled in, in order.
    pub fn filled_values(&self) -> impl Iterator<Item = &str> {
        self.values
            .iter()
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

impl Entity for AttributeDefinition {
    type Id = AttributeId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Editor commands over an [`AttributeSet`].
///
/// `AddAttribute` carries the id it will assign so that applying the same
/// command twice is deterministic; use [`AttributeCommand::add_attribute`] to
/// mint one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AttributeCommand {
    AddAttribute { id: AttributeId },
    RemoveAttribute { id: AttributeId },
    RenameAttribute { id: AttributeId, name: String },
    AddValue { id: AttributeId },
    SetValue { id: AttributeId, index: usize, value: String },
    RemoveValue { id: AttributeId, index: usize },
    /// Move an attribute to `to_index` (clamped to the end of the list).
    MoveAttribute { id: AttributeId, to_index: usize },
}

impl AttributeCommand {
    pub fn add_attribute() -> Self {
        AttributeCommand::AddAttribute {
            id: AttributeId::new(),
        }
    }

    /// The attribute this command targets (or creates).
    pub fn attribute_id(&self) -> AttributeId {
        match self {
            AttributeCommand::AddAttribute { id }
            | AttributeCommand::RemoveAttribute { id }
            | AttributeCommand::RenameAttribute { id, .. }
            | AttributeCommand::AddValue { id }
            | AttributeCommand::SetValue { id, .. }
            | AttributeCommand::RemoveValue { id, .. }
            | AttributeCommand::MoveAttribute { id, .. } => *id,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            AttributeCommand::AddAttribute { .. } => "add_attribute",
            AttributeCommand::RemoveAttribute { .. } => "remove_attribute",
            AttributeCommand::RenameAttribute { .. } => "rename_attribute",
            AttributeCommand::AddValue { .. } => "add_value",
            AttributeCommand::SetValue { .. } => "set_value",
            AttributeCommand::RemoveValue { .. } => "remove_value",
            AttributeCommand::MoveAttribute { .. } => "move_attribute",
        }
    }
}

/// Snapshot of a product's attribute definitions, in definition order.
///
/// Every operation returns a new snapshot; `self` is never modified. The
/// editor never regenerates combinations on its own.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeSet {
    attributes: Vec<AttributeDefinition>,
    version: u64,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_definitions(attributes: impl IntoIterator<Item = AttributeDefinition>) -> Self {
        Self {
            attributes: attributes.into_iter().collect(),
            version: 0,
        }
    }

    pub fn definitions(&self) -> &[AttributeDefinition] {
        &self.attributes
    }

    pub fn get(&self, id: AttributeId) -> Option<&AttributeDefinition> {
        skuforge_core::entity::find_by_id(&self.attributes, &id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttributeDefinition> {
        self.attributes.iter()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Append a blank attribute with a fresh id. The new attribute is last.
    pub fn add_attribute(&self) -> Self {
        self.apply(&AttributeCommand::add_attribute())
    }

    pub fn remove_attribute(&self, id: AttributeId) -> Self {
        self.apply(&AttributeCommand::RemoveAttribute { id })
    }

    pub fn rename_attribute(&self, id: AttributeId, name: impl Into<String>) -> Self {
        self.apply(&AttributeCommand::RenameAttribute {
            id,
            name: name.into(),
        })
    }

    pub fn add_value(&self, id: AttributeId) -> Self {
        self.apply(&AttributeCommand::AddValue { id })
    }

    pub fn set_value(&self, id: AttributeId, index: usize, value: impl Into<String>) -> Self {
        self.apply(&AttributeCommand::SetValue {
            id,
            index,
            value: value.into(),
        })
    }

    pub fn remove_value(&self, id: AttributeId, index: usize) -> Self {
        self.apply(&AttributeCommand::RemoveValue { id, index })
    }

    pub fn move_attribute(&self, id: AttributeId, to_index: usize) -> Self {
        self.apply(&AttributeCommand::MoveAttribute { id, to_index })
    }

    fn position(&self, id: AttributeId) -> Option<usize> {
        self.attributes.iter().position(|a| a.id == id)
    }

    /// Mutate in place; returns whether anything changed.
    fn mutate(&mut self, command: &AttributeCommand) -> bool {
        match command {
            AttributeCommand::AddAttribute { id } => {
                if self.position(*id).is_some() {
                    return false;
                }
                self.attributes.push(AttributeDefinition::blank(*id));
                true
            }
            AttributeCommand::RemoveAttribute { id } => match self.position(*id) {
                Some(pos) => {
                    self.attributes.remove(pos);
                    true
                }
                None => false,
            },
            AttributeCommand::RenameAttribute { id, name } => {
                match skuforge_core::entity::find_by_id_mut(&mut self.attributes, id) {
                    Some(attr) if attr.name != *name => {
                        attr.name = name.clone();
                        true
                    }
                    _ => false,
                }
            }
            AttributeCommand::AddValue { id } => {
                match skuforge_core::entity::find_by_id_mut(&mut self.attributes, id) {
                    Some(attr) => {
                        attr.values.push(String::new());
                        true
                    }
                    None => false,
                }
            }
            AttributeCommand::SetValue { id, index, value } => {
                let slot = skuforge_core::entity::find_by_id_mut(&mut self.attributes, id)
                    .and_then(|attr| attr.values.get_mut(*index));
                match slot {
                    Some(slot) if slot != value => {
                        *slot = value.clone();
                        true
                    }
                    _ => false,
                }
            }
            AttributeCommand::RemoveValue { id, index } => {
                match skuforge_core::entity::find_by_id_mut(&mut self.attributes, id) {
                    Some(attr) if *index < attr.values.len() => {
                        attr.values.remove(*index);
                        true
                    }
                    _ => false,
                }
            }
            AttributeCommand::MoveAttribute { id, to_index } => {
                let Some(from) = self.position(*id) else {
                    return false;
                };
                let to = (*to_index).min(self.attributes.len() - 1);
                if from == to {
                    return false;
                }
                let attr = self.attributes.remove(from);
                self.attributes.insert(to, attr);
                true
            }
        }
    }
}

impl Snapshot for AttributeSet {
    type Command = AttributeCommand;

    fn version(&self) -> u64 {
        self.version
    }

    fn apply(&self, command: &Self::Command) -> Self {
        let mut next = self.clone();
        if next.mutate(command) {
            next.version += 1;
            tracing::debug!(
                command = command.kind(),
                attribute_id = %command.attribute_id(),
                version = next.version,
                "attribute set updated"
            );
        } else {
            tracing::debug!(
                command = command.kind(),
                attribute_id = %command.attribute_id(),
                "attribute command ignored"
            );
        }
        next
    }
}

impl<'a> IntoIterator for &'a AttributeSet {
    type Item = &'a AttributeDefinition;
    type IntoIter = core::slice::Iter<'a, AttributeDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.iter()
    }
}
