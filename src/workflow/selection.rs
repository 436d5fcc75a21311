use tracing::debug;

use crate::models::PropertySelection;

/// What `SelectionSet::add` did with the property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Appended,
    /// Already selected; moved to the front
    Promoted,
}

/// Ordered list of properties queued for inspection, unique by id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    properties: Vec<PropertySelection>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the property, or move it to the front if it is already selected
    pub fn add(&mut self, property: PropertySelection) -> AddOutcome {
        match self.position(&property.id) {
            Some(index) => {
                self.properties.remove(index);
                debug!(property_id = %property.id, from = index, "Promoting selected property");
                self.properties.insert(0, property);
                AddOutcome::Promoted
            }
            None => {
                debug!(property_id = %property.id, "Adding property to selection");
                self.properties.push(property);
                AddOutcome::Appended
            }
        }
    }

    /// Drop the property with this id. Unknown ids are ignored.
    pub fn remove(&mut self, property_id: &str) -> Option<PropertySelection> {
        let index = self.position(property_id)?;
        debug!(property_id, "Removing property from selection");
        Some(self.properties.remove(index))
    }

    /// Swap in a whole new selection; later duplicates of an id are dropped
    pub fn replace(&mut self, properties: impl IntoIterator<Item = PropertySelection>) {
        self.properties.clear();
        for property in properties {
            if self.position(&property.id).is_none() {
                self.properties.push(property);
            }
        }
        debug!(count = self.properties.len(), "Replaced selection");
    }

    pub fn get(&self, property_id: &str) -> Option<&PropertySelection> {
        self.properties.iter().find(|p| p.id == property_id)
    }

    pub fn position(&self, property_id: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.id == property_id)
    }

    pub fn as_slice(&self) -> &[PropertySelection] {
        &self.properties
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PropertySelection> {
        self.properties.iter()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl FromIterator<PropertySelection> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = PropertySelection>>(iter: I) -> Self {
        let mut set = Self::new();
        set.replace(iter);
        set
    }
}

impl<'a> IntoIterator for &'a SelectionSet {
    type Item = &'a PropertySelection;
    type IntoIter = std::slice::Iter<'a, PropertySelection>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Location;

    fn property(id: &str) -> PropertySelection {
        PropertySelection {
            id: id.to_string(),
            price: 1_000_000,
            property_type: "Flat".to_string(),
            location: Location::default(),
            documents: vec![],
        }
    }

    fn ids(set: &SelectionSet) -> Vec<&str> {
        set.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_add_appends_new_ids() {
        let mut set = SelectionSet::new();
        assert_eq!(set.add(property("a")), AddOutcome::Appended);
        assert_eq!(set.add(property("b")), AddOutcome::Appended);
        assert_eq!(ids(&set), ["a", "b"]);
    }

    #[test]
    fn test_add_existing_moves_to_front() {
        let mut set: SelectionSet = ["a", "b", "c"].into_iter().map(property).collect();
        assert_eq!(set.add(property("c")), AddOutcome::Promoted);
        assert_eq!(ids(&set), ["c", "a", "b"]);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut set: SelectionSet = ["a", "b"].into_iter().map(property).collect();
        assert!(set.remove("zzz").is_none());
        assert_eq!(set.remove("a").map(|p| p.id), Some("a".to_string()));
        assert!(set.remove("a").is_none());
        assert_eq!(ids(&set), ["b"]);
    }

    #[test]
    fn test_replace_dedups() {
        let mut set: SelectionSet = ["a"].into_iter().map(property).collect();
        set.replace(["x", "y", "x"].into_iter().map(property));
        assert_eq!(ids(&set), ["x", "y"]);
    }
}
