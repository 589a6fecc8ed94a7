//! Projection of resources onto display columns.

use std::collections::{BTreeSet, HashMap};

use crate::Resource;

/// A mapping from source attribute names to the names under which they should
/// be displayed.
///
/// Insertion order is preserved: when two source attributes are mapped onto
/// the same display name, the one inserted last wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap(Vec<(String, String)>);

impl ColumnMap {
    /// Builder-style variant of [`ColumnMap::insert`].
    pub fn with<S, D>(mut self, source_attr: S, display_name: D) -> Self
    where
        S: AsRef<str>,
        D: AsRef<str>,
    {
        let _ = self.insert(source_attr, display_name);
        self
    }

    /// Map `source_attr` onto `display_name`. If `source_attr` was already
    /// mapped, its display name is replaced in place and the previous display
    /// name is returned.
    pub fn insert<S, D>(&mut self, source_attr: S, display_name: D) -> Option<String>
    where
        S: AsRef<str>,
        D: AsRef<str>,
    {
        let source_attr = source_attr.as_ref();
        let display_name = display_name.as_ref().to_string();
        match self.0.iter_mut().find(|(s, _)| s == source_attr) {
            Some((_, existing)) => Some(std::mem::replace(existing, display_name)),
            None => {
                self.0.push((source_attr.to_string(), display_name));
                None
            }
        }
    }

    /// Get the display name for the given source attribute.
    pub fn get<S: AsRef<str>>(&self, source_attr: S) -> Option<&str> {
        let source_attr = source_attr.as_ref();
        self.0
            .iter()
            .find(|(s, _)| s == source_attr)
            .map(|(_, d)| d.as_str())
    }

    /// Iterates through `(source_attr, display_name)` pairs in insertion
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(s, d)| (s.as_str(), d.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S, D> FromIterator<(S, D)> for ColumnMap
where
    S: AsRef<str>,
    D: AsRef<str>,
{
    fn from_iter<I: IntoIterator<Item = (S, D)>>(iter: I) -> Self {
        let mut m = Self::default();
        for (s, d) in iter {
            let _ = m.insert(s, d);
        }
        m
    }
}

/// Attribute names that are to be excluded from output entirely.
pub type HiddenColumns = BTreeSet<String>;

/// The result of projecting a resource onto display columns.
///
/// `display_columns[i]` is shown to the user and its value comes from the
/// resource attribute `attr_columns[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    pub display_columns: Vec<String>,
    pub attr_columns: Vec<String>,
}

impl Projection {
    pub fn len(&self) -> usize {
        self.display_columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.display_columns.is_empty()
    }

    /// Iterates through `(display_column, attr_column)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.display_columns
            .iter()
            .zip(self.attr_columns.iter())
            .map(|(d, a)| (d.as_str(), a.as_str()))
    }

    /// The attribute backing the given display column.
    pub fn attr_for<D: AsRef<str>>(&self, display_column: D) -> Option<&str> {
        let display_column = display_column.as_ref();
        self.iter()
            .find(|(d, _)| *d == display_column)
            .map(|(_, a)| a)
    }
}

/// Projects the given resource's attributes onto display columns.
///
/// Hidden attributes are dropped first, then renames from `column_map` are
/// applied. A rename's display name is added even when its source attribute
/// isn't present in the resource, which allows callers to introduce derived
/// columns whose values they compute separately. Display columns are always
/// returned sorted.
///
/// Attribute columns are not guaranteed to exist in the resource. Looking up a
/// missing attribute must produce an empty value rather than an error (see
/// [`crate::get_item_properties`]).
pub fn project(
    resource: &Resource,
    column_map: &ColumnMap,
    hidden_columns: &HiddenColumns,
) -> Projection {
    project_keys(resource.keys(), column_map, hidden_columns)
}

/// Same as [`project`], but starting from an arbitrary set of attribute names.
///
/// Useful for lists of resources, where the union of all rows' attributes
/// determines the columns.
pub fn project_keys<I, K>(keys: I, column_map: &ColumnMap, hidden_columns: &HiddenColumns) -> Projection
where
    I: IntoIterator<Item = K>,
    K: AsRef<str>,
{
    let mut display_columns = keys
        .into_iter()
        .map(|k| k.as_ref().to_string())
        .filter(|k| !hidden_columns.contains(k))
        .collect::<BTreeSet<String>>();

    // Maps display names -> source attributes.
    let mut renames = HashMap::new();
    for (source_attr, display_name) in column_map.iter() {
        if display_columns.remove(source_attr) {
            renames.insert(display_name.to_string(), source_attr.to_string());
        }
        if !display_columns.contains(display_name) {
            display_columns.insert(display_name.to_string());
        }
    }

    // BTreeSet iteration order is byte-wise lexicographic.
    let display_columns = display_columns.into_iter().collect::<Vec<String>>();
    let attr_columns = display_columns
        .iter()
        .map(|d| renames.get(d).cloned().unwrap_or_else(|| d.clone()))
        .collect();
    Projection {
        display_columns,
        attr_columns,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Value;
    use serde_json::json;

    fn resource(v: serde_json::Value) -> Resource {
        Resource::try_from(Value::from(v)).unwrap()
    }

    fn hidden(names: &[&str]) -> HiddenColumns {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_renames_or_hidden_columns() {
        let r = resource(json!({"b": 2, "a": 1}));
        let p = project(&r, &ColumnMap::default(), &HiddenColumns::new());
        assert_eq!(p.display_columns, vec!["a", "b"]);
        assert_eq!(p.attr_columns, vec!["a", "b"]);
    }

    #[test]
    fn rename_and_hide() {
        let r = resource(json!({"id": "x1", "name": "vol1", "tenant_id": "t1"}));
        let map = ColumnMap::default().with("tenant_id", "project_id");
        let p = project(&r, &map, &hidden(&["id"]));
        assert_eq!(p.display_columns, vec!["name", "project_id"]);
        assert_eq!(p.attr_columns, vec!["name", "tenant_id"]);
        assert_eq!(p.attr_for("project_id"), Some("tenant_id"));
    }

    #[test]
    fn hidden_only() {
        let r = resource(json!({"loc": "x", "name": "n"}));
        let p = project(&r, &ColumnMap::default(), &hidden(&["loc"]));
        assert_eq!(p.display_columns, vec!["name"]);
        assert_eq!(p.attr_columns, vec!["name"]);
    }

    #[test]
    fn hidden_names_that_are_not_attributes_are_ignored() {
        let r = resource(json!({"name": "n"}));
        let p = project(&r, &ColumnMap::default(), &hidden(&["links", "location"]));
        assert_eq!(p.display_columns, vec!["name"]);
    }

    #[test]
    fn renames_of_missing_attributes_add_derived_columns() {
        let r = resource(json!({"name": "n"}));
        let map = ColumnMap::default().with("attached_volumes", "volumes_attached");
        let p = project(&r, &map, &HiddenColumns::new());
        assert_eq!(p.display_columns, vec!["name", "volumes_attached"]);
        // Nothing registered a rename, so the display name doubles as the
        // attribute name.
        assert_eq!(p.attr_columns, vec!["name", "volumes_attached"]);
    }

    #[test]
    fn display_names_are_not_duplicated() {
        let r = resource(json!({"is_shared": true, "shared": false, "name": "net1"}));
        let map = ColumnMap::default().with("is_shared", "shared");
        let p = project(&r, &map, &HiddenColumns::new());
        assert_eq!(p.display_columns, vec!["name", "shared"]);
        assert_eq!(p.attr_columns, vec!["name", "is_shared"]);
    }

    #[test]
    fn last_rename_onto_a_display_name_wins() {
        let r = resource(json!({"tenant_id": "t1", "project_id": "p1"}));
        let map = ColumnMap::default()
            .with("tenant_id", "owner")
            .with("project_id", "owner");
        let p = project(&r, &map, &HiddenColumns::new());
        assert_eq!(p.display_columns, vec!["owner"]);
        assert_eq!(p.attr_columns, vec!["project_id"]);
    }

    #[test]
    fn reinserting_a_source_replaces_it_in_place() {
        let mut map = ColumnMap::default().with("a", "x").with("b", "y");
        assert_eq!(map.insert("a", "z"), Some("x".to_string()));
        assert_eq!(map.iter().collect::<Vec<_>>(), vec![("a", "z"), ("b", "y")]);
        assert_eq!(map.get("a"), Some("z"));
    }

    #[test]
    fn hidden_attributes_cannot_be_renamed() {
        let r = resource(json!({"tenant_id": "t1", "name": "n"}));
        let map = ColumnMap::default().with("tenant_id", "project_id");
        let p = project(&r, &map, &hidden(&["tenant_id"]));
        // The display column is still introduced, but backed by an attribute
        // of the same name (which the resource doesn't have).
        assert_eq!(p.display_columns, vec!["name", "project_id"]);
        assert_eq!(p.attr_columns, vec!["name", "project_id"]);
    }

    #[test]
    fn sorting_is_byte_wise() {
        let r = resource(json!({"b": 1, "B": 2, "OS-EXT-AZ:availability_zone": 3, "a": 4}));
        let p = project(&r, &ColumnMap::default(), &HiddenColumns::new());
        assert_eq!(
            p.display_columns,
            vec!["B", "OS-EXT-AZ:availability_zone", "a", "b"]
        );
    }

    #[test]
    fn projection_invariants() {
        let r = resource(json!({
            "id": "x1",
            "name": "vol1",
            "tenant_id": "t1",
            "links": [],
            "is_bootable": true,
            "volume_type": "ssd",
        }));
        let map = ColumnMap::default()
            .with("tenant_id", "project_id")
            .with("is_bootable", "bootable")
            .with("volume_type", "type")
            .with("metadata", "properties");
        let hidden_columns = hidden(&["links"]);
        let p = project(&r, &map, &hidden_columns);

        assert_eq!(p.display_columns.len(), p.attr_columns.len());
        let mut sorted = p.display_columns.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted, p.display_columns);
        assert!(!p.display_columns.contains(&"links".to_string()));
        for (source, display) in map.iter() {
            if r.contains_key(source) {
                assert_eq!(p.attr_for(display), Some(source));
            }
        }
        // Idempotent.
        assert_eq!(p, project(&r, &map, &hidden_columns));
    }

    #[test]
    fn empty_resource() {
        let p = project(&Resource::default(), &ColumnMap::default(), &HiddenColumns::new());
        assert!(p.is_empty());
    }

    #[test]
    fn projects_unions_of_keys() {
        let map = ColumnMap::default().with("is_public", "public");
        let p = project_keys(["id", "is_public", "id"], &map, &HiddenColumns::new());
        assert_eq!(p.display_columns, vec!["id", "public"]);
        assert_eq!(p.attr_columns, vec!["id", "is_public"]);
    }
}
