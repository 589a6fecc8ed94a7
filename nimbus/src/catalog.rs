//! Column policies for the kinds of resources that the client knows how to
//! display.
//!
//! These mirror the per-command column maps of the compute, network, image and
//! volume commands. Responses from these services carry attribute names that
//! differ from what users have come to expect in the CLI's output (e.g.
//! `is_shared` vs. `shared`), so each kind renames, hides and formats columns
//! in its own way.

use std::str::FromStr;

use crate::{project, ColumnMap, Error, Formatter, Formatters, HiddenColumns, Projection, Resource};

/// The kinds of resources with built-in column policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Any resource. Shows all attributes as they are.
    Generic,
    Server,
    Network,
    Image,
    Volume,
}

impl Default for ResourceKind {
    fn default() -> Self {
        Self::Generic
    }
}

impl FromStr for ResourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_ref() {
            "generic" => Self::Generic,
            "server" => Self::Server,
            "network" => Self::Network,
            "image" => Self::Image,
            "volume" => Self::Volume,
            _ => return Err(Error::UnknownResourceKind(s.to_string())),
        })
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Generic => "generic",
                Self::Server => "server",
                Self::Network => "network",
                Self::Image => "image",
                Self::Volume => "volume",
            }
        )
    }
}

/// A column of a listing: the attribute it's sourced from and its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListColumn {
    pub attr: &'static str,
    pub header: &'static str,
}

const fn col(attr: &'static str, header: &'static str) -> ListColumn {
    ListColumn { attr, header }
}

/// Describes how resources of a particular kind are displayed.
#[derive(Debug, Clone, Default)]
pub struct ColumnPolicy {
    pub column_map: ColumnMap,
    pub hidden_columns: HiddenColumns,
    pub formatters: Formatters,
    list_columns: &'static [ListColumn],
    long_list_columns: &'static [ListColumn],
}

impl ColumnPolicy {
    /// Additionally map `source_attr` onto `display_name`.
    pub fn rename<S, D>(mut self, source_attr: S, display_name: D) -> Self
    where
        S: AsRef<str>,
        D: AsRef<str>,
    {
        let _ = self.column_map.insert(source_attr, display_name);
        self
    }

    /// Additionally hide the given attribute.
    pub fn hide<S: AsRef<str>>(mut self, attr: S) -> Self {
        self.hidden_columns.insert(attr.as_ref().to_string());
        self
    }

    /// Projects a resource of this kind onto display columns.
    pub fn project(&self, resource: &Resource) -> Projection {
        project(resource, &self.column_map, &self.hidden_columns)
    }

    /// The columns for listings of this kind of resource. Returns an empty
    /// slice when the kind has no fixed listing columns.
    pub fn list_columns(&self, long: bool) -> &'static [ListColumn] {
        if long && !self.long_list_columns.is_empty() {
            self.long_list_columns
        } else {
            self.list_columns
        }
    }
}

impl ResourceKind {
    /// The column policy for this kind of resource.
    pub fn policy(&self) -> ColumnPolicy {
        match self {
            Self::Generic => ColumnPolicy::default(),
            Self::Server => ColumnPolicy {
                column_map: SERVER_COLUMN_MAP.iter().copied().collect(),
                hidden_columns: hidden(SERVER_HIDDEN_COLUMNS),
                formatters: formatters(&[
                    ("addresses", Formatter::Dict),
                    ("metadata", Formatter::Dict),
                    ("attached_volumes", Formatter::ListOfDicts),
                    ("security_groups", Formatter::ListOfDicts),
                    ("flavor", Formatter::Dict),
                    ("image", Formatter::Dict),
                    ("tags", Formatter::List),
                ]),
                list_columns: SERVER_LIST_COLUMNS,
                long_list_columns: SERVER_LONG_LIST_COLUMNS,
            },
            Self::Network => ColumnPolicy {
                column_map: NETWORK_COLUMN_MAP.iter().copied().collect(),
                hidden_columns: hidden(&["location", "tenant_id"]),
                formatters: formatters(&[
                    ("availability_zone_hints", Formatter::List),
                    ("availability_zones", Formatter::List),
                    ("subnet_ids", Formatter::List),
                    ("tags", Formatter::List),
                    ("segments", Formatter::ListOfDicts),
                ]),
                list_columns: NETWORK_LIST_COLUMNS,
                long_list_columns: NETWORK_LONG_LIST_COLUMNS,
            },
            Self::Image => ColumnPolicy {
                column_map: IMAGE_COLUMN_MAP.iter().copied().collect(),
                hidden_columns: hidden(&["location", "links", "tenant_id"]),
                formatters: formatters(&[
                    ("tags", Formatter::List),
                    ("properties", Formatter::Dict),
                    ("locations", Formatter::Json),
                ]),
                list_columns: IMAGE_LIST_COLUMNS,
                long_list_columns: IMAGE_LONG_LIST_COLUMNS,
            },
            Self::Volume => ColumnPolicy {
                column_map: VOLUME_COLUMN_MAP.iter().copied().collect(),
                hidden_columns: hidden(&["location", "links"]),
                formatters: formatters(&[
                    ("attachments", Formatter::ListOfDicts),
                    ("metadata", Formatter::Dict),
                    ("volume_image_metadata", Formatter::Dict),
                ]),
                list_columns: VOLUME_LIST_COLUMNS,
                long_list_columns: VOLUME_LONG_LIST_COLUMNS,
            },
        }
    }
}

fn hidden(names: &[&str]) -> HiddenColumns {
    names.iter().map(|s| s.to_string()).collect()
}

fn formatters(items: &[(&str, Formatter)]) -> Formatters {
    items.iter().map(|(k, f)| (k.to_string(), *f)).collect()
}

const SERVER_COLUMN_MAP: &[(&str, &str)] = &[
    ("access_ipv4", "accessIPv4"),
    ("access_ipv6", "accessIPv6"),
    ("admin_password", "adminPass"),
    ("attached_volumes", "volumes_attached"),
    ("availability_zone", "OS-EXT-AZ:availability_zone"),
    ("compute_host", "OS-EXT-SRV-ATTR:host"),
    ("created_at", "created"),
    ("disk_config", "OS-DCF:diskConfig"),
    ("has_config_drive", "config_drive"),
    ("host_id", "hostId"),
    ("hypervisor_hostname", "OS-EXT-SRV-ATTR:hypervisor_hostname"),
    ("instance_name", "OS-EXT-SRV-ATTR:instance_name"),
    ("is_locked", "locked"),
    ("launched_at", "OS-SRV-USG:launched_at"),
    ("metadata", "properties"),
    ("power_state", "OS-EXT-STS:power_state"),
    ("task_state", "OS-EXT-STS:task_state"),
    ("terminated_at", "OS-SRV-USG:terminated_at"),
    ("updated_at", "updated"),
    ("vm_state", "OS-EXT-STS:vm_state"),
];

const SERVER_HIDDEN_COLUMNS: &[&str] = &[
    "block_device_mapping",
    "image_id",
    "interface_ip",
    "links",
    "location",
    "max_count",
    "min_count",
    "networks",
    "personality",
    "scheduler_hints",
    "tenant_id",
];

const SERVER_LIST_COLUMNS: &[ListColumn] = &[
    col("id", "ID"),
    col("name", "Name"),
    col("status", "Status"),
    col("addresses", "Networks"),
    col("flavor", "Flavor"),
];

const SERVER_LONG_LIST_COLUMNS: &[ListColumn] = &[
    col("id", "ID"),
    col("name", "Name"),
    col("status", "Status"),
    col("task_state", "Task State"),
    col("power_state", "Power State"),
    col("addresses", "Networks"),
    col("image", "Image"),
    col("flavor", "Flavor"),
    col("availability_zone", "Availability Zone"),
    col("compute_host", "Host"),
    col("metadata", "Properties"),
];

const NETWORK_COLUMN_MAP: &[(&str, &str)] = &[
    ("is_router_external", "router:external"),
    ("availability_zone_hints", "availability_zone_hints"),
    ("availability_zones", "availability_zones"),
    ("is_admin_state_up", "admin_state_up"),
    ("is_default", "is_default"),
    ("is_port_security_enabled", "port_security_enabled"),
    ("is_vlan_transparent", "vlan_transparent"),
    ("is_shared", "shared"),
    ("provider_network_type", "provider:network_type"),
    ("provider_physical_network", "provider:physical_network"),
    ("provider_segmentation_id", "provider:segmentation_id"),
    ("subnet_ids", "subnets"),
];

const NETWORK_LIST_COLUMNS: &[ListColumn] = &[
    col("id", "ID"),
    col("name", "Name"),
    col("subnet_ids", "Subnets"),
];

const NETWORK_LONG_LIST_COLUMNS: &[ListColumn] = &[
    col("id", "ID"),
    col("name", "Name"),
    col("status", "Status"),
    col("project_id", "Project"),
    col("is_admin_state_up", "State"),
    col("is_shared", "Shared"),
    col("subnet_ids", "Subnets"),
    col("provider_network_type", "Network Type"),
    col("is_router_external", "Router Type"),
    col("availability_zones", "Availability Zones"),
    col("tags", "Tags"),
];

const IMAGE_COLUMN_MAP: &[(&str, &str)] = &[
    ("is_hidden", "hidden"),
    ("is_protected", "protected"),
    ("owner_id", "owner"),
];

const IMAGE_LIST_COLUMNS: &[ListColumn] = &[
    col("id", "ID"),
    col("name", "Name"),
    col("status", "Status"),
];

const IMAGE_LONG_LIST_COLUMNS: &[ListColumn] = &[
    col("id", "ID"),
    col("name", "Name"),
    col("disk_format", "Disk Format"),
    col("container_format", "Container Format"),
    col("size", "Size"),
    col("checksum", "Checksum"),
    col("status", "Status"),
    col("visibility", "Visibility"),
    col("is_protected", "Protected"),
    col("owner_id", "Project"),
    col("tags", "Tags"),
];

const VOLUME_COLUMN_MAP: &[(&str, &str)] = &[
    ("tenant_id", "project_id"),
    ("os-vol-tenant-attr:tenant_id", "project_id"),
    ("is_bootable", "bootable"),
    ("is_encrypted", "encrypted"),
    ("volume_type", "type"),
    ("metadata", "properties"),
];

const VOLUME_LIST_COLUMNS: &[ListColumn] = &[
    col("id", "ID"),
    col("name", "Name"),
    col("status", "Status"),
    col("size", "Size"),
    col("attachments", "Attached to"),
];

const VOLUME_LONG_LIST_COLUMNS: &[ListColumn] = &[
    col("id", "ID"),
    col("name", "Name"),
    col("status", "Status"),
    col("size", "Size"),
    col("volume_type", "Type"),
    col("is_bootable", "Bootable"),
    col("attachments", "Attached to"),
    col("metadata", "Properties"),
];

#[cfg(test)]
mod test {
    use super::*;
    use crate::{get_item_properties, Value};
    use serde_json::json;

    fn resource(v: serde_json::Value) -> Resource {
        Resource::try_from(Value::from(v)).unwrap()
    }

    #[test]
    fn parses_kinds() {
        assert_eq!(ResourceKind::from_str("Volume").unwrap(), ResourceKind::Volume);
        assert!(matches!(
            ResourceKind::from_str("flavor"),
            Err(Error::UnknownResourceKind(_))
        ));
    }

    #[test]
    fn network_show() {
        let net = resource(json!({
            "id": "n1",
            "name": "private",
            "is_shared": false,
            "is_router_external": true,
            "tenant_id": "t1",
            "project_id": "t1",
            "location": {"cloud": "default"},
            "subnet_ids": ["s1", "s2"],
        }));
        let policy = ResourceKind::Network.policy();
        let p = policy.project(&net);
        assert!(!p.display_columns.contains(&"tenant_id".to_string()));
        assert!(!p.display_columns.contains(&"location".to_string()));
        assert_eq!(p.attr_for("router:external"), Some("is_router_external"));
        assert_eq!(p.attr_for("shared"), Some("is_shared"));

        let cells = get_item_properties(&net, &p.attr_columns, &policy.formatters);
        let subnets = p
            .display_columns
            .iter()
            .position(|c| c == "subnets")
            .unwrap();
        assert_eq!(cells[subnets].human(), "s1, s2");
        // Renamed-in columns without a backing attribute render as empty.
        let vlan = p
            .display_columns
            .iter()
            .position(|c| c == "vlan_transparent")
            .unwrap();
        assert!(cells[vlan].machine().is_null());
    }

    #[test]
    fn volume_show() {
        let vol = resource(json!({
            "id": "x1",
            "name": "vol1",
            "tenant_id": "t1",
            "links": [{"rel": "self"}],
            "volume_type": "ssd",
            "metadata": {"readonly": "False"},
        }));
        let policy = ResourceKind::Volume.policy().hide("id");
        let p = policy.project(&vol);
        assert_eq!(
            p.display_columns,
            vec!["bootable", "encrypted", "name", "project_id", "properties", "type"]
        );
        assert_eq!(
            p.attr_columns,
            vec!["bootable", "encrypted", "name", "tenant_id", "metadata", "volume_type"]
        );
        let cells = get_item_properties(&vol, &p.attr_columns, &policy.formatters);
        assert_eq!(cells[4].human(), "readonly='False'");
    }

    #[test]
    fn extra_renames_extend_the_policy() {
        let policy = ResourceKind::Generic.policy().rename("tenant_id", "project_id");
        let p = policy.project(&resource(json!({"tenant_id": "t1"})));
        assert_eq!(p.display_columns, vec!["project_id"]);
        assert_eq!(p.attr_columns, vec!["tenant_id"]);
    }

    #[test]
    fn list_columns() {
        let policy = ResourceKind::Server.policy();
        assert_eq!(policy.list_columns(false).len(), 5);
        assert!(policy.list_columns(true).len() > 5);
        assert!(ResourceKind::Generic.policy().list_columns(true).is_empty());
    }
}
