//! 表投影：采集结果 → 类型化记录。
//!
//! 每种投影由一组描述符与一个纯函数组成：描述符声明要取哪些列，
//! 函数把 `fetch` 返回的键值包投影为带名称映射的记录列表。
//! 表投影以锚定列的行索引为准：锚定列缺失报 `Shape` 错误，
//! 其余列缺行时以空串/零补齐而不丢行。

use crate::codec::{DecodedValue, RequestDescriptor, SnmpScalar};
use crate::error::SnmpError;
use serde::Serialize;
use std::collections::HashMap;

/// 系统基本信息（sysDescr 等五个标量）。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub description: String,
    pub uptime: String,
    pub contact: String,
    pub name: String,
    pub location: String,
}

/// 接口表行（ifTable）。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceEntry {
    pub index: String,
    pub description: String,
    #[serde(rename = "type")]
    pub interface_type: String,
    pub mtu: i64,
    pub speed: String,
    pub physical_address: String,
    pub oper_status: String,
}

/// 硬件表行（entPhysicalTable）。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareEntry {
    pub index: String,
    pub name: String,
    pub description: String,
    pub class: String,
    pub hardware_rev: String,
    pub firmware_rev: String,
    pub software_rev: String,
    pub serial_number: String,
    pub manufacturer: String,
    pub model: String,
}

/// 路由表行（ipRouteTable）。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteEntry {
    pub destination: String,
    pub interface_index: i64,
    pub next_hop: String,
    #[serde(rename = "type")]
    pub route_type: String,
    pub protocol: String,
    pub age: i64,
    pub mask: String,
}

/// ARP 表行（atTable）。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArpEntry {
    pub interface_index: i64,
    pub physical_address: String,
    pub net_address: String,
}

/// 系统信息的描述符集。
pub fn system_info_descriptors() -> Vec<RequestDescriptor> {
    vec![
        RequestDescriptor::get("1.3.6.1.2.1.1.1.0", "description"),
        RequestDescriptor::get("1.3.6.1.2.1.1.3.0", "uptime"),
        RequestDescriptor::get("1.3.6.1.2.1.1.4.0", "contact"),
        RequestDescriptor::get("1.3.6.1.2.1.1.5.0", "name"),
        RequestDescriptor::get("1.3.6.1.2.1.1.6.0", "location"),
    ]
}

/// 接口表的描述符集。
pub fn interface_descriptors() -> Vec<RequestDescriptor> {
    vec![
        RequestDescriptor::walk("1.3.6.1.2.1.2.2.1.1", "index"),
        RequestDescriptor::walk("1.3.6.1.2.1.2.2.1.2", "description"),
        RequestDescriptor::walk("1.3.6.1.2.1.2.2.1.3", "type"),
        RequestDescriptor::walk("1.3.6.1.2.1.2.2.1.4", "mtu"),
        RequestDescriptor::walk("1.3.6.1.2.1.2.2.1.5", "speed"),
        RequestDescriptor::walk_hex("1.3.6.1.2.1.2.2.1.6", "physicalAddress"),
        RequestDescriptor::walk("1.3.6.1.2.1.2.2.1.7", "operStatus"),
    ]
}

/// 硬件表的描述符集。
pub fn hardware_descriptors() -> Vec<RequestDescriptor> {
    vec![
        RequestDescriptor::walk("1.3.6.1.2.1.47.1.1.1.1.7", "name"),
        RequestDescriptor::walk("1.3.6.1.2.1.47.1.1.1.1.2", "description"),
        RequestDescriptor::walk("1.3.6.1.2.1.47.1.1.1.1.5", "class"),
        RequestDescriptor::walk("1.3.6.1.2.1.47.1.1.1.1.8", "hardwareRev"),
        RequestDescriptor::walk("1.3.6.1.2.1.47.1.1.1.1.9", "firmwareRev"),
        RequestDescriptor::walk("1.3.6.1.2.1.47.1.1.1.1.10", "softwareRev"),
        RequestDescriptor::walk("1.3.6.1.2.1.47.1.1.1.1.11", "serialNumber"),
        RequestDescriptor::walk("1.3.6.1.2.1.47.1.1.1.1.12", "manufacturer"),
        RequestDescriptor::walk("1.3.6.1.2.1.47.1.1.1.1.13", "model"),
    ]
}

/// 路由表的描述符集。
pub fn route_descriptors() -> Vec<RequestDescriptor> {
    vec![
        RequestDescriptor::walk_dotted("1.3.6.1.2.1.4.21.1.1", "destination"),
        RequestDescriptor::walk("1.3.6.1.2.1.4.21.1.2", "interfaceIndex"),
        RequestDescriptor::walk_dotted("1.3.6.1.2.1.4.21.1.7", "nextHop"),
        RequestDescriptor::walk("1.3.6.1.2.1.4.21.1.8", "type"),
        RequestDescriptor::walk("1.3.6.1.2.1.4.21.1.9", "protocol"),
        RequestDescriptor::walk("1.3.6.1.2.1.4.21.1.10", "age"),
        RequestDescriptor::walk_dotted("1.3.6.1.2.1.4.21.1.11", "mask"),
    ]
}

/// ARP 表的描述符集。
pub fn arp_descriptors() -> Vec<RequestDescriptor> {
    vec![
        RequestDescriptor::walk("1.3.6.1.2.1.3.1.1.1", "interfaceIndex"),
        RequestDescriptor::walk_hex("1.3.6.1.2.1.3.1.1.2", "physicalAddress"),
        RequestDescriptor::walk_dotted("1.3.6.1.2.1.3.1.1.3", "netAddress"),
    ]
}

/// 投影系统信息。
pub fn system_info(bundle: &HashMap<String, DecodedValue>) -> Result<SystemInfo, SnmpError> {
    Ok(SystemInfo {
        description: scalar_text(bundle, "description")?,
        uptime: scalar_text(bundle, "uptime")?,
        contact: scalar_text(bundle, "contact")?,
        name: scalar_text(bundle, "name")?,
        location: scalar_text(bundle, "location")?,
    })
}

/// 投影接口表（锚定列：index）。
pub fn interface_table(
    bundle: &HashMap<String, DecodedValue>,
) -> Result<Vec<InterfaceEntry>, SnmpError> {
    let anchor = table(bundle, "index")?;
    let mut entries: Vec<InterfaceEntry> = anchor
        .keys()
        .map(|row| InterfaceEntry {
            index: row.clone(),
            description: cell(bundle, "description", row),
            interface_type: interface_type_name(cell_i64(bundle, "type", row)),
            mtu: cell_i64(bundle, "mtu", row),
            speed: format_speed(cell_i64(bundle, "speed", row).max(0) as u64),
            physical_address: cell(bundle, "physicalAddress", row),
            oper_status: oper_status_name(cell_i64(bundle, "operStatus", row)),
        })
        .collect();
    entries.sort_by_key(|entry| numeric_key(&entry.index));
    Ok(entries)
}

/// 投影硬件表（锚定列：name）。
pub fn hardware_table(
    bundle: &HashMap<String, DecodedValue>,
) -> Result<Vec<HardwareEntry>, SnmpError> {
    let anchor = table(bundle, "name")?;
    let mut entries: Vec<HardwareEntry> = anchor
        .iter()
        .map(|(row, name)| HardwareEntry {
            index: row.clone(),
            name: name.as_text(),
            description: cell(bundle, "description", row),
            class: hardware_class_name(cell_i64(bundle, "class", row)),
            hardware_rev: cell(bundle, "hardwareRev", row),
            firmware_rev: cell(bundle, "firmwareRev", row),
            software_rev: cell(bundle, "softwareRev", row),
            serial_number: cell(bundle, "serialNumber", row),
            manufacturer: cell(bundle, "manufacturer", row),
            model: cell(bundle, "model", row),
        })
        .collect();
    entries.sort_by_key(|entry| numeric_key(&entry.index));
    Ok(entries)
}

/// 投影路由表（锚定列：destination）。
pub fn route_table(bundle: &HashMap<String, DecodedValue>) -> Result<Vec<RouteEntry>, SnmpError> {
    let anchor = table(bundle, "destination")?;
    let mut entries: Vec<RouteEntry> = anchor
        .iter()
        .map(|(row, destination)| RouteEntry {
            destination: destination.as_text(),
            interface_index: cell_i64(bundle, "interfaceIndex", row),
            next_hop: cell(bundle, "nextHop", row),
            route_type: route_type_name(cell_i64(bundle, "type", row)),
            protocol: route_protocol_name(cell_i64(bundle, "protocol", row)),
            age: cell_i64(bundle, "age", row),
            mask: cell(bundle, "mask", row),
        })
        .collect();
    entries.sort_by(|a, b| a.destination.cmp(&b.destination));
    Ok(entries)
}

/// 投影 ARP 表（锚定列：interfaceIndex）。
pub fn arp_table(bundle: &HashMap<String, DecodedValue>) -> Result<Vec<ArpEntry>, SnmpError> {
    let anchor = table(bundle, "interfaceIndex")?;
    let mut entries: Vec<ArpEntry> = anchor
        .iter()
        .map(|(row, index)| ArpEntry {
            interface_index: index.as_i64().unwrap_or(0),
            physical_address: cell(bundle, "physicalAddress", row),
            net_address: cell(bundle, "netAddress", row),
        })
        .collect();
    entries.sort_by(|a, b| {
        a.interface_index
            .cmp(&b.interface_index)
            .then_with(|| a.net_address.cmp(&b.net_address))
    });
    Ok(entries)
}

/// 速率格式化：b/s → Kb/s / Mb/s / Gb/s。
pub fn format_speed(bits_per_second: u64) -> String {
    const UNITS: [(u64, &str); 3] = [
        (1_000_000_000, "Gb/s"),
        (1_000_000, "Mb/s"),
        (1_000, "Kb/s"),
    ];
    for (scale, unit) in UNITS {
        if bits_per_second >= scale {
            let value = bits_per_second as f64 / scale as f64;
            if (value - value.trunc()).abs() < f64::EPSILON {
                return format!("{} {}", value as u64, unit);
            }
            return format!("{:.1} {}", value, unit);
        }
    }
    format!("{} b/s", bits_per_second)
}

fn scalar_text(bundle: &HashMap<String, DecodedValue>, key: &str) -> Result<String, SnmpError> {
    bundle
        .get(key)
        .and_then(|value| value.scalar())
        .map(SnmpScalar::as_text)
        .ok_or_else(|| SnmpError::Shape(format!("missing scalar key {}", key)))
}

fn table<'a>(
    bundle: &'a HashMap<String, DecodedValue>,
    key: &str,
) -> Result<&'a HashMap<String, SnmpScalar>, SnmpError> {
    bundle
        .get(key)
        .and_then(|value| value.table())
        .ok_or_else(|| SnmpError::Shape(format!("missing table key {}", key)))
}

/// 非锚定列缺行补空串。
fn cell(bundle: &HashMap<String, DecodedValue>, key: &str, row: &str) -> String {
    bundle
        .get(key)
        .and_then(|value| value.table())
        .and_then(|rows| rows.get(row))
        .map(SnmpScalar::as_text)
        .unwrap_or_default()
}

/// 非锚定列缺行补零。
fn cell_i64(bundle: &HashMap<String, DecodedValue>, key: &str, row: &str) -> i64 {
    bundle
        .get(key)
        .and_then(|value| value.table())
        .and_then(|rows| rows.get(row))
        .and_then(SnmpScalar::as_i64)
        .unwrap_or(0)
}

fn numeric_key(index: &str) -> (u64, String) {
    (index.parse().unwrap_or(u64::MAX), index.to_string())
}

/// IANAifType 常见取值；未知取值回退为数字文本。
fn interface_type_name(code: i64) -> String {
    match code {
        1 => "other".to_string(),
        6 => "ethernetCsmacd".to_string(),
        24 => "softwareLoopback".to_string(),
        53 => "propVirtual".to_string(),
        117 => "gigabitEthernet".to_string(),
        131 => "tunnel".to_string(),
        135 => "l2vlan".to_string(),
        136 => "l3ipvlan".to_string(),
        161 => "ieee8023adLag".to_string(),
        other => other.to_string(),
    }
}

fn oper_status_name(code: i64) -> String {
    match code {
        1 => "up".to_string(),
        2 => "down".to_string(),
        3 => "testing".to_string(),
        other => other.to_string(),
    }
}

/// entPhysicalClass 取值。
fn hardware_class_name(code: i64) -> String {
    match code {
        1 => "other".to_string(),
        2 => "unknown".to_string(),
        3 => "chassis".to_string(),
        4 => "backplane".to_string(),
        5 => "container".to_string(),
        6 => "powerSupply".to_string(),
        7 => "fan".to_string(),
        8 => "sensor".to_string(),
        9 => "module".to_string(),
        10 => "port".to_string(),
        11 => "stack".to_string(),
        12 => "cpu".to_string(),
        other => other.to_string(),
    }
}

fn route_type_name(code: i64) -> String {
    match code {
        1 => "other".to_string(),
        2 => "invalid".to_string(),
        3 => "direct".to_string(),
        4 => "indirect".to_string(),
        other => other.to_string(),
    }
}

fn route_protocol_name(code: i64) -> String {
    match code {
        1 => "other".to_string(),
        2 => "local".to_string(),
        3 => "netmgmt".to_string(),
        4 => "icmp".to_string(),
        8 => "rip".to_string(),
        13 => "ospf".to_string(),
        14 => "bgp".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_value(rows: &[(&str, SnmpScalar)]) -> DecodedValue {
        DecodedValue::Table(
            rows.iter()
                .map(|(index, scalar)| (index.to_string(), scalar.clone()))
                .collect(),
        )
    }

    #[test]
    fn format_speed_scales_units() {
        assert_eq!(format_speed(100), "100 b/s");
        assert_eq!(format_speed(10_000), "10 Kb/s");
        assert_eq!(format_speed(100_000_000), "100 Mb/s");
        assert_eq!(format_speed(1_000_000_000), "1 Gb/s");
        assert_eq!(format_speed(2_500_000_000), "2.5 Gb/s");
    }

    #[test]
    fn interface_table_fills_missing_cells() {
        let bundle = HashMap::from([
            (
                "index".to_string(),
                table_value(&[
                    ("1", SnmpScalar::Integer(1)),
                    ("10101", SnmpScalar::Integer(10101)),
                ]),
            ),
            (
                "description".to_string(),
                table_value(&[("1", SnmpScalar::Text("GigabitEthernet0/0/1".to_string()))]),
            ),
            (
                "type".to_string(),
                table_value(&[("1", SnmpScalar::Integer(6))]),
            ),
            (
                "mtu".to_string(),
                table_value(&[("1", SnmpScalar::Integer(1500))]),
            ),
            (
                "speed".to_string(),
                table_value(&[("1", SnmpScalar::Unsigned(1_000_000_000))]),
            ),
            (
                "physicalAddress".to_string(),
                table_value(&[("1", SnmpScalar::Text("00:1A:2B:3C:4D:5E".to_string()))]),
            ),
            (
                "operStatus".to_string(),
                table_value(&[("1", SnmpScalar::Integer(1))]),
            ),
        ]);

        let entries = interface_table(&bundle).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].index, "1");
        assert_eq!(entries[0].interface_type, "ethernetCsmacd");
        assert_eq!(entries[0].speed, "1 Gb/s");
        assert_eq!(entries[0].oper_status, "up");
        // 缺行的列补默认值而不丢行
        assert_eq!(entries[1].index, "10101");
        assert_eq!(entries[1].description, "");
        assert_eq!(entries[1].mtu, 0);
    }

    #[test]
    fn missing_anchor_is_shape_error() {
        let bundle = HashMap::new();
        assert!(matches!(
            interface_table(&bundle),
            Err(SnmpError::Shape(_))
        ));
    }

    #[test]
    fn route_table_maps_type_names() {
        let bundle = HashMap::from([
            (
                "destination".to_string(),
                table_value(&[(
                    "192.168.1.0",
                    SnmpScalar::Text("192.168.1.0".to_string()),
                )]),
            ),
            (
                "interfaceIndex".to_string(),
                table_value(&[("192.168.1.0", SnmpScalar::Integer(3))]),
            ),
            (
                "nextHop".to_string(),
                table_value(&[(
                    "192.168.1.0",
                    SnmpScalar::Text("192.168.1.1".to_string()),
                )]),
            ),
            (
                "type".to_string(),
                table_value(&[("192.168.1.0", SnmpScalar::Integer(3))]),
            ),
            (
                "protocol".to_string(),
                table_value(&[("192.168.1.0", SnmpScalar::Integer(2))]),
            ),
            (
                "age".to_string(),
                table_value(&[("192.168.1.0", SnmpScalar::Integer(42))]),
            ),
            (
                "mask".to_string(),
                table_value(&[(
                    "192.168.1.0",
                    SnmpScalar::Text("255.255.255.0".to_string()),
                )]),
            ),
        ]);

        let entries = route_table(&bundle).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].route_type, "direct");
        assert_eq!(entries[0].protocol, "local");
        assert_eq!(entries[0].mask, "255.255.255.0");
    }

    #[test]
    fn system_info_requires_all_scalars() {
        let mut bundle = HashMap::from([
            (
                "description".to_string(),
                DecodedValue::Scalar(SnmpScalar::Text("Router".to_string())),
            ),
            (
                "uptime".to_string(),
                DecodedValue::Scalar(SnmpScalar::TimeTicks(8_640_000)),
            ),
            (
                "contact".to_string(),
                DecodedValue::Scalar(SnmpScalar::Text("noc".to_string())),
            ),
            (
                "name".to_string(),
                DecodedValue::Scalar(SnmpScalar::Text("core-sw1".to_string())),
            ),
        ]);
        assert!(matches!(system_info(&bundle), Err(SnmpError::Shape(_))));

        bundle.insert(
            "location".to_string(),
            DecodedValue::Scalar(SnmpScalar::Text("rack-3".to_string())),
        );
        let info = system_info(&bundle).unwrap();
        assert_eq!(info.name, "core-sw1");
        assert_eq!(info.location, "rack-3");
    }
}
