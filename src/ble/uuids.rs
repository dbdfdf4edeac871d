//! BLE Service and Characteristic UUIDs.
//!
//! Contains the UUIDs exposed by Decawave DWM1001 nodes, both the ones
//! documented in the DWM1001 BLE API and the ones only seen on live devices.

use uuid::Uuid;

// Standard GATT services
/// Generic Access service UUID.
pub const GENERIC_ACCESS_SERVICE_UUID: Uuid =
    Uuid::from_u128(0x0000_1800_0000_1000_8000_00805f9b34fb);
/// Generic Attribute service UUID.
pub const GENERIC_ATTRIBUTE_SERVICE_UUID: Uuid =
    Uuid::from_u128(0x0000_1801_0000_1000_8000_00805f9b34fb);

// Network Node Service (Decawave)
/// Decawave Network Node service UUID.
pub const NETWORK_NODE_SERVICE_UUID: Uuid =
    Uuid::from_u128(0x680c21d9_c946_4c1f_9c11_baa1c21329e7);

/// Operation mode characteristic UUID (Read, Write).
pub const OPERATION_MODE_UUID: Uuid = Uuid::from_u128(0x3f0afd88_7770_46b0_b5e7_9fc099598964);
/// Network ID characteristic UUID (Read, Write).
pub const NETWORK_ID_UUID: Uuid = Uuid::from_u128(0x80f9d8bc_3bff_45bb_a181_2d6a37991208);
/// Location data mode characteristic UUID (Read, Write).
pub const LOCATION_DATA_MODE_UUID: Uuid = Uuid::from_u128(0xa02b947e_df97_4516_996a_1882521e0ead);
/// Location data characteristic UUID (Read, Notify).
pub const LOCATION_DATA_UUID: Uuid = Uuid::from_u128(0x003bbdf2_c634_4b3d_ab56_7ec889b89a37);
/// Proxy positions characteristic UUID (Notify).
pub const PROXY_POSITIONS_UUID: Uuid = Uuid::from_u128(0xf4a67d7d_379d_4183_9c03_4b6ea5103291);
/// Device info characteristic UUID (Read).
pub const DEVICE_INFO_UUID: Uuid = Uuid::from_u128(0x1e63b1eb_d4ed_444e_af54_c1e965192501);
/// Statistics characteristic UUID (Read).
pub const STATISTICS_UUID: Uuid = Uuid::from_u128(0x0eb2bc59_baf1_4c1c_8535_8a0204c69de5);
/// Firmware update push characteristic UUID (Write).
pub const FW_UPDATE_PUSH_UUID: Uuid = Uuid::from_u128(0x5955aa10_e085_4030_8aa6_bdfac89ac32b);
/// Firmware update poll characteristic UUID (Notify).
pub const FW_UPDATE_POLL_UUID: Uuid = Uuid::from_u128(0x9eed0e27_09c0_4d1c_bd92_7c441daba850);
/// Disconnect characteristic UUID (Write).
pub const DISCONNECT_UUID: Uuid = Uuid::from_u128(0xed83b848_da03_4a0a_a2dc_8b401080e473);

// Anchor/tag specific characteristics, found on live nodes
/// Anchor persisted position characteristic UUID.
pub const PERSISTED_POSITION_UUID: Uuid = Uuid::from_u128(0xf0f26c9b_2c8c_49ac_ab60_fe03def1b40c);
/// Anchor cluster info characteristic UUID.
pub const CLUSTER_INFO_UUID: Uuid = Uuid::from_u128(0x17b1613e_98f2_4436_bcde_23af17a10c72);
/// Anchor MAC statistics characteristic UUID.
pub const MAC_STATS_UUID: Uuid = Uuid::from_u128(0x28d01d60_89de_4bfa_b6e9_651ba596232c);
/// Anchor list characteristic UUID.
pub const ANCHOR_LIST_UUID: Uuid = Uuid::from_u128(0x5b10c428_af2f_486f_aee1_9dbd79b6bccb);
/// Tag update rate characteristic UUID.
pub const TAG_UPDATE_RATE_UUID: Uuid = Uuid::from_u128(0x7bd47f30_5602_4389_b069_8305731308b6);

/// Human readable name of a known service.
pub fn known_service_name(uuid: &Uuid) -> Option<&'static str> {
    match *uuid {
        NETWORK_NODE_SERVICE_UUID => Some("Network Node"),
        GENERIC_ACCESS_SERVICE_UUID => Some("Generic Access"),
        GENERIC_ATTRIBUTE_SERVICE_UUID => Some("Generic Attribute"),
        _ => None,
    }
}

/// Human readable name of a known Network Node characteristic.
pub fn known_characteristic_name(uuid: &Uuid) -> Option<&'static str> {
    let name = match *uuid {
        OPERATION_MODE_UUID => "Operation Mode",
        NETWORK_ID_UUID => "Network ID",
        LOCATION_DATA_MODE_UUID => "Location Data Mode",
        LOCATION_DATA_UUID => "Location Data",
        PROXY_POSITIONS_UUID => "Proxy Positions",
        DEVICE_INFO_UUID => "Device Info",
        STATISTICS_UUID => "Statistics",
        FW_UPDATE_PUSH_UUID => "FW Update Push",
        FW_UPDATE_POLL_UUID => "FW Update Poll",
        DISCONNECT_UUID => "Disconnect",
        PERSISTED_POSITION_UUID => "Persisted Position",
        CLUSTER_INFO_UUID => "Cluster Info",
        MAC_STATS_UUID => "MAC Stats",
        ANCHOR_LIST_UUID => "Anchor List",
        TAG_UPDATE_RATE_UUID => "Tag Update Rate",
        _ => return None,
    };
    Some(name)
}

/// Check if a service UUID is the Decawave Network Node service.
pub fn is_network_node_service(uuid: &Uuid) -> bool {
    *uuid == NETWORK_NODE_SERVICE_UUID
}
