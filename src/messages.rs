use mac_address::MacAddress;
use serde_derive::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DevicePresence {
    Present,
    Absent,
}

/// One positive detection, reported to the attendance API.
#[derive(Copy, Clone, Debug, Serialize, PartialEq, Eq)]
pub struct DetectionEvent {
    pub mac_address: MacAddress,
    pub room_id: u32,
}
