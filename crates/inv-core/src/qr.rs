//! QR payload encoding and decoding.
//!
//! Equipment labels carry a four-line text payload; room labels carry the
//! room's `uid` verbatim. Payloads are regenerated whenever a field they
//! embed changes, and equipment without an inventory number (`inn == 0`)
//! carries no payload at all.

const UID_LABEL: &str = "UID:";
/// Caption prefix of the inventory number, also printed under label codes.
pub const INN_LABEL: &str = "ИНН:";
const NAME_LABEL: &str = "Название:";
const ROOM_LABEL: &str = "Кабинет:";

/// Placeholder for equipment that is not assigned to a room.
pub const NO_ROOM: &str = "N/A";

/// Build the label payload for an equipment item.
///
/// Returns `None` when `inn` is 0, meaning the item has no inventory number
/// yet and must not carry a label.
#[must_use]
pub fn equipment_payload(uid: &str, inn: i64, name: &str, room_number: Option<&str>) -> Option<String> {
    if inn == 0 {
        return None;
    }
    Some(format!(
        "{UID_LABEL} {uid}\n{INN_LABEL} {inn}\n{NAME_LABEL} {name}\n{ROOM_LABEL} {}",
        room_number.unwrap_or(NO_ROOM)
    ))
}

/// Extract the equipment `uid` from scanned data.
///
/// Accepts either a full label payload (the `UID:` line is used) or a bare
/// uid. Returns `None` for empty input or a payload without a usable `UID:`
/// line.
#[must_use]
pub fn parse_equipment_uid(data: &str) -> Option<String> {
    let data = data.trim();
    if data.is_empty() {
        return None;
    }
    if !data.contains('\n') && !data.starts_with(UID_LABEL) {
        return Some(data.to_string());
    }
    data.lines()
        .find_map(|line| line.trim().strip_prefix(UID_LABEL))
        .map(str::trim)
        .filter(|uid| !uid.is_empty())
        .map(String::from)
}

/// A room reference extracted from a shareable room URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomLink {
    pub room_id: String,
    pub building_id: String,
}

/// Parse a room URL of the form `…/rooms/{room_id}/?building={building_id}`.
///
/// Only the path segment after the last `/rooms/` and the `building` query
/// parameter are significant; scheme, host and other parameters are ignored.
#[must_use]
pub fn parse_room_link(url: &str) -> Option<RoomLink> {
    let (path, query) = url.trim().split_once('?')?;
    let after = &path[path.rfind("/rooms/")? + "/rooms/".len()..];
    let room_id = after.trim_end_matches('/');
    if room_id.is_empty() || room_id.contains('/') || !is_id_like(room_id) {
        return None;
    }
    let building_id = query
        .split('&')
        .find_map(|pair| pair.strip_prefix("building="))?;
    if building_id.is_empty() || !is_id_like(building_id) {
        return None;
    }
    Some(RoomLink {
        room_id: room_id.to_string(),
        building_id: building_id.to_string(),
    })
}

fn is_id_like(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}
