//! QR label scanning.

use inv_core::audit_detail::ScanDetail;
use inv_core::enums::{ActionType, EntityType, QrObjectType, TrailOp};
use inv_core::identity::Actor;
use inv_core::qr::parse_equipment_uid;
use inv_core::responses::ScanResult;

use crate::error::{DatabaseError, not_found};
use crate::repos::action::NewAction;
use crate::service::InventoryService;

impl InventoryService {
    /// Resolve scanned label data to a room or an equipment item and log
    /// the scan.
    ///
    /// Room labels carry the room uid. Equipment labels carry the full
    /// payload, but a bare uid is accepted too.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the data does not resolve to an object.
    pub async fn scan_qr(
        &self,
        actor: &Actor,
        object_type: QrObjectType,
        data: &str,
    ) -> Result<ScanResult, DatabaseError> {
        let (result, entity, id, label) = match object_type {
            QrObjectType::Room => {
                let uid = data.trim();
                if uid.is_empty() {
                    return Err(not_found("room", data));
                }
                let room = self.get_room_by_uid(uid).await?;
                let (id, label) = (room.id.clone(), format!("room {}", room.number));
                (ScanResult::Room(room), EntityType::Room, id, label)
            }
            QrObjectType::Equipment => {
                let uid = parse_equipment_uid(data).ok_or_else(|| not_found("equipment", data))?;
                let eq = self.get_equipment_by_uid(&uid).await?;
                let (id, label) = (eq.id.clone(), format!("equipment {}", eq.name));
                (ScanResult::Equipment(eq), EntityType::Equipment, id, label)
            }
        };

        let detail = ScanDetail {
            object_type: object_type.to_string(),
            object_id: id.clone(),
            data: data.to_string(),
        };
        self.record(
            actor,
            NewAction::new(ActionType::Scan, format!("Scanned {label}"))
                .on(entity, &id)
                .details(serde_json::to_value(&detail)?),
            TrailOp::Scan,
            &detail,
        )
        .await?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::repos::action::ActionFilter;
    use crate::repos::equipment::NewEquipment;
    use crate::test_support::helpers::*;

    use super::*;

    #[tokio::test]
    async fn scan_room_and_equipment() {
        let svc = test_service().await;
        let admin = admin(&svc).await;
        let c = campus(&svc, &admin).await;
        let desk = equipment_type(&svc, &admin, "Desk").await;
        let mut new = NewEquipment::new(&desk.id, "Desk");
        new.room_id = Some(c.room_a.id.clone());
        new.inn = 31;
        let eq = svc.create_equipment(&admin, new).await.unwrap();

        let room = svc
            .scan_qr(&admin, QrObjectType::Room, &c.room_a.qr_payload)
            .await
            .unwrap();
        assert_eq!(room, ScanResult::Room(c.room_a.clone()));

        let payload = eq.qr_payload.clone().unwrap();
        let by_payload = svc.scan_qr(&admin, QrObjectType::Equipment, &payload).await.unwrap();
        let by_uid = svc.scan_qr(&admin, QrObjectType::Equipment, &eq.uid).await.unwrap();
        assert_eq!(by_payload, by_uid);
        assert_eq!(by_uid, ScanResult::Equipment(eq));

        let scans = svc
            .query_actions(
                &admin,
                &ActionFilter {
                    action_type: Some(ActionType::Scan),
                    ..ActionFilter::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(scans.len(), 3);
    }

    #[tokio::test]
    async fn unknown_scan_is_not_found() {
        let svc = test_service().await;
        let admin = admin(&svc).await;
        for (ty, data) in [
            (QrObjectType::Room, "no-such-uid"),
            (QrObjectType::Room, "   "),
            (QrObjectType::Equipment, "ИНН: 5\nНазвание: x"),
            (QrObjectType::Equipment, "no-such-uid"),
        ] {
            assert!(matches!(
                svc.scan_qr(&admin, ty, data).await,
                Err(DatabaseError::NotFound { .. })
            ));
        }
    }
}
