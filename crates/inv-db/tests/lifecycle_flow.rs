//! End-to-end equipment lifecycle against an on-disk database with the
//! JSONL trail enabled.

use inv_core::entities::Equipment;
use inv_core::enums::{EntityType, EquipmentStatus, RepairStatus, TrailOp};
use inv_core::identity::Actor;
use inv_db::InventoryDb;
use inv_db::error::DatabaseError;
use inv_db::repos::equipment::NewEquipment;
use inv_db::repos::room::NewRoom;
use inv_db::repos::user::NewUser;
use inv_db::service::InventoryService;
use inv_db::trail::writer::TrailWriter;
use inv_db::updates::equipment::EquipmentUpdateBuilder;
use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    svc: InventoryService,
    admin: Actor,
    rooms: [String; 2],
    type_id: String,
}

async fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("inventory.db");
    let db = InventoryDb::open_local(db_path.to_str().unwrap()).await.unwrap();
    let trail = TrailWriter::new(dir.path().join("trail")).unwrap();
    let svc = InventoryService::from_db(db, trail);

    let admin = svc
        .bootstrap_admin(NewUser {
            username: "root".into(),
            first_name: "Irina".into(),
            last_name: "Petrova".into(),
            ..NewUser::default()
        })
        .await
        .unwrap()
        .actor();
    let uni = svc.create_university(&admin, "Polytech", None).await.unwrap();
    let building = svc
        .create_building(&admin, &uni.id, "Lab block", None)
        .await
        .unwrap();
    let floor = svc.create_floor(&admin, &building.id, 2, None).await.unwrap();
    let mut rooms = Vec::new();
    for number in ["201", "202"] {
        let room = svc
            .create_room(
                &admin,
                NewRoom {
                    building_id: building.id.clone(),
                    floor_id: floor.id.clone(),
                    number: number.into(),
                    name: None,
                    is_special: false,
                },
            )
            .await
            .unwrap();
        rooms.push(room.id);
    }
    let ty = svc.create_equipment_type(&admin, "Projector stand").await.unwrap();
    Fixture {
        _dir: dir,
        svc,
        admin,
        rooms: [rooms[0].clone(), rooms[1].clone()],
        type_id: ty.id,
    }
}

async fn create(f: &Fixture, status: EquipmentStatus) -> Equipment {
    let mut new = NewEquipment::new(&f.type_id, "Stand");
    new.room_id = Some(f.rooms[0].clone());
    new.inn = 700;
    let eq = f.svc.create_equipment(&f.admin, new).await.unwrap();
    if status == EquipmentStatus::New {
        return eq;
    }
    f.svc
        .update_equipment(&f.admin, &eq.id, EquipmentUpdateBuilder::new().status(status).build())
        .await
        .unwrap()
}

#[tokio::test]
async fn full_lifecycle_is_audited_and_trailed() {
    let f = fixture().await;
    let eq = create(&f, EquipmentStatus::Working).await;

    f.svc
        .move_equipment(&f.admin, &[eq.id.clone()], &f.rooms[0], &f.rooms[1], None)
        .await
        .unwrap();
    let repair = f.svc.send_to_repair(&f.admin, &eq.id, Some("bent leg")).await.unwrap();
    assert_eq!(repair.original_room_id.as_deref(), Some(f.rooms[1].as_str()));

    f.svc
        .update_repair_status(&f.admin, &repair.id, RepairStatus::Completed, None)
        .await
        .unwrap();
    let back = f.svc.get_equipment(&f.admin, &eq.id).await.unwrap();
    assert_eq!(back.status, EquipmentStatus::Working);
    assert_eq!(back.room_id.as_deref(), Some(f.rooms[1].as_str()));

    f.svc
        .dispose_equipment(&f.admin, &eq.id, "end of life", None)
        .await
        .unwrap();
    let gone = f.svc.get_equipment(&f.admin, &eq.id).await.unwrap();
    assert_eq!(gone.status, EquipmentStatus::Disposed);
    assert_eq!(gone.room_id, None);

    let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
    let lines = f.svc.trail().read_day(&today).unwrap();
    let ops_for_item: Vec<TrailOp> = lines
        .iter()
        .filter(|l| l.entity == EntityType::Equipment && l.id == eq.id)
        .map(|l| l.op)
        .collect();
    assert_eq!(
        ops_for_item,
        vec![
            TrailOp::Create,
            TrailOp::Update,
            TrailOp::Move,
            TrailOp::Transition,
            TrailOp::Transition,
        ]
    );
    assert!(lines.iter().all(|l| l.user == f.admin.user_id));
}

#[rstest]
#[case::new_to_working(EquipmentStatus::New, EquipmentStatus::Working, true)]
#[case::new_to_repair(EquipmentStatus::New, EquipmentStatus::NeedsRepair, true)]
#[case::working_to_new(EquipmentStatus::Working, EquipmentStatus::New, false)]
#[case::repair_to_working(EquipmentStatus::NeedsRepair, EquipmentStatus::Working, true)]
#[case::repair_to_disposed(EquipmentStatus::NeedsRepair, EquipmentStatus::Disposed, true)]
#[case::disposed_to_working(EquipmentStatus::Disposed, EquipmentStatus::Working, false)]
#[case::disposed_to_repair(EquipmentStatus::Disposed, EquipmentStatus::NeedsRepair, false)]
#[tokio::test]
async fn status_updates_follow_transition_table(
    #[case] from: EquipmentStatus,
    #[case] to: EquipmentStatus,
    #[case] allowed: bool,
) {
    let f = fixture().await;
    let eq = create(&f, from).await;
    let result = f
        .svc
        .update_equipment(&f.admin, &eq.id, EquipmentUpdateBuilder::new().status(to).build())
        .await;
    if allowed {
        assert_eq!(result.unwrap().status, to);
    } else {
        assert!(matches!(result, Err(DatabaseError::InvalidState(_))));
        let unchanged = f.svc.get_equipment(&f.admin, &eq.id).await.unwrap();
        assert_eq!(unchanged.status, from);
    }
}

#[tokio::test]
async fn state_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("inventory.db");
    let path = db_path.to_str().unwrap();
    {
        let svc = InventoryService::from_db(
            InventoryDb::open_local(path).await.unwrap(),
            TrailWriter::disabled(),
        );
        svc.bootstrap_admin(NewUser {
            username: "root".into(),
            ..NewUser::default()
        })
        .await
        .unwrap();
    }
    let svc = InventoryService::from_db(
        InventoryDb::open_local(path).await.unwrap(),
        TrailWriter::disabled(),
    );
    let admin = svc.resolve_actor("root").await.unwrap();
    assert!(admin.is_admin());
    assert_eq!(svc.user_count().await.unwrap(), 1);
}
