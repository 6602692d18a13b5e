//! Shared test utilities for inv-db unit tests.

#[cfg(test)]
pub(crate) mod helpers {
    use inv_core::entities::{
        Building, Characteristics, Disk, EquipmentType, Floor, Gpu, Room, University,
    };
    use inv_core::enums::{DiskType, UserRole};
    use inv_core::identity::Actor;

    use crate::InventoryDb;
    use crate::repos::room::NewRoom;
    use crate::repos::user::NewUser;
    use crate::service::InventoryService;
    use crate::trail::writer::TrailWriter;

    /// Create an in-memory service with trail disabled (for pure DB tests).
    pub async fn test_service() -> InventoryService {
        let db = InventoryDb::open_local(":memory:").await.unwrap();
        InventoryService::from_db(db, TrailWriter::disabled())
    }

    /// Create an in-memory service with trail enabled writing to a temp dir.
    pub async fn test_service_with_trail(trail_dir: std::path::PathBuf) -> InventoryService {
        let db = InventoryDb::open_local(":memory:").await.unwrap();
        let trail = TrailWriter::new(trail_dir).unwrap();
        InventoryService::from_db(db, trail)
    }

    /// Bootstrap the first admin and return it as an actor.
    pub async fn admin(svc: &InventoryService) -> Actor {
        svc.bootstrap_admin(NewUser {
            username: "admin".into(),
            ..NewUser::default()
        })
        .await
        .unwrap()
        .actor()
    }

    /// Create a manager through `admin`.
    pub async fn manager(svc: &InventoryService, admin: &Actor, username: &str) -> Actor {
        svc.create_user(
            admin,
            NewUser {
                username: username.into(),
                role: UserRole::Manager,
                ..NewUser::default()
            },
        )
        .await
        .unwrap()
        .actor()
    }

    /// One university with one building, one floor and two rooms.
    pub struct Campus {
        pub university: University,
        pub building: Building,
        pub floor: Floor,
        pub room_a: Room,
        pub room_b: Room,
    }

    pub async fn campus(svc: &InventoryService, actor: &Actor) -> Campus {
        let university = svc
            .create_university(actor, "State Technical University", None)
            .await
            .unwrap();
        let building = svc
            .create_building(actor, &university.id, "Main", Some("1 Lenin Ave"))
            .await
            .unwrap();
        let floor = svc
            .create_floor(actor, &building.id, 1, None)
            .await
            .unwrap();
        let room_a = svc
            .create_room(actor, new_room(&building, &floor, "101"))
            .await
            .unwrap();
        let room_b = svc
            .create_room(actor, new_room(&building, &floor, "102"))
            .await
            .unwrap();
        Campus {
            university,
            building,
            floor,
            room_a,
            room_b,
        }
    }

    pub fn new_room(building: &Building, floor: &Floor, number: &str) -> NewRoom {
        NewRoom {
            building_id: building.id.clone(),
            floor_id: floor.id.clone(),
            number: number.into(),
            name: None,
            is_special: false,
        }
    }

    pub async fn equipment_type(svc: &InventoryService, admin: &Actor, name: &str) -> EquipmentType {
        svc.create_equipment_type(admin, name).await.unwrap()
    }

    pub fn office_pc() -> Characteristics {
        Characteristics::Computer {
            cpu: "Intel i5-12400".into(),
            ram: "16GB".into(),
            has_keyboard: true,
            has_mouse: true,
            disks: vec![Disk {
                disk_type: DiskType::Ssd,
                capacity_gb: 512,
            }],
            gpus: vec![Gpu {
                model: "UHD 730".into(),
            }],
        }
    }

    pub fn printer_spec() -> Characteristics {
        Characteristics::Printer {
            model: "HP LaserJet".into(),
            serial_number: "SN1".into(),
            color: false,
            duplex: true,
        }
    }
}
