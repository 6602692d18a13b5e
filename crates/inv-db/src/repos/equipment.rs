//! Equipment repository: CRUD, the characteristic rule, QR labels,
//! filtered listing and per-room grouping.
//!
//! Status changes made through [`InventoryService::update_equipment`] are
//! routed through the lifecycle in `repos/lifecycle.rs`.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};

use inv_core::audit_detail::ChangesDetail;
use inv_core::entities::{Characteristics, Equipment, EquipmentType};
use inv_core::enums::{ActionType, CharacteristicKind, EntityType, EquipmentStatus, TrailOp};
use inv_core::identity::Actor;
use inv_core::ids::PREFIX_EQUIPMENT;
use inv_core::qr::equipment_payload;
use inv_core::responses::{EquipmentGroup, EquipmentLabel, Page, Paged};

use crate::access::{owner_filter, require_owner};
use crate::error::{DatabaseError, not_found};
use crate::helpers::{
    contains_pattern, fold_search, get_bool, get_opt_string, parse_datetime, parse_enum, parse_json,
    to_json_text,
};
use crate::repos::action::NewAction;
use crate::service::InventoryService;
use crate::updates::SetClause;
use crate::updates::equipment::EquipmentUpdate;

pub(crate) const SELECT_COLS: &str = "e.id, e.type_id, e.room_id, e.name, e.description, e.status, \
     e.is_active, e.inn, e.author_id, e.contract_id, e.uid, e.qr_payload, e.characteristics, \
     e.created_at, e.updated_at";

/// Fields for a new equipment item.
///
/// At most one of `characteristics` and `spec_id` may be set; which one is
/// required depends on the equipment type.
#[derive(Debug, Clone)]
pub struct NewEquipment {
    pub type_id: String,
    pub room_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub status: EquipmentStatus,
    pub is_active: bool,
    pub inn: i64,
    pub contract_id: Option<String>,
    pub characteristics: Option<Characteristics>,
    pub spec_id: Option<String>,
}

impl NewEquipment {
    pub fn new(type_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            type_id: type_id.into(),
            room_id: None,
            name: name.into(),
            description: None,
            status: EquipmentStatus::New,
            is_active: true,
            inn: 0,
            contract_id: None,
            characteristics: None,
            spec_id: None,
        }
    }
}

/// Filters for [`InventoryService::list_equipment`]. All are optional and
/// combined with AND.
#[derive(Debug, Clone, Default)]
pub struct EquipmentFilter {
    pub building_id: Option<String>,
    pub floor_id: Option<String>,
    pub room_id: Option<String>,
    pub type_id: Option<String>,
    pub status: Option<EquipmentStatus>,
    /// Case-insensitive substring of the name, description or inventory number.
    pub search: Option<String>,
    /// Inclusive lower bound on `created_at`.
    pub created_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created_at`.
    pub created_to: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
    pub author_id: Option<String>,
    pub characteristics: CharacteristicFilter,
}

/// Attribute filters over stored characteristics.
///
/// Text fields match case-insensitive substrings. Printer, router and TV
/// filters only match items of that family.
#[derive(Debug, Clone, Default)]
pub struct CharacteristicFilter {
    pub cpu: Option<String>,
    pub ram: Option<String>,
    pub has_keyboard: Option<bool>,
    pub has_mouse: Option<bool>,
    /// Built-in screen of notebooks and monoblocks.
    pub monitor_size: Option<String>,
    pub printer_model: Option<String>,
    pub printer_color: Option<bool>,
    pub printer_duplex: Option<bool>,
    pub router_model: Option<String>,
    pub router_ports: Option<u32>,
    pub router_wifi: Option<String>,
    pub tv_model: Option<String>,
    pub tv_screen_size: Option<String>,
}

/// WHERE fragments with positional parameters numbered in push order.
#[derive(Default)]
struct Conditions {
    clauses: Vec<String>,
    params: Vec<libsql::Value>,
}

impl Conditions {
    fn push(&mut self, value: impl Into<libsql::Value>, clause: impl FnOnce(usize) -> String) {
        self.params.push(value.into());
        self.clauses.push(clause(self.params.len()));
    }

    fn attr_contains(&mut self, kind: Option<CharacteristicKind>, attr: &str, term: Option<&str>) {
        let Some(term) = term.map(str::trim).filter(|t| !t.is_empty()) else {
            return;
        };
        let family = family_clause(kind);
        self.push(contains_pattern(term), |n| {
            format!(
                "CAST(json_extract(e.characteristics_folded, '$.{attr}') AS TEXT) LIKE ?{n} ESCAPE '\\'{family}"
            )
        });
    }

    fn attr_equals(&mut self, kind: Option<CharacteristicKind>, attr: &str, value: Option<i64>) {
        let Some(value) = value else {
            return;
        };
        let family = family_clause(kind);
        self.push(value, |n| {
            format!("json_extract(e.characteristics, '$.{attr}') = ?{n}{family}")
        });
    }

    fn characteristics(&mut self, f: &CharacteristicFilter) {
        use CharacteristicKind::{Printer, Router, Tv};

        self.attr_contains(None, "cpu", f.cpu.as_deref());
        self.attr_contains(None, "ram", f.ram.as_deref());
        self.attr_equals(None, "has_keyboard", f.has_keyboard.map(i64::from));
        self.attr_equals(None, "has_mouse", f.has_mouse.map(i64::from));
        self.attr_contains(None, "monitor_size", f.monitor_size.as_deref());
        self.attr_contains(Some(Printer), "model", f.printer_model.as_deref());
        self.attr_equals(Some(Printer), "color", f.printer_color.map(i64::from));
        self.attr_equals(Some(Printer), "duplex", f.printer_duplex.map(i64::from));
        self.attr_contains(Some(Router), "model", f.router_model.as_deref());
        self.attr_equals(Some(Router), "ports", f.router_ports.map(i64::from));
        self.attr_contains(Some(Router), "wifi_standard", f.router_wifi.as_deref());
        self.attr_contains(Some(Tv), "model", f.tv_model.as_deref());
        self.attr_contains(Some(Tv), "screen_size", f.tv_screen_size.as_deref());
    }
}

fn family_clause(kind: Option<CharacteristicKind>) -> String {
    kind.map(|k| format!(" AND json_extract(e.characteristics, '$.kind') = '{k}'"))
        .unwrap_or_default()
}

pub(crate) fn row_to_equipment(row: &libsql::Row) -> Result<Equipment, DatabaseError> {
    let characteristics = get_opt_string(row, 12)?
        .map(|s| parse_json::<Characteristics>(&s))
        .transpose()?;
    Ok(Equipment {
        id: row.get::<String>(0)?,
        type_id: row.get::<String>(1)?,
        room_id: get_opt_string(row, 2)?,
        name: row.get::<String>(3)?,
        description: get_opt_string(row, 4)?,
        status: parse_enum(&row.get::<String>(5)?)?,
        is_active: get_bool(row, 6)?,
        inn: row.get::<i64>(7)?,
        author_id: get_opt_string(row, 8)?,
        contract_id: get_opt_string(row, 9)?,
        uid: row.get::<String>(10)?,
        qr_payload: get_opt_string(row, 11)?,
        characteristics,
        created_at: parse_datetime(&row.get::<String>(13)?)?,
        updated_at: parse_datetime(&row.get::<String>(14)?)?,
    })
}

/// Folded text the free-text search matches against.
fn search_text(name: &str, description: Option<&str>, inn: i64) -> String {
    let inn = inn.to_string();
    fold_search([name, description.unwrap_or_default(), inn.as_str()])
}

fn check_inn(inn: i64) -> Result<(), DatabaseError> {
    if inn < 0 {
        return Err(DatabaseError::Validation(format!(
            "inventory number must not be negative (got {inn})"
        )));
    }
    Ok(())
}

/// Check explicit characteristics against the type's family.
fn check_kind(ty: &EquipmentType, characteristics: &Characteristics) -> Result<(), DatabaseError> {
    match ty.characteristic_kind() {
        None => Err(DatabaseError::Validation(format!(
            "equipment type '{}' has no characteristics",
            ty.name
        ))),
        Some(kind) if kind != characteristics.kind() => Err(DatabaseError::Validation(format!(
            "equipment type '{}' expects {kind} characteristics, got {}",
            ty.name,
            characteristics.kind()
        ))),
        Some(_) => Ok(()),
    }
}

impl InventoryService {
    /// Apply the characteristic rule and return what to store.
    ///
    /// A type that maps to a family needs exactly one of explicit
    /// characteristics or a specification of that family. A type without a
    /// family accepts neither.
    pub(crate) async fn resolve_characteristics(
        &self,
        actor: &Actor,
        ty: &EquipmentType,
        characteristics: Option<Characteristics>,
        spec_id: Option<&str>,
    ) -> Result<Option<Characteristics>, DatabaseError> {
        match (ty.characteristic_kind(), characteristics, spec_id) {
            (None, None, None) => Ok(None),
            (None, _, _) => Err(DatabaseError::Validation(format!(
                "equipment type '{}' takes neither characteristics nor a specification",
                ty.name
            ))),
            (Some(_), Some(_), Some(_)) => Err(DatabaseError::Validation(
                "give either characteristics or a specification, not both".into(),
            )),
            (Some(kind), None, None) => Err(DatabaseError::Validation(format!(
                "equipment type '{}' requires {kind} characteristics or a specification",
                ty.name
            ))),
            (Some(_), Some(c), None) => {
                check_kind(ty, &c)?;
                Ok(Some(c))
            }
            (Some(kind), None, Some(spec_id)) => {
                let spec = self.get_specification(actor, spec_id).await?;
                if spec.kind != kind {
                    return Err(DatabaseError::Validation(format!(
                        "specification '{}' is a {} template; type '{}' needs {kind}",
                        spec.name, spec.kind, ty.name
                    )));
                }
                Ok(Some(spec.characteristics))
            }
        }
    }

    pub(crate) async fn room_number(&self, room_id: Option<&str>) -> Result<Option<String>, DatabaseError> {
        let Some(room_id) = room_id else {
            return Ok(None);
        };
        let mut rows = self
            .db()
            .query_with("SELECT number FROM rooms WHERE id = ?1", || [room_id])
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row.get::<String>(0)?)),
            None => Ok(None),
        }
    }

    /// Insert a validated item with status NEW. Serial numbers left empty
    /// are taken from the inventory number.
    pub(crate) async fn insert_equipment(
        &self,
        actor: &Actor,
        new: &NewEquipment,
        characteristics: Option<&Characteristics>,
    ) -> Result<Equipment, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_EQUIPMENT).await?;
        let uid = self.db().generate_uid().await?;
        let room_number = self.room_number(new.room_id.as_deref()).await?;
        let qr = equipment_payload(&uid, new.inn, &new.name, room_number.as_deref());
        let characteristics = characteristics.cloned().map(|mut c| {
            c.fill_serial_number(new.inn);
            c
        });
        let json = characteristics.as_ref().map(to_json_text).transpose()?;
        let search = search_text(&new.name, new.description.as_deref(), new.inn);
        let folded = json.as_deref().map(str::to_lowercase);

        self.db()
            .execute_with(
                "INSERT INTO equipment (id, type_id, room_id, name, description, status, is_active, inn,
                                        author_id, contract_id, uid, qr_payload, characteristics,
                                        created_at, updated_at, search_text, characteristics_folded)
                 VALUES (?1, ?2, ?3, ?4, ?5, 'new', ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?13, ?14, ?15)",
                || {
                    libsql::params![
                        id.as_str(),
                        new.type_id.as_str(),
                        new.room_id.as_deref(),
                        new.name.as_str(),
                        new.description.as_deref(),
                        i64::from(new.is_active),
                        new.inn,
                        actor.user_id.as_str(),
                        new.contract_id.as_deref(),
                        uid.as_str(),
                        qr.as_deref(),
                        json.as_deref(),
                        now.to_rfc3339(),
                        search.as_str(),
                        folded.as_deref()
                    ]
                },
            )
            .await?;

        Ok(Equipment {
            id,
            type_id: new.type_id.clone(),
            room_id: new.room_id.clone(),
            name: new.name.clone(),
            description: new.description.clone(),
            status: EquipmentStatus::New,
            is_active: new.is_active,
            inn: new.inn,
            author_id: Some(actor.user_id.clone()),
            contract_id: new.contract_id.clone(),
            uid,
            qr_payload: qr,
            characteristics,
            created_at: now,
            updated_at: now,
        })
    }

    /// Check the room and contract an item is about to reference.
    async fn check_references(
        &self,
        actor: &Actor,
        room_id: Option<&str>,
        contract_id: Option<&str>,
    ) -> Result<(), DatabaseError> {
        if let Some(room_id) = room_id {
            if !self.room_exists(room_id).await? {
                return Err(not_found("room", room_id));
            }
        }
        if let Some(contract_id) = contract_id {
            self.get_contract(actor, contract_id).await?;
        }
        Ok(())
    }

    /// Create an equipment item.
    ///
    /// The item is inserted as NEW; any other requested status is then
    /// reached through the lifecycle, so the matching repair or disposal
    /// record is created too.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty name, a negative inventory number
    /// or a characteristic rule violation, and `NotFound` for unknown
    /// references.
    pub async fn create_equipment(
        &self,
        actor: &Actor,
        new: NewEquipment,
    ) -> Result<Equipment, DatabaseError> {
        let new = NewEquipment {
            name: new.name.trim().to_string(),
            ..new
        };
        if new.name.is_empty() {
            return Err(DatabaseError::Validation("equipment name must not be empty".into()));
        }
        check_inn(new.inn)?;
        let ty = self.get_equipment_type(&new.type_id).await?;
        self.check_references(actor, new.room_id.as_deref(), new.contract_id.as_deref())
            .await?;
        let characteristics = self
            .resolve_characteristics(actor, &ty, new.characteristics.clone(), new.spec_id.as_deref())
            .await?;

        self.atomically(async {
            let eq = self
                .insert_equipment(actor, &new, characteristics.as_ref())
                .await?;
            self.record(
                actor,
                NewAction::new(ActionType::CreateEquipment, format!("Created equipment: {}", eq.name))
                    .on(EntityType::Equipment, &eq.id),
                TrailOp::Create,
                &eq,
            )
            .await?;
            if new.status == EquipmentStatus::New {
                Ok(eq)
            } else {
                self.transition_equipment(actor, &eq, new.status).await?;
                self.load_equipment(&eq.id).await
            }
        })
        .await
    }

    /// Create an item in the room named by a shareable room link.
    ///
    /// # Errors
    ///
    /// Same as [`Self::create_equipment`], plus link resolution errors.
    pub async fn create_equipment_from_link(
        &self,
        actor: &Actor,
        url: &str,
        new: NewEquipment,
    ) -> Result<Equipment, DatabaseError> {
        let room = self.resolve_room_link(url).await?;
        self.create_equipment(
            actor,
            NewEquipment {
                room_id: Some(room.id),
                ..new
            },
        )
        .await
    }

    /// Fetch without a visibility check.
    pub(crate) async fn load_equipment(&self, id: &str) -> Result<Equipment, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(
                &format!("SELECT {SELECT_COLS} FROM equipment e WHERE e.id = ?1"),
                || [id],
            )
            .await?;
        let row = rows.next().await?.ok_or_else(|| not_found("equipment", id))?;
        row_to_equipment(&row)
    }

    /// # Errors
    ///
    /// Returns `NotFound` or `PermissionDenied` (another manager's item).
    pub async fn get_equipment(&self, actor: &Actor, id: &str) -> Result<Equipment, DatabaseError> {
        let eq = self.load_equipment(id).await?;
        require_owner(actor, eq.author_id.as_deref(), "access to this equipment")?;
        Ok(eq)
    }

    /// # Errors
    ///
    /// Returns `NotFound` when no item carries that uid.
    pub async fn get_equipment_by_uid(&self, uid: &str) -> Result<Equipment, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(
                &format!("SELECT {SELECT_COLS} FROM equipment e WHERE e.uid = ?1"),
                || [uid],
            )
            .await?;
        let row = rows.next().await?.ok_or_else(|| not_found("equipment", uid))?;
        row_to_equipment(&row)
    }

    pub(crate) async fn equipment_ids_in_room(&self, room_id: &str) -> Result<Vec<String>, DatabaseError> {
        let mut rows = self
            .db()
            .query_with("SELECT id FROM equipment WHERE room_id = ?1", || [room_id])
            .await?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next().await? {
            ids.push(row.get::<String>(0)?);
        }
        Ok(ids)
    }

    /// Recompute the label payload and the folded search columns from the
    /// stored row.
    pub(crate) async fn refresh_derived_columns(&self, id: &str) -> Result<(), DatabaseError> {
        let eq = self.load_equipment(id).await?;
        let room_number = self.room_number(eq.room_id.as_deref()).await?;
        let qr = equipment_payload(&eq.uid, eq.inn, &eq.name, room_number.as_deref());
        let search = search_text(&eq.name, eq.description.as_deref(), eq.inn);
        let folded = eq
            .characteristics
            .as_ref()
            .map(to_json_text)
            .transpose()?
            .map(|json| json.to_lowercase());
        self.db()
            .execute_with(
                "UPDATE equipment SET qr_payload = ?1, search_text = ?2, characteristics_folded = ?3
                 WHERE id = ?4",
                || libsql::params![qr.as_deref(), search.as_str(), folded.as_deref(), id],
            )
            .await?;
        if qr != eq.qr_payload {
            tracing::debug!(equipment = id, "regenerated QR payload");
        }
        Ok(())
    }

    /// Update fields of an item. A status change is validated against the
    /// transition table and carried out through the lifecycle.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `PermissionDenied`, `Validation` or
    /// `InvalidState` (forbidden transition or lifecycle conflict).
    pub async fn update_equipment(
        &self,
        actor: &Actor,
        id: &str,
        update: EquipmentUpdate,
    ) -> Result<Equipment, DatabaseError> {
        let before = self.get_equipment(actor, id).await?;

        let mut set = SetClause::default();
        if let Some(ref name) = update.name {
            if name.trim().is_empty() {
                return Err(DatabaseError::Validation("equipment name must not be empty".into()));
            }
            set.push("name", name.trim());
        }
        if let Some(ref description) = update.description {
            set.push_opt("description", description.as_deref());
        }
        if let Some(ref room_id) = update.room_id {
            self.check_references(actor, room_id.as_deref(), None).await?;
            set.push_opt("room_id", room_id.as_deref());
        }
        if let Some(inn) = update.inn {
            check_inn(inn)?;
            set.push("inn", inn);
        }
        if let Some(ref contract_id) = update.contract_id {
            self.check_references(actor, None, contract_id.as_deref()).await?;
            set.push_opt("contract_id", contract_id.as_deref());
        }
        if let Some(is_active) = update.is_active {
            set.push("is_active", i64::from(is_active));
        }
        if let Some(ref characteristics) = update.characteristics {
            let ty = self.get_equipment_type(&before.type_id).await?;
            check_kind(&ty, characteristics)?;
            set.push("characteristics", to_json_text(characteristics)?);
        }
        let status_change = update.status.filter(|s| *s != before.status);
        if let Some(to) = status_change {
            if !before.status.can_transition_to(to) {
                return Err(inv_core::errors::CoreError::InvalidTransition {
                    entity_type: "equipment".into(),
                    id: id.to_string(),
                    from: before.status.to_string(),
                    to: to.to_string(),
                }
                .into());
            }
        }
        if set.is_empty() && status_change.is_none() {
            return Ok(before);
        }

        self.atomically(async {
            if !set.is_empty() {
                set.push("updated_at", Utc::now().to_rfc3339());
                let (sql, params) = set.into_sql("equipment", id);
                self.db()
                    .execute_with(&sql, || libsql::params_from_iter(params.clone()))
                    .await?;
            }
            if let Some(to) = status_change {
                let current = self.load_equipment(id).await?;
                self.transition_equipment(actor, &current, to).await?;
            }
            self.refresh_derived_columns(id).await?;
            let after = self.load_equipment(id).await?;

            let detail = ChangesDetail::diff(
                id,
                &after.name,
                &serde_json::to_value(&before)?,
                &serde_json::to_value(&after)?,
            );
            self.record(
                actor,
                NewAction::new(ActionType::UpdateEquipment, format!("Updated equipment: {}", after.name))
                    .on(EntityType::Equipment, id)
                    .details(serde_json::to_value(&detail)?),
                TrailOp::Update,
                &update,
            )
            .await?;
            Ok(after)
        })
        .await
    }

    /// # Errors
    ///
    /// Returns `NotFound` or `PermissionDenied`.
    pub async fn delete_equipment(&self, actor: &Actor, id: &str) -> Result<(), DatabaseError> {
        let eq = self.get_equipment(actor, id).await?;
        self.remove_equipment(actor, &eq).await
    }

    pub(crate) async fn remove_equipment(&self, actor: &Actor, eq: &Equipment) -> Result<(), DatabaseError> {
        self.db()
            .execute_with("DELETE FROM equipment WHERE id = ?1", || [eq.id.as_str()])
            .await?;
        self.record(
            actor,
            NewAction::new(ActionType::DeleteEquipment, format!("Deleted equipment: {}", eq.name))
                .on(EntityType::Equipment, &eq.id)
                .details(serde_json::to_value(eq)?),
            TrailOp::Delete,
            eq,
        )
        .await?;
        Ok(())
    }

    /// Visible equipment matching `filter`, newest first, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_equipment(
        &self,
        actor: &Actor,
        filter: &EquipmentFilter,
        page: Page,
    ) -> Result<Paged<Equipment>, DatabaseError> {
        let mut cond = Conditions::default();
        if let Some(ref v) = filter.building_id {
            cond.push(v.as_str(), |n| format!("r.building_id = ?{n}"));
        }
        if let Some(ref v) = filter.floor_id {
            cond.push(v.as_str(), |n| format!("r.floor_id = ?{n}"));
        }
        if let Some(ref v) = filter.room_id {
            cond.push(v.as_str(), |n| format!("e.room_id = ?{n}"));
        }
        if let Some(ref v) = filter.type_id {
            cond.push(v.as_str(), |n| format!("e.type_id = ?{n}"));
        }
        if let Some(status) = filter.status {
            cond.push(status.as_str(), |n| format!("e.status = ?{n}"));
        }
        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            cond.push(contains_pattern(search), |n| {
                format!("e.search_text LIKE ?{n} ESCAPE '\\'")
            });
        }
        // Timestamps are stored as UTC RFC 3339 text, which sorts chronologically.
        if let Some(from) = filter.created_from {
            cond.push(from.to_rfc3339(), |n| format!("e.created_at >= ?{n}"));
        }
        if let Some(to) = filter.created_to {
            cond.push(to.to_rfc3339(), |n| format!("e.created_at <= ?{n}"));
        }
        if let Some(active) = filter.is_active {
            cond.push(i64::from(active), |n| format!("e.is_active = ?{n}"));
        }
        if let Some(ref v) = filter.author_id {
            cond.push(v.as_str(), |n| format!("e.author_id = ?{n}"));
        }
        cond.characteristics(&filter.characteristics);
        let Conditions {
            clauses: conditions,
            mut params,
        } = cond;

        let (owner_sql, owner_params) = owner_filter(actor, "e.author_id", params.len() + 1);
        params.extend(owner_params);

        let mut where_clause = if conditions.is_empty() {
            "WHERE 1 = 1".to_string()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        if !owner_sql.is_empty() {
            where_clause = format!("{where_clause} {owner_sql}");
        }
        let from = "FROM equipment e LEFT JOIN rooms r ON r.id = e.room_id";

        let total = self
            .db()
            .count_with(&format!("SELECT COUNT(*) {from} {where_clause}"), || {
                libsql::params_from_iter(params.clone())
            })
            .await?;

        let sql = format!(
            "SELECT {SELECT_COLS} {from} {where_clause}
             ORDER BY e.created_at DESC, e.rowid DESC LIMIT {} OFFSET {}",
            page.page_size,
            page.offset()
        );
        let mut rows = self
            .db()
            .query_with(&sql, || libsql::params_from_iter(params.clone()))
            .await?;
        let mut items = Vec::new();
        while let Some(row) = rows.next().await? {
            items.push(row_to_equipment(&row)?);
        }
        Ok(Paged {
            items,
            total,
            page: page.page,
            page_size: page.page_size,
        })
    }

    /// Visible equipment of a room grouped by type name. Types without items
    /// in the room do not appear.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown room.
    pub async fn equipment_by_room(
        &self,
        actor: &Actor,
        room_id: &str,
    ) -> Result<Vec<EquipmentGroup>, DatabaseError> {
        self.get_room(room_id).await?;
        let (owner_sql, owner_params) = owner_filter(actor, "e.author_id", 2);
        let mut params: Vec<libsql::Value> = vec![room_id.into()];
        params.extend(owner_params);
        let sql = format!(
            "SELECT {SELECT_COLS}, t.name FROM equipment e
             JOIN equipment_types t ON t.id = e.type_id
             WHERE e.room_id = ?1 {owner_sql}
             ORDER BY t.name, e.name"
        );
        let mut rows = self
            .db()
            .query_with(&sql, || libsql::params_from_iter(params.clone()))
            .await?;

        let mut groups: BTreeMap<String, Vec<Equipment>> = BTreeMap::new();
        while let Some(row) = rows.next().await? {
            let type_name = row.get::<String>(15)?;
            groups.entry(type_name).or_default().push(row_to_equipment(&row)?);
        }
        Ok(groups
            .into_iter()
            .map(|(name, items)| EquipmentGroup { name, items })
            .collect())
    }

    /// Items the actor authored, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn my_equipment(&self, actor: &Actor) -> Result<Vec<Equipment>, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(
                &format!(
                    "SELECT {SELECT_COLS} FROM equipment e WHERE e.author_id = ?1
                     ORDER BY e.created_at DESC, e.rowid DESC"
                ),
                || [actor.user_id.as_str()],
            )
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_equipment(&row)?);
        }
        Ok(out)
    }

    /// Label data for printing, in request order with repeats dropped.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty id list or an item without an
    /// inventory number, and `NotFound` or `PermissionDenied` for ids the
    /// actor cannot see.
    pub async fn equipment_labels(
        &self,
        actor: &Actor,
        ids: &[String],
    ) -> Result<Vec<EquipmentLabel>, DatabaseError> {
        if ids.is_empty() {
            return Err(DatabaseError::Validation("no equipment ids given".into()));
        }
        let mut seen = HashSet::new();
        let mut labels = Vec::with_capacity(ids.len());
        for id in ids.iter().filter(|id| seen.insert(id.as_str())) {
            let eq = self.get_equipment(actor, id).await?;
            let Some(payload) = eq.qr_payload else {
                return Err(DatabaseError::Validation(format!(
                    "{} ({}) has no inventory number and no label",
                    eq.name, eq.id
                )));
            };
            labels.push(EquipmentLabel {
                id: eq.id,
                uid: eq.uid,
                name: eq.name,
                inn: eq.inn,
                payload,
            });
        }
        tracing::debug!(count = labels.len(), "collected equipment labels");
        Ok(labels)
    }

    /// Human-readable location of an item.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the room lookup fails.
    pub async fn equipment_location(&self, eq: &Equipment) -> Result<String, DatabaseError> {
        let room_number = self.room_number(eq.room_id.as_deref()).await?;
        Ok(eq.location(room_number.as_deref()))
    }
}
