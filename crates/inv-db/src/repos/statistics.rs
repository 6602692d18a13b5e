//! Equipment distribution report.

use std::collections::BTreeMap;

use inv_core::enums::EquipmentStatus;
use inv_core::identity::Actor;
use inv_core::responses::{
    BucketStats, EquipmentStatistics, OverallStats, StatusBreakdown, StatusPercentage,
};

use crate::access::owner_filter;
use crate::error::DatabaseError;
use crate::helpers::parse_enum;
use crate::service::InventoryService;

impl InventoryService {
    /// Count visible equipment per status within buckets.
    ///
    /// `select` yields the bucket id and label as its first two columns;
    /// items for which the join finds no bucket are left out.
    async fn bucket_stats(
        &self,
        actor: &Actor,
        select: &str,
        joins: &str,
    ) -> Result<Vec<BucketStats>, DatabaseError> {
        let (owner_sql, owner_params) = owner_filter(actor, "e.author_id", 1);
        let sql = format!(
            "SELECT {select}, e.status, COUNT(*) FROM equipment e {joins}
             WHERE 1 = 1 {owner_sql}
             GROUP BY 1, 2, e.status"
        );
        let mut rows = self
            .db()
            .query_with(&sql, || libsql::params_from_iter(owner_params.clone()))
            .await?;

        let mut buckets: BTreeMap<String, BucketStats> = BTreeMap::new();
        while let Some(row) = rows.next().await? {
            let id = row.get::<String>(0)?;
            let label = row.get::<String>(1)?;
            let status: EquipmentStatus = parse_enum(&row.get::<String>(2)?)?;
            let n = u64::try_from(row.get::<i64>(3)?).unwrap_or(0);
            let bucket = buckets.entry(id.clone()).or_insert_with(|| BucketStats {
                id,
                label,
                total_equipment: 0,
                status_breakdown: StatusBreakdown::default(),
            });
            bucket.total_equipment += n;
            bucket.status_breakdown.add(status, n);
        }
        let mut out: Vec<BucketStats> = buckets.into_values().collect();
        out.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.id.cmp(&b.id)));
        Ok(out)
    }

    /// Status distribution of the equipment visible to `actor`, overall and
    /// per type, building, floor and room. Items without a room only count
    /// toward the overall and per-type figures.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a query fails.
    pub async fn equipment_statistics(&self, actor: &Actor) -> Result<EquipmentStatistics, DatabaseError> {
        let equipment_by_type = self
            .bucket_stats(
                actor,
                "t.id, t.name",
                "JOIN equipment_types t ON t.id = e.type_id",
            )
            .await?;
        let building_stats = self
            .bucket_stats(
                actor,
                "b.id, b.name",
                "JOIN rooms r ON r.id = e.room_id JOIN buildings b ON b.id = r.building_id",
            )
            .await?;
        let floor_stats = self
            .bucket_stats(
                actor,
                "f.id, b.name || ' / floor ' || f.number",
                "JOIN rooms r ON r.id = e.room_id JOIN floors f ON f.id = r.floor_id
                 JOIN buildings b ON b.id = f.building_id",
            )
            .await?;
        let room_stats = self
            .bucket_stats(
                actor,
                "r.id, b.name || ' / ' || r.number",
                "JOIN rooms r ON r.id = e.room_id JOIN buildings b ON b.id = r.building_id",
            )
            .await?;

        let mut status_breakdown = StatusBreakdown::default();
        for bucket in &equipment_by_type {
            let b = &bucket.status_breakdown;
            status_breakdown.add(EquipmentStatus::New, b.new);
            status_breakdown.add(EquipmentStatus::Working, b.working);
            status_breakdown.add(EquipmentStatus::NeedsRepair, b.needs_repair);
            status_breakdown.add(EquipmentStatus::Disposed, b.disposed);
        }
        let overall_stats = OverallStats {
            total_equipment: status_breakdown.total(),
            status_percentage: StatusPercentage::from(&status_breakdown),
            status_breakdown,
        };

        Ok(EquipmentStatistics {
            overall_stats,
            equipment_by_type,
            building_stats,
            floor_stats,
            room_stats,
        })
    }
}
