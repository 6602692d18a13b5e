//! Contract documents, scoped to their author.

use chrono::{NaiveDate, Utc};

use inv_core::entities::ContractDocument;
use inv_core::enums::{ActionType, EntityType, TrailOp};
use inv_core::identity::Actor;
use inv_core::ids::PREFIX_CONTRACT;

use crate::access::{owner_filter, require_owner};
use crate::error::{DatabaseError, not_found};
use crate::helpers::{contains_pattern, fold_search, get_opt_string, parse_datetime, parse_optional_date};
use crate::repos::action::NewAction;
use crate::service::InventoryService;
use crate::updates::SetClause;
use crate::updates::contract::ContractUpdate;

const SELECT_COLS: &str = "id, number, file, valid_until, author_id, created_at";

fn row_to_contract(row: &libsql::Row) -> Result<ContractDocument, DatabaseError> {
    Ok(ContractDocument {
        id: row.get::<String>(0)?,
        number: row.get::<String>(1)?,
        file: get_opt_string(row, 2)?,
        valid_until: parse_optional_date(get_opt_string(row, 3)?.as_deref())?,
        author_id: get_opt_string(row, 4)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

fn date_text(d: Option<NaiveDate>) -> Option<String> {
    d.map(|d| d.format("%Y-%m-%d").to_string())
}

impl InventoryService {
    /// # Errors
    ///
    /// Returns `Validation` for an empty number.
    pub async fn create_contract(
        &self,
        actor: &Actor,
        number: &str,
        file: Option<&str>,
        valid_until: Option<NaiveDate>,
    ) -> Result<ContractDocument, DatabaseError> {
        let number = number.trim();
        if number.is_empty() {
            return Err(DatabaseError::Validation("contract number must not be empty".into()));
        }
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_CONTRACT).await?;
        let valid = date_text(valid_until);
        self.db()
            .execute_with(
                "INSERT INTO contracts (id, number, file, valid_until, author_id, created_at, search_text)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                || {
                    libsql::params![
                        id.as_str(),
                        number,
                        file,
                        valid.as_deref(),
                        actor.user_id.as_str(),
                        now.to_rfc3339(),
                        fold_search([number])
                    ]
                },
            )
            .await?;

        let contract = ContractDocument {
            id,
            number: number.to_string(),
            file: file.map(String::from),
            valid_until,
            author_id: Some(actor.user_id.clone()),
            created_at: now,
        };
        self.record(
            actor,
            NewAction::new(ActionType::Create, format!("Created contract: {number}"))
                .on(EntityType::Contract, &contract.id),
            TrailOp::Create,
            &contract,
        )
        .await?;
        Ok(contract)
    }

    /// Fetch a contract visible to the actor.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown ids and `PermissionDenied` for another
    /// manager's contract.
    pub async fn get_contract(&self, actor: &Actor, id: &str) -> Result<ContractDocument, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(&format!("SELECT {SELECT_COLS} FROM contracts WHERE id = ?1"), || [id])
            .await?;
        let row = rows.next().await?.ok_or_else(|| not_found("contract", id))?;
        let contract = row_to_contract(&row)?;
        require_owner(actor, contract.author_id.as_deref(), "viewing this contract")?;
        Ok(contract)
    }

    /// Contracts visible to the actor, newest first, optionally filtered by
    /// a substring of the number.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_contracts(
        &self,
        actor: &Actor,
        search: Option<&str>,
    ) -> Result<Vec<ContractDocument>, DatabaseError> {
        let pattern = search.map(contains_pattern);
        let (owner_sql, owner_params) = owner_filter(actor, "author_id", 2);
        let mut params: Vec<libsql::Value> = vec![pattern.into()];
        params.extend(owner_params);
        let sql = format!(
            "SELECT {SELECT_COLS} FROM contracts
             WHERE (?1 IS NULL OR search_text LIKE ?1 ESCAPE '\\') {owner_sql}
             ORDER BY created_at DESC, rowid DESC"
        );
        let mut rows = self
            .db()
            .query_with(&sql, || libsql::params_from_iter(params.clone()))
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_contract(&row)?);
        }
        Ok(out)
    }

    /// # Errors
    ///
    /// Returns `NotFound`, `PermissionDenied` or `Validation` (empty number).
    pub async fn update_contract(
        &self,
        actor: &Actor,
        id: &str,
        update: ContractUpdate,
    ) -> Result<ContractDocument, DatabaseError> {
        let before = self.get_contract(actor, id).await?;
        let mut set = SetClause::default();
        if let Some(ref number) = update.number {
            if number.trim().is_empty() {
                return Err(DatabaseError::Validation("contract number must not be empty".into()));
            }
            set.push("number", number.trim());
            set.push("search_text", fold_search([number.trim()]));
        }
        if let Some(ref file) = update.file {
            set.push_opt("file", file.as_deref());
        }
        if let Some(valid_until) = update.valid_until {
            set.push_opt("valid_until", date_text(valid_until));
        }
        if set.is_empty() {
            return Ok(before);
        }
        let (sql, params) = set.into_sql("contracts", id);
        self.db()
            .execute_with(&sql, || libsql::params_from_iter(params.clone()))
            .await?;

        self.record(
            actor,
            NewAction::new(ActionType::Update, format!("Updated contract: {}", before.number))
                .on(EntityType::Contract, id),
            TrailOp::Update,
            &update,
        )
        .await?;
        self.get_contract(actor, id).await
    }

    /// Delete a contract. Equipment referencing it keeps existing without a
    /// contract.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `PermissionDenied`.
    pub async fn delete_contract(&self, actor: &Actor, id: &str) -> Result<(), DatabaseError> {
        let contract = self.get_contract(actor, id).await?;
        self.db()
            .execute_with("DELETE FROM contracts WHERE id = ?1", || [id])
            .await?;
        self.record(
            actor,
            NewAction::new(ActionType::Delete, format!("Deleted contract: {}", contract.number))
                .on(EntityType::Contract, id),
            TrailOp::Delete,
            &contract,
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::test_support::helpers::*;
    use crate::updates::contract::ContractUpdateBuilder;

    use super::*;

    #[tokio::test]
    async fn owner_scoped_listing() {
        let svc = test_service().await;
        let admin = admin(&svc).await;
        let m1 = manager(&svc, &admin, "m1").await;
        let m2 = manager(&svc, &admin, "m2").await;

        let c1 = svc.create_contract(&m1, "K-2024/01", None, None).await.unwrap();
        svc.create_contract(&m2, "K-2024/02", None, None).await.unwrap();

        let mine = svc.list_contracts(&m1, None).await.unwrap();
        assert_eq!(mine, vec![c1.clone()]);
        assert_eq!(svc.list_contracts(&admin, None).await.unwrap().len(), 2);
        assert_eq!(svc.list_contracts(&admin, Some("/02")).await.unwrap().len(), 1);
        assert_eq!(svc.list_contracts(&admin, Some("k-2024")).await.unwrap().len(), 2);
        assert!(svc.list_contracts(&admin, Some("K_2024")).await.unwrap().is_empty());

        assert!(matches!(
            svc.get_contract(&m2, &c1.id).await,
            Err(DatabaseError::PermissionDenied(_))
        ));
        assert!(svc.delete_contract(&m2, &c1.id).await.is_err());
    }

    #[tokio::test]
    async fn update_valid_until() {
        let svc = test_service().await;
        let admin = admin(&svc).await;
        let date = NaiveDate::from_ymd_opt(2027, 12, 31).unwrap();
        let c = svc
            .create_contract(&admin, "K-1", Some("k1.pdf"), Some(date))
            .await
            .unwrap();
        assert_eq!(svc.get_contract(&admin, &c.id).await.unwrap().valid_until, Some(date));

        let updated = svc
            .update_contract(
                &admin,
                &c.id,
                ContractUpdateBuilder::new().valid_until(None).file(None).build(),
            )
            .await
            .unwrap();
        assert_eq!(updated.valid_until, None);
        assert_eq!(updated.file, None);
    }

    #[tokio::test]
    async fn search_folds_cyrillic_after_renumbering() {
        let svc = test_service().await;
        let admin = admin(&svc).await;
        let c = svc.create_contract(&admin, "Договор-7", None, None).await.unwrap();
        assert_eq!(svc.list_contracts(&admin, Some("договор")).await.unwrap().len(), 1);

        svc.update_contract(&admin, &c.id, ContractUpdateBuilder::new().number("Поставка 12%").build())
            .await
            .unwrap();
        assert!(svc.list_contracts(&admin, Some("договор")).await.unwrap().is_empty());
        assert_eq!(svc.list_contracts(&admin, Some("ПОСТАВКА 12%")).await.unwrap().len(), 1);
        assert!(svc.list_contracts(&admin, Some("12_")).await.unwrap().is_empty());
    }
}
