// 📤 CSV Export - the fixture tree flattened to one row per created entity

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::gateway::schema::{CardKind, OperationKind};
use crate::result::SeedsResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureRow {
    pub user_index: usize,
    pub user_id: String,
    pub account_kind: String,
    pub account_id: String,
    /// account | card | operation
    pub entity: String,
    /// Card or operation type; empty for accounts
    pub entity_kind: String,
    pub entity_id: String,
}

/// Rows in creation order: account, its cards, then its operations
pub fn rows(result: &SeedsResult) -> Vec<FixtureRow> {
    let mut rows = Vec::new();

    for (user_index, user) in result.users.iter().enumerate() {
        for (account_kind, account) in user.all_accounts() {
            let row = |entity: &str, entity_kind: &str, entity_id: &str| FixtureRow {
                user_index,
                user_id: user.user_id.clone(),
                account_kind: account_kind.as_str().to_string(),
                account_id: account.account_id.clone(),
                entity: entity.to_string(),
                entity_kind: entity_kind.to_string(),
                entity_id: entity_id.to_string(),
            };

            rows.push(row("account", "", &account.account_id));
            for card_id in &account.card_ids {
                rows.push(row("card", "ISSUED_WITH_ACCOUNT", card_id));
            }
            for (card_kind, label) in [(CardKind::Physical, "PHYSICAL"), (CardKind::Virtual, "VIRTUAL")] {
                for card in account.cards(card_kind) {
                    rows.push(row("card", label, &card.card_id));
                }
            }
            for kind in OperationKind::ALL {
                for op in account.operations(kind) {
                    rows.push(row("operation", kind.as_str(), &op.operation_id));
                }
            }
        }
    }

    rows
}

/// Write the flattened tree as CSV; returns the number of data rows
pub fn write_csv<W: Write>(result: &SeedsResult, writer: W) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let rows = rows(result);
    for row in &rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(rows.len())
}

pub fn export_csv<P: AsRef<Path>>(result: &SeedsResult, path: P) -> Result<usize> {
    let file = std::fs::File::create(path.as_ref())?;
    write_csv(result, file)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::{SeedAccountResult, SeedCardResult, SeedOperationResult, SeedUserResult};

    fn sample() -> SeedsResult {
        let mut account = SeedAccountResult::new("a-1".to_string(), vec!["c-1".to_string()]);
        account.virtual_cards.push(SeedCardResult {
            card_id: "v-1".to_string(),
        });
        account.top_up_operations.push(SeedOperationResult {
            operation_id: "op-1".to_string(),
        });

        let mut user = SeedUserResult::new("u-1".to_string());
        user.credit_card_accounts.push(account);
        user.deposit_accounts
            .push(SeedAccountResult::new("d-1".to_string(), vec![]));
        SeedsResult::new(vec![user])
    }

    #[test]
    fn test_rows_in_creation_order() {
        let rows = rows(&sample());
        let ids: Vec<&str> = rows.iter().map(|r| r.entity_id.as_str()).collect();
        assert_eq!(ids, vec!["a-1", "c-1", "v-1", "op-1", "d-1"]);
        assert_eq!(rows[3].entity_kind, "TOP_UP");
        assert_eq!(rows[4].account_kind, "DEPOSIT");
    }

    #[test]
    fn test_write_csv_with_header() {
        let mut buffer = Vec::new();
        let count = write_csv(&sample(), &mut buffer).unwrap();
        assert_eq!(count, 5);

        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "user_index,user_id,account_kind,account_id,entity,entity_kind,entity_id"
        );
        assert_eq!(lines.count(), 5);

        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let parsed: Vec<FixtureRow> = reader.deserialize().collect::<std::result::Result<_, _>>().unwrap();
        assert_eq!(parsed, rows(&sample()));
    }
}
