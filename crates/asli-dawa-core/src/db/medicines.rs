//! Medicine database operations.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{MedicineRecord, NameCacheEntry};
use crate::search::SearchPattern;

const MEDICINE_COLUMNS: &str = r#"
    id, name, price, is_discontinued, manufacturer_name, type, pack_size_label,
    short_composition1, short_composition2, uses, side_effects, substitutes,
    chemical_class, habit_forming, therapeutic_class, action_class
"#;

impl Database {
    /// Insert a new medicine record. The name is stored trimmed.
    pub fn insert_medicine(&self, medicine: &MedicineRecord) -> DbResult<()> {
        insert_row(&self.conn, medicine)
    }

    /// Insert several medicine records in one transaction.
    pub fn insert_medicines(&mut self, medicines: &[MedicineRecord]) -> DbResult<()> {
        let tx = self.conn.transaction()?;
        for medicine in medicines {
            insert_row(&tx, medicine)?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Replace every field of an existing record, keyed by id. The name is
    /// stored trimmed.
    pub fn update_medicine(&self, medicine: &MedicineRecord) -> DbResult<()> {
        let uses_json = serde_json::to_string(&medicine.uses)?;
        let side_effects_json = serde_json::to_string(&medicine.side_effects)?;
        let substitutes_json = serde_json::to_string(&medicine.substitutes)?;

        let rows_affected = self.conn.execute(
            r#"
            UPDATE medicines SET
                name = ?2, price = ?3, is_discontinued = ?4, manufacturer_name = ?5,
                type = ?6, pack_size_label = ?7, short_composition1 = ?8,
                short_composition2 = ?9, uses = ?10, side_effects = ?11, substitutes = ?12,
                chemical_class = ?13, habit_forming = ?14, therapeutic_class = ?15,
                action_class = ?16, updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                medicine.id,
                medicine.name.trim(),
                medicine.price,
                medicine.is_discontinued,
                medicine.manufacturer_name,
                medicine.medicine_type,
                medicine.pack_size_label,
                medicine.short_composition1,
                medicine.short_composition2,
                uses_json,
                side_effects_json,
                substitutes_json,
                medicine.chemical_class,
                medicine.habit_forming,
                medicine.therapeutic_class,
                medicine.action_class,
            ],
        )?;

        if rows_affected == 0 {
            return Err(DbError::NotFound(medicine.id.clone()));
        }
        Ok(())
    }

    /// Delete a medicine record.
    pub fn delete_medicine(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM medicines WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }

    /// Get a medicine by id.
    pub fn get_medicine(&self, id: &str) -> DbResult<Option<MedicineRecord>> {
        let sql = format!("SELECT {MEDICINE_COLUMNS} FROM medicines WHERE id = ?");
        let row = self
            .conn
            .query_row(&sql, [id], MedicineRow::from_row)
            .optional()?;

        row.map(|r| r.try_into()).transpose()
    }

    /// Medicines whose name matches the pattern, in insertion order.
    pub fn find_medicines_by_name(&self, pattern: &SearchPattern) -> DbResult<Vec<MedicineRecord>> {
        let sql = format!(
            "SELECT {MEDICINE_COLUMNS} FROM medicines WHERE name REGEXP ?1 ORDER BY rowid"
        );
        self.query_medicines(&sql, &pattern.contains())
    }

    /// Medicines with at least one use matching the pattern, in insertion order.
    pub fn find_medicines_by_use(&self, pattern: &SearchPattern) -> DbResult<Vec<MedicineRecord>> {
        let sql = format!(
            r#"
            SELECT {MEDICINE_COLUMNS} FROM medicines
            WHERE EXISTS (
                SELECT 1 FROM json_each(medicines.uses) AS u WHERE u.value REGEXP ?1
            )
            ORDER BY rowid
            "#
        );
        self.query_medicines(&sql, &pattern.contains())
    }

    /// First medicine whose whole name equals the pattern, ignoring case.
    pub fn find_medicine_by_exact_name(
        &self,
        pattern: &SearchPattern,
    ) -> DbResult<Option<MedicineRecord>> {
        let sql = format!(
            "SELECT {MEDICINE_COLUMNS} FROM medicines WHERE name REGEXP ?1 ORDER BY rowid LIMIT 1"
        );
        let row = self
            .conn
            .query_row(&sql, [pattern.whole()], MedicineRow::from_row)
            .optional()?;

        row.map(|r| r.try_into()).transpose()
    }

    /// Project `(id, name)` for every stored medicine.
    pub fn list_medicine_names(&self) -> DbResult<Vec<NameCacheEntry>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM medicines ORDER BY rowid")?;
        let rows = stmt.query_map([], |row| {
            Ok(NameCacheEntry {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;

        let mut names = Vec::new();
        for row in rows {
            names.push(row?);
        }
        Ok(names)
    }

    /// Total number of medicines.
    pub fn count_medicines(&self) -> DbResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM medicines", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Number of discontinued (counterfeit) medicines.
    pub fn count_counterfeit(&self) -> DbResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM medicines WHERE is_discontinued = 1",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn query_medicines(&self, sql: &str, pattern: &str) -> DbResult<Vec<MedicineRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([pattern], MedicineRow::from_row)?;

        let mut medicines = Vec::new();
        for row in rows {
            medicines.push(MedicineRecord::try_from(row?)?);
        }
        Ok(medicines)
    }
}

fn insert_row(conn: &Connection, medicine: &MedicineRecord) -> DbResult<()> {
    let uses_json = serde_json::to_string(&medicine.uses)?;
    let side_effects_json = serde_json::to_string(&medicine.side_effects)?;
    let substitutes_json = serde_json::to_string(&medicine.substitutes)?;

    conn.execute(
        r#"
        INSERT INTO medicines (
            id, name, price, is_discontinued, manufacturer_name, type, pack_size_label,
            short_composition1, short_composition2, uses, side_effects, substitutes,
            chemical_class, habit_forming, therapeutic_class, action_class
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
        "#,
        params![
            medicine.id,
            medicine.name.trim(),
            medicine.price,
            medicine.is_discontinued,
            medicine.manufacturer_name,
            medicine.medicine_type,
            medicine.pack_size_label,
            medicine.short_composition1,
            medicine.short_composition2,
            uses_json,
            side_effects_json,
            substitutes_json,
            medicine.chemical_class,
            medicine.habit_forming,
            medicine.therapeutic_class,
            medicine.action_class,
        ],
    )?;
    Ok(())
}

/// Intermediate row struct for database mapping.
struct MedicineRow {
    id: String,
    name: String,
    price: Option<f64>,
    is_discontinued: bool,
    manufacturer_name: Option<String>,
    medicine_type: Option<String>,
    pack_size_label: Option<String>,
    short_composition1: Option<String>,
    short_composition2: Option<String>,
    uses: String,
    side_effects: String,
    substitutes: String,
    chemical_class: Option<String>,
    habit_forming: Option<String>,
    therapeutic_class: Option<String>,
    action_class: Option<String>,
}

impl MedicineRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            price: row.get(2)?,
            is_discontinued: row.get(3)?,
            manufacturer_name: row.get(4)?,
            medicine_type: row.get(5)?,
            pack_size_label: row.get(6)?,
            short_composition1: row.get(7)?,
            short_composition2: row.get(8)?,
            uses: row.get(9)?,
            side_effects: row.get(10)?,
            substitutes: row.get(11)?,
            chemical_class: row.get(12)?,
            habit_forming: row.get(13)?,
            therapeutic_class: row.get(14)?,
            action_class: row.get(15)?,
        })
    }
}

impl TryFrom<MedicineRow> for MedicineRecord {
    type Error = DbError;

    fn try_from(row: MedicineRow) -> Result<Self, Self::Error> {
        Ok(MedicineRecord {
            id: row.id,
            name: row.name,
            price: row.price,
            is_discontinued: row.is_discontinued,
            manufacturer_name: row.manufacturer_name,
            medicine_type: row.medicine_type,
            pack_size_label: row.pack_size_label,
            short_composition1: row.short_composition1,
            short_composition2: row.short_composition2,
            uses: serde_json::from_str(&row.uses)?,
            side_effects: serde_json::from_str(&row.side_effects)?,
            substitutes: serde_json::from_str(&row.substitutes)?,
            chemical_class: row.chemical_class,
            habit_forming: row.habit_forming,
            therapeutic_class: row.therapeutic_class,
            action_class: row.action_class,
        })
    }
}
