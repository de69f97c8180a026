//! SQLite-backed unit of work for element storage.
//!
//! # Responsibility
//! - Buffer insert/update/delete registrations for the `elements` table.
//! - Apply pending registrations atomically and capture assigned rowids.
//!
//! # Invariants
//! - The owned connection is never shared; dropping the unit of work
//!   closes it.
//! - Read paths reject invalid persisted state instead of masking it.

use super::{CommitSummary, ProvisionalId, UnitOfWork};
use crate::db::migrations::latest_version;
use crate::model::element::{Element, ElementId, ElementKind};
use crate::repo::element_repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row, Transaction};
use std::collections::HashMap;

const ELEMENT_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    kind,
    name,
    parent_id,
    size_bytes,
    created_at,
    updated_at
FROM elements";

const REQUIRED_COLUMNS: &[&str] = &[
    "id",
    "user_id",
    "kind",
    "name",
    "parent_id",
    "size_bytes",
    "created_at",
    "updated_at",
];

#[derive(Debug)]
enum Pending {
    Insert {
        provisional: ProvisionalId,
        element: Element,
    },
    Update(Element),
    Delete(ElementId),
}

/// Unit of work owning one migrated SQLite connection.
pub struct SqliteUnitOfWork {
    conn: Connection,
    pending: Vec<Pending>,
    next_provisional: u64,
    assigned: HashMap<ProvisionalId, ElementId>,
}

impl SqliteUnitOfWork {
    /// Wraps a migrated connection after readiness checks.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version does not match
    ///   this binary.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the
    ///   `elements` schema is incomplete.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        ensure_connection_ready(&conn)?;
        Ok(Self {
            conn,
            pending: Vec::new(),
            next_provisional: 0,
            assigned: HashMap::new(),
        })
    }
}

impl UnitOfWork<Element> for SqliteUnitOfWork {
    fn register_insert(&mut self, element: Element) -> RepoResult<ProvisionalId> {
        let provisional = ProvisionalId::new(self.next_provisional);
        self.next_provisional += 1;
        self.pending.push(Pending::Insert {
            provisional,
            element,
        });
        Ok(provisional)
    }

    fn register_update(&mut self, element: Element) -> RepoResult<()> {
        if element.id.is_none() {
            return Err(RepoError::NoIdentity);
        }
        self.pending.push(Pending::Update(element));
        Ok(())
    }

    fn register_delete(&mut self, id: ElementId) -> RepoResult<()> {
        self.pending.push(Pending::Delete(id));
        Ok(())
    }

    fn find(&self, id: ElementId) -> RepoResult<Option<Element>> {
        // Latest registration wins over stored state.
        for pending in self.pending.iter().rev() {
            match pending {
                Pending::Delete(pending_id) if *pending_id == id => return Ok(None),
                Pending::Update(element) if element.id == Some(id) => {
                    return Ok(Some(element.clone()));
                }
                _ => {}
            }
        }

        let mut stmt = self
            .conn
            .prepare(&format!("{ELEMENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_element_row(row)?));
        }

        Ok(None)
    }

    fn commit(&mut self) -> RepoResult<CommitSummary> {
        let tx = self.conn.transaction()?;
        let mut summary = CommitSummary::default();

        for pending in &self.pending {
            match pending {
                Pending::Insert {
                    provisional,
                    element,
                } => {
                    let id = insert_element(&tx, element)?;
                    summary.inserted.push((*provisional, id));
                }
                Pending::Update(element) => {
                    update_element(&tx, element)?;
                    summary.updated += 1;
                }
                Pending::Delete(id) => {
                    delete_element(&tx, *id)?;
                    summary.deleted += 1;
                }
            }
        }

        tx.commit()?;
        self.pending.clear();
        for (provisional, id) in &summary.inserted {
            self.assigned.insert(*provisional, *id);
        }

        Ok(summary)
    }

    fn assigned_id(&self, provisional: ProvisionalId) -> Option<ElementId> {
        self.assigned.get(&provisional).copied()
    }

    fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

fn insert_element(tx: &Transaction<'_>, element: &Element) -> RepoResult<ElementId> {
    tx.execute(
        "INSERT INTO elements (
            user_id,
            kind,
            name,
            parent_id,
            size_bytes,
            created_at,
            updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
        params![
            element.owner_id,
            kind_to_db(element.kind),
            element.name.as_str(),
            element.parent_id,
            element.size_bytes,
            element.created_at,
            element.updated_at,
        ],
    )?;
    Ok(tx.last_insert_rowid())
}

fn update_element(tx: &Transaction<'_>, element: &Element) -> RepoResult<()> {
    let id = element.id.ok_or(RepoError::NoIdentity)?;
    let changed = tx.execute(
        "UPDATE elements
         SET
            user_id = ?1,
            kind = ?2,
            name = ?3,
            parent_id = ?4,
            size_bytes = ?5,
            updated_at = (strftime('%s', 'now') * 1000)
         WHERE id = ?6;",
        params![
            element.owner_id,
            kind_to_db(element.kind),
            element.name.as_str(),
            element.parent_id,
            element.size_bytes,
            id,
        ],
    )?;

    if changed == 0 {
        return Err(RepoError::NotFound(id));
    }

    Ok(())
}

fn delete_element(tx: &Transaction<'_>, id: ElementId) -> RepoResult<()> {
    let changed = tx.execute("DELETE FROM elements WHERE id = ?1;", [id])?;

    if changed == 0 {
        return Err(RepoError::NotFound(id));
    }

    Ok(())
}

fn parse_element_row(row: &Row<'_>) -> RepoResult<Element> {
    let kind_text: String = row.get("kind")?;
    let kind = parse_kind(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid element kind `{kind_text}` in elements.kind"))
    })?;

    let element = Element {
        id: Some(row.get("id")?),
        owner_id: row.get("user_id")?,
        kind,
        name: row.get("name")?,
        parent_id: row.get("parent_id")?,
        size_bytes: row.get("size_bytes")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    element.validate()?;
    Ok(element)
}

fn kind_to_db(kind: ElementKind) -> &'static str {
    match kind {
        ElementKind::File => "file",
        ElementKind::Folder => "folder",
    }
}

fn parse_kind(value: &str) -> Option<ElementKind> {
    match value {
        "file" => Some(ElementKind::File),
        "folder" => Some(ElementKind::Folder),
        _ => None,
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "elements")? {
        return Err(RepoError::MissingRequiredTable("elements"));
    }

    for &column in REQUIRED_COLUMNS {
        if !table_has_column(conn, "elements", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "elements",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
