use rusqlite::{params, Connection, OptionalExtension, Result};

use crate::domain::{Card, Difficulty};

pub fn insert_card(conn: &Connection, card: &Card) -> Result<i64> {
  conn.execute(
    "INSERT INTO cards (deck_id, question, answer, difficulty) VALUES (?1, ?2, ?3, ?4)",
    params![card.deck_id, card.question, card.answer, card.difficulty.as_str()],
  )?;
  Ok(conn.last_insert_rowid())
}

pub fn get_card_by_id(conn: &Connection, id: i64) -> Result<Option<Card>> {
  conn
    .query_row(
      "SELECT id, deck_id, question, answer, difficulty FROM cards WHERE id = ?1",
      params![id],
      row_to_card,
    )
    .optional()
}

/// Cards of a deck in creation order
pub fn list_cards_for_deck(conn: &Connection, deck_id: i64) -> Result<Vec<Card>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT id, deck_id, question, answer, difficulty
    FROM cards
    WHERE deck_id = ?1
    ORDER BY id ASC
    "#,
  )?;

  let cards = stmt
    .query_map(params![deck_id], row_to_card)?
    .collect::<Result<Vec<_>>>()?;
  Ok(cards)
}

pub fn count_cards_for_deck(conn: &Connection, deck_id: i64) -> Result<i64> {
  conn.query_row(
    "SELECT COUNT(*) FROM cards WHERE deck_id = ?1",
    params![deck_id],
    |row| row.get(0),
  )
}

/// Difficulty is only written here, by the answer evaluator
pub fn update_card_difficulty(conn: &Connection, card_id: i64, difficulty: Difficulty) -> Result<()> {
  conn.execute(
    "UPDATE cards SET difficulty = ?1 WHERE id = ?2",
    params![difficulty.as_str(), card_id],
  )?;
  Ok(())
}

pub(crate) fn row_to_card(row: &rusqlite::Row) -> Result<Card> {
  let difficulty_str: String = row.get(4)?;
  let difficulty = Difficulty::from_str(&difficulty_str).ok_or_else(|| {
    rusqlite::Error::FromSqlConversionFailure(
      4,
      rusqlite::types::Type::Text,
      format!("unknown difficulty {:?}", difficulty_str).into(),
    )
  })?;

  Ok(Card {
    id: row.get(0)?,
    deck_id: row.get(1)?,
    question: row.get(2)?,
    answer: row.get(3)?,
    difficulty,
  })
}
