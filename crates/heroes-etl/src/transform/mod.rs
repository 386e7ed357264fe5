//! Row-to-document reshaping
//!
//! Pure functions from the source table shape to the destination document
//! shape. No I/O happens here; the only ambient input is the calendar date,
//! computed once per invocation so every document of a batch carries the
//! same migration stamp.

use chrono::NaiveDate;
use heroes_common::types::{Attributes, CharacterRow, HeroDocument, PhysicalAttributes};

/// Reshape source rows into destination documents.
///
/// Missing appearance counts become 0, nested groupings collect related
/// traits, and input order is preserved. The migration date is today's
/// calendar date, stamped identically on every document of the batch.
pub fn transform_rows(rows: &[CharacterRow]) -> Vec<HeroDocument> {
    transform_rows_with_date(rows, chrono::Local::now().date_naive())
}

/// Reshape with an explicit migration date.
///
/// Split out from [`transform_rows`] so the date can be pinned in tests.
pub fn transform_rows_with_date(rows: &[CharacterRow], date: NaiveDate) -> Vec<HeroDocument> {
    let date_migrated = date.format("%Y-%m-%d").to_string();

    rows.iter()
        .map(|row| HeroDocument {
            id: row.id,
            name: row.name.clone(),
            attributes: Attributes {
                identity: row.identity.clone(),
                alignment: row.alignment.clone(),
                status: row.status.clone(),
            },
            physical_attributes: PhysicalAttributes {
                eye_color: row.eye_color.clone(),
                hair_color: row.hair_color.clone(),
                gender: row.gender.clone(),
            },
            appearances_count: row.appearances.unwrap_or(0),
            year: row.year,
            universe: row.universe.clone(),
            date_migrated: date_migrated.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spider_man() -> CharacterRow {
        CharacterRow {
            id: 1,
            name: "Spider-Man".to_string(),
            identity: "Secret".to_string(),
            alignment: "Good".to_string(),
            status: "Alive".to_string(),
            eye_color: "Hazel".to_string(),
            hair_color: "Brown".to_string(),
            gender: "Male".to_string(),
            appearances: None,
            year: Some(1962),
            universe: "Marvel".to_string(),
        }
    }

    fn batman() -> CharacterRow {
        CharacterRow {
            id: 2,
            name: "Batman".to_string(),
            identity: "Secret".to_string(),
            alignment: "Good".to_string(),
            status: "Alive".to_string(),
            eye_color: "Blue".to_string(),
            hair_color: "Black".to_string(),
            gender: "Male".to_string(),
            appearances: Some(3093),
            year: Some(1939),
            universe: "DC".to_string(),
        }
    }

    #[test]
    fn test_known_row_field_mapping() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 18).unwrap();
        let documents = transform_rows_with_date(&[spider_man()], date);

        assert_eq!(documents.len(), 1);
        let doc = &documents[0];
        assert_eq!(doc.id, 1);
        assert_eq!(doc.name, "Spider-Man");
        assert_eq!(doc.attributes.identity, "Secret");
        assert_eq!(doc.attributes.alignment, "Good");
        assert_eq!(doc.attributes.status, "Alive");
        assert_eq!(doc.physical_attributes.eye_color, "Hazel");
        assert_eq!(doc.physical_attributes.hair_color, "Brown");
        assert_eq!(doc.physical_attributes.gender, "Male");
        assert_eq!(doc.appearances_count, 0, "missing counts become 0, never null");
        assert_eq!(doc.year, Some(1962));
        assert_eq!(doc.universe, "Marvel");
        assert_eq!(doc.date_migrated, "2024-01-18");
    }

    #[test]
    fn test_batch_shares_one_migration_date() {
        let documents = transform_rows(&[spider_man(), batman(), spider_man()]);

        assert_eq!(documents.len(), 3);
        let first_date = &documents[0].date_migrated;
        assert!(documents.iter().all(|d| &d.date_migrated == first_date));
    }

    #[test]
    fn test_input_order_preserved() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 18).unwrap();
        let documents = transform_rows_with_date(&[batman(), spider_man()], date);

        assert_eq!(documents[0].id, 2);
        assert_eq!(documents[1].id, 1);
    }

    #[test]
    fn test_output_never_contains_first_appearance() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 18).unwrap();
        let documents = transform_rows_with_date(&[spider_man()], date);

        let value = serde_json::to_value(&documents[0]).unwrap();
        let keys: Vec<String> = value
            .as_object()
            .unwrap()
            .keys()
            .map(|k| k.to_lowercase())
            .collect();
        assert!(!keys.iter().any(|k| k.contains("firstappearance")));
    }

    #[test]
    fn test_empty_input_yields_empty_batch() {
        assert!(transform_rows(&[]).is_empty());
    }
}
