use crate::board::{Column, ColumnVisibility};
use crate::models::Gig;

const ARTIST_CELL_LIMIT: usize = 20;
const MISSING: &str = "N/A";

pub fn truncate_artist(artist: &str) -> String {
    if artist.chars().count() > ARTIST_CELL_LIMIT {
        let cut: String = artist.chars().take(ARTIST_CELL_LIMIT).collect();
        format!("{cut}...")
    } else {
        artist.to_string()
    }
}

pub fn added_by(gig: &Gig) -> String {
    gig.added
        .as_ref()
        .map(|person| person.name.clone())
        .unwrap_or_else(|| MISSING.to_string())
}

pub fn interested(gig: &Gig) -> String {
    match &gig.interested {
        Some(_) => gig.interested_names().join(", "),
        None => MISSING.to_string(),
    }
}

pub fn cell(gig: &Gig, column: Column) -> String {
    match column {
        Column::Day => gig.day.clone(),
        Column::Date => gig.date.clone(),
        Column::Artist => truncate_artist(&gig.artist),
        Column::Type => gig.types.join(", "),
        Column::Venue => gig.venue.clone(),
        Column::Location => gig.location.clone(),
        Column::Added => added_by(gig),
        Column::Interested => interested(gig),
    }
}

/// Plain text table of the visible columns, padded to the widest cell.
/// The id column is always first so rows can be referred to.
pub fn table(gigs: &[&Gig], columns: &ColumnVisibility) -> String {
    let visible = columns.visible();
    let mut header = vec!["Id".to_string()];
    header.extend(visible.iter().map(|column| column.title().to_string()));

    let rows: Vec<Vec<String>> = gigs
        .iter()
        .map(|gig| {
            let mut row = vec![gig.id.to_string()];
            row.extend(visible.iter().map(|column| cell(gig, *column)));
            row
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, value) in widths.iter_mut().zip(row) {
            *width = (*width).max(value.chars().count());
        }
    }

    let format_row = |row: &[String]| {
        row.iter()
            .zip(&widths)
            .map(|(value, &width)| format!("{value:<width$}"))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![format_row(header.as_slice())];
    out.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    out.extend(rows.iter().map(|row| format_row(row.as_slice())));
    out.join("\n")
}

pub fn detail(gig: &Gig) -> String {
    [
        gig.artist.clone(),
        format!("Date: {}", gig.date),
        format!("Type: {}", gig.types.join(", ")),
        format!("Venue: {}", gig.venue),
        format!("Location: {}", gig.location),
        format!("Added By: {}", added_by(gig)),
        format!("Interested: {}", interested(gig)),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GigId, Person};

    fn gig() -> Gig {
        Gig {
            id: GigId::Number(3),
            day: "S".to_string(),
            date: "2024-06-15".to_string(),
            artist: "A Very Long Artist Name Indeed".to_string(),
            types: vec!["Gig".to_string(), "Club".to_string()],
            venue: "V1".to_string(),
            location: "City".to_string(),
            added: None,
            interested: Some(vec![
                Person {
                    name: "Ana".to_string(),
                },
                Person {
                    name: "Bo".to_string(),
                },
            ]),
        }
    }

    #[test]
    fn long_artists_are_cut_at_twenty_chars() {
        assert_eq!(
            truncate_artist("A Very Long Artist Name Indeed"),
            "A Very Long Artist N..."
        );
        assert_eq!(truncate_artist("Exactly twenty chars"), "Exactly twenty chars");
    }

    #[test]
    fn cells_use_placeholders_for_missing_people() {
        let mut gig = gig();
        assert_eq!(cell(&gig, Column::Added), "N/A");
        assert_eq!(cell(&gig, Column::Interested), "Ana, Bo");
        assert_eq!(cell(&gig, Column::Type), "Gig, Club");
        gig.interested = None;
        gig.added = Some(Person {
            name: "Sam".to_string(),
        });
        assert_eq!(cell(&gig, Column::Interested), "N/A");
        assert_eq!(cell(&gig, Column::Added), "Sam");
    }

    #[test]
    fn table_only_shows_visible_columns() {
        let gig = gig();
        let mut columns = ColumnVisibility::default();
        columns.hide(Column::Venue);
        columns.hide(Column::Location);
        let text = table(&[&gig], &columns);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Id | Day | Date"));
        assert!(!lines[0].contains("Venue"));
        assert!(lines[2].contains("A Very Long Artist N..."));
        assert!(lines[2].ends_with("Ana, Bo"));
    }

    #[test]
    fn detail_lists_every_field() {
        let text = detail(&gig());
        assert!(text.starts_with("A Very Long Artist Name Indeed\n"));
        assert!(text.contains("Added By: N/A"));
        assert!(text.contains("Interested: Ana, Bo"));
    }
}
