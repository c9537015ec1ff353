use client_core::BookRow;
use shared::{domain::Genre, navigation::NavItem};

/// Left-aligned plain-text table; columns are sized to their widest cell.
fn table(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}", width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let headers: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let mut out = vec![line(headers.as_slice()), line(separator.as_slice())];
    out.extend(rows.iter().map(|row| line(row.as_slice())));
    out.join("\n")
}

pub fn books_table(rows: &[BookRow]) -> String {
    if rows.is_empty() {
        return "No books yet.".to_string();
    }
    table(
        &["ID", "TITLE", "AUTHOR", "GENRE", "COVER"],
        rows.iter()
            .map(|row| {
                vec![
                    row.id.to_string(),
                    row.title.clone(),
                    row.author.clone(),
                    row.genre_name.clone(),
                    row.cover_image_url.clone().unwrap_or_default(),
                ]
            })
            .collect(),
    )
}

pub fn genres_table(genres: &[Genre]) -> String {
    if genres.is_empty() {
        return "No genres.".to_string();
    }
    table(
        &["ID", "NAME"],
        genres
            .iter()
            .map(|genre| vec![genre.id.to_string(), genre.name.clone()])
            .collect(),
    )
}

pub fn nav_table(items: &[NavItem]) -> String {
    table(
        &["NAME", "HREF", "ICON", "BADGE"],
        items
            .iter()
            .map(|item| {
                vec![
                    item.name.to_string(),
                    item.href.to_string(),
                    item.icon.to_string(),
                    item.badge.map(|b| b.to_string()).unwrap_or_default(),
                ]
            })
            .collect(),
    )
}
