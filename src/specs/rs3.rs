// src/specs/rs3.rs
//! RuneScape 3 ranking (`/ranking?category_type=0&table=0&page=N`).
//!
//! The whole page is a single table inside `div.tableWrap`. Every cell wraps
//! its text in a link, and the name cell also carries an avatar image:
//! ```text
//! <div class="tableWrap"><table><tbody>
//!   <tr><td class="col1 align"><a>1</a></td>
//!       <td class="col2 align"><a><img class="avatar"> Le Me</a></td>
//!       <td class="col3 align"><a>2,898</a></td>
//!       <td class="col4 align"><a>5,600,000,000</a></td></tr>
//! ```
//! The searched-for player's row is highlighted with `class="hover"` and the
//! page otherwise keeps its 25-row shape.

use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::{ListingStrategy, has_death_marker, text_of};
use crate::config::consts::PAGE_SIZE;
use crate::core::sanitize::parse_grouped_u32;
use crate::model::PlayerListing;

static ROW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.tableWrap table tbody tr").expect("static selector"));
static CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").expect("static selector"));

pub struct Rs3Listing;

impl ListingStrategy for Rs3Listing {
    fn page_size(&self) -> u32 {
        PAGE_SIZE
    }

    fn extract(&self, doc: &Html) -> Option<Vec<PlayerListing>> {
        let mut out = Vec::with_capacity(PAGE_SIZE as usize);

        for row in doc.select(&ROW) {
            let cells: Vec<_> = row.select(&CELL).collect();
            if cells.is_empty() {
                continue; // header rows use <th>
            }
            if cells.len() < 2 {
                log::warn!("rs3 listing: row with {} cells", cells.len());
                return None;
            }

            let rank = parse_grouped_u32(&text_of(cells[0])).filter(|r| *r > 0)?;
            let name = text_of(cells[1]);
            if name.is_empty() {
                return None;
            }
            out.push(PlayerListing { name, rank, dead: has_death_marker(row) });
        }

        if out.is_empty() { None } else { Some(out) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(rows: &str) -> Html {
        Html::parse_document(&format!(
            r#"<html><body><div class="tableWrap"><table><thead><tr><th>Rank</th><th>Name</th></tr></thead>
               <tbody>{rows}</tbody></table></div></body></html>"#
        ))
    }

    #[test]
    fn avatar_does_not_leak_into_name() {
        let doc = page(
            r#"<tr><td class="col1"><a>26</a></td>
                   <td class="col2"><a><img class="avatar" src="/a.png" alt=""> Le&nbsp;Me</a></td>
                   <td><a>2,898</a></td><td><a>5,600,000,000</a></td></tr>"#,
        );
        let rows = Rs3Listing.extract(&doc).unwrap();
        assert_eq!(rows, vec![PlayerListing::new("Le Me", 26)]);
    }

    #[test]
    fn header_only_table_is_none() {
        assert!(Rs3Listing.extract(&page("")).is_none());
    }

    #[test]
    fn dead_row_class_counts() {
        let doc = page(r#"<tr class="dead"><td><a>3</a></td><td><a>Gone</a></td></tr>"#);
        assert!(Rs3Listing.extract(&doc).unwrap()[0].dead);
    }
}
