use std::fmt::{Display, Formatter};

use ::scraper::{ElementRef, Html, Selector};
use regex::Regex;
use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::model::{PlayerList, PlayerRecord};
use crate::scraper::{element_text, normalize_link, select_text};

const TABLE_BODY_SELECTOR: &str = "table.SortTable_table__jnnJk tbody.SortTable_tbody__VrcrZ";
const ROW_SELECTOR: &str = "tr.SortTable_tr__L9yVC";
const SECTION_CELL_SELECTOR: &str = "td.SortTable_tsection__ub5LU";
const CELL_SELECTOR: &str = "td.SortTable_trow__T6wLH";
const PLAYER_LINK_SELECTOR: &str = "div.Roster_player__e6EbP a.TextLink_link__RhSiC";
const TEXT_LINK_SELECTOR: &str = "a.TextLink_link__RhSiC";

/// Rows with fewer cells than this are footers or spacers, never players.
pub(crate) const MIN_CELLS: usize = 10;

// Column layout: [_, number, _, name, age, birth year, birthplace, height, weight, shoots]
const NUMBER: usize = 1;
const NAME: usize = 3;
const AGE: usize = 4;
const BIRTH_YEAR: usize = 5;
const BIRTHPLACE: usize = 6;
const HEIGHT: usize = 7;
const WEIGHT: usize = 8;
const SHOOTS: usize = 9;

const POSITION_SUFFIX_PATTERN: &str = r"\s*\(([A-Z/]+)\)$";
const YEAR_PATTERN: &str = r"\d{4}";

/// What happened to a single table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RowOutcome {
    Player(PlayerRecord),
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SkipReason {
    TooFewCells { found: usize },
    MissingCell { column: usize },
    /// Season totals such as `NCAA` or `TOTAL` rows on recruiting pages.
    SummaryRow { label: String },
    EmptyName,
    NumericName { name: String },
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::TooFewCells { found } => {
                write!(f, "expected at least {MIN_CELLS} cells, found {found}")
            }
            SkipReason::MissingCell { column } => write!(f, "missing cell in column {column}"),
            SkipReason::SummaryRow { label } => write!(f, "statistics row {label:?}"),
            SkipReason::EmptyName => write!(f, "row without a player name"),
            SkipReason::NumericName { name } => write!(f, "numeric player name {name:?}"),
        }
    }
}

struct RosterSelectors {
    body: Selector,
    row: Selector,
    section_cell: Selector,
    cell: Selector,
    player_link: Selector,
    text_link: Selector,
    span: Selector,
    position_suffix: Regex,
    year: Regex,
}

impl RosterSelectors {
    fn new() -> Result<Self> {
        Ok(Self {
            body: Selector::parse(TABLE_BODY_SELECTOR)?,
            row: Selector::parse(ROW_SELECTOR)?,
            section_cell: Selector::parse(SECTION_CELL_SELECTOR)?,
            cell: Selector::parse(CELL_SELECTOR)?,
            player_link: Selector::parse(PLAYER_LINK_SELECTOR)?,
            text_link: Selector::parse(TEXT_LINK_SELECTOR)?,
            span: Selector::parse("span")?,
            position_suffix: Regex::new(POSITION_SUFFIX_PATTERN)?,
            year: Regex::new(YEAR_PATTERN)?,
        })
    }

    /// Split `"John Smith (D)"` into `("John Smith", "D")`. Text without a
    /// trailing position keeps an empty position.
    fn split_position(&self, text: &str) -> (String, String) {
        match self.position_suffix.captures(text) {
            Some(caps) => {
                let start = caps.get(0).map_or(text.len(), |m| m.start());
                let position = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
                (text[..start].trim().to_string(), position.to_string())
            }
            None => (text.trim().to_string(), String::new()),
        }
    }

    /// The birth year cell usually wraps the full date in a `title` attribute.
    /// When it does, the first four-digit run of that date is the year;
    /// otherwise the visible cell text is used as-is.
    fn birth_year(&self, cell: &ElementRef) -> String {
        let title = cell
            .select(&self.span)
            .next()
            .and_then(|s| s.value().attr("title"));
        match title {
            Some(title) => match self.year.find(title) {
                Some(year) => year.as_str().to_string(),
                None if title.is_empty() => String::new(),
                None => element_text(cell),
            },
            None => element_text(cell),
        }
    }
}

/// Extract every player row from a roster page. A page without a roster
/// table yields an empty list.
pub(crate) fn parse_roster(document: &Html, origin: &str) -> Result<PlayerList> {
    let outcomes = parse_rows(document, origin)?;
    let total = outcomes.len();

    let players: PlayerList = outcomes
        .into_iter()
        .filter_map(|outcome| match outcome {
            RowOutcome::Player(player) => Some(player),
            RowOutcome::Skipped(reason @ SkipReason::TooFewCells { .. }) => {
                trace!(%reason, "skipping row");
                None
            }
            RowOutcome::Skipped(reason @ SkipReason::MissingCell { .. }) => {
                warn!(%reason, "skipping malformed row");
                None
            }
            RowOutcome::Skipped(reason) => {
                debug!(%reason, "skipping row");
                None
            }
        })
        .collect();

    debug!(rows = total, count = players.len(), "parsed roster table");
    Ok(players)
}

fn parse_rows(document: &Html, origin: &str) -> Result<Vec<RowOutcome>> {
    let selectors = RosterSelectors::new()?;
    let outcomes = document
        .select(&selectors.body)
        .flat_map(|body| body.select(&selectors.row))
        .filter(|row| row.select(&selectors.section_cell).next().is_none())
        .map(|row| parse_row(&row, &selectors, origin))
        .collect();
    Ok(outcomes)
}

fn parse_row(row: &ElementRef, selectors: &RosterSelectors, origin: &str) -> RowOutcome {
    let cells: Vec<ElementRef> = row.select(&selectors.cell).collect();
    if cells.len() < MIN_CELLS {
        return RowOutcome::Skipped(SkipReason::TooFewCells { found: cells.len() });
    }
    match extract_player(&cells, selectors, origin) {
        Ok(player) => RowOutcome::Player(player),
        Err(reason) => RowOutcome::Skipped(reason),
    }
}

fn extract_player(
    cells: &[ElementRef],
    selectors: &RosterSelectors,
    origin: &str,
) -> std::result::Result<PlayerRecord, SkipReason> {
    let text_at = |column| cell(cells, column).map(|c| element_text(&c));

    let number = text_at(NUMBER)?;
    let upper = number.to_uppercase();
    if upper == "NCAA" || upper.starts_with("TOTAL") {
        return Err(SkipReason::SummaryRow { label: number });
    }

    let name_cell = cell(cells, NAME)?;
    let (name, position, player_link) = match name_cell.select(&selectors.player_link).next() {
        Some(anchor) => {
            let (name, position) = selectors.split_position(&element_text(&anchor));
            let player_link = anchor
                .value()
                .attr("href")
                .map(|href| normalize_link(href, origin))
                .unwrap_or_default();
            (name, position, player_link)
        }
        None => (element_text(&name_cell), String::new(), String::new()),
    };
    if name.is_empty() {
        return Err(SkipReason::EmptyName);
    }
    if name.chars().all(|c| c.is_ascii_digit()) {
        return Err(SkipReason::NumericName { name });
    }

    let birthplace_cell = cell(cells, BIRTHPLACE)?;
    let birthplace = select_text(&birthplace_cell, &selectors.text_link)
        .unwrap_or_else(|| element_text(&birthplace_cell));

    Ok(PlayerRecord {
        number,
        name,
        position,
        age: text_at(AGE)?,
        birth_year: selectors.birth_year(&cell(cells, BIRTH_YEAR)?),
        birthplace,
        height: text_at(HEIGHT)?,
        weight: text_at(WEIGHT)?,
        shoots: text_at(SHOOTS)?,
        player_link,
    })
}

fn cell<'a>(cells: &[ElementRef<'a>], column: usize) -> std::result::Result<ElementRef<'a>, SkipReason> {
    cells
        .get(column)
        .copied()
        .ok_or(SkipReason::MissingCell { column })
}
