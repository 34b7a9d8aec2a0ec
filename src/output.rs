//! Stdout formatter: the exact machine-readable contract from spec.md §6.
//! No ANSI colour — this stream is graded line-for-line, see DESIGN.md for
//! the dependency-drop rationale.
use std::io::Write;

use crate::domain::{CityRegistry, CostMatrix};
use crate::tour::TourState;

/// Writes the total cost followed by one `<from> <to> <day> <price>` line
/// per leg, in day order.
pub fn print_solution<W: Write>(
    mut out: W,
    registry: &CityRegistry,
    tour: &TourState,
    matrix: &CostMatrix,
    total_cost: u32,
) -> std::io::Result<()> {
    writeln!(out, "{}", total_cost)?;
    for (from, to, day, price) in tour.legs(matrix) {
        writeln!(
            out,
            "{} {} {} {}",
            registry.lookup(from),
            registry.lookup(to),
            day + 1,
            price
        )?;
    }
    Ok(())
}
