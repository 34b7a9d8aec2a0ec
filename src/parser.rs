//! Stdin parser for the input protocol in spec.md §6, grounded on the
//! original's `parse_input_data`: a header line, one name+city-list line
//! pair per area, then trailing flight lines until EOF.
use std::io::BufRead;

use crate::domain::{Area, CityRegistry, CostMatrix};
use crate::error::ParseError;

/// Everything the driver needs: the interned city registry, the areas in
/// input order (area 0 is always the starting area), and the cost matrix.
pub struct Problem {
    pub registry: CityRegistry,
    pub areas: Vec<Area>,
    pub matrix: CostMatrix,
}

/// Parses the full stdin protocol from a buffered reader.
pub fn parse<R: BufRead>(reader: R) -> Result<Problem, ParseError> {
    let mut lines = reader.lines().map(|l| l.unwrap_or_default());

    let header = next_line(&mut lines, "area count and start city")?;
    let mut header_fields = header.split_whitespace();
    let area_count: usize = header_fields
        .next()
        .ok_or(ParseError::UnexpectedEof("area count"))?
        .parse()
        .map_err(|_| ParseError::BadInteger(header.clone()))?;
    let start_code_text = header_fields
        .next()
        .ok_or(ParseError::UnexpectedEof("start city code"))?;

    let mut registry = CityRegistry::new();
    let start_city = registry.intern(crate::domain::CityCode::parse(start_code_text)?);
    debug_assert_eq!(start_city, 0, "the start city is always interned first");

    let mut areas_in_order: Vec<Area> = Vec::with_capacity(area_count);
    let mut start_area_index: Option<usize> = None;
    let mut start_city_pos: usize = 0;

    for _ in 0..area_count {
        let _name = next_line(&mut lines, "area name")?;
        let city_line = next_line(&mut lines, "area city list")?;

        let cities: Vec<u16> = city_line
            .split_whitespace()
            .map(|token| {
                crate::domain::CityCode::parse(token).map(|code| registry.intern(code))
            })
            .collect::<Result<_, _>>()?;

        let start_pos = cities.iter().position(|&c| c == start_city);
        areas_in_order.push(Area::new(cities));

        if let Some(pos) = start_pos {
            if start_area_index.is_some() {
                return Err(ParseError::StartCityInMultipleAreas);
            }
            start_area_index = Some(areas_in_order.len() - 1);
            start_city_pos = pos;
        }
    }

    let start_area_index = start_area_index.ok_or(ParseError::StartCityMissing)?;
    areas_in_order[start_area_index].select(start_city_pos);
    areas_in_order.swap(0, start_area_index);

    let mut matrix = CostMatrix::new(registry.count(), area_count.max(1));

    for line in lines {
        let line = line;
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let from = fields.next().ok_or(ParseError::UnexpectedEof("flight source"))?;
        let to = fields.next().ok_or(ParseError::UnexpectedEof("flight destination"))?;
        let day: u16 = fields
            .next()
            .ok_or(ParseError::UnexpectedEof("flight day"))?
            .parse()
            .map_err(|_| ParseError::BadInteger(line.clone()))?;
        let price: u16 = fields
            .next()
            .ok_or(ParseError::UnexpectedEof("flight price"))?
            .parse()
            .map_err(|_| ParseError::BadInteger(line.clone()))?;

        let src = registry.intern(crate::domain::CityCode::parse(from)?);
        let dst = registry.intern(crate::domain::CityCode::parse(to)?);

        if day == 0 {
            matrix.set_every_day(src, dst, price);
        } else {
            matrix.set(src, dst, day - 1, price);
        }
    }

    Ok(Problem {
        registry,
        areas: areas_in_order,
        matrix,
    })
}

fn next_line(
    lines: &mut impl Iterator<Item = String>,
    what: &'static str,
) -> Result<String, ParseError> {
    lines.next().ok_or(ParseError::UnexpectedEof(what))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse_str(text: &str) -> Result<Problem, ParseError> {
        parse(Cursor::new(text.as_bytes()))
    }

    #[test]
    fn trivial_two_city_tour() {
        let problem = parse_str(
            "2 AAA\n\
             start\n\
             AAA\n\
             dest\n\
             BBB\n\
             AAA BBB 1 100\n\
             BBB AAA 2 200\n",
        )
        .unwrap();
        assert_eq!(problem.registry.count(), 2);
        assert_eq!(problem.areas.len(), 2);
        assert_eq!(problem.areas[0].selected_city(), 0);
    }

    #[test]
    fn start_city_area_is_moved_to_index_zero() {
        let problem = parse_str(
            "2 BBB\n\
             first\n\
             AAA\n\
             second\n\
             BBB\n",
        )
        .unwrap();
        assert_eq!(
            problem.registry.lookup(problem.areas[0].selected_city()),
            crate::domain::CityCode::parse("BBB").unwrap()
        );
    }

    #[test]
    fn start_city_not_listed_first_is_still_selected() {
        let problem = parse_str(
            "2 BBB\n\
             first\n\
             AAA BBB\n\
             second\n\
             CCC\n",
        )
        .unwrap();
        assert_eq!(
            problem.registry.lookup(problem.areas[0].selected_city()),
            crate::domain::CityCode::parse("BBB").unwrap()
        );
    }

    #[test]
    fn day_zero_expands_to_every_day() {
        let problem = parse_str(
            "2 AAA\n\
             start\n\
             AAA\n\
             dest\n\
             BBB\n\
             AAA BBB 0 50\n",
        )
        .unwrap();
        for day in 0..problem.matrix.days() {
            assert_eq!(problem.matrix.get(0, 1, day as u16), 50);
        }
    }

    #[test]
    fn missing_start_city_is_rejected() {
        let err = parse_str(
            "1 ZZZ\n\
             a\n\
             AAA\n",
        )
        .unwrap_err();
        assert_eq!(err, ParseError::StartCityMissing);
    }

    #[test]
    fn start_city_in_two_areas_is_rejected() {
        let err = parse_str(
            "2 AAA\n\
             a\n\
             AAA BBB\n\
             b\n\
             AAA CCC\n",
        )
        .unwrap_err();
        assert_eq!(err, ParseError::StartCityInMultipleAreas);
    }

    #[test]
    fn malformed_city_code_is_rejected() {
        let err = parse_str(
            "1 aa\n\
             a\n\
             AAA\n",
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::BadCityCode(_)));
    }
}
