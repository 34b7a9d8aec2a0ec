//! Tour state and the four incremental local-move evaluators.
//!
//! Grounded on the original `areapath_t` (days indexed 1..K via
//! `m_day_to_area`/`m_area_to_day`, with `m_cities_choises` as the
//! selectable list). A single implementation covers both the general case
//! and the degenerate one-city-per-area case from spec.md §4.7: when every
//! area has exactly one city, `selectable` is simply empty and SELECT-CITY
//! never gets drawn.
use crate::config::constant::MAX_SPAN;
use crate::domain::{Area, CostMatrix};

/// Sentinel Δcost returned by REVERSE/INSERT when the requested span
/// exceeds [`MAX_SPAN`].
pub const SPAN_TOO_LONG: i32 = i32::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    SwapAreas,
    ReverseAreas,
    InsertArea,
    SelectCity,
}

/// A candidate move and its Δcost, as chosen by [`TourState::best_move`].
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub kind: MoveKind,
    pub i: u16,
    pub j: u16,
    pub delta: i32,
}

/// One (area, alternate-city-position) pair eligible for SELECT-CITY.
#[derive(Debug, Clone, Copy)]
struct Selectable {
    area_idx: u16,
    city_pos: u16,
}

/// The mutable tour being annealed: `areas[0..k]` with the two mutually
/// inverse day/area permutations from spec.md §3. Day `K` is a synthetic
/// closing slot, always `0` (the starting area) — it is never part of
/// `area_to_day`'s image, since day `0` already holds that mapping and no
/// move ever targets day `0` or day `K`.
pub struct TourState {
    areas: Vec<Area>,
    day_to_area: Vec<u16>,
    area_to_day: Vec<u16>,
    selectable: Vec<Selectable>,
}

impl TourState {
    /// Builds the initial tour: the starting area fixed at day 0 and day
    /// K, the remaining areas shuffled into days 1..K-1.
    pub fn new(areas: Vec<Area>, rng: &mut crate::rng::Rng) -> Self {
        assert!(!areas.is_empty(), "a tour needs at least one area");
        let k = areas.len();

        let mut day_to_area: Vec<u16> = Vec::with_capacity(k + 1);
        day_to_area.push(0);
        day_to_area.extend(1..k as u16);
        if k > 2 {
            rng.shuffle(&mut day_to_area[1..k]);
        }
        day_to_area.push(0);

        let mut area_to_day = vec![0u16; k];
        for day in 0..k {
            area_to_day[day_to_area[day] as usize] = day as u16;
        }

        let mut selectable = Vec::new();
        for (area_idx, area) in areas.iter().enumerate().skip(1).take(k - 1) {
            for pos in 1..area.city_count() {
                selectable.push(Selectable {
                    area_idx: area_idx as u16,
                    city_pos: pos as u16,
                });
            }
        }

        Self {
            areas,
            day_to_area,
            area_to_day,
            selectable,
        }
    }

    /// Number of travel days / legs (`K` in spec.md's glossary).
    pub fn days(&self) -> u16 {
        (self.day_to_area.len() - 1) as u16
    }

    pub fn selectable_count(&self) -> usize {
        self.selectable.len()
    }

    #[inline]
    fn city_on_day(&self, day: u16) -> u16 {
        self.areas[self.day_to_area[day as usize] as usize].selected_city()
    }

    /// Full recomputation of the tour's total cost. Used at construction,
    /// for best-snapshot bookkeeping, and by tests that check Δcost
    /// against ground truth.
    pub fn cost(&self, matrix: &CostMatrix) -> u32 {
        let mut sum = 0u32;
        for day in 0..self.days() {
            let from = self.city_on_day(day);
            let to = self.city_on_day(day + 1);
            sum += matrix.get(from, to, day) as u32;
        }
        sum
    }

    // ---- SWAP-AREAS --------------------------------------------------

    pub fn swap_areas_delta(&self, matrix: &CostMatrix, i: u16, j: u16) -> i32 {
        if i == j {
            return 0;
        }

        let pim1 = self.city_on_day(i - 1);
        let pi = self.city_on_day(i);
        let pip1 = self.city_on_day(i + 1);

        let pjm1 = self.city_on_day(j - 1);
        let pj = self.city_on_day(j);
        let pjp1 = self.city_on_day(j + 1);

        let leg = |src, dst, day: u16| matrix.get(src, dst, day) as i32;

        let (before, after) = if (i as i32 - j as i32).abs() > 1 {
            (
                leg(pim1, pi, i - 1) + leg(pi, pip1, i) + leg(pjm1, pj, j - 1) + leg(pj, pjp1, j),
                leg(pim1, pj, i - 1) + leg(pj, pip1, i) + leg(pjm1, pi, j - 1) + leg(pi, pjp1, j),
            )
        } else if i + 1 == j {
            (
                leg(pim1, pi, i - 1) + leg(pi, pj, i) + leg(pj, pjp1, j),
                leg(pim1, pj, i - 1) + leg(pj, pi, i) + leg(pi, pjp1, j),
            )
        } else {
            debug_assert_eq!(j + 1, i);
            (
                leg(pjm1, pj, j - 1) + leg(pj, pi, j) + leg(pi, pip1, i),
                leg(pjm1, pi, j - 1) + leg(pi, pj, j) + leg(pj, pip1, i),
            )
        };

        after - before
    }

    pub fn commit_swap_areas(&mut self, i: u16, j: u16) {
        self.day_to_area.swap(i as usize, j as usize);
        self.area_to_day[self.day_to_area[i as usize] as usize] = i;
        self.area_to_day[self.day_to_area[j as usize] as usize] = j;
    }

    // ---- REVERSE-AREAS ------------------------------------------------

    pub fn reverse_areas_delta(&self, matrix: &CostMatrix, i: u16, j: u16) -> i32 {
        let k = i.min(j);
        let l = i.max(j);
        if l - k > MAX_SPAN {
            return SPAN_TOO_LONG;
        }

        let leg = |src, dst, day: u16| matrix.get(src, dst, day) as i32;

        let mut before = leg(self.city_on_day(k - 1), self.city_on_day(k), k - 1)
            + leg(self.city_on_day(l), self.city_on_day(l + 1), l);
        let mut after = leg(self.city_on_day(k - 1), self.city_on_day(l), k - 1)
            + leg(self.city_on_day(k), self.city_on_day(l + 1), l);

        let span = l - k;
        for idx in 0..span {
            before += leg(
                self.city_on_day(k + idx),
                self.city_on_day(k + idx + 1),
                k + idx,
            );
            after += leg(
                self.city_on_day(l - idx),
                self.city_on_day(l - idx - 1),
                k + idx,
            );
        }

        after - before
    }

    pub fn commit_reverse_areas(&mut self, i: u16, j: u16) {
        let k = i.min(j);
        let l = i.max(j);
        let mid = (k + l) / 2;
        let mut idx = k;
        while idx <= mid {
            let mirror = k + l - idx;
            self.day_to_area.swap(idx as usize, mirror as usize);
            self.area_to_day[self.day_to_area[idx as usize] as usize] = idx;
            self.area_to_day[self.day_to_area[mirror as usize] as usize] = mirror;
            idx += 1;
        }
    }

    // ---- INSERT-AREA ----------------------------------------------------

    pub fn insert_area_delta(&self, matrix: &CostMatrix, i: u16, j: u16) -> i32 {
        if i == j {
            return 0;
        }

        let leg = |src, dst, day: u16| matrix.get(src, dst, day) as i32;

        if i < j {
            if j - i > MAX_SPAN {
                return SPAN_TOO_LONG;
            }

            let mut before = leg(self.city_on_day(i - 1), self.city_on_day(i), i - 1)
                + leg(self.city_on_day(j - 1), self.city_on_day(j), j - 1)
                + leg(self.city_on_day(j), self.city_on_day(j + 1), j);
            let mut after = leg(self.city_on_day(i - 1), self.city_on_day(i + 1), i - 1)
                + leg(self.city_on_day(j), self.city_on_day(i), j - 1)
                + leg(self.city_on_day(i), self.city_on_day(j + 1), j);

            let mut k = i;
            while k < j - 1 {
                before += leg(self.city_on_day(k), self.city_on_day(k + 1), k);
                after += leg(self.city_on_day(k + 1), self.city_on_day(k + 2), k);
                k += 1;
            }
            after - before
        } else {
            if i - j > MAX_SPAN {
                return SPAN_TOO_LONG;
            }

            let mut before = leg(self.city_on_day(j - 1), self.city_on_day(j), j - 1)
                + leg(self.city_on_day(j), self.city_on_day(j + 1), j)
                + leg(self.city_on_day(i), self.city_on_day(i + 1), i);
            let mut after = leg(self.city_on_day(j - 1), self.city_on_day(i), j - 1)
                + leg(self.city_on_day(i), self.city_on_day(j), j)
                + leg(self.city_on_day(i - 1), self.city_on_day(i + 1), i);

            let mut k = j + 1;
            while k < i {
                before += leg(self.city_on_day(k), self.city_on_day(k + 1), k);
                after += leg(self.city_on_day(k - 1), self.city_on_day(k), k);
                k += 1;
            }
            after - before
        }
    }

    pub fn commit_insert_area(&mut self, i: u16, j: u16) {
        let moved = self.day_to_area[i as usize];
        let (k, l) = if i < j {
            let mut m = i;
            while m < j {
                self.day_to_area[m as usize] = self.day_to_area[(m + 1) as usize];
                m += 1;
            }
            (i, j)
        } else {
            let mut m = i;
            while m > j {
                self.day_to_area[m as usize] = self.day_to_area[(m - 1) as usize];
                m -= 1;
            }
            (j, i)
        };
        self.day_to_area[j as usize] = moved;

        let mut m = k;
        while m <= l {
            self.area_to_day[self.day_to_area[m as usize] as usize] = m;
            m += 1;
        }
    }

    // ---- SELECT-CITY ----------------------------------------------------

    pub fn select_city_delta(&self, matrix: &CostMatrix, area_idx: u16, new_pos: u16) -> i32 {
        let day = self.area_to_day[area_idx as usize];
        let city_before = self.city_on_day(day - 1);
        let current_city = self.areas[area_idx as usize].selected_city();
        let candidate_city = self.areas[area_idx as usize].city_at(new_pos as usize);

        let leg = |src, dst, day: u16| matrix.get(src, dst, day) as i32;

        let mut before = leg(city_before, current_city, day - 1);
        let mut after = leg(city_before, candidate_city, day - 1);

        if day < self.days() {
            let city_after = self.city_on_day(day + 1);
            before += leg(current_city, city_after, day);
            after += leg(candidate_city, city_after, day);
        }

        after - before
    }

    pub fn commit_select_city(&mut self, area_idx: u16, new_pos: u16) {
        self.areas[area_idx as usize].select(new_pos as usize);
    }

    /// Samples a selectable `(area, position)` pair using `raw16`, bound
    /// to the selectable list's length.
    fn sample_selectable(&self, raw16: u16) -> Option<(u16, u16)> {
        if self.selectable.is_empty() {
            return None;
        }
        let idx = crate::rng::bound(raw16, self.selectable.len() as u16) as usize;
        let s = self.selectable[idx];
        Some((s.area_idx, s.city_pos))
    }

    /// Draws a move and picks the candidate with the smallest Δcost,
    /// ties broken in the reference order swap, reverse, insert,
    /// select-city (spec.md §4.5 step 3).
    pub fn best_move(&self, matrix: &CostMatrix, draw: crate::rng::MoveDraw) -> Candidate {
        let inner_range = self.days() - 1; // days 1..K-1, exclusive of endpoints
        let i = crate::rng::bound(draw.i_raw16, inner_range) + 1;
        let j = crate::rng::bound(draw.j_raw16, inner_range) + 1;

        let mut best = Candidate {
            kind: MoveKind::SwapAreas,
            i,
            j,
            delta: self.swap_areas_delta(matrix, i, j),
        };

        let reverse_delta = self.reverse_areas_delta(matrix, i, j);
        if reverse_delta < best.delta {
            best = Candidate {
                kind: MoveKind::ReverseAreas,
                i,
                j,
                delta: reverse_delta,
            };
        }

        let insert_delta = self.insert_area_delta(matrix, i, j);
        if insert_delta < best.delta {
            best = Candidate {
                kind: MoveKind::InsertArea,
                i,
                j,
                delta: insert_delta,
            };
        }

        if let Some((area_idx, city_pos)) = self.sample_selectable(draw.i_raw16) {
            let delta = self.select_city_delta(matrix, area_idx, city_pos);
            if delta < best.delta {
                best = Candidate {
                    kind: MoveKind::SelectCity,
                    i: area_idx,
                    j: city_pos,
                    delta,
                };
            }
        }

        best
    }

    pub fn commit(&mut self, candidate: Candidate) {
        match candidate.kind {
            MoveKind::SwapAreas => self.commit_swap_areas(candidate.i, candidate.j),
            MoveKind::ReverseAreas => self.commit_reverse_areas(candidate.i, candidate.j),
            MoveKind::InsertArea => self.commit_insert_area(candidate.i, candidate.j),
            MoveKind::SelectCity => self.commit_select_city(candidate.i, candidate.j),
        }
    }

    /// Yields `(from, to, day, price)` for every leg, in day order —
    /// exactly the rows the output formatter prints.
    pub fn legs<'a>(&'a self, matrix: &'a CostMatrix) -> impl Iterator<Item = (u16, u16, u16, u16)> + 'a {
        (0..self.days()).map(move |day| {
            let from = self.city_on_day(day);
            let to = self.city_on_day(day + 1);
            (from, to, day, matrix.get(from, to, day))
        })
    }

    /// A snapshot of the day→area permutation, for best-so-far bookkeeping
    /// in the annealing driver.
    pub fn day_to_area(&self) -> &[u16] {
        &self.day_to_area
    }

    /// Restores a previously-snapshotted day→area permutation (and
    /// rebuilds its inverse), used when the driver rolls a worker back to
    /// its best-seen tour at the deadline.
    pub fn restore_day_to_area(&mut self, day_to_area: Vec<u16>) {
        debug_assert_eq!(day_to_area.len(), self.day_to_area.len());
        self.day_to_area = day_to_area;
        let days = self.days() as usize;
        for day in 0..days {
            self.area_to_day[self.day_to_area[day] as usize] = day as u16;
        }
    }

    #[cfg(test)]
    pub fn area_to_day(&self) -> &[u16] {
        &self.area_to_day
    }

    /// Checks the inverse-permutation invariant over the `K` "real" days
    /// `0..K`; day `K` itself is the synthetic closing slot and is not
    /// part of `area_to_day`'s image (see the [`TourState`] doc comment).
    #[cfg(test)]
    pub fn invariant_inverse_permutation(&self) -> bool {
        (0..self.days() as usize).all(|d| self.area_to_day[self.day_to_area[d] as usize] as usize == d)
    }

    #[cfg(test)]
    pub fn invariant_endpoints_fixed(&self) -> bool {
        self.day_to_area[0] == 0 && *self.day_to_area.last().unwrap() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::matrix::CostMatrix;

    fn linear_matrix(cities: usize, days: usize) -> CostMatrix {
        // price(src, dst, day) = 100*src + 10*dst + day, so every leg has a
        // distinct, easily-checked value.
        let mut m = CostMatrix::new(cities, days);
        for src in 0..cities {
            for dst in 0..cities {
                if src == dst {
                    continue;
                }
                for day in 0..days {
                    m.set(src as u16, dst as u16, day as u16, (100 * src + 10 * dst + day) as u16);
                }
            }
        }
        m
    }

    fn tour(areas_sizes: &[usize]) -> (TourState, CostMatrix) {
        let areas: Vec<Area> = areas_sizes
            .iter()
            .enumerate()
            .map(|(area_idx, &size)| {
                let base = (area_idx * 10) as u16;
                Area::new((0..size as u16).map(|c| base + c).collect())
            })
            .collect();
        let cities = areas_sizes.len() * 10;
        let matrix = linear_matrix(cities, areas.len());
        let mut rng = crate::rng::Rng::seeded(1);
        (TourState::new(areas, &mut rng), matrix)
    }

    #[test]
    fn initial_tour_satisfies_invariants() {
        let (t, _) = tour(&[1, 2, 1, 3, 1]);
        assert!(t.invariant_inverse_permutation());
        assert!(t.invariant_endpoints_fixed());
    }

    #[test]
    fn swap_delta_matches_recompute() {
        let (mut t, m) = tour(&[1, 2, 1, 3, 2, 1]);
        let before = t.cost(&m);
        let delta = t.swap_areas_delta(&m, 2, 4);
        t.commit_swap_areas(2, 4);
        let after = t.cost(&m);
        assert_eq!(after as i64, before as i64 + delta as i64);
        assert!(t.invariant_inverse_permutation());
    }

    #[test]
    fn swap_adjacent_delta_matches_recompute() {
        let (mut t, m) = tour(&[1, 2, 1, 3, 2, 1]);
        let before = t.cost(&m);
        let delta = t.swap_areas_delta(&m, 2, 3);
        t.commit_swap_areas(2, 3);
        let after = t.cost(&m);
        assert_eq!(after as i64, before as i64 + delta as i64);
    }

    #[test]
    fn swap_same_index_is_noop() {
        let (t, m) = tour(&[1, 2, 1, 3]);
        assert_eq!(t.swap_areas_delta(&m, 2, 2), 0);
    }

    #[test]
    fn reverse_delta_matches_recompute() {
        let (mut t, m) = tour(&[1, 2, 1, 3, 2, 1, 1]);
        let before = t.cost(&m);
        let delta = t.reverse_areas_delta(&m, 1, 4);
        t.commit_reverse_areas(1, 4);
        let after = t.cost(&m);
        assert_eq!(after as i64, before as i64 + delta as i64);
        assert!(t.invariant_inverse_permutation());
    }

    #[test]
    fn reverse_twice_is_identity() {
        let (mut t, _m) = tour(&[1, 2, 1, 3, 2, 1, 1]);
        let before = t.day_to_area().to_vec();
        t.commit_reverse_areas(1, 4);
        t.commit_reverse_areas(1, 4);
        assert_eq!(t.day_to_area(), &before[..]);
    }

    #[test]
    fn swap_twice_is_identity() {
        let (mut t, _m) = tour(&[1, 2, 1, 3, 2, 1]);
        let before = t.day_to_area().to_vec();
        t.commit_swap_areas(2, 4);
        t.commit_swap_areas(2, 4);
        assert_eq!(t.day_to_area(), &before[..]);
    }

    #[test]
    fn reverse_beyond_cap_is_sentinel_and_readonly() {
        let sizes: Vec<usize> = (0..40).map(|_| 1).collect();
        let (t, m) = tour(&sizes);
        let before = t.day_to_area().to_vec();
        let delta = t.reverse_areas_delta(&m, 5, 37);
        assert_eq!(delta, SPAN_TOO_LONG);
        assert_eq!(t.day_to_area(), &before[..]);
    }

    #[test]
    fn insert_beyond_cap_is_sentinel() {
        let sizes: Vec<usize> = (0..40).map(|_| 1).collect();
        let (t, m) = tour(&sizes);
        assert_eq!(t.insert_area_delta(&m, 1, 35), SPAN_TOO_LONG);
    }

    #[test]
    fn insert_forward_delta_matches_recompute() {
        let (mut t, m) = tour(&[1, 2, 1, 3, 2, 1, 1]);
        let before = t.cost(&m);
        let delta = t.insert_area_delta(&m, 1, 4);
        t.commit_insert_area(1, 4);
        let after = t.cost(&m);
        assert_eq!(after as i64, before as i64 + delta as i64);
        assert!(t.invariant_inverse_permutation());
    }

    #[test]
    fn insert_backward_delta_matches_recompute() {
        let (mut t, m) = tour(&[1, 2, 1, 3, 2, 1, 1]);
        let before = t.cost(&m);
        let delta = t.insert_area_delta(&m, 4, 1);
        t.commit_insert_area(4, 1);
        let after = t.cost(&m);
        assert_eq!(after as i64, before as i64 + delta as i64);
        assert!(t.invariant_inverse_permutation());
    }

    #[test]
    fn select_city_delta_matches_recompute_interior_area() {
        let (mut t, m) = tour(&[1, 3, 1, 1]);
        let before = t.cost(&m);
        let delta = t.select_city_delta(&m, 1, 2);
        t.commit_select_city(1, 2);
        let after = t.cost(&m);
        assert_eq!(after as i64, before as i64 + delta as i64);
    }

    #[test]
    fn select_city_delta_matches_recompute_last_day_area() {
        // area 0 occupies day 0 (and day K, fixed); put the only
        // multi-city area on the last interior day.
        let (mut t, m) = tour(&[1, 1, 1, 3]);
        let before = t.cost(&m);
        let delta = t.select_city_delta(&m, 3, 2);
        t.commit_select_city(3, 2);
        let after = t.cost(&m);
        assert_eq!(after as i64, before as i64 + delta as i64);
    }

    #[test]
    fn selectable_excludes_day_zero_area_and_single_city_areas() {
        let (t, _m) = tour(&[1, 1, 1]);
        assert_eq!(t.selectable_count(), 0);
    }

    #[test]
    fn selectable_counts_every_alternate_city() {
        let (t, _m) = tour(&[1, 3, 2, 1]);
        // area 1 has 2 alternates (positions 1,2), area 2 has 1 alternate.
        assert_eq!(t.selectable_count(), 3);
    }
}
