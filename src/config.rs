//! Named tuning constants for the annealing driver.
//!
//! Stands in for the original program's commented-out `config.txt` loader
//! — the values below are the ones that file would have held, given names
//! so the driver reads as configuration rather than magic numbers, but
//! nothing here reads from disk or the environment.
pub mod constant {
    /// Target iteration horizon the cooling curve is stretched across.
    pub const TN: f64 = 80_000_000.0;

    /// How often (in iterations) the temperature is recomputed.
    pub const RECOMPUTE_PERIOD: u64 = 512;

    /// Local moves never span more than this many days.
    pub const MAX_SPAN: u16 = 30;

    /// `T_last` breakpoints, chosen by tour length.
    pub const T_LAST_SHORT: f64 = 0.005; // fewer than 55 days
    pub const T_LAST_MEDIUM: f64 = 0.002; // fewer than 105 days
    pub const T_LAST_LONG: f64 = 0.0005; // 105 days or more

    pub const T_LAST_SHORT_CUTOFF: usize = 55;
    pub const T_LAST_MEDIUM_CUTOFF: usize = 105;

    /// Deadline interval table, in milliseconds.
    pub const DEADLINE_SMALL_MS: u64 = 3_000;
    pub const DEADLINE_MEDIUM_MS: u64 = 5_000;
    pub const DEADLINE_LARGE_MS: u64 = 15_000;

    pub const DEADLINE_SMALL_MAX_AREAS: usize = 20;
    pub const DEADLINE_SMALL_MAX_CITIES: usize = 50;
    pub const DEADLINE_MEDIUM_MAX_AREAS: usize = 100;
    pub const DEADLINE_MEDIUM_MAX_CITIES: usize = 200;

    /// Safety margin subtracted from the deadline interval before the stop
    /// flag is raised.
    pub const DEADLINE_SAFETY_MARGIN_MS: u64 = 75;

    /// Returns `T_last` for a tour of `days` legs.
    pub fn t_last_for(days: usize) -> f64 {
        if days < T_LAST_SHORT_CUTOFF {
            T_LAST_SHORT
        } else if days < T_LAST_MEDIUM_CUTOFF {
            T_LAST_MEDIUM
        } else {
            T_LAST_LONG
        }
    }

    /// Returns the deadline interval for a problem of this size.
    pub fn deadline_for(areas: usize, cities: usize) -> std::time::Duration {
        let ms = if areas <= DEADLINE_SMALL_MAX_AREAS && cities < DEADLINE_SMALL_MAX_CITIES {
            DEADLINE_SMALL_MS
        } else if areas <= DEADLINE_MEDIUM_MAX_AREAS && cities < DEADLINE_MEDIUM_MAX_CITIES {
            DEADLINE_MEDIUM_MS
        } else {
            DEADLINE_LARGE_MS
        };
        std::time::Duration::from_millis(ms)
    }
}
