use std::io::{self, BufReader};

use kiwi_tsp::config::constant::{deadline_for, t_last_for, DEADLINE_SAFETY_MARGIN_MS};
use kiwi_tsp::deadline::Deadline;
use kiwi_tsp::driver::{run_workers, DriverConfig};
use kiwi_tsp::output::print_solution;
use kiwi_tsp::parser::parse;
use kiwi_tsp::rng::Rng;
use kiwi_tsp::tour::TourState;
use tracing::info;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let stdin = io::stdin();
    let problem = match parse(BufReader::new(stdin.lock())) {
        Ok(problem) => problem,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    let area_count = problem.areas.len();
    let city_count = problem.registry.count();
    let days = problem.matrix.days();

    let interval = deadline_for(area_count, city_count);
    let (deadline, timer) = Deadline::spawn(
        interval,
        std::time::Duration::from_millis(DEADLINE_SAFETY_MARGIN_MS),
    );
    let deadline_handle = deadline.handle();

    let worker_count = rayon::current_num_threads();

    info!(area_count, city_count, days, worker_count, "starting annealing");

    let config = DriverConfig {
        seed: 0x5EED_u64,
        t_last: t_last_for(days),
        worker_count,
    };

    let areas = problem.areas.clone();
    let matrix = problem.matrix.clone();
    let (best_tour, best_cost) = run_workers(
        move |seed| {
            let mut rng = Rng::seeded(seed);
            TourState::new(areas.clone(), &mut rng)
        },
        &matrix,
        &config,
        &deadline_handle,
    );

    print_solution(
        io::stdout().lock(),
        &problem.registry,
        &best_tour,
        &problem.matrix,
        best_cost,
    )
    .expect("stdout is writable");

    let _ = timer.join();
}
