mod input;
mod logging;
mod options;
mod output;

use std::{
    io::{self, BufRead, Write},
    time::Instant,
};

use geotour_core::{
    ExhaustiveEstimate, Result, SolveOutcome, aggregate_by_label, centroid, cluster, solve,
    tour_length,
};
use log::{info, warn};
use rand::{SeedableRng, rngs::StdRng};

use crate::options::AppOptions;

fn main() -> Result<()> {
    let now = Instant::now();
    let options = AppOptions::from_args()?;
    if options.help {
        print!("{}", AppOptions::usage());
        return Ok(());
    }
    logging::init_logger(&options)?;

    let mut points = input::read_points(options.input_path())?;
    info!(
        "input: n={} initial_km={:.4}",
        points.len(),
        tour_length(&points)
    );

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    if options.clusters > 0 {
        let outcome = cluster(&points, options.clusters, &mut rng)?;
        let mut out = output::open_output(options.output_path())?;
        output::write_clusters(&mut out, &outcome.clusters, options.format)?;
        info!(
            "output: clusters={} rounds={} converged={} time={:.2}s",
            outcome.clusters.len(),
            outcome.rounds,
            outcome.converged,
            now.elapsed().as_secs_f32()
        );
        return Ok(());
    }

    if options.centers {
        points = aggregate_by_label(&points)?;
        info!("centers: routing n={} label centroids", points.len());
    }

    let from_file = options.input_path().is_some();
    let confirm = |estimate: &ExhaustiveEstimate| {
        if options.yes {
            return true;
        }
        if !from_file {
            warn!("exhaustive: stdin carried the points, pass --yes to run {estimate}");
            return false;
        }
        let stdin = io::stdin();
        decline_on_error(prompt_continue(stdin.lock(), io::stderr(), estimate))
    };

    let solution = match solve(&points, &options.solver_options(), &mut rng, confirm)? {
        SolveOutcome::Solved(solution) => solution,
        SolveOutcome::Aborted(estimate) => {
            warn!("output: aborted exhaustive search {estimate}");
            return Ok(());
        }
    };

    let center = centroid(&solution.tour.points)?;
    info!(
        "center: lat={:.6} lon={:.6} avg_km={:.2}",
        center.center.lat,
        center.center.lon,
        center.average_distance()
    );

    let mut out = output::open_output(options.output_path())?;
    output::write_tour(&mut out, &solution.tour.points, &center, options.format)?;

    info!(
        "output: n={} strategy={} final_km={:.4} converged={} time={:.2}s",
        solution.tour.len(),
        solution.strategy,
        solution.length,
        solution.converged,
        now.elapsed().as_secs_f32()
    );

    Ok(())
}

fn prompt_continue<R: BufRead, W: Write>(
    input: R,
    mut prompt: W,
    estimate: &ExhaustiveEstimate,
) -> io::Result<bool> {
    writeln!(prompt, "warning, approx {:.4e} years to calculate", estimate.years())?;
    write!(prompt, "continue (y/n): ")?;
    prompt.flush()?;
    for line in input.lines() {
        match line?.trim().chars().next() {
            Some('y' | 'Y') => return Ok(true),
            Some('n' | 'N') => return Ok(false),
            _ => {
                write!(prompt, "continue (y/n): ")?;
                prompt.flush()?;
            }
        }
    }
    Ok(false)
}

/// An unreadable terminal declines the search.
fn decline_on_error(answer: io::Result<bool>) -> bool {
    answer.unwrap_or_else(|e| {
        warn!("exhaustive.prompt: terminal read failed, declining: {e}");
        false
    })
}
