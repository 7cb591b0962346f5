use std::collections::HashSet;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use riot_draft_solver::{ChampionId, Solver, SolverError};

fn sum_utility(champions: &HashSet<ChampionId>) -> Result<f64, SolverError> {
	Ok(champions.iter().map(|c| f64::from(c.get())).sum())
}

fn pool(count: u32) -> HashSet<ChampionId> {
	(1..=count).map(|id| ChampionId::new(id).expect("nonzero")).collect()
}

fn benchmark_cold_solve(c: &mut Criterion) {
	c.bench_function("Solver::solve cold cache, 20 champion pool", |b| {
		b.iter(|| {
			let solver = Solver::new(black_box(pool(20)), sum_utility);
			solver.solve().unwrap()
		});
	});
}

fn benchmark_warm_solve(c: &mut Criterion) {
	let solver = Solver::new(pool(40), sum_utility);
	solver.solve().unwrap();

	c.bench_function("Solver::solve warm cache, 40 champion pool", |b| {
		b.iter(|| solver.solve().unwrap());
	});
}

criterion_group!(benches, benchmark_cold_solve, benchmark_warm_solve);
criterion_main!(benches);
