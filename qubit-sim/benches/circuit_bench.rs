// benches/circuit_bench.rs

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use qubit_sim::circuit::Circuit;
use qubit_sim::simulator::Simulator;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn four_qubit_inversion_circuit() -> Circuit {
    let mut c = Circuit::new(4, 4);
    // phi+ on (0,1), phi- on (2,3), then both inverses
    c.h(0).cx(0, 1);
    c.x(2).h(2).cx(2, 3);
    c.cx(2, 3).h(2).x(2);
    c.cx(0, 1).h(0);
    c.measure_all();
    c
}

fn benchmark_simulator(c: &mut Criterion) {
    let sim = Simulator::new();

    c.bench_function("verification_histogram_256_shots", |b| {
        let circuit = four_qubit_inversion_circuit();
        let mut rng = StdRng::seed_from_u64(1);
        b.iter(|| {
            let hist = sim.histogram(black_box(&circuit), 256, &mut rng).unwrap();
            black_box(hist.collapsed_to_zero())
        });
    });

    c.bench_function("ten_qubit_single_shot", |b| {
        let mut circuit = Circuit::new(10, 10);
        for i in 0..10 {
            circuit.h(i);
        }
        circuit.measure_all();
        let mut rng = StdRng::seed_from_u64(1);
        b.iter(|| black_box(sim.sample(black_box(&circuit), &mut rng).unwrap()));
    });
}

criterion_group!(benches, benchmark_simulator);
criterion_main!(benches);
