// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
//! Benchmark: Hensel-code encode, reconstruction, and CRT combination.
//!
//! Moduli are fixed random primes so runs compare like with like. Plaintexts
//! sit near the reconstruction bound, which is the slow path for the
//! half-extended Euclid loop.
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hensel_core::bigint::random_prime;
use hensel_core::{chinese_remainder_all, BigInt, HenselCode, Rational};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

const SEED: u64 = 0x4845_4e53_454c;
const MODULUS_BITS: [u32; 3] = [64, 256, 1024];

fn prime(bits: u32, rng: &mut StdRng) -> BigInt {
    random_prime(bits, rng).expect("prime")
}

/// A rational whose numerator and denominator are close to the bound.
fn near_bound(modulus: &BigInt) -> Rational {
    let bound = HenselCode::zero(modulus.clone())
        .expect("odd modulus")
        .reconstruction_bound();
    Rational::new(-(&bound - 3), &bound - 2).expect("nonzero denominator")
}

fn bench_encode_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("hensel_codec");
    group
        .warm_up_time(Duration::from_secs(1))
        .measurement_time(Duration::from_secs(5))
        .sample_size(50);
    let mut rng = StdRng::seed_from_u64(SEED);

    for bits in MODULUS_BITS {
        let modulus = prime(bits, &mut rng);
        let value = near_bound(&modulus);
        let code = HenselCode::from_rational(modulus.clone(), &value).expect("invertible");

        group.bench_with_input(BenchmarkId::new("encode", bits), &value, |b, v| {
            b.iter(|| HenselCode::from_rational(modulus.clone(), black_box(v)));
        });
        group.bench_with_input(BenchmarkId::new("reconstruct", bits), &code, |b, hc| {
            b.iter(|| black_box(hc).to_rational());
        });
        group.bench_with_input(BenchmarkId::new("mul", bits), &code, |b, hc| {
            b.iter(|| black_box(hc).try_mul(hc));
        });
    }
    group.finish();
}

fn bench_crt(c: &mut Criterion) {
    let mut group = c.benchmark_group("hensel_crt");
    group
        .warm_up_time(Duration::from_secs(1))
        .measurement_time(Duration::from_secs(5))
        .sample_size(50);
    let mut rng = StdRng::seed_from_u64(SEED ^ 1);

    for n in [2usize, 8, 32] {
        let mut codes = Vec::with_capacity(n);
        while codes.len() < n {
            let p = prime(64, &mut rng);
            if codes.iter().any(|hc: &HenselCode| hc.modulus() == &p) {
                continue;
            }
            let residue = BigInt::from(codes.len() as u64 + 1);
            codes.push(HenselCode::new(p, residue).expect("odd prime"));
        }
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &codes, |b, codes| {
            b.iter(|| chinese_remainder_all(black_box(codes)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode_decode, bench_crt);
criterion_main!(benches);
