use criterion::{criterion_group, criterion_main, Criterion};
use gpr::GaussianProcess;
use linfa::prelude::{Dataset, Fit};
use ndarray::{Array1, Array2, Axis};
use ndarray_rand::rand::SeedableRng;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand_xoshiro::Xoshiro256Plus;

fn griewank(x: &Array2<f64>) -> Array1<f64> {
    let dim = x.ncols();
    let d = Array1::linspace(1., dim as f64, dim).mapv(|v| v.sqrt());
    x.map_axis(Axis(1), |x| {
        x.mapv(|v| v * v).sum() / 4000. - (&x / &d).mapv(|v| v.cos()).fold(1., |acc, x| acc * x)
            + 1.0
    })
}

fn criterion_gp(c: &mut Criterion) {
    let dims = [2, 5];
    let nts = [100, 300];

    let mut group = c.benchmark_group("gp");
    group.sample_size(20);
    for (&dim, &nt) in dims.iter().zip(nts.iter()) {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let xt = Array2::random_using((nt, dim), Uniform::new(-600., 600.), &mut rng);
        let yt = griewank(&xt);
        let xtest = Array2::random_using((100, dim), Uniform::new(-600., 600.), &mut rng);
        // ln(length scales), ln(signal std), ln(noise std)
        let mut loghyper = Array1::from_elem(dim + 2, 4.);
        loghyper[dim] = 0.;
        loghyper[dim + 1] = -2.;

        group.bench_function(format!("gp rebuild and predict {dim}x{nt}"), |b| {
            b.iter(|| {
                let mut gp = GaussianProcess::<f64>::params("CovSum(CovSEard, CovNoise)")
                    .loghyper(loghyper.clone())
                    .fit(&Dataset::new(xt.clone(), yt.clone()))
                    .expect("GP fit error");
                std::hint::black_box(gp.predict_valvars(&xtest).expect("GP prediction"))
            });
        });

        let mut gp = GaussianProcess::<f64>::params("CovSum(CovSEard, CovNoise)")
            .loghyper(loghyper.clone())
            .fit(&Dataset::new(xt.clone(), yt.clone()))
            .expect("GP fit error");
        let x0 = Array1::zeros(dim);
        group.bench_function(format!("gp cached predict {dim}x{nt}"), |b| {
            b.iter(|| std::hint::black_box(gp.predict_valvar(&x0).expect("GP prediction")))
        });
    }
    group.finish();
}

criterion_group!(benches, criterion_gp);
criterion_main!(benches);
