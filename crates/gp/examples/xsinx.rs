use env_logger::{Builder, Env};
use gpr::GaussianProcess;
use linfa::prelude::*;
use ndarray::{arr2, array, concatenate, Array, Array1, Array2, Axis};

fn xsinx(x: &Array2<f64>) -> Array1<f64> {
    ((x - 3.5) * ((x - 3.5) / std::f64::consts::PI).mapv(|v| v.sin())).remove_axis(Axis(1))
}

fn main() {
    let env = Env::new().filter_or("GPR_LOG", "info");
    let mut builder = Builder::from_env(env);
    let builder = builder.target(env_logger::Target::Stdout);
    builder.try_init().ok();

    let xt = arr2(&[[0.0], [5.0], [10.0], [15.0], [18.0], [20.0], [25.0]]);
    let yt = xsinx(&xt);

    println!("Train GP surrogate of 'xsinx' at {}", xt.column(0));
    let mut gp = GaussianProcess::<f64>::params("CovSum(CovSEiso, CovNoise)")
        .loghyper(array![1.0, 2.0, -3.0])
        .fit(&Dataset::new(xt, yt))
        .expect("GP fitting");
    println!("{gp}");
    println!(
        "log likelihood = {}, gradient = {}",
        gp.log_likelihood().expect("likelihood"),
        gp.log_likelihood_gradient().expect("likelihood gradient")
    );

    let xtest = Array::linspace(0., 25., 26).insert_axis(Axis(1));
    let ytest = xsinx(&xtest);
    let (ypred, yvars) = gp.predict_valvars(&xtest).expect("GP prediction");
    let ysigma = yvars.mapv(|v| v.sqrt());

    println!("Compute prediction errors (x, err(x), sigma(x))");
    println!(
        "{}",
        concatenate![
            Axis(1),
            xtest,
            (ypred - ytest).insert_axis(Axis(1)),
            ysigma.insert_axis(Axis(1))
        ]
    );

    let path = std::env::temp_dir().join("gpr_xsinx.txt");
    gp.save(&path).expect("GP saved");
    println!("Model saved in {}", path.display());
}
