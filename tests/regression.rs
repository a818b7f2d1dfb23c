use kurbo::BezPath;
use libtest_mimic::{Arguments, Failed, Trial};
use serde::{Deserialize, Serialize};
use snapround::{snap_round, validate::check_noding, Chain, Point, PrecisionModel};
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Debug)]
struct RegressionCaseDeclaration {
    /// Grid points per unit. Exactly one of this and `grid_size` should be set.
    scale: Option<f64>,
    grid_size: Option<f64>,
    /// One chain per entry, as svg path data. Curves get flattened, and every
    /// subpath becomes its own chain.
    chains: Vec<String>,
    /// If present, the exact expected output, one list of `[x, y]` pairs per chain.
    expected: Option<Vec<Vec<[f64; 2]>>>,
}

impl RegressionCaseDeclaration {
    fn precision(&self) -> PrecisionModel {
        match (self.scale, self.grid_size) {
            (Some(s), None) => PrecisionModel::from_scale(s).unwrap(),
            (None, Some(s)) => PrecisionModel::from_grid_size(s).unwrap(),
            _ => panic!("need exactly one of `scale` and `grid_size`"),
        }
    }

    fn chains(&self) -> Vec<Chain<usize>> {
        let mut ret = Vec::new();
        for (idx, data) in self.chains.iter().enumerate() {
            let path = BezPath::from_svg(data).unwrap();
            let mut points = Vec::<Point>::new();
            kurbo::flatten(path.iter(), 1e-3, |el| match el {
                kurbo::PathEl::MoveTo(p) => {
                    if points.len() > 1 {
                        ret.push(Chain::new(points.split_off(0), idx));
                    }
                    points.clear();
                    points.push(p.into());
                }
                kurbo::PathEl::LineTo(p) => points.push(p.into()),
                kurbo::PathEl::ClosePath => {
                    if let Some(&first) = points.first() {
                        points.push(first);
                    }
                }
                kurbo::PathEl::QuadTo(..) | kurbo::PathEl::CurveTo(..) => unreachable!(),
            });
            if points.len() > 1 {
                ret.push(Chain::new(points, idx));
            }
        }
        ret
    }
}

fn main() {
    let args = Arguments::from_args();
    let tests = regression_tests();

    libtest_mimic::run(&args, tests).exit();
}

fn regression_tests() -> Vec<Trial> {
    let ws = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let file_paths = glob::glob(&format!("{ws}/tests/regression/**/*.yml")).unwrap();

    file_paths
        .into_iter()
        .map(|p| {
            let p = p.unwrap();
            let name = input_path_base(&p).display().to_string();
            Trial::test(name, || run_regression_test(p))
        })
        .collect()
}

fn input_path_base(input_path: &Path) -> &Path {
    let ws = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let base = format!("{ws}/tests/regression");
    input_path.strip_prefix(base).unwrap()
}

fn run_regression_test(path: PathBuf) -> Result<(), Failed> {
    let input = std::fs::read_to_string(&path).unwrap();
    let case: RegressionCaseDeclaration = serde_yaml::from_str(&input).unwrap();
    let precision = case.precision();
    let chains = case.chains();
    let output = snap_round(&chains, precision)?;

    check_noding(&output)?;
    for p in output.iter().flat_map(|c| &c.points) {
        if precision.round(*p) != *p {
            return Err(format!("output point {p:?} isn't on the grid").into());
        }
    }

    if let Some(expected) = case.expected {
        let actual: Vec<Vec<[f64; 2]>> = output
            .iter()
            .map(|c| c.points.iter().map(|p| [p.x, p.y]).collect())
            .collect();
        if actual != expected {
            return Err(format!("expected {expected:?}, got {actual:?}").into());
        }
    }

    Ok(())
}
