use std::path::PathBuf;

use clap::{Args, Parser};
use kurbo::BezPath;
use svg::{
    node::element::{path::Data, Path, Rectangle},
    Document,
};

use snapround::{generators, Chain, Noder, Point, PrecisionModel, SnapRounder};

#[derive(Copy, Clone, Debug, clap::ValueEnum)]
enum Example {
    Grid,
    Star,
    NearMisses,
}

#[derive(Parser)]
struct Cli {
    #[arg(long)]
    output: PathBuf,

    #[command(flatten)]
    input: Input,

    #[command(flatten)]
    grid: Grid,

    /// Tolerance for flattening curves.
    #[arg(long, default_value_t = 0.01)]
    tolerance: f64,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct Input {
    /// A file with one line of svg path data per chain.
    input: Option<PathBuf>,

    #[arg(long)]
    example: Option<Example>,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct Grid {
    #[arg(long)]
    scale: Option<f64>,

    #[arg(long)]
    grid_size: Option<f64>,
}

fn flatten(path: &BezPath, tolerance: f64, tag: usize, out: &mut Vec<Chain<usize>>) {
    let mut points = Vec::<Point>::new();
    kurbo::flatten(path.iter(), tolerance, |el| match el {
        kurbo::PathEl::MoveTo(p) => {
            if points.len() > 1 {
                out.push(Chain::new(points.split_off(0), tag));
            }
            points.clear();
            points.push(p.into());
        }
        kurbo::PathEl::LineTo(p) => points.push(p.into()),
        kurbo::PathEl::ClosePath => {
            if let Some(&p) = points.first() {
                points.push(p);
            }
        }
        kurbo::PathEl::QuadTo(..) | kurbo::PathEl::CurveTo(..) => unreachable!(),
    });
    if points.len() > 1 {
        out.push(Chain::new(points, tag));
    }
}

fn get_chains(input: &Input, tolerance: f64) -> anyhow::Result<Vec<Chain<usize>>> {
    match (&input.input, &input.example) {
        (Some(path), None) => {
            let input = std::fs::read_to_string(path)?;
            let mut ret = Vec::new();
            for (idx, line) in input.lines().filter(|l| !l.trim().is_empty()).enumerate() {
                let path = BezPath::from_svg(line)?;
                flatten(&path, tolerance, idx, &mut ret);
            }
            Ok(ret)
        }
        (None, Some(example)) => Ok(match example {
            Example::Grid => generators::crossing_grid(10, 7.3, 1.3),
            Example::Star => generators::star(12, Point::new(20.0, 20.0), 20.0),
            Example::NearMisses => generators::near_misses(5, 10, 0.05),
        }),
        _ => unreachable!(),
    }
}

fn polyline(points: &[Point], stroke_width: f64) -> Path {
    let mut data = Data::new();
    if let Some((first, rest)) = points.split_first() {
        data = data.move_to((first.x, first.y));
        for p in rest {
            data = data.line_to((p.x, p.y));
        }
    }
    Path::new()
        .set("stroke-width", stroke_width)
        .set("stroke-linecap", "round")
        .set("stroke-linejoin", "round")
        .set("fill", "none")
        .set("d", data)
}

pub fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let chains = get_chains(&args.input, args.tolerance)?;
    let precision = match (args.grid.scale, args.grid.grid_size) {
        (Some(scale), None) => PrecisionModel::from_scale(scale)?,
        (None, Some(size)) => PrecisionModel::from_grid_size(size)?,
        _ => unreachable!(),
    };

    let mut rounder = SnapRounder::new(precision);
    rounder.compute_nodes(&chains);
    let output = rounder.noded_substrings();
    snapround::validate::check_noding(&output)?;
    eprintln!(
        "{} chains in, {} pieces out, {} hot pixels",
        chains.len(),
        output.len(),
        rounder.hot_pixels().len()
    );

    let all_points = chains.iter().flat_map(|c| &c.points);
    let rect = all_points
        .map(|p| kurbo::Rect::from_points(p.to_kurbo(), p.to_kurbo()))
        .reduce(|a, b| a.union(b))
        .ok_or_else(|| anyhow::anyhow!("no input"))?;
    let pad = 2.0 * precision.grid_size();
    let rect = rect.inflate(pad, pad);
    let stroke_width = rect.width().max(rect.height()) / 512.0;

    // The input on the left, and the output on the right.
    let mut document = Document::new().set(
        "viewBox",
        (rect.x0, rect.y0, 2.0 * rect.width(), rect.height()),
    );

    for c in &chains {
        document = document.add(polyline(&c.points, stroke_width).set("stroke", "black"));
    }

    let shifted = |p: &Point| Point::new(p.x + rect.width(), p.y);
    for hp in rounder.hot_pixels() {
        let [ll, _, ur, _] = hp.corners().map(|p| shifted(&p));
        document = document.add(
            Rectangle::new()
                .set("x", ll.x)
                .set("y", ll.y)
                .set("width", ur.x - ll.x)
                .set("height", ur.y - ll.y)
                .set("fill", "orange")
                .set("opacity", 0.3),
        );
    }

    let colors = ["#005F73", "#0A9396", "#94D2BD", "#EE9B00", "#CA6702", "#AE2012"];
    for (i, c) in output.iter().enumerate() {
        let pts: Vec<_> = c.points.iter().map(shifted).collect();
        document = document.add(polyline(&pts, stroke_width).set("stroke", colors[i % colors.len()]));
    }

    svg::save(&args.output, &document)?;
    Ok(())
}
