//! Feature extraction over board colors.
//!
//! Filters reduce a 24-bit RGB color to a value in `[0, 1]`; `convolve`
//! applies a function over each cell's 3×3 neighbourhood; aggregators turn a
//! set of values into a yes/no observation.

use crate::error::Result;
use crate::influence::finite_or_zero;
use crate::random::RandomSource;

pub type Filter = fn(u32) -> f64;

#[must_use]
pub fn red(color: u32) -> f64 {
    f64::from((color >> 16) & 0xff) / 255.0
}

#[must_use]
pub fn green(color: u32) -> f64 {
    f64::from((color >> 8) & 0xff) / 255.0
}

#[must_use]
pub fn blue(color: u32) -> f64 {
    f64::from(color & 0xff) / 255.0
}

fn breakout(color: u32) -> [f64; 3] {
    [red(color), green(color), blue(color)]
}

fn min_max(channels: &[f64; 3]) -> (f64, f64) {
    channels
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &c| {
            (lo.min(c), hi.max(c))
        })
}

#[must_use]
pub fn luminance(color: u32) -> f64 {
    let (lo, hi) = min_max(&breakout(color));
    (lo + hi) / 2.0
}

/// HSL saturation; greys (including black) are 0.
#[must_use]
pub fn saturation(color: u32) -> f64 {
    let channels = breakout(color);
    let (lo, hi) = min_max(&channels);
    let lum = (lo + hi) / 2.0;
    let val = if lum < 0.5 {
        (hi - lo) / (hi + lo)
    } else {
        (hi - lo) / (2.0 - hi - lo)
    };
    finite_or_zero(val)
}

/// Hue sextant scaled by 1/5; greys are 0.
#[must_use]
pub fn hue(color: u32) -> f64 {
    let [r, g, b] = breakout(color);
    let (lo, hi) = min_max(&[r, g, b]);
    let raw = if r == hi {
        (g - b) / (hi - lo)
    } else if g == hi {
        2.0 + (b - r) / (hi - lo)
    } else {
        4.0 + (r - g) / (hi - lo)
    };
    finite_or_zero(raw) / 5.0
}

/// Looks a filter up by name.
#[must_use]
pub fn filter_by_name(name: &str) -> Option<Filter> {
    match name {
        "red" => Some(red),
        "green" => Some(green),
        "blue" => Some(blue),
        "luminance" => Some(luminance),
        "saturation" => Some(saturation),
        "hue" => Some(hue),
        _ => None,
    }
}

/// Applies `f` to the zero-padded 3×3 neighbourhood of every cell.
///
/// `board` is row-major with `dim` cells per side. Neighbourhoods are laid
/// out row-major too, the cell itself at index 4.
pub fn convolve<T, U, F>(board: &[T], dim: usize, f: F) -> Vec<U>
where
    T: Copy + Default,
    F: Fn(&[T; 9]) -> U,
{
    let mut out = Vec::with_capacity(board.len());
    for x in 0..dim {
        for y in 0..dim {
            let mut window = [T::default(); 9];
            for i in 0..3 {
                for j in 0..3 {
                    let (Some(sx), Some(sy)) = ((x + i).checked_sub(1), (y + j).checked_sub(1))
                    else {
                        continue;
                    };
                    if sx >= dim || sy >= dim {
                        continue;
                    }
                    if let Some(&v) = board.get(sx * dim + sy) {
                        window[i * 3 + j] = v;
                    }
                }
            }
            out.push(f(&window));
        }
    }
    out
}

fn passing_fraction<T, P: Fn(&T) -> bool>(values: &[T], test: P) -> f64 {
    let hits = values.iter().filter(|v| test(v)).count();
    finite_or_zero(hits as f64 / values.len() as f64)
}

/// True when at least `prob` of `values` pass `test`.
pub fn at_least<T, P: Fn(&T) -> bool>(prob: f64, test: P, values: &[T]) -> bool {
    passing_fraction(values, test) >= prob
}

/// True when at most `prob` of `values` pass `test`.
pub fn at_most<T, P: Fn(&T) -> bool>(prob: f64, test: P, values: &[T]) -> bool {
    passing_fraction(values, test) <= prob
}

/// `count` distinct `(x, y)` cells of a `dim`×`dim` board.
pub fn pixel_view<R: RandomSource>(rng: &mut R, dim: usize, count: usize) -> Result<Vec<(usize, usize)>> {
    let cells: Vec<(usize, usize)> = (0..dim)
        .flat_map(|x| (0..dim).map(move |y| (x, y)))
        .collect();
    rng.sample(&cells, count)
}
