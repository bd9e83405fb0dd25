use ndarray::Array2;

/// 3x3 local maximum filter. Out-of-frame neighbours reflect onto the edge
/// pixel, so the border only sees in-frame values.
pub fn maximum_filter_3x3(data: &Array2<u16>) -> Array2<u16> {
    rank_filter_3x3(data, u16::max)
}

/// 3x3 local minimum filter with the same edge handling as
/// [`maximum_filter_3x3`].
pub fn minimum_filter_3x3(data: &Array2<u16>) -> Array2<u16> {
    rank_filter_3x3(data, u16::min)
}

fn rank_filter_3x3(data: &Array2<u16>, pick: fn(u16, u16) -> u16) -> Array2<u16> {
    let (h, w) = data.dim();
    if h == 0 || w == 0 {
        return data.clone();
    }

    // Separable: filter rows, then columns.
    let mut horizontal = Array2::<u16>::zeros((h, w));
    for row in 0..h {
        for col in 0..w {
            let left = col.saturating_sub(1);
            let right = (col + 1).min(w - 1);
            let v = pick(data[[row, left]], data[[row, col]]);
            horizontal[[row, col]] = pick(v, data[[row, right]]);
        }
    }

    let mut result = Array2::<u16>::zeros((h, w));
    for row in 0..h {
        let up = row.saturating_sub(1);
        let down = (row + 1).min(h - 1);
        for col in 0..w {
            let v = pick(horizontal[[up, col]], horizontal[[row, col]]);
            result[[row, col]] = pick(v, horizontal[[down, col]]);
        }
    }

    result
}
