//! Plain text rendering of matrices and vectors. Used when logging factor
//! parameters while debugging message passing.

use std::fmt::Write;

use super::{Matrix, Scalar, Vector};

const CELL_WIDTH: usize = 12;

const UPPER_LEFT_CORNER: char = '╭';
const UPPER_RIGHT_CORNER: char = '╮';
const LOWER_LEFT_CORNER: char = '╰';
const LOWER_RIGHT_CORNER: char = '╯';
const BAR: char = '│';

fn border(left: char, right: char, label: Option<&str>, width: usize) -> String {
    let label = label.unwrap_or_default();
    let fill = width.saturating_sub(label.chars().count());
    format!("{left}{label}{}{right}", "─".repeat(fill))
}

fn format_row<T: Scalar>(out: &mut String, row: impl Iterator<Item = T>) {
    out.push(BAR);
    for x in row {
        let _ = write!(out, "{x:>CELL_WIDTH$.4}");
    }
    out.push(BAR);
    out.push('\n');
}

/// Render `matrix` inside a box, with the shape in the upper border.
pub fn format_matrix<T: Scalar>(matrix: &Matrix<T>) -> String {
    let (nrows, ncols) = matrix.dim();
    let width = (CELL_WIDTH * ncols).max(8);
    let dims = format!("{nrows}x{ncols}");
    let mut out = border(UPPER_LEFT_CORNER, UPPER_RIGHT_CORNER, Some(&dims), width);
    out.push('\n');
    for row in matrix.rows() {
        format_row(&mut out, row.iter().copied());
    }
    out.push_str(&border(LOWER_LEFT_CORNER, LOWER_RIGHT_CORNER, None, width));
    out
}

/// Render `vector` as a single boxed row.
pub fn format_vector<T: Scalar>(vector: &Vector<T>) -> String {
    let width = (CELL_WIDTH * vector.len()).max(8);
    let dims = format!("{}", vector.len());
    let mut out = border(UPPER_LEFT_CORNER, UPPER_RIGHT_CORNER, Some(&dims), width);
    out.push('\n');
    format_row(&mut out, vector.iter().copied());
    out.push_str(&border(LOWER_LEFT_CORNER, LOWER_RIGHT_CORNER, None, width));
    out
}
