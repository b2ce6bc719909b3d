/// Triangle indices for a `width` x `height` vertex grid laid out row by row.
///
/// Each cell becomes the triangles (upper left, upper right, lower left) and
/// (lower left, upper right, lower right). Cells are visited column by column.
pub fn grid_indices(width: usize, height: usize) -> Vec<u32> {
    if width < 2 || height < 2 {
        return vec![];
    }
    let mut indices = Vec::with_capacity((width - 1) * (height - 1) * 6);
    for x in 0..width - 1 {
        for y in 0..height - 1 {
            let upper_left = (y * width + x) as u32;
            let upper_right = upper_left + 1;
            let lower_left = upper_left + width as u32;
            let lower_right = lower_left + 1;
            indices.extend_from_slice(&[
                upper_left,
                upper_right,
                lower_left,
                lower_left,
                upper_right,
                lower_right,
            ]);
        }
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_by_two_grid() {
        // 0 1 2
        // 3 4 5
        assert_eq!(
            grid_indices(3, 2),
            vec![0, 1, 3, 3, 1, 4, 1, 2, 4, 4, 2, 5]
        );
    }

    #[test]
    fn cell_count() {
        let indices = grid_indices(640, 480);
        assert_eq!(indices.len(), 639 * 479 * 6);
        assert_eq!(indices.iter().max(), Some(&(640 * 480 - 1)));
    }

    #[test]
    fn degenerate_grid_is_empty() {
        assert!(grid_indices(1, 10).is_empty());
        assert!(grid_indices(0, 0).is_empty());
    }
}
