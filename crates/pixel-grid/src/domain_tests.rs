//! Regression tests for whole restore workflows.
//!
//! Each test names the failure it guards against: if one breaks, the
//! assertion message says what kind of bug slipped in.

#[cfg(test)]
mod domain_tests {
    use crate::buffer::PixelBuffer;
    use crate::color::{reduce_color, Rgb, Rgba};
    use crate::detect::{detect, detect_pixel_size, DetectOptions};
    use crate::grid::{CellState, Contour, GridModel, Point, Rect};
    use crate::sample::{transform_custom, transform_uniform, SampleOptions};

    const PALETTE: [Rgba; 4] = [
        Rgba::opaque(20, 12, 28),
        Rgba::opaque(208, 70, 72),
        Rgba::opaque(109, 170, 44),
        Rgba::opaque(222, 238, 214),
    ];

    fn diagonal_art(cols: usize, rows: usize, scale: usize) -> PixelBuffer {
        PixelBuffer::from_fn(cols * scale, rows * scale, |x, y| {
            PALETTE[(x / scale + y / scale) % 4]
        })
    }

    // ========================================================================
    // Detection + uniform sampling round trip
    // ========================================================================

    /// If this breaks, detection or uniform sampling no longer recovers a
    /// cleanly scaled image exactly.
    #[test]
    fn test_palette_scenario_scaled_16x() {
        let buffer = diagonal_art(8, 8, 16);
        assert_eq!(buffer.width(), 128);

        let size = detect_pixel_size(&buffer, 128, 0.95);
        assert_eq!(size, 16, "REGRESSION: expected period 16, detected {}", size);

        let out = transform_uniform(&buffer, size, 0, 0, &SampleOptions::default()).unwrap();
        assert_eq!((out.width(), out.height()), (8, 8));
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(
                    out.pixel(x, y).rgb(),
                    PALETTE[(x + y) % 4].rgb(),
                    "REGRESSION: restored pixel ({}, {}) differs from the source art",
                    x,
                    y
                );
            }
        }
    }

    /// If this breaks, a larger non-canonical period is beating a canonical
    /// one that also qualifies.
    #[test]
    fn test_canonical_size_preferred() {
        // 40x40 with 20px blocks also passes at 10 (canonical) and 20
        // (non-canonical, larger). 10 must win.
        let buffer = diagonal_art(2, 2, 20);
        let detection = detect(&buffer, &DetectOptions::default());
        assert_eq!(detection.size, 10);
        assert_eq!(detection.scores.last().map(|&(s, _)| s), Some(10));
    }

    /// If this breaks, detection returns a period that does not tile the
    /// image.
    #[test]
    fn test_uniform_image_period_divides_both_dimensions() {
        for (w, h) in [(30, 45), (64, 48), (7, 7), (100, 10)] {
            let buffer = PixelBuffer::filled(w, h, Rgba::opaque(3, 3, 3));
            let size = detect_pixel_size(&buffer, 128, 0.95);
            assert_eq!(w % size, 0, "{} does not divide width {}", size, w);
            assert_eq!(h % size, 0, "{} does not divide height {}", size, h);
        }
    }

    /// If this breaks, the sampler reads block edges instead of centres and
    /// picks up anti-aliasing seams.
    #[test]
    fn test_samples_centre_not_corner() {
        // 4px cells with a 1px dark seam on every cell's top-left edge
        let buffer = PixelBuffer::from_fn(16, 16, |x, y| {
            if x % 4 == 0 || y % 4 == 0 {
                Rgba::opaque(0, 0, 0)
            } else {
                Rgba::opaque(200, 100, 50)
            }
        });
        let out = transform_uniform(&buffer, 4, 0, 0, &SampleOptions::default()).unwrap();
        assert!(out
            .as_bytes()
            .chunks_exact(4)
            .all(|px| px == [200, 100, 50, 255]));
    }

    // ========================================================================
    // Exclusion and alpha
    // ========================================================================

    /// If this breaks, an output pixel matching an exclusion color kept a
    /// non-zero alpha in one of the samplers.
    #[test]
    fn test_excluded_colors_are_transparent_in_both_samplers() {
        let buffer = diagonal_art(6, 4, 3);
        let opts = SampleOptions::new()
            .exclude(PALETTE[0].rgb())
            .exclude(Rgb::new(110, 168, 40))
            .tolerance(5);

        let uniform = transform_uniform(&buffer, 3, 0, 0, &opts).unwrap();
        let grid = GridModel::from_uniform(buffer.width(), buffer.height(), 3, 0, 0).unwrap();
        let custom = transform_custom(&buffer, &grid, &opts).unwrap();
        assert_eq!(uniform, custom);

        for px in uniform.as_bytes().chunks_exact(4) {
            let rgb = Rgb::new(px[0], px[1], px[2]);
            let source_rgb = PALETTE
                .iter()
                .map(|c| c.rgb())
                .find(|&c| c == rgb);
            if px[3] != 0 {
                assert!(!opts.exclusion.matches(rgb));
                assert!(source_rgb.is_some());
            }
        }
        let transparent = uniform
            .as_bytes()
            .chunks_exact(4)
            .filter(|px| px[3] == 0)
            .count();
        // palette entries 0 and 2 are half of the diagonal pattern
        assert_eq!(transparent, 12);
    }

    /// If this breaks, quantization started touching the alpha channel.
    #[test]
    fn test_alpha_passes_through_quantization() {
        let buffer = PixelBuffer::filled(4, 4, Rgba::new(77, 150, 201, 33));
        let out = transform_uniform(&buffer, 2, 0, 0, &SampleOptions::new().bit_depth(2)).unwrap();
        let expected = reduce_color(Rgb::new(77, 150, 201), 2).with_alpha(33);
        assert_eq!(out.pixel(1, 1), expected);
    }

    // ========================================================================
    // Override precedence
    // ========================================================================

    /// If this breaks, manual flags no longer override color exclusion the
    /// same way everywhere.
    #[test]
    fn test_manual_flags_override_color_rules() {
        let buffer = diagonal_art(4, 1, 4);
        let mut grid = GridModel::from_uniform(16, 4, 4, 0, 0).unwrap();
        let opts = SampleOptions::new().exclude(PALETTE[1].rgb()).tolerance(0);

        // (1,0) is PALETTE[1]: excluded by color while default
        let out = transform_custom(&buffer, &grid, &opts).unwrap();
        assert_eq!(out.pixel(1, 0), Rgba::TRANSPARENT);

        grid.set_cell_state(1, 0, CellState::Included);
        grid.set_cell_state(2, 0, CellState::Excluded);
        let out = transform_custom(&buffer, &grid, &opts).unwrap();
        assert_eq!(out.pixel(1, 0), PALETTE[1], "manual inclusion must win");
        assert_eq!(out.pixel(2, 0), Rgba::TRANSPARENT, "manual exclusion must win");
        assert_eq!(out.pixel(3, 0), PALETTE[3]);
    }

    // ========================================================================
    // Editing workflow
    // ========================================================================

    /// If this breaks, defining one pixel by hand no longer lines the grid
    /// up with an offset image.
    #[test]
    fn test_pixel_definition_aligns_offset_art() {
        // 5px art shifted right by 2 and down by 3, padded with white
        let art = diagonal_art(4, 4, 5);
        let buffer = PixelBuffer::from_fn(24, 24, |x, y| {
            if (2..22).contains(&x) && (3..23).contains(&y) {
                art.pixel(x - 2, y - 3)
            } else {
                Rgba::opaque(255, 255, 255)
            }
        });

        // drag a rectangle around the art pixel at (1, 1)
        let rect = Rect::from_corners(Point::new(7, 8), Point::new(12, 13));
        let grid = GridModel::from_pixel_definition(24, 24, rect).unwrap();
        assert_eq!(grid.x_lines(), &[0, 2, 7, 12, 17, 22, 24]);

        let out = transform_custom(&buffer, &grid, &SampleOptions::default()).unwrap();
        for row in 0..4 {
            for col in 0..4 {
                assert_eq!(out.pixel(col + 1, row + 1), PALETTE[(col + row) % 4]);
            }
        }
    }

    /// If this breaks, contour selection and line edits interfere with each
    /// other during an editing session.
    #[test]
    fn test_contour_then_line_edit() {
        let buffer = diagonal_art(6, 6, 4);
        let mut grid = GridModel::from_uniform(24, 24, 4, 0, 0).unwrap();

        let mut contour = Contour::new();
        for p in [(4, 4), (20, 4), (20, 20)] {
            contour.click(Point::new(p.0, p.1), 3.0);
        }
        contour.click(Point::new(4, 20), 3.0);
        assert!(contour.click(Point::new(5, 5), 3.0));

        // keep the inner 4x4 block only
        assert_eq!(grid.exclude_outside_contour(&contour), 20);
        assert_eq!(grid.move_x_line(3, 13, 2), Some(13));

        let out = transform_custom(&buffer, &grid, &SampleOptions::default()).unwrap();
        assert_eq!(out.pixel(0, 0), Rgba::TRANSPARENT);
        assert_eq!(out.pixel(5, 5), Rgba::TRANSPARENT);
        assert_eq!(out.pixel(1, 1), PALETTE[2]);
        let kept = out.as_bytes().chunks_exact(4).filter(|px| px[3] != 0).count();
        assert_eq!(kept, 16);
    }

    /// If this breaks, toggling is no longer a closed three-state cycle.
    #[test]
    fn test_toggle_three_times_restores_state() {
        let mut grid = GridModel::from_uniform(12, 12, 3, 0, 0).unwrap();
        grid.set_cell_state(1, 2, CellState::Included);
        let before = grid.clone();
        for _ in 0..3 {
            grid.toggle_cell(1, 2);
            grid.toggle_cell(0, 0);
        }
        assert_eq!(grid, before);
    }
}
