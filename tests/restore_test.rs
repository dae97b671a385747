//! End-to-end restore of PNG files through the pipeline.

mod common;

use pixel_grid::{reduce_color, Rgba};
use pretty_assertions::assert_eq;
use std::sync::Arc;

use common::fixtures::{self, colors};
use repixel::models::{AppConfig, RegionConfig, RegionRect};
use repixel::services::{load_png, save_png, CellSizeSource, RestorePipeline};

fn pipeline_with(yaml: &str) -> RestorePipeline {
    let config = AppConfig::from_yaml_str(yaml).expect("test config should parse");
    RestorePipeline::new(Arc::new(config))
}

#[test]
fn test_restore_detected_sprite_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = fixtures::write_png(dir.path(), "hero.png", &fixtures::scaled_sprite(8, 8, 16));

    let pipeline = pipeline_with("");
    let image = load_png(&input).unwrap();
    let restored = pipeline.run_region(&image, &RegionConfig::default()).unwrap();

    let output = pipeline.output_path(&input, None, None);
    assert_eq!(output, dir.path().join("hero_real.png"));
    save_png(&output, &restored, false).unwrap();

    let reloaded = common::assert_png_file(&output);
    common::assert_size(&reloaded, 8, 8);
    common::assert_pixels(&reloaded, fixtures::art_pixel);
}

#[test]
fn test_background_color_becomes_transparent() {
    let pipeline = pipeline_with("sampling: {exclude: ['#ff00ff']}");
    let image = fixtures::sprite_on_background(4, 4, 6);

    let plan = pipeline.plan_region(&image, &RegionConfig::default()).unwrap();
    assert_eq!(plan.cell_size, Some((6, CellSizeSource::Detected)));

    let restored = pipeline.run_region(&image, &RegionConfig::default()).unwrap();
    common::assert_size(&restored, 6, 6);
    // the one-pixel border: 6 * 4 - 4 corners counted twice
    assert_eq!(common::transparent_count(&restored), 20);
    assert_eq!(restored.pixel(0, 0), Rgba::TRANSPARENT);
    assert_eq!(restored.pixel(1, 1), fixtures::art_pixel(0, 0));
    assert_eq!(restored.pixel(4, 4), fixtures::art_pixel(3, 3));
}

#[test]
fn test_bit_depth_from_config() {
    let pipeline = pipeline_with("sampling: {bit_depth: 3}");
    let image = fixtures::scaled_sprite(4, 4, 4);
    let restored = pipeline.run_region(&image, &RegionConfig::default()).unwrap();
    common::assert_pixels(&restored, |x, y| {
        reduce_color(fixtures::art_pixel(x, y), 3).with_alpha(255)
    });
}

#[test]
fn test_sprite_sheet_regions_detect_independently() {
    let pipeline = pipeline_with("");
    let sheet = fixtures::sprite_sheet();

    let left = RegionConfig {
        rect: Some(RegionRect { x1: 0, y1: 0, x2: 16, y2: 16 }),
        ..RegionConfig::default()
    };
    let right = RegionConfig {
        rect: Some(RegionRect { x1: 16, y1: 0, x2: 32, y2: 16 }),
        ..RegionConfig::default()
    };

    let left_out = pipeline.run_region(&sheet, &left).unwrap();
    common::assert_size(&left_out, 4, 4);
    common::assert_pixels(&left_out, fixtures::art_pixel);

    let right_out = pipeline.run_region(&sheet, &right).unwrap();
    common::assert_size(&right_out, 2, 2);
    common::assert_pixels(&right_out, fixtures::art_pixel);
}

#[test]
fn test_explicit_size_with_negative_offset() {
    let pipeline = pipeline_with("");
    // the sprite starts 3px into the image
    let sprite = fixtures::scaled_sprite(4, 4, 5);
    let image = pixel_grid::PixelBuffer::from_fn(23, 23, |x, y| {
        if x < 3 || y < 3 {
            colors::MAGENTA
        } else {
            sprite.pixel(x - 3, y - 3)
        }
    });
    let region = RegionConfig {
        cell_size: Some(5),
        offset_x: -2,
        offset_y: -2,
        ..RegionConfig::default()
    };
    let restored = pipeline.run_region(&image, &region).unwrap();
    common::assert_size(&restored, 4, 4);
    common::assert_pixels(&restored, fixtures::art_pixel);
}

#[test]
fn test_empty_region_is_an_error() {
    let pipeline = pipeline_with("");
    let region = RegionConfig {
        rect: Some(RegionRect { x1: 40, y1: 0, x2: 80, y2: 10 }),
        ..RegionConfig::default()
    };
    let err = pipeline
        .run_region(&fixtures::scaled_sprite(2, 2, 4), &region)
        .unwrap_err();
    assert!(err.to_string().contains("empty"), "{err}");
}

#[test]
fn test_optimized_output_matches() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = pipeline_with("output: {optimize: true, suffix: '_1x'}");
    let input = fixtures::write_png(dir.path(), "tile.png", &fixtures::scaled_sprite(6, 6, 4));
    let image = load_png(&input).unwrap();
    let restored = pipeline.run_region(&image, &RegionConfig::default()).unwrap();

    let output = pipeline.output_path(&input, None, None);
    assert!(output.ends_with("tile_1x.png"));
    save_png(&output, &restored, pipeline.config().output.optimize).unwrap();
    assert_eq!(common::assert_png_file(&output), restored);
}
